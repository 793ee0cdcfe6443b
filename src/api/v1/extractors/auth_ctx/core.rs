use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::state::AppState;

use super::AuthCtx;

/// Handler で AuthCtx を受け取るための extractor
///
/// Never rejects. A route outside the auth middleware sees an anonymous
/// context, which any role-requiring check then denies.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<AuthCtx>().cloned().unwrap_or_else(|| {
            tracing::warn!("no AuthCtx on request, is the auth middleware applied?");
            AuthCtx::anonymous()
        });

        Ok(AuthCtxExtractor(ctx))
    }
}
