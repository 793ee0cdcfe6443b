//! Bearer header -> `AuthCtx`.
//!
//! Authentication never rejects a request. Whatever goes wrong (no header,
//! other scheme, bad token, unknown subject) the caller gets an anonymous
//! context and authorization decides later.

use axum::http::{HeaderMap, header};

use crate::services::auth::{
    context::AuthCtx, principal_resolver::PrincipalResolver, token_codec::TokenCodec,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Token text after `Bearer `, if the header carries one.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    resolver: PrincipalResolver,
}

impl Authenticator {
    pub fn new(codec: TokenCodec, resolver: PrincipalResolver) -> Self {
        Self { codec, resolver }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthCtx {
        let Some(token) = bearer_token(headers) else {
            return AuthCtx::anonymous();
        };

        let verified = match self.codec.verify(token) {
            Ok(verified) => verified,
            Err(err) => {
                tracing::debug!(error = %err, "bearer token rejected, continuing anonymously");
                return AuthCtx::anonymous();
            }
        };

        match self.resolver.resolve(&verified.subject).await {
            Ok(principal) => AuthCtx::authenticated(principal),
            Err(err) => {
                tracing::warn!(
                    subject = %verified.subject,
                    error = %err,
                    "token subject did not resolve, continuing anonymously"
                );
                AuthCtx::anonymous()
            }
        }
    }
}
