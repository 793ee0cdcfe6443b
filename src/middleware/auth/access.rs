//! Bearer token -> `AuthCtx` in request extensions.
//!
//! Runs once per request before any handler. Never rejects: a missing or bad
//! token leaves the request anonymous and the handler's authorization check
//! answers 401/403 where it matters. Public routes keep working without a token.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::context::AuthCtx;
use crate::state::AppState;

/// `/api/v1/*` に認証コンテキストを載せる middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Already authenticated by an outer layer: keep that context.
    if req.extensions().get::<AuthCtx>().is_none() {
        let auth_ctx = state.auth.authenticate(req.headers()).await;

        if let Some(identity) = auth_ctx.identity() {
            tracing::debug!(identity = %identity, "request authenticated");
        }

        // middleware → extractor への受け渡し
        req.extensions_mut().insert(auth_ctx);
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::AuthCtxExtractor;
    use crate::repos::memory::{MemoryStore, SEED_ADMIN, SEED_USER};
    use crate::services::auth::principal::{Principal, Role};
    use crate::services::auth::test_support::{authenticator, bearer, mint_with};
    use crate::services::id_codec::IdCodec;

    async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
        ctx.identity().unwrap_or("anonymous").to_string()
    }

    fn app() -> Router {
        let store = Arc::new(MemoryStore::seeded());
        let state = AppState::new(
            store.clone(),
            IdCodec::new(4, "abcdefghijklmnopqrstuvwxyz0123456789").unwrap(),
            Arc::new(authenticator(store)),
        );
        apply(Router::new().route("/whoami", get(whoami)), state.clone()).with_state(state)
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, String) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_as_principal() {
        let req = Request::get("/whoami")
            .header(header::AUTHORIZATION, bearer(SEED_USER))
            .body(Body::empty())
            .unwrap();

        assert_eq!(call(app(), req).await, (StatusCode::OK, SEED_USER.to_string()));
    }

    #[tokio::test]
    async fn missing_token_passes_through_anonymously() {
        let req = Request::get("/whoami").body(Body::empty()).unwrap();
        assert_eq!(call(app(), req).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn invalid_signature_passes_through_anonymously() {
        let exp = chrono::Utc::now().timestamp() + 60;
        let token = mint_with(&serde_json::json!({ "sub": SEED_USER, "exp": exp }), b"forged");
        let req = Request::get("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        assert_eq!(call(app(), req).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn garbage_token_passes_through_anonymously() {
        let req = Request::get("/whoami")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();

        assert_eq!(call(app(), req).await, (StatusCode::OK, "anonymous".to_string()));
    }

    #[tokio::test]
    async fn existing_context_is_not_replaced() {
        let mut req = Request::get("/whoami")
            .header(header::AUTHORIZATION, bearer(SEED_USER))
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(AuthCtx::authenticated(Principal::new(SEED_ADMIN, [Role::Admin])));

        assert_eq!(call(app(), req).await, (StatusCode::OK, SEED_ADMIN.to_string()));
    }

    #[tokio::test]
    async fn requests_do_not_share_context() {
        let app = app();
        let authed = Request::get("/whoami")
            .header(header::AUTHORIZATION, bearer(SEED_USER))
            .body(Body::empty())
            .unwrap();
        let anon = Request::get("/whoami").body(Body::empty()).unwrap();

        let (a, b) = tokio::join!(call(app.clone(), authed), call(app, anon));
        assert_eq!(a.1, SEED_USER);
        assert_eq!(b.1, "anonymous");
    }
}
