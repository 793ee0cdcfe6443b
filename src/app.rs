/*
 * Responsibility
 * - Config読み込み → 依存生成 (store / IdCodec / Authenticator) → Router 組み立て
 * - Middleware の適用 (認証コンテキスト / HTTP / CORS / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::middleware;
use crate::repos::{
    LectureStore, PrincipalStore, lecture_repo::PgLectureStore, memory::MemoryStore,
    user_repo::PgPrincipalStore,
};
use crate::services::{auth::build_authenticator, id_codec::IdCodec};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,lecture_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting lecture API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!(error = %e, "server error");
        AppError::Internal
    })?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let (principals, lectures): (Arc<dyn PrincipalStore>, Arc<dyn LectureStore>) =
        match &config.store {
            StoreBackend::Postgres { database_url } => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "failed to connect to postgres");
                        AppError::Internal
                    })?;
                tracing::info!("using postgres store");
                let principals: Arc<dyn PrincipalStore> = Arc::new(PgPrincipalStore::new(db.clone()));
                let lectures: Arc<dyn LectureStore> = Arc::new(PgLectureStore::new(db));
                (principals, lectures)
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                let store = Arc::new(MemoryStore::seeded());
                let principals: Arc<dyn PrincipalStore> = store.clone();
                let lectures: Arc<dyn LectureStore> = store;
                (principals, lectures)
            }
        };

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).map_err(|e| {
        tracing::error!(error = %e, "invalid sqids configuration");
        AppError::Internal
    })?;

    let auth = build_authenticator(config, principals)?;

    Ok(AppState::new(lectures, id_codec, auth))
}

/// Full router: `/api/v1` with the authentication context, wrapped in the
/// HTTP, CORS and security-header layers.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
