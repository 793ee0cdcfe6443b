/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /lectures, /lectures/{id}
 * - role 要件は route に付けず handler 側で authorize() に渡す
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    lectures::{create_lecture, get_lecture, query_lectures, update_lecture},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/lectures", get(query_lectures).post(create_lecture))
        .route("/lectures/{lecture_id}", get(get_lecture).put(update_lecture))
}
