/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - lectures: LectureStore, id_codec: IdCodec, auth: Authenticator
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - request をまたいで可変な状態は持たない
 */
use std::sync::Arc;

use crate::repos::store::LectureStore;
use crate::services::{auth::Authenticator, id_codec::IdCodec};

#[derive(Clone)]
pub struct AppState {
    pub lectures: Arc<dyn LectureStore>,
    pub id_codec: IdCodec,
    pub auth: Arc<Authenticator>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("id_codec", &self.id_codec)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(lectures: Arc<dyn LectureStore>, id_codec: IdCodec, auth: Arc<Authenticator>) -> Self {
        Self {
            lectures,
            id_codec,
            auth,
        }
    }
}
