/*
 * Responsibility
 * - handler 向け extractor の公開 (AuthCtxExtractor / PublicId)
 */
pub mod auth_ctx;
pub mod public_id;

pub use auth_ctx::AuthCtxExtractor;
