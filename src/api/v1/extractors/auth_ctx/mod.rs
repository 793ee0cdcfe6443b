/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - middleware が request extensions に載せた AuthCtx を handler に渡す
 * - 型そのもの (AuthCtx) は services::auth::context に置く
 */

mod core;

pub use crate::services::auth::context::AuthCtx;
pub use core::AuthCtxExtractor;
