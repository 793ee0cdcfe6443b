/// Factory: build the `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::repos::store::PrincipalStore;
use crate::services::auth::{Authenticator, PrincipalResolver, TokenCodec};

pub fn build_authenticator(
    config: &Config,
    principals: Arc<dyn PrincipalStore>,
) -> Result<Arc<Authenticator>, AppError> {
    let codec = TokenCodec::new(&config.verification_key, config.access_token_leeway_seconds)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build token codec");
            AppError::Internal
        })?;

    Ok(Arc::new(Authenticator::new(
        codec,
        PrincipalResolver::new(principals),
    )))
}
