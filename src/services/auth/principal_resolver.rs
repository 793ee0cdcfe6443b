use std::sync::Arc;

use crate::repos::{error::RepoError, store::PrincipalStore};
use crate::services::auth::principal::Principal;

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("no principal matches the token subject")]
    NotFound,
    #[error("principal store failure: {0}")]
    Backend(#[from] RepoError),
}

/// Maps a verified token subject to a principal. Read-only.
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn PrincipalStore>,
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver").finish_non_exhaustive()
    }
}

impl PrincipalResolver {
    pub fn new(store: Arc<dyn PrincipalStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, subject: &str) -> Result<Principal, ResolutionError> {
        self.store
            .find_by_identity(subject)
            .await?
            .ok_or(ResolutionError::NotFound)
    }
}
