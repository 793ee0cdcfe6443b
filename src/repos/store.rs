//! Store interfaces used by services and handlers.
//!
//! Implementations must be cheap to share (`Arc<dyn ...>`) and must hand out
//! owned values, never live handles into their storage.
use async_trait::async_trait;

use crate::domain::lecture::{Lecture, LectureDetails, NewLecture};
use crate::repos::error::RepoError;
use crate::services::auth::principal::Principal;

#[async_trait]
pub trait PrincipalStore: Send + Sync {
    // Look up the principal whose identity (email) equals `identity`.
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Principal>, RepoError>;
}

#[async_trait]
pub trait LectureStore: Send + Sync {
    // Newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lecture>, RepoError>;

    async fn get(&self, id: i64) -> Result<Option<Lecture>, RepoError>;

    async fn create(&self, new: NewLecture) -> Result<Lecture, RepoError>;

    // Replaces the editable fields only. Owner and status are never written here.
    async fn update(&self, id: i64, details: LectureDetails) -> Result<Option<Lecture>, RepoError>;
}
