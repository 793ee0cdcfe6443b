pub mod error;
pub mod lecture_repo;
pub mod memory;
pub mod store;
pub mod user_repo;

pub use store::{LectureStore, PrincipalStore};
