//! In-memory principal + lecture store.
//!
//! Used when no database is configured (`STORE_BACKEND=memory`) and by tests.
//! `seeded()` loads the same demo data the service ships with: two users, a
//! DRAFT lecture owned by each, and one ownerless system lecture.

use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock},
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::lecture::{Lecture, LectureDetails, NewLecture};
use crate::repos::{
    error::RepoError,
    store::{LectureStore, PrincipalStore},
};
use crate::services::auth::principal::{Principal, Role};

pub const SEED_ADMIN: &str = "admin@email.com";
pub const SEED_USER: &str = "user@email.com";

#[derive(Debug, Default)]
struct Lectures {
    next_id: i64,
    rows: BTreeMap<i64, Lecture>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    principals: RwLock<BTreeMap<String, Principal>>,
    lectures: RwLock<Lectures>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let store = Self::new();
        store.add_principal(Principal::new(SEED_ADMIN, [Role::Admin, Role::User]));
        store.add_principal(Principal::new(SEED_USER, [Role::User]));

        for (index, owner) in [(1, SEED_ADMIN), (2, SEED_USER)] {
            store.insert(NewLecture::draft(
                seed_details(&format!("{} Lecture", index), index),
                Some(owner.to_string()),
            ));
        }
        store.insert(NewLecture::draft(seed_details("System Lecture", 3), None));

        store
    }

    pub fn add_principal(&self, principal: Principal) {
        self.principals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(principal.identity.clone(), principal);
    }

    pub fn insert(&self, new: NewLecture) -> Lecture {
        let mut lectures = self.lectures.write().unwrap_or_else(PoisonError::into_inner);
        lectures.next_id += 1;
        let lecture = Lecture::from_new(lectures.next_id, new);
        lectures.rows.insert(lecture.id, lecture.clone());
        lecture
    }
}

fn seed_details(name: &str, index: i64) -> LectureDetails {
    let at = |day: u32| -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|d| d.and_hms_opt(14, 21, 0))
            .unwrap_or_default()
    };

    LectureDetails {
        name: name.to_string(),
        description: Some("Test Lecture".to_string()),
        begin_enrollment_date_time: at(23),
        close_enrollment_date_time: at(24),
        begin_lecture_date_time: at(25),
        end_lecture_date_time: at(26),
        location: Some(format!("Lecture Room {}", index)),
        base_price: 100,
        max_price: 200,
        limit_of_enrollment: 100,
    }
}

#[async_trait]
impl PrincipalStore for MemoryStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Principal>, RepoError> {
        let principals = self.principals.read().unwrap_or_else(PoisonError::into_inner);
        Ok(principals.get(identity).cloned())
    }
}

#[async_trait]
impl LectureStore for MemoryStore {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lecture>, RepoError> {
        let lectures = self.lectures.read().unwrap_or_else(PoisonError::into_inner);
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);

        Ok(lectures
            .rows
            .values()
            .rev()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Lecture>, RepoError> {
        let lectures = self.lectures.read().unwrap_or_else(PoisonError::into_inner);
        Ok(lectures.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewLecture) -> Result<Lecture, RepoError> {
        Ok(self.insert(new))
    }

    async fn update(&self, id: i64, details: LectureDetails) -> Result<Option<Lecture>, RepoError> {
        let mut lectures = self.lectures.write().unwrap_or_else(PoisonError::into_inner);
        Ok(lectures.rows.get_mut(&id).map(|lecture| {
            lecture.apply_update(details);
            lecture.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lecture::{LectureStatus, fixtures};

    #[tokio::test]
    async fn seeded_store_has_owned_and_ownerless_lectures() {
        let store = MemoryStore::seeded();
        let lectures = store.list(50, 0).await.unwrap();

        assert_eq!(lectures.len(), 3);
        assert_eq!(lectures[0].owner, None);
        assert_eq!(lectures[2].owner.as_deref(), Some(SEED_ADMIN));
        assert!(lectures.iter().all(|l| l.status == LectureStatus::Draft));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let store = MemoryStore::seeded();
        let page = store.list(1, 1).await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }

    #[tokio::test]
    async fn returned_lecture_is_a_copy() {
        let store = MemoryStore::seeded();
        let mut copy = store.get(1).await.unwrap().unwrap();
        copy.owner = Some("mallory@email.com".to_string());

        let stored = store.get(1).await.unwrap().unwrap();
        assert_eq!(stored.owner.as_deref(), Some(SEED_ADMIN));
    }

    #[tokio::test]
    async fn update_of_missing_lecture_is_none() {
        let store = MemoryStore::new();
        assert!(store.update(42, fixtures::details("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn principals_are_looked_up_by_identity() {
        let store = MemoryStore::seeded();

        let admin = store.find_by_identity(SEED_ADMIN).await.unwrap().unwrap();
        assert!(admin.has_role(Role::Admin));
        assert!(store.find_by_identity("nobody@email.com").await.unwrap().is_none());
    }
}
