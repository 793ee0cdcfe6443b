//! Lecture resource.
//!
//! A lecture remembers who created it (`owner`) only for comparison against the
//! current principal. Updates never touch `owner` or `status`.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LectureStatus {
    Draft,
    Published,
}

impl LectureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }

    /// DRAFT -> PUBLISHED. There is no way back.
    pub fn publish(self) -> Self {
        Self::Published
    }
}

impl fmt::Display for LectureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lecture status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for LectureStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Caller-editable part of a lecture. Create and update both carry one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureDetails {
    pub name: String,
    pub description: Option<String>,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_lecture_date_time: NaiveDateTime,
    pub end_lecture_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
}

impl LectureDetails {
    pub fn is_free(&self) -> bool {
        self.base_price == 0 && self.max_price == 0
    }

    pub fn is_offline(&self) -> bool {
        self.location
            .as_deref()
            .is_some_and(|location| !location.trim().is_empty())
    }
}

/// A lecture that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLecture {
    pub details: LectureDetails,
    pub status: LectureStatus,
    pub owner: Option<String>,
}

impl NewLecture {
    pub fn draft(details: LectureDetails, owner: Option<String>) -> Self {
        Self {
            details,
            status: LectureStatus::Draft,
            owner,
        }
    }

    pub fn publish(mut self) -> Self {
        self.status = self.status.publish();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecture {
    pub id: i64,
    pub details: LectureDetails,
    pub free: bool,
    pub offline: bool,
    pub status: LectureStatus,
    pub owner: Option<String>,
}

impl Lecture {
    pub fn from_new(id: i64, new: NewLecture) -> Self {
        Self {
            id,
            free: new.details.is_free(),
            offline: new.details.is_offline(),
            details: new.details,
            status: new.status,
            owner: new.owner,
        }
    }

    /// Replace the editable fields and recompute `free` / `offline`.
    pub fn apply_update(&mut self, details: LectureDetails) {
        self.free = details.is_free();
        self.offline = details.is_offline();
        self.details = details;
    }

    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.owner.as_deref() == Some(identity)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_only_when_both_prices_are_zero() {
        let mut d = fixtures::details("free");
        d.base_price = 0;
        d.max_price = 0;
        assert!(d.is_free());

        d.max_price = 10;
        assert!(!d.is_free());
    }

    #[test]
    fn blank_location_is_online() {
        let mut d = fixtures::details("online");
        d.location = Some("   ".to_string());
        assert!(!d.is_offline());

        d.location = None;
        assert!(!d.is_offline());
    }

    #[test]
    fn publish_moves_draft_forward_only() {
        let new = NewLecture::draft(fixtures::details("a"), None).publish();
        assert_eq!(new.status, LectureStatus::Published);
        assert_eq!(LectureStatus::Published.publish(), LectureStatus::Published);
    }

    #[test]
    fn update_keeps_owner_and_status() {
        let new = NewLecture::draft(fixtures::details("a"), Some("alice@email.com".into()));
        let mut lecture = Lecture::from_new(1, new);

        let mut changed = fixtures::details("b");
        changed.location = None;
        changed.base_price = 0;
        changed.max_price = 0;
        lecture.apply_update(changed);

        assert_eq!(lecture.details.name, "b");
        assert!(lecture.free);
        assert!(!lecture.offline);
        assert_eq!(lecture.owner.as_deref(), Some("alice@email.com"));
        assert_eq!(lecture.status, LectureStatus::Draft);
    }

    #[test]
    fn status_parses_its_own_spelling() {
        for status in [LectureStatus::Draft, LectureStatus::Published] {
            assert_eq!(status.as_str().parse::<LectureStatus>(), Ok(status));
        }
        assert!("ARCHIVED".parse::<LectureStatus>().is_err());
    }
}
