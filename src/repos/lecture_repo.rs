/*
 * Responsibility
 * - lectures CRUD (delete なし)
 * - owner は "userInfoId" (FK) で持ち、読み出し時に user_info.email へ join する
 * - "lectureStatus" は TEXT ('DRAFT' / 'PUBLISHED')
 */
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::domain::lecture::{Lecture, LectureDetails, NewLecture};
use crate::repos::{error::RepoError, store::LectureStore};

#[derive(Debug, Clone, sqlx::FromRow)]
struct LectureRow {
    #[sqlx(rename = "lectureId")]
    lecture_id: i64,

    name: String,
    description: Option<String>,

    #[sqlx(rename = "beginEnrollmentDateTime")]
    begin_enrollment_date_time: NaiveDateTime,
    #[sqlx(rename = "closeEnrollmentDateTime")]
    close_enrollment_date_time: NaiveDateTime,
    #[sqlx(rename = "beginLectureDateTime")]
    begin_lecture_date_time: NaiveDateTime,
    #[sqlx(rename = "endLectureDateTime")]
    end_lecture_date_time: NaiveDateTime,

    location: Option<String>,

    #[sqlx(rename = "basePrice")]
    base_price: i32,
    #[sqlx(rename = "maxPrice")]
    max_price: i32,
    #[sqlx(rename = "limitOfEnrollment")]
    limit_of_enrollment: i32,

    offline: bool,
    free: bool,

    #[sqlx(rename = "lectureStatus")]
    lecture_status: String,

    #[sqlx(rename = "ownerEmail")]
    owner_email: Option<String>,
}

impl TryFrom<LectureRow> for Lecture {
    type Error = RepoError;

    fn try_from(row: LectureRow) -> Result<Self, Self::Error> {
        let status = row
            .lecture_status
            .parse()
            .map_err(|e| RepoError::InvalidRow(format!("lecture {}: {}", row.lecture_id, e)))?;

        Ok(Lecture {
            id: row.lecture_id,
            details: LectureDetails {
                name: row.name,
                description: row.description,
                begin_enrollment_date_time: row.begin_enrollment_date_time,
                close_enrollment_date_time: row.close_enrollment_date_time,
                begin_lecture_date_time: row.begin_lecture_date_time,
                end_lecture_date_time: row.end_lecture_date_time,
                location: row.location,
                base_price: row.base_price,
                max_price: row.max_price,
                limit_of_enrollment: row.limit_of_enrollment,
            },
            free: row.free,
            offline: row.offline,
            status,
            owner: row.owner_email,
        })
    }
}

const SELECT_LECTURE: &str = r#"
    SELECT
        l."lectureId", l.name, l.description,
        l."beginEnrollmentDateTime", l."closeEnrollmentDateTime",
        l."beginLectureDateTime", l."endLectureDateTime",
        l.location, l."basePrice", l."maxPrice", l."limitOfEnrollment",
        l.offline, l.free, l."lectureStatus",
        u.email AS "ownerEmail"
    FROM lectures l
    LEFT JOIN user_info u ON u.id = l."userInfoId"
"#;

#[derive(Clone, Debug)]
pub struct PgLectureStore {
    db: PgPool,
}

impl PgLectureStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LectureStore for PgLectureStore {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lecture>, RepoError> {
        let sql = format!(
            r#"{SELECT_LECTURE}
            ORDER BY l."lectureId" DESC
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, LectureRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Lecture::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Lecture>, RepoError> {
        let sql = format!(
            r#"{SELECT_LECTURE}
            WHERE l."lectureId" = $1
            "#
        );
        let row = sqlx::query_as::<_, LectureRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        row.map(Lecture::try_from).transpose()
    }

    async fn create(&self, new: NewLecture) -> Result<Lecture, RepoError> {
        let d = &new.details;
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO lectures (
                name, description,
                "beginEnrollmentDateTime", "closeEnrollmentDateTime",
                "beginLectureDateTime", "endLectureDateTime",
                location, "basePrice", "maxPrice", "limitOfEnrollment",
                offline, free, "lectureStatus", "userInfoId"
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                (SELECT id FROM user_info WHERE email = $14)
            )
            RETURNING "lectureId"
            "#,
        )
        .bind(&d.name)
        .bind(&d.description)
        .bind(d.begin_enrollment_date_time)
        .bind(d.close_enrollment_date_time)
        .bind(d.begin_lecture_date_time)
        .bind(d.end_lecture_date_time)
        .bind(&d.location)
        .bind(d.base_price)
        .bind(d.max_price)
        .bind(d.limit_of_enrollment)
        .bind(d.is_offline())
        .bind(d.is_free())
        .bind(new.status.as_str())
        .bind(&new.owner)
        .fetch_one(&self.db)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| RepoError::InvalidRow(format!("lecture {} vanished after insert", id)))
    }

    async fn update(&self, id: i64, details: LectureDetails) -> Result<Option<Lecture>, RepoError> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE lectures
            SET
                name = $2,
                description = $3,
                "beginEnrollmentDateTime" = $4,
                "closeEnrollmentDateTime" = $5,
                "beginLectureDateTime" = $6,
                "endLectureDateTime" = $7,
                location = $8,
                "basePrice" = $9,
                "maxPrice" = $10,
                "limitOfEnrollment" = $11,
                offline = $12,
                free = $13
            WHERE "lectureId" = $1
            RETURNING "lectureId"
            "#,
        )
        .bind(id)
        .bind(&details.name)
        .bind(&details.description)
        .bind(details.begin_enrollment_date_time)
        .bind(details.close_enrollment_date_time)
        .bind(details.begin_lecture_date_time)
        .bind(details.end_lecture_date_time)
        .bind(&details.location)
        .bind(details.base_price)
        .bind(details.max_price)
        .bind(details.limit_of_enrollment)
        .bind(details.is_offline())
        .bind(details.is_free())
        .fetch_optional(&self.db)
        .await?;

        match updated {
            Some(_) => self.get(id).await,
            None => Ok(None),
        }
    }
}
