/*
 * Responsibility
 * - Lectures の request/response DTO (JSON は camelCase)
 * - 日時は "yyyy-MM-dd HH:mm" 形式
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::v1::dto::hal::Links;
use crate::domain::lecture::{Lecture, LectureDetails, LectureStatus};

mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}

/// Body of POST and PUT. PUT replaces every editable field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "minute_format")]
    pub begin_enrollment_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub close_enrollment_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub begin_lecture_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub end_lecture_date_time: NaiveDateTime,
    pub location: Option<String>,
    #[serde(default)]
    pub base_price: i32,
    #[serde(default)]
    pub max_price: i32,
    #[serde(default)]
    pub limit_of_enrollment: i32,
}

impl LectureRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.base_price < 0 || self.max_price < 0 {
            return Err("prices must not be negative");
        }
        if self.limit_of_enrollment < 0 {
            return Err("limitOfEnrollment must not be negative");
        }
        // maxPrice == 0 means "no upper bound"
        if self.max_price > 0 && self.base_price > self.max_price {
            return Err("basePrice must not exceed maxPrice");
        }
        if self.close_enrollment_date_time < self.begin_enrollment_date_time {
            return Err("closeEnrollmentDateTime is before beginEnrollmentDateTime");
        }
        if self.end_lecture_date_time < self.begin_lecture_date_time {
            return Err("endLectureDateTime is before beginLectureDateTime");
        }

        Ok(())
    }

    pub fn into_details(self) -> LectureDetails {
        LectureDetails {
            name: self.name,
            description: self.description,
            begin_enrollment_date_time: self.begin_enrollment_date_time,
            close_enrollment_date_time: self.close_enrollment_date_time,
            begin_lecture_date_time: self.begin_lecture_date_time,
            end_lecture_date_time: self.end_lecture_date_time,
            location: self.location,
            base_price: self.base_price,
            max_price: self.max_price,
            limit_of_enrollment: self.limit_of_enrollment,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    pub id: String, // encoded
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "minute_format")]
    pub begin_enrollment_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub close_enrollment_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub begin_lecture_date_time: NaiveDateTime,
    #[serde(with = "minute_format")]
    pub end_lecture_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub offline: bool,
    pub free: bool,
    pub lecture_status: LectureStatus,
    // owner's identity, absent for ownerless lectures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl LectureResponse {
    pub fn new(public_id: String, lecture: Lecture) -> Self {
        let d = lecture.details;
        Self {
            id: public_id,
            name: d.name,
            description: d.description,
            begin_enrollment_date_time: d.begin_enrollment_date_time,
            close_enrollment_date_time: d.close_enrollment_date_time,
            begin_lecture_date_time: d.begin_lecture_date_time,
            end_lecture_date_time: d.end_lecture_date_time,
            location: d.location,
            base_price: d.base_price,
            max_price: d.max_price,
            limit_of_enrollment: d.limit_of_enrollment,
            offline: lecture.offline,
            free: lecture.free,
            lecture_status: lecture.status,
            email: lecture.owner,
        }
    }
}

/// A lecture plus its `_links`.
#[derive(Debug, Serialize)]
pub struct LectureResource {
    #[serde(flatten)]
    pub lecture: LectureResponse,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct EmbeddedLectures {
    pub lectures: Vec<LectureResource>,
}

#[derive(Debug, Serialize)]
pub struct LectureCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedLectures,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(overrides: serde_json::Value) -> LectureRequest {
        let mut body = json!({
            "name": "Rust 101",
            "description": "ownership",
            "beginEnrollmentDateTime": "2024-06-23 14:21",
            "closeEnrollmentDateTime": "2024-06-24 14:21",
            "beginLectureDateTime": "2024-06-25 14:21",
            "endLectureDateTime": "2024-06-26 14:21",
            "location": "Room 1",
            "basePrice": 100,
            "maxPrice": 200,
            "limitOfEnrollment": 100
        });
        if let (Some(body), Some(overrides)) = (body.as_object_mut(), overrides.as_object()) {
            for (k, v) in overrides {
                body.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn parses_minute_precision_datetimes() {
        let req = request(json!({}));
        assert!(req.validate().is_ok());
        assert_eq!(
            req.begin_lecture_date_time.format("%Y-%m-%d %H:%M").to_string(),
            "2024-06-25 14:21"
        );
    }

    #[test]
    fn rejects_blank_name_and_inverted_ranges() {
        assert!(request(json!({ "name": "  " })).validate().is_err());
        assert!(request(json!({ "basePrice": 300 })).validate().is_err());
        assert!(
            request(json!({ "endLectureDateTime": "2024-06-24 00:00" }))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn unbounded_max_price_allows_any_base_price() {
        assert!(request(json!({ "basePrice": 300, "maxPrice": 0 })).validate().is_ok());
    }

    #[test]
    fn response_uses_wire_names_and_hides_missing_owner() {
        let details = request(json!({})).into_details();
        let lecture = Lecture::from_new(7, crate::domain::lecture::NewLecture::draft(details, None));
        let value = serde_json::to_value(LectureResponse::new("abc".into(), lecture)).unwrap();

        assert_eq!(value["id"], "abc");
        assert_eq!(value["lectureStatus"], "DRAFT");
        assert_eq!(value["beginEnrollmentDateTime"], "2024-06-23 14:21");
        assert_eq!(value["offline"], true);
        assert!(value.get("email").is_none());
    }
}
