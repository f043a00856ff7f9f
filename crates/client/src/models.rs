//! Wire types for the registry API.
//!
//! Shapes mirror the server's JSON payloads: snake_case field names,
//! naive ISO-8601 datetimes, nullable columns as `Option`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Gender recorded for a reported person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or unspecified.
    Other,
}

impl Gender {
    /// Wire representation, matching what the server stores.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown gender: {s} (expected male, female, or other)")),
        }
    }
}

/// Lifecycle status of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// The person is still missing.
    #[default]
    Missing,
    /// The person has been found.
    Found,
    /// The report is closed.
    Closed,
}

impl ReportStatus {
    /// Wire representation, matching what the server stores.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Found => "found",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "missing" => Ok(Self::Missing),
            "found" => Ok(Self::Found),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("unknown status: {s} (expected missing, found, or closed)")),
        }
    }
}

/// Public profile of the user who filed a report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reporter {
    /// Server-assigned user id.
    pub id: i64,
    /// Display username.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, if given.
    pub phone: Option<String>,
    /// Account creation time.
    pub created_at: NaiveDateTime,
}

/// A stored photo belonging to a report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoRecord {
    /// Server-assigned photo id.
    pub id: i64,
    /// Stored file name.
    pub filename: String,
    /// Server-resolved URL for fetching the image.
    pub url: String,
    /// Upload time.
    pub uploaded_at: NaiveDateTime,
}

/// A stored relative contact belonging to a report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelativeRecord {
    /// Server-assigned id.
    pub id: i64,
    /// Contact name.
    pub name: String,
    /// Relationship to the missing person.
    pub relationship: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact address.
    pub address: Option<String>,
    /// Record creation time.
    pub created_at: NaiveDateTime,
}

/// A server-confirmed missing-person report.
///
/// Immutable once received; a new fetch supersedes it wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissingPersonRecord {
    /// Server-assigned report id.
    pub id: i64,
    /// Full name of the missing person.
    pub full_name: String,
    /// Age in years, if known.
    pub age: Option<u32>,
    /// Gender, if known.
    pub gender: Option<Gender>,
    /// Height as the server stores it (free-form text).
    pub height: Option<String>,
    /// Weight as the server stores it (free-form text).
    pub weight: Option<String>,
    /// Hair color.
    pub hair_color: Option<String>,
    /// Eye color.
    pub eye_color: Option<String>,
    /// Where the person was last seen.
    pub last_seen_location: Option<String>,
    /// When the person was last seen.
    pub last_seen_date: Option<NaiveDateTime>,
    /// Free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: ReportStatus,
    /// The filing user, when the account still exists.
    pub reporter: Option<Reporter>,
    /// Attached photos.
    pub photos: Vec<PhotoRecord>,
    /// Relative contacts.
    pub relatives: Vec<RelativeRecord>,
    /// Report creation time.
    pub created_at: NaiveDateTime,
    /// Last modification time.
    pub updated_at: NaiveDateTime,
}

/// One page of query results with its pagination envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportPage {
    /// Records in server order.
    pub data: Vec<MissingPersonRecord>,
    /// Total matching records across all pages.
    pub total: u64,
    /// Total page count.
    pub pages: u32,
    /// The page this response covers.
    pub current_page: u32,
}

/// An authenticated session as returned by login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Opaque bearer token.
    pub access_token: String,
    /// The signed-in user.
    pub user: Reporter,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_record_from_wire_json() {
        let value = json!({
            "id": 7,
            "full_name": "Jane Doe",
            "age": 34,
            "gender": "Female",
            "height": "170 cm",
            "weight": null,
            "hair_color": "brown",
            "eye_color": null,
            "last_seen_location": "Riverside Park",
            "last_seen_date": "2024-03-02T00:00:00",
            "description": "Last seen wearing a red coat.",
            "status": "missing",
            "reporter": {
                "id": 3,
                "username": "sam",
                "email": "sam@example.com",
                "phone": null,
                "created_at": "2024-01-15T10:30:00"
            },
            "photos": [
                {
                    "id": 11,
                    "filename": "a1b2.jpg",
                    "url": "/api/uploads/a1b2.jpg",
                    "uploaded_at": "2024-03-02T12:00:00.123456"
                }
            ],
            "relatives": [
                {
                    "id": 5,
                    "name": "Amy Doe",
                    "relationship": "sister",
                    "phone": "555-0100",
                    "email": null,
                    "address": null,
                    "created_at": "2024-03-02T12:00:00"
                }
            ],
            "created_at": "2024-03-02T12:00:00",
            "updated_at": "2024-03-02T12:00:00"
        });

        let record: MissingPersonRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.gender, Some(Gender::Female));
        assert_eq!(record.height.as_deref(), Some("170 cm"));
        assert_eq!(record.weight, None);
        assert_eq!(record.status, ReportStatus::Missing);
        assert_eq!(record.reporter.as_ref().unwrap().id, 3);
        assert_eq!(record.photos.len(), 1);
        assert_eq!(record.relatives[0].name, "Amy Doe");
    }

    #[test]
    fn test_person_record_with_null_reporter() {
        let value = json!({
            "id": 8,
            "full_name": "John Roe",
            "age": null,
            "gender": null,
            "height": null,
            "weight": null,
            "hair_color": null,
            "eye_color": null,
            "last_seen_location": null,
            "last_seen_date": null,
            "description": null,
            "status": "found",
            "reporter": null,
            "photos": [],
            "relatives": [],
            "created_at": "2024-03-02T12:00:00",
            "updated_at": "2024-03-05T09:00:00"
        });

        let record: MissingPersonRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.reporter, None);
        assert_eq!(record.status, ReportStatus::Found);
        assert!(record.photos.is_empty());
    }

    #[test]
    fn test_report_page_envelope() {
        let value = json!({
            "data": [],
            "total": 41,
            "pages": 3,
            "current_page": 2
        });

        let page: ReportPage = serde_json::from_value(value).unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.pages, 3);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(serde_json::to_string(&ReportStatus::Missing).unwrap(), "\"missing\"");
        let parsed: ReportStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(parsed, ReportStatus::Closed);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!("FOUND".parse::<ReportStatus>().unwrap(), ReportStatus::Found);
        assert!("open".parse::<ReportStatus>().is_err());
    }
}
