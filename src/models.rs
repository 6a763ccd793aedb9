// Data model for projstore

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tracked project with scheduling and favorite-status metadata.
///
/// Stored as camelCase JSON, matching the wire format of the persisted
/// collection (`startDate`, `endDate`, `imageUrl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque unique identifier, assigned at creation, immutable after.
    pub id: String,
    pub name: String,
    pub client: String,
    /// Date-valued string, expected to parse via [`parse_date_ms`].
    pub start_date: String,
    pub end_date: String,
    /// Encoded image, or absent. Omitted from the wire format when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub favorited: bool,
}

impl Project {
    /// Build a project with a freshly assigned UUID v7 id, not favorited
    /// and without an image. The store never assigns ids on its own.
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            client: client.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            image_url: None,
            favorited: false,
        }
    }
}

/// Parse a stored date string to a millisecond timestamp.
///
/// Accepts RFC 3339 datetimes and plain `YYYY-MM-DD` dates (what the CLI
/// writes). Returns `None` for anything else; ordering treats `None` as an
/// absent date rather than failing the operation.
pub fn parse_date_ms(value: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
