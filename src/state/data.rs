/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the records API and the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A place persisted by the records API
///
/// Records are created server-side; the client only ever prepends
/// freshly created ones to its list and never edits them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Server-assigned identifier (accepted as string or number on the wire)
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// File/content URI or `data:` URI with an embedded image
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// A latitude/longitude pair from the location provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The in-progress form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo: Option<String>,
}

/// Body of `POST /api/places`, only ever built from a validated draft
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: Option<String>,
}

/// Required draft fields that were missing at submit time
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Please provide: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl Draft {
    /// Store a position fix
    pub fn set_location(&mut self, coordinates: Coordinates) {
        self.latitude = Some(coordinates.latitude);
        self.longitude = Some(coordinates.longitude);
    }

    /// Both coordinates, if a fix has been stored
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }

    /// Check the required fields and build the request body.
    ///
    /// Title and description count as missing when they are blank; they
    /// are sent exactly as typed otherwise.
    pub fn validate(&self) -> Result<NewRecord, ValidationError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }

        let coordinates = self.coordinates();
        if coordinates.is_none() {
            missing.push("location");
        }

        match coordinates {
            Some(Coordinates { latitude, longitude }) if missing.is_empty() => Ok(NewRecord {
                title: self.title.clone(),
                description: self.description.clone(),
                latitude,
                longitude,
                photo: self.photo.clone(),
            }),
            _ => Err(ValidationError { missing }),
        }
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_draft() -> Draft {
        Draft {
            title: "Pothole".to_string(),
            description: "Large crack on 5th Ave".to_string(),
            latitude: Some(40.712),
            longitude: Some(-74.006),
            photo: None,
        }
    }

    #[test]
    fn test_validate_complete_draft() {
        let new = complete_draft().validate().unwrap();
        assert_eq!(new.title, "Pothole");
        assert_eq!(new.latitude, 40.712);
        assert_eq!(new.longitude, -74.006);
        assert_eq!(new.photo, None);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let err = Draft::default().validate().unwrap_err();
        assert_eq!(err.missing, vec!["title", "description", "location"]);
        assert_eq!(err.to_string(), "Please provide: title, description, location");
    }

    #[test]
    fn test_validate_needs_both_coordinates() {
        let mut draft = complete_draft();
        draft.longitude = None;
        assert_eq!(draft.validate().unwrap_err().missing, vec!["location"]);
    }

    #[test]
    fn test_blank_title_is_missing() {
        let mut draft = complete_draft();
        draft.title = "   ".to_string();
        assert_eq!(draft.validate().unwrap_err().missing, vec!["title"]);
    }

    #[test]
    fn test_clear() {
        let mut draft = complete_draft();
        draft.photo = Some("file:///tmp/a.jpg".to_string());
        draft.clear();
        assert_eq!(draft, Draft::default());
    }

    #[test]
    fn test_record_from_server_json() {
        let json = r#"{
            "id": "r1",
            "title": "Pothole",
            "description": "Large crack on 5th Ave",
            "latitude": 40.712,
            "longitude": -74.006,
            "photo": null,
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "r1");
        assert_eq!(record.photo, None);
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_record_accepts_numeric_mongo_style_id() {
        let json = r#"{"_id": 42, "title": "t", "description": "d", "latitude": 1.0, "longitude": 2.0}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.created_at, None);
        assert_eq!(record.photo, None);
    }

    #[test]
    fn test_new_record_serializes_null_photo() {
        let body = serde_json::to_value(complete_draft().validate().unwrap()).unwrap();
        assert_eq!(body["photo"], serde_json::Value::Null);
        assert_eq!(body["title"], "Pothole");
    }
}
