//! Resources, project tiles and the results the gestures emit.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// A project instance placed on a resource's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
}

/// One scheduled person/machine/room with its projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub projects: Vec<Tile>,
}

/// Calendar date and hour that grid column 0 represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridAnchor(NaiveDateTime);

impl GridAnchor {
    #[must_use]
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// `month` is 1-based.
    pub fn from_ymdh(year: i32, month: u32, day: u32, hour: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .map(Self)
            .ok_or(GridError::InvalidAnchor {
                year,
                month,
                day,
                hour,
            })
    }

    #[must_use]
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for GridAnchor {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

/// Emitted once when a drag over empty grid space is released.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub resource_id: String,
    pub resource_label: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

/// Emitted once when a tile drag changed the tile's geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileChangeResult {
    pub project_id: String,
    pub resource_id: String,
    /// Reserved for dropping a tile onto another resource's row; never set by
    /// the gesture logic.
    pub previous_resource_id: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_rejects_impossible_dates() {
        assert!(GridAnchor::from_ymdh(2024, 2, 30, 0).is_err());
        assert!(GridAnchor::from_ymdh(2024, 1, 1, 24).is_err());
        let anchor = GridAnchor::from_ymdh(2024, 2, 29, 9).unwrap();
        assert_eq!(anchor.datetime().to_string(), "2024-02-29 09:00:00");
    }

    #[test]
    fn resource_json_defaults_optional_fields() {
        let json = r#"{
            "id": "r1",
            "label": "Alice",
            "projects": [
                { "id": "p1", "start_date": "2024-01-01T00:00:00", "end_date": "2024-01-03T00:00:00", "title": "Kickoff" }
            ]
        }"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.projects.len(), 1);
        assert_eq!(resource.projects[0].bg_color, None);
        assert_eq!(resource.projects[0].subtitle, None);
    }
}
