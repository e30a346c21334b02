//! Fixed layout constants shared by the mapper, the resolvers and the host.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::zoom::ZoomLevel;

/// Layout constants of the grid, in host pixels.
///
/// Deserializes field by field over [`GridGeometry::default`], so a config
/// file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// Height of one stacked row.
    pub row_height: f64,
    /// Width of the resource label column left of the grid.
    pub left_column_width: f64,
    /// Cell width at week zoom.
    pub week_width: f64,
    /// Cell width at day zoom.
    pub day_width: f64,
    /// Cell width at hour zoom.
    pub hour_width: f64,
    /// Distance from a tile edge within which a press resizes instead of moving.
    pub edge_threshold: f64,
    /// Horizontal travel below which a tile press still counts as a click.
    pub click_tolerance: f64,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            row_height: 56.0,
            left_column_width: 196.0,
            week_width: 84.0,
            day_width: 50.0,
            hour_width: 50.0,
            edge_threshold: 8.0,
            click_tolerance: 2.0,
        }
    }
}

impl GridGeometry {
    /// Preset for character-cell hosts where one column is one pixel.
    ///
    /// Hosts using this preset should report pointer positions at the column
    /// centre (`column + 0.5`) so both tile edges get exactly one resize column.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            row_height: 1.0,
            left_column_width: 18.0,
            week_width: 7.0,
            day_width: 4.0,
            hour_width: 3.0,
            edge_threshold: 0.5,
            click_tolerance: 0.0,
        }
    }

    /// Reads a JSON geometry file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let geometry: GridGeometry = serde_json::from_str(&json)?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Rejects non-positive sizes; the mapper treats them as precondition violations.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("row_height", self.row_height),
            ("left_column_width", self.left_column_width),
            ("week_width", self.week_width),
            ("day_width", self.day_width),
            ("hour_width", self.hour_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(GridError::InvalidGeometry { field, value });
            }
        }
        let non_negative = [
            ("edge_threshold", self.edge_threshold),
            ("click_tolerance", self.click_tolerance),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(GridError::InvalidGeometry { field, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn cell_width(&self, zoom: ZoomLevel) -> f64 {
        match zoom {
            ZoomLevel::Week => self.week_width,
            ZoomLevel::Day => self.day_width,
            ZoomLevel::Hour => self.hour_width,
        }
    }
}

/// Bounding rectangle of the grid surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl GridBounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Client coordinates relative to the grid origin.
    #[must_use]
    pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.left, client_y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_web_constants() {
        let geometry = GridGeometry::default();
        assert_eq!(geometry.cell_width(ZoomLevel::Week), 84.0);
        assert_eq!(geometry.cell_width(ZoomLevel::Day), 50.0);
        assert_eq!(geometry.cell_width(ZoomLevel::Hour), 50.0);
        assert_eq!(geometry.row_height, 56.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn terminal_preset_is_valid() {
        assert!(GridGeometry::terminal().validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let geometry: GridGeometry = serde_json::from_str(r#"{ "day_width": 30 }"#).unwrap();
        assert_eq!(geometry.day_width, 30.0);
        assert_eq!(geometry.week_width, 84.0);
    }

    #[test]
    fn zero_width_is_rejected() {
        let geometry = GridGeometry {
            hour_width: 0.0,
            ..GridGeometry::default()
        };
        match geometry.validate() {
            Err(GridError::InvalidGeometry { field, .. }) => assert_eq!(field, "hour_width"),
            other => panic!("expected InvalidGeometry, got {other:?}"),
        }
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let geometry = GridGeometry {
            edge_threshold: f64::NAN,
            ..GridGeometry::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn thresholds_may_be_zero_but_not_negative() {
        let zero = GridGeometry {
            edge_threshold: 0.0,
            click_tolerance: 0.0,
            ..GridGeometry::default()
        };
        assert!(zero.validate().is_ok());

        let negative = GridGeometry {
            click_tolerance: -1.0,
            ..GridGeometry::default()
        };
        let error = negative.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "grid geometry field `click_tolerance` is out of range, got -1"
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let result = GridGeometry::load("/nonexistent/gantt-grid/grid.json");
        assert!(matches!(result, Err(GridError::Io(_))));
    }

    #[test]
    fn bounds_translate_to_local() {
        let bounds = GridBounds::new(100.0, 40.0, 800.0, 600.0);
        assert_eq!(bounds.to_local(150.0, 100.0), (50.0, 60.0));
    }
}
