//! Pixel offsets to calendar dates and back.
//!
//! All pixel values are relative to the grid origin (left edge of column 0,
//! top edge of row 0). Cell widths must be positive.

use chrono::NaiveDateTime;

use crate::zoom::CalendarUnit;

/// Placement of a tile or selection on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl TileGeometry {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Rounds to the nearest cell boundary, never left of the grid origin.
#[must_use]
pub fn snap_to_grid_x(pixel_x: f64, cell_width: f64) -> f64 {
    debug_assert!(cell_width > 0.0, "cell width must be positive");
    ((pixel_x / cell_width).round() * cell_width).max(0.0)
}

#[must_use]
pub fn pixel_to_cell_index(pixel_x: f64, cell_width: f64) -> i64 {
    debug_assert!(cell_width > 0.0, "cell width must be positive");
    (pixel_x / cell_width).round() as i64
}

/// Date of the cell `index` units after `anchor`. `None` on calendar overflow.
#[must_use]
pub fn cell_index_to_date(
    index: i64,
    anchor: NaiveDateTime,
    unit: CalendarUnit,
) -> Option<NaiveDateTime> {
    unit.add(anchor, index)
}

/// Geometry of the end-inclusive range `[start, end]` on row `row_index`.
#[must_use]
pub fn date_range_to_geometry(
    start: NaiveDateTime,
    end: NaiveDateTime,
    anchor: NaiveDateTime,
    unit: CalendarUnit,
    cell_width: f64,
    row_index: usize,
    row_height: f64,
) -> TileGeometry {
    debug_assert!(cell_width > 0.0, "cell width must be positive");
    let offset = unit.between(anchor, start);
    let cells = unit.between(start, end).max(0) + 1;
    TileGeometry {
        x: offset as f64 * cell_width,
        y: row_index as f64 * row_height,
        width: cells as f64 * cell_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn snap_rounds_to_nearest_boundary() {
        assert_eq!(snap_to_grid_x(24.0, 50.0), 0.0);
        assert_eq!(snap_to_grid_x(25.0, 50.0), 50.0);
        assert_eq!(snap_to_grid_x(130.0, 50.0), 150.0);
    }

    #[test]
    fn snap_clamps_left_of_origin() {
        assert_eq!(snap_to_grid_x(-80.0, 50.0), 0.0);
    }

    #[test]
    fn snap_is_idempotent_on_boundaries() {
        let snapped = snap_to_grid_x(137.0, 84.0);
        assert_eq!(snap_to_grid_x(snapped, 84.0), snapped);
    }

    #[test]
    fn cell_index_rounds() {
        assert_eq!(pixel_to_cell_index(0.0, 50.0), 0);
        assert_eq!(pixel_to_cell_index(74.0, 50.0), 1);
        assert_eq!(pixel_to_cell_index(76.0, 50.0), 2);
        assert_eq!(pixel_to_cell_index(-60.0, 50.0), -1);
    }

    #[test]
    fn cell_index_to_date_adds_units() {
        assert_eq!(cell_index_to_date(4, day(1), CalendarUnit::Day), Some(day(5)));
        assert_eq!(cell_index_to_date(1, day(1), CalendarUnit::Week), Some(day(8)));
    }

    #[test]
    fn single_day_range_is_one_cell_wide() {
        let geometry = date_range_to_geometry(day(3), day(3), day(1), CalendarUnit::Day, 50.0, 2, 56.0);
        assert_eq!(geometry, TileGeometry { x: 100.0, y: 112.0, width: 50.0 });
    }

    #[test]
    fn range_width_is_end_inclusive() {
        let geometry = date_range_to_geometry(day(1), day(3), day(1), CalendarUnit::Day, 50.0, 0, 56.0);
        assert_eq!(geometry.width, 150.0);
        assert_eq!(geometry.right(), 150.0);
    }

    #[test]
    fn range_before_anchor_has_negative_x() {
        let geometry = date_range_to_geometry(day(1), day(2), day(3), CalendarUnit::Day, 50.0, 0, 56.0);
        assert_eq!(geometry.x, -100.0);
        assert_eq!(geometry.width, 100.0);
    }
}
