//! Zoom levels and the calendar unit each one steps by.

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::geometry::GridGeometry;

/// Granularity of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ZoomLevel {
    Week,
    Day,
    Hour,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 3] = [ZoomLevel::Week, ZoomLevel::Day, ZoomLevel::Hour];

    /// Next finer level, saturating at hour view.
    #[must_use]
    pub fn zoom_in(self) -> Self {
        match self {
            ZoomLevel::Week => ZoomLevel::Day,
            ZoomLevel::Day | ZoomLevel::Hour => ZoomLevel::Hour,
        }
    }

    /// Next coarser level, saturating at week view.
    #[must_use]
    pub fn zoom_out(self) -> Self {
        match self {
            ZoomLevel::Hour => ZoomLevel::Day,
            ZoomLevel::Day | ZoomLevel::Week => ZoomLevel::Week,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Week => "week",
            ZoomLevel::Day => "day",
            ZoomLevel::Hour => "hour",
        }
    }
}

impl TryFrom<u8> for ZoomLevel {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ZoomLevel::Week),
            1 => Ok(ZoomLevel::Day),
            2 => Ok(ZoomLevel::Hour),
            other => Err(GridError::InvalidZoom(other)),
        }
    }
}

impl From<ZoomLevel> for u8 {
    fn from(zoom: ZoomLevel) -> Self {
        match zoom {
            ZoomLevel::Week => 0,
            ZoomLevel::Day => 1,
            ZoomLevel::Hour => 2,
        }
    }
}

/// Calendar step used for cell arithmetic.
///
/// `Month` is never produced by a zoom level but keeps the arithmetic honest
/// about variable-length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl CalendarUnit {
    /// Adds `amount` units to `date`. `None` on calendar overflow.
    #[must_use]
    pub fn add(self, date: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
        match self {
            CalendarUnit::Hour => date.checked_add_signed(Duration::try_hours(amount)?),
            CalendarUnit::Day => date.checked_add_signed(Duration::try_days(amount)?),
            CalendarUnit::Week => date.checked_add_signed(Duration::try_weeks(amount)?),
            CalendarUnit::Month => {
                let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
                if amount >= 0 {
                    date.checked_add_months(months)
                } else {
                    date.checked_sub_months(months)
                }
            }
        }
    }

    /// Whole units from `from` to `to`, truncated toward zero.
    #[must_use]
    pub fn between(self, from: NaiveDateTime, to: NaiveDateTime) -> i64 {
        let delta = to - from;
        match self {
            CalendarUnit::Hour => delta.num_hours(),
            CalendarUnit::Day => delta.num_days(),
            CalendarUnit::Week => delta.num_weeks(),
            CalendarUnit::Month => {
                let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
                    - i64::from(from.month());
                // Step back when the day/time of month has not been reached yet.
                if months > 0 && self.add(from, months).map_or(true, |d| d > to) {
                    months -= 1;
                } else if months < 0 && self.add(from, months).map_or(true, |d| d < to) {
                    months += 1;
                }
                months
            }
        }
    }
}

/// Width of one grid cell and the calendar span it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnit {
    pub cell_width: f64,
    pub unit: CalendarUnit,
}

/// Resolves the cell width and calendar unit for a zoom level.
#[must_use]
pub fn time_unit(zoom: ZoomLevel, geometry: &GridGeometry) -> TimeUnit {
    let unit = match zoom {
        ZoomLevel::Week => CalendarUnit::Week,
        ZoomLevel::Day => CalendarUnit::Day,
        ZoomLevel::Hour => CalendarUnit::Hour,
    };
    TimeUnit {
        cell_width: geometry.cell_width(zoom),
        unit,
    }
}
