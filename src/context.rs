use crate::geometry::{GridBounds, GridGeometry};
use crate::layout::GridLayout;
use crate::model::{GridAnchor, Resource};
use crate::zoom::{time_unit, TimeUnit, ZoomLevel};

/// Read-only view of one grid render, handed to the gesture machines with
/// every event.
#[derive(Debug, Clone, Copy)]
pub struct GridContext<'a> {
    pub geometry: &'a GridGeometry,
    pub zoom: ZoomLevel,
    pub anchor: GridAnchor,
    pub resources: &'a [Resource],
    pub layout: &'a GridLayout,
    /// Bounding rectangle cached for the current gesture.
    pub bounds: GridBounds,
}

impl GridContext<'_> {
    #[must_use]
    pub fn time_unit(&self) -> TimeUnit {
        time_unit(self.zoom, self.geometry)
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.layout.total_rows()
    }
}
