//! Coordinate mapping and drag gestures for a resource scheduling timeline.
//!
//! Resources are laid out as rows, time as columns whose width and calendar
//! unit depend on the [`ZoomLevel`]. The crate converts between pixels and
//! dates, resolves stacked rows back to resources, and runs the two pointer
//! gestures of the grid: drag-to-select on empty space and move/resize of
//! existing tiles. Rendering and event delivery belong to the host, which
//! talks to the [`GridController`] through [`PointerEvent`]s and a
//! [`HostSurface`].

pub mod capture;
pub mod context;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mapping;
pub mod model;
pub mod pointer;
pub mod rows;
pub mod selection;
pub mod tile_drag;
pub mod zoom;

pub use capture::{CaptureHandle, HostSurface};
pub use context::GridContext;
pub use controller::{ClickOutcome, Emission, GridController, GridView};
pub use error::{GridError, Result};
pub use geometry::{GridBounds, GridGeometry};
pub use layout::{geometry_for_range, GridLayout, PlacedTile};
pub use mapping::TileGeometry;
pub use model::{GridAnchor, Resource, SelectionResult, Tile, TileChangeResult};
pub use pointer::{Cursor, PointerButton, PointerEvent};
pub use zoom::{time_unit, CalendarUnit, TimeUnit, ZoomLevel};
