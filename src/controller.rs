//! Single owner of pointer gestures on one grid.
//!
//! At most one gesture runs at a time. A press landing on a tile always
//! belongs to the tile machine; only presses on empty grid space reach the
//! selection machine. Presses arriving while a gesture is active are dropped.

use std::rc::Rc;

use tracing::debug;

use crate::capture::{CaptureHandle, HostSurface};
use crate::context::GridContext;
use crate::geometry::{GridBounds, GridGeometry};
use crate::layout::GridLayout;
use crate::mapping::TileGeometry;
use crate::model::{GridAnchor, Resource, SelectionResult, TileChangeResult};
use crate::pointer::{PointerButton, PointerEvent};
use crate::selection::SelectionGesture;
use crate::tile_drag::{Ghost, TileGesture};
use crate::zoom::ZoomLevel;

/// Per-render inputs supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub zoom: ZoomLevel,
    pub anchor: GridAnchor,
    pub resources: &'a [Resource],
    pub layout: &'a GridLayout,
}

/// Notification for the host. The controller never applies it itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    GridSelect(SelectionResult),
    TileChange(TileChangeResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Forward the click to the tile's click handler.
    Activated,
    /// The click trails a drag and must be swallowed.
    Suppressed,
}

#[derive(Debug)]
enum ActiveGesture {
    Selection(SelectionGesture),
    Tile {
        gesture: TileGesture,
        capture: CaptureHandle,
    },
}

pub struct GridController {
    surface: Rc<dyn HostSurface>,
    geometry: GridGeometry,
    bounds: Option<GridBounds>,
    active: Option<ActiveGesture>,
    suppress_next_click: bool,
}

impl std::fmt::Debug for GridController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridController")
            .field("bounds", &self.bounds)
            .field("active", &self.active)
            .field("suppress_next_click", &self.suppress_next_click)
            .finish()
    }
}

impl GridController {
    #[must_use]
    pub fn new(surface: Rc<dyn HostSurface>, geometry: GridGeometry) -> Self {
        Self {
            surface,
            geometry,
            bounds: None,
            active: None,
            suppress_next_click: false,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Replaces the layout constants. Pixel positions of a running gesture are
    /// meaningless afterwards, so it is torn down first.
    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.teardown();
        self.geometry = geometry;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Routes one pointer event to the owning gesture.
    pub fn handle(&mut self, event: &PointerEvent, view: &GridView<'_>) -> Option<Emission> {
        match *event {
            PointerEvent::Down { x, y, button } => {
                self.press(x, y, button, event, view);
                None
            }
            PointerEvent::Move { .. } | PointerEvent::Up { .. } => self.route(event, view),
        }
    }

    /// Re-reads the grid rectangle after the host window changed size.
    pub fn resize(&mut self) {
        let bounds = self.surface.grid_bounds();
        debug!(?bounds, "grid bounds refreshed");
        self.bounds = Some(bounds);
    }

    /// Ends any gesture without emitting, restoring host capture state.
    pub fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(?active, "gesture torn down");
        }
        self.suppress_next_click = false;
    }

    /// Consumes the one-shot suppression left behind by a tile drag.
    pub fn click(&mut self) -> ClickOutcome {
        if std::mem::take(&mut self.suppress_next_click) {
            ClickOutcome::Suppressed
        } else {
            ClickOutcome::Activated
        }
    }

    /// Rectangle of the in-progress grid selection.
    #[must_use]
    pub fn selection_overlay(&self) -> Option<TileGeometry> {
        match &self.active {
            Some(ActiveGesture::Selection(gesture)) => gesture.overlay(self.geometry.row_height),
            _ => None,
        }
    }

    /// Project id and ghost of the tile being dragged.
    #[must_use]
    pub fn ghost(&self) -> Option<(&str, Ghost)> {
        match &self.active {
            Some(ActiveGesture::Tile { gesture, .. }) => gesture
                .session()
                .map(|session| (session.project_id.as_str(), session.ghost)),
            _ => None,
        }
    }

    fn press(
        &mut self,
        x: f64,
        y: f64,
        button: PointerButton,
        event: &PointerEvent,
        view: &GridView<'_>,
    ) {
        if self.active.is_some() {
            debug!("press ignored, gesture already active");
            return;
        }
        let bounds = self.surface.grid_bounds();
        self.bounds = Some(bounds);
        let ctx = context(&self.geometry, view, bounds);

        let (local_x, local_y) = bounds.to_local(x, y);
        if let Some(placed) = view.layout.tile_at(local_x, local_y, self.geometry.row_height) {
            if button != PointerButton::Primary {
                return;
            }
            let gesture = TileGesture::press(placed, x, &ctx);
            let Some(session) = gesture.session() else {
                return;
            };
            let capture = CaptureHandle::acquire(self.surface.clone(), session.mode.cursor());
            self.suppress_next_click = false;
            self.active = Some(ActiveGesture::Tile { gesture, capture });
            return;
        }

        let (gesture, _) = SelectionGesture::Idle.step(event, &ctx);
        if gesture.is_active() {
            self.active = Some(ActiveGesture::Selection(gesture));
        }
    }

    fn route(&mut self, event: &PointerEvent, view: &GridView<'_>) -> Option<Emission> {
        let active = self.active.take()?;
        let ctx = context(&self.geometry, view, self.bounds.unwrap_or_default());
        match active {
            ActiveGesture::Selection(gesture) => {
                let (next, result) = gesture.step(event, &ctx);
                if next.is_active() {
                    self.active = Some(ActiveGesture::Selection(next));
                }
                result.map(Emission::GridSelect)
            }
            ActiveGesture::Tile { gesture, capture } => match gesture.step(event, &ctx) {
                (_, Some(release)) => {
                    capture.release();
                    self.suppress_next_click = release.suppress_click;
                    release.change.map(Emission::TileChange)
                }
                (next, None) => {
                    self.active = Some(ActiveGesture::Tile {
                        gesture: next,
                        capture,
                    });
                    None
                }
            },
        }
    }
}

fn context<'a>(
    geometry: &'a GridGeometry,
    view: &GridView<'a>,
    bounds: GridBounds,
) -> GridContext<'a> {
    GridContext {
        geometry,
        zoom: view.zoom,
        anchor: view.anchor,
        resources: view.resources,
        layout: view.layout,
        bounds,
    }
}
