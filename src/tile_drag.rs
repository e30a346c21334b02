//! Move and resize of an existing tile.
//!
//! A press on a tile picks a [`DragMode`] from where it landed: within
//! `edge_threshold` of either edge resizes that edge, anywhere else moves the
//! whole tile. Moves update a ghost rectangle in whole-cell steps; release
//! turns the ghost back into dates.
//!
//! Dates are shifted rather than rebuilt from the ghost wherever an edge did
//! not move: a move shifts both dates, a left resize keeps the original end.
//! Tiles whose dates fall inside a cell keep their exact duration that way.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::context::GridContext;
use crate::layout::PlacedTile;
use crate::mapping::TileGeometry;
use crate::model::TileChangeResult;
use crate::pointer::{Cursor, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    Move,
    ResizeLeft,
    ResizeRight,
}

impl DragMode {
    /// Mode for a press at grid-local `pointer_x` on `tile`. The left edge wins
    /// on tiles narrower than twice the threshold.
    #[must_use]
    pub fn detect(pointer_x: f64, tile: &TileGeometry, edge_threshold: f64) -> Self {
        if pointer_x - tile.x <= edge_threshold {
            DragMode::ResizeLeft
        } else if tile.right() - pointer_x <= edge_threshold {
            DragMode::ResizeRight
        } else {
            DragMode::Move
        }
    }

    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            DragMode::Move => Cursor::Grabbing,
            DragMode::ResizeLeft | DragMode::ResizeRight => Cursor::EwResize,
        }
    }
}

/// Provisional horizontal placement while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileDragSession {
    pub mode: DragMode,
    pub project_id: String,
    pub resource_id: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub initial_client_x: f64,
    pub initial: Ghost,
    pub ghost: Ghost,
    /// Set once the pointer travelled past the click tolerance or a whole cell.
    pub moved: bool,
}

/// Outcome of releasing a tile drag.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRelease {
    /// `None` when the ghost ended where it started.
    pub change: Option<TileChangeResult>,
    /// Whether the click that follows this release must be swallowed.
    pub suppress_click: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TileGesture {
    #[default]
    Idle,
    Dragging(TileDragSession),
}

impl TileGesture {
    /// Starts a drag on `placed` at client x `client_x`.
    #[must_use]
    pub fn press(placed: &PlacedTile, client_x: f64, ctx: &GridContext<'_>) -> Self {
        let (local_x, _) = ctx.bounds.to_local(client_x, 0.0);
        let mode = DragMode::detect(local_x, &placed.geometry, ctx.geometry.edge_threshold);
        let initial = Ghost {
            x: placed.geometry.x,
            width: placed.geometry.width,
        };
        debug!(project = %placed.tile.id, ?mode, "tile drag started");
        TileGesture::Dragging(TileDragSession {
            mode,
            project_id: placed.tile.id.clone(),
            resource_id: placed.resource_id.clone(),
            start_date: placed.tile.start_date,
            end_date: placed.tile.end_date,
            initial_client_x: client_x,
            initial,
            ghost: initial,
            moved: false,
        })
    }

    #[must_use]
    pub fn session(&self) -> Option<&TileDragSession> {
        match self {
            TileGesture::Dragging(session) => Some(session),
            TileGesture::Idle => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    /// Advances the machine by one pointer event. Presses are handled by
    /// [`press`](Self::press) and ignored here.
    pub fn step(self, event: &PointerEvent, ctx: &GridContext<'_>) -> (Self, Option<TileRelease>) {
        match (self, *event) {
            (TileGesture::Dragging(mut session), PointerEvent::Move { x, .. }) => {
                drag_to(&mut session, x, ctx);
                (TileGesture::Dragging(session), None)
            }
            (TileGesture::Dragging(session), PointerEvent::Up { .. }) => {
                let release = finish(&session, ctx);
                debug!(
                    project = %session.project_id,
                    changed = release.change.is_some(),
                    suppress_click = release.suppress_click,
                    "tile drag released"
                );
                (TileGesture::Idle, Some(release))
            }
            (state, _) => (state, None),
        }
    }
}

fn drag_to(session: &mut TileDragSession, client_x: f64, ctx: &GridContext<'_>) {
    let cell_width = ctx.time_unit().cell_width;
    let dx = client_x - session.initial_client_x;
    let steps = (dx / cell_width).round();
    let shift = steps * cell_width;
    let initial = session.initial;

    session.ghost = match session.mode {
        DragMode::Move => Ghost {
            x: initial.x + shift,
            width: initial.width,
        },
        DragMode::ResizeLeft => {
            // The left edge stops one cell short of the right edge.
            let shift = shift.min(initial.width - cell_width);
            Ghost {
                x: initial.x + shift,
                width: initial.width - shift,
            }
        }
        DragMode::ResizeRight => Ghost {
            x: initial.x,
            width: (initial.width + shift).max(cell_width),
        },
    };
    if dx.abs() > ctx.geometry.click_tolerance || steps != 0.0 {
        session.moved = true;
    }
    trace!(x = session.ghost.x, width = session.ghost.width, "tile ghost moved");
}

fn finish(session: &TileDragSession, ctx: &GridContext<'_>) -> TileRelease {
    let unit = ctx.time_unit();
    let cells = |pixels: f64| (pixels / unit.cell_width).round() as i64;

    let shift_steps = cells(session.ghost.x - session.initial.x);
    let initial_cells = cells(session.initial.width).max(1);
    let ghost_cells = cells(session.ghost.width).max(1);
    let changed = shift_steps != 0 || ghost_cells != initial_cells;

    let change = if changed {
        let start = unit.unit.add(session.start_date, shift_steps);
        let end = match session.mode {
            DragMode::Move => unit.unit.add(session.end_date, shift_steps),
            DragMode::ResizeLeft => Some(session.end_date),
            DragMode::ResizeRight => start.and_then(|start| unit.unit.add(start, ghost_cells - 1)),
        };
        start.zip(end).map(|(start_date, end_date)| TileChangeResult {
            project_id: session.project_id.clone(),
            resource_id: session.resource_id.clone(),
            previous_resource_id: None,
            start_date,
            end_date,
        })
    } else {
        None
    };

    TileRelease {
        change,
        suppress_click: session.moved || changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_pick_resize_modes() {
        let tile = TileGeometry { x: 100.0, y: 0.0, width: 150.0 };
        assert_eq!(DragMode::detect(104.0, &tile, 8.0), DragMode::ResizeLeft);
        assert_eq!(DragMode::detect(108.0, &tile, 8.0), DragMode::ResizeLeft);
        assert_eq!(DragMode::detect(109.0, &tile, 8.0), DragMode::Move);
        assert_eq!(DragMode::detect(242.0, &tile, 8.0), DragMode::ResizeRight);
        assert_eq!(DragMode::detect(175.0, &tile, 8.0), DragMode::Move);
    }

    #[test]
    fn narrow_tile_prefers_left_edge() {
        let tile = TileGeometry { x: 0.0, y: 0.0, width: 10.0 };
        assert_eq!(DragMode::detect(6.0, &tile, 8.0), DragMode::ResizeLeft);
    }

    #[test]
    fn cursors_match_modes() {
        assert_eq!(DragMode::Move.cursor(), Cursor::Grabbing);
        assert_eq!(DragMode::ResizeRight.cursor(), Cursor::EwResize);
    }
}
