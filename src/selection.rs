//! Drag-to-select over empty grid space.
//!
//! `Idle --Down(primary)--> Dragging --Move--> Dragging --Up--> Idle`
//!
//! The selection is pinned to the row under the initial press; vertical
//! pointer travel never changes it. Release emits one [`SelectionResult`]
//! covering the snapped horizontal extent, end-inclusive.

use tracing::{debug, trace};

use crate::context::GridContext;
use crate::mapping::{cell_index_to_date, pixel_to_cell_index, snap_to_grid_x, TileGeometry};
use crate::model::SelectionResult;
use crate::pointer::{PointerButton, PointerEvent};
use crate::rows::{resolve_resource, resolve_row};

/// Transient state between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Snapped grid-local x of the press.
    pub origin_x: f64,
    /// Raw client y of the press.
    pub origin_y: f64,
    /// Snapped grid-local x of the latest move.
    pub current_x: f64,
    pub origin_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionGesture {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl SelectionGesture {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, SelectionGesture::Dragging(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            SelectionGesture::Dragging(session) => Some(session),
            SelectionGesture::Idle => None,
        }
    }

    /// Advances the machine by one pointer event.
    pub fn step(
        self,
        event: &PointerEvent,
        ctx: &GridContext<'_>,
    ) -> (Self, Option<SelectionResult>) {
        let cell_width = ctx.time_unit().cell_width;
        match (self, *event) {
            (SelectionGesture::Idle, PointerEvent::Down { x, y, button }) => {
                if button != PointerButton::Primary {
                    return (SelectionGesture::Idle, None);
                }
                let (local_x, local_y) = ctx.bounds.to_local(x, y);
                let origin_x = snap_to_grid_x(local_x, cell_width);
                let origin_row = resolve_row(local_y, ctx.geometry.row_height, ctx.total_rows());
                debug!(origin_x, origin_row, "selection started");
                let session = DragSession {
                    origin_x,
                    origin_y: y,
                    current_x: origin_x,
                    origin_row,
                };
                (SelectionGesture::Dragging(session), None)
            }
            (SelectionGesture::Dragging(mut session), PointerEvent::Move { x, .. }) => {
                let (local_x, _) = ctx.bounds.to_local(x, 0.0);
                session.current_x = snap_to_grid_x(local_x, cell_width);
                trace!(current_x = session.current_x, "selection moved");
                (SelectionGesture::Dragging(session), None)
            }
            (SelectionGesture::Dragging(session), PointerEvent::Up { x, .. }) => {
                let (local_x, _) = ctx.bounds.to_local(x, 0.0);
                let end_x = snap_to_grid_x(local_x, cell_width);
                let result = finish(&session, end_x, ctx);
                debug!(emitted = result.is_some(), "selection released");
                (SelectionGesture::Idle, result)
            }
            (state, _) => (state, None),
        }
    }

    /// Rectangle to draw for the in-progress selection, one row tall.
    #[must_use]
    pub fn overlay(&self, row_height: f64) -> Option<TileGeometry> {
        let session = self.session()?;
        Some(TileGeometry {
            x: session.origin_x.min(session.current_x),
            y: session.origin_row as f64 * row_height,
            width: (session.current_x - session.origin_x).abs(),
        })
    }
}

fn finish(session: &DragSession, end_x: f64, ctx: &GridContext<'_>) -> Option<SelectionResult> {
    let resource_index = resolve_resource(session.origin_row, &ctx.layout.row_spans)?;
    let resource = ctx.resources.get(resource_index)?;

    let unit = ctx.time_unit();
    let left = session.origin_x.min(end_x);
    let right = session.origin_x.max(end_x);
    let start_index = pixel_to_cell_index(left, unit.cell_width);
    let end_index = (pixel_to_cell_index(right, unit.cell_width) - 1).max(start_index);

    let anchor = ctx.anchor.datetime();
    Some(SelectionResult {
        resource_id: resource.id.clone(),
        resource_label: resource.label.clone(),
        start_date: cell_index_to_date(start_index, anchor, unit.unit)?,
        end_date: cell_index_to_date(end_index, anchor, unit.unit)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GridBounds, GridGeometry};
    use crate::layout::GridLayout;
    use crate::model::{GridAnchor, Resource};
    use crate::zoom::ZoomLevel;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn resources() -> Vec<Resource> {
        ["alice", "bob"]
            .into_iter()
            .map(|id| Resource {
                id: id.into(),
                label: id.to_uppercase(),
                projects: vec![],
            })
            .collect()
    }

    fn run(events: &[PointerEvent], layout: &GridLayout, resources: &[Resource]) -> Vec<SelectionResult> {
        let geometry = GridGeometry::default();
        let ctx = GridContext {
            geometry: &geometry,
            zoom: ZoomLevel::Day,
            anchor: GridAnchor::new(day(1)),
            resources,
            layout,
            bounds: GridBounds::new(10.0, 20.0, 1000.0, 112.0),
        };
        let mut state = SelectionGesture::Idle;
        let mut out = Vec::new();
        for event in events {
            let (next, emitted) = state.step(event, &ctx);
            state = next;
            out.extend(emitted);
        }
        assert!(!state.is_active());
        out
    }

    fn spans(row_spans: Vec<usize>) -> GridLayout {
        GridLayout {
            row_spans,
            tiles: vec![],
        }
    }

    #[test]
    fn one_cell_drag_is_a_single_inclusive_day() {
        let resources = resources();
        let out = run(
            &[
                PointerEvent::Down { x: 10.0, y: 30.0, button: PointerButton::Primary },
                PointerEvent::Up { x: 60.0, y: 30.0 },
            ],
            &spans(vec![1, 1]),
            &resources,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_date, day(1));
        assert_eq!(out[0].end_date, day(1));
        assert_eq!(out[0].resource_id, "alice");
    }

    #[test]
    fn right_to_left_drag_is_normalized() {
        let resources = resources();
        let out = run(
            &[
                PointerEvent::Down { x: 210.0, y: 90.0, button: PointerButton::Primary },
                PointerEvent::Move { x: 120.0, y: 10.0 },
                PointerEvent::Up { x: 60.0, y: 10.0 },
            ],
            &spans(vec![1, 1]),
            &resources,
        );
        assert_eq!(out[0].resource_label, "BOB");
        assert_eq!(out[0].start_date, day(2));
        assert_eq!(out[0].end_date, day(4));
    }

    #[test]
    fn secondary_button_never_starts() {
        let resources = resources();
        let out = run(
            &[
                PointerEvent::Down { x: 10.0, y: 30.0, button: PointerButton::Secondary },
                PointerEvent::Up { x: 200.0, y: 30.0 },
            ],
            &spans(vec![1, 1]),
            &resources,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn no_resources_emits_nothing() {
        let out = run(
            &[
                PointerEvent::Down { x: 10.0, y: 30.0, button: PointerButton::Primary },
                PointerEvent::Up { x: 200.0, y: 30.0 },
            ],
            &spans(vec![]),
            &[],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn overlay_stays_on_origin_row() {
        let geometry = GridGeometry::default();
        let layout = spans(vec![1, 1]);
        let resources = resources();
        let ctx = GridContext {
            geometry: &geometry,
            zoom: ZoomLevel::Day,
            anchor: GridAnchor::new(day(1)),
            resources: &resources,
            layout: &layout,
            bounds: GridBounds::default(),
        };
        let (state, _) = SelectionGesture::Idle.step(
            &PointerEvent::Down { x: 160.0, y: 70.0, button: PointerButton::Primary },
            &ctx,
        );
        let (state, _) = state.step(&PointerEvent::Move { x: 40.0, y: 5.0 }, &ctx);
        assert_eq!(
            state.overlay(geometry.row_height),
            Some(TileGeometry { x: 50.0, y: 56.0, width: 100.0 })
        );
    }
}
