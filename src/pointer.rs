//! Host-independent pointer input.
//!
//! Hosts translate their native mouse or touch events into [`PointerEvent`]s
//! in client coordinates; the gesture machines never see the native types.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64, button: PointerButton },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

impl PointerEvent {
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        match *self {
            PointerEvent::Down { x, y, .. } | PointerEvent::Move { x, y } | PointerEvent::Up { x, y } => {
                (x, y)
            }
        }
    }
}

/// Cursor shown by the host while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grabbing,
    EwResize,
}
