//! Scoped pointer capture for tile drags.
//!
//! A tile drag must keep tracking the pointer after it leaves the tile, so the
//! host routes window-wide move/up events to the grid, hides text selection
//! and shows a drag cursor. [`CaptureHandle`] owns that host state: dropping
//! it restores everything, whichever way the gesture ends.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::geometry::GridBounds;
use crate::pointer::Cursor;

/// What the gesture layer needs from the embedding UI.
///
/// Methods take `&self`; implementations keep their own interior mutability
/// since the grid is driven from a single event loop.
pub trait HostSurface {
    /// Current bounding rectangle of the grid surface. May be expensive.
    fn grid_bounds(&self) -> GridBounds;

    /// Starts or stops delivering pointer events from outside the tile.
    fn set_window_listeners(&self, attached: bool);

    fn set_cursor(&self, cursor: Cursor);

    fn set_text_selection(&self, enabled: bool);
}

/// Live capture; released exactly once, on [`release`](Self::release) or drop.
pub struct CaptureHandle {
    surface: Rc<dyn HostSurface>,
    released: bool,
}

impl CaptureHandle {
    pub fn acquire(surface: Rc<dyn HostSurface>, cursor: Cursor) -> Self {
        surface.set_text_selection(false);
        surface.set_cursor(cursor);
        surface.set_window_listeners(true);
        debug!(?cursor, "pointer captured");
        Self {
            surface,
            released: false,
        }
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.surface.set_window_listeners(false);
        self.surface.set_cursor(Cursor::Default);
        self.surface.set_text_selection(true);
        debug!("pointer released");
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureHandle")
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeSurface {
        listeners: Cell<i32>,
        cursor: Cell<Cursor>,
        selectable: Cell<bool>,
    }

    impl HostSurface for FakeSurface {
        fn grid_bounds(&self) -> GridBounds {
            GridBounds::default()
        }

        fn set_window_listeners(&self, attached: bool) {
            self.listeners.set(self.listeners.get() + if attached { 1 } else { -1 });
        }

        fn set_cursor(&self, cursor: Cursor) {
            self.cursor.set(cursor);
        }

        fn set_text_selection(&self, enabled: bool) {
            self.selectable.set(enabled);
        }
    }

    #[test]
    fn drop_restores_host_state() {
        let surface = Rc::new(FakeSurface::default());
        {
            let _handle = CaptureHandle::acquire(surface.clone(), Cursor::Grabbing);
            assert_eq!(surface.listeners.get(), 1);
            assert_eq!(surface.cursor.get(), Cursor::Grabbing);
            assert!(!surface.selectable.get());
        }
        assert_eq!(surface.listeners.get(), 0);
        assert_eq!(surface.cursor.get(), Cursor::Default);
        assert!(surface.selectable.get());
    }

    #[test]
    fn explicit_release_runs_once() {
        let surface = Rc::new(FakeSurface::default());
        let handle = CaptureHandle::acquire(surface.clone(), Cursor::EwResize);
        handle.release();
        assert_eq!(surface.listeners.get(), 0);
    }
}
