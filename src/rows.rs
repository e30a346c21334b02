//! Vertical offsets to visible rows, and visible rows to owning resources.

/// Row under `pixel_y`, clamped into `[0, total_rows - 1]`.
///
/// Returns 0 for an empty grid.
#[must_use]
pub fn resolve_row(pixel_y: f64, row_height: f64, total_rows: usize) -> usize {
    debug_assert!(row_height > 0.0, "row height must be positive");
    if total_rows == 0 {
        return 0;
    }
    let row = (pixel_y / row_height).floor();
    if row <= 0.0 {
        0
    } else {
        (row as usize).min(total_rows - 1)
    }
}

/// Resource owning visible row `row_index`, given each resource's row count.
///
/// A row past the end of the table resolves to the last resource. This keeps
/// gestures inert on a stale table but can hide a caller that forgot to refresh
/// its spans. `None` only when there are no resources at all.
#[must_use]
pub fn resolve_resource(row_index: usize, row_spans: &[usize]) -> Option<usize> {
    let mut rows_seen = 0;
    for (resource, span) in row_spans.iter().enumerate() {
        rows_seen += span;
        if row_index < rows_seen {
            return Some(resource);
        }
    }
    row_spans.len().checked_sub(1)
}

/// First visible row of `resource_index`.
#[must_use]
pub fn first_row(resource_index: usize, row_spans: &[usize]) -> usize {
    row_spans.iter().take(resource_index).sum()
}

#[must_use]
pub fn total_rows(row_spans: &[usize]) -> usize {
    row_spans.iter().sum()
}
