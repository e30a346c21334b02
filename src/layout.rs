//! Stacks each resource's tiles into rows and places them on the grid.

use chrono::NaiveDateTime;

use crate::geometry::GridGeometry;
use crate::mapping::{date_range_to_geometry, TileGeometry};
use crate::model::{GridAnchor, Resource, Tile};
use crate::rows;
use crate::zoom::{time_unit, ZoomLevel};

/// A tile with the row and rectangle it occupies for the current render.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub tile: Tile,
    pub resource_id: String,
    pub resource_index: usize,
    pub row: usize,
    pub geometry: TileGeometry,
}

/// Everything a render pass and the gesture arbiter need about row placement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLayout {
    /// Rows occupied by each resource, in resource order.
    pub row_spans: Vec<usize>,
    pub tiles: Vec<PlacedTile>,
}

impl GridLayout {
    pub fn build(
        resources: &[Resource],
        zoom: ZoomLevel,
        anchor: GridAnchor,
        geometry: &GridGeometry,
    ) -> Self {
        let mut layout = GridLayout::default();
        for (resource_index, resource) in resources.iter().enumerate() {
            let lanes = stack_lanes(&resource.projects);
            let span = lanes.iter().max().map_or(1, |lane| lane + 1);
            let first_row = rows::first_row(resource_index, &layout.row_spans);
            for (tile, lane) in resource.projects.iter().zip(lanes) {
                let row = first_row + lane;
                layout.tiles.push(PlacedTile {
                    tile: tile.clone(),
                    resource_id: resource.id.clone(),
                    resource_index,
                    row,
                    geometry: geometry_for_range(
                        tile.start_date,
                        tile.end_date,
                        anchor,
                        zoom,
                        row,
                        geometry,
                    ),
                });
            }
            layout.row_spans.push(span);
        }
        layout
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        rows::total_rows(&self.row_spans)
    }

    /// Topmost tile containing the grid-local point.
    #[must_use]
    pub fn tile_at(&self, x: f64, y: f64, row_height: f64) -> Option<&PlacedTile> {
        self.tiles.iter().rev().find(|placed| {
            let g = placed.geometry;
            x >= g.x && x < g.right() && y >= g.y && y < g.y + row_height
        })
    }

    #[must_use]
    pub fn find(&self, project_id: &str) -> Option<&PlacedTile> {
        self.tiles.iter().find(|placed| placed.tile.id == project_id)
    }
}

/// Rectangle for `[start, end]` at `zoom` on `row_index`.
#[must_use]
pub fn geometry_for_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    anchor: GridAnchor,
    zoom: ZoomLevel,
    row_index: usize,
    geometry: &GridGeometry,
) -> TileGeometry {
    let unit = time_unit(zoom, geometry);
    date_range_to_geometry(
        start,
        end,
        anchor.datetime(),
        unit.unit,
        unit.cell_width,
        row_index,
        geometry.row_height,
    )
}

/// Lane index for every tile, in input order, so that tiles sharing a lane
/// never overlap. Ranges are end-inclusive.
#[must_use]
pub fn stack_lanes(tiles: &[Tile]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tiles.len()).collect();
    order.sort_by_key(|&i| (tiles[i].start_date, tiles[i].end_date));

    let mut lane_ends: Vec<NaiveDateTime> = Vec::new();
    let mut lanes = vec![0; tiles.len()];
    for i in order {
        let tile = &tiles[i];
        let lane = match lane_ends.iter().position(|end| *end < tile.start_date) {
            Some(lane) => lane,
            None => {
                lane_ends.push(tile.end_date);
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = tile.end_date;
        lanes[i] = lane;
    }
    lanes
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

    fn tile(id: &str, start: u32, end: u32) -> Tile {
        Tile {
            id: id.into(),
            start_date: day(start),
            end_date: day(end),
            title: id.into(),
            subtitle: None,
            description: None,
            bg_color: None,
        }
    }

    fn resource(id: &str, projects: Vec<Tile>) -> Resource {
        Resource {
            id: id.into(),
            label: id.to_uppercase(),
            projects,
        }
    }

    #[test]
    fn overlapping_tiles_get_separate_lanes() {
        let tiles = [tile("a", 1, 3), tile("b", 3, 4), tile("c", 5, 6)];
        assert_eq!(stack_lanes(&tiles), vec![0, 1, 0]);
    }

    #[test]
    fn lanes_follow_start_order_not_input_order() {
        let tiles = [tile("late", 4, 5), tile("early", 1, 2)];
        assert_eq!(stack_lanes(&tiles), vec![0, 0]);
    }

    #[test]
    fn empty_resource_still_takes_one_row() {
        let resources = [
            resource("a", vec![tile("p1", 1, 3), tile("p2", 2, 2)]),
            resource("b", vec![]),
            resource("c", vec![tile("p3", 1, 1)]),
        ];
        let anchor = GridAnchor::new(day(1));
        let layout = GridLayout::build(&resources, ZoomLevel::Day, anchor, &GridGeometry::default());
        assert_eq!(layout.row_spans, vec![2, 1, 1]);
        assert_eq!(layout.total_rows(), 4);
        assert_eq!(layout.find("p2").unwrap().row, 1);
        assert_eq!(layout.find("p3").unwrap().row, 3);
        assert_eq!(layout.find("p3").unwrap().geometry.y, 3.0 * 56.0);
    }

    #[test]
    fn hit_test_respects_row_and_extent() {
        let resources = [resource("a", vec![tile("p1", 2, 3)])];
        let anchor = GridAnchor::new(day(1));
        let geometry = GridGeometry::default();
        let layout = GridLayout::build(&resources, ZoomLevel::Day, anchor, &geometry);
        assert_eq!(layout.tile_at(50.0, 10.0, geometry.row_height).map(|t| t.tile.id.as_str()), Some("p1"));
        assert!(layout.tile_at(150.0, 10.0, geometry.row_height).is_none());
        assert!(layout.tile_at(60.0, 60.0, geometry.row_height).is_none());
    }
}
