use super::RoadMask;
use crate::config::GenerationConfig;
use crate::grid::{Cell, Grid};
use crate::terrain::regions::{Bounds, Region};
use tracing::{debug, info};

/// Line positions from `min` to `max` every `spacing` cells, always ending on `max`.
/// A zero spacing yields only the two ends.
fn line_positions(min: usize, max: usize, spacing: usize) -> impl Iterator<Item = usize> {
    let step = if spacing == 0 { (max - min).max(1) } else { spacing };
    let last_on_grid = (max - min) % step == 0;
    (min..=max)
        .step_by(step)
        .chain((!last_on_grid).then_some(max))
}

/// Paint the street grid of one region, never leaving the region's own cells
fn overlay_region(region: &Region, inset: Bounds, spacing: usize, roads: &mut RoadMask) -> usize {
    let outer = region.bounds;
    let mut members = Grid::new(outer.height(), outer.width(), false);
    for cell in &region.cells {
        members[Cell::new(cell.y - outer.min_y, cell.x - outer.min_x)] = true;
    }
    let is_member = |cell: Cell| members[Cell::new(cell.y - outer.min_y, cell.x - outer.min_x)];

    let mut painted = 0;
    for y in line_positions(inset.min_y, inset.max_y, spacing) {
        for x in inset.min_x..=inset.max_x {
            let cell = Cell::new(y, x);
            if is_member(cell) && roads.paint(cell) {
                painted += 1;
            }
        }
    }
    for x in line_positions(inset.min_x, inset.max_x, spacing) {
        for y in inset.min_y..=inset.max_y {
            let cell = Cell::new(y, x);
            if is_member(cell) && roads.paint(cell) {
                painted += 1;
            }
        }
    }
    painted
}

/// Draw local streets inside every large region whose inset bounding box
/// still spans at least one street spacing in both directions.
///
/// Returns how many regions received streets.
pub fn overlay_streets(
    regions: &[Region],
    config: &GenerationConfig,
    roads: &mut RoadMask,
) -> usize {
    let spacing = config.street_spacing;
    let mut overlaid = 0;
    if spacing == 0 {
        debug!("Street spacing is zero, no streets drawn");
        return overlaid;
    }

    for region in regions {
        if region.size() < config.city_min_size {
            continue;
        }
        let Some(inset) = region
            .bounds
            .inset(config.street_inset)
            .filter(|b| b.width() >= spacing && b.height() >= spacing)
        else {
            debug!("Region {} too small for streets", region.id);
            continue;
        };

        let painted = overlay_region(region, inset, spacing, roads);
        debug!("Region {}: {painted} street cells", region.id);
        overlaid += 1;
    }

    info!("Street grid overlaid on {overlaid} regions");
    overlaid
}

/// Global avenue lines every `spacing` rows and columns, offset by half a
/// block, painted only on city cells. Returns the number of newly painted cells.
pub fn overlay_avenues(city: &Grid<bool>, spacing: usize, roads: &mut RoadMask) -> usize {
    if spacing == 0 {
        debug!("Avenue spacing is zero, no avenues drawn");
        return 0;
    }
    let start = spacing / 2;
    let mut painted = 0;
    for cell in city.coords() {
        let on_row = cell.y >= start && (cell.y - start) % spacing == 0;
        let on_column = cell.x >= start && (cell.x - start) % spacing == 0;
        if (on_row || on_column) && city[cell] && roads.paint(cell) {
            painted += 1;
        }
    }
    info!("Avenue grid painted {painted} cells");
    painted
}
