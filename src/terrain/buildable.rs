use super::classify::TerrainClass;
use crate::config::GenerationConfig;
use crate::grid::{Grid, WindowCounter};
use tracing::info;

/// Masks describing where roads and dense districts can go
#[derive(Debug, Clone)]
pub struct BuildableAreas {
    pub traversable: Grid<bool>,
    /// Cells whose whole square neighbourhood is traversable
    pub wide: Grid<bool>,
    /// `wide` grown outwards, restricted to traversable terrain
    pub city: Grid<bool>,
}

pub fn traversable_mask(terrain: &Grid<TerrainClass>) -> Grid<bool> {
    terrain.map(|class| class.is_traversable())
}

/// True where the square window of `radius` around a cell, clipped at the
/// borders, holds only traversable cells
pub fn wide_mask(traversable: &Grid<bool>, radius: usize) -> Grid<bool> {
    let counter = WindowCounter::new(traversable);
    let mut wide = Grid::new(traversable.height(), traversable.width(), false);
    for cell in traversable.coords() {
        wide[cell] = counter.count(cell, radius) == counter.window_area(cell, radius);
    }
    wide
}

pub fn city_mask(wide: &Grid<bool>, traversable: &Grid<bool>, radius: usize) -> Grid<bool> {
    wide.dilate(radius).and(traversable)
}

pub fn analyze_buildable(
    terrain: &Grid<TerrainClass>,
    config: &GenerationConfig,
) -> BuildableAreas {
    let traversable = traversable_mask(terrain);
    let wide = wide_mask(&traversable, config.buildable_radius);
    let city = city_mask(&wide, &traversable, config.city_dilation_radius);

    info!(
        "Buildable analysis: {} traversable, {} wide, {} city cells",
        traversable.count_true(),
        wide.count_true(),
        city.count_true()
    );

    BuildableAreas {
        traversable,
        wide,
        city,
    }
}
