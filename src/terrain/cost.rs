use super::buildable::BuildableAreas;
use super::classify::TerrainClass;
use super::constants::IMPASSABLE_COST;
use crate::config::GenerationConfig;
use crate::grid::{Cell, Grid};
use tracing::info;

/// Per-cell traversal cost plus the mask final roads must stay within
#[derive(Debug, Clone)]
pub struct CostField {
    costs: Grid<f32>,
    coastal: Grid<bool>,
    roadable: Grid<bool>,
}

impl CostField {
    /// Build the cost grid in four passes: base class cost, the wide-area
    /// override, the narrow-strip penalty, then finite coastal crossings.
    pub fn build(
        terrain: &Grid<TerrainClass>,
        areas: &BuildableAreas,
        config: &GenerationConfig,
    ) -> Self {
        let base = |class: TerrainClass| match class {
            TerrainClass::Plain => config.plain_cost,
            TerrainClass::Forest => config.forest_cost,
            TerrainClass::Water | TerrainClass::Mountain => IMPASSABLE_COST,
        };
        let wide_cost = |class: TerrainClass| match class {
            TerrainClass::Plain => config.wide_plain_cost,
            TerrainClass::Forest => config.wide_forest_cost,
            TerrainClass::Water | TerrainClass::Mountain => IMPASSABLE_COST,
        };

        let mut costs = terrain.map(|&class| base(class));
        for cell in terrain.coords() {
            if !areas.traversable[cell] {
                continue;
            }
            if areas.wide[cell] {
                costs[cell] = wide_cost(terrain[cell]);
            } else {
                costs[cell] *= config.narrow_penalty;
            }
        }

        // Impassable cells close to usable land become expensive crossings
        let near_land = areas.traversable.dilate(config.coast_tolerance);
        let coastal = near_land.zip_map(&areas.traversable, |&near, &land| near && !land);
        for cell in terrain.coords() {
            if coastal[cell] {
                costs[cell] = config.coast_cost;
            }
        }
        let roadable = areas.traversable.or(&coastal);

        info!(
            "Cost field: {} roadable cells ({} coastal), {} impassable",
            roadable.count_true(),
            coastal.count_true(),
            roadable.count(|&r| !r)
        );

        Self {
            costs,
            coastal,
            roadable,
        }
    }

    /// Wrap an explicit cost grid; non-finite cells are impassable
    pub fn from_costs(costs: Grid<f32>) -> Self {
        let roadable = costs.map(|c| c.is_finite());
        let coastal = Grid::new(costs.height(), costs.width(), false);
        Self {
            costs,
            coastal,
            roadable,
        }
    }

    pub fn height(&self) -> usize {
        self.costs.height()
    }

    pub fn width(&self) -> usize {
        self.costs.width()
    }

    pub fn cost(&self, cell: Cell) -> f32 {
        self.costs.get(cell).copied().unwrap_or(IMPASSABLE_COST)
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.cost(cell).is_finite()
    }

    pub fn costs(&self) -> &Grid<f32> {
        &self.costs
    }

    pub fn coastal(&self) -> &Grid<bool> {
        &self.coastal
    }

    pub fn roadable(&self) -> &Grid<bool> {
        &self.roadable
    }
}
