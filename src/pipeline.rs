//! End-to-end generation: elevation in, terrain and road grids out.

use crate::config::GenerationConfig;
use crate::errors::RoadgenResult;
use crate::grid::Grid;
use crate::map::{ElevationRaster, GeneratedMap, GenerationStats};
use crate::roads::{RoadMask, RoadNetworkBuilder, overlay_avenues, overlay_streets};
use crate::terrain::{
    CostField, Region, TerrainClass, analyze_buildable, classify_terrain, find_regions,
};
use tracing::info;

pub struct MapGenerator;

impl MapGenerator {
    /// Run every stage on an elevation raster. Parameters are validated
    /// before any grid work starts.
    pub fn generate(
        name: &str,
        raster: &ElevationRaster,
        config: &GenerationConfig,
    ) -> RoadgenResult<GeneratedMap> {
        config.check()?;
        info!(
            "Generating map '{name}' from {}x{} raster",
            raster.width(),
            raster.height()
        );
        let terrain = classify_terrain(raster, config.quantiles);
        Self::generate_from_terrain(name, terrain, config)
    }

    /// Run the stages that follow terrain classification
    pub fn generate_from_terrain(
        name: &str,
        terrain: Grid<TerrainClass>,
        config: &GenerationConfig,
    ) -> RoadgenResult<GeneratedMap> {
        config.check()?;
        let mut stats = GenerationStats::default();

        let areas = analyze_buildable(&terrain, config);
        stats.traversable_cells = areas.traversable.count_true();
        stats.wide_cells = areas.wide.count_true();
        stats.city_cells = areas.city.count_true();

        let field = CostField::build(&terrain, &areas, config);
        stats.coastal_cells = field.coastal().count_true();

        let all_regions = find_regions(&areas.city);
        stats.regions_found = all_regions.len();
        let regions: Vec<Region> = all_regions
            .into_iter()
            .filter(|region| region.size() >= config.city_min_size)
            .collect();
        stats.qualifying_regions = regions.len();
        info!(
            "{} of {} regions reach {} cells",
            regions.len(),
            stats.regions_found,
            config.city_min_size
        );

        let mut roads = RoadMask::new(terrain.height(), terrain.width());
        let centers: Vec<_> = regions.iter().map(|region| region.anchor).collect();
        let network = RoadNetworkBuilder::new(&field, config).build(&centers, &mut roads);
        stats.paths_drawn = network.paths.len();
        stats.failed_connections = network.failed_connections;

        stats.streets_overlaid = overlay_streets(&regions, config, &mut roads);
        if config.avenue_grid {
            overlay_avenues(&areas.city, config.city_block_spacing, &mut roads);
        }
        stats.painted_cells = roads.count();

        let final_roads = roads.thicken(config.thickening_radius, field.roadable());
        stats.road_cells = final_roads.count_true();

        info!(
            "Map '{name}' done: {} road cells, {} paths, {} failed connections",
            stats.road_cells, stats.paths_drawn, stats.failed_connections
        );

        Ok(GeneratedMap {
            name: name.to_string(),
            terrain,
            roads: final_roads,
            regions,
            paths: network.paths,
            stats,
        })
    }
}
