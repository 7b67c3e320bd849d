pub mod config;
pub mod errors;
pub mod export;
pub mod grid;
pub mod map;
pub mod pathfinding;
pub mod pipeline;
pub mod roads;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

pub use config::GenerationConfig;
pub use errors::{RoadgenError, RoadgenResult};
pub use grid::{Cell, Grid};
pub use map::{ElevationRaster, GeneratedMap, GenerationStats};
pub use pipeline::MapGenerator;
pub use terrain::TerrainClass;
