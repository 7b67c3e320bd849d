//! Terrain analysis: classes from elevation, buildable areas, traversal
//! costs, and connected regions.

pub mod buildable;
pub mod classify;
pub mod constants;
pub mod cost;
pub mod regions;

pub use buildable::{BuildableAreas, analyze_buildable};
pub use classify::{TerrainClass, classify_terrain};
pub use cost::CostField;
pub use regions::{Bounds, Region, find_regions};
