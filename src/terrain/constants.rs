//! Constants for the road generation pipeline

/// Elevation quantiles separating water / plain / forest / mountain
pub const DEFAULT_QUANTILES: [f32; 3] = [0.15, 0.50, 0.60];

/// Default values for buildable-area analysis
pub const DEFAULT_BUILDABLE_RADIUS: usize = 15;
pub const DEFAULT_CITY_DILATION_RADIUS: usize = 6;
pub const DEFAULT_CITY_MIN_SIZE: usize = 200;

/// Traversal costs
pub const DEFAULT_PLAIN_COST: f32 = 8.0;
pub const DEFAULT_FOREST_COST: f32 = 12.0;
pub const DEFAULT_WIDE_PLAIN_COST: f32 = 1.5;
pub const DEFAULT_WIDE_FOREST_COST: f32 = 3.5;
pub const DEFAULT_NARROW_PENALTY: f32 = 2.5;
pub const DEFAULT_COAST_TOLERANCE: usize = 2;
pub const DEFAULT_COAST_COST: f32 = 30.0;
pub const IMPASSABLE_COST: f32 = f32::INFINITY;

/// Pathfinding fixed-point scale (cost units per integer step)
pub const ASTAR_COST_SCALE: f32 = 100.0;

/// Road network defaults
pub const DEFAULT_CORRIDOR_MARGIN: usize = 8;
pub const DEFAULT_CORRIDOR_BORDER_WEIGHT: f32 = 0.5;
pub const DEFAULT_CITY_BLOCK_SPACING: usize = 60;
pub const DEFAULT_STREET_SPACING: usize = 44;
pub const DEFAULT_STREET_INSET: usize = 6;
pub const DEFAULT_THICKENING_RADIUS: usize = 2;
