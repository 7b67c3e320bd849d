//! Files exchanged with the placement solver and the renderers.

pub mod dzn;
pub mod preview;
pub mod solution;

pub use dzn::{DznGrids, load_dzn, parse_dzn, save_dzn, to_dzn_string};
pub use preview::{height_level, render_heightmap, render_preview, save_heightmap, save_preview};
pub use solution::{
    Footprint, Placement, RoadConflict, load_solution, parse_solution, road_conflicts,
    save_placements_json,
};
