use crate::grid::Grid;
use crate::map::ElevationRaster;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Discrete terrain class, ordered by elevation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
pub enum TerrainClass {
    #[display("water")]
    Water,
    #[display("plain")]
    Plain,
    #[display("forest")]
    Forest,
    #[display("mountain")]
    Mountain,
}

// Indexed by `TerrainClass::id`
const PALETTE: [[u8; 3]; 4] = [
    [51, 102, 255],  // water
    [255, 230, 51],  // plain
    [51, 204, 51],   // forest
    [179, 179, 179], // mountain
];

impl TerrainClass {
    pub const ALL: [TerrainClass; 4] = [
        TerrainClass::Water,
        TerrainClass::Plain,
        TerrainClass::Forest,
        TerrainClass::Mountain,
    ];

    /// Integer code used by the solver input (0 = water .. 3 = mountain)
    pub const fn id(self) -> u8 {
        match self {
            TerrainClass::Water => 0,
            TerrainClass::Plain => 1,
            TerrainClass::Forest => 2,
            TerrainClass::Mountain => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Plains and forests can carry roads and buildings
    pub const fn is_traversable(self) -> bool {
        matches!(self, TerrainClass::Plain | TerrainClass::Forest)
    }

    pub const fn color(self) -> [u8; 3] {
        PALETTE[self.id() as usize]
    }
}

/// Empirical quantile with linear interpolation between order statistics.
/// `sorted` must be non-empty and ascending.
pub fn quantile(sorted: &[f32], q: f32) -> f32 {
    let last = sorted.len() - 1;
    let position = q.clamp(0.0, 1.0) as f64 * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = (position - lower as f64) as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// The three elevation cut points for the given quantile fractions
pub fn elevation_thresholds(raster: &ElevationRaster, quantiles: [f32; 3]) -> [f32; 3] {
    let mut sorted: Vec<f32> = raster.samples().to_vec();
    sorted.sort_by(f32::total_cmp);
    quantiles.map(|q| quantile(&sorted, q))
}

fn bucket(value: f32, [t1, t2, t3]: [f32; 3]) -> TerrainClass {
    if value < t1 {
        TerrainClass::Water
    } else if value < t2 {
        TerrainClass::Plain
    } else if value < t3 {
        TerrainClass::Forest
    } else {
        TerrainClass::Mountain
    }
}

/// Map every elevation sample to a terrain class.
///
/// A perfectly flat raster has no distribution to split; it is treated as one
/// open plain. A raster that differs in a single sample is split normally, so
/// its top quantile (usually everything) lands on mountain instead.
pub fn classify_terrain(raster: &ElevationRaster, quantiles: [f32; 3]) -> Grid<TerrainClass> {
    let (min, max) = raster.min_max();
    if min == max {
        debug!("Flat raster at elevation {min}, classifying everything as plain");
        return raster.grid().map(|_| TerrainClass::Plain);
    }

    let thresholds = elevation_thresholds(raster, quantiles);
    debug!(
        "Elevation thresholds: water < {:.3} <= plain < {:.3} <= forest < {:.3} <= mountain",
        thresholds[0], thresholds[1], thresholds[2]
    );
    raster.grid().map(|&value| bucket(value, thresholds))
}
