use crate::errors::RoadgenResult;
use crate::map::ElevationRaster;
use noise::{NoiseFn, Perlin};

/// Preset names accepted by [`get_terrain_preset`]
pub const PRESET_NAMES: [&str; 3] = ["flat", "hills", "islands"];

/// Synthetic elevation algorithms
#[derive(Debug, Clone)]
pub enum ElevationAlgorithm {
    Flat {
        elevation: f32,
    },
    Perlin {
        frequency: f32,
        octaves: u32,
    },
    /// Perlin octaves pulled down towards the borders, leaving land masses
    /// surrounded by low ground
    Islands {
        frequency: f32,
        octaves: u32,
        falloff: f32,
    },
}

/// Seeded generator for elevation rasters without an input image
#[derive(Debug, Clone)]
pub struct SyntheticTerrain {
    pub seed: u32,
    pub algorithm: ElevationAlgorithm,
}

impl SyntheticTerrain {
    pub fn new(seed: u32, algorithm: ElevationAlgorithm) -> Self {
        Self { seed, algorithm }
    }

    /// Generate a `width` x `height` raster. Noise output is rescaled to the
    /// 0..=255 range of an 8-bit heightmap.
    pub fn generate(&self, height: usize, width: usize) -> RoadgenResult<ElevationRaster> {
        let samples = match &self.algorithm {
            ElevationAlgorithm::Flat { elevation } => vec![*elevation; height * width],
            ElevationAlgorithm::Perlin { frequency, octaves } => {
                let perlin = Perlin::new(self.seed);
                let mut samples = Vec::with_capacity(height * width);
                for y in 0..height {
                    for x in 0..width {
                        samples.push(octave_noise(&perlin, x, y, *frequency, *octaves));
                    }
                }
                rescale(samples)
            }
            ElevationAlgorithm::Islands {
                frequency,
                octaves,
                falloff,
            } => {
                let perlin = Perlin::new(self.seed);
                let mut samples = Vec::with_capacity(height * width);
                for y in 0..height {
                    for x in 0..width {
                        let noise = octave_noise(&perlin, x, y, *frequency, *octaves);
                        samples.push(noise - falloff * edge_distance(y, x, height, width));
                    }
                }
                rescale(samples)
            }
        };

        ElevationRaster::new(height, width, samples)
    }
}

fn octave_noise(perlin: &Perlin, x: usize, y: usize, frequency: f32, octaves: u32) -> f32 {
    let world_x = x as f64 * frequency as f64;
    let world_y = y as f64 * frequency as f64;

    let mut noise_value = 0.0;
    let mut amplitude = 1.0;
    let mut current_frequency = 1.0;
    for _ in 0..octaves {
        noise_value +=
            perlin.get([world_x * current_frequency, world_y * current_frequency]) * amplitude;
        amplitude *= 0.5; // Persistence
        current_frequency *= 2.0; // Lacunarity
    }
    noise_value as f32
}

/// Normalized distance from the centre: 0 in the middle, 1 at the corners
fn edge_distance(y: usize, x: usize, height: usize, width: usize) -> f32 {
    let ny = (2.0 * y as f32 / (height.max(2) - 1) as f32) - 1.0;
    let nx = (2.0 * x as f32 / (width.max(2) - 1) as f32) - 1.0;
    ((nx * nx + ny * ny) / 2.0).sqrt()
}

fn rescale(samples: Vec<f32>) -> Vec<f32> {
    let (lo, hi) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    if span <= 0.0 {
        return samples;
    }
    samples.into_iter().map(|v| (v - lo) / span * 255.0).collect()
}

/// Get a predefined elevation preset
pub fn get_terrain_preset(name: &str, seed: Option<u32>) -> Option<SyntheticTerrain> {
    let seed = seed.unwrap_or_else(rand::random);

    match name {
        "flat" => Some(SyntheticTerrain::new(
            seed,
            ElevationAlgorithm::Flat { elevation: 128.0 },
        )),
        "hills" => Some(SyntheticTerrain::new(
            seed,
            ElevationAlgorithm::Perlin {
                frequency: 0.01,
                octaves: 4,
            },
        )),
        "islands" => Some(SyntheticTerrain::new(
            seed,
            ElevationAlgorithm::Islands {
                frequency: 0.015,
                octaves: 5,
                falloff: 1.2,
            },
        )),
        _ => None,
    }
}
