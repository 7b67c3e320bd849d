use cityroads::errors::{RoadgenError, RoadgenResult};
use cityroads::map::ElevationRaster;
use cityroads::terrain_generation::{PRESET_NAMES, get_terrain_preset};
use std::path::PathBuf;
use tracing::info;

/// Where the elevation comes from, and how it is resized before use
pub struct RasterSource {
    input: Option<PathBuf>,
    synthetic: Option<String>,
    seed: Option<u32>,
    size: (usize, usize),
    resize: Option<(usize, usize)>,
}

impl Default for RasterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSource {
    pub fn new() -> Self {
        Self {
            input: None,
            synthetic: None,
            seed: None,
            size: (256, 256),
            resize: None,
        }
    }

    pub fn input(mut self, input: Option<PathBuf>) -> Self {
        self.input = input;
        self
    }

    pub fn synthetic(mut self, preset: Option<String>) -> Self {
        self.synthetic = preset;
        self
    }

    pub fn seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    /// Synthetic raster size as (width, height)
    pub fn size(mut self, size: (usize, usize)) -> Self {
        self.size = size;
        self
    }

    /// Downsample target as (width, height)
    pub fn resize(mut self, resize: Option<(usize, usize)>) -> Self {
        self.resize = resize;
        self
    }

    pub fn load(self) -> RoadgenResult<ElevationRaster> {
        let raster = match (&self.input, &self.synthetic) {
            (Some(path), None) => {
                info!("Reading elevation from {}", path.display());
                ElevationRaster::load_image(path)?
            }
            (None, Some(preset)) => {
                let generator = get_terrain_preset(preset, self.seed).ok_or_else(|| {
                    RoadgenError::InvalidConfig {
                        reason: format!(
                            "Unknown terrain preset: '{preset}'. Available presets: {}",
                            PRESET_NAMES.join(", ")
                        ),
                    }
                })?;
                let (width, height) = self.size;
                info!("Generating '{preset}' elevation (seed: {})", generator.seed);
                generator.generate(height, width)?
            }
            (Some(_), Some(_)) => {
                return Err(RoadgenError::InvalidConfig {
                    reason: "Use either --input or --synthetic, not both".to_string(),
                });
            }
            (None, None) => {
                return Err(RoadgenError::InvalidConfig {
                    reason: "Missing elevation: pass --input <image> or --synthetic <preset>"
                        .to_string(),
                });
            }
        };

        match self.resize {
            Some((width, height)) => raster.downsample(height, width),
            None => Ok(raster),
        }
    }
}
