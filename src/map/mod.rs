use crate::errors::{RoadgenError, RoadgenResult};
use crate::grid::{Cell, Grid};
use crate::roads::RoadPath;
use crate::terrain::classify::TerrainClass;
use crate::terrain::regions::Region;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Scalar elevation samples, one per cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationRaster {
    grid: Grid<f32>,
}

/// Everything a generation run produces, aligned on the raster's grid
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GeneratedMap {
    #[validate(length(min = 1))]
    pub name: String,
    pub terrain: Grid<TerrainClass>,
    pub roads: Grid<bool>,
    /// Regions that passed the minimum size filter
    pub regions: Vec<Region>,
    pub paths: Vec<RoadPath>,
    pub stats: GenerationStats,
}

/// Cell counts gathered along the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub traversable_cells: usize,
    pub wide_cells: usize,
    pub city_cells: usize,
    pub coastal_cells: usize,
    pub regions_found: usize,
    pub qualifying_regions: usize,
    pub paths_drawn: usize,
    pub failed_connections: usize,
    pub streets_overlaid: usize,
    pub painted_cells: usize,
    pub road_cells: usize,
}

impl ElevationRaster {
    /// Create a raster from row-major samples with validation
    pub fn new(height: usize, width: usize, samples: Vec<f32>) -> RoadgenResult<Self> {
        if height == 0 || width == 0 {
            return Err(RoadgenError::InvalidRaster {
                reason: format!("Raster dimensions must be non-zero, got {width}x{height}"),
            });
        }
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(RoadgenError::InvalidRaster {
                reason: format!("Sample {index} is not a finite number"),
            });
        }
        let grid = Grid::from_vec(height, width, samples)?;
        Ok(Self { grid })
    }

    /// Create a flat raster for testing
    pub fn flat(height: usize, width: usize, elevation: f32) -> RoadgenResult<Self> {
        Self::new(height, width, vec![elevation; height * width])
    }

    /// Read 8-bit luminance values from a decoded grayscale image
    pub fn from_luma(image: &GrayImage) -> RoadgenResult<Self> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let samples = image.pixels().map(|p| f32::from(p.0[0])).collect();
        Self::new(height, width, samples)
    }

    /// Decode an image file and convert it to grayscale elevation
    pub fn load_image<P: AsRef<Path>>(path: P) -> RoadgenResult<Self> {
        let image = image::open(path)?.to_luma8();
        Self::from_luma(&image)
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn grid(&self) -> &Grid<f32> {
        &self.grid
    }

    pub fn samples(&self) -> &[f32] {
        self.grid.as_slice()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.samples()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Reduce to `width` x `height` by averaging equal-sized blocks.
    /// Leftover rows and columns past the last whole block are ignored.
    pub fn downsample(&self, height: usize, width: usize) -> RoadgenResult<Self> {
        if height == 0 || width == 0 || height > self.height() || width > self.width() {
            return Err(RoadgenError::InvalidRaster {
                reason: format!(
                    "Cannot downsample {}x{} to {width}x{height}",
                    self.width(),
                    self.height()
                ),
            });
        }

        let block_h = self.height() / height;
        let block_w = self.width() / width;
        let block_area = (block_h * block_w) as f32;
        let mut samples = Vec::with_capacity(height * width);

        for j in 0..height {
            for i in 0..width {
                let mut sum = 0.0f32;
                for y in j * block_h..(j + 1) * block_h {
                    for x in i * block_w..(i + 1) * block_w {
                        sum += self.grid[Cell::new(y, x)];
                    }
                }
                samples.push(sum / block_area);
            }
        }

        Self::new(height, width, samples)
    }
}

impl GeneratedMap {
    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    fn validate_map(&self) -> RoadgenResult<()> {
        self.validate().map_err(|_| RoadgenError::CorruptedMapFile {
            reason: "Map validation failed".to_string(),
        })?;
        if !self.terrain.same_shape(&self.roads) {
            return Err(RoadgenError::CorruptedMapFile {
                reason: format!(
                    "Terrain grid {}x{} and road grid {}x{} are not aligned",
                    self.terrain.width(),
                    self.terrain.height(),
                    self.roads.width(),
                    self.roads.height()
                ),
            });
        }
        Ok(())
    }

    /// Load a map from a bincode file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> RoadgenResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RoadgenError::MapFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path)?;
        let (map, _): (GeneratedMap, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(|e| {
                RoadgenError::CorruptedMapFile {
                    reason: format!("Failed to deserialize map data: {e}"),
                }
            })?;

        map.validate_map()?;
        Ok(map)
    }

    /// Save the map as a bincode file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> RoadgenResult<()> {
        self.validate_map()?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data =
            bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
                RoadgenError::CorruptedMapFile {
                    reason: format!("Failed to serialize map: {e}"),
                }
            })?;

        std::fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_raster_creation() {
        let raster = ElevationRaster::new(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.samples().len(), 4);
        assert_eq!(raster.min_max(), (0.0, 3.0));
    }

    #[test]
    fn test_raster_invalid_size() {
        assert!(ElevationRaster::new(2, 2, vec![0.0, 1.0, 2.0]).is_err());
        assert!(ElevationRaster::new(0, 3, vec![]).is_err());
    }

    #[test]
    fn test_raster_rejects_nan() {
        let result = ElevationRaster::new(1, 2, vec![0.0, f32::NAN]);
        assert!(matches!(result, Err(RoadgenError::InvalidRaster { .. })));
    }

    #[test]
    fn test_from_luma_is_row_major() {
        let mut image = GrayImage::new(3, 2);
        image.put_pixel(2, 0, Luma([200]));
        image.put_pixel(0, 1, Luma([50]));

        let raster = ElevationRaster::from_luma(&image).unwrap();
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.grid()[Cell::new(0, 2)], 200.0);
        assert_eq!(raster.grid()[Cell::new(1, 0)], 50.0);
    }

    #[test]
    fn test_downsample_block_mean() {
        let samples = vec![
            0.0, 2.0, 10.0, 10.0, //
            2.0, 4.0, 20.0, 20.0, //
            1.0, 1.0, 5.0, 7.0, //
            1.0, 1.0, 5.0, 7.0,
        ];
        let raster = ElevationRaster::new(4, 4, samples).unwrap();
        let small = raster.downsample(2, 2).unwrap();

        assert_eq!(small.samples(), &[2.0, 15.0, 1.0, 6.0]);
        assert!(raster.downsample(8, 2).is_err());
        assert!(raster.downsample(0, 2).is_err());
    }

    #[test]
    fn test_map_file_roundtrip() {
        let terrain = Grid::new(3, 4, TerrainClass::Plain);
        let mut roads = Grid::new(3, 4, false);
        roads[Cell::new(1, 2)] = true;
        let map = GeneratedMap {
            name: "roundtrip".to_string(),
            terrain,
            roads,
            regions: vec![],
            paths: vec![],
            stats: GenerationStats::default(),
        };

        let path = std::env::temp_dir().join(format!("cityroads_map_{}.bin", std::process::id()));
        map.save_to_file(&path).unwrap();
        let loaded = GeneratedMap::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.name, "roundtrip");
        assert_eq!(loaded.roads, map.roads);
        assert_eq!(loaded.terrain, map.terrain);
    }

    #[test]
    fn test_missing_map_file() {
        let result = GeneratedMap::load_from_file("/no/such/dir/map.bin");
        assert!(matches!(result, Err(RoadgenError::MapFileNotFound { .. })));
    }
}
