use crate::errors::RoadgenResult;
use crate::grid::{Cell, Grid};
use crate::terrain::TerrainClass;
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::Path;
use tracing::info;

pub const ROAD_COLOR: [u8; 3] = [51, 51, 51];

/// Heightmap gray level per class: water sits low, mountains high
pub const fn height_level(class: TerrainClass) -> u8 {
    match class {
        TerrainClass::Water => 10,
        TerrainClass::Plain => 80,
        TerrainClass::Forest => 90,
        TerrainClass::Mountain => 240,
    }
}

/// Terrain colours with roads drawn on top, one pixel per cell
pub fn render_preview(terrain: &Grid<TerrainClass>, roads: &Grid<bool>) -> RgbImage {
    RgbImage::from_fn(terrain.width() as u32, terrain.height() as u32, |x, y| {
        let cell = Cell::new(y as usize, x as usize);
        if roads.get(cell).copied().unwrap_or(false) {
            Rgb(ROAD_COLOR)
        } else {
            Rgb(terrain[cell].color())
        }
    })
}

/// 8-bit heightmap with one flat level per terrain class, one pixel per cell
pub fn render_heightmap(terrain: &Grid<TerrainClass>) -> GrayImage {
    GrayImage::from_fn(terrain.width() as u32, terrain.height() as u32, |x, y| {
        Luma([height_level(terrain[Cell::new(y as usize, x as usize)])])
    })
}

pub fn save_heightmap<P: AsRef<Path>>(
    path: P,
    terrain: &Grid<TerrainClass>,
) -> RoadgenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    render_heightmap(terrain).save(path)?;
    info!("Saved heightmap to {}", path.display());
    Ok(())
}

pub fn save_preview<P: AsRef<Path>>(
    path: P,
    terrain: &Grid<TerrainClass>,
    roads: &Grid<bool>,
) -> RoadgenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    render_preview(terrain, roads).save(path)?;
    info!("Saved preview to {}", path.display());
    Ok(())
}
