use clap::Parser;
use cityroads::config::{load_config, load_config_from, save_config};
use cityroads::errors::RoadgenResult;
use cityroads::export::{
    load_solution, save_dzn, save_heightmap, save_placements_json, save_preview,
};
use cityroads::map::GeneratedMap;
use cityroads::pipeline::MapGenerator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod mapgen {
    pub mod cli_utils;
    pub mod raster_source;
}

use mapgen::cli_utils::*;
use mapgen::raster_source::RasterSource;

#[derive(Parser, Clone)]
#[command(name = "mapgen")]
#[command(about = "Classify an elevation map and lay out its road network")]
struct Args {
    /// Map name
    #[arg(long, default_value = "generated_map")]
    name: String,

    /// Grayscale elevation image
    #[arg(long)]
    input: Option<PathBuf>,

    /// Synthetic elevation preset (flat, hills, islands) instead of an image
    #[arg(long)]
    synthetic: Option<String>,

    /// Synthetic raster size in cells (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "256x256")]
    size: String,

    /// Random seed for reproducible synthetic elevation
    #[arg(long)]
    seed: Option<u32>,

    /// Downsample the elevation to this size before classifying (format: WIDTHxHEIGHT)
    #[arg(long)]
    resize: Option<String>,

    /// Generation config file; defaults to the user config if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the elevation quantiles (format: Q1,Q2,Q3)
    #[arg(long)]
    quantiles: Option<String>,

    /// Solver data file to write
    #[arg(long)]
    output: Option<PathBuf>,

    /// Colour preview image to write
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Grayscale heightmap image to write, one level per terrain class
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Binary map file to write
    #[arg(long)]
    save: Option<PathBuf>,

    /// Solver placement output to convert (lines of `b=<id> type=<t> x=<x> y=<y> [r=<r>]`)
    #[arg(long)]
    solution: Option<PathBuf>,

    /// JSON file to write the solver placements to; requires --solution
    #[arg(long, requires = "solution")]
    json_output: Option<PathBuf>,

    /// Store the effective generation config as the user default
    #[arg(long)]
    save_config: bool,
}

fn main() -> RoadgenResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    // Parse and validate all CLI arguments
    let size = parse_size(&args.size)?;
    let resize = args.resize.as_deref().map(parse_size).transpose()?;
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    if let Some(quantiles) = &args.quantiles {
        config.quantiles = parse_quantiles(quantiles)?;
    }
    let config = config.validated()?;
    if args.save_config {
        save_config(&config)?;
    }

    let raster = RasterSource::new()
        .input(args.input.clone())
        .synthetic(args.synthetic.clone())
        .seed(args.seed)
        .size(size)
        .resize(resize)
        .load()?;

    let map = MapGenerator::generate(&args.name, &raster, &config)?;

    if let Some(path) = &args.output {
        save_dzn(path, &map.terrain, &map.roads)?;
    }
    if let Some(path) = &args.preview {
        save_preview(path, &map.terrain, &map.roads)?;
    }
    if let Some(path) = &args.heightmap {
        save_heightmap(path, &map.terrain)?;
    }
    if let Some(path) = &args.save {
        map.save_to_file(path)?;
    }
    if let (Some(solution), Some(path)) = (&args.solution, &args.json_output) {
        let placements = load_solution(solution)?;
        save_placements_json(path, &placements)?;
    }

    print_map_summary(&map, &args);
    Ok(())
}

fn print_map_summary(map: &GeneratedMap, args: &Args) {
    let stats = &map.stats;
    let total = map.width() * map.height();

    println!("\nMap summary:");
    println!("  Name: {}", map.name);
    println!("  Grid: {}x{} ({total} cells)", map.width(), map.height());
    println!(
        "  Traversable: {} cells, wide: {}, city: {}, coastal: {}",
        stats.traversable_cells, stats.wide_cells, stats.city_cells, stats.coastal_cells
    );
    println!(
        "  Regions: {} found, {} large enough for a city",
        stats.regions_found, stats.qualifying_regions
    );
    println!(
        "  Roads: {} paths drawn, {} connections failed, {} street grids",
        stats.paths_drawn, stats.failed_connections, stats.streets_overlaid
    );
    println!(
        "  Road cells: {} painted, {} after thickening",
        stats.painted_cells, stats.road_cells
    );

    for region in &map.regions {
        println!(
            "    Region {}: {} cells, centroid={}, anchor={}",
            region.id,
            region.size(),
            region.centroid,
            region.anchor
        );
    }

    for (label, path) in [
        ("Solver data", &args.output),
        ("Preview", &args.preview),
        ("Heightmap", &args.heightmap),
        ("Map file", &args.save),
        ("Placements JSON", &args.json_output),
    ] {
        if let Some(path) = path {
            println!("  {label} written to: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_integration() {
        // Integration test to ensure modules work together
        let args = Args::parse_from([
            "mapgen",
            "--synthetic",
            "islands",
            "--size",
            "48x32",
            "--seed",
            "12345",
            "--quantiles",
            "0.2,0.5,0.7",
        ]);

        let (width, height) = parse_size(&args.size).unwrap();
        assert_eq!((width, height), (48, 32));

        let mut config = cityroads::GenerationConfig {
            buildable_radius: 2,
            city_min_size: 20,
            ..Default::default()
        };
        config.quantiles = parse_quantiles(args.quantiles.as_deref().unwrap()).unwrap();
        let config = config.validated().unwrap();

        let raster = RasterSource::new()
            .synthetic(args.synthetic.clone())
            .seed(args.seed)
            .size((width, height))
            .load()
            .unwrap();
        let map = MapGenerator::generate(&args.name, &raster, &config).unwrap();

        assert_eq!(map.width(), 48);
        assert_eq!(map.height(), 32);
        assert_eq!(map.name, "generated_map");
    }

    #[test]
    fn test_json_output_requires_solution() {
        let result = Args::try_parse_from([
            "mapgen",
            "--synthetic",
            "flat",
            "--json-output",
            "placements.json",
        ]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "mapgen",
            "--synthetic",
            "flat",
            "--solution",
            "solution.txt",
            "--json-output",
            "placements.json",
            "--heightmap",
            "height.png",
        ])
        .unwrap();
        assert_eq!(args.json_output, Some(PathBuf::from("placements.json")));
        assert_eq!(args.heightmap, Some(PathBuf::from("height.png")));
    }
}
