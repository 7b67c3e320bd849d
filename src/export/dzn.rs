//! Solver data files: `int: W`, `int: H` and `array2d(1..W, 1..H, [...])`
//! blocks. Element `(x, y)` with 1-based coordinates sits at flat index
//! `(x - 1) * H + (y - 1)`, so the values are written column by column.

use crate::errors::{RoadgenError, RoadgenResult};
use crate::grid::{Cell, Grid};
use crate::terrain::TerrainClass;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// Grids read back from a data file
#[derive(Debug, Clone, PartialEq)]
pub struct DznGrids {
    pub terrain: Grid<TerrainClass>,
    /// Absent in files that carry only the terrain block
    pub roads: Option<Grid<bool>>,
}

fn malformed(reason: impl Into<String>) -> RoadgenError {
    RoadgenError::MalformedSolverData {
        reason: reason.into(),
    }
}

fn write_array(
    out: &mut String,
    name: &str,
    height: usize,
    width: usize,
    value: impl Fn(Cell) -> u8,
) {
    let _ = writeln!(
        out,
        "array[1..W, 1..H] of int: {name} = array2d(1..W, 1..H,\n["
    );
    for x in 0..width {
        let column: Vec<String> = (0..height)
            .map(|y| value(Cell::new(y, x)).to_string())
            .collect();
        let separator = if x + 1 < width { "," } else { "" };
        let _ = writeln!(out, "  {}{separator}", column.join(", "));
    }
    out.push_str("]);\n");
}

/// Render terrain codes and the road mask in the solver's text format
pub fn to_dzn_string(terrain: &Grid<TerrainClass>, roads: &Grid<bool>) -> RoadgenResult<String> {
    if !terrain.same_shape(roads) {
        return Err(malformed(format!(
            "Terrain grid {}x{} and road grid {}x{} are not aligned",
            terrain.width(),
            terrain.height(),
            roads.width(),
            roads.height()
        )));
    }

    let (height, width) = (terrain.height(), terrain.width());
    let mut out = String::new();
    let _ = writeln!(out, "int: W = {width};");
    let _ = writeln!(out, "int: H = {height};\n");
    write_array(&mut out, "terrain", height, width, |cell| terrain[cell].id());
    out.push('\n');
    write_array(&mut out, "isRoad", height, width, |cell| u8::from(roads[cell]));
    Ok(out)
}

pub fn save_dzn<P: AsRef<Path>>(
    path: P,
    terrain: &Grid<TerrainClass>,
    roads: &Grid<bool>,
) -> RoadgenResult<()> {
    let path = path.as_ref();
    let contents = to_dzn_string(terrain, roads)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!("Wrote solver data to {}", path.display());
    Ok(())
}

fn read_int(text: &str, name: &str) -> RoadgenResult<usize> {
    let key = format!("int: {name}");
    let start = text
        .find(&key)
        .ok_or_else(|| malformed(format!("Missing '{key}' declaration")))?;
    let rest = &text[start + key.len()..];
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .and_then(|rest| rest.split(';').next())
        .ok_or_else(|| malformed(format!("Malformed '{key}' declaration")))?;
    value.trim().parse().map_err(|_| {
        malformed(format!(
            "'{name}' is not a non-negative integer: '{}'",
            value.trim()
        ))
    })
}

/// Flat values of a named array, or `None` when the file has no such block
fn read_array(text: &str, name: &str, expected: usize) -> RoadgenResult<Option<Vec<u8>>> {
    let key = format!("of int: {name} =");
    let Some(start) = text.find(&key) else {
        return Ok(None);
    };
    let rest = &text[start + key.len()..];
    let open = rest
        .find('[')
        .ok_or_else(|| malformed(format!("No value list for '{name}'")))?;
    let close = rest[open..]
        .find(']')
        .ok_or_else(|| malformed(format!("Unterminated value list for '{name}'")))?;

    let values = rest[open + 1..open + close]
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|_| malformed(format!("Bad value '{token}' in '{name}'")))
        })
        .collect::<RoadgenResult<Vec<u8>>>()?;

    if values.len() != expected {
        return Err(malformed(format!(
            "'{name}' has {} values, expected {expected}",
            values.len()
        )));
    }
    Ok(Some(values))
}

fn column_major<T: Clone>(
    values: &[u8],
    height: usize,
    width: usize,
    fill: T,
    convert: impl Fn(u8) -> RoadgenResult<T>,
) -> RoadgenResult<Grid<T>> {
    let mut grid = Grid::new(height, width, fill);
    for (index, &value) in values.iter().enumerate() {
        let cell = Cell::new(index % height, index / height);
        grid[cell] = convert(value)?;
    }
    Ok(grid)
}

/// Parse a data file written by [`to_dzn_string`] or by the terrain-only tooling
pub fn parse_dzn(text: &str) -> RoadgenResult<DznGrids> {
    let width = read_int(text, "W")?;
    let height = read_int(text, "H")?;
    if width == 0 || height == 0 {
        return Err(malformed(format!("Empty grid {width}x{height}")));
    }

    let terrain_values = read_array(text, "terrain", width * height)?
        .ok_or_else(|| malformed("Missing 'terrain' array"))?;
    let terrain = column_major(&terrain_values, height, width, TerrainClass::Water, |v| {
        TerrainClass::from_id(v).ok_or_else(|| malformed(format!("Unknown terrain code {v}")))
    })?;

    let roads = read_array(text, "isRoad", width * height)?
        .map(|values| {
            column_major(&values, height, width, false, |v| match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(malformed(format!("Road flag must be 0 or 1, got {other}"))),
            })
        })
        .transpose()?;

    Ok(DznGrids { terrain, roads })
}

pub fn load_dzn<P: AsRef<Path>>(path: P) -> RoadgenResult<DznGrids> {
    let text = fs::read_to_string(path)?;
    parse_dzn(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grids() -> (Grid<TerrainClass>, Grid<bool>) {
        // 2 rows, 3 columns
        let terrain = Grid::from_vec(
            2,
            3,
            vec![
                TerrainClass::Water,
                TerrainClass::Plain,
                TerrainClass::Forest,
                TerrainClass::Mountain,
                TerrainClass::Plain,
                TerrainClass::Water,
            ],
        )
        .unwrap();
        let roads = Grid::from_vec(2, 3, vec![false, true, true, false, false, true]).unwrap();
        (terrain, roads)
    }

    #[test]
    fn test_values_are_written_column_by_column() {
        let (terrain, roads) = sample_grids();
        let text = to_dzn_string(&terrain, &roads).unwrap();

        assert!(text.starts_with("int: W = 3;\nint: H = 2;\n"));
        // (x=1, y=1), (x=1, y=2), (x=2, y=1) ...
        assert!(text.contains("terrain = array2d(1..W, 1..H,\n[\n  0, 3,\n  1, 1,\n  2, 0\n]);"));
        assert!(text.contains("isRoad = array2d(1..W, 1..H,\n[\n  0, 0,\n  1, 0,\n  1, 1\n]);"));
    }

    #[test]
    fn test_parse_written_file() {
        let (terrain, roads) = sample_grids();
        let text = to_dzn_string(&terrain, &roads).unwrap();

        let parsed = parse_dzn(&text).unwrap();
        assert_eq!(parsed.terrain, terrain);
        assert_eq!(parsed.roads, Some(roads));
    }

    #[test]
    fn test_parse_terrain_only_file() {
        let text = "int: W = 2;\nint: H = 2;\n\n\
                    array[1..W, 1..H] of int: terrain = array2d(1..W, 1..H,\n\
                    [\n  0, 1, 2, 3\n]);\n";
        let parsed = parse_dzn(text).unwrap();

        assert!(parsed.roads.is_none());
        assert_eq!(parsed.terrain[Cell::new(1, 0)], TerrainClass::Plain);
        assert_eq!(parsed.terrain[Cell::new(0, 1)], TerrainClass::Forest);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_dzn("int: H = 2;").is_err());

        let wrong_length = "int: W = 2;\nint: H = 2;\n\
                            array[1..W, 1..H] of int: terrain = array2d(1..W, 1..H, [0, 1, 2]);";
        assert!(matches!(
            parse_dzn(wrong_length),
            Err(RoadgenError::MalformedSolverData { .. })
        ));

        let bad_code = "int: W = 1;\nint: H = 1;\n\
                        array[1..W, 1..H] of int: terrain = array2d(1..W, 1..H, [7]);";
        assert!(parse_dzn(bad_code).is_err());
    }

    #[test]
    fn test_misaligned_grids_rejected() {
        let terrain = Grid::new(2, 2, TerrainClass::Plain);
        let roads = Grid::new(2, 3, false);
        assert!(to_dzn_string(&terrain, &roads).is_err());
    }
}
