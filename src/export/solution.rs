//! Building placements reported by the solver and their clash with roads.

use crate::errors::{RoadgenError, RoadgenResult};
use crate::grid::{Cell, Grid};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One placed building; coordinates are 1-based like the solver's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: usize,
    #[serde(rename = "type_id")]
    pub building_type: usize,
    pub x: usize,
    pub y: usize,
    /// Service radius, present for building types that have one
    pub radius: Option<usize>,
}

/// Extent of a building type in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadConflict {
    pub id: usize,
    /// Road cells under the part of the footprint inside the map
    pub road_cells: usize,
    /// The footprint misses the map entirely
    pub outside: bool,
}

fn parse_line(line: &str) -> Option<Placement> {
    let mut id = None;
    let mut building_type = None;
    let mut x = None;
    let mut y = None;
    let mut radius = None;

    for token in line.split_whitespace() {
        let (key, value) = token.split_once('=')?;
        let value: usize = value.parse().ok()?;
        match key {
            "b" => id = Some(value),
            "type" => building_type = Some(value),
            "x" => x = Some(value),
            "y" => y = Some(value),
            "r" => radius = Some(value),
            _ => return None,
        }
    }

    Some(Placement {
        id: id?,
        building_type: building_type?,
        x: x?,
        y: y?,
        radius,
    })
}

/// Parse lines of the form `b=<id> type=<t> x=<x> y=<y> [r=<r>]`.
///
/// Blank lines, separator lines starting with `-` and anything that does not
/// match the pattern are skipped.
pub fn parse_solution(text: &str) -> Vec<Placement> {
    let mut placements = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }
        match parse_line(line) {
            Some(placement) => placements.push(placement),
            None => debug!("Skipping solution line {}: '{line}'", number + 1),
        }
    }
    placements
}

pub fn load_solution<P: AsRef<Path>>(path: P) -> RoadgenResult<Vec<Placement>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let placements = parse_solution(&text);
    if placements.is_empty() && !text.trim().is_empty() {
        return Err(RoadgenError::MalformedSolverData {
            reason: format!("No building placements found in {}", path.display()),
        });
    }
    Ok(placements)
}

/// Write placements as a JSON array of `{id, type_id, x, y, radius}` records
pub fn save_placements_json<P: AsRef<Path>>(
    path: P,
    placements: &[Placement],
) -> RoadgenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(placements)?;
    fs::write(path, json)?;
    info!("Saved {} placements to {}", placements.len(), path.display());
    Ok(())
}

/// Zero-based half-open span of `extent` cells starting at 1-based `start`,
/// clipped to `0..limit`
fn clip_span(start: usize, extent: usize, limit: usize) -> (usize, usize) {
    let first = start as i64 - 1;
    let lo = first.clamp(0, limit as i64) as usize;
    let hi = (first + extent as i64).clamp(0, limit as i64) as usize;
    (lo, hi)
}

/// Buildings whose footprint covers road cells or lies off the map.
///
/// A footprint spans `width` columns from `x` and `height` rows from `y`,
/// clipped at the map border. Placements of a type without a footprint are
/// ignored.
pub fn road_conflicts(
    placements: &[Placement],
    footprints: &[Footprint],
    roads: &Grid<bool>,
) -> Vec<RoadConflict> {
    let mut conflicts = Vec::new();

    for placement in placements {
        let Some(footprint) = footprints.get(placement.building_type) else {
            debug!(
                "No footprint for type {} of building {}",
                placement.building_type, placement.id
            );
            continue;
        };

        let (x0, x_end) = clip_span(placement.x, footprint.width, roads.width());
        let (y0, y_end) = clip_span(placement.y, footprint.height, roads.height());
        if x0 >= x_end || y0 >= y_end {
            conflicts.push(RoadConflict {
                id: placement.id,
                road_cells: 0,
                outside: true,
            });
            continue;
        }

        let road_cells = (y0..y_end)
            .flat_map(|y| (x0..x_end).map(move |x| Cell::new(y, x)))
            .filter(|&cell| roads[cell])
            .count();
        if road_cells > 0 {
            conflicts.push(RoadConflict {
                id: placement.id,
                road_cells,
                outside: false,
            });
        }
    }

    if !conflicts.is_empty() {
        warn!("{} of {} buildings clash with roads", conflicts.len(), placements.len());
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: usize, building_type: usize, x: usize, y: usize) -> Placement {
        Placement {
            id,
            building_type,
            x,
            y,
            radius: None,
        }
    }

    fn conflict(id: usize, road_cells: usize, outside: bool) -> RoadConflict {
        RoadConflict {
            id,
            road_cells,
            outside,
        }
    }

    #[test]
    fn test_parse_solution_lines() {
        let text = "b=1 type=0 x=12 y=7 r=2\n\
                    \n\
                    ----------\n\
                    b=2 type=3 x=1 y=1\n\
                    garbage here\n\
                    b=3 type=x x=1 y=1\n\
                    ==========\n";
        let placements = parse_solution(text);

        assert_eq!(placements.len(), 2);
        assert_eq!(
            placements[0],
            Placement {
                id: 1,
                building_type: 0,
                x: 12,
                y: 7,
                radius: Some(2)
            }
        );
        assert_eq!(placements[1].radius, None);
        assert_eq!(placements[1].building_type, 3);
    }

    #[test]
    fn test_placements_json_records() {
        let placements = [
            Placement {
                radius: Some(3),
                ..placed(1, 2, 5, 6)
            },
            placed(2, 0, 1, 1),
        ];
        let path = std::env::temp_dir().join(format!(
            "cityroads_placements_{}.json",
            std::process::id()
        ));

        save_placements_json(&path, &placements).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let records: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            records,
            serde_json::json!([
                {"id": 1, "type_id": 2, "x": 5, "y": 6, "radius": 3},
                {"id": 2, "type_id": 0, "x": 1, "y": 1, "radius": null},
            ])
        );
        let loaded: Vec<Placement> = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, placements);
    }

    #[test]
    fn test_road_conflicts() {
        let mut roads = Grid::new(6, 6, false);
        for x in 0..6 {
            roads[Cell::new(2, x)] = true;
        }
        let footprints = [
            Footprint {
                width: 2,
                height: 2,
            },
            Footprint {
                width: 3,
                height: 1,
            },
        ];
        let placements = [
            // Rows 1-2 in 1-based terms: clear of the road on row 3
            placed(1, 0, 1, 1),
            // Covers rows 2-3, two road cells
            placed(2, 0, 4, 2),
            // Clipped at the right border, one road cell
            placed(3, 1, 6, 3),
            placed(4, 0, 9, 9),
            // Unknown type
            placed(5, 7, 1, 3),
        ];

        let conflicts = road_conflicts(&placements, &footprints, &roads);

        assert_eq!(
            conflicts,
            vec![
                conflict(2, 2, false),
                conflict(3, 1, false),
                conflict(4, 0, true),
            ]
        );
    }

    #[test]
    fn test_footprint_clipped_at_zero_coordinate() {
        let mut roads = Grid::new(4, 4, false);
        roads[Cell::new(0, 0)] = true;
        let footprints = [Footprint {
            width: 3,
            height: 3,
        }];
        // x = 0 reaches one column past the left border; the rest still overlaps
        let placements = [placed(1, 0, 0, 1), placed(2, 0, 2, 0)];

        let conflicts = road_conflicts(&placements, &footprints, &roads);

        assert_eq!(conflicts, vec![conflict(1, 1, false)]);
    }
}
