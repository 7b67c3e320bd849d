use crate::grid::{Cell, Grid};
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive bounding rectangle of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_y: usize,
    pub min_x: usize,
    pub max_y: usize,
    pub max_x: usize,
}

impl Bounds {
    fn around(cell: Cell) -> Self {
        Self {
            min_y: cell.y,
            min_x: cell.x,
            max_y: cell.y,
            max_x: cell.x,
        }
    }

    fn include(&mut self, cell: Cell) {
        self.min_y = self.min_y.min(cell.y);
        self.min_x = self.min_x.min(cell.x);
        self.max_y = self.max_y.max(cell.y);
        self.max_x = self.max_x.max(cell.x);
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Shrink every side by `margin`; `None` once the rectangle vanishes
    pub fn inset(&self, margin: usize) -> Option<Bounds> {
        let min_y = self.min_y + margin;
        let min_x = self.min_x + margin;
        let max_y = self.max_y.checked_sub(margin)?;
        let max_x = self.max_x.checked_sub(margin)?;
        (min_y <= max_y && min_x <= max_x).then_some(Bounds {
            min_y,
            min_x,
            max_y,
            max_x,
        })
    }
}

/// A maximal 4-connected blob of true mask cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: usize,
    pub cells: Vec<Cell>,
    /// Truncated mean of member coordinates; may fall outside the region
    pub centroid: Cell,
    /// Member cell closest to the centroid, used as a pathfinding endpoint
    pub anchor: Cell,
    pub bounds: Bounds,
}

impl Region {
    fn from_cells(id: usize, cells: Vec<Cell>) -> Self {
        let count = cells.len();
        let (sum_y, sum_x) = cells
            .iter()
            .fold((0usize, 0usize), |(sy, sx), c| (sy + c.y, sx + c.x));
        let centroid = Cell::new(sum_y / count, sum_x / count);

        let anchor = cells
            .iter()
            .copied()
            .min_by_key(|c| c.manhattan_distance(centroid))
            .unwrap_or(centroid);

        let mut bounds = Bounds::around(cells[0]);
        for &cell in &cells[1..] {
            bounds.include(cell);
        }

        Self {
            id,
            cells,
            centroid,
            anchor,
            bounds,
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Flood-fill every 4-connected component of `mask`, scanning in row-major
/// order. Components of any size are reported.
pub fn find_regions(mask: &Grid<bool>) -> Vec<Region> {
    let (height, width) = (mask.height(), mask.width());
    let mut visited = Grid::new(height, width, false);
    let mut regions = Vec::new();

    for start in mask.coords() {
        if !mask[start] || visited[start] {
            continue;
        }

        let cells: Vec<Cell> = bfs_reach(start, |&cell: &Cell| {
            cell.neighbors(height, width)
                .filter(|&next| mask[next])
                .collect::<Vec<_>>()
        })
        .collect();

        for &cell in &cells {
            visited[cell] = true;
        }
        regions.push(Region::from_cells(regions.len(), cells));
    }

    debug!("Found {} regions in mask", regions.len());
    regions
}

/// Region id per cell, `None` outside every region
pub fn label_grid(regions: &[Region], height: usize, width: usize) -> Grid<Option<usize>> {
    let mut labels = Grid::new(height, width, None);
    for region in regions {
        for &cell in &region.cells {
            labels[cell] = Some(region.id);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn mask_from_rows(rows: &[&str]) -> Grid<bool> {
        let height = rows.len();
        let width = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        Grid::from_vec(height, width, cells).unwrap()
    }

    #[test]
    fn test_two_blobs_diagonal_not_connected() {
        let mask = mask_from_rows(&["##..", "##..", "..#.", "...#"]);
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].size(), 4);
        assert_eq!(regions[1].size(), 1);
        assert_eq!(regions[2].size(), 1);
        assert_eq!(regions[0].bounds.width(), 2);
        assert_eq!(regions[1].cells, vec![Cell::new(2, 2)]);
    }

    #[test]
    fn test_uniform_mask_single_region() {
        let mask = Grid::new(10, 10, true);
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].size(), 100);
        assert_eq!(regions[0].centroid, Cell::new(4, 4));
        assert_eq!(regions[0].anchor, Cell::new(4, 4));
    }

    #[test]
    fn test_concave_region_anchor_is_member() {
        // U shape: the centroid lands in the empty middle
        let mask = mask_from_rows(&["#...#", "#...#", "#...#", "#####"]);
        let regions = find_regions(&mask);

        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert!(!mask[region.centroid]);
        assert!(mask[region.anchor]);
        assert!(region.cells.contains(&region.anchor));
    }

    #[test]
    fn test_empty_mask_has_no_regions() {
        let mask = Grid::new(4, 6, false);
        assert!(find_regions(&mask).is_empty());
    }

    #[test]
    fn test_regions_partition_mask() {
        let mut rng = Pcg64::seed_from_u64(2024);
        for _ in 0..5 {
            let cells = (0..20 * 17).map(|_| rng.gen_bool(0.45)).collect();
            let mask = Grid::from_vec(20, 17, cells).unwrap();
            let regions = find_regions(&mask);

            let total: usize = regions.iter().map(Region::size).sum();
            assert_eq!(total, mask.count_true());

            let mut seen = Grid::new(20, 17, 0u32);
            for region in &regions {
                for &cell in &region.cells {
                    assert!(mask[cell]);
                    seen[cell] += 1;
                }
            }
            for (cell, &count) in seen.enumerate() {
                assert_eq!(count, u32::from(mask[cell]), "cell {cell} covered {count} times");
            }
        }
    }

    #[test]
    fn test_bounds_inset() {
        let bounds = Bounds {
            min_y: 2,
            min_x: 3,
            max_y: 20,
            max_x: 10,
        };
        assert_eq!(
            bounds.inset(2),
            Some(Bounds {
                min_y: 4,
                min_x: 5,
                max_y: 18,
                max_x: 8
            })
        );
        assert_eq!(bounds.inset(4).map(|b| b.width()), None);
        assert_eq!(bounds.inset(3).map(|b| b.width()), Some(2));
    }

    #[test]
    fn test_label_grid() {
        let mask = mask_from_rows(&["#.#", "#.#"]);
        let regions = find_regions(&mask);
        let labels = label_grid(&regions, 2, 3);
        assert_eq!(labels[Cell::new(1, 0)], Some(0));
        assert_eq!(labels[Cell::new(0, 2)], Some(1));
        assert_eq!(labels[Cell::new(0, 1)], None);
    }
}
