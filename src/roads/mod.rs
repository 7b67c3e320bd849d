//! Road mask accumulation and the stages that paint onto it.

use crate::grid::{Cell, Grid};
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod network;
pub mod streets;
pub mod thicken;

pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use streets::{overlay_avenues, overlay_streets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum RoadKind {
    /// Left-to-right road crossing the whole map
    #[display("main corridor")]
    MainCorridor,
    /// Edge of the spanning tree between city centers
    #[display("trunk")]
    Trunk,
    /// Link from a leftover center to the existing network
    #[display("connector")]
    Connector,
}

/// A path the network builder drew
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadPath {
    pub kind: RoadKind,
    pub cells: Vec<Cell>,
    pub cost: f32,
}

/// Accumulated road cells. Painting only ever sets cells; the final
/// thickening pass is the one place cells can be cleared again.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadMask {
    cells: Grid<bool>,
}

impl RoadMask {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            cells: Grid::new(height, width, false),
        }
    }

    /// Mark one cell; returns true when it was not a road before
    pub fn paint(&mut self, cell: Cell) -> bool {
        match self.cells.get(cell) {
            Some(false) => {
                self.cells[cell] = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every cell of a path, returning how many were new
    pub fn paint_path(&mut self, cells: &[Cell]) -> usize {
        cells.iter().filter(|&&cell| self.paint(cell)).count()
    }

    pub fn is_road(&self, cell: Cell) -> bool {
        self.cells.get(cell).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.cells.count_true()
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_is_or_only() {
        let mut roads = RoadMask::new(3, 3);
        assert!(roads.paint(Cell::new(1, 1)));
        assert!(!roads.paint(Cell::new(1, 1)));
        assert!(!roads.paint(Cell::new(5, 5)));

        let painted = roads.paint_path(&[Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)]);
        assert_eq!(painted, 2);
        assert_eq!(roads.count(), 3);
        assert!(roads.is_road(Cell::new(1, 2)));
        assert!(!roads.is_road(Cell::new(0, 0)));
    }

    #[test]
    fn test_road_kind_display() {
        assert_eq!(RoadKind::MainCorridor.to_string(), "main corridor");
        assert_eq!(RoadKind::Connector.to_string(), "connector");
    }
}
