//! Dense row-major grids shared by every stage of the generator.
//!
//! All grids produced from one elevation raster have the same `(height, width)`;
//! cells are addressed as `(y, x)` with the origin at the top-left corner.

use crate::errors::{RoadgenError, RoadgenResult};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

pub mod window;

pub use window::WindowCounter;

/// A grid coordinate, row first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display("({y}, {x})")]
pub struct Cell {
    pub y: usize,
    pub x: usize,
}

const CARDINAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Cell {
    pub const fn new(y: usize, x: usize) -> Self {
        Self { y, x }
    }

    /// Manhattan distance, used as the A* heuristic and as the MST edge weight
    pub fn manhattan_distance(self, other: Cell) -> usize {
        self.y.abs_diff(other.y) + self.x.abs_diff(other.x)
    }

    pub fn chebyshev_distance(self, other: Cell) -> usize {
        self.y.abs_diff(other.y).max(self.x.abs_diff(other.x))
    }

    /// Up, down, left and right neighbours that fall inside a `height` x `width` grid
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        CARDINAL_OFFSETS.into_iter().filter_map(move |(dy, dx)| {
            let y = self.y.checked_add_signed(dy)?;
            let x = self.x.checked_add_signed(dx)?;
            (y < height && x < width).then_some(Cell { y, x })
        })
    }
}

/// Dense `height` x `width` array stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid filled with a single value
    pub fn new(height: usize, width: usize, fill: T) -> Self {
        Self {
            height,
            width,
            cells: vec![fill; height * width],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap row-major samples, checking that the length matches the dimensions
    pub fn from_vec(height: usize, width: usize, cells: Vec<T>) -> RoadgenResult<Self> {
        let expected = height * width;
        if cells.len() != expected {
            return Err(RoadgenError::InvalidRaster {
                reason: format!(
                    "Cell array size {} does not match grid dimensions {}x{} (expected {})",
                    cells.len(),
                    width,
                    height,
                    expected
                ),
            });
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.y < self.height && cell.x < self.width
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        if self.contains(cell) {
            self.cells.get(cell.y * self.width + cell.x)
        } else {
            None
        }
    }

    pub fn set(&mut self, cell: Cell, value: T) {
        if self.contains(cell) {
            let index = cell.y * self.width + cell.x;
            self.cells[index] = value;
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Every coordinate of the grid in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Cell> + use<T> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Cell { y, x }))
    }

    /// Coordinates paired with their values, row-major
    pub fn enumerate(&self) -> impl Iterator<Item = (Cell, &T)> {
        self.coords().zip(self.cells.iter())
    }

    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.height == other.height && self.width == other.width
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Combine two grids of identical shape cell by cell
    pub fn zip_map<U, V>(&self, other: &Grid<U>, f: impl Fn(&T, &U) -> V) -> Grid<V> {
        debug_assert!(self.same_shape(other));
        Grid {
            height: self.height,
            width: self.width,
            cells: self
                .cells
                .iter()
                .zip(other.cells.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }

    pub fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|value| predicate(value)).count()
    }
}

impl<T> Index<Cell> for Grid<T> {
    type Output = T;

    fn index(&self, cell: Cell) -> &T {
        &self.cells[cell.y * self.width + cell.x]
    }
}

impl<T> IndexMut<Cell> for Grid<T> {
    fn index_mut(&mut self, cell: Cell) -> &mut T {
        &mut self.cells[cell.y * self.width + cell.x]
    }
}

impl Grid<bool> {
    pub fn count_true(&self) -> usize {
        self.count(|&value| value)
    }

    /// Flat square-window dilation: a cell becomes true when any cell within
    /// Chebyshev distance `radius` (clipped at the borders) is true.
    ///
    /// This is not a geodesic dilation, blocked terrain between the two cells
    /// does not matter. A radius of 0 returns an identical copy.
    pub fn dilate(&self, radius: usize) -> Grid<bool> {
        if radius == 0 {
            return self.clone();
        }
        let counter = WindowCounter::new(self);
        let mut dilated = Grid::new(self.height, self.width, false);
        for cell in self.coords() {
            dilated[cell] = counter.count(cell, radius) > 0;
        }
        dilated
    }

    pub fn and(&self, other: &Grid<bool>) -> Grid<bool> {
        self.zip_map(other, |&a, &b| a && b)
    }

    pub fn or(&self, other: &Grid<bool>) -> Grid<bool> {
        self.zip_map(other, |&a, &b| a || b)
    }
}
