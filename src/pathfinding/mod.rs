//! Grid shortest paths over a [`CostField`].
//!
//! Moves are 4-connected. Entering a cell costs that cell's traversal cost,
//! so the start cell is free. Costs are converted to fixed point
//! ([`ASTAR_COST_SCALE`] units per cost unit) because the A* implementation
//! needs a totally ordered cost type. The heuristic is the Manhattan distance
//! in cost units.
//!
//! Equal-priority entries are expanded in whatever order the underlying
//! binary heap yields them; two paths of equal cost may come back in
//! different shapes across versions, callers must not rely on path identity.

use crate::grid::Cell;
use crate::terrain::constants::ASTAR_COST_SCALE;
use crate::terrain::cost::CostField;
use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};

/// Ordered cells from start to goal inclusive, with the summed entry cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPath {
    pub cells: Vec<Cell>,
    pub cost: f32,
}

impl GridPath {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

fn fixed_point(cost: f32) -> u64 {
    (cost * ASTAR_COST_SCALE).round().max(1.0) as u64
}

fn heuristic(from: Cell, goal: Cell) -> u64 {
    from.manhattan_distance(goal) as u64 * ASTAR_COST_SCALE as u64
}

/// Find a cheap path between two cells.
///
/// Returns `None` when either endpoint is impassable or no finite-cost route
/// connects them. Neither case is an error: the caller simply draws nothing.
pub fn find_path(field: &CostField, start: Cell, goal: Cell) -> Option<GridPath> {
    if !field.is_passable(start) || !field.is_passable(goal) {
        return None;
    }

    let (height, width) = (field.height(), field.width());
    let (cells, _) = astar(
        &start,
        |&cell| {
            cell.neighbors(height, width)
                .filter(|&next| field.is_passable(next))
                .map(|next| (next, fixed_point(field.cost(next))))
                .collect::<Vec<_>>()
        },
        |&cell| heuristic(cell, goal),
        |&cell| cell == goal,
    )?;

    let cost = path_cost(field, &cells);
    Some(GridPath { cells, cost })
}

/// Sum of entry costs along `cells`, excluding the first cell
pub fn path_cost(field: &CostField, cells: &[Cell]) -> f32 {
    cells.iter().skip(1).map(|&cell| field.cost(cell)).sum()
}
