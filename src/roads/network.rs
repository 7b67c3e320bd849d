use super::{RoadKind, RoadMask, RoadPath};
use crate::config::GenerationConfig;
use crate::grid::Cell;
use crate::pathfinding::{GridPath, find_path};
use crate::terrain::cost::CostField;
use tracing::{debug, info, warn};

/// What the network builder drew and what it could not connect
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub paths: Vec<RoadPath>,
    pub failed_connections: usize,
    /// Centers with a drawn road to the rest of the network
    pub linked: Vec<bool>,
}

impl RoadNetwork {
    pub fn corridor(&self) -> Option<&RoadPath> {
        self.paths
            .iter()
            .find(|path| path.kind == RoadKind::MainCorridor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Connects city centers into one road network: a main corridor across the
/// map, a spanning tree over centers, then links for anything left over.
pub struct RoadNetworkBuilder<'a> {
    field: &'a CostField,
    config: &'a GenerationConfig,
}

impl<'a> RoadNetworkBuilder<'a> {
    pub fn new(field: &'a CostField, config: &'a GenerationConfig) -> Self {
        Self { field, config }
    }

    pub fn build(&self, centers: &[Cell], roads: &mut RoadMask) -> RoadNetwork {
        let mut network = RoadNetwork {
            linked: vec![false; centers.len()],
            ..Default::default()
        };

        if let Some(corridor) = self.main_corridor() {
            self.draw(&mut network, roads, RoadKind::MainCorridor, corridor);
        }

        if centers.len() >= 2 {
            self.spanning_tree(centers, &mut network, roads);
        }
        self.attach_stragglers(centers, &mut network, roads);

        info!(
            "Road network: {} paths drawn, {} connections failed, {}/{} centers linked",
            network.paths.len(),
            network.failed_connections,
            network.linked.iter().filter(|&&l| l).count(),
            centers.len()
        );
        network
    }

    fn draw(
        &self,
        network: &mut RoadNetwork,
        roads: &mut RoadMask,
        kind: RoadKind,
        path: GridPath,
    ) {
        let painted = roads.paint_path(&path.cells);
        debug!(
            "Drew {kind} of {} cells (cost {:.1}, {painted} new)",
            path.len(),
            path.cost
        );
        network.paths.push(RoadPath {
            kind,
            cells: path.cells,
            cost: path.cost,
        });
    }

    /// Cheapest passable cell near one vertical border, weighing its cost
    /// against how far it sits from the edge
    fn edge_entry(&self, side: Side) -> Option<Cell> {
        let width = self.field.width();
        let margin = self.config.corridor_margin.min(width);
        let columns = match side {
            Side::Left => 0..margin,
            Side::Right => width - margin..width,
        };

        let mut best: Option<(f32, Cell)> = None;
        for y in 0..self.field.height() {
            for x in columns.clone() {
                let cell = Cell::new(y, x);
                if !self.field.is_passable(cell) {
                    continue;
                }
                let border_distance = match side {
                    Side::Left => x,
                    Side::Right => width - 1 - x,
                };
                let score = self.field.cost(cell)
                    + border_distance as f32 * self.config.corridor_border_weight;
                if best.is_none_or(|(best_score, _)| score < best_score) {
                    best = Some((score, cell));
                }
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn main_corridor(&self) -> Option<GridPath> {
        let left = self.edge_entry(Side::Left)?;
        let right = self.edge_entry(Side::Right)?;
        let corridor = find_path(self.field, left, right);
        if corridor.is_none() {
            warn!("No main corridor between {left} and {right}");
        }
        corridor
    }

    /// Prim-style expansion using Manhattan distance between centers as the
    /// edge weight; each chosen edge is then drawn along a real A* path.
    fn spanning_tree(&self, centers: &[Cell], network: &mut RoadNetwork, roads: &mut RoadMask) {
        let mut in_tree = vec![false; centers.len()];
        in_tree[0] = true;
        network.linked[0] = true;

        for _ in 1..centers.len() {
            let mut best: Option<(usize, usize, usize)> = None;
            for (from, &from_cell) in centers.iter().enumerate() {
                if !in_tree[from] {
                    continue;
                }
                for (to, &to_cell) in centers.iter().enumerate() {
                    if in_tree[to] {
                        continue;
                    }
                    let distance = from_cell.manhattan_distance(to_cell);
                    if best.is_none_or(|(_, _, d)| distance < d) {
                        best = Some((from, to, distance));
                    }
                }
            }

            let Some((from, to, _)) = best else {
                break;
            };
            in_tree[to] = true;

            match find_path(self.field, centers[from], centers[to]) {
                Some(path) => {
                    self.draw(network, roads, RoadKind::Trunk, path);
                    network.linked[to] = true;
                }
                None => {
                    warn!("No trunk road from {} to {}", centers[from], centers[to]);
                    network.failed_connections += 1;
                }
            }
        }
    }

    /// Link every center not yet on the network to its nearest network cell
    fn attach_stragglers(&self, centers: &[Cell], network: &mut RoadNetwork, roads: &mut RoadMask) {
        let mut targets: Vec<Cell> = network
            .corridor()
            .map(|corridor| corridor.cells.clone())
            .unwrap_or_default();
        targets.extend(
            centers
                .iter()
                .zip(&network.linked)
                .filter(|&(_, &linked)| linked)
                .map(|(&cell, _)| cell),
        );

        for (index, &center) in centers.iter().enumerate() {
            if network.linked[index] {
                continue;
            }
            let Some(&target) = targets
                .iter()
                .min_by_key(|target| target.manhattan_distance(center))
            else {
                debug!("Nothing to attach {center} to yet");
                continue;
            };

            match find_path(self.field, center, target) {
                Some(path) => {
                    self.draw(network, roads, RoadKind::Connector, path);
                    network.linked[index] = true;
                    targets.push(center);
                }
                None => {
                    warn!("Could not attach {center} to the network at {target}");
                    network.failed_connections += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use pathfinding::prelude::bfs_reach;
    use std::collections::HashSet;

    fn road_component(roads: &RoadMask, start: Cell) -> HashSet<Cell> {
        let grid = roads.grid();
        let (height, width) = (grid.height(), grid.width());
        bfs_reach(start, |&cell: &Cell| {
            cell.neighbors(height, width)
                .filter(|&next| grid[next])
                .collect::<Vec<_>>()
        })
        .collect()
    }

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            corridor_margin: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_centers_end_up_connected() {
        let field = CostField::from_costs(Grid::new(40, 60, 1.0));
        let config = test_config();
        let centers = [
            Cell::new(5, 5),
            Cell::new(30, 10),
            Cell::new(20, 50),
            Cell::new(35, 55),
        ];
        let mut roads = RoadMask::new(40, 60);

        let network = RoadNetworkBuilder::new(&field, &config).build(&centers, &mut roads);

        assert_eq!(network.failed_connections, 0);
        assert!(network.linked.iter().all(|&l| l));
        assert_eq!(
            network
                .paths
                .iter()
                .filter(|p| p.kind == RoadKind::Trunk)
                .count(),
            3
        );
        let component = road_component(&roads, centers[0]);
        for center in &centers {
            assert!(component.contains(center), "{center} is not connected");
        }
    }

    #[test]
    fn test_no_centers_draws_only_corridor() {
        let field = CostField::from_costs(Grid::new(10, 20, 1.0));
        let config = test_config();
        let mut roads = RoadMask::new(10, 20);

        let network = RoadNetworkBuilder::new(&field, &config).build(&[], &mut roads);

        assert_eq!(network.paths.len(), 1);
        let corridor = network.corridor().unwrap();
        assert_eq!(corridor.cells.first().unwrap().x, 0);
        assert_eq!(corridor.cells.last().unwrap().x, 19);
        assert_eq!(roads.count(), corridor.cells.len());
    }

    #[test]
    fn test_edge_entry_prefers_cheap_cell_near_border() {
        let mut costs = Grid::new(6, 10, 9.0);
        costs[Cell::new(4, 0)] = 1.0;
        costs[Cell::new(2, 1)] = 1.0;
        for y in 0..6 {
            costs[Cell::new(y, 9)] = f32::INFINITY;
        }
        costs[Cell::new(3, 8)] = 2.0;
        let field = CostField::from_costs(costs);
        let config = test_config();
        let builder = RoadNetworkBuilder::new(&field, &config);

        // (2, 1) scores 1.5, (4, 0) scores 1.0
        assert_eq!(builder.edge_entry(Side::Left), Some(Cell::new(4, 0)));
        // Border column is impassable, (3, 8) scores 2.5 versus 9.5
        assert_eq!(builder.edge_entry(Side::Right), Some(Cell::new(3, 8)));
    }

    #[test]
    fn test_single_center_attaches_to_corridor() {
        let field = CostField::from_costs(Grid::new(30, 30, 1.0));
        let config = test_config();
        let center = Cell::new(25, 15);
        let mut roads = RoadMask::new(30, 30);

        let network = RoadNetworkBuilder::new(&field, &config).build(&[center], &mut roads);

        assert!(network.corridor().is_some());
        assert!(network.linked[0]);
        assert!(network.paths.iter().any(|p| p.kind == RoadKind::Connector));
        let corridor_start = network.corridor().unwrap().cells[0];
        assert!(road_component(&roads, corridor_start).contains(&center));
    }

    #[test]
    fn test_single_center_without_corridor_is_left_alone() {
        // Right border band is impassable, so no corridor can be drawn
        let mut costs = Grid::new(10, 10, 1.0);
        for y in 0..10 {
            for x in 7..10 {
                costs[Cell::new(y, x)] = f32::INFINITY;
            }
        }
        let field = CostField::from_costs(costs);
        let config = test_config();
        let mut roads = RoadMask::new(10, 10);

        let network =
            RoadNetworkBuilder::new(&field, &config).build(&[Cell::new(5, 3)], &mut roads);

        assert!(network.paths.is_empty());
        assert_eq!(network.failed_connections, 0);
        assert_eq!(roads.count(), 0);
    }

    #[test]
    fn test_wall_leaves_centers_disconnected() {
        let mut costs = Grid::new(12, 21, 1.0);
        for y in 0..12 {
            costs[Cell::new(y, 10)] = f32::INFINITY;
        }
        let field = CostField::from_costs(costs);
        let config = test_config();
        let left = Cell::new(6, 3);
        let right = Cell::new(6, 17);
        let mut roads = RoadMask::new(12, 21);

        let network = RoadNetworkBuilder::new(&field, &config).build(&[left, right], &mut roads);

        assert!(network.corridor().is_none());
        assert!(network.failed_connections >= 1);
        assert!(!network.linked[1]);
        let component = road_component(&roads, left);
        assert!(!component.contains(&right));
    }
}
