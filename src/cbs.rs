//! High-level Conflict-Based Search: best-first search over a Constraint Tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use tracing::debug;

use crate::conflict::{detect_first_conflict, Conflict};
use crate::constraint::Constraint;
use crate::grid::Grid;
use crate::lowlevel::{low_level_plan_stats, DEFAULT_MAX_TIME, DEFAULT_MIN_BATTERY};
use crate::pose::Pose;
use crate::stat::Stats;

/// Initial battery budget CBS grants every agent, per the spec's root-initialization rule.
const ROOT_BATTERY: i64 = 100;

/// A Constraint Tree node: one constraint list and one path per agent, consistent by
/// construction. `id` is a creation-order tie-breaker only, with no semantic weight (see
/// `SPEC_FULL.md` §9 for why ties are broken this way).
#[derive(Debug, Clone)]
struct CtNode {
    id: u64,
    constraints: Vec<Constraint>,
    paths: Vec<Vec<Pose>>,
    cost: usize,
}

impl CtNode {
    fn recompute_cost(paths: &[Vec<Pose>]) -> usize {
        paths.iter().map(|p| p.len() - 1).sum()
    }
}

impl PartialEq for CtNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for CtNode {}

impl PartialOrd for CtNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CtNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smaller cost pops first from the BinaryHeap (max-heap, so this is inverted); ties go
        // to whichever node was created earlier (smaller id).
        other.cost.cmp(&self.cost).then_with(|| other.id.cmp(&self.id))
    }
}

/// Builds the two branch constraints for a conflict, one per conflicting agent. For an edge
/// (swap) conflict each agent is forbidden from its own side of the swap: agent 1 from
/// `(x,y)->(next_x,next_y)`, agent 2 from the reverse `(next_x,next_y)->(x,y)`.
fn branch_constraints(conflict: &Conflict) -> (Constraint, Constraint) {
    match *conflict {
        Conflict::Vertex { time, agent_1, agent_2, x, y } => (
            Constraint::Vertex { time, agent_id: agent_1, x, y },
            Constraint::Vertex { time, agent_id: agent_2, x, y },
        ),
        Conflict::Edge { time, agent_1, agent_2, x, y, next_x, next_y } => (
            Constraint::Edge { time, agent_id: agent_1, x, y, next_x, next_y },
            Constraint::Edge { time, agent_id: agent_2, x: next_x, y: next_y, next_x: x, next_y: y },
        ),
    }
}

/// Best-first search over the Constraint Tree. Returns the first conflict-free joint plan
/// found, or `None` if the root fails or the open list empties without converging.
pub fn cbs_solve(grid: &Grid, starts: &[Pose], goals: &[(usize, usize)]) -> Option<Vec<Vec<Pose>>> {
    cbs_solve_stats(grid, starts, goals, &mut Stats::default())
}

/// Same as [`cbs_solve`] but threads an external [`Stats`] accumulator.
pub fn cbs_solve_stats(
    grid: &Grid,
    starts: &[Pose],
    goals: &[(usize, usize)],
    stats: &mut Stats,
) -> Option<Vec<Vec<Pose>>> {
    assert_eq!(starts.len(), goals.len(), "starts and goals must be the same length");

    let start_time = Instant::now();
    let mut next_id = 0u64;

    let mut root_paths = Vec::with_capacity(starts.len());
    for (agent_id, (&start, &goal)) in starts.iter().zip(goals.iter()).enumerate() {
        let path = low_level_plan_stats(grid, start, goal, &[], agent_id, ROOT_BATTERY, DEFAULT_MIN_BATTERY, DEFAULT_MAX_TIME, stats)?;
        root_paths.push(path);
    }

    let root = CtNode {
        id: next_id,
        cost: CtNode::recompute_cost(&root_paths),
        constraints: Vec::new(),
        paths: root_paths,
    };
    next_id += 1;

    let mut open: BinaryHeap<CtNode> = BinaryHeap::new();
    open.push(root);

    while let Some(current) = open.pop() {
        let Some(conflict) = detect_first_conflict(&current.paths) else {
            stats.time_ms = start_time.elapsed().as_micros() as usize;
            stats.costs = current.cost;
            debug!(node_id = current.id, cost = current.cost, "CBS converged on a conflict-free node");
            return Some(current.paths);
        };
        debug!(node_id = current.id, ?conflict, "expanding CT node");

        let (constraint_a, constraint_b) = branch_constraints(&conflict);
        for constraint in [constraint_a, constraint_b] {
            let agent_id = constraint.agent_id();
            let mut child_constraints = current.constraints.clone();
            child_constraints.push(constraint);

            if let Some(new_path) = low_level_plan_stats(
                grid,
                starts[agent_id],
                goals[agent_id],
                &child_constraints,
                agent_id,
                ROOT_BATTERY,
                DEFAULT_MIN_BATTERY,
                DEFAULT_MAX_TIME,
                stats,
            ) {
                let mut child_paths = current.paths.clone();
                child_paths[agent_id] = new_path;
                let child = CtNode {
                    id: next_id,
                    cost: CtNode::recompute_cost(&child_paths),
                    constraints: child_constraints,
                    paths: child_paths,
                };
                next_id += 1;
                stats.high_level_expand_nodes += 1;
                open.push(child);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Facing;

    fn pose(x: usize, y: usize, f: Facing) -> Pose {
        Pose::new(x, y, f)
    }

    #[test]
    fn s4_simple_crossing_is_conflict_free_and_bounded() {
        let grid = Grid::open(3, 3);
        let starts = [pose(0, 1, Facing::East), pose(1, 0, Facing::South)];
        let goals = [(2, 1), (1, 2)];
        let paths = cbs_solve(&grid, &starts, &goals).unwrap();
        assert!(detect_first_conflict(&paths).is_none());
        let total_cost: usize = paths.iter().map(|p| p.len() - 1).sum();
        assert!(total_cost <= 8);
    }

    #[test]
    fn s5_head_on_swap_resolves_conflict_free() {
        let grid = Grid::open(3, 3);
        let starts = [pose(0, 1, Facing::East), pose(2, 1, Facing::West)];
        let goals = [(2, 1), (0, 1)];
        let paths = cbs_solve(&grid, &starts, &goals).unwrap();
        assert!(detect_first_conflict(&paths).is_none());
    }

    #[test]
    fn s6_narrow_corridor_is_infeasible() {
        let grid = Grid::open(3, 1);
        let starts = [pose(0, 0, Facing::East), pose(2, 0, Facing::West)];
        let goals = [(2, 0), (0, 0)];
        assert!(cbs_solve(&grid, &starts, &goals).is_none());
    }

    #[test]
    fn two_agent_symmetric_swap_is_solved() {
        let grid = Grid::open(3, 3);
        let starts = [pose(0, 1, Facing::East), pose(2, 1, Facing::West)];
        let goals = [(2, 1), (0, 1)];
        let paths = cbs_solve(&grid, &starts, &goals).unwrap();
        // At least one agent must sidestep: neither path can be the naive 2-step straight line.
        assert!(paths[0].len() > 3 || paths[1].len() > 3);
    }

    #[test]
    fn returned_plan_is_always_conflict_free() {
        let grid = Grid::open(4, 4);
        let starts = [
            pose(0, 0, Facing::East),
            pose(3, 0, Facing::West),
            pose(0, 3, Facing::North),
        ];
        let goals = [(3, 3), (0, 3), (3, 0)];
        let paths = cbs_solve(&grid, &starts, &goals).unwrap();
        assert!(detect_first_conflict(&paths).is_none());
    }

    #[test]
    fn determinism_across_repeated_runs() {
        let grid = Grid::open(4, 4);
        let starts = [pose(0, 0, Facing::East), pose(3, 3, Facing::West)];
        let goals = [(3, 3), (0, 0)];
        let first = cbs_solve(&grid, &starts, &goals);
        let second = cbs_solve(&grid, &starts, &goals);
        assert_eq!(first, second);
    }
}
