//! Single-agent optimal space-time A* over the `(x, y, facing, time)` state space.
//!
//! Follows the reference workspace's own open-list idiom: a `BinaryHeap` (a max-heap) whose
//! element `Ord` is defined inverted on `f`, so the heap behaves like a min-heap on `f` while
//! still giving us `Eq`/`Ord`-derived `BinaryHeap::pop` for free.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::constraint::{is_constrained, Constraint};
use crate::grid::Grid;
use crate::pose::{Facing, Pose};
use crate::stat::Stats;

/// Horizon beyond which the low-level search abandons a branch, per the spec default.
pub const DEFAULT_MAX_TIME: usize = 300;
/// Reserved-for-future battery floor; accepted but not consulted (see `SPEC_FULL.md` §9).
pub const DEFAULT_MIN_BATTERY: i64 = 10;

type StateKey = (usize, usize, usize, Facing);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    idx: usize,
    time: usize,
    x: usize,
    y: usize,
    facing: Facing,
    g: usize,
    h: usize,
    battery: i64,
    parent: Option<usize>,
    seq: u64,
}

impl Node {
    fn f(&self) -> usize {
        self.g + self.h
    }

    fn key(&self) -> StateKey {
        (self.time, self.x, self.y, self.facing)
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smaller f pops first...
        other.f().cmp(&self.f())
            // ...tie-broken by larger g first (prefer deeper states)...
            .then_with(|| self.g.cmp(&other.g))
            // ...and finally by insertion order, so two distinct states that land on the same
            // (f, g) never compare equal and collapse into one BinaryHeap slot.
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn manhattan(x1: usize, y1: usize, x2: usize, y2: usize) -> usize {
    x1.abs_diff(x2) + y1.abs_diff(y2)
}

/// Reconstructs `(x, y, facing)` per time step, start to goal, from the parent chain of `nodes`.
fn reconstruct_path(nodes: &[Node], mut idx: usize) -> Vec<Pose> {
    let mut path = Vec::with_capacity(nodes[idx].time + 1);
    loop {
        let node = &nodes[idx];
        path.push(Pose::new(node.x, node.y, node.facing));
        match node.parent {
            Some(parent) => idx = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Single-agent optimal space-time A*.
///
/// Returns the time-indexed pose sequence starting at `start` (at `t = 0`) and ending the first
/// time `(x, y) == goal` is popped from the frontier, or `None` if the horizon/battery/frontier
/// is exhausted first. `constraints` may contain entries for any agent; only those matching
/// `agent_id` are consulted.
#[allow(clippy::too_many_arguments)]
pub fn low_level_plan(
    grid: &Grid,
    start: Pose,
    goal: (usize, usize),
    constraints: &[Constraint],
    agent_id: usize,
    initial_battery: i64,
    _min_battery: i64,
    max_time: usize,
) -> Option<Vec<Pose>> {
    low_level_plan_stats(grid, start, goal, constraints, agent_id, initial_battery, _min_battery, max_time, &mut Stats::default())
}

/// Same as [`low_level_plan`] but threads an external [`Stats`] accumulator, used by the CBS and
/// prioritized solvers so per-agent expansion counts roll up into one run's benchmark totals.
#[allow(clippy::too_many_arguments)]
pub fn low_level_plan_stats(
    grid: &Grid,
    start: Pose,
    goal: (usize, usize),
    constraints: &[Constraint],
    agent_id: usize,
    initial_battery: i64,
    _min_battery: i64,
    max_time: usize,
    stats: &mut Stats,
) -> Option<Vec<Pose>> {
    let agent_constraints: Vec<Constraint> = constraints
        .iter()
        .copied()
        .filter(|c| c.agent_id() == agent_id)
        .collect();

    let mut open: BinaryHeap<Node> = BinaryHeap::new();
    let mut closed: HashSet<StateKey> = HashSet::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut best_g: HashMap<StateKey, usize> = HashMap::new();
    let mut seq: u64 = 0;

    let start_h = manhattan(start.x, start.y, goal.0, goal.1);
    let start_node = Node {
        idx: 0,
        time: 0,
        x: start.x,
        y: start.y,
        facing: start.facing,
        g: 0,
        h: start_h,
        battery: initial_battery,
        parent: None,
        seq,
    };
    best_g.insert(start_node.key(), 0);
    nodes.push(start_node);
    open.push(start_node);

    while let Some(current) = open.pop() {
        let idx = current.idx;
        let key = current.key();
        if closed.contains(&key) {
            continue;
        }
        closed.insert(key);
        stats.low_level_expand_nodes += 1;

        if (current.x, current.y) == goal {
            return Some(reconstruct_path(&nodes, idx));
        }

        if current.time >= max_time || current.battery <= 0 {
            continue;
        }

        let next_time = current.time + 1;
        let next_battery = current.battery - 1;

        // Fixed enumeration order: wait, rotate-left, rotate-right, forward.
        let mut successors: Vec<(usize, usize, Facing)> = vec![
            (current.x, current.y, current.facing),
            (current.x, current.y, current.facing.rotate_left()),
            (current.x, current.y, current.facing.rotate_right()),
        ];
        let (dx, dy) = current.facing.delta();
        let fx = current.x as i64 + dx;
        let fy = current.y as i64 + dy;
        if fx >= 0 && fy >= 0 {
            let (fx, fy) = (fx as usize, fy as usize);
            if grid.is_traversable(fx, fy) {
                successors.push((fx, fy, current.facing));
            }
        }

        for (nx, ny, nf) in successors {
            if closed.contains(&(next_time, nx, ny, nf)) {
                continue;
            }
            if is_constrained(current.x, current.y, nx, ny, next_time, agent_id, &agent_constraints) {
                continue;
            }
            let tentative_g = current.g + 1;
            let state_key = (next_time, nx, ny, nf);
            if tentative_g < *best_g.get(&state_key).unwrap_or(&usize::MAX) {
                best_g.insert(state_key, tentative_g);
                seq += 1;
                let child = Node {
                    idx: nodes.len(),
                    time: next_time,
                    x: nx,
                    y: ny,
                    facing: nf,
                    g: tentative_g,
                    h: manhattan(nx, ny, goal.0, goal.1),
                    battery: next_battery,
                    parent: Some(idx),
                    seq,
                };
                nodes.push(child);
                open.push(child);
            }
        }
    }

    None
}
