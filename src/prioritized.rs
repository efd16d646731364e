//! Greedy sequential planner with an accumulating reservation table, used when CBS would be too
//! expensive for the agent count (see `SPEC_FULL.md` §6 for where that threshold lives).

use std::collections::HashSet;

use crate::constraint::Constraint;
use crate::grid::Grid;
use crate::lowlevel::low_level_plan_stats;
use crate::pose::Pose;
use crate::stat::Stats;

const INITIAL_BATTERY: i64 = 100;
const MAX_TIME: usize = 200;
/// How many extra ticks past arrival a finished agent's goal cell stays reserved, so later
/// agents route around parked predecessors.
const GOAL_PARK_TICKS: usize = 9;

/// Plans every agent in input order against a reservation table seeded by earlier agents'
/// paths. Never fails outright: an agent the low-level planner can't route degrades to a
/// one-pose "stay put" path and planning continues with the rest. Edge constraints are not
/// synthesized from the reservation table, so the result may still contain swap conflicts — see
/// `SPEC_FULL.md` §9 for why that's an accepted limitation of this fast mode.
pub fn prioritized_solve(grid: &Grid, starts: &[Pose], goals: &[(usize, usize)]) -> Vec<Vec<Pose>> {
    prioritized_solve_stats(grid, starts, goals, &mut Stats::default())
}

/// Same as [`prioritized_solve`] but threads an external [`Stats`] accumulator.
pub fn prioritized_solve_stats(
    grid: &Grid,
    starts: &[Pose],
    goals: &[(usize, usize)],
    stats: &mut Stats,
) -> Vec<Vec<Pose>> {
    assert_eq!(starts.len(), goals.len(), "starts and goals must be the same length");

    let mut reserved: HashSet<(usize, usize, usize)> = HashSet::new();
    let mut paths = Vec::with_capacity(starts.len());

    for (agent_id, (&start, &goal)) in starts.iter().zip(goals.iter()).enumerate() {
        let constraints: Vec<Constraint> = reserved
            .iter()
            .map(|&(t, x, y)| Constraint::Vertex { time: t, agent_id, x, y })
            .collect();

        let path = low_level_plan_stats(grid, start, goal, &constraints, agent_id, INITIAL_BATTERY, crate::lowlevel::DEFAULT_MIN_BATTERY, MAX_TIME, stats);

        match path {
            Some(path) => {
                let arrival = path.len() - 1;
                for (t, pose) in path.iter().enumerate() {
                    reserved.insert((t, pose.x, pose.y));
                }
                let (gx, gy) = (path[arrival].x, path[arrival].y);
                for wait in 1..=GOAL_PARK_TICKS {
                    reserved.insert((arrival + wait, gx, gy));
                }
                paths.push(path);
            }
            None => paths.push(vec![start]),
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::detect_first_conflict;
    use crate::pose::Facing;

    fn pose(x: usize, y: usize, f: Facing) -> Pose {
        Pose::new(x, y, f)
    }

    #[test]
    fn always_returns_one_path_per_agent() {
        let grid = Grid::open(5, 5);
        let starts = [pose(0, 0, Facing::East), pose(4, 4, Facing::West), pose(0, 4, Facing::North)];
        let goals = [(4, 4), (0, 0), (4, 0)];
        let paths = prioritized_solve(&grid, &starts, &goals);
        assert_eq!(paths.len(), starts.len());
    }

    #[test]
    fn later_agent_routes_around_earlier_reservation() {
        let grid = Grid::open(5, 1);
        let starts = [pose(0, 0, Facing::East), pose(1, 0, Facing::East)];
        let goals = [(4, 0), (0, 0)];
        let paths = prioritized_solve(&grid, &starts, &goals);
        // Agent 0 plans first and gets the direct line.
        assert_eq!(paths[0].len() - 1, 4);
        assert_eq!(paths[1][0], starts[1]);
        assert_eq!(*paths[1].last().unwrap(), pose(0, 0, paths[1].last().unwrap().facing));
        assert!(detect_first_conflict(&paths[..1]).is_none());
    }

    #[test]
    fn failure_degrades_to_stay_put_singleton() {
        // A wall splits the corridor in two: the goal is unreachable from the start no matter
        // the reservation table, so the planner must fail over to the stay-put singleton.
        let grid = Grid::new(3, 1, [(1, 0)]);
        let starts = [pose(0, 0, Facing::East)];
        let goals = [(2, 0)];
        let paths = prioritized_solve(&grid, &starts, &goals);
        assert_eq!(paths[0], vec![pose(0, 0, Facing::East)]);
    }
}
