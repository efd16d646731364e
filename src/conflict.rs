//! Pure scan over a joint plan for the earliest inter-agent conflict.

use crate::pose::Pose;

/// The first conflict encountered while scanning a joint plan forward in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// Two agents occupy `(x, y)` at `time`.
    Vertex { time: usize, agent_1: usize, agent_2: usize, x: usize, y: usize },
    /// Agent `agent_1` moves `(x, y) -> (next_x, next_y)` while `agent_2` makes the reverse
    /// transition in the same tick.
    Edge {
        time: usize,
        agent_1: usize,
        agent_2: usize,
        x: usize,
        y: usize,
        next_x: usize,
        next_y: usize,
    },
}

/// An agent that has reached the end of its path is considered to occupy its last pose forever.
fn pos_at(path: &[Pose], t: usize) -> (usize, usize) {
    path.get(t).copied().unwrap_or_else(|| *path.last().expect("path is never empty")).xy()
}

/// Scans `paths` for the earliest conflict: smallest `time` first, vertex conflicts before edge
/// conflicts at the same `time`, lowest `(agent_1, agent_2)` pair within a kind.
pub fn detect_first_conflict(paths: &[Vec<Pose>]) -> Option<Conflict> {
    let horizon = paths.iter().map(|p| p.len()).max().unwrap_or(0);

    for t in 0..horizon {
        for i in 0..paths.len() {
            for j in (i + 1)..paths.len() {
                let (xi, yi) = pos_at(&paths[i], t);
                let (xj, yj) = pos_at(&paths[j], t);
                if (xi, yi) == (xj, yj) {
                    return Some(Conflict::Vertex { time: t, agent_1: i, agent_2: j, x: xi, y: yi });
                }
            }
        }

        if t == 0 {
            continue;
        }
        for i in 0..paths.len() {
            for j in (i + 1)..paths.len() {
                let prev_i = pos_at(&paths[i], t - 1);
                let curr_i = pos_at(&paths[i], t);
                let prev_j = pos_at(&paths[j], t - 1);
                let curr_j = pos_at(&paths[j], t);
                if prev_i == curr_j && curr_i == prev_j {
                    return Some(Conflict::Edge {
                        time: t,
                        agent_1: i,
                        agent_2: j,
                        x: prev_i.0,
                        y: prev_i.1,
                        next_x: curr_i.0,
                        next_y: curr_i.1,
                    });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Facing;
    use pretty_assertions::assert_eq;

    fn p(x: usize, y: usize) -> Pose {
        Pose::new(x, y, Facing::East)
    }

    #[test]
    fn no_conflict_on_disjoint_paths() {
        let paths = vec![vec![p(0, 0), p(1, 0)], vec![p(0, 2), p(1, 2)]];
        assert_eq!(detect_first_conflict(&paths), None);
    }

    #[test]
    fn vertex_conflict_detected_at_earliest_time() {
        let paths = vec![vec![p(0, 0), p(1, 0), p(2, 0)], vec![p(2, 0), p(2, 0), p(2, 0)]];
        let conflict = detect_first_conflict(&paths).unwrap();
        assert_eq!(conflict, Conflict::Vertex { time: 2, agent_1: 0, agent_2: 1, x: 2, y: 0 });
    }

    #[test]
    fn edge_conflict_detected_on_swap() {
        let paths = vec![vec![p(0, 0), p(1, 0)], vec![p(1, 0), p(0, 0)]];
        let conflict = detect_first_conflict(&paths).unwrap();
        assert_eq!(conflict, Conflict::Edge { time: 1, agent_1: 0, agent_2: 1, x: 0, y: 0, next_x: 1, next_y: 0 });
    }

    #[test]
    fn vertex_conflicts_win_over_edge_conflicts_at_same_time() {
        // At t=1: agents 0 and 1 swap (an edge conflict candidate), but agents 1 and 2 also
        // collide at the same cell (a vertex conflict) - the vertex conflict must win.
        let paths = vec![vec![p(0, 0), p(1, 0)], vec![p(1, 0), p(0, 0)], vec![p(5, 5), p(0, 0)]];
        let conflict = detect_first_conflict(&paths).unwrap();
        assert_eq!(conflict, Conflict::Vertex { time: 1, agent_1: 1, agent_2: 2, x: 0, y: 0 });
    }

    #[test]
    fn finished_agent_occupies_goal_forever() {
        let paths = vec![vec![p(0, 0)], vec![p(5, 5), p(4, 5), p(0, 0)]];
        let conflict = detect_first_conflict(&paths).unwrap();
        assert_eq!(conflict, Conflict::Vertex { time: 2, agent_1: 0, agent_2: 1, x: 0, y: 0 });
    }
}
