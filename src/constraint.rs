//! Per-agent vertex/edge prohibitions imposed by a CT node.

/// A restriction bound to one agent at one time. Immutable once created.
///
/// Modeled as a tagged variant rather than a record with `next_x`/`next_y` fields that are only
/// meaningful for edge constraints — the two cases never need each other's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Agent `agent_id` must not occupy `(x, y)` at `time`.
    Vertex { time: usize, agent_id: usize, x: usize, y: usize },
    /// Agent `agent_id` must not transition from `(x, y)` at `time - 1` to `(next_x, next_y)`
    /// at `time`.
    Edge {
        time: usize,
        agent_id: usize,
        x: usize,
        y: usize,
        next_x: usize,
        next_y: usize,
    },
}

impl Constraint {
    pub fn agent_id(&self) -> usize {
        match self {
            Constraint::Vertex { agent_id, .. } => *agent_id,
            Constraint::Edge { agent_id, .. } => *agent_id,
        }
    }

    pub fn time(&self) -> usize {
        match self {
            Constraint::Vertex { time, .. } => *time,
            Constraint::Edge { time, .. } => *time,
        }
    }

    /// True iff moving from `(curr_x, curr_y)` to `(next_x, next_y)` arriving at `next_time` is
    /// forbidden by this constraint for its agent. Callers are expected to pre-filter
    /// constraints by `agent_id`; this predicate does not check it.
    fn forbids(&self, curr_x: usize, curr_y: usize, next_x: usize, next_y: usize, next_time: usize) -> bool {
        match *self {
            Constraint::Vertex { time, x, y, .. } => time == next_time && x == next_x && y == next_y,
            Constraint::Edge { time, x, y, next_x: nx, next_y: ny, .. } => {
                time == next_time && x == curr_x && y == curr_y && nx == next_x && ny == next_y
            }
        }
    }
}

/// `is_constrained` from the spec: true if any constraint for `agent_id` forbids the transition.
/// The three in-place actions (wait, rotate left, rotate right) apply this with the identity
/// transition `(x, y) -> (x, y)`.
pub fn is_constrained(
    curr_x: usize,
    curr_y: usize,
    next_x: usize,
    next_y: usize,
    next_time: usize,
    agent_id: usize,
    constraints: &[Constraint],
) -> bool {
    constraints
        .iter()
        .filter(|c| c.agent_id() == agent_id)
        .any(|c| c.forbids(curr_x, curr_y, next_x, next_y, next_time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_constraint_blocks_arrival_only() {
        let constraints = [Constraint::Vertex { time: 3, agent_id: 0, x: 2, y: 2 }];
        assert!(is_constrained(1, 2, 2, 2, 3, 0, &constraints));
        assert!(!is_constrained(1, 2, 2, 2, 4, 0, &constraints));
        assert!(!is_constrained(1, 2, 2, 2, 3, 1, &constraints));
    }

    #[test]
    fn edge_constraint_blocks_the_named_transition_only() {
        let constraints = [Constraint::Edge { time: 5, agent_id: 2, x: 0, y: 0, next_x: 1, next_y: 0 }];
        assert!(is_constrained(0, 0, 1, 0, 5, 2, &constraints));
        assert!(!is_constrained(1, 0, 0, 0, 5, 2, &constraints));
        assert!(!is_constrained(0, 0, 1, 0, 6, 2, &constraints));
    }

    #[test]
    fn in_place_actions_use_identity_transition() {
        let constraints = [Constraint::Edge { time: 2, agent_id: 0, x: 1, y: 1, next_x: 1, next_y: 1 }];
        // Waiting at (1,1) into t=2 is the identity transition and must be forbidden.
        assert!(is_constrained(1, 1, 1, 1, 2, 0, &constraints));
    }
}
