//! Space-time A* / Conflict-Based Search solver for multi-agent pathfinding on a 2D grid.
//!
//! The crate is organized bottom-up: [`grid`] and [`pose`] describe the static world and agent
//! state, [`constraint`] and [`conflict`] are the pure predicates the two solvers share,
//! [`lowlevel`] is single-agent space-time A*, and [`cbs`]/[`prioritized`] are the two joint
//! planners built on top of it. [`config`] and [`scenario`] back the `mapf-cli` binary.

pub mod cbs;
pub mod conflict;
pub mod config;
pub mod constraint;
pub mod grid;
pub mod lowlevel;
pub mod pose;
pub mod prioritized;
pub mod scenario;
pub mod stat;

pub use cbs::cbs_solve;
pub use conflict::{detect_first_conflict, Conflict};
pub use constraint::Constraint;
pub use grid::Grid;
pub use lowlevel::low_level_plan;
pub use pose::{Facing, Pose};
pub use prioritized::prioritized_solve;
pub use stat::Stats;

/// One agent's time-indexed sequence of poses, `path[0]` at `t = 0`.
pub type Path = Vec<Pose>;
