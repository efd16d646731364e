//! Seeded random scenario generation: non-colliding start/goal poses for a batch of agents.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::Grid;
use crate::pose::{Facing, Pose};

const FACINGS: [Facing; 4] = [Facing::East, Facing::South, Facing::West, Facing::North];

/// A fully resolved instance: one start pose and one goal cell per agent.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub starts: Vec<Pose>,
    pub goals: Vec<(usize, usize)>,
}

/// Draws `num_agents` distinct, traversable start cells and distinct goal cells from `grid`,
/// seeded by `seed` so the same inputs always produce the same scenario. Start and goal poses
/// for the same agent may coincide; starts never collide with each other, nor do goals.
pub fn generate(grid: &Grid, num_agents: usize, seed: u64) -> Result<Scenario> {
    let open_cells: Vec<(usize, usize)> = (0..grid.height)
        .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.is_traversable(x, y))
        .collect();

    if open_cells.len() < num_agents {
        return Err(anyhow!(
            "grid has only {} traversable cells, not enough for {} agents",
            open_cells.len(),
            num_agents
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let starts_xy = sample_distinct(&open_cells, num_agents, &mut rng);
    let goals = sample_distinct(&open_cells, num_agents, &mut rng);

    let starts = starts_xy
        .into_iter()
        .map(|(x, y)| Pose::new(x, y, FACINGS[rng.gen_range(0..FACINGS.len())]))
        .collect();

    Ok(Scenario { starts, goals })
}

/// Reservoir-free distinct sample: shuffles a copy of `pool` and takes the first `n`. Good
/// enough at the grid sizes this CLI deals with; not meant for huge maps.
fn sample_distinct(pool: &[(usize, usize)], n: usize, rng: &mut StdRng) -> Vec<(usize, usize)> {
    let mut shuffled = pool.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled.truncate(n);
    shuffled
}
