use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spacetime_mapf::cbs::cbs_solve_stats;
use spacetime_mapf::config::{Cli, Config, OutputFormat, SolverChoice};
use spacetime_mapf::conflict::detect_first_conflict;
use spacetime_mapf::grid::Grid;
use spacetime_mapf::pose::Pose;
use spacetime_mapf::prioritized::prioritized_solve_stats;
use spacetime_mapf::scenario;
use spacetime_mapf::stat::Stats;

/// Wire shape for `--format json`: one entry per agent, cost included so a consumer doesn't
/// have to recompute `path.len() - 1` itself.
#[derive(Serialize)]
struct AgentPlan<'a> {
    agent_id: usize,
    cost: usize,
    path: &'a [Pose],
}

fn print_plan(paths: &[Vec<Pose>], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for (agent_id, path) in paths.iter().enumerate() {
                println!("agent {agent_id}: {path:?}");
            }
        }
        OutputFormat::Json => {
            let plans: Vec<AgentPlan> = paths
                .iter()
                .enumerate()
                .map(|(agent_id, path)| AgentPlan { agent_id, cost: path.len() - 1, path })
                .collect();
            match serde_json::to_string_pretty(&plans) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("failed to serialize joint plan as JSON: {e}"),
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli)?;

    let grid = match &config.map_path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading map file '{path}'"))?;
            Grid::from_ascii(&text).with_context(|| format!("parsing map file '{path}'"))?
        }
        None => Grid::random(config.width, config.height, config.obstacle_density, config.seed),
    };

    let scenario = scenario::generate(&grid, config.num_agents, config.seed)
        .context("generating a scenario for the requested agent count")?;

    let mut stats = Stats::default();
    let solver = config.resolved_solver();
    info!(solver = %solver, num_agents = config.num_agents, "starting solve");

    let paths = match solver {
        SolverChoice::Cbs => cbs_solve_stats(&grid, &scenario.starts, &scenario.goals, &mut stats),
        SolverChoice::Prioritized => {
            Some(prioritized_solve_stats(&grid, &scenario.starts, &scenario.goals, &mut stats))
        }
        SolverChoice::Auto => unreachable!("Config::resolved_solver never returns Auto"),
    };

    match paths {
        Some(paths) => {
            stats.costs = paths.iter().map(|p| p.len() - 1).sum();
            let conflict_free = detect_first_conflict(&paths).is_none();
            print_plan(&paths, config.format);
            info!(
                total_cost = stats.costs,
                conflict_free,
                high_level_expand_nodes = stats.high_level_expand_nodes,
                low_level_expand_nodes = stats.low_level_expand_nodes,
                "solve finished"
            );
        }
        None => {
            println!("no solution found");
            info!("solve finished with no solution");
        }
    }

    stats.append_csv(&config)?;
    Ok(())
}
