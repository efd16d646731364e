//! CLI argument surface and the validated run configuration derived from it.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "mapf-cli",
    about = "Space-time A* / Conflict-Based Search solver for multi-agent pathfinding",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to an ASCII grid fixture ('.' passable, anything else blocked)")]
    pub map_path: Option<String>,

    #[arg(long, help = "Width of a randomly generated grid (ignored if --map-path is set)", default_value_t = 16)]
    pub width: usize,

    #[arg(long, help = "Height of a randomly generated grid (ignored if --map-path is set)", default_value_t = 16)]
    pub height: usize,

    #[arg(long, help = "Fraction of generated-grid cells that are blocked, in [0, 1)", default_value_t = 0.1)]
    pub obstacle_density: f64,

    #[arg(long, help = "Number of agents to generate start/goal poses for", default_value_t = 2)]
    pub num_agents: usize,

    #[arg(long, help = "Seed for the scenario RNG", default_value_t = 0)]
    pub seed: u64,

    #[arg(long, value_enum, help = "Solver to use", default_value_t = SolverChoice::Auto)]
    pub solver: SolverChoice,

    #[arg(long, help = "Append a CSV benchmark row to this file after solving")]
    pub output_path: Option<String>,

    #[arg(long, value_enum, help = "How to print the resulting joint plan", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    /// Reference policy: CBS for `agents <= 3`, prioritized otherwise.
    Auto,
    Cbs,
    Prioritized,
}

impl std::fmt::Display for SolverChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolverChoice::Auto => "auto",
            SolverChoice::Cbs => "cbs",
            SolverChoice::Prioritized => "prioritized",
        };
        write!(f, "{s}")
    }
}

/// Printed representation of the joint plan. `Json` is what a collaborator parsing the CLI's
/// output programmatically wants; `Text` is what a human running the binary by hand wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub map_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub obstacle_density: f64,
    pub num_agents: usize,
    pub seed: u64,
    pub solver: SolverChoice,
    pub output_path: Option<String>,
    pub format: OutputFormat,
}

impl Config {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = Config {
            map_path: cli.map_path.clone(),
            width: cli.width,
            height: cli.height,
            obstacle_density: cli.obstacle_density,
            num_agents: cli.num_agents,
            seed: cli.seed,
            solver: cli.solver,
            output_path: cli.output_path.clone(),
            format: cli.format,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.num_agents == 0 {
            return Err(anyhow!("num_agents must be at least 1"));
        }
        if self.map_path.is_none() && (self.width == 0 || self.height == 0) {
            return Err(anyhow!("width and height must be positive when no --map-path is given"));
        }
        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(anyhow!(
                "obstacle_density must be in [0, 1), got {}",
                self.obstacle_density
            ));
        }
        Ok(())
    }

    /// The small-instance-gets-optimality policy: CBS for small agent counts, prioritized
    /// otherwise, same split the reference workspace's own solver dispatch draws.
    pub fn resolved_solver(&self) -> SolverChoice {
        match self.solver {
            SolverChoice::Auto if self.num_agents <= 3 => SolverChoice::Cbs,
            SolverChoice::Auto => SolverChoice::Prioritized,
            explicit => explicit,
        }
    }
}
