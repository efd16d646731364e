//! Per-run counters threaded through a solve call, surfaced by the CLI as a CSV benchmark row.

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use tracing::error;

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub costs: usize,
    pub time_ms: usize,
    pub low_level_expand_nodes: usize,
    pub high_level_expand_nodes: usize,
}

impl Stats {
    /// Appends one CSV row to `config.output_path`, if set. A missing `output_path` is not an
    /// error: benchmarking is opt-in.
    pub fn append_csv(&self, config: &Config) -> Result<()> {
        let Some(output_path) = &config.output_path else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(output_path)
            .with_context(|| format!("opening stats output file '{output_path}'"))?;

        let row = format!(
            "{},{},{},{},{},{},{}\n",
            config.map_path.as_deref().unwrap_or("<generated>"),
            config.num_agents,
            config.seed,
            config.solver,
            self.costs,
            self.time_ms,
            self.high_level_expand_nodes,
        );

        if let Err(e) = file.write_all(row.as_bytes()) {
            error!(%output_path, error = %e, "failed to append stats row");
            return Err(e).with_context(|| format!("writing stats row to '{output_path}'"));
        }

        Ok(())
    }
}
