//! Training run command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use smartcab_core::RunSummary;
use smartcab_rl::{CsvTrialRecorder, LearningAgent, LearningParams, QTable, TrialController, WaypointFollower};
use smartcab_sim::{GridPlanner, GridWorld, Simulator};

use crate::config::Config;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentKind {
    /// Tabular Q-learning agent
    #[default]
    Learning,
    /// Baseline that follows the planner whenever the rules allow it
    Waypoint,
}

/// Flags that override the loaded configuration
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Number of trials
    #[arg(short = 'n', long)]
    pub trials: Option<u32>,
    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,
    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,
    /// Seed for the Q-table priors and the world
    #[arg(long)]
    pub seed: Option<u64>,
    /// Agent to drive the primary vehicle
    #[arg(long, value_enum, default_value_t = AgentKind::Learning)]
    pub agent: AgentKind,
    /// Let trials run until the hard time limit
    #[arg(long)]
    pub no_deadline: bool,
    /// Directory for trial logs
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Also write the final Q-table as JSON
    #[arg(long)]
    pub dump_q_table: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(trials) = self.trials {
            config.simulation.trials = trials;
        }
        if let Some(alpha) = self.alpha {
            config.learning.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.learning.gamma = gamma;
        }
        if self.seed.is_some() {
            config.learning.seed = self.seed;
        }
        if self.no_deadline {
            config.simulation.enforce_deadline = false;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory.clone_from(dir);
        }
        if self.dump_q_table {
            config.output.dump_q_table = true;
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    let summary = execute(&config, args.agent)?;
    print_summary(&summary);
    Ok(())
}

/// Run a full training session described by `config`
pub fn execute(config: &Config, agent_kind: AgentKind) -> Result<RunSummary> {
    config.validate()?;

    let seed = config.learning.seed.unwrap_or_else(rand::random);
    let params = config.learning_params();
    info!(seed, alpha = params.alpha, gamma = params.gamma, "Starting training run");

    let world = GridWorld::new(config.world_config(), seed)?;
    let mut simulator = Simulator::new(world, GridPlanner::new());
    let recorder = CsvTrialRecorder::for_params(&config.output.directory, params);
    let mut controller = TrialController::new(config.simulation.trials, recorder);

    let summary = match agent_kind {
        AgentKind::Learning => {
            // Priors use a stream separate from the world's
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
            let mut agent = LearningAgent::new(params, &mut rng);
            let summary = simulator.run(&mut agent, &mut controller)?;
            if config.output.dump_q_table {
                dump_q_table(&config.output.directory, params, agent.q_table())?;
            }
            summary
        }
        AgentKind::Waypoint => {
            let mut agent = WaypointFollower::new();
            simulator.run(&mut agent, &mut controller)?
        }
    };

    info!(path = %controller.recorder().path().display(), "Trial log written");
    Ok(summary)
}

/// File name for a Q-table dump, e.g. `q_table_alpha0.5_gamma0.2.json`
pub fn q_table_file_name(params: LearningParams) -> String {
    format!("q_table_alpha{}_gamma{}.json", params.alpha, params.gamma)
}

fn dump_q_table(dir: &Path, params: LearningParams, table: &QTable) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(q_table_file_name(params));
    let json = serde_json::to_string_pretty(&table.entries())?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Q-table written");
    Ok(path)
}

fn print_summary(summary: &RunSummary) {
    println!("Run {} ({})", summary.run_id, summary.agent);
    println!("  Trials:        {}", summary.trials);
    println!("  Successes:     {}", summary.successes);
    println!("  Failures:      {}", summary.failures);
    println!("  Aborts:        {}", summary.aborts);
    println!("  Success rate:  {:.1}%", summary.success_rate * 100.0);
    println!("  Last 10 rate:  {:.1}%", summary.last_ten_success_rate * 100.0);
    println!("  Mean steps:    {:.2}", summary.mean_steps);
}
