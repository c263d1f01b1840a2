//! Configuration loading for Smartcab runs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use smartcab_core::SmartcabError;
use smartcab_rl::LearningParams;
use smartcab_sim::WorldConfig;

/// Configuration for a training run
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub learning: LearningConfig,
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LearningConfig {
    pub alpha: f64,
    pub gamma: f64,
    /// Seed for table priors and the world; drawn at random when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        let params = LearningParams::default();
        Self {
            alpha: params.alpha,
            gamma: params.gamma,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: u32,
    pub enforce_deadline: bool,
    pub dummy_agents: usize,
    pub hard_time_limit: i32,
    pub grid_width: i32,
    pub grid_height: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            trials: 100,
            enforce_deadline: world.enforce_deadline,
            dummy_agents: world.dummy_agents,
            hard_time_limit: world.hard_time_limit,
            grid_width: world.width,
            grid_height: world.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub dump_q_table: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            dump_q_table: false,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file();

        if let Some(path) = &config_path {
            tracing::info!("Loading config from: {:?}", path);
        } else {
            tracing::info!("No config file found, using defaults");
        }

        Self::build(config_path.as_deref(), true)
    }

    /// Load configuration from a single file, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::build(Some(path), false)
    }

    fn build(path: Option<&Path>, with_env: bool) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        // SMARTCAB_LEARNING__ALPHA=0.3 style overrides
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("SMARTCAB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder.build().context("Failed to read configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> smartcab_core::Result<()> {
        let LearningConfig { alpha, gamma, .. } = self.learning;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(SmartcabError::Config(format!(
                "alpha must be within [0, 1], got {alpha}"
            )));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(SmartcabError::Config(format!(
                "gamma must be within [0, 1], got {gamma}"
            )));
        }
        if self.simulation.trials == 0 {
            return Err(SmartcabError::Config(
                "trials must be positive".to_string(),
            ));
        }
        self.world_config().validate()
    }

    pub fn learning_params(&self) -> LearningParams {
        LearningParams {
            alpha: self.learning.alpha,
            gamma: self.learning.gamma,
        }
    }

    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            width: self.simulation.grid_width,
            height: self.simulation.grid_height,
            dummy_agents: self.simulation.dummy_agents,
            enforce_deadline: self.simulation.enforce_deadline,
            hard_time_limit: self.simulation.hard_time_limit,
        }
    }

    /// Find the configuration file
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order: SMARTCAB_CONFIG env, ./smartcab.toml, ~/.config/smartcab/smartcab.toml
        if let Ok(path) = std::env::var("SMARTCAB_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let local = PathBuf::from("smartcab.toml");
        if local.exists() {
            return Some(local);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".config").join("smartcab").join("smartcab.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }
}
