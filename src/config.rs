use log::warn;
use serde::{Deserialize, Serialize};

use std::path::Path;
use std::time::Duration;

use crate::benchmark::BenchmarkConfig;
use crate::difficulty::DifficultyTable;
use crate::error::ConfigError;
use crate::evaluation::EvaluatorProfile;
use crate::solver::{SearchConfig, WIN_SCORE};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub difficulty: DifficultyTable,
    pub search: SearchSettings,
    pub benchmark: BenchmarkConfig,
}

/// Search settings as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Name of a built-in evaluator profile
    pub profile: String,
    /// Extra penalty for lost positions, 0 keeps win and loss symmetric
    pub loss_bias: i32,
    pub node_budget: Option<usize>,
    pub time_limit_ms: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            profile: EvaluatorProfile::STANDARD.name.to_string(),
            loss_bias: 0,
            node_budget: None,
            time_limit_ms: None,
        }
    }
}

impl SearchSettings {
    /// Resolves the settings into a `SearchConfig` with pruning enabled
    pub fn to_search_config(&self) -> Result<SearchConfig, ConfigError> {
        let profile = EvaluatorProfile::by_name(&self.profile)?;
        let mut config = SearchConfig::default()
            .with_profile(profile)
            .with_loss_bias(self.loss_bias);
        if let Some(nodes) = self.node_budget {
            config = config.with_node_budget(nodes);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        EvaluatorProfile::by_name(&self.profile)?.validate()?;
        if self.loss_bias < 0 || self.loss_bias > WIN_SCORE {
            return Err(ConfigError::Validation(format!(
                "search.loss_bias must be in [0, {}]",
                WIN_SCORE
            )));
        }
        if self.node_budget == Some(0) {
            return Err(ConfigError::Validation(
                "search.node_budget must be > 0".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::Validation(
                "search.time_limit_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;
        self.search.validate()?;
        self.benchmark.validate()?;
        Ok(())
    }
}
