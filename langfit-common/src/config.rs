//! Configuration loading and config file resolution
//!
//! Configuration is a single TOML file in which every field is optional:
//!
//! ```toml
//! catalog_path = "/path/to/catalog.toml"
//! templates_path = "/path/to/templates.toml"
//!
//! [logging]
//! level = "info"
//!
//! [engine]
//! candidate_floor = 6
//! question_cap = 10
//!
//! [engine.weights]
//! domain = 3
//! ```
//!
//! # Config File Priority
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`LANGFIT_CONFIG`)
//! 3. User config directory (`<config_dir>/langfit/config.toml`)
//! 4. Compiled defaults
//!
//! A file named explicitly (1 or 2) must exist and parse. A missing file in
//! the user config directory only logs a warning and falls through to the
//! compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LANGFIT_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Alternative language catalog (built-in catalog when absent)
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Alternative question template bank (built-in bank when absent)
    #[serde(default)]
    pub templates_path: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Matching engine tuning (optional)
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Matching engine tuning parameters
///
/// Defaults reproduce the stock quiz behavior: a candidate floor of 6 with a
/// ceiling of 20, up to 10 adaptive questions (at least 6 when available),
/// a 30% coverage filter and a 5.0 quality threshold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Relax the candidate search while fewer than this many languages match
    #[serde(default = "default_candidate_floor")]
    pub candidate_floor: usize,

    /// Hard upper bound on the candidate set
    #[serde(default = "default_candidate_ceiling")]
    pub candidate_ceiling: usize,

    /// Maximum number of adaptive questions
    #[serde(default = "default_question_cap")]
    pub question_cap: usize,

    /// Minimum number of adaptive questions when enough valid ones exist
    #[serde(default = "default_question_floor")]
    pub question_floor: usize,

    /// Fraction of the candidate set a question must cover (0.0 - 1.0)
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,

    /// Quality score a question needs to be selected without top-up
    #[serde(default = "default_min_quality")]
    pub min_quality: f64,

    /// Candidate sets at least this large get extra short questions
    #[serde(default = "default_large_candidate_set")]
    pub large_candidate_set: usize,

    /// Candidate sets at most this large get a bespoke tie-break question
    #[serde(default = "default_small_candidate_set")]
    pub small_candidate_set: usize,

    /// Language resolved when the candidate set is empty
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,

    /// Score weight per question category
    #[serde(default)]
    pub weights: CategoryWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_floor: default_candidate_floor(),
            candidate_ceiling: default_candidate_ceiling(),
            question_cap: default_question_cap(),
            question_floor: default_question_floor(),
            min_coverage: default_min_coverage(),
            min_quality: default_min_quality(),
            large_candidate_set: default_large_candidate_set(),
            small_candidate_set: default_small_candidate_set(),
            fallback_language: default_fallback_language(),
            weights: CategoryWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Check the parameters for internal consistency
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.candidate_ceiling == 0 {
            return Err(Error::Config("candidate_ceiling must be at least 1".to_string()));
        }
        if self.candidate_floor > self.candidate_ceiling {
            return Err(Error::Config(format!(
                "candidate_floor ({}) exceeds candidate_ceiling ({})",
                self.candidate_floor, self.candidate_ceiling
            )));
        }
        if self.question_cap == 0 {
            return Err(Error::Config("question_cap must be at least 1".to_string()));
        }
        if self.question_floor > self.question_cap {
            return Err(Error::Config(format!(
                "question_floor ({}) exceeds question_cap ({})",
                self.question_floor, self.question_cap
            )));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(Error::Config(format!(
                "min_coverage must be within 0.0 - 1.0, got {}",
                self.min_coverage
            )));
        }
        if !self.min_quality.is_finite() {
            return Err(Error::Config("min_quality must be a finite number".to_string()));
        }
        if self.small_candidate_set >= self.large_candidate_set {
            return Err(Error::Config(format!(
                "small_candidate_set ({}) must be below large_candidate_set ({})",
                self.small_candidate_set, self.large_candidate_set
            )));
        }
        if self.fallback_language.trim().is_empty() {
            return Err(Error::Config("fallback_language must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Points awarded per answer, by question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_domain_weight")]
    pub domain: u32,
    #[serde(default = "default_performance_weight")]
    pub performance: u32,
    #[serde(default = "default_minor_weight")]
    pub style: u32,
    #[serde(default = "default_minor_weight")]
    pub ecosystem: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            domain: default_domain_weight(),
            performance: default_performance_weight(),
            style: default_minor_weight(),
            ecosystem: default_minor_weight(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_candidate_floor() -> usize {
    6
}

fn default_candidate_ceiling() -> usize {
    20
}

fn default_question_cap() -> usize {
    10
}

fn default_question_floor() -> usize {
    6
}

fn default_min_coverage() -> f64 {
    0.30
}

fn default_min_quality() -> f64 {
    5.0
}

fn default_large_candidate_set() -> usize {
    12
}

fn default_small_candidate_set() -> usize {
    4
}

fn default_fallback_language() -> String {
    "python".to_string()
}

fn default_domain_weight() -> u32 {
    3
}

fn default_performance_weight() -> u32 {
    2
}

fn default_minor_weight() -> u32 {
    1
}

impl TomlConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or fails
    /// `EngineConfig::validate`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` argument
    CommandLine(PathBuf),
    /// `LANGFIT_CONFIG` environment variable
    Environment(PathBuf),
    /// `<config_dir>/langfit/config.toml`
    UserConfigDir(PathBuf),
    /// No file; compiled defaults
    CompiledDefaults,
}

impl ConfigSource {
    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserConfigDir(p) => Some(p),
            ConfigSource::CompiledDefaults => None,
        }
    }

    /// Whether the file was named explicitly and therefore must exist
    pub fn is_explicit(&self) -> bool {
        matches!(
            self,
            ConfigSource::CommandLine(_) | ConfigSource::Environment(_)
        )
    }
}

/// Resolves the configuration file following the priority order above
pub struct ConfigResolver {
    env_var_name: String,
    user_config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create resolver using `LANGFIT_CONFIG` and the platform config directory
    pub fn new() -> Self {
        Self {
            env_var_name: CONFIG_ENV_VAR.to_string(),
            user_config_path: default_user_config_path(),
        }
    }

    /// Override the implicit user config location (tests, packaging)
    pub fn with_user_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.user_config_path = path;
        self
    }

    /// Determine the config source without reading it
    ///
    /// # Arguments
    /// * `cli_arg` - Value of `--config`, if given
    pub fn resolve(&self, cli_arg: Option<&Path>) -> ConfigSource {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return ConfigSource::CommandLine(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        // Priority 3: User config directory
        match &self.user_config_path {
            Some(path) if path.exists() => ConfigSource::UserConfigDir(path.clone()),
            Some(path) => {
                warn!(
                    "No config file at {}, using compiled defaults",
                    path.display()
                );
                ConfigSource::CompiledDefaults
            }
            // Priority 4: Compiled defaults
            None => {
                warn!("Could not determine config directory, using compiled defaults");
                ConfigSource::CompiledDefaults
            }
        }
    }

    /// Resolve and load the effective configuration
    ///
    /// # Returns
    /// The parsed configuration and the source it came from
    ///
    /// # Errors
    /// Returns error if an explicitly named file is missing, or if any
    /// resolved file fails to parse or validate.
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
        let source = self.resolve(cli_arg);
        let config = match source.path() {
            Some(path) => {
                if source.is_explicit() && !path.exists() {
                    return Err(Error::Config(format!("Config file not found: {}", path.display())));
                }
                let config = TomlConfig::from_file(path)?;
                info!("Loaded configuration from {}", path.display());
                config
            }
            None => TomlConfig::default(),
        };
        Ok((config, source))
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Default location of the per-user config file
pub fn default_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("langfit").join("config.toml"))
}
