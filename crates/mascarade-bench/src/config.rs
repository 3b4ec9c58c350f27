use mascarade_bot::bot::{BotParams, ParamsError};
use mascarade_core::belief::NormalizerConfig;
use mascarade_core::model::deck::{MAX_PLAYERS, MIN_PLAYERS};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_TURNS: u32 = 200;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root tournament configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TournamentConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub beliefs: BeliefConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TournamentConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ConfigError::Read {
            source,
            path: path.clone(),
        })?;
        let parsed = serde_yaml::from_reader(BufReader::new(file));
        Self::checked(parsed, path)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::checked(serde_yaml::from_str(yaml), PathBuf::from("<inline>"))
    }

    fn checked(
        parsed: Result<Self, serde_yaml::Error>,
        path: PathBuf,
    ) -> Result<Self, ConfigError> {
        let mut cfg = match parsed {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        match cfg.validate() {
            Ok(()) => Ok(cfg),
            Err(source) => Err(ConfigError::Invalid { path, source }),
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        validate_agents(&self.agents)?;
        self.beliefs.validate()?;
        self.metrics.validate(&self.agents)?;
        self.logging.normalize();
        Ok(())
    }
}

/// How many games to play and how they are seeded.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(invalid("games.count", "number of games must be greater than zero"));
        }

        if self.max_turns == 0 {
            return Err(invalid("games.max_turns", "turn cap must be at least 1"));
        }

        Ok(())
    }
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

/// Definition of a tournament participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    /// Policy id looked up in the bot registry (`heuristic`, `random`, ...).
    pub kind: String,
    #[serde(default)]
    pub params: AgentParams,
}

/// Optional overrides on top of [`BotParams::from_env`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentParams {
    pub swap_confidence: Option<f64>,
    pub bluff_rate: Option<f64>,
    pub announce_threshold: Option<f64>,
    pub challenge_threshold: Option<f64>,
    pub seed: Option<u64>,
}

impl AgentParams {
    /// Explicit values win; anything unset falls back to `MASC_BOT_*` overrides, then defaults.
    pub fn to_bot_params(&self) -> BotParams {
        self.over(BotParams::from_env())
    }

    fn over(&self, base: BotParams) -> BotParams {
        BotParams {
            swap_confidence: self.swap_confidence.unwrap_or(base.swap_confidence),
            bluff_rate: self.bluff_rate.unwrap_or(base.bluff_rate),
            announce_threshold: self.announce_threshold.unwrap_or(base.announce_threshold),
            challenge_threshold: self
                .challenge_threshold
                .unwrap_or(base.challenge_threshold),
            seed: self.seed.unwrap_or(base.seed),
        }
    }
}

/// Normalizer tunables shared by every agent's belief.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BeliefConfig {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        let env = NormalizerConfig::from_env();
        Self {
            epsilon: env.epsilon,
            max_iterations: env.max_iterations,
        }
    }
}

impl BeliefConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(invalid("beliefs.epsilon", "epsilon must be a positive number"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("beliefs.max_iterations", "iteration cap must be at least 1"));
        }
        Ok(())
    }

    pub fn normalizer(&self) -> NormalizerConfig {
        NormalizerConfig {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
        }
    }
}

fn default_epsilon() -> f64 {
    NormalizerConfig::from_env().epsilon
}

fn default_max_iterations() -> usize {
    NormalizerConfig::from_env().max_iterations
}

/// Metrics configuration block.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub baseline: Option<String>,
}

impl MetricsConfig {
    fn validate(&self, agents: &[AgentConfig]) -> Result<(), ValidationError> {
        let Some(baseline) = self.baseline.as_ref() else {
            return Err(invalid("metrics.baseline", "baseline agent must be specified"));
        };

        if !agents.iter().any(|a| &a.name == baseline) {
            return Err(invalid(
                "metrics.baseline",
                format!("baseline agent '{baseline}' is not in the agents list"),
            ));
        }

        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// JSON lines go here when set, otherwise to stderr.
    #[serde(default)]
    pub telemetry_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            telemetry_path: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only use ASCII letters, digits, '.', '_' and '-'",
        ));
    }

    Ok(())
}

fn validate_agents(agents: &[AgentConfig]) -> Result<(), ValidationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&agents.len()) {
        return Err(invalid(
            "agents",
            format!(
                "between {MIN_PLAYERS} and {MAX_PLAYERS} agents are required, found {}",
                agents.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for agent in agents {
        if agent.name.trim().is_empty() {
            return Err(invalid("agents.name", "agent name must not be empty"));
        }

        if !agent
            .name
            .chars()
            .all(|c| RUN_ID_ALLOWED.contains(c) || c == '/')
        {
            return Err(invalid(
                format!("agents[{}].name", agent.name),
                "agent name contains invalid characters",
            ));
        }

        if !seen.insert(agent.name.clone()) {
            return Err(invalid(
                "agents",
                format!("agent '{}' is seated twice", agent.name),
            ));
        }

        if agent.kind.trim().is_empty() {
            return Err(invalid(
                format!("agents[{}].kind", agent.name),
                "policy kind must not be empty",
            ));
        }

        if let Err(ParamsError::OutOfRange { field, value }) =
            agent.params.to_bot_params().validate()
        {
            return Err(invalid(
                format!("agents[{}].params.{field}", agent.name),
                format!("must lie in [0, 1], got {value}"),
            ));
        }
    }

    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
