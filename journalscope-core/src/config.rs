//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/journalscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/journalscope/` (~/.config/journalscope/)
//! - State/Logs: `$XDG_STATE_HOME/journalscope/` (~/.local/state/journalscope/)

use crate::error::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Largest timezone offset accepted, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Longest consistency window accepted, about ten years.
const MAX_CONSISTENCY_WINDOW_DAYS: u32 = 3660;

/// Largest chart bucket count accepted, daily or weekly.
const MAX_CHART_BUCKETS: usize = 3660;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Narrative service configuration (optional)
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Insight generation limits
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// LLM provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider type
    pub provider: LlmProvider,
    /// Model to use
    pub model: String,
    /// API endpoint (optional, uses default for provider)
    pub endpoint: Option<String>,
    /// API key (can also use env var)
    pub api_key: Option<String>,
    /// Upper bound on a single narrative request
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Endpoint to call, falling back to the provider default.
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.provider.default_endpoint().to_string())
    }

    /// API key from config or the provider's environment variable.
    ///
    /// Hosted providers require a key; Ollama never uses one.
    pub fn resolved_api_key(&self) -> Result<Option<String>> {
        let key = match self.provider {
            LlmProvider::Ollama => return Ok(None),
            LlmProvider::Claude => self
                .api_key
                .clone()
                .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok()),
            LlmProvider::OpenAI => self
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        };
        match key {
            Some(key) => Ok(Some(key)),
            None => Err(Error::Config(
                "llm.api_key (or provider env var) is required".to_string(),
            )),
        }
    }

    /// Timeout clamped to at least one second.
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.max(1)
    }
}

fn default_llm_timeout_secs() -> u64 {
    30
}

/// Supported LLM providers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    Claude,
    OpenAI,
}

impl LlmProvider {
    /// Returns the default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "ollama",
            LlmProvider::Claude => "claude",
            LlmProvider::OpenAI => "openai",
        }
    }
}

/// Analytics configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    /// Days counted by the consistency score
    #[serde(default = "default_consistency_window_days")]
    pub consistency_window_days: u32,

    /// Most recent daily chart buckets to keep
    #[serde(default = "default_daily_buckets")]
    pub daily_buckets: usize,

    /// Most recent weekly chart buckets to keep
    #[serde(default = "default_weekly_buckets")]
    pub weekly_buckets: usize,

    /// Zero-fill empty chart buckets
    #[serde(default)]
    pub dense_charts: bool,

    /// Reference timezone as minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Cap on the entry transcript embedded in narrative prompts
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            consistency_window_days: default_consistency_window_days(),
            daily_buckets: default_daily_buckets(),
            weekly_buckets: default_weekly_buckets(),
            dense_charts: false,
            utc_offset_minutes: 0,
            max_prompt_chars: default_max_prompt_chars(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.consistency_window_days == 0 {
            return Err(Error::Config(
                "analytics.consistency_window_days must be at least 1".to_string(),
            ));
        }
        if self.consistency_window_days > MAX_CONSISTENCY_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "analytics.consistency_window_days must be at most {}",
                MAX_CONSISTENCY_WINDOW_DAYS
            )));
        }
        if self.daily_buckets == 0 || self.weekly_buckets == 0 {
            return Err(Error::Config(
                "analytics.daily_buckets and analytics.weekly_buckets must be at least 1"
                    .to_string(),
            ));
        }
        if self.daily_buckets > MAX_CHART_BUCKETS || self.weekly_buckets > MAX_CHART_BUCKETS {
            return Err(Error::Config(format!(
                "analytics.daily_buckets and analytics.weekly_buckets must be at most {}",
                MAX_CHART_BUCKETS
            )));
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(Error::Config(format!(
                "analytics.utc_offset_minutes must be within ±{}",
                MAX_UTC_OFFSET_MINUTES
            )));
        }
        Ok(())
    }

    /// The reference timezone used for calendar-day keys.
    pub fn reference_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config(format!(
                "invalid utc_offset_minutes: {}",
                self.utc_offset_minutes
            ))
        })
    }
}

fn default_consistency_window_days() -> u32 {
    7
}

fn default_daily_buckets() -> usize {
    30
}

fn default_weekly_buckets() -> usize {
    12
}

fn default_max_prompt_chars() -> usize {
    16_000
}

/// Limits on narrative generation
#[derive(Debug, Deserialize, Clone, Default)]
pub struct InsightsConfig {
    /// Maximum narrative service calls per usage window (unlimited if absent)
    pub limit: Option<u32>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analytics.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/journalscope/config.toml` (~/.config/journalscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("journalscope").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/journalscope/` (~/.local/state/journalscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("journalscope")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/journalscope/journalscope.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("journalscope.log")
    }
}
