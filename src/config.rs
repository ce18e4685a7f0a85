use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use idearalph::llm::GatewaySettings;
use idearalph::llm::anthropic::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use idearalph::llm::gateway::DEFAULT_API_KEY_ENV;
use idearalph::runner::{DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_ITERATIONS_CAP, LoopConfig, LoopRunnerConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub ralph: RalphConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: 300000,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RalphConfig {
    pub max_iterations: u32,
    pub dope_threshold: u8,
    pub chaos_level: u8,
    pub max_iterations_cap: u32,
}

impl Default for RalphConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            dope_threshold: 4,
            chaos_level: 5,
            max_iterations_cap: DEFAULT_MAX_ITERATIONS_CAP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: idearalph::storage::default_store_dir(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from {}: {}", primary_config.display(), e),
                }
            }
        }

        // ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Failed to load config from {}: {}", fallback_config.display(), e),
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            timeout: Duration::from_millis(self.llm.timeout_ms),
            api_key_env: self.llm.api_key_env.clone(),
        }
    }

    /// Loop settings before any command-line overrides
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            max_iterations: self.ralph.max_iterations,
            dope_threshold: self.ralph.dope_threshold,
            chaos_level: self.ralph.chaos_level,
            user_id: None,
        }
    }

    pub fn runner_config(&self) -> LoopRunnerConfig {
        LoopRunnerConfig {
            max_iterations_cap: self.ralph.max_iterations_cap,
        }
    }
}
