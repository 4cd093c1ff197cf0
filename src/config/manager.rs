use super::{
    evolution::EvolutionConfig, interpreter::InterpreterConfig,
    optimisation::OptimisationConfig, traits::ConfigSection,
};
use crate::error::SwarmError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `SWARMFORGE__EVOLUTION__SEED=7`.
pub const ENV_PREFIX: &str = "SWARMFORGE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub interpreter: InterpreterConfig,
    pub optimisation: OptimisationConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SwarmError> {
        self.evolution.validate()?;
        self.interpreter.validate()?;
        self.optimisation.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SwarmError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SwarmError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config = AppConfig::from_toml_str(&contents)?;
        info!("Loaded configuration from {}", path.display());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    /// Load a file and apply `SWARMFORGE__<SECTION>__<KEY>` environment
    /// overrides on top of it.
    pub fn load_layered<P: AsRef<Path>>(&self, path: P) -> Result<(), SwarmError> {
        let path = path.as_ref();
        let layered = ::config::Config::builder()
            .add_source(::config::File::from(path).required(true))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = layered.try_deserialize()?;
        config.validate()?;
        debug!(
            "Layered configuration: {} {} {}",
            EvolutionConfig::section_name(),
            InterpreterConfig::section_name(),
            OptimisationConfig::section_name()
        );
        info!("Loaded layered configuration from {}", path.display());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SwarmError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| SwarmError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), SwarmError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = candidate;
        Ok(())
    }
}
