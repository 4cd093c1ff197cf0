use std::collections::BTreeMap;
use std::path::PathBuf;

use super::traits::ConfigSection;
use crate::error::SwarmError;
use crate::types::StartMode;
use serde::{Deserialize, Serialize};

/// Settings for how each evolved optimiser is tested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimisationConfig {
    pub problems: Vec<String>,
    pub moves: usize,
    pub runs: usize,
    pub swarm_size: usize,
    pub start_mode: StartMode,
    pub starts_file: PathBuf,
    pub evolve_swarm_size: bool,
    pub max_swarm_size: usize,
    /// With an evolved swarm size, moves are `max_evaluations / swarm_size`.
    pub max_evaluations: usize,
    pub swarm_size_mutation_rate: f64,
    pub transform_problems: bool,
    pub lower_scale: f32,
    pub upper_scale: f32,
    pub lower_translate: f32,
    pub upper_translate: f32,
    /// Number of final programs pooled into an ensemble; zero disables it.
    pub ensemble_size: usize,
    /// Flattened start coordinates per problem name, `swarm_size * dims`
    /// values each, used when `start_mode` is `defined`.
    pub defined_starts: BTreeMap<String, Vec<f32>>,
}

impl Default for OptimisationConfig {
    fn default() -> Self {
        Self {
            problems: vec!["sphere".to_string(), "rastrigin".to_string()],
            moves: 50,
            runs: 3,
            swarm_size: 10,
            start_mode: StartMode::Random,
            starts_file: PathBuf::from("starts.txt"),
            evolve_swarm_size: false,
            max_swarm_size: 50,
            max_evaluations: 500,
            swarm_size_mutation_rate: 0.05,
            transform_problems: false,
            lower_scale: 0.5,
            upper_scale: 2.0,
            lower_translate: -0.5,
            upper_translate: 0.5,
            ensemble_size: 0,
            defined_starts: BTreeMap::new(),
        }
    }
}

impl ConfigSection for OptimisationConfig {
    fn section_name() -> &'static str {
        "optimisation"
    }

    fn validate(&self) -> Result<(), SwarmError> {
        if self.problems.is_empty() {
            return Err(SwarmError::Configuration(
                "At least one problem is required".to_string(),
            ));
        }
        if self.runs == 0 || self.swarm_size == 0 {
            return Err(SwarmError::Configuration(
                "Runs and swarm size must be at least 1".to_string(),
            ));
        }
        if !self.evolve_swarm_size && self.moves == 0 {
            return Err(SwarmError::Configuration(
                "Moves must be at least 1".to_string(),
            ));
        }
        if self.evolve_swarm_size {
            if self.max_swarm_size < 2 {
                return Err(SwarmError::Configuration(
                    "Max swarm size must be at least 2 when it evolves".to_string(),
                ));
            }
            if self.max_evaluations < self.max_swarm_size {
                return Err(SwarmError::Configuration(
                    "Max evaluations must allow at least one move for the largest swarm".to_string(),
                ));
            }
            if self.start_mode != StartMode::Random {
                return Err(SwarmError::Configuration(
                    "Saved start points need a fixed swarm size".to_string(),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.swarm_size_mutation_rate) {
            return Err(SwarmError::Configuration(
                "Swarm size mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.lower_scale <= 0.0 || self.lower_scale > self.upper_scale {
            return Err(SwarmError::Configuration(
                "Scale range must be positive with lower <= upper".to_string(),
            ));
        }
        if self.lower_translate > self.upper_translate {
            return Err(SwarmError::Configuration(
                "Translate range must have lower <= upper".to_string(),
            ));
        }
        Ok(())
    }
}
