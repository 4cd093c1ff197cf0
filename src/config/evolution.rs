use super::traits::ConfigSection;
use crate::error::SwarmError;
use crate::types::ReproductionMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub num_generations: usize,
    pub reproduction_mode: ReproductionMode,
    pub crossover_percent: f32,
    pub mutation_percent: f32,
    /// Chance (percent) that a surviving individual is also simplified.
    pub simplification_percent: f32,
    /// Simplification attempts per simplified individual.
    pub reproduction_simplifications: usize,
    pub tournament_size: usize,
    pub max_points_in_program: usize,
    pub max_random_code_size: usize,
    pub use_fair_mutation: bool,
    pub fair_mutation_range: f32,
    /// Parent-set size for crowding.
    pub crowding_set_size: usize,
    /// Stop as soon as the best fitness reaches this value.
    pub target_fitness: Option<f32>,
    pub seed: Option<u64>,
    pub parallel_evaluation: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_generations: 50,
            reproduction_mode: ReproductionMode::Standard,
            crossover_percent: 50.0,
            mutation_percent: 50.0,
            simplification_percent: 5.0,
            reproduction_simplifications: 25,
            tournament_size: 7,
            max_points_in_program: 100,
            max_random_code_size: 40,
            use_fair_mutation: true,
            fair_mutation_range: 0.3,
            crowding_set_size: 2,
            target_fitness: None,
            seed: None,
            parallel_evaluation: true,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), SwarmError> {
        if self.population_size < 2 {
            return Err(SwarmError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.crossover_percent < 0.0 || self.mutation_percent < 0.0 {
            return Err(SwarmError::Configuration(
                "Crossover and mutation percentages must not be negative".to_string(),
            ));
        }
        if self.crossover_percent + self.mutation_percent <= 0.0 {
            return Err(SwarmError::Configuration(
                "Crossover and mutation percentages must not both be zero".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.simplification_percent) {
            return Err(SwarmError::Configuration(
                "Simplification percentage must be between 0 and 100".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(SwarmError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.max_points_in_program < 2 || self.max_random_code_size == 0 {
            return Err(SwarmError::Configuration(
                "Program size limits are too small".to_string(),
            ));
        }
        if self.fair_mutation_range <= 0.0 {
            return Err(SwarmError::Configuration(
                "Fair mutation range must be positive".to_string(),
            ));
        }
        if self.reproduction_mode == ReproductionMode::Crowding {
            let s = self.crowding_set_size;
            if s < 2 || s % 2 != 0 {
                return Err(SwarmError::Configuration(format!(
                    "Crowding set size must be an even number of at least 2, got {}",
                    s
                )));
            }
            if self.population_size % s != 0 {
                return Err(SwarmError::Configuration(format!(
                    "Population size {} is not a multiple of the crowding set size {}",
                    self.population_size, s
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_crowding_set_must_divide_population() {
        let config = EvolutionConfig {
            reproduction_mode: ReproductionMode::Crowding,
            population_size: 10,
            crowding_set_size: 4,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EvolutionConfig {
            crowding_set_size: 3,
            population_size: 9,
            ..config
        };
        assert!(config.validate().is_err());
    }
}
