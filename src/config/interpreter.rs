use super::traits::ConfigSection;
use crate::error::SwarmError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Length of every vector; must match the problems' dimensionality.
    pub vector_dimensions: usize,
    pub min_random_int: i32,
    pub max_random_int: i32,
    pub random_int_resolution: i32,
    pub min_random_float: f32,
    pub max_random_float: f32,
    /// Granularity of float constants; zero means continuous.
    pub random_float_resolution: f32,
    /// Steps per program execution.
    pub execution_limit: usize,
    /// Steps per component inside `vector.apply` and `vector.zip`.
    pub nested_execution_limit: usize,
    pub max_nesting_depth: usize,
    /// Upper bound on code built at run time by the code and exec instructions.
    pub max_code_points: usize,
    pub instructions: Vec<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            vector_dimensions: 2,
            min_random_int: -10,
            max_random_int: 10,
            random_int_resolution: 1,
            min_random_float: -1.0,
            max_random_float: 1.0,
            random_float_resolution: 0.0,
            execution_limit: 100,
            nested_execution_limit: 100,
            max_nesting_depth: 4,
            max_code_points: 200,
            instructions: vec![
                "registered.vector".to_string(),
                "registered.float".to_string(),
                "registered.integer".to_string(),
                "registered.boolean".to_string(),
                "registered.exec".to_string(),
                "registered.input".to_string(),
            ],
        }
    }
}

impl ConfigSection for InterpreterConfig {
    fn section_name() -> &'static str {
        "interpreter"
    }

    fn validate(&self) -> Result<(), SwarmError> {
        if self.vector_dimensions == 0 {
            return Err(SwarmError::Configuration(
                "Vector dimensionality must be at least 1".to_string(),
            ));
        }
        if self.min_random_int > self.max_random_int || self.min_random_float > self.max_random_float {
            return Err(SwarmError::Configuration(
                "Random value ranges must have min <= max".to_string(),
            ));
        }
        if self.random_int_resolution < 1 || self.random_float_resolution < 0.0 {
            return Err(SwarmError::Configuration(
                "Random value resolutions must be positive".to_string(),
            ));
        }
        if self.execution_limit == 0 {
            return Err(SwarmError::Configuration(
                "Execution limit must be at least 1".to_string(),
            ));
        }
        if self.instructions.is_empty() {
            return Err(SwarmError::Configuration(
                "At least one instruction must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}
