//! Objective functions the evolved optimisers are tested on.
//!
//! The engines only see the [`Problem`] trait. Analytic benchmarks and the
//! randomly transformed wrapper are the two adapters provided here.

pub mod analytic;
pub mod transformed;

use std::sync::Arc;

use log::info;
use rand::Rng;

use crate::config::OptimisationConfig;
use crate::error::{Result, SwarmError};

pub use analytic::{AnalyticFunction, AnalyticProblem};
pub use transformed::TransformedProblem;

pub trait Problem: Send + Sync {
    fn name(&self) -> &str;

    fn dimensionality(&self) -> usize;

    fn lower_bound(&self, dim: usize) -> f32;

    fn upper_bound(&self, dim: usize) -> f32;

    fn is_within_bounds(&self, point: &[f32]) -> bool {
        point.len() == self.dimensionality()
            && point
                .iter()
                .enumerate()
                .all(|(i, x)| *x >= self.lower_bound(i) && *x <= self.upper_bound(i))
    }

    /// Objective value minus the known optimum.
    fn error(&self, point: &[f32]) -> f32;
}

/// Build the configured problem list, transforming each problem when asked.
pub fn build_problems<R: Rng>(
    config: &OptimisationConfig,
    dimensions: usize,
    rng: &mut R,
) -> Result<Vec<Arc<dyn Problem>>> {
    let mut problems: Vec<Arc<dyn Problem>> = Vec::with_capacity(config.problems.len());
    for name in &config.problems {
        let function = AnalyticFunction::from_name(name)?;
        let base = AnalyticProblem::new(function, dimensions);
        if config.transform_problems {
            let transformed = TransformedProblem::new(
                base,
                rng,
                (config.lower_scale, config.upper_scale),
                (config.lower_translate, config.upper_translate),
            );
            info!("Transformed problem {}: {:?}", name, transformed.describe());
            problems.push(Arc::new(transformed));
        } else {
            problems.push(Arc::new(base));
        }
    }
    for problem in &problems {
        if problem.dimensionality() != dimensions {
            return Err(SwarmError::Problem(format!(
                "{} has {} dimensions, interpreter vectors have {}",
                problem.name(),
                problem.dimensionality(),
                dimensions
            )));
        }
    }
    Ok(problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_rejects_unknown_names() {
        let config = OptimisationConfig {
            problems: vec!["sphere".to_string(), "warp".to_string()],
            ..OptimisationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_problems(&config, 2, &mut rng).is_err());
    }

    #[test]
    fn test_bounds_check_uses_every_dimension() {
        let problem = AnalyticProblem::new(AnalyticFunction::Rastrigin, 3);
        assert!(problem.is_within_bounds(&[0.0, 5.0, -5.0]));
        assert!(!problem.is_within_bounds(&[0.0, 5.1, 0.0]));
        assert!(!problem.is_within_bounds(&[0.0, 0.0]));
    }
}
