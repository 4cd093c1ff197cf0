use std::f64::consts::PI;

use super::Problem;
use crate::error::{Result, SwarmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticFunction {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
    Griewank,
    /// Schwefel's problem 1.2, the sum of squared prefix sums.
    Schwefel,
}

impl AnalyticFunction {
    pub const ALL: [AnalyticFunction; 6] = [
        AnalyticFunction::Sphere,
        AnalyticFunction::Rastrigin,
        AnalyticFunction::Rosenbrock,
        AnalyticFunction::Ackley,
        AnalyticFunction::Griewank,
        AnalyticFunction::Schwefel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnalyticFunction::Sphere => "sphere",
            AnalyticFunction::Rastrigin => "rastrigin",
            AnalyticFunction::Rosenbrock => "rosenbrock",
            AnalyticFunction::Ackley => "ackley",
            AnalyticFunction::Griewank => "griewank",
            AnalyticFunction::Schwefel => "schwefel",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| SwarmError::Problem(format!("Unknown problem: {}", name)))
    }

    fn bounds(self) -> (f32, f32) {
        match self {
            AnalyticFunction::Sphere | AnalyticFunction::Rosenbrock | AnalyticFunction::Schwefel => {
                (-100.0, 100.0)
            }
            AnalyticFunction::Rastrigin => (-5.0, 5.0),
            AnalyticFunction::Ackley => (-32.0, 32.0),
            AnalyticFunction::Griewank => (-600.0, 600.0),
        }
    }

    /// Value at the global optimum, reported by the raw evaluation.
    fn optimum(self) -> f64 {
        match self {
            AnalyticFunction::Sphere | AnalyticFunction::Schwefel => -450.0,
            AnalyticFunction::Rosenbrock => 390.0,
            AnalyticFunction::Rastrigin => -330.0,
            AnalyticFunction::Ackley => -140.0,
            AnalyticFunction::Griewank => -180.0,
        }
    }

    fn evaluate(self, x: &[f64]) -> f64 {
        let n = x.len() as f64;
        let raw = match self {
            AnalyticFunction::Sphere => x.iter().map(|v| v * v).sum(),
            AnalyticFunction::Rastrigin => x
                .iter()
                .map(|v| v * v - 10.0 * (2.0 * PI * v).cos() + 10.0)
                .sum(),
            // minimum at (1, .., 1); shifted so the optimum sits at the origin
            AnalyticFunction::Rosenbrock => x
                .windows(2)
                .map(|w| {
                    let (a, b) = (w[0] + 1.0, w[1] + 1.0);
                    100.0 * (a * a - b).powi(2) + (a - 1.0).powi(2)
                })
                .sum(),
            AnalyticFunction::Ackley => {
                if x.is_empty() {
                    0.0
                } else {
                    let squares: f64 = x.iter().map(|v| v * v).sum::<f64>() / n;
                    let cosines: f64 = x.iter().map(|v| (2.0 * PI * v).cos()).sum::<f64>() / n;
                    -20.0 * (-0.2 * squares.sqrt()).exp() - cosines.exp() + 20.0 + std::f64::consts::E
                }
            }
            AnalyticFunction::Griewank => {
                let sum: f64 = x.iter().map(|v| v * v).sum::<f64>() / 4000.0;
                let product: f64 = x
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (v / ((i + 1) as f64).sqrt()).cos())
                    .product();
                sum - product + 1.0
            }
            AnalyticFunction::Schwefel => {
                let mut prefix = 0.0;
                x.iter()
                    .map(|v| {
                        prefix += v;
                        prefix * prefix
                    })
                    .sum()
            }
        };
        raw + self.optimum()
    }
}

/// An analytic benchmark of fixed dimensionality.
#[derive(Debug, Clone)]
pub struct AnalyticProblem {
    function: AnalyticFunction,
    dimensions: usize,
    lower: f32,
    upper: f32,
}

impl AnalyticProblem {
    pub fn new(function: AnalyticFunction, dimensions: usize) -> Self {
        let (lower, upper) = function.bounds();
        Self {
            function,
            dimensions,
            lower,
            upper,
        }
    }

    pub fn function(&self) -> AnalyticFunction {
        self.function
    }

    /// Raw objective value, offset by the function's optimum.
    pub fn evaluate(&self, point: &[f32]) -> f32 {
        let x: Vec<f64> = point.iter().map(|v| f64::from(*v)).collect();
        self.function.evaluate(&x) as f32
    }
}

impl Problem for AnalyticProblem {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn dimensionality(&self) -> usize {
        self.dimensions
    }

    fn lower_bound(&self, _dim: usize) -> f32 {
        self.lower
    }

    fn upper_bound(&self, _dim: usize) -> f32 {
        self.upper
    }

    fn error(&self, point: &[f32]) -> f32 {
        let x: Vec<f64> = point.iter().map(|v| f64::from(*v)).collect();
        (self.function.evaluate(&x) - self.function.optimum()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_zero_at_origin() {
        for function in AnalyticFunction::ALL {
            let problem = AnalyticProblem::new(function, 4);
            let error = problem.error(&[0.0; 4]);
            assert!(error.abs() < 1e-6, "{} gave {}", function.name(), error);
        }
    }

    #[test]
    fn test_error_positive_away_from_origin() {
        for function in AnalyticFunction::ALL {
            let problem = AnalyticProblem::new(function, 3);
            assert!(problem.error(&[0.7, -0.3, 0.9]) > 0.0, "{}", function.name());
        }
    }

    #[test]
    fn test_raw_evaluation_includes_optimum() {
        let problem = AnalyticProblem::new(AnalyticFunction::Sphere, 2);
        assert_eq!(problem.evaluate(&[0.0, 0.0]), -450.0);
        assert_eq!(problem.error(&[3.0, 4.0]), 25.0);
    }

    #[test]
    fn test_names_resolve() {
        assert_eq!(AnalyticFunction::from_name(" Ackley").unwrap(), AnalyticFunction::Ackley);
        assert!(AnalyticFunction::from_name("cec1").is_err());
    }
}
