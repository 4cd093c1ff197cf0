use rand::Rng;

use super::Problem;

/// A problem whose coordinates are randomly scaled, translated and
/// reflected, so evolved optimisers cannot rely on where the optimum lies.
#[derive(Debug, Clone)]
pub struct TransformedProblem<P> {
    inner: P,
    scales: Vec<f32>,
    offsets: Vec<f32>,
    flips: Vec<bool>,
    lower: Vec<f32>,
    upper: Vec<f32>,
}

/// The random parameters of a [`TransformedProblem`], for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub scales: Vec<f32>,
    pub offsets: Vec<f32>,
    pub flips: Vec<bool>,
}

impl<P: Problem> TransformedProblem<P> {
    /// Offsets are drawn as fractions of each dimension's range.
    pub fn new<R: Rng>(inner: P, rng: &mut R, scale: (f32, f32), translate: (f32, f32)) -> Self {
        let dims = inner.dimensionality();
        let scales: Vec<f32> = (0..dims)
            .map(|_| rng.gen::<f32>() * (scale.1 - scale.0) + scale.0)
            .collect();
        let offsets: Vec<f32> = (0..dims)
            .map(|i| {
                let range = inner.upper_bound(i) - inner.lower_bound(i);
                rng.gen::<f32>() * (translate.1 - translate.0) * range + translate.0 * range
            })
            .collect();
        let flips: Vec<bool> = (0..dims).map(|_| rng.gen_bool(0.5)).collect();
        Self::with_transform(
            inner,
            Transform {
                scales,
                offsets,
                flips,
            },
        )
    }

    pub fn with_transform(inner: P, transform: Transform) -> Self {
        let dims = inner.dimensionality();
        let lower = (0..dims)
            .map(|i| inner.lower_bound(i) * transform.scales[i] + transform.offsets[i])
            .collect();
        let upper = (0..dims)
            .map(|i| inner.upper_bound(i) * transform.scales[i] + transform.offsets[i])
            .collect();
        Self {
            inner,
            scales: transform.scales,
            offsets: transform.offsets,
            flips: transform.flips,
            lower,
            upper,
        }
    }

    pub fn describe(&self) -> Transform {
        Transform {
            scales: self.scales.clone(),
            offsets: self.offsets.clone(),
            flips: self.flips.clone(),
        }
    }

    /// Map a point in this problem's space back into the inner problem's.
    pub fn to_inner(&self, point: &[f32]) -> Vec<f32> {
        point
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let mapped = (x - self.offsets[i]) / self.scales[i];
                if self.flips[i] {
                    self.inner.lower_bound(i) + self.inner.upper_bound(i) - mapped
                } else {
                    mapped
                }
            })
            .collect()
    }
}

impl<P: Problem> Problem for TransformedProblem<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimensionality(&self) -> usize {
        self.inner.dimensionality()
    }

    fn lower_bound(&self, dim: usize) -> f32 {
        self.lower[dim]
    }

    fn upper_bound(&self, dim: usize) -> f32 {
        self.upper[dim]
    }

    fn error(&self, point: &[f32]) -> f32 {
        self.inner.error(&self.to_inner(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{AnalyticFunction, AnalyticProblem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bounds_follow_scale_and_offset() {
        let inner = AnalyticProblem::new(AnalyticFunction::Rastrigin, 2);
        let problem = TransformedProblem::with_transform(
            inner,
            Transform {
                scales: vec![2.0, 0.5],
                offsets: vec![1.0, -1.0],
                flips: vec![false, false],
            },
        );
        assert_eq!((problem.lower_bound(0), problem.upper_bound(0)), (-9.0, 11.0));
        assert_eq!((problem.lower_bound(1), problem.upper_bound(1)), (-3.5, 1.5));
        // the optimum moves with the offset
        assert_eq!(problem.error(&[1.0, -1.0]), 0.0);
    }

    #[test]
    fn test_flip_reflects_within_inner_bounds() {
        let inner = AnalyticProblem::new(AnalyticFunction::Sphere, 1);
        let problem = TransformedProblem::with_transform(
            inner,
            Transform {
                scales: vec![1.0],
                offsets: vec![0.0],
                flips: vec![true],
            },
        );
        assert_eq!(problem.to_inner(&[30.0]), vec![-30.0]);
    }

    #[test]
    fn test_random_transform_within_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let inner = AnalyticProblem::new(AnalyticFunction::Sphere, 5);
        let problem = TransformedProblem::new(inner, &mut rng, (0.5, 2.0), (-0.5, 0.5));
        let t = problem.describe();
        assert!(t.scales.iter().all(|s| (0.5..=2.0).contains(s)));
        assert!(t.offsets.iter().all(|o| (-100.0..=100.0).contains(o)));
        for i in 0..5 {
            assert!(problem.lower_bound(i) < problem.upper_bound(i));
        }
    }
}
