//! Starting points for swarm members.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use rand::Rng;

use crate::config::OptimisationConfig;
use crate::error::{Result, SwarmError};
use crate::problems::Problem;
use crate::types::{Point, StartMode};

/// Where swarm members start each run.
#[derive(Debug, Clone, PartialEq)]
pub enum StartPoints {
    /// Fresh uniform points within the problem bounds, every run.
    Random,
    /// Points indexed `[problem][run][member]`.
    Fixed(Vec<Vec<Vec<Point>>>),
}

impl StartPoints {
    /// Resolve the configured start mode. Shared starts are read from the
    /// starts file if it exists and written to it otherwise.
    pub fn prepare<R: Rng>(
        config: &OptimisationConfig,
        problems: &[Arc<dyn Problem>],
        rng: &mut R,
    ) -> Result<Self> {
        match config.start_mode {
            StartMode::Random => Ok(StartPoints::Random),
            StartMode::Fixed => Ok(StartPoints::Fixed(generate(
                problems,
                config.runs,
                config.swarm_size,
                rng,
            ))),
            StartMode::Share => {
                let path = config.starts_file.as_path();
                if path.exists() {
                    let starts = load(path, problems, config.runs, config.swarm_size)?;
                    info!("Loaded shared start points from {}", path.display());
                    Ok(StartPoints::Fixed(starts))
                } else {
                    warn!("{} not found, generating new start points", path.display());
                    let starts = generate(problems, config.runs, config.swarm_size, rng);
                    save(path, &starts)?;
                    Ok(StartPoints::Fixed(starts))
                }
            }
            StartMode::Defined => defined(config, problems).map(StartPoints::Fixed),
        }
    }

    pub fn get(&self, problem: usize, run: usize, member: usize) -> Option<&Point> {
        match self {
            StartPoints::Random => None,
            StartPoints::Fixed(starts) => starts.get(problem)?.get(run)?.get(member),
        }
    }
}

pub fn random_point<R: Rng>(problem: &dyn Problem, rng: &mut R) -> Point {
    (0..problem.dimensionality())
        .map(|d| {
            let (lower, upper) = (problem.lower_bound(d), problem.upper_bound(d));
            rng.gen::<f32>() * (upper - lower) + lower
        })
        .collect()
}

fn generate<R: Rng>(
    problems: &[Arc<dyn Problem>],
    runs: usize,
    members: usize,
    rng: &mut R,
) -> Vec<Vec<Vec<Point>>> {
    problems
        .iter()
        .map(|problem| {
            (0..runs)
                .map(|_| (0..members).map(|_| random_point(problem.as_ref(), rng)).collect())
                .collect()
        })
        .collect()
}

/// One member per line, coordinates separated by whitespace, ordered
/// problem, run, member.
pub fn save(path: &Path, starts: &[Vec<Vec<Point>>]) -> Result<()> {
    let mut out = String::new();
    for point in starts.iter().flatten().flatten() {
        let line: Vec<String> = point.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

pub fn load(
    path: &Path,
    problems: &[Arc<dyn Problem>],
    runs: usize,
    members: usize,
) -> Result<Vec<Vec<Vec<Point>>>> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let mut starts = Vec::with_capacity(problems.len());
    for problem in problems {
        let dims = problem.dimensionality();
        let mut per_run = Vec::with_capacity(runs);
        for run in 0..runs {
            let mut per_member = Vec::with_capacity(members);
            for member in 0..members {
                let line = lines.next().ok_or_else(|| {
                    SwarmError::StartPoints(format!(
                        "{} ends before {} run {} member {}",
                        path.display(),
                        problem.name(),
                        run,
                        member
                    ))
                })?;
                per_member.push(parse_point(line.split_whitespace(), dims)?);
            }
            per_run.push(per_member);
        }
        starts.push(per_run);
    }
    Ok(starts)
}

/// Starts listed in the configuration, reused for every run.
fn defined(config: &OptimisationConfig, problems: &[Arc<dyn Problem>]) -> Result<Vec<Vec<Vec<Point>>>> {
    problems
        .iter()
        .map(|problem| {
            let dims = problem.dimensionality();
            let values = config.defined_starts.get(problem.name()).ok_or_else(|| {
                SwarmError::StartPoints(format!("no defined starts for {}", problem.name()))
            })?;
            let needed = config.swarm_size * dims;
            if values.len() < needed {
                return Err(SwarmError::StartPoints(format!(
                    "{} needs {} start values, found {}",
                    problem.name(),
                    needed,
                    values.len()
                )));
            }
            let members: Vec<Point> = values[..needed].chunks(dims).map(<[f32]>::to_vec).collect();
            Ok(vec![members; config.runs])
        })
        .collect()
}

fn parse_point<'a>(tokens: impl Iterator<Item = &'a str>, dims: usize) -> Result<Point> {
    let point = tokens
        .take(dims)
        .map(|t| {
            t.parse::<f32>()
                .map_err(|e| SwarmError::StartPoints(format!("bad coordinate {:?}: {}", t, e)))
        })
        .collect::<Result<Point>>()?;
    if point.len() != dims {
        return Err(SwarmError::StartPoints(format!(
            "expected {} coordinates, found {}",
            dims,
            point.len()
        )));
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{AnalyticFunction, AnalyticProblem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problems() -> Vec<Arc<dyn Problem>> {
        vec![
            Arc::new(AnalyticProblem::new(AnalyticFunction::Sphere, 2)),
            Arc::new(AnalyticProblem::new(AnalyticFunction::Rastrigin, 2)),
        ]
    }

    #[test]
    fn test_share_writes_then_reads_same_points() {
        let path = std::env::temp_dir().join(format!("swarmforge-starts-{}.txt", std::process::id()));
        std::fs::remove_file(&path).ok();
        let config = OptimisationConfig {
            start_mode: StartMode::Share,
            starts_file: path.clone(),
            runs: 2,
            swarm_size: 3,
            ..OptimisationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let first = StartPoints::prepare(&config, &problems(), &mut rng).unwrap();
        let second = StartPoints::prepare(&config, &problems(), &mut rng).unwrap();
        assert_eq!(first, second);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2 * 2 * 3);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_defined_reused_for_every_run() {
        let mut config = OptimisationConfig {
            start_mode: StartMode::Defined,
            runs: 3,
            swarm_size: 2,
            problems: vec!["sphere".to_string()],
            ..OptimisationConfig::default()
        };
        config
            .defined_starts
            .insert("sphere".to_string(), vec![1.0, 2.0, 3.0, 4.0]);
        let mut rng = StdRng::seed_from_u64(4);
        let starts = StartPoints::prepare(&config, &problems()[..1], &mut rng).unwrap();
        assert_eq!(starts.get(0, 2, 1), Some(&vec![3.0, 4.0]));
        assert_eq!(starts.get(0, 0, 0), Some(&vec![1.0, 2.0]));
    }

    #[test]
    fn test_defined_too_short_is_error() {
        let mut config = OptimisationConfig {
            start_mode: StartMode::Defined,
            swarm_size: 2,
            ..OptimisationConfig::default()
        };
        config.defined_starts.insert("sphere".to_string(), vec![1.0]);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(StartPoints::prepare(&config, &problems()[..1], &mut rng).is_err());
    }

    #[test]
    fn test_malformed_file_rejected() {
        let path = std::env::temp_dir().join(format!("swarmforge-bad-{}.txt", std::process::id()));
        std::fs::write(&path, "1.0 abc\n").unwrap();
        assert!(load(&path, &problems()[..1], 1, 1).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_random_points_in_bounds() {
        let problem = AnalyticProblem::new(AnalyticFunction::Ackley, 6);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            assert!(problem.is_within_bounds(&random_point(&problem, &mut rng)));
        }
    }
}
