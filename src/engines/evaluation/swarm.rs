//! Runs an evolved program as the update rule of a swarm.
//!
//! Every member owns a [`Stacks`] frame that is swapped into a shared
//! interpreter for its turn, so no member ever sees another member's stack
//! state. Members are introspected through a read-only [`SwarmView`].

use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::starts::{random_point, StartPoints};
use super::trajectory::Trajectory;
use crate::config::{InterpreterConfig, OptimisationConfig};
use crate::engines::generation::individual::{Genotype, Individual};
use crate::error::{Result, SwarmError};
use crate::problems::Problem;
use crate::push::{InputValue, Interpreter, Program, Stacks, SwarmView};
use crate::types::{Point, OUT_OF_BOUNDS_ERROR};

/// State of one swarm member during a run.
#[derive(Debug, Clone)]
pub struct Member {
    pub best: Point,
    pub best_value: f32,
    pub current: Point,
    pub current_value: f32,
    pub frame: Stacks,
}

impl Member {
    /// A member at its start point. The frame holds the point, its error and
    /// an improvement flag.
    pub fn new(point: Point, value: f32) -> Self {
        let mut frame = Stacks::default();
        frame.vector.push(point.clone());
        frame.float.push(value);
        frame.boolean.push(true);
        Self {
            best: point.clone(),
            best_value: value,
            current: point,
            current_value: value,
            frame,
        }
    }
}

struct SwarmSnapshot<'a> {
    members: &'a [Member],
}

impl SwarmView for SwarmSnapshot<'_> {
    fn swarm_size(&self) -> usize {
        self.members.len()
    }

    fn position(&self, member: usize, personal_best: bool) -> Option<&[f32]> {
        self.members.get(member).map(|m| {
            if personal_best {
                m.best.as_slice()
            } else {
                m.current.as_slice()
            }
        })
    }
}

/// Result of one run of a swarm on one problem.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Lowest error seen during the run, start points included.
    pub best_value: f32,
    pub members: Vec<Member>,
    pub trajectory: Option<Trajectory>,
}

/// Fitness and side products of evaluating one individual.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Mean of `errors`.
    pub fitness: f32,
    /// Mean best error over runs, per problem.
    pub errors: Vec<f32>,
    pub trajectory: Option<Arc<Trajectory>>,
}

pub struct SwarmEvaluator {
    interpreter: InterpreterConfig,
    optimisation: OptimisationConfig,
    problems: Vec<Arc<dyn Problem>>,
    starts: StartPoints,
    record_trajectories: bool,
}

impl SwarmEvaluator {
    pub fn new(
        interpreter: InterpreterConfig,
        optimisation: OptimisationConfig,
        problems: Vec<Arc<dyn Problem>>,
        starts: StartPoints,
    ) -> Result<Self> {
        if problems.is_empty() {
            return Err(SwarmError::Problem("no problems to evaluate on".to_string()));
        }
        if let Some(problem) = problems
            .iter()
            .find(|p| p.dimensionality() != interpreter.vector_dimensions)
        {
            return Err(SwarmError::Problem(format!(
                "{} has {} dimensions, interpreter vectors have {}",
                problem.name(),
                problem.dimensionality(),
                interpreter.vector_dimensions
            )));
        }
        Ok(Self {
            interpreter,
            optimisation,
            problems,
            starts,
            record_trajectories: false,
        })
    }

    /// Keep the first run's trajectory on every evaluation.
    pub fn with_trajectories(mut self, record: bool) -> Self {
        self.record_trajectories = record;
        self
    }

    pub fn problems(&self) -> &[Arc<dyn Problem>] {
        &self.problems
    }

    pub fn swarm_size(&self, individual: &Individual) -> usize {
        match individual.swarm_size {
            Some(size) if self.optimisation.evolve_swarm_size => size.max(1),
            _ => self.optimisation.swarm_size,
        }
    }

    /// Moves per run. An evolved swarm size trades members for moves
    /// within a fixed evaluation budget.
    pub fn moves(&self, swarm_size: usize) -> usize {
        if self.optimisation.evolve_swarm_size {
            self.optimisation.max_evaluations / swarm_size.max(1)
        } else {
            self.optimisation.moves
        }
    }

    /// Evaluate on every problem. The same seed gives the same fitness.
    pub fn evaluate(&self, individual: &Individual, seed: u64) -> Evaluation {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut errors = Vec::with_capacity(self.problems.len());
        let mut trajectory = None;

        for problem_index in 0..self.problems.len() {
            let mut total = 0.0f64;
            for run in 0..self.optimisation.runs {
                let record = self.record_trajectories && problem_index == 0 && run == 0;
                let outcome = self.run(individual, problem_index, run, record, &mut rng);
                total += f64::from(outcome.best_value);
                if let Some(t) = outcome.trajectory {
                    trajectory = Some(Arc::new(t));
                }
            }
            let mean = (total / self.optimisation.runs.max(1) as f64) as f32;
            trace!("{}: mean error {}", self.problems[problem_index].name(), mean);
            errors.push(mean);
        }

        let fitness = if errors.is_empty() {
            f32::MAX
        } else {
            (errors.iter().map(|e| f64::from(*e)).sum::<f64>() / errors.len() as f64) as f32
        };
        debug!("Evaluated individual: fitness {} errors {:?}", fitness, errors);

        Evaluation {
            fitness,
            errors,
            trajectory,
        }
    }

    /// One complete swarm simulation on one problem.
    pub fn run(
        &self,
        individual: &Individual,
        problem_index: usize,
        run: usize,
        record: bool,
        rng: &mut StdRng,
    ) -> RunOutcome {
        let problem = self.problems[problem_index].as_ref();
        let swarm_size = self.swarm_size(individual);
        let moves = self.moves(swarm_size);
        let dims = problem.dimensionality();

        let mut interpreter = Interpreter::new(&self.interpreter, rng.gen());
        let lower = problem.lower_bound(0);
        let upper = problem.upper_bound(0);
        interpreter.set_vector_limits(lower, upper);

        let mut pop_best = f32::MAX;
        let mut members: Vec<Member> = (0..swarm_size)
            .map(|i| {
                let point = match self.starts.get(problem_index, run, i) {
                    Some(start) => start.clone(),
                    None => random_point(problem, rng),
                };
                let value = problem.error(&point);
                if value < pop_best {
                    pop_best = value;
                }
                Member::new(point, value)
            })
            .collect();

        let mut trajectory = record.then(|| Trajectory::new(swarm_size, moves, dims));
        let limit = self.interpreter.execution_limit;

        for step in 0..moves {
            let best_member = best_index(&members);

            for p in 0..swarm_size {
                interpreter.swap_frame(&mut members[p].frame);
                interpreter.set_current(p);

                publish_bounds(&mut interpreter, lower, upper);
                let ints = &mut interpreter.stacks_mut().int;
                ints.push(step as i32);
                ints.push(p as i32);
                ints.push(best_member as i32);

                let program = pick_program(&individual.genotype, rng);
                interpreter.execute(program, limit, &SwarmSnapshot { members: &members });

                let proposed = interpreter.stacks().vector.top().cloned();
                publish_bounds(&mut interpreter, lower, upper);

                let member = &mut members[p];
                if let Some(point) = proposed {
                    member.current = point;
                }

                let stacks = interpreter.stacks_mut();
                if problem.is_within_bounds(&member.current) {
                    let value = problem.error(&member.current);
                    member.current_value = value;
                    stacks.float.push(value);
                    if value <= member.best_value {
                        stacks.boolean.push(true);
                        member.best = member.current.clone();
                        member.best_value = value;
                    } else {
                        stacks.boolean.push(false);
                        stacks.vector.push(member.best.clone());
                    }
                    if value < pop_best {
                        pop_best = value;
                    }
                } else {
                    member.current_value = OUT_OF_BOUNDS_ERROR;
                    stacks.float.push(OUT_OF_BOUNDS_ERROR);
                    stacks.boolean.push(false);
                    stacks.vector.push(member.best.clone());
                }
                interpreter.input_mut().push(InputValue::Int(p as i32));

                if let Some(t) = trajectory.as_mut() {
                    t.record(p, step, &members[p].current);
                }
                interpreter.swap_frame(&mut members[p].frame);
            }
            trace!("{} run {} move {}: best {}", problem.name(), run, step, pop_best);
        }

        RunOutcome {
            best_value: pop_best,
            members,
            trajectory,
        }
    }
}

fn publish_bounds(interpreter: &mut Interpreter, lower: f32, upper: f32) {
    let input = interpreter.input_mut();
    input.clear();
    input.push(InputValue::Float(lower));
    input.push(InputValue::Float(upper));
}

/// Index of the member with the lowest personal-best error.
fn best_index(members: &[Member]) -> usize {
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.best_value.is_nan())
        .min_by(|(_, a), (_, b)| a.best_value.total_cmp(&b.best_value))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn pick_program<'a>(genotype: &'a Genotype, rng: &mut StdRng) -> &'a Program {
    static EMPTY: Program = Program::empty();
    match genotype {
        Genotype::Single(program) => program,
        Genotype::Ensemble(programs) if programs.is_empty() => &EMPTY,
        Genotype::Ensemble(programs) => &programs[rng.gen_range(0..programs.len())],
    }
}
