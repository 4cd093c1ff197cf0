use std::sync::Arc;

use swarmforge::config::{InterpreterConfig, OptimisationConfig};
use swarmforge::engines::evaluation::{StartPoints, SwarmEvaluator};
use swarmforge::engines::generation::Individual;
use swarmforge::problems::{AnalyticFunction, AnalyticProblem, Problem};
use swarmforge::push::{Atom, Code, Instruction, InstructionSet, Program};

/// Sum of squares on [-1, 1]^2.
struct UnitBowl;

impl Problem for UnitBowl {
    fn name(&self) -> &str {
        "unit-bowl"
    }

    fn dimensionality(&self) -> usize {
        2
    }

    fn lower_bound(&self, _dim: usize) -> f32 {
        -1.0
    }

    fn upper_bound(&self, _dim: usize) -> f32 {
        1.0
    }

    fn error(&self, point: &[f32]) -> f32 {
        point.iter().map(|x| x * x).sum()
    }
}

fn jump_to(x: f32, y: f32) -> Program {
    let from_floats = Instruction::from_name("vector.fromfloats").unwrap();
    Program::new(vec![
        Code::Atom(Atom::Float(x)),
        Code::Atom(Atom::Float(y)),
        Code::Atom(Atom::Instruction(from_floats)),
    ])
}

fn evaluator(moves: usize, start: Vec<f32>) -> SwarmEvaluator {
    swarm_evaluator(1, moves, start)
}

fn swarm_evaluator(members: usize, moves: usize, start: Vec<f32>) -> SwarmEvaluator {
    let interpreter = InterpreterConfig::default();
    let optimisation = OptimisationConfig {
        moves,
        runs: 1,
        swarm_size: members,
        ..OptimisationConfig::default()
    };
    let problems: Vec<Arc<dyn Problem>> = vec![Arc::new(UnitBowl)];
    let starts = StartPoints::Fixed(vec![vec![vec![start; members]]]);
    SwarmEvaluator::new(interpreter, optimisation, problems, starts).unwrap()
}

#[test]
fn test_jump_to_optimum_scores_zero() {
    let evaluator = evaluator(1, vec![0.5, 0.5]);
    let individual = Individual::new(jump_to(0.0, 0.0));

    let evaluation = evaluator.evaluate(&individual, 1);
    assert_eq!(evaluation.fitness, 0.0);
    assert_eq!(evaluation.errors, vec![0.0]);

    let mut rng = rand::SeedableRng::seed_from_u64(1);
    let outcome = evaluator.run(&individual, 0, 0, false, &mut rng);
    let member = &outcome.members[0];
    assert_eq!(member.best, vec![0.0, 0.0]);
    assert_eq!(member.frame.boolean.top(), Some(&true));
    assert_eq!(member.frame.float.top(), Some(&0.0));
}

#[test]
fn test_out_of_bounds_move_is_rejected() {
    let evaluator = evaluator(1, vec![0.5, 0.5]);
    let individual = Individual::new(jump_to(2.0, 2.0));

    let mut rng = rand::SeedableRng::seed_from_u64(2);
    let outcome = evaluator.run(&individual, 0, 0, false, &mut rng);
    assert_eq!(outcome.best_value, 0.5);

    let member = &outcome.members[0];
    assert_eq!(member.best, vec![0.5, 0.5]);
    assert_eq!(member.best_value, 0.5);
    assert_eq!(member.frame.float.top(), Some(&f32::MAX));
    assert_eq!(member.frame.boolean.top(), Some(&false));
    assert_eq!(member.frame.vector.top(), Some(&vec![0.5, 0.5]));
}

#[test]
fn test_empty_program_keeps_start_error() {
    let evaluator = evaluator(3, vec![0.5, -0.5]);
    let evaluation = evaluator.evaluate(&Individual::new(Program::default()), 9);
    assert_eq!(evaluation.fitness, 0.5);
}

#[test]
fn test_ensemble_draws_from_every_program() {
    let evaluator = evaluator(40, vec![0.5, 0.5]);
    let stuck = Individual::ensemble(vec![jump_to(2.0, 2.0), jump_to(2.0, 2.0)]);
    let mixed = Individual::ensemble(vec![jump_to(2.0, 2.0), jump_to(0.0, 0.0)]);

    assert_eq!(evaluator.evaluate(&stuck, 3).fitness, 0.5);
    assert_eq!(evaluator.evaluate(&mixed, 3).fitness, 0.0);
}

#[test]
fn test_ensemble_members_run_both_programs() {
    let evaluator = swarm_evaluator(4, 1, vec![0.9, 0.9]);
    let ensemble = Individual::ensemble(vec![jump_to(0.5, 0.5), jump_to(0.25, 0.25)]);
    let targets = [vec![0.5f32, 0.5], vec![0.25f32, 0.25]];

    let mut seen = [false; 2];
    for seed in 0..50 {
        let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(seed);
        let outcome = evaluator.run(&ensemble, 0, 0, false, &mut rng);
        assert_eq!(outcome.members.len(), 4);
        for member in &outcome.members {
            let hit = targets.iter().position(|t| *t == member.current);
            assert!(hit.is_some(), "member moved to {:?}", member.current);
            if let Some(i) = hit {
                seen[i] = true;
            }
        }
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn test_same_seed_same_fitness() {
    let interpreter = InterpreterConfig::default();
    let optimisation = OptimisationConfig {
        moves: 10,
        runs: 2,
        swarm_size: 5,
        ..OptimisationConfig::default()
    };
    let problems: Vec<Arc<dyn Problem>> = vec![
        Arc::new(AnalyticProblem::new(AnalyticFunction::Sphere, 2)),
        Arc::new(AnalyticProblem::new(AnalyticFunction::Rastrigin, 2)),
    ];
    let instructions = InstructionSet::from_config(&interpreter).unwrap();
    let evaluator = SwarmEvaluator::new(interpreter, optimisation, problems, StartPoints::Random).unwrap();

    let mut rng: rand::rngs::StdRng = rand::SeedableRng::seed_from_u64(42);
    for _ in 0..5 {
        let individual = Individual::new(instructions.random_program(30, &mut rng));
        let first = evaluator.evaluate(&individual, 77);
        let second = evaluator.evaluate(&individual, 77);
        assert_eq!(first.fitness.to_bits(), second.fitness.to_bits());
        assert_eq!(first.errors.len(), 2);
    }
}

#[test]
fn test_trajectory_recorded_when_requested() {
    let evaluator = evaluator(4, vec![0.5, 0.5]).with_trajectories(true);
    let evaluation = evaluator.evaluate(&Individual::new(jump_to(0.25, 0.0)), 5);
    let trajectory = evaluation.trajectory.unwrap();
    assert_eq!(trajectory.members(), 1);
    assert_eq!(trajectory.moves(), 4);
    assert_eq!(trajectory.point(0, 3), Some(&[0.25f32, 0.0][..]));
}

#[test]
fn test_dimension_mismatch_is_an_error() {
    let interpreter = InterpreterConfig {
        vector_dimensions: 3,
        ..InterpreterConfig::default()
    };
    let problems: Vec<Arc<dyn Problem>> = vec![Arc::new(UnitBowl)];
    let result = SwarmEvaluator::new(interpreter, OptimisationConfig::default(), problems, StartPoints::Random);
    assert!(result.is_err());
}
