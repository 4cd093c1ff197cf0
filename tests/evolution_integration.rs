use std::sync::mpsc;

use swarmforge::config::{AppConfig, EvolutionConfig, OptimisationConfig};
use swarmforge::engines::generation::{
    ChannelProgressCallback, EvolutionEngine, GenerationStats, ProgressCallback, ProgressMessage,
};
use swarmforge::types::ReproductionMode;

/// Simple progress callback for testing
#[derive(Default)]
struct TestProgressCallback {
    completed: Vec<usize>,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        self.completed.push(stats.generation);
    }

    fn on_individual_evaluated(&mut self, _count: usize, _total: usize) {}
}

fn small_config(mode: ReproductionMode, seed: u64) -> AppConfig {
    AppConfig {
        evolution: EvolutionConfig {
            population_size: 8,
            num_generations: 3,
            reproduction_mode: mode,
            tournament_size: 3,
            max_points_in_program: 40,
            max_random_code_size: 15,
            reproduction_simplifications: 3,
            crowding_set_size: 2,
            seed: Some(seed),
            ..EvolutionConfig::default()
        },
        optimisation: OptimisationConfig {
            problems: vec!["sphere".to_string()],
            moves: 5,
            runs: 1,
            swarm_size: 3,
            ..OptimisationConfig::default()
        },
        ..AppConfig::default()
    }
}

#[test]
fn test_standard_run_produces_evaluated_population() {
    let mut engine = EvolutionEngine::new(small_config(ReproductionMode::Standard, 7)).unwrap();
    let mut callback = TestProgressCallback::default();
    let result = engine.run(&mut callback).unwrap();

    assert_eq!(callback.completed, vec![0, 1, 2]);
    assert_eq!(result.population.len(), 8);
    assert!(result.best.fitness.is_some());
    assert!(result.population.iter().all(|i| i.points() <= 40));
    assert_eq!(result.history.len(), 3);
    assert!(result.ensemble.is_none());
}

#[test]
fn test_crowding_run_keeps_trajectories() {
    let mut engine = EvolutionEngine::new(small_config(ReproductionMode::Crowding, 8)).unwrap();
    let result = engine.run(TestProgressCallback::default()).unwrap();

    assert_eq!(result.population.len(), 8);
    for individual in &result.population {
        assert!(individual.is_evaluated());
        let trajectory = individual.trajectory.as_ref().unwrap();
        assert_eq!(trajectory.members(), 3);
        assert_eq!(trajectory.moves(), 5);
    }
}

#[test]
fn test_same_seed_same_history() {
    for mode in [ReproductionMode::Standard, ReproductionMode::Crowding] {
        let first = EvolutionEngine::new(small_config(mode, 21))
            .unwrap()
            .run(TestProgressCallback::default())
            .unwrap();
        let second = EvolutionEngine::new(small_config(mode, 21))
            .unwrap()
            .run(TestProgressCallback::default())
            .unwrap();
        assert_eq!(first.history, second.history);
        assert_eq!(first.best.to_string(), second.best.to_string());
    }
}

#[test]
fn test_target_fitness_stops_early() {
    let mut config = small_config(ReproductionMode::Standard, 3);
    config.evolution.target_fitness = Some(f32::MAX);
    let (sender, receiver) = mpsc::channel();

    let result = EvolutionEngine::new(config)
        .unwrap()
        .run(ChannelProgressCallback::new(sender))
        .unwrap();

    assert!(result.reached_target);
    assert_eq!(result.history.len(), 1);
    let completed = receiver
        .try_iter()
        .filter(|m| matches!(m, ProgressMessage::GenerationComplete(_)))
        .count();
    assert_eq!(completed, 1);
}

#[test]
fn test_ensemble_built_from_best_programs() {
    let mut config = small_config(ReproductionMode::Standard, 4);
    config.optimisation.ensemble_size = 3;
    let result = EvolutionEngine::new(config)
        .unwrap()
        .run(TestProgressCallback::default())
        .unwrap();

    let ensemble = result.ensemble.unwrap();
    assert!(ensemble.fitness.is_some());
    assert_eq!(
        ensemble.points(),
        {
            let mut ranked: Vec<_> = result.population.iter().collect();
            ranked.sort_by(|a, b| a.fitness_or_worst().total_cmp(&b.fitness_or_worst()));
            ranked.iter().take(3).map(|i| i.points()).sum::<usize>()
        }
    );
}

#[test]
fn test_evolved_swarm_sizes_stay_in_range() {
    let mut config = small_config(ReproductionMode::Standard, 5);
    config.optimisation.evolve_swarm_size = true;
    config.optimisation.max_swarm_size = 6;
    config.optimisation.max_evaluations = 30;
    config.optimisation.swarm_size_mutation_rate = 0.5;

    let result = EvolutionEngine::new(config)
        .unwrap()
        .run(TestProgressCallback::default())
        .unwrap();
    for individual in &result.population {
        let size = individual.swarm_size.unwrap();
        assert!((1..6).contains(&size));
    }
}

#[test]
fn test_invalid_crowding_set_rejected() {
    let mut config = small_config(ReproductionMode::Crowding, 1);
    config.evolution.crowding_set_size = 3;
    assert!(EvolutionEngine::new(config).is_err());
}
