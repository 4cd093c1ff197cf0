use crate::config::{AppConfig, EvolutionConfig, OptimisationConfig};
use crate::engines::evaluation::{Evaluation, StartPoints, SwarmEvaluator};
use crate::engines::generation::{
    crowding::{parent_groups, select_survivors},
    individual::{Individual, IndividualSummary},
    operators::{crossover, crossover_two_children, mutate, mutate_swarm_size, tournament_selection},
    simplify::auto_simplify,
};
use crate::error::SwarmError;
use crate::problems::build_problems;
use crate::push::{InstructionSet, Program};
use crate::types::ReproductionMode;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
    fn on_individual_evaluated(&mut self, count: usize, total: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        (**self).on_generation_complete(stats);
    }

    fn on_individual_evaluated(&mut self, count: usize, total: usize) {
        (**self).on_individual_evaluated(count, total);
    }
}

/// Population statistics after one generation has been evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub best_points: usize,
    pub mean_points: f32,
}

#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub best: Individual,
    pub history: Vec<GenerationStats>,
    pub population: Vec<Individual>,
    /// Pool of the best final programs, evaluated as one optimiser.
    pub ensemble: Option<Individual>,
    pub reached_target: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvolutionSummary {
    pub generations: usize,
    pub reached_target: bool,
    pub best: IndividualSummary,
    pub ensemble: Option<IndividualSummary>,
    pub history: Vec<GenerationStats>,
}

impl EvolutionResult {
    pub fn summary(&self) -> EvolutionSummary {
        EvolutionSummary {
            generations: self.history.len(),
            reached_target: self.reached_target,
            best: self.best.summary(),
            ensemble: self.ensemble.as_ref().map(Individual::summary),
            history: self.history.clone(),
        }
    }
}

/// Everything breeding needs apart from the random source.
struct Breeder {
    config: EvolutionConfig,
    optimisation: OptimisationConfig,
    instructions: InstructionSet,
    evaluator: SwarmEvaluator,
}

impl Breeder {
    fn mutation_share(&self) -> f32 {
        self.config.mutation_percent / (self.config.crossover_percent + self.config.mutation_percent)
    }

    fn mutate<R: Rng>(&self, parent: &Individual, rng: &mut R) -> Individual {
        let mut child = mutate(parent, &self.instructions, &self.config, rng);
        if self.optimisation.evolve_swarm_size {
            mutate_swarm_size(
                &mut child,
                self.optimisation.max_swarm_size,
                self.optimisation.swarm_size_mutation_rate,
                rng,
            );
        }
        child
    }

    fn maybe_simplify<R: Rng>(&self, individual: Individual, rng: &mut R) -> Individual {
        if rng.gen::<f32>() < self.config.simplification_percent / 100.0 {
            auto_simplify(&individual, self.config.reproduction_simplifications, &self.evaluator, rng)
        } else {
            individual
        }
    }

    /// Breed, evaluate and replace within one crowding parent set.
    fn crowd_group(&self, parents: Vec<Individual>, rng: &mut StdRng) -> Vec<Individual> {
        let mut children = Vec::with_capacity(parents.len());
        for pair in parents.chunks(2) {
            match pair {
                [a, b] if rng.gen::<f32>() >= self.mutation_share() => {
                    let (x, y) = crossover_two_children(a, b, self.config.max_points_in_program, rng);
                    children.push(x);
                    children.push(y);
                }
                _ => children.extend(pair.iter().map(|p| self.mutate(p, rng))),
            }
        }
        for child in children.iter_mut() {
            let seed = rng.gen();
            child.apply(self.evaluator.evaluate(child, seed));
        }

        select_survivors(parents, children, rng)
            .into_iter()
            .map(|survivor| self.maybe_simplify(survivor, rng))
            .collect()
    }
}

pub struct EvolutionEngine {
    breeder: Breeder,
    rng: StdRng,
}

impl EvolutionEngine {
    /// Build problems, start points and the evaluator from configuration.
    pub fn new(config: AppConfig) -> Result<Self, SwarmError> {
        config.validate()?;
        let mut rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let instructions = InstructionSet::from_config(&config.interpreter)?;
        let problems = build_problems(&config.optimisation, config.interpreter.vector_dimensions, &mut rng)?;
        let starts = StartPoints::prepare(&config.optimisation, &problems, &mut rng)?;
        let evaluator = SwarmEvaluator::new(
            config.interpreter.clone(),
            config.optimisation.clone(),
            problems,
            starts,
        )?
        .with_trajectories(config.evolution.reproduction_mode == ReproductionMode::Crowding);

        info!(
            "Evolution engine ready: {} instructions, {} problems, {:?} reproduction",
            instructions.len(),
            evaluator.problems().len(),
            config.evolution.reproduction_mode
        );

        Ok(Self::from_parts(config.evolution, config.optimisation, instructions, evaluator, rng))
    }

    pub fn from_parts(
        config: EvolutionConfig,
        optimisation: OptimisationConfig,
        instructions: InstructionSet,
        evaluator: SwarmEvaluator,
        rng: StdRng,
    ) -> Self {
        Self {
            breeder: Breeder {
                config,
                optimisation,
                instructions,
                evaluator,
            },
            rng,
        }
    }

    pub fn evaluator(&self) -> &SwarmEvaluator {
        &self.breeder.evaluator
    }

    /// Evaluate one individual with a seed drawn from the engine.
    pub fn evaluate(&mut self, individual: &Individual) -> Evaluation {
        let seed = self.rng.gen();
        self.breeder.evaluator.evaluate(individual, seed)
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionResult, SwarmError> {
        let mut population = self.initialize_population();
        let mut history = Vec::with_capacity(self.breeder.config.num_generations);
        let mut reached_target = false;
        let re_evaluate = self.breeder.config.reproduction_mode == ReproductionMode::Standard;

        for generation in 0..self.breeder.config.num_generations {
            callback.on_generation_start(generation);

            self.evaluate_population(&mut population, re_evaluate, &mut callback);

            let stats = generation_stats(generation, &population);
            info!(
                "Generation {}: best {:.6} mean {:.6} ({} points)",
                generation, stats.best_fitness, stats.mean_fitness, stats.best_points
            );
            callback.on_generation_complete(&stats);
            let best_fitness = stats.best_fitness;
            history.push(stats);

            if let Some(target) = self.breeder.config.target_fitness {
                if best_fitness <= target {
                    info!("Target fitness {} reached", target);
                    reached_target = true;
                    break;
                }
            }

            // Check termination
            if generation + 1 == self.breeder.config.num_generations {
                break;
            }

            population = match self.breeder.config.reproduction_mode {
                ReproductionMode::Standard => self.reproduce_standard(&population),
                ReproductionMode::Crowding => self.reproduce_crowding(population),
            };
        }

        if history.is_empty() {
            self.evaluate_population(&mut population, true, &mut callback);
        }
        let best = population[best_index(&population)].clone();
        let ensemble = self.build_ensemble(&population);

        Ok(EvolutionResult {
            best,
            history,
            population,
            ensemble,
            reached_target,
        })
    }

    pub fn initialize_population(&mut self) -> Vec<Individual> {
        let breeder = &self.breeder;
        (0..breeder.config.population_size)
            .map(|_| {
                let program = breeder
                    .instructions
                    .random_program(breeder.config.max_random_code_size, &mut self.rng);
                let individual = Individual::new(program);
                if breeder.optimisation.evolve_swarm_size {
                    let size = self.rng.gen_range(1..breeder.optimisation.max_swarm_size.max(2));
                    individual.with_swarm_size(size)
                } else {
                    individual
                }
            })
            .collect()
    }

    /// Evaluate the population; with `all == false` only individuals without
    /// a fitness are evaluated.
    fn evaluate_population<C: ProgressCallback>(
        &mut self,
        population: &mut [Individual],
        all: bool,
        callback: &mut C,
    ) {
        let seeds: Vec<u64> = population.iter().map(|_| self.rng.gen()).collect();
        let evaluator = &self.breeder.evaluator;
        let total = population.len();

        if self.breeder.config.parallel_evaluation {
            population
                .par_iter_mut()
                .zip(seeds.par_iter())
                .filter(|(individual, _)| all || !individual.is_evaluated())
                .for_each(|(individual, seed)| {
                    let evaluation = evaluator.evaluate(individual, *seed);
                    individual.apply(evaluation);
                });
            callback.on_individual_evaluated(total, total);
        } else {
            for (i, (individual, seed)) in population.iter_mut().zip(seeds).enumerate() {
                if all || !individual.is_evaluated() {
                    let evaluation = evaluator.evaluate(individual, seed);
                    individual.apply(evaluation);
                }
                callback.on_individual_evaluated(i + 1, total);
            }
        }
    }

    /// Elitism plus tournament-selected mutation and crossover.
    fn reproduce_standard(&mut self, population: &[Individual]) -> Vec<Individual> {
        let breeder = &self.breeder;
        let rng = &mut self.rng;
        let mut next = Vec::with_capacity(population.len());

        let elite = population[best_index(population)].clone();
        next.push(breeder.maybe_simplify(elite, rng));

        let mutation_share = breeder.mutation_share();
        let tournament = breeder.config.tournament_size;
        while next.len() < population.len() {
            let child = if rng.gen::<f32>() < mutation_share {
                let parent = tournament_selection(population, tournament, rng);
                breeder.mutate(parent, rng)
            } else {
                let a = tournament_selection(population, tournament, rng);
                let b = tournament_selection(population, tournament, rng);
                crossover(a, b, breeder.config.max_points_in_program, rng)
            };
            next.push(breeder.maybe_simplify(child, rng));
        }
        next
    }

    /// Deterministic crowding over random parent sets. Sets are processed
    /// independently and written back in order.
    fn reproduce_crowding(&mut self, population: Vec<Individual>) -> Vec<Individual> {
        let groups = parent_groups(population.len(), self.breeder.config.crowding_set_size, &mut self.rng);
        let mut slots: Vec<Option<Individual>> = population.into_iter().map(Some).collect();
        let jobs: Vec<(Vec<Individual>, u64)> = groups
            .into_iter()
            .map(|group| {
                let parents = group.into_iter().filter_map(|i| slots[i].take()).collect();
                (parents, self.rng.gen())
            })
            .collect();
        debug!("Crowding over {} parent sets", jobs.len());

        let breeder = &self.breeder;
        let crowd = |(parents, seed): (Vec<Individual>, u64)| {
            breeder.crowd_group(parents, &mut StdRng::seed_from_u64(seed))
        };
        let survivors: Vec<Vec<Individual>> = if breeder.config.parallel_evaluation {
            jobs.into_par_iter().map(crowd).collect()
        } else {
            jobs.into_iter().map(crowd).collect()
        };
        survivors.into_iter().flatten().collect()
    }

    fn build_ensemble(&mut self, population: &[Individual]) -> Option<Individual> {
        let size = self.breeder.optimisation.ensemble_size;
        if size == 0 {
            return None;
        }
        let mut ensemble = assemble_ensemble(population, size);
        let evaluation = self.evaluate(&ensemble);
        ensemble.apply(evaluation);
        info!("Ensemble of {} programs: fitness {:?}", size, ensemble.fitness);
        Some(ensemble)
    }
}

/// Pool the programs of the `size` fittest individuals. The pool runs with
/// the swarm size of the fittest, if swarm sizes are evolved.
fn assemble_ensemble(population: &[Individual], size: usize) -> Individual {
    let mut ranked: Vec<&Individual> = population.iter().collect();
    ranked.sort_by(|a, b| a.fitness_or_worst().total_cmp(&b.fitness_or_worst()));
    let swarm_size = ranked.first().and_then(|i| i.swarm_size);
    let programs: Vec<Program> = ranked
        .into_iter()
        .take(size)
        .map(|i| i.program().clone())
        .collect();

    let ensemble = Individual::ensemble(programs);
    match swarm_size {
        Some(swarm_size) => ensemble.with_swarm_size(swarm_size),
        None => ensemble,
    }
}

/// Index of the individual with the lowest fitness.
pub fn best_index(population: &[Individual]) -> usize {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.fitness_or_worst().total_cmp(&b.fitness_or_worst()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn generation_stats(generation: usize, population: &[Individual]) -> GenerationStats {
    let best = &population[best_index(population)];
    let finite: Vec<f64> = population
        .iter()
        .filter_map(|i| i.fitness)
        .filter(|f| f.is_finite())
        .map(f64::from)
        .collect();
    let mean_fitness = if finite.is_empty() {
        f32::MAX
    } else {
        (finite.iter().sum::<f64>() / finite.len() as f64) as f32
    };
    let mean_points =
        population.iter().map(|i| i.points() as f32).sum::<f32>() / population.len().max(1) as f32;
    GenerationStats {
        generation,
        best_fitness: best.fitness_or_worst(),
        mean_fitness,
        best_points: best.points(),
        mean_points,
    }
}
