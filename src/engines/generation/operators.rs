use crate::config::EvolutionConfig;
use crate::engines::generation::individual::Individual;
use crate::push::{InstructionSet, Program};
use rand::Rng;

/// Tournament selection: the lowest fitness of K random candidates wins.
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].fitness_or_worst();

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness_or_worst() < best_fitness {
            best_idx = idx;
            best_fitness = population[idx].fitness_or_worst();
        }
    }

    &population[best_idx]
}

/// Uniform choice of a point index, the root included.
pub fn node_selection<R: Rng>(program: &Program, rng: &mut R) -> usize {
    rng.gen_range(0..program.points().max(1))
}

/// Splice a subtree of `donor` into `receiver` at index `at`, or `None` if
/// the result would exceed `max_points`.
fn splice(receiver: &Program, at: usize, donor: &Program, from: usize, max_points: usize) -> Option<Program> {
    let subtree = donor.subtree(from)?.clone();
    let mut child = receiver.clone();
    child.replace_subtree(at, subtree);
    (child.points() <= max_points).then_some(child)
}

fn offspring(parent: &Individual, program: Program) -> Individual {
    let mut child = parent.clone();
    child.set_program(program);
    child
}

/// Subtree crossover producing one child. A child over the size budget is
/// replaced by an unmodified copy of `a`.
pub fn crossover<R: Rng>(a: &Individual, b: &Individual, max_points: usize, rng: &mut R) -> Individual {
    let (pa, pb) = (a.program(), b.program());
    let a_index = node_selection(pa, rng);
    let b_index = node_selection(pb, rng);

    match splice(pa, a_index, pb, b_index, max_points) {
        Some(program) => offspring(a, program),
        None => a.clone(),
    }
}

/// Subtree crossover swapping in both directions. Each child is size-checked
/// on its own; a failed direction yields a copy of that parent.
pub fn crossover_two_children<R: Rng>(
    a: &Individual,
    b: &Individual,
    max_points: usize,
    rng: &mut R,
) -> (Individual, Individual) {
    let (pa, pb) = (a.program(), b.program());
    let a_index = node_selection(pa, rng);
    let b_index = node_selection(pb, rng);

    let first = match splice(pa, a_index, pb, b_index, max_points) {
        Some(program) => offspring(a, program),
        None => a.clone(),
    };
    let second = match splice(pb, b_index, pa, a_index, max_points) {
        Some(program) => offspring(b, program),
        None => b.clone(),
    };
    (first, second)
}

/// Size of the replacement subtree for a mutation at a subtree of
/// `old_size` points.
pub fn mutation_size<R: Rng>(old_size: usize, config: &EvolutionConfig, rng: &mut R) -> usize {
    if config.use_fair_mutation {
        let range = ((config.fair_mutation_range * old_size as f32) as i64).max(1);
        let offset = rng.gen_range(0..2 * range) - range;
        (old_size as i64 + offset).max(1) as usize
    } else {
        rng.gen_range(1..=config.max_random_code_size.max(1))
    }
}

/// Replace one random subtree with random code. Returns an unmodified copy
/// when the result would exceed the size budget.
pub fn mutate<R: Rng>(
    parent: &Individual,
    instructions: &InstructionSet,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Individual {
    let program = parent.program();
    let which = node_selection(program, rng);
    let old_size = program.subtree_points(which);
    let new_size = mutation_size(old_size, config, rng);

    let replacement = if new_size == 1 {
        instructions.random_atom(rng)
    } else {
        instructions.random_code(new_size, rng)
    };

    let mut mutated = program.clone();
    mutated.replace_subtree(which, replacement);
    if mutated.points() <= config.max_points_in_program {
        offspring(parent, mutated)
    } else {
        parent.clone()
    }
}

/// Resample an evolved swarm size with probability `rate`.
pub fn mutate_swarm_size<R: Rng>(individual: &mut Individual, max_swarm_size: usize, rate: f64, rng: &mut R) {
    if individual.swarm_size.is_some() && max_swarm_size > 1 && rng.gen_bool(rate) {
        individual.swarm_size = Some(rng.gen_range(1..max_swarm_size));
        individual.invalidate();
    }
}
