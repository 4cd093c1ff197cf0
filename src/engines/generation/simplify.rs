//! Auto-simplification: random deletions and flattenings that are kept
//! whenever they do not make the optimiser worse.

use log::trace;
use rand::Rng;

use crate::engines::evaluation::SwarmEvaluator;
use crate::engines::generation::individual::{Genotype, Individual};
use crate::push::Program;

/// Percent of attempts that flatten a sublist instead of deleting points.
const FLATTEN_PERCENT: u32 = 20;

/// Propose a simpler variant of `program`. Returns `None` when there is
/// nothing left to remove.
pub fn simplify_step<R: Rng>(program: &Program, rng: &mut R) -> Option<Program> {
    let points = program.points();
    if points <= 1 {
        return None;
    }
    let mut candidate = program.clone();
    if rng.gen_range(0..100) < FLATTEN_PERCENT {
        let lists: Vec<usize> = (1..points)
            .filter(|i| program.subtree(*i).map_or(false, |c| c.is_list()))
            .collect();
        if !lists.is_empty() {
            let index = lists[rng.gen_range(0..lists.len())];
            candidate.flatten_subtree(index);
            return Some(candidate);
        }
    }
    let removals = rng.gen_range(1..=2);
    for _ in 0..removals {
        let points = candidate.points();
        if points <= 1 {
            break;
        }
        candidate.remove_subtree(rng.gen_range(1..points));
    }
    Some(candidate)
}

/// Run `steps` simplification attempts. All candidates are evaluated with
/// the same seed so they face the same start points.
pub fn auto_simplify<R: Rng>(
    individual: &Individual,
    steps: usize,
    evaluator: &SwarmEvaluator,
    rng: &mut R,
) -> Individual {
    if !matches!(individual.genotype, Genotype::Single(_)) {
        return individual.clone();
    }
    let seed: u64 = rng.gen();
    let mut best = individual.clone();
    best.apply(evaluator.evaluate(&best, seed));

    for _ in 0..steps {
        let Some(program) = simplify_step(best.program(), rng) else {
            break;
        };
        let mut trial = best.clone();
        trial.set_program(program);
        trial.apply(evaluator.evaluate(&trial, seed));
        if trial.fitness_or_worst() <= best.fitness_or_worst() {
            trace!("Simplified to {} points", trial.points());
            best = trial;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::{Atom, Code};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_step_never_grows() {
        let program = Program::new(vec![
            Code::Atom(Atom::Int(1)),
            Code::List(vec![Code::Atom(Atom::Int(2)), Code::Atom(Atom::Int(3))]),
            Code::Atom(Atom::Bool(true)),
        ]);
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let simpler = simplify_step(&program, &mut rng).unwrap();
            assert!(simpler.points() <= program.points());
        }
    }

    #[test]
    fn test_empty_program_cannot_shrink() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(simplify_step(&Program::default(), &mut rng).is_none());
    }
}
