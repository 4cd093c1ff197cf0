use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::engines::evaluation::{Evaluation, Trajectory};
use crate::push::Program;

/// The program (or pool of programs) an individual runs for each member.
#[derive(Debug, Clone, PartialEq)]
pub enum Genotype {
    Single(Program),
    /// One program is drawn per swarm member per move.
    Ensemble(Vec<Program>),
}

/// An evolved optimiser.
#[derive(Debug, Clone)]
pub struct Individual {
    pub genotype: Genotype,
    pub fitness: Option<f32>,
    /// Mean error per problem, in problem order.
    pub errors: Vec<f32>,
    /// Present when the swarm size is evolved.
    pub swarm_size: Option<usize>,
    /// First-run trajectory, kept for crowding. Clones share it.
    pub trajectory: Option<Arc<Trajectory>>,
}

impl Individual {
    pub fn new(program: Program) -> Self {
        Self {
            genotype: Genotype::Single(program),
            fitness: None,
            errors: Vec::new(),
            swarm_size: None,
            trajectory: None,
        }
    }

    pub fn ensemble(programs: Vec<Program>) -> Self {
        Self {
            genotype: Genotype::Ensemble(programs),
            ..Self::new(Program::default())
        }
    }

    pub fn with_swarm_size(mut self, size: usize) -> Self {
        self.swarm_size = Some(size);
        self
    }

    /// The breeding target. Ensembles expose their first program.
    pub fn program(&self) -> &Program {
        match &self.genotype {
            Genotype::Single(program) => program,
            Genotype::Ensemble(programs) => programs.first().unwrap_or(&EMPTY_PROGRAM),
        }
    }

    /// Replace the program, dropping results that belonged to the old one.
    pub fn set_program(&mut self, program: Program) {
        self.genotype = Genotype::Single(program);
        self.invalidate();
    }

    pub fn points(&self) -> usize {
        match &self.genotype {
            Genotype::Single(program) => program.points(),
            Genotype::Ensemble(programs) => programs.iter().map(Program::points).sum(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness for ranking; unevaluated individuals rank last.
    pub fn fitness_or_worst(&self) -> f32 {
        self.fitness.unwrap_or(f32::MAX)
    }

    pub fn apply(&mut self, evaluation: Evaluation) {
        self.fitness = Some(evaluation.fitness);
        self.errors = evaluation.errors;
        if evaluation.trajectory.is_some() {
            self.trajectory = evaluation.trajectory;
        }
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
        self.errors.clear();
        self.trajectory = None;
    }

    pub fn summary(&self) -> IndividualSummary {
        IndividualSummary {
            fitness: self.fitness,
            errors: self.errors.clone(),
            swarm_size: self.swarm_size,
            points: self.points(),
            program: self.to_string(),
        }
    }
}

static EMPTY_PROGRAM: Program = Program::empty();

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.genotype {
            Genotype::Single(program) => write!(f, "{}", program)?,
            Genotype::Ensemble(programs) => {
                for (i, program) in programs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", program)?;
                }
            }
        }
        if let Some(size) = self.swarm_size {
            write!(f, " {{p={}}}", size)?;
        }
        Ok(())
    }
}

/// Serializable view of an individual for reports.
#[derive(Debug, Clone, Serialize)]
pub struct IndividualSummary {
    pub fitness: Option<f32>,
    pub errors: Vec<f32>,
    pub swarm_size: Option<usize>,
    pub points: usize,
    pub program: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::{Atom, Code};

    #[test]
    fn test_clone_shares_trajectory() {
        let mut a = Individual::new(Program::new(vec![Code::Atom(Atom::Int(1))]));
        a.trajectory = Some(Arc::new(Trajectory::new(1, 1, 2)));
        let b = a.clone();
        let (ta, tb) = (a.trajectory.unwrap(), b.trajectory.unwrap());
        assert!(Arc::ptr_eq(&ta, &tb));
    }

    #[test]
    fn test_set_program_invalidates() {
        let mut a = Individual::new(Program::default());
        a.fitness = Some(1.0);
        a.errors = vec![1.0];
        a.set_program(Program::new(vec![Code::Atom(Atom::Bool(true))]));
        assert!(!a.is_evaluated());
        assert!(a.errors.is_empty());
        assert_eq!(a.fitness_or_worst(), f32::MAX);
    }

    #[test]
    fn test_display_marks_swarm_size() {
        let a = Individual::new(Program::new(vec![Code::Atom(Atom::Int(3))])).with_swarm_size(7);
        assert!(a.to_string().ends_with("{p=7}"));
    }
}
