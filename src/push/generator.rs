//! Random code generation over a configured instruction set.

use rand::Rng;

use super::instruction::Instruction;
use super::program::{Atom, Code, Program};
use crate::config::InterpreterConfig;
use crate::error::{Result, SwarmError};

/// One choice available to the random atom generator.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Instruction(Instruction),
    IntConstant,
    FloatConstant,
    BoolConstant,
}

/// The instructions (and ephemeral random constants) evolution may use.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    slots: Vec<Slot>,
    int_range: (i32, i32, i32),
    float_range: (f32, f32, f32),
}

impl InstructionSet {
    /// Resolve configured names.
    ///
    /// Entries are either instruction names (`vector.+`), a whole family
    /// (`registered.vector`), or a constant generator (`integer.erc`,
    /// `float.erc`, `boolean.erc`). Registering the integer, float or
    /// boolean family also enables its constants.
    pub fn from_config(config: &InterpreterConfig) -> Result<Self> {
        let mut slots = Vec::new();
        for name in &config.instructions {
            let name = name.trim();
            if let Some(family) = name.strip_prefix("registered.") {
                let members: Vec<Instruction> = Instruction::all()
                    .into_iter()
                    .filter(|i| i.family() == family)
                    .collect();
                if members.is_empty() {
                    return Err(SwarmError::UnknownInstruction(name.to_string()));
                }
                slots.extend(members.into_iter().map(Slot::Instruction));
                if let Some(constant) = constant_slot(family) {
                    slots.push(constant);
                }
            } else if let Some(family) = name.strip_suffix(".erc") {
                let constant =
                    constant_slot(family).ok_or_else(|| SwarmError::UnknownInstruction(name.to_string()))?;
                slots.push(constant);
            } else {
                slots.push(Slot::Instruction(Instruction::from_name(name)?));
            }
        }

        let mut unique = Vec::with_capacity(slots.len());
        for slot in slots {
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }
        if unique.is_empty() {
            return Err(SwarmError::Configuration(
                "instruction set must not be empty".to_string(),
            ));
        }

        Ok(Self {
            slots: unique,
            int_range: (
                config.min_random_int,
                config.max_random_int,
                config.random_int_resolution,
            ),
            float_range: (
                config.min_random_float,
                config.max_random_float,
                config.random_float_resolution,
            ),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The plain instructions in the set, without constant generators.
    pub fn instructions(&self) -> Vec<Instruction> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Instruction(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn random_atom<R: Rng>(&self, rng: &mut R) -> Code {
        let slot = self.slots[rng.gen_range(0..self.slots.len())];
        let atom = match slot {
            Slot::Instruction(i) => Atom::Instruction(i),
            Slot::IntConstant => {
                let (min, max, resolution) = self.int_range;
                let resolution = resolution.max(1);
                let steps = (max.saturating_sub(min) / resolution).max(1);
                Atom::Int(min.wrapping_add(rng.gen_range(0..steps).wrapping_mul(resolution)))
            }
            Slot::FloatConstant => {
                let (min, max, resolution) = self.float_range;
                let raw = min + rng.gen::<f32>() * (max - min);
                let value = if resolution > 0.0 {
                    min + ((raw - min) / resolution).floor() * resolution
                } else {
                    raw
                };
                Atom::Float(value)
            }
            Slot::BoolConstant => Atom::Bool(rng.gen_bool(0.5)),
        };
        Code::Atom(atom)
    }

    /// Random code with exactly `size` points.
    pub fn random_code<R: Rng>(&self, size: usize, rng: &mut R) -> Code {
        if size <= 1 {
            return self.random_atom(rng);
        }
        let parts = decompose(size - 1, size - 1, rng);
        Code::List(parts.into_iter().map(|part| self.random_code(part, rng)).collect())
    }

    /// A program of at most `max_size` points, size chosen uniformly.
    pub fn random_program<R: Rng>(&self, max_size: usize, rng: &mut R) -> Program {
        let size = rng.gen_range(1..=max_size.max(1));
        Program::from_code(self.random_code(size, rng))
    }
}

fn constant_slot(family: &str) -> Option<Slot> {
    match family {
        "integer" => Some(Slot::IntConstant),
        "float" => Some(Slot::FloatConstant),
        "boolean" => Some(Slot::BoolConstant),
        _ => None,
    }
}

/// Split `number` into at most `max_parts` positive parts.
fn decompose<R: Rng>(number: usize, max_parts: usize, rng: &mut R) -> Vec<usize> {
    if number <= 1 || max_parts <= 1 {
        return vec![number];
    }
    let first = rng.gen_range(1..=number);
    if first == number {
        return vec![number];
    }
    let mut parts = vec![first];
    parts.extend(decompose(number - first, max_parts - 1, rng));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(names: &[&str]) -> InterpreterConfig {
        InterpreterConfig {
            instructions: names.iter().map(|s| s.to_string()).collect(),
            ..InterpreterConfig::default()
        }
    }

    #[test]
    fn test_registered_family_expands() {
        let set = InstructionSet::from_config(&config(&["registered.vector"])).unwrap();
        assert!(set.instructions().iter().all(|i| i.family() == "vector"));
        // vector has no constant generator
        assert_eq!(set.len(), set.instructions().len());

        let set = InstructionSet::from_config(&config(&["registered.float"])).unwrap();
        assert_eq!(set.len(), set.instructions().len() + 1);
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(InstructionSet::from_config(&config(&["vector.warp"])).is_err());
        assert!(InstructionSet::from_config(&config(&["registered.nothing"])).is_err());
        assert!(InstructionSet::from_config(&config(&["vector.erc"])).is_err());
        assert!(InstructionSet::from_config(&config(&[])).is_err());
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = InstructionSet::from_config(&config(&["vector.+", "vector.+", "float.erc"])).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_random_code_has_requested_size() {
        let set = InstructionSet::from_config(&config(&["registered.vector", "registered.float"])).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for size in 1..40 {
            assert_eq!(set.random_code(size, &mut rng).points(), size);
        }
    }

    #[test]
    fn test_random_program_within_bound() {
        let set = InstructionSet::from_config(&config(&["registered.integer"])).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let program = set.random_program(20, &mut rng);
            // the root list adds one point when the code is an atom
            assert!(program.points() <= 21);
        }
    }

    #[test]
    fn test_decompose_sums_to_number() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in 1..30 {
            let parts = decompose(n, n, &mut rng);
            assert_eq!(parts.iter().sum::<usize>(), n);
            assert!(parts.iter().all(|p| *p > 0));
        }
    }
}
