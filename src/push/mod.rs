//! A Push-style stack machine with a vector stack for search points.

pub mod control;
pub mod generator;
pub mod instruction;
pub mod interpreter;
pub mod program;
pub mod stack;
pub mod vector;

pub use generator::InstructionSet;
pub use instruction::{Instruction, Signature, StackType};
pub use interpreter::{InputValue, Interpreter, NoSwarm, Stacks, SwarmView};
pub use program::{Atom, Code, Program};
pub use stack::Stack;
