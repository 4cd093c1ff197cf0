//! The stack machine.
//!
//! An [`Interpreter`] owns one stack of each type plus an input stack, a
//! random source, and the numeric limits used by the random-value
//! instructions. Swarm evaluation keeps one [`Stacks`] frame per swarm
//! member and swaps it into the interpreter around each execution.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::instruction::{BoolOp, FloatOp, InputOp, Instruction, IntOp, Signature, StackOp, StackType};
use super::program::{Atom, Code, Program};
use super::stack::Stack;
use crate::config::InterpreterConfig;
use crate::types::{clamp_float, Point};

/// The per-member stack state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stacks {
    pub int: Stack<i32>,
    pub float: Stack<f32>,
    pub boolean: Stack<bool>,
    pub vector: Stack<Point>,
    pub code: Stack<Code>,
    pub exec: Stack<Code>,
}

impl Stacks {
    pub fn satisfies(&self, signature: &Signature) -> bool {
        self.int.has(signature.int)
            && self.float.has(signature.float)
            && self.boolean.has(signature.boolean)
            && self.vector.has(signature.vector)
            && self.code.has(signature.code)
            && self.exec.has(signature.exec)
    }
}

/// Values published to a program through the input stack.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Vector(Point),
}

/// Read-only access to the swarm for the introspection instructions.
pub trait SwarmView {
    fn swarm_size(&self) -> usize;

    /// Personal best (`personal_best == true`) or current point of a member.
    fn position(&self, member: usize, personal_best: bool) -> Option<&[f32]>;
}

/// A view for executions that happen outside a swarm.
pub struct NoSwarm;

impl SwarmView for NoSwarm {
    fn swarm_size(&self) -> usize {
        0
    }

    fn position(&self, _member: usize, _personal_best: bool) -> Option<&[f32]> {
        None
    }
}

pub struct Interpreter {
    pub(crate) stacks: Stacks,
    pub(crate) input: Stack<InputValue>,
    pub(crate) rng: StdRng,
    pub(crate) dimensions: usize,
    pub(crate) int_range: (i32, i32, i32),
    pub(crate) float_range: (f32, f32),
    pub(crate) vector_limits: (f32, f32),
    pub(crate) nested_limit: usize,
    pub(crate) max_nesting: usize,
    pub(crate) max_points: usize,
    pub(crate) nesting: usize,
    pub(crate) current: usize,
}

impl Interpreter {
    pub fn new(config: &InterpreterConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: &InterpreterConfig, rng: StdRng) -> Self {
        Self {
            stacks: Stacks::default(),
            input: Stack::new(),
            rng,
            dimensions: config.vector_dimensions,
            int_range: (
                config.min_random_int,
                config.max_random_int,
                config.random_int_resolution,
            ),
            float_range: (config.min_random_float, config.max_random_float),
            vector_limits: (config.min_random_float, config.max_random_float),
            nested_limit: config.nested_execution_limit,
            max_nesting: config.max_nesting_depth,
            max_points: config.max_code_points,
            nesting: 0,
            current: 0,
        }
    }

    /// Range used by `vector.randlimits`, normally the problem bounds.
    pub fn set_vector_limits(&mut self, lower: f32, upper: f32) {
        self.vector_limits = (lower, upper);
    }

    /// Index of the swarm member currently executing.
    pub fn set_current(&mut self, member: usize) {
        self.current = member;
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn stacks_mut(&mut self) -> &mut Stacks {
        &mut self.stacks
    }

    pub fn input_mut(&mut self) -> &mut Stack<InputValue> {
        &mut self.input
    }

    /// Exchange the interpreter's stacks with a member's frame.
    pub fn swap_frame(&mut self, frame: &mut Stacks) {
        std::mem::swap(&mut self.stacks, frame);
    }

    /// Run `program` for at most `limit` steps and return the steps taken.
    ///
    /// Running out of steps is normal; whatever is left on the exec stack
    /// stays there.
    pub fn execute(&mut self, program: &Program, limit: usize, swarm: &dyn SwarmView) -> usize {
        self.execute_code(program.as_code().clone(), limit, swarm)
    }

    pub fn execute_code(&mut self, code: Code, limit: usize, swarm: &dyn SwarmView) -> usize {
        self.stacks.exec.push(code);
        self.run(limit, swarm)
    }

    fn run(&mut self, limit: usize, swarm: &dyn SwarmView) -> usize {
        let mut steps = 0;
        while steps < limit {
            let Some(code) = self.stacks.exec.pop() else {
                break;
            };
            self.step(code, swarm);
            steps += 1;
        }
        steps
    }

    fn step(&mut self, code: Code, swarm: &dyn SwarmView) {
        match code {
            Code::List(items) => {
                for item in items.into_iter().rev() {
                    self.stacks.exec.push(item);
                }
            }
            Code::Atom(Atom::Instruction(instruction)) => {
                self.execute_instruction(instruction, swarm);
            }
            Code::Atom(Atom::Int(v)) => self.stacks.int.push(v),
            Code::Atom(Atom::Float(v)) => self.stacks.float.push(v),
            Code::Atom(Atom::Bool(v)) => self.stacks.boolean.push(v),
        }
    }

    /// Execute one instruction, or do nothing if its operands are missing.
    pub fn execute_instruction(&mut self, instruction: Instruction, swarm: &dyn SwarmView) {
        if !self.stacks.satisfies(&instruction.signature()) {
            return;
        }
        match instruction {
            Instruction::Stack(stack, op) => self.stack_op(stack, op),
            Instruction::Int(op) => self.int_op(op),
            Instruction::Float(op) => self.float_op(op),
            Instruction::Bool(op) => self.bool_op(op),
            Instruction::Exec(op) => self.exec_op(op),
            Instruction::Code(op) => self.code_op(op),
            Instruction::Input(op) => self.input_op(op),
            Instruction::Vector(op) => self.vector_op(op, swarm),
        }
    }

    fn stack_op(&mut self, stack: StackType, op: StackOp) {
        let depth = match op {
            StackOp::Yank | StackOp::YankDup | StackOp::Shove => match self.stacks.int.pop() {
                Some(depth) => i64::from(depth),
                None => return,
            },
            _ => 0,
        };
        let outcome = match stack {
            StackType::Integer => generic_op(&mut self.stacks.int, op, depth),
            StackType::Float => generic_op(&mut self.stacks.float, op, depth),
            StackType::Boolean => generic_op(&mut self.stacks.boolean, op, depth),
            StackType::Vector => generic_op(&mut self.stacks.vector, op, depth),
            StackType::Code => generic_op(&mut self.stacks.code, op, depth),
            StackType::Exec => generic_op(&mut self.stacks.exec, op, depth),
        };
        match outcome {
            Some(Outcome::Depth(n)) => self.stacks.int.push(n as i32),
            Some(Outcome::Equal(eq)) => self.stacks.boolean.push(eq),
            None => {}
        }
    }

    fn int_op(&mut self, op: IntOp) {
        let ints = &mut self.stacks.int;
        match op {
            IntOp::Abs => {
                if let Some(a) = ints.pop() {
                    ints.push(a.wrapping_abs());
                }
            }
            IntOp::Neg => {
                if let Some(a) = ints.pop() {
                    ints.push(a.wrapping_neg());
                }
            }
            IntOp::FromFloat => {
                if let Some(f) = self.stacks.float.pop() {
                    ints.push(f as i32);
                }
            }
            IntOp::FromBool => {
                if let Some(b) = self.stacks.boolean.pop() {
                    ints.push(i32::from(b));
                }
            }
            IntOp::Rand => {
                let (min, max, resolution) = self.int_range;
                let resolution = resolution.max(1);
                let steps = ((max.saturating_sub(min)) / resolution).max(1);
                let value = min.wrapping_add(self.rng.gen_range(0..steps).wrapping_mul(resolution));
                ints.push(value);
            }
            IntOp::Div | IntOp::Mod if ints.top() == Some(&0) => {}
            _ => {
                let (Some(a), Some(b)) = (ints.pop(), ints.pop()) else {
                    return;
                };
                match op {
                    IntOp::Add => ints.push(b.wrapping_add(a)),
                    IntOp::Sub => ints.push(b.wrapping_sub(a)),
                    IntOp::Mul => ints.push(b.wrapping_mul(a)),
                    IntOp::Div => ints.push(b.wrapping_div(a)),
                    IntOp::Mod => ints.push(b.wrapping_rem(a)),
                    IntOp::Min => ints.push(b.min(a)),
                    IntOp::Max => ints.push(b.max(a)),
                    IntOp::Lt => self.stacks.boolean.push(b < a),
                    IntOp::Gt => self.stacks.boolean.push(b > a),
                    _ => {}
                }
            }
        }
    }

    fn float_op(&mut self, op: FloatOp) {
        let floats = &mut self.stacks.float;
        match op {
            FloatOp::Abs
            | FloatOp::Neg
            | FloatOp::Sin
            | FloatOp::Cos
            | FloatOp::Tan
            | FloatOp::Exp
            | FloatOp::Ln => {
                let Some(a) = floats.pop() else {
                    return;
                };
                let result = match op {
                    FloatOp::Abs => a.abs(),
                    FloatOp::Neg => -a,
                    FloatOp::Sin => a.sin(),
                    FloatOp::Cos => a.cos(),
                    FloatOp::Tan => a.tan(),
                    FloatOp::Exp => a.exp(),
                    _ => a.ln(),
                };
                floats.push(clamp_float(result));
            }
            FloatOp::FromInt => {
                if let Some(i) = self.stacks.int.pop() {
                    floats.push(i as f32);
                }
            }
            FloatOp::FromBool => {
                if let Some(b) = self.stacks.boolean.pop() {
                    floats.push(if b { 1.0 } else { 0.0 });
                }
            }
            FloatOp::Rand => {
                let (min, max) = self.float_range;
                floats.push(clamp_float(min + self.rng.gen::<f32>() * (max - min)));
            }
            FloatOp::Div | FloatOp::Mod if floats.top() == Some(&0.0) => {}
            _ => {
                let (Some(a), Some(b)) = (floats.pop(), floats.pop()) else {
                    return;
                };
                match op {
                    FloatOp::Add => floats.push(clamp_float(b + a)),
                    FloatOp::Sub => floats.push(clamp_float(b - a)),
                    FloatOp::Mul => floats.push(clamp_float(b * a)),
                    FloatOp::Div => floats.push(clamp_float(b / a)),
                    FloatOp::Mod => floats.push(clamp_float(b % a)),
                    FloatOp::Min => floats.push(b.min(a)),
                    FloatOp::Max => floats.push(b.max(a)),
                    FloatOp::Lt => self.stacks.boolean.push(b < a),
                    FloatOp::Gt => self.stacks.boolean.push(b > a),
                    _ => {}
                }
            }
        }
    }

    fn bool_op(&mut self, op: BoolOp) {
        let bools = &mut self.stacks.boolean;
        match op {
            BoolOp::And | BoolOp::Or | BoolOp::Xor => {
                let (Some(a), Some(b)) = (bools.pop(), bools.pop()) else {
                    return;
                };
                bools.push(match op {
                    BoolOp::And => a && b,
                    BoolOp::Or => a || b,
                    _ => a ^ b,
                });
            }
            BoolOp::Not => {
                if let Some(a) = bools.pop() {
                    bools.push(!a);
                }
            }
            BoolOp::FromInt => {
                if let Some(i) = self.stacks.int.pop() {
                    bools.push(i != 0);
                }
            }
            BoolOp::FromFloat => {
                if let Some(f) = self.stacks.float.pop() {
                    bools.push(f != 0.0);
                }
            }
            BoolOp::Rand => {
                let value = self.rng.gen_bool(0.5);
                bools.push(value);
            }
        }
    }

    fn input_op(&mut self, op: InputOp) {
        match op {
            InputOp::Index => {
                if self.input.is_empty() {
                    return;
                }
                let Some(index) = self.stacks.int.pop() else {
                    return;
                };
                let index = (index.max(0) as usize).min(self.input.len() - 1);
                if let Some(value) = self.input.peek(index).cloned() {
                    self.push_input_value(value);
                }
            }
            InputOp::InAll => {
                let values: Vec<InputValue> = self.input.iter().cloned().collect();
                for value in values {
                    self.push_input_value(value);
                }
            }
            InputOp::Depth => {
                let depth = self.input.len() as i32;
                self.stacks.int.push(depth);
            }
        }
    }

    fn push_input_value(&mut self, value: InputValue) {
        match value {
            InputValue::Int(v) => self.stacks.int.push(v),
            InputValue::Float(v) => self.stacks.float.push(v),
            InputValue::Bool(v) => self.stacks.boolean.push(v),
            InputValue::Vector(v) => self.stacks.vector.push(v),
        }
    }
}

enum Outcome {
    Depth(usize),
    Equal(bool),
}

fn generic_op<T: Clone + PartialEq>(stack: &mut Stack<T>, op: StackOp, depth: i64) -> Option<Outcome> {
    match op {
        StackOp::Dup => stack.dup(),
        StackOp::Pop => {
            stack.pop();
        }
        StackOp::Swap => stack.swap(),
        StackOp::Rot => stack.rot(),
        StackOp::Flush => stack.clear(),
        StackOp::Depth => return Some(Outcome::Depth(stack.len())),
        StackOp::Yank => stack.yank(depth),
        StackOp::YankDup => stack.yankdup(depth),
        StackOp::Shove => stack.shove(depth),
        StackOp::Equal => {
            let a = stack.pop()?;
            let b = stack.pop()?;
            return Some(Outcome::Equal(a == b));
        }
    }
    None
}
