//! Vector stack instructions.
//!
//! Vectors are search points: fixed-length float arrays whose length is the
//! interpreter's configured dimensionality. Binary instructions take the
//! second item as their left operand and the top item as their right one.

use rand::Rng;

use super::instruction::VectorOp;
use super::interpreter::{Interpreter, SwarmView};
use super::program::{Atom, Code};
use crate::types::{clamp_float, clamp_float_or, Point};

impl Interpreter {
    pub(super) fn vector_op(&mut self, op: VectorOp, swarm: &dyn SwarmView) {
        match op {
            VectorOp::GetComponent => self.vector_get(),
            VectorOp::SetComponent => self.vector_set(),
            VectorOp::FromFloats => self.vector_from_floats(),
            VectorOp::ToFloats => self.vector_to_floats(),
            VectorOp::Rand => {
                let (min, max) = self.float_range;
                let v = self.random_vector(min, max);
                self.stacks.vector.push(v);
            }
            VectorOp::RandWithLimits => {
                let (lower, upper) = self.vector_limits;
                let v = self.random_vector(lower, upper);
                self.stacks.vector.push(v);
            }
            VectorOp::RandWithWidth => {
                let Some(width) = self.stacks.float.pop() else {
                    return;
                };
                let v: Point = (0..self.dimensions)
                    .map(|_| clamp_float(self.rng.gen::<f32>() * 2.0 * width - width))
                    .collect();
                self.stacks.vector.push(v);
            }
            VectorOp::UnitRand => {
                let (min, max) = self.float_range;
                let v = self.random_vector(min, max);
                let magnitude = v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
                let unit = v.iter().map(|x| clamp_float((f64::from(*x) / magnitude) as f32)).collect();
                self.stacks.vector.push(unit);
            }
            VectorOp::Add => self.binary_vector(|a, b| a + b),
            VectorOp::Sub => self.binary_vector(|a, b| a - b),
            VectorOp::Mul => self.binary_vector(|a, b| a * b),
            VectorOp::Div => self.binary_vector(|a, b| a / b),
            VectorOp::AddScalar => self.vector_scalar(|a, s| a + s),
            VectorOp::SubScalar => self.vector_scalar(|a, s| a - s),
            VectorOp::MulScalar => self.vector_scalar(|a, s| a * s),
            VectorOp::DivScalar => self.vector_scalar(|a, s| a / s),
            VectorOp::Dot => {
                let (Some(a), Some(b)) = (self.stacks.vector.pop(), self.stacks.vector.pop()) else {
                    return;
                };
                let dot: f32 = b.iter().zip(&a).map(|(x, y)| x * y).sum();
                self.stacks.float.push(clamp_float(dot));
            }
            VectorOp::Magnitude => {
                let Some(v) = self.stacks.vector.pop() else {
                    return;
                };
                self.stacks.float.push(magnitude(&v));
            }
            VectorOp::DimAdd => self.dimension_op(|x, c| x + c),
            VectorOp::DimMul => self.dimension_op(|x, c| x * c),
            VectorOp::Zip => self.higher_order(true, swarm),
            VectorOp::Apply => self.higher_order(false, swarm),
            VectorOp::Between => self.vector_between(),
            VectorOp::Best => self.swarm_position(true, swarm),
            VectorOp::Current => self.swarm_position(false, swarm),
        }
    }

    fn random_vector(&mut self, lower: f32, upper: f32) -> Point {
        let range = upper - lower;
        (0..self.dimensions)
            .map(|_| clamp_float(self.rng.gen::<f32>() * range + lower))
            .collect()
    }

    /// Peek the top vector and push the component picked by the int stack.
    fn vector_get(&mut self) {
        let Some(index) = self.stacks.int.pop() else {
            return;
        };
        let Some(v) = self.stacks.vector.top() else {
            return;
        };
        if v.is_empty() {
            return;
        }
        let dim = index.rem_euclid(v.len() as i32) as usize;
        let value = v[dim];
        self.stacks.float.push(value);
    }

    fn vector_set(&mut self) {
        let (Some(mut v), Some(index), Some(value)) = (
            self.stacks.vector.pop(),
            self.stacks.int.pop(),
            self.stacks.float.pop(),
        ) else {
            return;
        };
        if !v.is_empty() {
            let dim = index.rem_euclid(v.len() as i32) as usize;
            v[dim] = value;
        }
        self.stacks.vector.push(v);
    }

    /// Drain one float per dimension; the deepest float becomes component 0.
    fn vector_from_floats(&mut self) {
        if !self.stacks.float.has(self.dimensions) {
            return;
        }
        let mut v = vec![0.0; self.dimensions];
        for slot in v.iter_mut().rev() {
            if let Some(value) = self.stacks.float.pop() {
                *slot = value;
            }
        }
        self.stacks.vector.push(v);
    }

    fn vector_to_floats(&mut self) {
        if let Some(v) = self.stacks.vector.pop() {
            for value in v {
                self.stacks.float.push(value);
            }
        }
    }

    fn binary_vector(&mut self, f: impl Fn(f32, f32) -> f32) {
        let (Some(a), Some(b)) = (self.stacks.vector.pop(), self.stacks.vector.pop()) else {
            return;
        };
        let result = b.iter().zip(&a).map(|(x, y)| clamp_float(f(*x, *y))).collect();
        self.stacks.vector.push(result);
    }

    fn vector_scalar(&mut self, f: impl Fn(f32, f32) -> f32) {
        let (Some(v), Some(s)) = (self.stacks.vector.pop(), self.stacks.float.pop()) else {
            return;
        };
        let result = v.iter().map(|x| clamp_float(f(*x, s))).collect();
        self.stacks.vector.push(result);
    }

    /// Adjust one component of a copy of the top vector. The original stays
    /// on the stack underneath.
    fn dimension_op(&mut self, f: impl Fn(f32, f32) -> f32) {
        let Some(mut v) = self.stacks.vector.top().cloned() else {
            return;
        };
        let (Some(c), Some(index)) = (self.stacks.float.pop(), self.stacks.int.pop()) else {
            return;
        };
        if !v.is_empty() {
            let dim = (index.unsigned_abs() as usize) % v.len();
            v[dim] = clamp_float(f(v[dim], c));
        }
        self.stacks.vector.push(v);
    }

    /// Linear blend from the second vector towards the top one.
    fn vector_between(&mut self) {
        let (Some(v2), Some(v1), Some(f)) = (
            self.stacks.vector.pop(),
            self.stacks.vector.pop(),
            self.stacks.float.pop(),
        ) else {
            return;
        };
        let result = v1
            .iter()
            .zip(&v2)
            .map(|(a, b)| clamp_float_or(a + f * (b - a), *a))
            .collect();
        self.stacks.vector.push(result);
    }

    /// `vector.zip` / `vector.apply`: run the next exec item once per
    /// component, on fresh exec and code stacks.
    fn higher_order(&mut self, pairwise: bool, swarm: &dyn SwarmView) {
        if self.nesting >= self.max_nesting {
            return;
        }
        let (first, second) = if pairwise {
            let (Some(v1), Some(v2)) = (self.stacks.vector.pop(), self.stacks.vector.pop()) else {
                return;
            };
            (v1, Some(v2))
        } else {
            let Some(v1) = self.stacks.vector.pop() else {
                return;
            };
            (v1, None)
        };
        let Some(body) = self.stacks.exec.pop() else {
            return;
        };

        let saved_exec = std::mem::take(&mut self.stacks.exec);
        let saved_code = std::mem::take(&mut self.stacks.code);
        self.nesting += 1;

        let mut result = vec![0.0; first.len()];
        for (i, slot) in result.iter_mut().enumerate() {
            self.stacks.float.push(first[i]);
            if let Some(second) = &second {
                if let Some(value) = second.get(i) {
                    self.stacks.float.push(*value);
                }
            }
            match &body {
                Code::List(_) => {
                    let limit = self.nested_limit;
                    self.execute_code(body.clone(), limit, swarm);
                }
                Code::Atom(Atom::Instruction(instruction)) => {
                    self.execute_instruction(*instruction, swarm);
                }
                Code::Atom(_) => {}
            }
            if let Some(value) = self.stacks.float.pop() {
                *slot = value;
            }
            self.stacks.exec.clear();
            self.stacks.code.clear();
        }

        self.nesting -= 1;
        self.stacks.exec = saved_exec;
        self.stacks.code = saved_code;
        self.stacks.vector.push(result);
    }

    /// Push a copy of a member's personal best or current point. The member
    /// index comes from the int stack; a missing or negative index means the
    /// member currently executing.
    fn swarm_position(&mut self, personal_best: bool, swarm: &dyn SwarmView) {
        let size = swarm.swarm_size();
        if size == 0 {
            return;
        }
        let member = match self.stacks.int.pop() {
            Some(i) if i >= 0 => i as usize % size,
            _ => self.current % size,
        };
        if let Some(point) = swarm.position(member, personal_best) {
            self.stacks.vector.push(point.to_vec());
        }
    }
}

/// Euclidean length, accumulated in double precision.
pub fn magnitude(v: &[f32]) -> f32 {
    let sum: f64 = v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum();
    clamp_float(sum.sqrt() as f32)
}
