//! Exec and code stack instructions: combinators, loops and code
//! manipulation.

use super::instruction::{CodeOp, ExecOp, Instruction, StackOp, StackType};
use super::interpreter::Interpreter;
use super::program::{Atom, Code};

impl Interpreter {
    pub(super) fn exec_op(&mut self, op: ExecOp) {
        let exec = &mut self.stacks.exec;
        match op {
            ExecOp::If => {
                let (Some(condition), Some(a), Some(b)) =
                    (self.stacks.boolean.pop(), exec.pop(), exec.pop())
                else {
                    return;
                };
                exec.push(if condition { a } else { b });
            }
            ExecOp::K => {
                let (Some(a), Some(_)) = (exec.pop(), exec.pop()) else {
                    return;
                };
                exec.push(a);
            }
            ExecOp::S => {
                let (Some(a), Some(b), Some(c)) = (exec.pop(), exec.pop(), exec.pop()) else {
                    return;
                };
                if b.points() + 2 * c.points() + a.points() + 1 > self.max_points {
                    exec.push(c);
                    exec.push(b);
                    exec.push(a);
                    return;
                }
                exec.push(Code::List(vec![b, c.clone()]));
                exec.push(c);
                exec.push(a);
            }
            ExecOp::Y => {
                let Some(a) = exec.pop() else {
                    return;
                };
                let recursion = Code::List(vec![Code::instruction(Instruction::Exec(ExecOp::Y)), a.clone()]);
                exec.push(recursion);
                exec.push(a);
            }
            ExecOp::DoRange => {
                let (Some(destination), Some(index), Some(body)) =
                    (self.stacks.int.pop(), self.stacks.int.pop(), exec.pop())
                else {
                    return;
                };
                if index != destination {
                    let next = if index < destination { index + 1 } else { index - 1 };
                    exec.push(range_loop(next, destination, body.clone()));
                }
                self.stacks.int.push(index);
                exec.push(body);
            }
            ExecOp::DoCount | ExecOp::DoTimes => {
                match self.stacks.int.top() {
                    Some(&n) if n > 0 => {}
                    _ => return,
                }
                let (Some(n), Some(body)) = (self.stacks.int.pop(), exec.pop()) else {
                    return;
                };
                let body = if op == ExecOp::DoTimes {
                    let drop_index = Code::instruction(Instruction::Stack(StackType::Integer, StackOp::Pop));
                    Code::List(vec![drop_index, body])
                } else {
                    body
                };
                exec.push(range_loop(0, n - 1, body));
            }
            ExecOp::Noop => {}
        }
    }

    pub(super) fn code_op(&mut self, op: CodeOp) {
        match op {
            CodeOp::Quote => {
                if let Some(item) = self.stacks.exec.pop() {
                    self.stacks.code.push(item);
                }
            }
            CodeOp::Do => {
                let Some(item) = self.stacks.code.top().cloned() else {
                    return;
                };
                let pop = Code::instruction(Instruction::Stack(StackType::Code, StackOp::Pop));
                self.stacks.exec.push(pop);
                self.stacks.exec.push(item);
            }
            CodeOp::DoStar => {
                if let Some(item) = self.stacks.code.pop() {
                    self.stacks.exec.push(item);
                }
            }
            CodeOp::Car => {
                if let Some(item) = self.stacks.code.pop() {
                    let first = match item {
                        Code::List(items) => items.into_iter().next().unwrap_or(Code::List(Vec::new())),
                        atom => atom,
                    };
                    self.stacks.code.push(first);
                }
            }
            CodeOp::Cdr => {
                if let Some(item) = self.stacks.code.pop() {
                    let rest = match item {
                        Code::List(items) => items.into_iter().skip(1).collect(),
                        Code::Atom(_) => Vec::new(),
                    };
                    self.stacks.code.push(Code::List(rest));
                }
            }
            CodeOp::Cons | CodeOp::List | CodeOp::Append => {
                let (Some(a), Some(b)) = (self.stacks.code.pop(), self.stacks.code.pop()) else {
                    return;
                };
                if a.points() + b.points() + 1 > self.max_points {
                    self.stacks.code.push(b);
                    self.stacks.code.push(a);
                    return;
                }
                let combined = match op {
                    CodeOp::Cons => {
                        let mut items = vec![b];
                        items.extend(into_items(a));
                        Code::List(items)
                    }
                    CodeOp::List => Code::List(vec![b, a]),
                    _ => {
                        let mut items = into_items(b);
                        items.extend(into_items(a));
                        Code::List(items)
                    }
                };
                self.stacks.code.push(combined);
            }
            CodeOp::Atom => {
                if let Some(item) = self.stacks.code.pop() {
                    self.stacks.boolean.push(!item.is_list());
                }
            }
            CodeOp::Null => {
                if let Some(item) = self.stacks.code.pop() {
                    self.stacks.boolean.push(matches!(&item, Code::List(items) if items.is_empty()));
                }
            }
            CodeOp::Length => {
                if let Some(item) = self.stacks.code.pop() {
                    let length = match &item {
                        Code::List(items) => items.len(),
                        Code::Atom(_) => 1,
                    };
                    self.stacks.int.push(length as i32);
                }
            }
            CodeOp::Size => {
                if let Some(item) = self.stacks.code.pop() {
                    self.stacks.int.push(item.points() as i32);
                }
            }
            CodeOp::FromInt => {
                if let Some(v) = self.stacks.int.pop() {
                    self.stacks.code.push(Code::Atom(Atom::Int(v)));
                }
            }
            CodeOp::FromFloat => {
                if let Some(v) = self.stacks.float.pop() {
                    self.stacks.code.push(Code::Atom(Atom::Float(v)));
                }
            }
            CodeOp::FromBool => {
                if let Some(v) = self.stacks.boolean.pop() {
                    self.stacks.code.push(Code::Atom(Atom::Bool(v)));
                }
            }
            CodeOp::If => {
                let (Some(condition), Some(otherwise), Some(then)) = (
                    self.stacks.boolean.pop(),
                    self.stacks.code.pop(),
                    self.stacks.code.pop(),
                ) else {
                    return;
                };
                self.stacks.exec.push(if condition { then } else { otherwise });
            }
        }
    }
}

/// `( from to exec.do*range body )`
fn range_loop(from: i32, to: i32, body: Code) -> Code {
    Code::List(vec![
        Code::Atom(Atom::Int(from)),
        Code::Atom(Atom::Int(to)),
        Code::instruction(Instruction::Exec(ExecOp::DoRange)),
        body,
    ])
}

fn into_items(code: Code) -> Vec<Code> {
    match code {
        Code::List(items) => items,
        atom => vec![atom],
    }
}

#[cfg(test)]
mod tests {
    use crate::config::InterpreterConfig;
    use crate::push::instruction::{CodeOp, ExecOp, Instruction, IntOp};
    use crate::push::interpreter::{Interpreter, NoSwarm};
    use crate::push::program::{Atom, Code, Program};

    fn run(items: Vec<Code>) -> Interpreter {
        let mut ip = Interpreter::new(&InterpreterConfig::default(), 3);
        ip.execute(&Program::new(items), 1000, &NoSwarm);
        ip
    }

    fn int(v: i32) -> Code {
        Code::Atom(Atom::Int(v))
    }

    fn bool(v: bool) -> Code {
        Code::Atom(Atom::Bool(v))
    }

    fn op(i: Instruction) -> Code {
        Code::instruction(i)
    }

    fn ints(ip: &Interpreter) -> Vec<i32> {
        ip.stacks().int.iter().copied().collect()
    }

    #[test]
    fn test_exec_if_picks_branch() {
        let ip = run(vec![bool(true), op(Instruction::Exec(ExecOp::If)), int(1), int(2)]);
        assert_eq!(ints(&ip), vec![1]);

        let ip = run(vec![bool(false), op(Instruction::Exec(ExecOp::If)), int(1), int(2)]);
        assert_eq!(ints(&ip), vec![2]);
    }

    #[test]
    fn test_do_times_repeats_body() {
        let ip = run(vec![
            int(0),
            int(4),
            op(Instruction::Exec(ExecOp::DoTimes)),
            Code::List(vec![int(1), op(Instruction::Int(IntOp::Add))]),
        ]);
        assert_eq!(ints(&ip), vec![4]);
    }

    #[test]
    fn test_do_count_pushes_indices() {
        let ip = run(vec![int(3), op(Instruction::Exec(ExecOp::DoCount)), op(Instruction::Exec(ExecOp::Noop))]);
        assert_eq!(ints(&ip), vec![0, 1, 2]);
    }

    #[test]
    fn test_do_count_non_positive_is_noop() {
        let ip = run(vec![int(0), op(Instruction::Exec(ExecOp::DoCount)), int(9)]);
        assert_eq!(ints(&ip), vec![0, 9]);
    }

    #[test]
    fn test_y_combinator_stops_at_step_limit() {
        let mut ip = Interpreter::new(&InterpreterConfig::default(), 3);
        let program = Program::new(vec![op(Instruction::Exec(ExecOp::Y)), int(1)]);
        let steps = ip.execute(&program, 50, &NoSwarm);
        assert_eq!(steps, 50);
        assert!(!ip.stacks().int.is_empty());
    }

    #[test]
    fn test_quote_and_do() {
        let ip = run(vec![
            op(Instruction::Code(CodeOp::Quote)),
            Code::List(vec![int(2), int(3), op(Instruction::Int(IntOp::Mul))]),
            op(Instruction::Code(CodeOp::Do)),
        ]);
        assert_eq!(ints(&ip), vec![6]);
        assert!(ip.stacks().code.is_empty());
    }

    #[test]
    fn test_code_if_top_is_false_branch() {
        let ip = run(vec![
            op(Instruction::Code(CodeOp::Quote)),
            int(1),
            op(Instruction::Code(CodeOp::Quote)),
            int(2),
            bool(true),
            op(Instruction::Code(CodeOp::If)),
        ]);
        assert_eq!(ints(&ip), vec![1]);
    }

    #[test]
    fn test_cons_prepends_to_list() {
        let ip = run(vec![
            int(1),
            op(Instruction::Code(CodeOp::FromInt)),
            op(Instruction::Code(CodeOp::Quote)),
            Code::List(vec![int(2), int(3)]),
            op(Instruction::Code(CodeOp::Cons)),
            op(Instruction::Code(CodeOp::Size)),
        ]);
        assert_eq!(ints(&ip), vec![4]);
    }

    #[test]
    fn test_code_growth_is_bounded() {
        let config = InterpreterConfig {
            max_code_points: 10,
            ..InterpreterConfig::default()
        };
        let mut ip = Interpreter::new(&config, 3);
        ip.stacks_mut().code.push(Code::List((0..6).map(int).collect()));
        ip.stacks_mut().code.push(Code::List((0..6).map(int).collect()));
        ip.execute_instruction(Instruction::Code(CodeOp::Append), &NoSwarm);
        assert_eq!(ip.stacks().code.len(), 2);
    }
}
