use swarmforge::config::InterpreterConfig;
use swarmforge::push::{Atom, Code, Instruction, Interpreter, NoSwarm, Program};

enum Token {
    I(i32),
    F(f32),
    Op(&'static str),
}

fn program(tokens: Vec<Token>) -> Program {
    Program::new(
        tokens
            .into_iter()
            .map(|t| match t {
                Token::I(v) => Code::Atom(Atom::Int(v)),
                Token::F(v) => Code::Atom(Atom::Float(v)),
                Token::Op(name) => Code::Atom(Atom::Instruction(Instruction::from_name(name).unwrap())),
            })
            .collect(),
    )
}

fn interpreter() -> Interpreter {
    Interpreter::new(&InterpreterConfig::default(), 3)
}

#[test]
fn test_floats_to_vector_and_back() {
    use Token::*;
    let mut ip = interpreter();
    ip.execute(
        &program(vec![F(1.5), F(-2.0), Op("vector.fromfloats"), Op("vector.tofloats")]),
        100,
        &NoSwarm,
    );
    let floats: Vec<f32> = ip.stacks().float.iter().copied().collect();
    assert_eq!(floats, vec![1.5, -2.0]);
    assert!(ip.stacks().vector.is_empty());
}

#[test]
fn test_round_trip_leaves_deeper_floats_alone() {
    use Token::*;
    let mut ip = interpreter();
    ip.execute(
        &program(vec![F(7.0), F(8.0), F(1.5), F(-2.0), Op("vector.fromfloats")]),
        100,
        &NoSwarm,
    );
    let floats: Vec<f32> = ip.stacks().float.iter().copied().collect();
    assert_eq!(floats, vec![7.0, 8.0]);
    assert_eq!(ip.stacks().vector.top(), Some(&vec![1.5, -2.0]));

    ip.execute(&program(vec![Op("vector.tofloats")]), 100, &NoSwarm);
    let floats: Vec<f32> = ip.stacks().float.iter().copied().collect();
    assert_eq!(floats, vec![7.0, 8.0, 1.5, -2.0]);
    assert!(ip.stacks().vector.is_empty());
}

#[test]
fn test_overflowing_scale_clamps_to_max() {
    use Token::*;
    let mut ip = interpreter();
    ip.execute(
        &program(vec![F(3e38), F(-3e38), Op("vector.fromfloats"), F(10.0), Op("vector.scalar*")]),
        100,
        &NoSwarm,
    );
    assert_eq!(ip.stacks().vector.top(), Some(&vec![f32::MAX, 1.0 - f32::MAX]));
}

#[test]
fn test_negative_component_index_wraps() {
    use Token::*;
    let mut ip = interpreter();
    ip.execute(
        &program(vec![F(1.0), F(2.0), Op("vector.fromfloats"), I(-1), Op("vector.get")]),
        100,
        &NoSwarm,
    );
    assert_eq!(ip.stacks().float.top(), Some(&2.0));
    assert_eq!(ip.stacks().vector.len(), 1);
}

#[test]
fn test_missing_operands_leave_stacks_untouched() {
    use Token::*;
    let mut ip = interpreter();
    ip.execute(&program(vec![F(4.0), Op("vector.fromfloats"), Op("integer.+")]), 100, &NoSwarm);
    assert_eq!(ip.stacks().float.len(), 1);
    assert!(ip.stacks().vector.is_empty());
    assert!(ip.stacks().int.is_empty());
}

#[test]
fn test_infinite_loop_stops_at_step_limit() {
    use Token::*;
    let mut ip = interpreter();
    let steps = ip.execute(&program(vec![Op("exec.y"), I(1)]), 50, &NoSwarm);
    assert_eq!(steps, 50);
    assert!(!ip.stacks().exec.is_empty());
}
