//! The closed instruction set.
//!
//! Instructions are grouped by the stack they mainly work on. Each one
//! declares, through [`Signature`], how many values it needs on each stack;
//! the interpreter skips an instruction whose signature is not met.

use std::fmt;

use crate::error::{Result, SwarmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackType {
    Integer,
    Float,
    Boolean,
    Vector,
    Code,
    Exec,
}

impl StackType {
    pub const ALL: [StackType; 6] = [
        StackType::Integer,
        StackType::Float,
        StackType::Boolean,
        StackType::Vector,
        StackType::Code,
        StackType::Exec,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            StackType::Integer => "integer",
            StackType::Float => "float",
            StackType::Boolean => "boolean",
            StackType::Vector => "vector",
            StackType::Code => "code",
            StackType::Exec => "exec",
        }
    }
}

/// Operations every typed stack supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    Dup,
    Pop,
    Swap,
    Rot,
    Flush,
    Depth,
    Yank,
    YankDup,
    Shove,
    Equal,
}

impl StackOp {
    pub const ALL: [StackOp; 10] = [
        StackOp::Dup,
        StackOp::Pop,
        StackOp::Swap,
        StackOp::Rot,
        StackOp::Flush,
        StackOp::Depth,
        StackOp::Yank,
        StackOp::YankDup,
        StackOp::Shove,
        StackOp::Equal,
    ];

    fn suffix(self) -> &'static str {
        match self {
            StackOp::Dup => "dup",
            StackOp::Pop => "pop",
            StackOp::Swap => "swap",
            StackOp::Rot => "rot",
            StackOp::Flush => "flush",
            StackOp::Depth => "stackdepth",
            StackOp::Yank => "yank",
            StackOp::YankDup => "yankdup",
            StackOp::Shove => "shove",
            StackOp::Equal => "=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Min,
    Max,
    Abs,
    Neg,
    FromFloat,
    FromBool,
    Rand,
}

impl IntOp {
    pub const ALL: [IntOp; 14] = [
        IntOp::Add,
        IntOp::Sub,
        IntOp::Mul,
        IntOp::Div,
        IntOp::Mod,
        IntOp::Lt,
        IntOp::Gt,
        IntOp::Min,
        IntOp::Max,
        IntOp::Abs,
        IntOp::Neg,
        IntOp::FromFloat,
        IntOp::FromBool,
        IntOp::Rand,
    ];

    fn suffix(self) -> &'static str {
        match self {
            IntOp::Add => "+",
            IntOp::Sub => "-",
            IntOp::Mul => "*",
            IntOp::Div => "/",
            IntOp::Mod => "%",
            IntOp::Lt => "<",
            IntOp::Gt => ">",
            IntOp::Min => "min",
            IntOp::Max => "max",
            IntOp::Abs => "abs",
            IntOp::Neg => "neg",
            IntOp::FromFloat => "fromfloat",
            IntOp::FromBool => "fromboolean",
            IntOp::Rand => "rand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Min,
    Max,
    Abs,
    Neg,
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    FromInt,
    FromBool,
    Rand,
}

impl FloatOp {
    pub const ALL: [FloatOp; 19] = [
        FloatOp::Add,
        FloatOp::Sub,
        FloatOp::Mul,
        FloatOp::Div,
        FloatOp::Mod,
        FloatOp::Lt,
        FloatOp::Gt,
        FloatOp::Min,
        FloatOp::Max,
        FloatOp::Abs,
        FloatOp::Neg,
        FloatOp::Sin,
        FloatOp::Cos,
        FloatOp::Tan,
        FloatOp::Exp,
        FloatOp::Ln,
        FloatOp::FromInt,
        FloatOp::FromBool,
        FloatOp::Rand,
    ];

    fn suffix(self) -> &'static str {
        match self {
            FloatOp::Add => "+",
            FloatOp::Sub => "-",
            FloatOp::Mul => "*",
            FloatOp::Div => "/",
            FloatOp::Mod => "%",
            FloatOp::Lt => "<",
            FloatOp::Gt => ">",
            FloatOp::Min => "min",
            FloatOp::Max => "max",
            FloatOp::Abs => "abs",
            FloatOp::Neg => "neg",
            FloatOp::Sin => "sin",
            FloatOp::Cos => "cos",
            FloatOp::Tan => "tan",
            FloatOp::Exp => "exp",
            FloatOp::Ln => "ln",
            FloatOp::FromInt => "frominteger",
            FloatOp::FromBool => "fromboolean",
            FloatOp::Rand => "rand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
    Xor,
    Not,
    FromInt,
    FromFloat,
    Rand,
}

impl BoolOp {
    pub const ALL: [BoolOp; 7] = [
        BoolOp::And,
        BoolOp::Or,
        BoolOp::Xor,
        BoolOp::Not,
        BoolOp::FromInt,
        BoolOp::FromFloat,
        BoolOp::Rand,
    ];

    fn suffix(self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
            BoolOp::Xor => "xor",
            BoolOp::Not => "not",
            BoolOp::FromInt => "frominteger",
            BoolOp::FromFloat => "fromfloat",
            BoolOp::Rand => "rand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecOp {
    If,
    K,
    S,
    Y,
    DoRange,
    DoTimes,
    DoCount,
    Noop,
}

impl ExecOp {
    pub const ALL: [ExecOp; 8] = [
        ExecOp::If,
        ExecOp::K,
        ExecOp::S,
        ExecOp::Y,
        ExecOp::DoRange,
        ExecOp::DoTimes,
        ExecOp::DoCount,
        ExecOp::Noop,
    ];

    fn suffix(self) -> &'static str {
        match self {
            ExecOp::If => "if",
            ExecOp::K => "k",
            ExecOp::S => "s",
            ExecOp::Y => "y",
            ExecOp::DoRange => "do*range",
            ExecOp::DoTimes => "do*times",
            ExecOp::DoCount => "do*count",
            ExecOp::Noop => "noop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeOp {
    Quote,
    Do,
    DoStar,
    Car,
    Cdr,
    Cons,
    List,
    Append,
    Atom,
    Null,
    Length,
    Size,
    FromInt,
    FromFloat,
    FromBool,
    If,
}

impl CodeOp {
    pub const ALL: [CodeOp; 16] = [
        CodeOp::Quote,
        CodeOp::Do,
        CodeOp::DoStar,
        CodeOp::Car,
        CodeOp::Cdr,
        CodeOp::Cons,
        CodeOp::List,
        CodeOp::Append,
        CodeOp::Atom,
        CodeOp::Null,
        CodeOp::Length,
        CodeOp::Size,
        CodeOp::FromInt,
        CodeOp::FromFloat,
        CodeOp::FromBool,
        CodeOp::If,
    ];

    fn suffix(self) -> &'static str {
        match self {
            CodeOp::Quote => "quote",
            CodeOp::Do => "do",
            CodeOp::DoStar => "do*",
            CodeOp::Car => "car",
            CodeOp::Cdr => "cdr",
            CodeOp::Cons => "cons",
            CodeOp::List => "list",
            CodeOp::Append => "append",
            CodeOp::Atom => "atom",
            CodeOp::Null => "null",
            CodeOp::Length => "length",
            CodeOp::Size => "size",
            CodeOp::FromInt => "frominteger",
            CodeOp::FromFloat => "fromfloat",
            CodeOp::FromBool => "fromboolean",
            CodeOp::If => "if",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputOp {
    Index,
    InAll,
    Depth,
}

impl InputOp {
    pub const ALL: [InputOp; 3] = [InputOp::Index, InputOp::InAll, InputOp::Depth];

    fn suffix(self) -> &'static str {
        match self {
            InputOp::Index => "index",
            InputOp::InAll => "inall",
            InputOp::Depth => "stackdepth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorOp {
    GetComponent,
    SetComponent,
    FromFloats,
    ToFloats,
    Rand,
    RandWithLimits,
    RandWithWidth,
    UnitRand,
    Add,
    Sub,
    Mul,
    Div,
    AddScalar,
    SubScalar,
    MulScalar,
    DivScalar,
    Dot,
    Magnitude,
    DimAdd,
    DimMul,
    Zip,
    Apply,
    Between,
    Best,
    Current,
}

impl VectorOp {
    pub const ALL: [VectorOp; 25] = [
        VectorOp::GetComponent,
        VectorOp::SetComponent,
        VectorOp::FromFloats,
        VectorOp::ToFloats,
        VectorOp::Rand,
        VectorOp::RandWithLimits,
        VectorOp::RandWithWidth,
        VectorOp::UnitRand,
        VectorOp::Add,
        VectorOp::Sub,
        VectorOp::Mul,
        VectorOp::Div,
        VectorOp::AddScalar,
        VectorOp::SubScalar,
        VectorOp::MulScalar,
        VectorOp::DivScalar,
        VectorOp::Dot,
        VectorOp::Magnitude,
        VectorOp::DimAdd,
        VectorOp::DimMul,
        VectorOp::Zip,
        VectorOp::Apply,
        VectorOp::Between,
        VectorOp::Best,
        VectorOp::Current,
    ];

    fn suffix(self) -> &'static str {
        match self {
            VectorOp::GetComponent => "get",
            VectorOp::SetComponent => "set",
            VectorOp::FromFloats => "fromfloats",
            VectorOp::ToFloats => "tofloats",
            VectorOp::Rand => "rand",
            VectorOp::RandWithLimits => "randlimits",
            VectorOp::RandWithWidth => "randwidth",
            VectorOp::UnitRand => "unitrand",
            VectorOp::Add => "+",
            VectorOp::Sub => "-",
            VectorOp::Mul => "*",
            VectorOp::Div => "/",
            VectorOp::AddScalar => "scalar+",
            VectorOp::SubScalar => "scalar-",
            VectorOp::MulScalar => "scalar*",
            VectorOp::DivScalar => "scalar/",
            VectorOp::Dot => "dot",
            VectorOp::Magnitude => "mag",
            VectorOp::DimAdd => "dim+",
            VectorOp::DimMul => "dim*",
            VectorOp::Zip => "zip",
            VectorOp::Apply => "apply",
            VectorOp::Between => "between",
            VectorOp::Best => "best",
            VectorOp::Current => "current",
        }
    }
}

/// Minimum stack depths an instruction needs before it does anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signature {
    pub int: usize,
    pub float: usize,
    pub boolean: usize,
    pub vector: usize,
    pub code: usize,
    pub exec: usize,
}

impl Signature {
    pub const NONE: Signature = Signature {
        int: 0,
        float: 0,
        boolean: 0,
        vector: 0,
        code: 0,
        exec: 0,
    };

    pub const fn int(mut self, n: usize) -> Self {
        self.int += n;
        self
    }

    pub const fn float(mut self, n: usize) -> Self {
        self.float += n;
        self
    }

    pub const fn boolean(mut self, n: usize) -> Self {
        self.boolean += n;
        self
    }

    pub const fn vector(mut self, n: usize) -> Self {
        self.vector += n;
        self
    }

    pub const fn code(mut self, n: usize) -> Self {
        self.code += n;
        self
    }

    pub const fn exec(mut self, n: usize) -> Self {
        self.exec += n;
        self
    }

    /// Requirement of `n` values on the given stack.
    pub const fn on(self, stack: StackType, n: usize) -> Self {
        match stack {
            StackType::Integer => self.int(n),
            StackType::Float => self.float(n),
            StackType::Boolean => self.boolean(n),
            StackType::Vector => self.vector(n),
            StackType::Code => self.code(n),
            StackType::Exec => self.exec(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Stack(StackType, StackOp),
    Int(IntOp),
    Float(FloatOp),
    Bool(BoolOp),
    Exec(ExecOp),
    Code(CodeOp),
    Input(InputOp),
    Vector(VectorOp),
}

impl Instruction {
    /// Every instruction the interpreter knows.
    pub fn all() -> Vec<Instruction> {
        let mut all = Vec::new();
        for stack in StackType::ALL {
            all.extend(StackOp::ALL.iter().map(|op| Instruction::Stack(stack, *op)));
        }
        all.extend(IntOp::ALL.iter().map(|op| Instruction::Int(*op)));
        all.extend(FloatOp::ALL.iter().map(|op| Instruction::Float(*op)));
        all.extend(BoolOp::ALL.iter().map(|op| Instruction::Bool(*op)));
        all.extend(ExecOp::ALL.iter().map(|op| Instruction::Exec(*op)));
        all.extend(CodeOp::ALL.iter().map(|op| Instruction::Code(*op)));
        all.extend(InputOp::ALL.iter().map(|op| Instruction::Input(*op)));
        all.extend(VectorOp::ALL.iter().map(|op| Instruction::Vector(*op)));
        all
    }

    pub fn from_name(name: &str) -> Result<Instruction> {
        Self::all()
            .into_iter()
            .find(|i| i.to_string() == name)
            .ok_or_else(|| SwarmError::UnknownInstruction(name.to_string()))
    }

    /// Name prefix, also used for `registered.<family>` groups.
    pub fn family(&self) -> &'static str {
        match self {
            Instruction::Stack(stack, _) => stack.prefix(),
            Instruction::Int(_) => "integer",
            Instruction::Float(_) => "float",
            Instruction::Bool(_) => "boolean",
            Instruction::Exec(_) => "exec",
            Instruction::Code(_) => "code",
            Instruction::Input(_) => "input",
            Instruction::Vector(_) => "vector",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Instruction::Stack(_, op) => op.suffix(),
            Instruction::Int(op) => op.suffix(),
            Instruction::Float(op) => op.suffix(),
            Instruction::Bool(op) => op.suffix(),
            Instruction::Exec(op) => op.suffix(),
            Instruction::Code(op) => op.suffix(),
            Instruction::Input(op) => op.suffix(),
            Instruction::Vector(op) => op.suffix(),
        }
    }

    /// Operands that must be present for the instruction to run.
    ///
    /// `vector.fromfloats` also needs one float per vector dimension and
    /// `input.index` a non-empty input stack; both are checked at execution.
    pub fn signature(&self) -> Signature {
        let none = Signature::NONE;
        match *self {
            Instruction::Stack(stack, op) => match op {
                StackOp::Dup | StackOp::Pop => none.on(stack, 1),
                StackOp::Swap | StackOp::Equal => none.on(stack, 2),
                StackOp::Rot => none.on(stack, 3),
                StackOp::Flush | StackOp::Depth => none,
                StackOp::Yank | StackOp::YankDup | StackOp::Shove => none.int(1).on(stack, 1),
            },
            Instruction::Int(op) => match op {
                IntOp::Abs | IntOp::Neg => none.int(1),
                IntOp::FromFloat => none.float(1),
                IntOp::FromBool => none.boolean(1),
                IntOp::Rand => none,
                _ => none.int(2),
            },
            Instruction::Float(op) => match op {
                FloatOp::Abs
                | FloatOp::Neg
                | FloatOp::Sin
                | FloatOp::Cos
                | FloatOp::Tan
                | FloatOp::Exp
                | FloatOp::Ln => none.float(1),
                FloatOp::FromInt => none.int(1),
                FloatOp::FromBool => none.boolean(1),
                FloatOp::Rand => none,
                _ => none.float(2),
            },
            Instruction::Bool(op) => match op {
                BoolOp::And | BoolOp::Or | BoolOp::Xor => none.boolean(2),
                BoolOp::Not => none.boolean(1),
                BoolOp::FromInt => none.int(1),
                BoolOp::FromFloat => none.float(1),
                BoolOp::Rand => none,
            },
            Instruction::Exec(op) => match op {
                ExecOp::If => none.boolean(1).exec(2),
                ExecOp::K => none.exec(2),
                ExecOp::S => none.exec(3),
                ExecOp::Y => none.exec(1),
                ExecOp::DoRange => none.int(2).exec(1),
                ExecOp::DoTimes | ExecOp::DoCount => none.int(1).exec(1),
                ExecOp::Noop => none,
            },
            Instruction::Code(op) => match op {
                CodeOp::Quote => none.exec(1),
                CodeOp::Cons | CodeOp::List | CodeOp::Append => none.code(2),
                CodeOp::FromInt => none.int(1),
                CodeOp::FromFloat => none.float(1),
                CodeOp::FromBool => none.boolean(1),
                CodeOp::If => none.boolean(1).code(2),
                _ => none.code(1),
            },
            Instruction::Input(op) => match op {
                InputOp::Index => none.int(1),
                InputOp::InAll | InputOp::Depth => none,
            },
            Instruction::Vector(op) => match op {
                VectorOp::GetComponent => none.vector(1).int(1),
                VectorOp::SetComponent => none.vector(1).int(1).float(1),
                VectorOp::FromFloats => none,
                VectorOp::ToFloats | VectorOp::Magnitude => none.vector(1),
                VectorOp::Rand | VectorOp::RandWithLimits | VectorOp::UnitRand => none,
                VectorOp::RandWithWidth => none.float(1),
                VectorOp::Add | VectorOp::Sub | VectorOp::Mul | VectorOp::Div | VectorOp::Dot => {
                    none.vector(2)
                }
                VectorOp::AddScalar
                | VectorOp::SubScalar
                | VectorOp::MulScalar
                | VectorOp::DivScalar => none.vector(1).float(1),
                VectorOp::DimAdd | VectorOp::DimMul => none.vector(1).float(1).int(1),
                VectorOp::Zip => none.vector(2).exec(1),
                VectorOp::Apply => none.vector(1).exec(1),
                VectorOp::Between => none.vector(2).float(1),
                VectorOp::Best | VectorOp::Current => none,
            },
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family(), self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let all = Instruction::all();
        let names: HashSet<String> = all.iter().map(|i| i.to_string()).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_from_name_round_trips() {
        for instruction in Instruction::all() {
            let name = instruction.to_string();
            assert_eq!(Instruction::from_name(&name).unwrap(), instruction);
        }
        assert!(Instruction::from_name("vector.teleport").is_err());
    }

    #[test]
    fn test_yank_on_integer_needs_two() {
        let sig = Instruction::Stack(StackType::Integer, StackOp::Yank).signature();
        assert_eq!(sig.int, 2);
        let sig = Instruction::Stack(StackType::Vector, StackOp::Yank).signature();
        assert_eq!((sig.int, sig.vector), (1, 1));
    }
}
