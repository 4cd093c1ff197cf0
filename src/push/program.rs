//! Program trees.
//!
//! A program is a list of code items, each either an atom or a nested
//! list. Points are counted in preorder with the root list at index 0, so a
//! program `(a (b c))` has five points: the root, `a`, the inner list, `b`,
//! and `c`.

use std::fmt;

use super::instruction::Instruction;

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Instruction(Instruction),
    Int(i32),
    Float(f32),
    Bool(bool),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Instruction(i) => write!(f, "{}", i),
            Atom::Int(v) => write!(f, "{}", v),
            Atom::Float(v) => write!(f, "{:?}", v),
            Atom::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    Atom(Atom),
    List(Vec<Code>),
}

impl Code {
    pub fn instruction(instruction: Instruction) -> Self {
        Code::Atom(Atom::Instruction(instruction))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Code::List(_))
    }

    /// Number of points in this subtree.
    pub fn points(&self) -> usize {
        match self {
            Code::Atom(_) => 1,
            Code::List(items) => 1 + items.iter().map(Code::points).sum::<usize>(),
        }
    }

    /// Subtree at preorder `index`, where 0 is `self`.
    pub fn subtree(&self, index: usize) -> Option<&Code> {
        if index == 0 {
            return Some(self);
        }
        let Code::List(items) = self else {
            return None;
        };
        let mut remaining = index - 1;
        for item in items {
            let size = item.points();
            if remaining < size {
                return item.subtree(remaining);
            }
            remaining -= size;
        }
        None
    }

    pub fn subtree_mut(&mut self, index: usize) -> Option<&mut Code> {
        if index == 0 {
            return Some(self);
        }
        let Code::List(items) = self else {
            return None;
        };
        let mut remaining = index - 1;
        for item in items.iter_mut() {
            let size = item.points();
            if remaining < size {
                return item.subtree_mut(remaining);
            }
            remaining -= size;
        }
        None
    }

    /// Remove the subtree at preorder `index` (> 0) from its parent list.
    pub fn remove_subtree(&mut self, index: usize) -> bool {
        let Code::List(items) = self else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let mut remaining = index - 1;
        for pos in 0..items.len() {
            if remaining == 0 {
                items.remove(pos);
                return true;
            }
            let size = items[pos].points();
            if remaining < size {
                return items[pos].remove_subtree(remaining);
            }
            remaining -= size;
        }
        false
    }

    /// Splice the list at preorder `index` (> 0) into its parent. Atoms are
    /// left alone.
    pub fn flatten_subtree(&mut self, index: usize) -> bool {
        let Code::List(items) = self else {
            return false;
        };
        if index == 0 {
            return false;
        }
        let mut remaining = index - 1;
        for pos in 0..items.len() {
            if remaining == 0 {
                if let Code::List(inner) = &items[pos] {
                    let inner = inner.clone();
                    items.splice(pos..=pos, inner);
                    return true;
                }
                return false;
            }
            let size = items[pos].points();
            if remaining < size {
                return items[pos].flatten_subtree(remaining);
            }
            remaining -= size;
        }
        false
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Atom(atom) => write!(f, "{}", atom),
            Code::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An evolved program. The root is always a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    root: Code,
}

impl Default for Program {
    fn default() -> Self {
        Self::empty()
    }
}

impl Program {
    pub const fn empty() -> Self {
        Self {
            root: Code::List(Vec::new()),
        }
    }

    pub fn new(items: Vec<Code>) -> Self {
        Self {
            root: Code::List(items),
        }
    }

    /// Wrap arbitrary code; a bare atom becomes a one-item program.
    pub fn from_code(code: Code) -> Self {
        match code {
            Code::List(_) => Self { root: code },
            atom => Self::new(vec![atom]),
        }
    }

    pub fn as_code(&self) -> &Code {
        &self.root
    }

    pub fn items(&self) -> &[Code] {
        match &self.root {
            Code::List(items) => items,
            Code::Atom(_) => &[],
        }
    }

    /// Total points, including the root list.
    pub fn points(&self) -> usize {
        self.root.points()
    }

    pub fn subtree(&self, index: usize) -> Option<&Code> {
        self.root.subtree(index)
    }

    pub fn subtree_points(&self, index: usize) -> usize {
        self.subtree(index).map(Code::points).unwrap_or(0)
    }

    /// Replace the subtree at `index`. Replacing the root with an atom keeps
    /// the root a list.
    pub fn replace_subtree(&mut self, index: usize, replacement: Code) {
        if index == 0 {
            *self = Program::from_code(replacement);
            return;
        }
        if let Some(slot) = self.root.subtree_mut(index) {
            *slot = replacement;
        }
    }

    pub fn remove_subtree(&mut self, index: usize) -> bool {
        self.root.remove_subtree(index)
    }

    pub fn flatten_subtree(&mut self, index: usize) -> bool {
        self.root.flatten_subtree(index)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
