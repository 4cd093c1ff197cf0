//! Typed value stacks.
//!
//! Every operation here is total: popping an empty stack yields `None`, and
//! the rearranging operations do nothing when there are too few elements.
//! Evolved programs lean on this heavily, since most random instruction
//! sequences are short of arguments at some point.

use std::fmt;

/// A LIFO stack. Index 0 is the bottom, `len() - 1` the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> Stack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether at least `n` elements are present.
    pub fn has(&self, n: usize) -> bool {
        self.items.len() >= n
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Element at absolute position `index` counted from the bottom.
    pub fn peek(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn dup(&mut self) {
        if let Some(top) = self.items.last().cloned() {
            self.items.push(top);
        }
    }

    pub fn swap(&mut self) {
        let n = self.items.len();
        if n > 1 {
            self.items.swap(n - 1, n - 2);
        }
    }

    /// Rotate the top three: the third element moves to the top.
    pub fn rot(&mut self) {
        let n = self.items.len();
        if n > 2 {
            self.items[n - 3..].rotate_left(1);
        }
    }

    /// Clamp a depth into `[0, len - 1]` and translate it to a slot index.
    fn slot_for_depth(&self, depth: i64) -> Option<usize> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        let depth = depth.clamp(0, n as i64 - 1) as usize;
        Some(n - 1 - depth)
    }

    /// Move the element at `depth` to the top.
    pub fn yank(&mut self, depth: i64) {
        if let Some(slot) = self.slot_for_depth(depth) {
            let value = self.items.remove(slot);
            self.items.push(value);
        }
    }

    /// Copy the element at `depth` onto the top.
    pub fn yankdup(&mut self, depth: i64) {
        if let Some(slot) = self.slot_for_depth(depth) {
            let value = self.items[slot].clone();
            self.items.push(value);
        }
    }

    /// Move the top element down to `depth`.
    pub fn shove(&mut self, depth: i64) {
        if let Some(slot) = self.slot_for_depth(depth) {
            if let Some(value) = self.items.pop() {
                self.items.insert(slot, value);
            }
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Stack<T> {
    /// Prints top first, as Push inspectors do.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.items.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(values: &[i32]) -> Stack<i32> {
        let mut stack = Stack::new();
        for v in values {
            stack.push(*v);
        }
        stack
    }

    #[test]
    fn test_rot_brings_third_to_top() {
        let mut stack = stack_of(&[1, 2, 3, 4]);
        stack.rot();
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_yank_clamps_depth() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.yank(99);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 3, 1]);

        let mut stack = stack_of(&[1, 2, 3]);
        stack.yank(-4);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_yankdup_copies() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.yankdup(1);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 2]);
    }

    #[test]
    fn test_shove_moves_top_down() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.shove(2);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);

        let mut stack = stack_of(&[1, 2, 3]);
        stack.shove(0);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_small_stacks_are_noops() {
        let mut stack: Stack<i32> = Stack::new();
        stack.dup();
        stack.swap();
        stack.rot();
        stack.yank(1);
        stack.shove(1);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);

        let mut stack = stack_of(&[7, 8]);
        stack.rot();
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![7, 8]);
    }

    #[test]
    fn test_display_top_first() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.to_string(), "[3 2 1]");
    }
}
