use std::collections::{HashMap, hash_map::Entry};

use crate::ast::Type;

/// A declared name's static type record; the name is the frame key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The declared type.
    pub ty: Type,
}

/// A chain of name-resolution frames, innermost last.
///
/// The same structure backs both the semantic analyzer (holding
/// [`Symbol`]s) and the virtual machine (holding typed values). The bottom
/// frame is the global scope and is never popped. Lookups walk from the top
/// of the stack towards the bottom, so inner declarations shadow outer ones.
#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    frames: Vec<HashMap<String, T>>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeStack<T> {
    /// Creates a stack holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![HashMap::new()], }
    }

    /// Number of live frames, the global frame included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pushes a new, empty innermost frame.
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Removes the innermost frame.
    ///
    /// Returns `false`, leaving the stack untouched, when only the global
    /// frame is left.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Pops frames until at most `depth` remain (never below the global
    /// frame).
    pub fn unwind_to(&mut self, depth: usize) {
        self.frames.truncate(depth.max(1));
    }

    /// Declares `name` in the innermost frame.
    ///
    /// Returns `false` if the innermost frame already holds `name`; the
    /// existing entry is kept. A name living only in an outer frame does not
    /// count, which is what permits shadowing.
    ///
    /// # Example
    /// ```
    /// use minilang::interpreter::scope::ScopeStack;
    ///
    /// let mut scopes = ScopeStack::new();
    /// assert!(scopes.declare("x", 1));
    /// assert!(!scopes.declare("x", 2));
    ///
    /// scopes.push();
    /// assert!(scopes.declare("x", 3));
    /// assert_eq!(scopes.resolve("x"), Some(&3));
    ///
    /// scopes.pop();
    /// assert_eq!(scopes.resolve("x"), Some(&1));
    /// ```
    #[must_use]
    pub fn declare(&mut self, name: &str, entry: T) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };

        match frame.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            },
        }
    }

    /// Finds the innermost entry for `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Finds the innermost entry for `name`, mutably.
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut T> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_frame_is_never_popped() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        assert!(!scopes.pop());
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn unwind_restores_depth() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.push();
        scopes.push();
        assert!(scopes.declare("inner", 1));
        scopes.unwind_to(1);

        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.resolve("inner"), None);

        scopes.unwind_to(0);
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn resolve_mut_updates_innermost_binding() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.declare("x", 1));
        scopes.push();
        assert!(scopes.declare("x", 10));

        if let Some(x) = scopes.resolve_mut("x") {
            *x += 1;
        }
        assert_eq!(scopes.resolve("x"), Some(&11));

        scopes.pop();
        assert_eq!(scopes.resolve("x"), Some(&1));
    }
}
