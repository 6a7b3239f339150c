//! Binding table.
//!
//! Maps names to slots.  Each slot holds a [`Value`] and a [`Mutability`]
//! fixed when the slot is created; nothing in this module ever changes a
//! slot's mutability afterwards.

use std::collections::HashMap;
use std::fmt;

use crate::value::Value;

/// Whether a binding may be rebound.
///
/// Immutability constrains rebinding only.  A composite referenced by an
/// immutable binding can still be mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Immutable,
}

/// The declaration keyword a binding was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn mutability(self) -> Mutability {
        match self {
            DeclKind::Const => Mutability::Immutable,
            DeclKind::Var | DeclKind::Let => Mutability::Mutable,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        })
    }
}

/// One named slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub kind: DeclKind,
}

impl Binding {
    pub fn new(kind: DeclKind, value: Value) -> Self {
        Self { value, kind }
    }

    pub fn mutability(&self) -> Mutability {
        self.kind.mutability()
    }
}

/// Name → binding store.
#[derive(Debug, Default)]
pub struct BindingTable {
    slots: HashMap<String, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a binding.  Returns the binding it replaced.
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.slots.insert(name.into(), binding)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.slots.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.slots.get_mut(name)
    }

    /// Remove a binding.  Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.slots.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Every value held by a binding; the roots for heap collection.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.values().map(|b| &b.value)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut table = BindingTable::new();
        table.insert("age", Binding::new(DeclKind::Let, Value::from(30)));
        assert_eq!(table.get("age").map(|b| &b.value), Some(&Value::from(30)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn replace_returns_previous() {
        let mut table = BindingTable::new();
        table.insert("x", Binding::new(DeclKind::Var, Value::from("old")));
        let prev = table.insert("x", Binding::new(DeclKind::Var, Value::from("new")));
        assert_eq!(prev.map(|b| b.value), Some(Value::from("old")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn const_is_immutable() {
        assert_eq!(DeclKind::Const.mutability(), Mutability::Immutable);
        assert_eq!(DeclKind::Let.mutability(), Mutability::Mutable);
        assert_eq!(DeclKind::Var.mutability(), Mutability::Mutable);
        assert_eq!(Binding::new(DeclKind::Const, Value::Null).mutability(), Mutability::Immutable);
    }

    #[test]
    fn remove() {
        let mut table = BindingTable::new();
        table.insert("gone", Binding::new(DeclKind::Let, Value::Undefined));
        assert!(table.remove("gone"));
        assert!(!table.contains("gone"));
        assert!(!table.remove("gone"));
    }

    #[test]
    fn values_lists_every_binding() {
        let mut table = BindingTable::new();
        table.insert("a", Binding::new(DeclKind::Let, Value::from(1)));
        table.insert("b", Binding::new(DeclKind::Let, Value::from(2)));
        let mut seen: Vec<_> = table.values().cloned().collect();
        seen.sort_by(|x, y| format!("{x:?}").cmp(&format!("{y:?}")));
        assert_eq!(seen, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn missing_returns_none() {
        let table = BindingTable::new();
        assert!(table.get("nope").is_none());
        assert!(table.is_empty());
    }
}
