//! Runtime value type.
//!
//! A [`Value`] is what a binding holds.  Primitive variants carry their data
//! inline, so cloning a `Value` duplicates a primitive.  Composites live in
//! the [`Heap`](crate::heap::Heap) and a `Value` only carries their
//! [`ObjectId`]; cloning it produces a second reference to the same storage.
//! That split is the whole copy-versus-reference rule.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use num_bigint::BigInt;

use crate::heap::ObjectId;

// ── Kind ──────────────────────────────────────────────────────────────────────

/// Category of a value.  The first seven are primitive, the last three
/// composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    BigInt,
    Boolean,
    Null,
    Undefined,
    Symbol,
    Array,
    Record,
    Callable,
}

impl Kind {
    pub fn is_primitive(self) -> bool {
        !matches!(self, Kind::Array | Kind::Record | Kind::Callable)
    }

    /// Result of the `typeof` operator for a value of this kind.
    ///
    /// `null` reports `"object"`, as it always has.
    pub fn type_of(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::BigInt => "bigint",
            Kind::Boolean => "boolean",
            Kind::Undefined => "undefined",
            Kind::Symbol => "symbol",
            Kind::Null | Kind::Array | Kind::Record => "object",
            Kind::Callable => "function",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::BigInt => "bigint",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
            Kind::Symbol => "symbol",
            Kind::Array => "array",
            Kind::Record => "record",
            Kind::Callable => "callable",
        })
    }
}

// ── Symbol ────────────────────────────────────────────────────────────────────

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique symbolic identifier.
///
/// Every call to [`Symbol::new`] yields a symbol distinct from all others,
/// even when the descriptions match.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Rc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Symbol {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Rc::from),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ── Value ─────────────────────────────────────────────────────────────────────

/// A value held by a binding, an array slot or a record field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The uninitialized-value marker.
    #[default]
    Undefined,
    /// The absent-value marker.
    Null,
    Bool(bool),
    /// Integers and decimals share one IEEE-754 double.
    Number(f64),
    /// Arbitrary-precision integer.
    BigInt(BigInt),
    Str(String),
    Symbol(Symbol),
    /// Reference to a composite in the heap.
    Ref(ObjectId),
}

impl Value {
    /// Kind of a primitive value; `None` for references, whose kind lives in
    /// the heap (see [`Heap::kind_of`](crate::heap::Heap::kind_of)).
    pub fn primitive_kind(&self) -> Option<Kind> {
        Some(match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::BigInt(_) => Kind::BigInt,
            Value::Str(_) => Kind::String,
            Value::Symbol(_) => Kind::Symbol,
            Value::Ref(_) => return None,
        })
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Ref(_))
    }

    /// `true` for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Parse a BigInt literal's digits (`"9007199254740991"`).
    pub fn bigint(digits: &str) -> Option<Self> {
        digits.parse::<BigInt>().ok().map(Value::BigInt)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_unique_even_with_same_description() {
        let a = Symbol::new(Some("id"));
        let b = Symbol::new(Some("id"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.description(), Some("id"));
    }

    #[test]
    fn clone_of_string_is_independent() {
        let a = Value::from("John");
        let mut b = a.clone();
        if let Value::Str(s) = &mut b {
            s.push_str(" Doe");
        }
        assert_eq!(a, Value::from("John"));
        assert_eq!(b, Value::from("John Doe"));
    }

    #[test]
    fn primitive_kinds() {
        assert_eq!(Value::from(3).primitive_kind(), Some(Kind::Number));
        assert_eq!(Value::Null.primitive_kind(), Some(Kind::Null));
        assert_eq!(Value::default().primitive_kind(), Some(Kind::Undefined));
        assert_eq!(Value::bigint("109234532525").and_then(|v| v.primitive_kind()), Some(Kind::BigInt));
    }

    #[test]
    fn type_of_table() {
        assert_eq!(Kind::Null.type_of(), "object");
        assert_eq!(Kind::Array.type_of(), "object");
        assert_eq!(Kind::Callable.type_of(), "function");
        assert_eq!(Kind::BigInt.type_of(), "bigint");
        assert_eq!(Kind::Symbol.type_of(), "symbol");
    }

    #[test]
    fn primitive_split() {
        assert!(Kind::Symbol.is_primitive());
        assert!(!Kind::Record.is_primitive());
        assert!(Value::Null.is_nullish());
        assert!(!Value::from(0).is_nullish());
    }

    #[test]
    fn bigint_literal_rejects_garbage() {
        assert!(Value::bigint("12x").is_none());
        assert_eq!(Value::bigint("9007199254740991"), Some(Value::BigInt(BigInt::from(9007199254740991i64))));
    }
}
