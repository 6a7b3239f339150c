//! Errors raised by the binding model.
//!
//! `ImmutableBindingViolation` is the one error the core contract defines;
//! the remaining variants come from name resolution, declarations, structural
//! mutation, and the language-level type/range checks of the operators.

use std::fmt;

use crate::value::Kind;

/// Result alias used throughout the model.
pub type ModelResult<T> = Result<T, BindingError>;

/// Everything that can go wrong when binding, reading or mutating values.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingError {
    /// `reassign` on a binding whose mutability is [`Immutable`](crate::binding::Mutability::Immutable).
    ImmutableBindingViolation { name: String },
    /// The name is not present in the binding table.
    UnknownBinding { name: String },
    /// A structural mutation was applied to a binding holding a primitive.
    NotComposite { name: String, kind: Kind },
    /// The mutation does not apply to this kind of composite.
    InvalidMutation { kind: Kind, details: String },
    /// A declaration used a name that is not a valid identifier.
    InvalidIdentifier { name: String },
    /// `const` declared without a value.
    MissingInitializer { name: String },
    /// `let`/`const` declared over an existing binding.
    Redeclaration { name: String },
    /// A value had an incompatible kind for the operation.
    TypeError { details: String },
    /// A value was outside the range the operation accepts.
    RangeError { details: String },
}

impl BindingError {
    pub(crate) fn type_error(details: impl Into<String>) -> Self {
        BindingError::TypeError { details: details.into() }
    }

    pub(crate) fn range_error(details: impl Into<String>) -> Self {
        BindingError::RangeError { details: details.into() }
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::ImmutableBindingViolation { name } => {
                write!(f, "TypeError: Assignment to constant variable '{name}'.")
            }
            BindingError::UnknownBinding { name } => {
                write!(f, "ReferenceError: {name} is not defined")
            }
            BindingError::NotComposite { name, kind } => {
                write!(f, "TypeError: '{name}' holds a {kind}, which cannot be mutated in place")
            }
            BindingError::InvalidMutation { kind, details } => {
                write!(f, "TypeError: cannot {details} on {kind}")
            }
            BindingError::InvalidIdentifier { name } => {
                write!(f, "SyntaxError: '{name}' is not a valid identifier")
            }
            BindingError::MissingInitializer { name } => {
                write!(f, "SyntaxError: Missing initializer in const declaration '{name}'")
            }
            BindingError::Redeclaration { name } => {
                write!(f, "SyntaxError: Identifier '{name}' has already been declared")
            }
            BindingError::TypeError { details } => write!(f, "TypeError: {details}"),
            BindingError::RangeError { details } => write!(f, "RangeError: {details}"),
        }
    }
}

impl std::error::Error for BindingError {}

// ── Tests ─────────────────────────────────────────────────────────────────────
