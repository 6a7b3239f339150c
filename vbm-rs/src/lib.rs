//! A model of how a dynamically typed scripting language binds names to
//! values.
//!
//! Primitives copy on assignment; arrays, records and callables live in a
//! shared [`heap`] and every binding to one sees every in-place change.  A
//! binding's mutability governs rebinding only.
//!
//! ```
//! use vbm::{Model, Mutability, Mutation, Value};
//!
//! let mut m = Model::new();
//! let list = m.array(vec![Value::from(1)]);
//! m.bind("a", list, Mutability::Immutable);
//! let alias = m.read("a").unwrap();
//! m.bind("b", alias, Mutability::Mutable);
//! m.mutate_in_place("b", Mutation::Push(Value::from(2))).unwrap();
//! assert_eq!(m.render(&m.read("a").unwrap()), "[ 1, 2 ]");
//! assert!(m.reassign("a", Value::Null).is_err());
//! ```

pub mod binding;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod heap;
pub mod ident;
pub mod lessons;
pub mod model;
pub mod ops;
pub mod value;

pub use binding::{DeclKind, Mutability};
pub use error::{BindingError, ModelResult};
pub use model::{Model, Mutation};
pub use value::{Kind, Value};
