//! The value binding model.
//!
//! [`Model`] owns the binding table and the composite heap.  Every way a
//! value moves between names goes through it:
//!
//! - [`Model::bind`] / [`Model::declare`] create a binding.
//! - [`Model::reassign`] rebinds, and is the only operation that consults
//!   mutability.
//! - [`Model::mutate_in_place`] changes the composite a binding refers to,
//!   and never consults mutability.
//! - [`Model::read`] hands out a copy of a primitive or a second reference
//!   to a composite.
//!
//! Calls, operators and `print` are layered on top of those.

use std::rc::Rc;

use crate::binding::{Binding, BindingTable, DeclKind, Mutability};
use crate::display::{self, RenderOptions};
use crate::error::{BindingError, ModelResult};
use crate::heap::{Callable, Composite, Heap, ObjectId};
use crate::ident::is_valid_identifier;
use crate::ops::{self, ArithOp, BinaryOp, UpdateOp};
use crate::value::{Symbol, Value};

/// Longest array the scripting language allows.
pub const MAX_ARRAY_LENGTH: usize = u32::MAX as usize;

/// Arrays are stored densely, so one index write may open at most this many
/// `undefined` holes past the end.
pub const MAX_ARRAY_GAP: usize = 1 << 20;

// ── Mutation ──────────────────────────────────────────────────────────────────

/// A structural change to a composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Append to an array.  Yields the new length.
    Push(Value),
    /// Remove the last array element.  Yields it, or `undefined` when empty.
    Pop,
    /// Write an array slot, padding with `undefined` past the end.
    SetIndex(usize, Value),
    /// Add or overwrite a record field.
    SetField(String, Value),
    /// Remove a record field.
    DeleteField(String),
}

impl Mutation {
    fn describe(&self) -> &'static str {
        match self {
            Mutation::Push(_) => "push",
            Mutation::Pop => "pop",
            Mutation::SetIndex(..) => "set an index",
            Mutation::SetField(..) => "set a field",
            Mutation::DeleteField(_) => "delete a field",
        }
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Model {
    bindings: BindingTable,
    heap: Heap,
    output: Vec<String>,
    render: RenderOptions,
    /// Callees and arguments of the calls in progress; collection roots.
    frames: Vec<Value>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(render: RenderOptions) -> Self {
        Model { render, ..Self::default() }
    }

    // ── Core operations ───────────────────────────────────────────────────────

    /// Associate `name` with `value`.  An existing binding of that name is
    /// replaced.
    pub fn bind(&mut self, name: impl Into<String>, value: Value, mutability: Mutability) {
        let name = name.into();
        let kind = match mutability {
            Mutability::Mutable => DeclKind::Let,
            Mutability::Immutable => DeclKind::Const,
        };
        log::debug!("bind {name} ({mutability:?})");
        if self.bindings.insert(name.clone(), Binding::new(kind, value)).is_some() {
            log::debug!("bind replaced existing binding {name}");
        }
    }

    /// `var` / `let` / `const` declaration.
    pub fn declare(&mut self, kind: DeclKind, name: &str, init: Option<Value>) -> ModelResult<()> {
        if !is_valid_identifier(name) {
            return Err(BindingError::InvalidIdentifier { name: name.to_owned() });
        }
        if kind == DeclKind::Const && init.is_none() {
            return Err(BindingError::MissingInitializer { name: name.to_owned() });
        }
        if let Some(existing) = self.bindings.get_mut(name) {
            if kind == DeclKind::Var && existing.kind == DeclKind::Var {
                if let Some(value) = init {
                    existing.value = value;
                }
                return Ok(());
            }
            return Err(BindingError::Redeclaration { name: name.to_owned() });
        }
        log::debug!("declare {kind} {name}");
        self.bindings.insert(name, Binding::new(kind, init.unwrap_or_default()));
        Ok(())
    }

    /// Rebind `name` to `value`.
    pub fn reassign(&mut self, name: &str, value: Value) -> ModelResult<()> {
        let binding = self.bindings.get_mut(name).ok_or_else(|| unknown(name))?;
        if binding.mutability() == Mutability::Immutable {
            log::debug!("reassign {name} rejected: immutable");
            return Err(BindingError::ImmutableBindingViolation { name: name.to_owned() });
        }
        log::debug!("reassign {name}");
        binding.value = value;
        Ok(())
    }

    /// Apply `mutation` to the composite `name` refers to.  The binding's
    /// mutability plays no part.
    pub fn mutate_in_place(&mut self, name: &str, mutation: Mutation) -> ModelResult<Value> {
        let value = self.read(name)?;
        let Value::Ref(id) = value else {
            return Err(BindingError::NotComposite {
                name: name.to_owned(),
                kind: self.heap.kind_of(&value),
            });
        };
        log::debug!("mutate {name} ({id}): {}", mutation.describe());
        self.mutate_object(id, mutation)
    }

    /// Apply `mutation` to the composite `target` refers to, whether or not a
    /// binding names it.
    pub fn mutate(&mut self, target: &Value, mutation: Mutation) -> ModelResult<Value> {
        match target {
            Value::Ref(id) => self.mutate_object(*id, mutation),
            other => Err(BindingError::InvalidMutation {
                kind: self.heap.kind_of(other),
                details: mutation.describe().to_owned(),
            }),
        }
    }

    fn mutate_object(&mut self, id: ObjectId, mutation: Mutation) -> ModelResult<Value> {
        let object = self
            .heap
            .get_mut(id)
            .ok_or_else(|| BindingError::type_error(format!("reference {id} has been collected")))?;
        let kind = object.kind();
        match (object, mutation) {
            (Composite::Array(items), Mutation::Push(v)) => {
                items.push(v);
                Ok(Value::Number(items.len() as f64))
            }
            (Composite::Array(items), Mutation::Pop) => Ok(items.pop().unwrap_or_default()),
            (Composite::Array(items), Mutation::SetIndex(index, v)) => {
                let len = index
                    .checked_add(1)
                    .filter(|&len| len <= MAX_ARRAY_LENGTH)
                    .ok_or_else(|| BindingError::range_error("Invalid array length"))?;
                if index > items.len().saturating_add(MAX_ARRAY_GAP) {
                    return Err(BindingError::range_error(format!(
                        "index {index} is more than {MAX_ARRAY_GAP} past the end of the array"
                    )));
                }
                if len > items.len() {
                    items.resize(len, Value::Undefined);
                }
                items[index] = v.clone();
                Ok(v)
            }
            (Composite::Record(fields), Mutation::SetField(key, v)) => {
                fields.insert(key, v.clone());
                Ok(v)
            }
            (Composite::Record(fields), Mutation::DeleteField(key)) => {
                fields.shift_remove(&key);
                Ok(Value::Bool(true))
            }
            (_, mutation) => Err(BindingError::InvalidMutation {
                kind,
                details: mutation.describe().to_owned(),
            }),
        }
    }

    /// Current value of `name`.
    pub fn read(&self, name: &str) -> ModelResult<Value> {
        self.bindings.get(name).map(|b| b.value.clone()).ok_or_else(|| unknown(name))
    }

    pub fn mutability(&self, name: &str) -> Option<Mutability> {
        self.bindings.get(name).map(Binding::mutability)
    }

    /// Drop a binding.  The composite it referred to survives until the next
    /// collection, and only if something else still reaches it.
    pub fn unbind(&mut self, name: &str) -> bool {
        self.bindings.remove(name)
    }

    // ── Allocation ────────────────────────────────────────────────────────────

    pub fn array(&mut self, items: Vec<Value>) -> Value {
        Value::Ref(self.heap.alloc(Composite::Array(items)))
    }

    pub fn record<K: Into<String>>(&mut self, fields: impl IntoIterator<Item = (K, Value)>) -> Value {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Ref(self.heap.alloc(Composite::Record(fields)))
    }

    /// A native callable.  The body must not capture `Value::Ref`s: captured
    /// references are not collection roots.
    pub fn function(
        &mut self,
        name: Option<&str>,
        body: impl Fn(&mut Model, &[Value]) -> ModelResult<Value> + 'static,
    ) -> Value {
        let callable = Callable::new(name.map(str::to_owned), body);
        Value::Ref(self.heap.alloc(Composite::Callable(callable)))
    }

    pub fn symbol(&self, description: Option<&str>) -> Value {
        Value::Symbol(Symbol::new(description))
    }

    // ── Access and calls ──────────────────────────────────────────────────────

    /// `value[key]` / `value.key`.
    pub fn member(&self, value: &Value, key: &str) -> ModelResult<Value> {
        Ok(match value {
            Value::Ref(id) => match self.heap.get(*id) {
                Some(Composite::Array(items)) if key == "length" => Value::Number(items.len() as f64),
                Some(Composite::Array(items)) => array_index(key)
                    .and_then(|i| items.get(i))
                    .cloned()
                    .unwrap_or_default(),
                Some(Composite::Record(fields)) => fields.get(key).cloned().unwrap_or_default(),
                Some(Composite::Callable(c)) if key == "name" => {
                    Value::Str(c.name.clone().unwrap_or_default())
                }
                Some(Composite::Callable(_)) | None => Value::Undefined,
            },
            Value::Str(s) if key == "length" => Value::Number(s.encode_utf16().count() as f64),
            v if v.is_nullish() => {
                return Err(BindingError::type_error(format!(
                    "Cannot read properties of {} (reading '{key}')",
                    self.render(v)
                )))
            }
            _ => Value::Undefined,
        })
    }

    /// Invoke a callable.  Arguments follow the binding rule: primitives
    /// arrive as copies, composites as references to the caller's storage.
    /// The callee and its arguments stay reachable until the call returns.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> ModelResult<Value> {
        let callable = callee
            .object_id()
            .and_then(|id| self.heap.get(id))
            .and_then(Composite::as_callable);
        let Some(callable) = callable else {
            return Err(BindingError::type_error(format!("{} is not a function", self.render(callee))));
        };
        let body = Rc::clone(&callable.body);
        log::debug!("call {} with {} argument(s)", callable.name.as_deref().unwrap_or("(anonymous)"), args.len());
        let args = args.to_vec();
        let base = self.frames.len();
        self.frames.push(callee.clone());
        self.frames.extend_from_slice(&args);
        let result = (*body)(self, &args);
        self.frames.truncate(base);
        result
    }

    // ── Operators ─────────────────────────────────────────────────────────────

    pub fn binary(&self, op: BinaryOp, a: &Value, b: &Value) -> ModelResult<Value> {
        ops::binary(&self.heap, op, a, b)
    }

    /// `name op= rhs`.  Yields the new value.
    pub fn compound_assign(&mut self, name: &str, op: ArithOp, rhs: &Value) -> ModelResult<Value> {
        let current = self.read(name)?;
        let next = ops::binary(&self.heap, op.into(), &current, rhs)?;
        self.reassign(name, next.clone())?;
        Ok(next)
    }

    /// `++name` / `name++` (and the `--` forms).
    pub fn update(&mut self, name: &str, op: UpdateOp, prefix: bool) -> ModelResult<Value> {
        let current = self.read(name)?;
        let (old, new) = ops::update_value(&self.heap, &current, op)?;
        self.reassign(name, new.clone())?;
        Ok(if prefix { new } else { old })
    }

    pub fn type_of(&self, value: &Value) -> &'static str {
        ops::type_of(&self.heap, value)
    }

    // ── Output ────────────────────────────────────────────────────────────────

    pub fn render(&self, value: &Value) -> String {
        display::render(&self.heap, value, self.render)
    }

    /// Render `values` as one output line.
    pub fn print(&mut self, values: &[Value]) {
        let line = display::render_line(&self.heap, values, self.render);
        self.output.push(line);
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ── Collection ────────────────────────────────────────────────────────────

    /// Free every composite unreachable from a binding or from a call in
    /// progress.  Returns how many were freed.
    pub fn collect_garbage(&mut self) -> usize {
        let freed = self.heap.collect(self.bindings.values().chain(&self.frames));
        log::debug!("collected {freed} composite(s), {} live", self.heap.len());
        freed
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }
}

fn unknown(name: &str) -> BindingError {
    BindingError::UnknownBinding { name: name.to_owned() }
}

fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
