//! Composite storage.
//!
//! Arrays, records and callables live in a generational arena and are
//! addressed by [`ObjectId`].  Bindings store the id, never the composite, so
//! any number of bindings can share (and mutate) one composite.  Freed slots
//! are reused with a bumped generation; an id from before the reuse no longer
//! resolves.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::ModelResult;
use crate::model::Model;
use crate::value::{Kind, Value};

// ── Ids ───────────────────────────────────────────────────────────────────────

/// Opaque reference to a composite in a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: usize,
    generation: u32,
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

// ── Composites ────────────────────────────────────────────────────────────────

/// Native body of a callable.  Arguments arrive already bound by the
/// copy/reference rule: primitives are copies, composites are references.
pub type NativeFn = Rc<dyn Fn(&mut Model, &[Value]) -> ModelResult<Value>>;

/// A callable unit.
#[derive(Clone)]
pub struct Callable {
    pub name: Option<String>,
    pub(crate) body: NativeFn,
}

impl Callable {
    pub fn new(
        name: Option<String>,
        body: impl Fn(&mut Model, &[Value]) -> ModelResult<Value> + 'static,
    ) -> Self {
        Callable { name, body: Rc::new(body) }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A mutable value stored in the heap.
#[derive(Debug, Clone)]
pub enum Composite {
    Array(Vec<Value>),
    /// Fields keep insertion order.
    Record(IndexMap<String, Value>),
    Callable(Callable),
}

impl Composite {
    pub fn kind(&self) -> Kind {
        match self {
            Composite::Array(_) => Kind::Array,
            Composite::Record(_) => Kind::Record,
            Composite::Callable(_) => Kind::Callable,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Composite::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Composite::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Composite::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Values directly referenced by this composite.
    fn children(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Composite::Array(items) => Box::new(items.iter()),
            Composite::Record(fields) => Box::new(fields.values()),
            Composite::Callable(_) => Box::new(std::iter::empty()),
        }
    }
}

// ── Heap ──────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<Composite>,
}

/// Generational arena of composites.
#[derive(Debug, Default)]
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a composite and return a reference to it.
    pub fn alloc(&mut self, object: Composite) -> ObjectId {
        self.live += 1;
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.object = Some(object);
            ObjectId { index, generation: slot.generation }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot { generation: 0, object: Some(object) });
            ObjectId { index, generation: 0 }
        };
        log::trace!("alloc {id}");
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Composite> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Composite> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.object.as_mut())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Kind of any value, looking composites up in this heap.
    ///
    /// A dangling reference reports [`Kind::Undefined`].
    pub fn kind_of(&self, value: &Value) -> Kind {
        match value {
            Value::Ref(id) => self.get(*id).map_or(Kind::Undefined, Composite::kind),
            other => other.primitive_kind().unwrap_or(Kind::Undefined),
        }
    }

    /// Number of live composites.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Free every composite not reachable from `roots`.  Returns the number
    /// of composites freed.
    pub fn collect<'a>(&mut self, roots: impl IntoIterator<Item = &'a Value>) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut pending: Vec<ObjectId> = roots.into_iter().filter_map(Value::object_id).collect();

        while let Some(id) = pending.pop() {
            let Some(object) = self.get(id) else { continue };
            let seen = &mut marked[id.index];
            if *seen {
                continue;
            }
            *seen = true;
            pending.extend(object.children().filter_map(Value::object_id));
        }

        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.object.is_some() && !marked[index] {
                slot.object = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
                freed += 1;
            }
        }
        self.live -= freed;
        freed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
