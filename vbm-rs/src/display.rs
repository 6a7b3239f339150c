//! Console-style rendering of values.
//!
//! [`render`] shows a value the way an interactive console inspects it:
//! strings quoted, composites expanded up to a depth, cycles cut.
//! [`render_line`] is what `print` emits: top-level strings appear raw and
//! arguments are joined by a single space.

use crate::heap::{Composite, Heap, ObjectId};
use crate::ident::is_identifier_name;
use crate::value::Value;

/// Arrays longer than this are elided.
pub const MAX_ARRAY_ITEMS: usize = 100;

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Nesting level past which non-empty composites collapse to
    /// `[Array]` / `[Object]`.
    pub depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { depth: 2 }
    }
}

/// Render a number the way the language's `String(n)` does.
///
/// Exponent notation is used at or above `1e21` and below `1e-6`; both
/// zeroes print as `0`.
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if x == 0.0 {
        return "0".to_owned();
    }
    let abs = x.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{x}");
    }
    let exp = format!("{x:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Quote a string for display inside a rendered value.
pub fn quote(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Render one value in inspected form.
pub fn render(heap: &Heap, value: &Value, opts: RenderOptions) -> String {
    Renderer { heap, opts, in_progress: Vec::new() }.value(value, 0)
}

/// Render the arguments of one `print` call.
pub fn render_line(heap: &Heap, values: &[Value], opts: RenderOptions) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::Str(s) => s.clone(),
            other => render(heap, other, opts),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Renderer ──────────────────────────────────────────────────────────────────

struct Renderer<'h> {
    heap: &'h Heap,
    opts: RenderOptions,
    /// Composites currently being expanded, for cycle detection.
    in_progress: Vec<ObjectId>,
}

impl Renderer<'_> {
    fn value(&mut self, value: &Value, level: usize) -> String {
        match value {
            Value::Undefined => "undefined".to_owned(),
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(x) if *x == 0.0 && x.is_sign_negative() => "-0".to_owned(),
            Value::Number(x) => format_number(*x),
            Value::BigInt(n) => format!("{n}n"),
            Value::Str(s) => quote(s),
            Value::Symbol(sym) => format!("Symbol({})", sym.description().unwrap_or("")),
            Value::Ref(id) => self.composite(*id, level),
        }
    }

    fn composite(&mut self, id: ObjectId, level: usize) -> String {
        let heap = self.heap;
        let Some(object) = heap.get(id) else {
            return "undefined".to_owned();
        };

        match object {
            Composite::Callable(c) => match &c.name {
                Some(name) => format!("[Function: {name}]"),
                None => "[Function (anonymous)]".to_owned(),
            },
            _ if self.in_progress.contains(&id) => "[Circular]".to_owned(),
            Composite::Array(items) if items.is_empty() => "[]".to_owned(),
            Composite::Record(fields) if fields.is_empty() => "{}".to_owned(),
            Composite::Array(_) if level > self.opts.depth => "[Array]".to_owned(),
            Composite::Record(_) if level > self.opts.depth => "[Object]".to_owned(),
            Composite::Array(items) => {
                self.in_progress.push(id);
                let mut parts: Vec<String> = items
                    .iter()
                    .take(MAX_ARRAY_ITEMS)
                    .map(|item| self.value(item, level + 1))
                    .collect();
                self.in_progress.pop();
                match items.len().saturating_sub(MAX_ARRAY_ITEMS) {
                    0 => {}
                    1 => parts.push("... 1 more item".to_owned()),
                    n => parts.push(format!("... {n} more items")),
                }
                format!("[ {} ]", parts.join(", "))
            }
            Composite::Record(fields) => {
                self.in_progress.push(id);
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(key, v)| {
                        let key = if is_identifier_name(key) { key.clone() } else { quote(key) };
                        format!("{key}: {}", self.value(v, level + 1))
                    })
                    .collect();
                self.in_progress.pop();
                format!("{{ {} }}", parts.join(", "))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
