//! Operators and coercions.
//!
//! Arithmetic, concatenation, equality and relational comparison over
//! [`Value`]s.  Composites take part through their string form, which is why
//! most functions here need the [`Heap`].  Assignment forms (`+=`, `++`) live
//! on the model so they go through `reassign`.

use std::cmp::Ordering;
use std::fmt;
use std::mem::discriminant;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use crate::display::format_number;
use crate::error::{BindingError, ModelResult};
use crate::heap::{Composite, Heap, ObjectId};
use crate::value::Value;

// ── Operator enums ────────────────────────────────────────────────────────────

/// Arithmetic operators; also the operators allowed in compound assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl ArithOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
            ArithOp::Pow => "**",
        }
    }
}

/// Every binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Arith(ArithOp),
    /// `==`
    LooseEq,
    /// `!=`
    LooseNe,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Arith(op) => op.symbol(),
            BinaryOp::LooseEq => "==",
            BinaryOp::LooseNe => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

impl From<ArithOp> for BinaryOp {
    fn from(op: ArithOp) -> Self {
        BinaryOp::Arith(op)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `++` / `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Apply a binary operator.
pub fn binary(heap: &Heap, op: BinaryOp, a: &Value, b: &Value) -> ModelResult<Value> {
    let result = match op {
        BinaryOp::Arith(ArithOp::Add) => return add(heap, a, b),
        BinaryOp::Arith(op) => {
            return numeric_op(op, to_numeric(heap, a)?, to_numeric(heap, b)?);
        }
        BinaryOp::LooseEq => loose_equals(heap, a, b)?,
        BinaryOp::LooseNe => !loose_equals(heap, a, b)?,
        BinaryOp::StrictEq => strict_equals(a, b),
        BinaryOp::StrictNe => !strict_equals(a, b),
        BinaryOp::Lt => matches!(compare(heap, a, b)?, Some(Ordering::Less)),
        BinaryOp::Gt => matches!(compare(heap, a, b)?, Some(Ordering::Greater)),
        BinaryOp::Le => matches!(compare(heap, a, b)?, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Ge => matches!(compare(heap, a, b)?, Some(Ordering::Greater | Ordering::Equal)),
    };
    Ok(Value::Bool(result))
}

/// `typeof value`.
pub fn type_of(heap: &Heap, value: &Value) -> &'static str {
    heap.kind_of(value).type_of()
}

/// Numeric step for `++`/`--`.  Returns `(old, new)`, where `old` is the
/// operand converted to a number (what postfix forms yield).
pub fn update_value(heap: &Heap, value: &Value, op: UpdateOp) -> ModelResult<(Value, Value)> {
    let old = to_numeric(heap, value)?;
    let new = match (&old, op) {
        (Numeric::Number(x), UpdateOp::Increment) => Value::Number(x + 1.0),
        (Numeric::Number(x), UpdateOp::Decrement) => Value::Number(x - 1.0),
        (Numeric::BigInt(n), UpdateOp::Increment) => Value::BigInt(n + 1u32),
        (Numeric::BigInt(n), UpdateOp::Decrement) => Value::BigInt(n - 1u32),
    };
    Ok((old.into_value(), new))
}

/// `===`: same kind and same value; composites and symbols by identity.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Ref(x), Value::Ref(y)) => x == y,
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        _ => false,
    }
}

/// `==`: equality after the language's coercions.
pub fn loose_equals(heap: &Heap, a: &Value, b: &Value) -> ModelResult<bool> {
    if discriminant(a) == discriminant(b) {
        return Ok(strict_equals(a, b));
    }
    Ok(match (a, b) {
        (x, y) if x.is_nullish() && y.is_nullish() => true,
        (x, y) if x.is_nullish() || y.is_nullish() => false,
        (Value::Number(x), Value::Str(s)) | (Value::Str(s), Value::Number(x)) => {
            *x == string_to_number(s)
        }
        (Value::BigInt(n), Value::Str(s)) | (Value::Str(s), Value::BigInt(n)) => {
            string_to_bigint(s).is_some_and(|m| m == *n)
        }
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => {
            return loose_equals(heap, &Value::Number(f64::from(u8::from(*flag))), other);
        }
        (Value::Ref(_), p) => return loose_equals(heap, &to_primitive(heap, a)?, p),
        (p, Value::Ref(_)) => return loose_equals(heap, p, &to_primitive(heap, b)?),
        (Value::BigInt(n), Value::Number(x)) | (Value::Number(x), Value::BigInt(n)) => {
            compare_bigint_f64(n, *x) == Some(Ordering::Equal)
        }
        _ => false,
    })
}

/// Relational comparison.  `None` means the operands are unordered (a
/// `NaN` was involved, or a string did not parse as a BigInt); every
/// relational operator is then `false`.
pub fn compare(heap: &Heap, a: &Value, b: &Value) -> ModelResult<Option<Ordering>> {
    let pa = to_primitive(heap, a)?;
    let pb = to_primitive(heap, b)?;
    match (&pa, &pb) {
        (Value::Str(x), Value::Str(y)) => return Ok(Some(x.encode_utf16().cmp(y.encode_utf16()))),
        (Value::BigInt(n), Value::Str(s)) => return Ok(string_to_bigint(s).map(|m| n.cmp(&m))),
        (Value::Str(s), Value::BigInt(n)) => return Ok(string_to_bigint(s).map(|m| m.cmp(n))),
        _ => {}
    }
    Ok(match (to_numeric(heap, &pa)?, to_numeric(heap, &pb)?) {
        (Numeric::Number(x), Numeric::Number(y)) => x.partial_cmp(&y),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => Some(x.cmp(&y)),
        (Numeric::BigInt(n), Numeric::Number(x)) => compare_bigint_f64(&n, x),
        (Numeric::Number(x), Numeric::BigInt(n)) => compare_bigint_f64(&n, x).map(Ordering::reverse),
    })
}

/// String form of a value, as concatenation sees it.
pub fn to_string(heap: &Heap, value: &Value) -> ModelResult<String> {
    string_form(heap, value, &mut Vec::new())
}

// ── Coercions ─────────────────────────────────────────────────────────────────

enum Numeric {
    Number(f64),
    BigInt(BigInt),
}

impl Numeric {
    fn into_value(self) -> Value {
        match self {
            Numeric::Number(x) => Value::Number(x),
            Numeric::BigInt(n) => Value::BigInt(n),
        }
    }
}

/// Composites become their string form; primitives pass through.
fn to_primitive(heap: &Heap, value: &Value) -> ModelResult<Value> {
    match value {
        Value::Ref(_) => to_string(heap, value).map(Value::Str),
        other => Ok(other.clone()),
    }
}

fn to_numeric(heap: &Heap, value: &Value) -> ModelResult<Numeric> {
    Ok(match to_primitive(heap, value)? {
        Value::Undefined | Value::Ref(_) => Numeric::Number(f64::NAN),
        Value::Null => Numeric::Number(0.0),
        Value::Bool(b) => Numeric::Number(f64::from(u8::from(b))),
        Value::Number(x) => Numeric::Number(x),
        Value::BigInt(n) => Numeric::BigInt(n),
        Value::Str(s) => Numeric::Number(string_to_number(&s)),
        Value::Symbol(_) => {
            return Err(BindingError::type_error("Cannot convert a Symbol value to a number"))
        }
    })
}

fn string_form(heap: &Heap, value: &Value, seen: &mut Vec<ObjectId>) -> ModelResult<String> {
    Ok(match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(x) => format_number(*x),
        Value::BigInt(n) => n.to_string(),
        Value::Str(s) => s.clone(),
        Value::Symbol(_) => {
            return Err(BindingError::type_error("Cannot convert a Symbol value to a string"))
        }
        Value::Ref(id) => match heap.get(*id) {
            None => "undefined".to_owned(),
            // A cyclic array joins to the empty string at the cycle.
            Some(Composite::Array(_)) if seen.contains(id) => String::new(),
            Some(Composite::Array(items)) => {
                seen.push(*id);
                let parts = items
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            Ok(String::new())
                        } else {
                            string_form(heap, item, seen)
                        }
                    })
                    .collect::<ModelResult<Vec<_>>>();
                seen.pop();
                parts?.join(",")
            }
            Some(Composite::Record(_)) => "[object Object]".to_owned(),
            Some(Composite::Callable(c)) => {
                format!("function {}() {{ [native code] }}", c.name.as_deref().unwrap_or(""))
            }
        },
    })
}

/// `Number(s)`: whitespace-trimmed decimal, `Infinity`, or `0x`/`0o`/`0b`
/// integer; anything else is `NaN`.  The empty string is `0`.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_prefixed(t) {
        return n.to_f64().unwrap_or(f64::INFINITY);
    }
    if !t.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

/// `BigInt(s)` for comparisons: optional sign and decimal digits, or a
/// radix-prefixed integer.  `None` where the conversion would throw.
fn string_to_bigint(s: &str) -> Option<BigInt> {
    let t = s.trim();
    if t.is_empty() {
        return Some(BigInt::zero());
    }
    if let Some(n) = parse_radix_prefixed(t) {
        return Some(n);
    }
    let digits = t.strip_prefix(['+', '-']).unwrap_or(t);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

fn parse_radix_prefixed(t: &str) -> Option<BigInt> {
    let (digits, radix) = match t.get(..2)? {
        "0x" | "0X" => (&t[2..], 16),
        "0o" | "0O" => (&t[2..], 8),
        "0b" | "0B" => (&t[2..], 2),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

fn compare_bigint_f64(n: &BigInt, x: f64) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if x.is_infinite() {
        return Some(if x > 0.0 { Ordering::Less } else { Ordering::Greater });
    }
    let floor = x.floor();
    let whole = BigInt::from_f64(floor)?;
    match n.cmp(&whole) {
        Ordering::Equal if x > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

fn add(heap: &Heap, a: &Value, b: &Value) -> ModelResult<Value> {
    let pa = to_primitive(heap, a)?;
    let pb = to_primitive(heap, b)?;
    if matches!(pa, Value::Str(_)) || matches!(pb, Value::Str(_)) {
        let mut out = to_string(heap, &pa)?;
        out.push_str(&to_string(heap, &pb)?);
        return Ok(Value::Str(out));
    }
    numeric_op(ArithOp::Add, to_numeric(heap, &pa)?, to_numeric(heap, &pb)?)
}

fn numeric_op(op: ArithOp, x: Numeric, y: Numeric) -> ModelResult<Value> {
    match (x, y) {
        (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(float_op(op, x, y))),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => bigint_op(op, x, y).map(Value::BigInt),
        _ => Err(BindingError::type_error(
            "Cannot mix BigInt and other types, use explicit conversions",
        )),
    }
}

fn float_op(op: ArithOp, x: f64, y: f64) -> f64 {
    match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
        ArithOp::Rem => x % y,
        ArithOp::Pow if y.is_nan() => f64::NAN,
        ArithOp::Pow if x.abs() == 1.0 && y.is_infinite() => f64::NAN,
        ArithOp::Pow => x.powf(y),
    }
}

fn bigint_op(op: ArithOp, x: BigInt, y: BigInt) -> ModelResult<BigInt> {
    Ok(match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div | ArithOp::Rem if y.is_zero() => {
            return Err(BindingError::range_error("Division by zero"))
        }
        ArithOp::Div => x / y,
        ArithOp::Rem => x % y,
        ArithOp::Pow if y.is_negative() => {
            return Err(BindingError::range_error("Exponent must be non-negative"))
        }
        ArithOp::Pow => bigint_pow(x, y)?,
    })
}

/// Largest BigInt a `**` may produce, in bits.
const MAX_BIGINT_BITS: u64 = 1 << 30;

fn bigint_pow(base: BigInt, exp: BigInt) -> ModelResult<BigInt> {
    if exp.is_zero() || base.is_one() {
        return Ok(BigInt::one());
    }
    if base.is_zero() {
        return Ok(base);
    }
    if base == -BigInt::one() {
        let odd = !(&exp % 2u32).is_zero();
        return Ok(if odd { base } else { BigInt::one() });
    }
    let exp = exp
        .to_u32()
        .filter(|&e| base.bits().saturating_mul(u64::from(e)) <= MAX_BIGINT_BITS)
        .ok_or_else(|| BindingError::range_error("Maximum BigInt size exceeded"))?;
    Ok(base.pow(exp))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
