//! Built-in lessons.
//!
//! Each lesson is a short script expressed as model operations: it declares
//! bindings, mutates and reassigns them, and prints what an interactive
//! console would show.  Errors a lesson expects (rebinding a `const`) are
//! caught and printed; anything else propagates.

use crate::binding::DeclKind;
use crate::error::{BindingError, ModelResult};
use crate::ident::naming_style;
use crate::model::{Model, Mutation};
use crate::ops::{ArithOp, BinaryOp, UpdateOp};
use crate::value::Value;

/// A runnable lesson.
#[derive(Clone, Copy)]
pub struct Lesson {
    pub name: &'static str,
    pub title: &'static str,
    pub run: fn(&mut Model) -> ModelResult<()>,
}

pub const LESSONS: &[Lesson] = &[
    Lesson { name: "variables", title: "Variables", run: variables },
    Lesson { name: "data-types", title: "Data types", run: data_types },
    Lesson { name: "stack-heap", title: "Stack and heap", run: stack_heap },
    Lesson { name: "operators", title: "Operators", run: operators },
];

pub fn find(name: &str) -> Option<&'static Lesson> {
    LESSONS.iter().find(|l| l.name == name)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Print the current value of a binding.
fn show(m: &mut Model, name: &str) -> ModelResult<()> {
    let value = m.read(name)?;
    m.print(&[value]);
    Ok(())
}

fn say(m: &mut Model, text: impl Into<String>) {
    m.print(&[Value::Str(text.into())]);
}

/// Run an operation that must be refused for rebinding a constant, and
/// print the refusal.
fn expect_immutable(m: &mut Model, result: ModelResult<()>) -> ModelResult<()> {
    match result {
        Err(e @ BindingError::ImmutableBindingViolation { .. }) => {
            say(m, format!("caught {e}"));
            Ok(())
        }
        Err(e) => Err(e),
        Ok(()) => Err(BindingError::type_error("constant was rebound")),
    }
}

// ── variables ─────────────────────────────────────────────────────────────────

fn variables(m: &mut Model) -> ModelResult<()> {
    m.declare(DeclKind::Let, "firstName", Some(Value::from("John")))?;
    m.declare(DeclKind::Const, "lastName", Some(Value::from("Doe")))?;
    m.declare(DeclKind::Let, "age", Some(Value::from(30)))?;
    show(m, "age")?;

    for name in ["firstName", "first_name", "FirstName", "firstname"] {
        say(m, format!("{name} = {}", naming_style(name)));
    }

    m.reassign("age", Value::from(31))?;
    show(m, "age")?;

    m.declare(DeclKind::Let, "score", None)?;
    m.reassign("score", Value::from(1))?;
    show(m, "score")?;
    let next = m.binary(ArithOp::Add.into(), &m.read("score")?, &Value::from(1))?;
    m.reassign("score", next)?;
    show(m, "score")?;

    m.declare(DeclKind::Const, "x", Some(Value::from(100)))?;
    let refused = m.reassign("x", Value::from(200));
    expect_immutable(m, refused)?;

    let arr = m.array((1..=4).map(Value::from).collect());
    m.declare(DeclKind::Const, "arr", Some(arr))?;
    m.mutate_in_place("arr", Mutation::Push(Value::from(5)))?;
    show(m, "arr")?;

    let person = m.record([("name", Value::from("Shonjoy"))]);
    m.declare(DeclKind::Const, "person", Some(person))?;
    m.mutate_in_place("person", Mutation::SetField("name".into(), Value::from("Joy")))?;
    m.mutate_in_place("person", Mutation::SetField("email".into(), Value::from("shonjoy@gmail.com")))?;
    show(m, "person")?;

    for name in ["a", "b", "c"] {
        m.declare(DeclKind::Let, name, None)?;
    }
    for (name, n) in [("d", 10), ("e", 20), ("f", 30)] {
        m.declare(DeclKind::Const, name, Some(Value::from(n)))?;
    }
    show(m, "d")?;
    show(m, "a")?;

    m.declare(DeclKind::Const, "christmas_2024", Some(Value::from("12.25.2024")))?;
    show(m, "christmas_2024")?;
    let refused = m.reassign("christmas_2024", Value::from("12.26.2024"));
    expect_immutable(m, refused)?;

    m.declare(DeclKind::Const, "COLOR_GREEN", Some(Value::from("green")))?;
    for name in ["christmas_2024", "COLOR_GREEN"] {
        say(m, format!("{name} = {}", naming_style(name)));
    }
    Ok(())
}

// ── data-types ────────────────────────────────────────────────────────────────

fn data_types(m: &mut Model) -> ModelResult<()> {
    m.declare(DeclKind::Const, "firstName", Some(Value::from("Sara")))?;
    m.declare(DeclKind::Const, "age", Some(Value::from(30)))?;
    m.declare(DeclKind::Const, "temp", Some(Value::from(98.9)))?;
    m.declare(DeclKind::Const, "hasKids", Some(Value::from(true)))?;
    m.declare(DeclKind::Const, "aptNumber", Some(Value::Null))?;
    m.declare(DeclKind::Const, "score", Some(Value::Undefined))?;
    let id = m.symbol(Some("id"));
    m.declare(DeclKind::Const, "id", Some(id))?;
    let n = Value::bigint("9007199254740991").unwrap_or_default();
    m.declare(DeclKind::Const, "n", Some(n))?;

    let numbers = m.array((1..=4).map(Value::from).collect());
    m.declare(DeclKind::Const, "numbers", Some(numbers))?;
    let person = m.record([("name", Value::from("Shonjoy"))]);
    m.declare(DeclKind::Const, "person", Some(person))?;

    let say_hello = m.function(Some("sayHello"), |m, _| {
        say(m, "Hello");
        Ok(Value::Undefined)
    });
    m.declare(DeclKind::Const, "sayHello", Some(say_hello))?;
    m.declare(DeclKind::Const, "output", Some(m.read("sayHello")?))?;
    let output = m.read("output")?;
    let kind = Value::from(m.type_of(&output));
    m.print(&[output, kind]);

    m.declare(DeclKind::Let, "favoriteFruit", Some(Value::from("strawberries")))?;
    m.declare(DeclKind::Let, "favoriteIceCream", Some(Value::from("chocolate")))?;
    m.declare(DeclKind::Let, "favoriteProgrammingLanguage", Some(Value::from("JavaScript")))?;
    m.declare(DeclKind::Let, "numberOfDonuts", Some(Value::from(12)))?;
    m.declare(DeclKind::Let, "pi", Some(Value::from(3.14)))?;
    let large = Value::bigint("54389759347634976346").unwrap_or_default();
    m.declare(DeclKind::Let, "veryLargeNumber", Some(large))?;
    m.declare(DeclKind::Let, "lovesCoding", Some(Value::from(true)))?;
    m.declare(DeclKind::Let, "favoriteColor", None)?;
    show(m, "favoriteColor")?;

    m.reassign("favoriteFruit", Value::Null)?;
    let course = m.record([
        ("name", Value::from("JavaScript for Beginners")),
        ("hours", Value::from(3)),
    ]);
    m.declare(DeclKind::Let, "course", Some(course))?;

    let samples = [
        Value::from(3),
        m.read("favoriteFruit")?,
        Value::bigint("109234532525").unwrap_or_default(),
        Value::from("taco"),
        Value::Null,
    ];
    for v in samples {
        let kind = m.type_of(&v);
        say(m, kind);
    }

    let kind = m.type_of(&m.read("firstName")?);
    say(m, kind);
    let refused = m.reassign("firstName", Value::from(100));
    expect_immutable(m, refused)
}

// ── stack-heap ────────────────────────────────────────────────────────────────

fn stack_heap(m: &mut Model) -> ModelResult<()> {
    m.declare(DeclKind::Const, "name", Some(Value::from("John")))?;
    m.declare(DeclKind::Const, "age", Some(Value::from(30)))?;
    let person = m.record([("name", Value::from("Shonjoy")), ("age", Value::from(40))]);
    m.declare(DeclKind::Const, "person", Some(person))?;

    m.declare(DeclKind::Let, "newName", Some(m.read("name")?))?;
    m.reassign("newName", Value::from("John Doe"))?;

    m.declare(DeclKind::Let, "newPerson", Some(m.read("person")?))?;
    m.mutate_in_place("newPerson", Mutation::SetField("name".into(), Value::from("John Wick")))?;

    let line = [m.read("name")?, m.read("newName")?];
    m.print(&line);
    let line = [m.read("person")?, m.read("newPerson")?];
    m.print(&line);
    Ok(())
}

// ── operators ─────────────────────────────────────────────────────────────────

fn report(m: &mut Model, label: String) -> ModelResult<()> {
    let x = m.read("x")?;
    let shown = m.render(&x);
    say(m, format!("{label} → {shown}"));
    Ok(())
}

fn assign_binary(m: &mut Model, op: BinaryOp, a: Value, b: Value) -> ModelResult<()> {
    let result = m.binary(op, &a, &b)?;
    m.reassign("x", result)?;
    let label = format!("x = {} {op} {}", m.render(&a), m.render(&b));
    report(m, label)
}

fn operators(m: &mut Model) -> ModelResult<()> {
    m.declare(DeclKind::Let, "x", None)?;

    for (op, a, b) in [
        (ArithOp::Add, 5, 5),
        (ArithOp::Sub, 5, 5),
        (ArithOp::Mul, 5, 5),
        (ArithOp::Div, 5, 5),
        (ArithOp::Rem, 7, 5),
    ] {
        assign_binary(m, op.into(), Value::from(a), Value::from(b))?;
    }

    let hello = m.binary(ArithOp::Add.into(), &Value::from("Hello"), &Value::from(" "))?;
    let hello = m.binary(ArithOp::Add.into(), &hello, &Value::from("World"))?;
    m.reassign("x", hello)?;
    report(m, "x = 'Hello' + ' ' + 'World'".to_owned())?;

    assign_binary(m, ArithOp::Pow.into(), Value::from(2), Value::from(3))?;

    m.reassign("x", Value::from(1))?;
    let old = m.update("x", UpdateOp::Increment, false)?;
    let label = format!("x++ yields {}, x", m.render(&old));
    report(m, label)?;
    let old = m.update("x", UpdateOp::Decrement, false)?;
    let label = format!("x-- yields {}, x", m.render(&old));
    report(m, label)?;

    m.reassign("x", Value::from(10))?;
    for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div, ArithOp::Rem, ArithOp::Pow] {
        m.compound_assign("x", op, &Value::from(5))?;
        report(m, format!("x {}= 5", op.symbol()))?;
    }

    let comparisons = [
        (BinaryOp::LooseEq, Value::from(2), Value::from("2")),
        (BinaryOp::StrictEq, Value::from(2), Value::from("2")),
        (BinaryOp::LooseNe, Value::from(2), Value::from("2")),
        (BinaryOp::StrictNe, Value::from(2), Value::from(2)),
        (BinaryOp::Gt, Value::from(10), Value::from(5)),
        (BinaryOp::Lt, Value::from(10), Value::from(5)),
        (BinaryOp::Le, Value::from(10), Value::from(5)),
        (BinaryOp::Ge, Value::from(10), Value::from(5)),
    ];
    for (op, a, b) in comparisons {
        assign_binary(m, op, a, b)?;
    }

    show(m, "x")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str) -> Vec<String> {
        let lesson = find(name).unwrap();
        let mut m = Model::new();
        (lesson.run)(&mut m).unwrap();
        m.take_output()
    }

    #[test]
    fn catalog() {
        let names: Vec<_> = LESSONS.iter().map(|l| l.name).collect();
        assert_eq!(names, ["variables", "data-types", "stack-heap", "operators"]);
        assert!(find("closures").is_none());
    }

    #[test]
    fn variables_output() {
        let out = run("variables");
        assert_eq!(
            out,
            [
                "30",
                "firstName = camelCase",
                "first_name = snake_case",
                "FirstName = PascalCase",
                "firstname = lowercase",
                "31",
                "1",
                "2",
                "caught TypeError: Assignment to constant variable 'x'.",
                "[ 1, 2, 3, 4, 5 ]",
                "{ name: 'Joy', email: 'shonjoy@gmail.com' }",
                "10",
                "undefined",
                "12.25.2024",
                "caught TypeError: Assignment to constant variable 'christmas_2024'.",
                "christmas_2024 = snake_case",
                "COLOR_GREEN = SCREAMING_SNAKE_CASE",
            ]
        );
    }

    #[test]
    fn data_types_output() {
        let out = run("data-types");
        assert_eq!(
            out,
            [
                "[Function: sayHello] function",
                "undefined",
                "number",
                "object",
                "bigint",
                "string",
                "object",
                "string",
                "caught TypeError: Assignment to constant variable 'firstName'.",
            ]
        );
    }

    #[test]
    fn stack_heap_output() {
        assert_eq!(
            run("stack-heap"),
            [
                "John John Doe",
                "{ name: 'John Wick', age: 40 } { name: 'John Wick', age: 40 }",
            ]
        );
    }

    #[test]
    fn operators_output() {
        let out = run("operators");
        assert_eq!(out.first().map(String::as_str), Some("x = 5 + 5 → 10"));
        assert!(out.contains(&"x = 7 % 5 → 2".to_owned()));
        assert!(out.contains(&"x = 'Hello' + ' ' + 'World' → 'Hello World'".to_owned()));
        assert!(out.contains(&"x = 2 ** 3 → 8".to_owned()));
        assert!(out.contains(&"x++ yields 1, x → 2".to_owned()));
        assert!(out.contains(&"x-- yields 2, x → 1".to_owned()));
        assert!(out.contains(&"x *= 5 → 50".to_owned()));
        assert!(out.contains(&"x **= 5 → 0".to_owned()));
        assert!(out.contains(&"x = 2 == '2' → true".to_owned()));
        assert!(out.contains(&"x = 2 === '2' → false".to_owned()));
        assert!(out.contains(&"x = 2 !== 2 → false".to_owned()));
        assert!(out.contains(&"x = 10 <= 5 → false".to_owned()));
        assert_eq!(out.last().map(String::as_str), Some("true"));
    }
}
