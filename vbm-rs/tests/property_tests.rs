use num_bigint::BigInt;
use proptest::prelude::*;
use vbm::ops::{string_to_number, strict_equals};
use vbm::{BindingError, Model, Mutability, Mutation, Value};

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        (-1e12f64..1e12f64).prop_map(Value::Number),
        any::<bool>().prop_map(Value::Bool),
        "\\PC{0,12}".prop_map(Value::Str),
        any::<i64>().prop_map(|n| Value::BigInt(BigInt::from(n))),
        Just(Value::Null),
        Just(Value::Undefined),
    ]
}

proptest! {
    /// Copying a primitive and rebinding the copy never touches the original.
    #[test]
    fn primitive_copies_are_independent(v in primitive(), w in primitive()) {
        let mut m = Model::new();
        m.bind("a", v.clone(), Mutability::Mutable);
        let copy = m.read("a").unwrap();
        m.bind("b", copy, Mutability::Mutable);
        m.reassign("b", w.clone()).unwrap();
        prop_assert_eq!(m.read("a").unwrap(), v);
        prop_assert_eq!(m.read("b").unwrap(), w);
    }
}

proptest! {
    /// Pushing through one reference is visible through every other.
    #[test]
    fn composite_references_share_storage(
        items in prop::collection::vec(any::<i32>(), 0..20),
        x in any::<i32>(),
    ) {
        let mut m = Model::new();
        let arr = m.array(items.iter().copied().map(Value::from).collect());
        m.bind("a", arr, Mutability::Immutable);
        let alias = m.read("a").unwrap();
        m.bind("b", alias, Mutability::Mutable);
        m.mutate_in_place("b", Mutation::Push(Value::from(x))).unwrap();

        let a = m.read("a").unwrap();
        let len = m.member(&a, "length").unwrap();
        prop_assert_eq!(len, Value::from(items.len() as f64 + 1.0));
        let last = m.member(&a, &items.len().to_string()).unwrap();
        prop_assert_eq!(last, Value::from(x));
    }
}

proptest! {
    /// Rebinding an immutable binding fails whatever the old and new values.
    #[test]
    fn immutable_reassign_always_fails(v in primitive(), w in primitive(), composite in any::<bool>()) {
        let mut m = Model::new();
        let initial = if composite { m.array(vec![v.clone()]) } else { v };
        m.bind("k", initial.clone(), Mutability::Immutable);
        let result = m.reassign("k", w);
        prop_assert_eq!(result, Err(BindingError::ImmutableBindingViolation { name: "k".into() }));
        prop_assert_eq!(m.read("k").unwrap(), initial);
    }
}

proptest! {
    /// In-place mutation ignores the binding's mutability.
    #[test]
    fn immutable_composites_still_mutate(key in "[a-z]{1,8}", v in primitive()) {
        let mut m = Model::new();
        let rec = m.record(Vec::<(String, Value)>::new());
        m.bind("p", rec, Mutability::Immutable);
        let alias = m.read("p").unwrap();
        m.bind("q", alias, Mutability::Mutable);
        m.mutate_in_place("p", Mutation::SetField(key.clone(), v.clone())).unwrap();
        let q = m.read("q").unwrap();
        prop_assert_eq!(m.member(&q, &key).unwrap(), v);
    }
}

proptest! {
    /// Collection frees exactly the composites no binding reaches.
    #[test]
    fn collection_keeps_bound_composites(keep in prop::collection::vec(any::<bool>(), 0..16)) {
        let mut m = Model::new();
        for (i, &bound) in keep.iter().enumerate() {
            let arr = m.array(vec![Value::from(i as f64)]);
            if bound {
                m.bind(format!("v{i}"), arr, Mutability::Mutable);
            }
        }
        let kept = keep.iter().filter(|&&b| b).count();
        prop_assert_eq!(m.collect_garbage(), keep.len() - kept);
        prop_assert_eq!(m.heap().len(), kept);
    }
}

proptest! {
    #[test]
    fn integer_strings_convert_exactly(n in any::<i32>()) {
        prop_assert_eq!(string_to_number(&n.to_string()), f64::from(n));
        prop_assert_eq!(string_to_number(&format!("  {n}\t")), f64::from(n));
    }
}

proptest! {
    #[test]
    fn strict_equality_is_reflexive(v in primitive()) {
        prop_assert!(strict_equals(&v, &v.clone()));
    }
}

proptest! {
    /// Rendering never panics and arrays always print bracketed.
    #[test]
    fn arrays_render_bracketed(items in prop::collection::vec(primitive(), 0..120)) {
        let mut m = Model::new();
        let arr = m.array(items);
        let shown = m.render(&arr);
        prop_assert!(shown.starts_with('['));
        prop_assert!(shown.ends_with(']'));
    }
}
