//! Species construction of result arrays

mod common;
use common::*;
use pretty_assertions::assert_eq;
use quicksilver_arrays::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Attach `constructor = { @@species: species }` to `arr`
fn with_species(arr: &Value, species: Value) {
    let ctor = Value::new_object();
    set_prop(&ctor, SPECIES_KEY, species);
    set_prop(arr, "constructor", ctor);
}

/// A species constructor producing tagged arrays and recording length hints
fn tagging_species() -> (Value, Rc<RefCell<Vec<f64>>>) {
    let hints = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&hints);
    let species = Value::new_constructor("Tagged", move |_, args| {
        record.borrow_mut().push(args[0].to_number());
        let result = Value::new_array(vec![]);
        set_prop(&result, "tag", Value::from("tagged"));
        Ok(result)
    });
    (species, hints)
}

fn tag_of(value: &Value) -> Value {
    obj(value).get_named("tag").unwrap()
}

#[test]
fn test_species_used_by_every_creating_routine() {
    for (label, engine) in engines() {
        let arr = numbers(&[1.0, 2.0, 3.0, 4.0]);
        let (species, hints) = tagging_species();
        with_species(&arr, species);
        let keep_all = native("keepAll", |_, _| Ok(Value::Boolean(true)));
        let double = native("double", |_, args| Ok(num(args[0].to_number() * 2.0)));

        let mapped = call(&engine, "map", &arr, &[double]);
        assert_eq!(tag_of(&mapped), Value::from("tagged"), "{}", label);
        assert_eq!(elements(&mapped), number_slots(&[2.0, 4.0, 6.0, 8.0]), "{}", label);

        let filtered = call(&engine, "filter", &arr, &[keep_all]);
        assert_eq!(tag_of(&filtered), Value::from("tagged"), "{}", label);
        assert_eq!(elements(&filtered), number_slots(&[1.0, 2.0, 3.0, 4.0]), "{}", label);

        let sliced = call(&engine, "slice", &arr, &[num(1.0), num(3.0)]);
        assert_eq!(tag_of(&sliced), Value::from("tagged"), "{}", label);
        assert_eq!(elements(&sliced), number_slots(&[2.0, 3.0]), "{}", label);

        let concatenated = call(&engine, "concat", &arr, &[num(5.0)]);
        assert_eq!(tag_of(&concatenated), Value::from("tagged"), "{}", label);
        assert_eq!(elements(&concatenated), number_slots(&[1.0, 2.0, 3.0, 4.0, 5.0]), "{}", label);

        let removed = call(&engine, "splice", &arr, &[num(0.0), num(1.0)]);
        assert_eq!(tag_of(&removed), Value::from("tagged"), "{}", label);
        assert_eq!(elements(&removed), number_slots(&[1.0]), "{}", label);

        assert_eq!(*hints.borrow(), vec![4.0, 0.0, 2.0, 0.0, 1.0], "{}", label);
    }
}

#[test]
fn test_null_species_means_plain_array() {
    let engine = engine();
    let arr = numbers(&[1.0]);
    with_species(&arr, Value::Null);
    let sliced = call(&engine, "slice", &arr, &[]);
    assert_eq!(tag_of(&sliced), Value::Undefined);
    assert_eq!(elements(&sliced), number_slots(&[1.0]));
}

#[test]
fn test_non_constructor_species_is_type_error() {
    let engine = engine();
    let arr = numbers(&[1.0]);
    with_species(&arr, native("plain", |_, _| Ok(Value::new_array(vec![]))));
    let err = engine.call("slice", &arr, &[]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    assert!(err.to_string().contains("is not a constructor"));
}

#[test]
fn test_huge_sparse_array_species_is_type_error() {
    for (label, engine) in engines() {
        let arr = numbers(&[1.0, 2.0]);
        with_species(&arr, Value::new_sparse_array(u32::MAX - 1, vec![]));
        let keep_all = native("keepAll", |_, _| Ok(Value::Boolean(true)));
        let cases: Vec<(&str, Vec<Value>)> = vec![
            ("slice", vec![]),
            ("map", vec![ascending()]),
            ("filter", vec![keep_all]),
            ("splice", vec![num(0.0)]),
            ("concat", vec![]),
        ];
        for (name, args) in cases {
            let err = engine.call(name, &arr, &args).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::TypeError), "{} {}", label, name);
            assert!(
                err.to_string().contains("'[object Array]' is not a constructor"),
                "{} {}: {}",
                label,
                name,
                err
            );
        }
        assert_eq!(elements(&arr), number_slots(&[1.0, 2.0]), "{}", label);
    }
}

#[test]
fn test_primitive_constructor_is_type_error() {
    let engine = engine();
    let arr = numbers(&[1.0]);
    set_prop(&arr, "constructor", num(1.0));
    let err = engine.call("map", &arr, &[ascending()]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::TypeError));
}

#[test]
fn test_species_must_return_object() {
    let engine = engine();
    let arr = numbers(&[1.0]);
    with_species(&arr, Value::new_constructor("Bad", |_, _| Ok(num(0.0))));
    let err = engine.call("filter", &arr, &[ascending()]).unwrap_err();
    assert!(err.to_string().contains("did not return an object"));
}

#[test]
fn test_non_extensible_species_result_rejects_writes() {
    for (label, engine) in engines() {
        let arr = numbers(&[1.0]);
        with_species(
            &arr,
            Value::new_constructor("Frozen", |_, _| {
                let result = Value::new_array(vec![]);
                freeze_shape(&result);
                Ok(result)
            }),
        );
        let identity = native("identity", |_, args| Ok(args[0].clone()));
        let err = engine.call("map", &arr, &[identity]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError), "{}", label);
    }
}

#[test]
fn test_array_like_species_result() {
    let engine = engine();
    let arr = numbers(&[1.0, 2.0, 3.0]);
    with_species(&arr, Value::new_constructor("Plain", |_, _| Ok(Value::new_object())));
    let sliced = call(&engine, "slice", &arr, &[num(1.0)]);
    let o = obj(&sliced);
    assert_eq!(o.get_named("length").unwrap(), num(2.0));
    assert_eq!(o.get_by_index(0).unwrap(), num(2.0));
    assert_eq!(o.get_by_index(1).unwrap(), num(3.0));
}

#[test]
fn test_array_like_source_ignores_constructor() {
    let engine = engine();
    let object = array_like(2, &[(0, num(1.0)), (1, num(2.0))]);
    let (species, hints) = tagging_species();
    with_species(&object, species);
    let sliced = call(&engine, "slice", &object, &[]);
    assert_eq!(tag_of(&sliced), Value::Undefined);
    assert_eq!(elements(&sliced), number_slots(&[1.0, 2.0]));
    assert!(hints.borrow().is_empty());
}

#[test]
fn test_species_returning_source_does_not_alias_buffers() {
    let engine = engine();
    let arr = numbers(&[1.0, 2.0, 3.0]);
    let source = arr.clone();
    with_species(&arr, Value::new_constructor("Same", move |_, _| Ok(source.clone())));
    let removed = engine.call("splice", &arr, &[num(0.0), num(1.0)]).unwrap();
    assert!(removed.strict_equals(&arr));
    let sliced = engine.call("slice", &arr, &[]).unwrap();
    assert!(sliced.strict_equals(&arr));
}
