//! Shared test helpers for integration tests
#![allow(dead_code)]

use quicksilver_arrays::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Install a tracing subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine with the dense fast paths enabled
pub fn engine() -> ArrayEngine {
    init_tracing();
    ArrayEngine::default()
}

/// Engine that always takes the generic protocol path
pub fn generic_engine() -> ArrayEngine {
    init_tracing();
    ArrayEngine::new(EngineConfig::generic_only())
}

/// Both engines, labelled for assertion messages
pub fn engines() -> Vec<(&'static str, ArrayEngine)> {
    vec![("fast", engine()), ("generic", generic_engine())]
}

/// Call a routine and unwrap the result
pub fn call(engine: &ArrayEngine, name: &str, this: &Value, args: &[Value]) -> Value {
    engine
        .call(name, this, args)
        .unwrap_or_else(|e| panic!("{} failed: {}", name, e))
}

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

/// Hole-free array of numbers
pub fn numbers(values: &[f64]) -> Value {
    Value::new_array(values.iter().copied().map(Value::Number).collect())
}

/// Expected slots of a hole-free array of numbers
pub fn number_slots(values: &[f64]) -> Vec<Option<Value>> {
    values.iter().copied().map(|n| Some(Value::Number(n))).collect()
}

/// Slots of an array value, holes as `None`
pub fn elements(value: &Value) -> Vec<Option<Value>> {
    array_elements(value).expect("not an array")
}

/// Object reference behind a value
pub fn obj(value: &Value) -> ObjectRef {
    value.as_object().cloned().expect("not an object")
}

/// Define an own property directly, bypassing the protocol
pub fn set_prop(target: &Value, key: &str, value: Value) {
    obj(target).borrow_mut().properties.insert(key.to_string(), value);
}

/// Array-like ordinary object with the given elements and length
pub fn array_like(length: u32, items: &[(u32, Value)]) -> Value {
    let object = Value::new_object();
    set_prop(&object, "length", Value::Number(length as f64));
    for (index, value) in items {
        set_prop(&object, &index.to_string(), value.clone());
    }
    object
}

pub fn native<F>(name: &str, f: F) -> Value
where
    F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
{
    Value::new_native_function(name, f)
}

/// Numeric comparator `(a, b) => a - b`
pub fn ascending() -> Value {
    native("ascending", |_, args| Ok(Value::Number(args[0].to_number() - args[1].to_number())))
}

/// Shared log of observed operations
pub type Log = Rc<RefCell<Vec<String>>>;

fn forward_set(target: &ObjectRef, key: &str, value: Value) -> Result<bool> {
    match key.parse::<u32>() {
        Ok(index) => target.put_by_index(index, value, false),
        Err(_) if key == "length" => target.set_length(value.to_length()).map(|_| true),
        Err(_) => {
            target.borrow_mut().properties.insert(key.to_string(), value);
            Ok(true)
        }
    }
}

/// Proxy over `target` whose `get`, `set`, `has` and `deleteProperty` traps
/// record each operation before forwarding it
pub fn logging_proxy(target: &Value) -> (Value, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let handler = Value::new_object();

    let get_log = Rc::clone(&log);
    set_prop(
        &handler,
        "get",
        native("get", move |_, args| {
            let key = args[1].to_js_string();
            get_log.borrow_mut().push(format!("get {}", key));
            obj(&args[0]).get_named(&key)
        }),
    );

    let set_log = Rc::clone(&log);
    set_prop(
        &handler,
        "set",
        native("set", move |_, args| {
            let key = args[1].to_js_string();
            set_log.borrow_mut().push(format!("set {}={}", key, args[2]));
            forward_set(&obj(&args[0]), &key, args[2].clone()).map(Value::Boolean)
        }),
    );

    let has_log = Rc::clone(&log);
    set_prop(
        &handler,
        "has",
        native("has", move |_, args| {
            let key = args[1].to_js_string();
            has_log.borrow_mut().push(format!("has {}", key));
            let target = obj(&args[0]);
            let present = match key.parse::<u32>() {
                Ok(index) => target.has_property(index)?,
                Err(_) => target.borrow().properties.contains_key(&key),
            };
            Ok(Value::Boolean(present))
        }),
    );

    let delete_log = Rc::clone(&log);
    set_prop(
        &handler,
        "deleteProperty",
        native("deleteProperty", move |_, args| {
            let key = args[1].to_js_string();
            delete_log.borrow_mut().push(format!("delete {}", key));
            let target = obj(&args[0]);
            let deleted = match key.parse::<u32>() {
                Ok(index) => target.delete_by_index(index, false)?,
                Err(_) => {
                    target.borrow_mut().properties.remove(&key);
                    true
                }
            };
            Ok(Value::Boolean(deleted))
        }),
    );

    let proxy = Value::new_proxy(target, &handler).expect("proxy");
    (proxy, log)
}

/// Take the recorded operations, leaving the log empty
pub fn drain(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Make an object non-extensible
pub fn freeze_shape(value: &Value) {
    obj(value).prevent_extensions().expect("preventExtensions");
}
