//! Expansion tests for `#[derive(Record)]`

use std::collections::HashMap;

use envbind::{Field, Record, Slot};

fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Default, Record)]
struct Wrapper<T: Field> {
    #[env("VALUE")]
    value: T,
}

#[test]
fn test_generic_record() {
    let src = source(&[("VALUE", "42")]);

    let mut wrapper = Wrapper::<u32>::default();
    envbind::load_with(&src, &mut wrapper).unwrap();
    assert_eq!(wrapper.value, 42);

    let mut wrapper = Wrapper::<String>::default();
    envbind::load_with(&src, &mut wrapper).unwrap();
    assert_eq!(wrapper.value, "42");
}

#[derive(Debug, Default, Record)]
struct Limits {
    #[env("MAX_CONN")]
    max_connections: u32,
}

#[derive(Debug, Default, Record)]
struct Server {
    #[env("HOST")]
    host: String,
    limits: Limits,
    #[env("TAGS,sep:/")]
    tags: Vec<String>,
}

#[test]
fn test_derived_record_is_a_record_slot() {
    let mut server = Server::default();
    assert!(matches!(server.slot(), Slot::Record(_)));
}

#[test]
fn test_fields_bound_in_declaration_order() {
    let src = source(&[("HOST", "db"), ("MAX_CONN", "16"), ("TAGS", "a/b")]);

    let mut server = Server::default();
    server.bind_fields(&src).unwrap();
    assert_eq!(server.host, "db");
    assert_eq!(server.limits.max_connections, 16);
    assert_eq!(server.tags, vec!["a", "b"]);
}

#[test]
fn test_nested_error_carries_field_names() {
    let src = source(&[("MAX_CONN", "-1")]);

    let mut server = Server::default();
    let err = server.bind_fields(&src).unwrap_err();
    assert_eq!(err.field_path(), vec!["limits", "max_connections"]);
}

#[derive(Record)]
struct Callbacks {
    #[env("ON_START")]
    on_start: fn() -> u8,
    #[allow(dead_code)]
    untagged: fn(),
}

#[test]
fn test_function_fields() {
    fn start() -> u8 {
        7
    }
    fn noop() {}

    let mut callbacks = Callbacks {
        on_start: start,
        untagged: noop,
    };

    envbind::load_with(&source(&[]), &mut callbacks).unwrap();
    assert_eq!((callbacks.on_start)(), 7);

    let err = envbind::load_with(&source(&[("ON_START", "x")]), &mut callbacks).unwrap_err();
    assert_eq!(err.field_path(), vec!["on_start"]);
    assert_eq!(
        err.to_string(),
        "envbind: field \"on_start\": unsupported field type: function"
    );
}
