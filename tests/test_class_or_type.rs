extern crate autoload;

mod runtime_util;

use autoload::runner::autoload::ResolutionMap;
use autoload::runner::ds::error::RuntimeError;
use autoload::runner::ds::symbol::SymbolKind;
use autoload::runner::ds::value::Value;
use pretty_assertions::assert_eq;
use runtime_util::{autoloader, FakeRuntime, Unit};

fn kinds_reported(rt: &FakeRuntime) -> Vec<String> {
    rt.call_args("on_miss")
        .iter()
        .map(|args| args[0].as_str().unwrap_or_default().to_string())
        .collect()
}

/// A handler that defines whatever class it is asked for.
fn register_defining_loader(rt: &FakeRuntime) {
    rt.register("loader", |rt, _, args| {
        rt.define_class(args[0].as_str().unwrap_or_default());
        Ok(Value::Null)
    });
}

#[test]
fn test_class_stop_skips_handler_chain() {
    let rt = FakeRuntime::new();
    rt.register("on_miss", |_, _, args| match args[0].as_str() {
        Some("class") => Ok(Value::Bool(false)),
        _ => Ok(Value::Null),
    });
    register_defining_loader(&rt);
    let mut al = autoloader(&rt);
    al.set_map(ResolutionMap::builder().failure("on_miss").build(), "");
    al.add_handler(Value::str("loader"), false);

    assert!(!al.autoload_class_or_type("Foo").unwrap());
    assert_eq!(rt.calls(), vec!["on_miss", "on_miss"]);
    assert!(rt.loads().is_empty());
}

#[test]
fn test_type_stop_still_falls_through() {
    let rt = FakeRuntime::new();
    rt.register("on_miss", |_, _, args| match args[0].as_str() {
        Some("type") => Ok(Value::Bool(false)),
        _ => Ok(Value::Null),
    });
    register_defining_loader(&rt);
    let mut al = autoloader(&rt);
    al.set_map(ResolutionMap::builder().failure("on_miss").build(), "");
    al.add_handler(Value::str("loader"), false);

    assert!(al.autoload_class_or_type("Foo").unwrap());
    assert_eq!(rt.calls(), vec!["on_miss", "on_miss", "loader"]);
    assert!(rt.exists(SymbolKind::Class, "Foo"));
}

#[test]
fn test_class_entry_wins_without_trying_type() {
    let rt = FakeRuntime::new();
    rt.add_unit("Foo.php", Unit::new().class("Foo"));
    rt.add_unit("foo_type.php", Unit::new().defines(SymbolKind::Type, "Foo"));
    let mut al = autoloader(&rt);
    al.set_map(
        ResolutionMap::builder()
            .class("Foo", "Foo.php")
            .type_alias("Foo", "foo_type.php")
            .build(),
        "",
    );

    assert!(al.autoload_class_or_type("\\Foo").unwrap());
    assert_eq!(rt.loads(), vec!["Foo.php"]);
}

#[test]
fn test_type_entry_resolves_after_class_miss() {
    let rt = FakeRuntime::new();
    rt.add_unit("shape.php", Unit::new().defines(SymbolKind::Type, "Shape"));
    rt.register("on_miss", |_, _, _| Ok(Value::Null));
    let mut al = autoloader(&rt);
    al.set_map(
        ResolutionMap::builder()
            .type_alias("Shape", "shape.php")
            .failure("on_miss")
            .build(),
        "",
    );

    assert!(al.autoload_class_or_type("Shape").unwrap());
    assert_eq!(rt.loads(), vec!["shape.php"]);
    // A plain miss on the class side is only reported once both were tried.
    assert!(rt.calls().is_empty());
}

#[test]
fn test_only_kinds_asking_for_retry_are_retried() {
    let rt = FakeRuntime::new();
    let class_calls = std::cell::Cell::new(0);
    rt.register("on_miss", move |_, _, args| match args[0].as_str() {
        Some("class") => {
            class_calls.set(class_calls.get() + 1);
            Ok(Value::Bool(class_calls.get() == 1))
        }
        _ => Ok(Value::Null),
    });
    let mut al = autoloader(&rt);
    al.set_map(ResolutionMap::builder().failure("on_miss").build(), "");

    assert!(!al.autoload_class_or_type("Foo").unwrap());
    assert_eq!(kinds_reported(&rt), vec!["class", "type", "class"]);
}

#[test]
fn test_raised_error_is_reported_once_per_kind() {
    let rt = FakeRuntime::new();
    rt.add_unit("Foo.php", Unit::new().raises(RuntimeError::new("boom").into()));
    rt.register("on_miss", |_, _, _| Ok(Value::Null));
    let mut al = autoloader(&rt);
    al.set_map(
        ResolutionMap::builder()
            .class("Foo", "Foo.php")
            .failure("on_miss")
            .build(),
        "",
    );

    assert!(!al.autoload_class_or_type("Foo").unwrap());
    assert_eq!(
        rt.call_args("on_miss"),
        vec![
            vec![Value::str("class"), Value::str("Foo"), Value::str("boom")],
            vec![Value::str("type"), Value::str("Foo"), Value::Null],
        ]
    );
}

#[test]
fn test_callback_defining_either_kind_ends_resolution() {
    let rt = FakeRuntime::new();
    rt.register("on_miss", |rt, _, _| {
        rt.define(SymbolKind::Type, "Foo");
        Ok(Value::Null)
    });
    let mut al = autoloader(&rt);
    al.set_map(ResolutionMap::builder().failure("on_miss").build(), "");

    assert!(al.autoload_class_or_type("Foo").unwrap());
    assert_eq!(kinds_reported(&rt), vec!["class"]);
}

#[test]
fn test_without_map_goes_straight_to_handler_chain() {
    let rt = FakeRuntime::new();
    register_defining_loader(&rt);
    let mut al = autoloader(&rt);
    al.add_handler(Value::str("loader"), false);

    assert!(al.autoload_class_or_type("\\Ns\\Foo").unwrap());
    assert_eq!(rt.call_args("loader"), vec![vec![Value::str("Ns\\Foo")]]);
}
