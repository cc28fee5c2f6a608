//! An in-memory host runtime for driving the autoloader in tests.
//!
//! Symbols live in sets, units are registered by path and run at most once,
//! and callables are plain closures looked up by a string key:
//!
//! - `"name"` for free functions
//! - `"Class::method"` for static methods
//! - `"Class->method"` for bound methods (`"Class->__invoke"` for invokables)

#![allow(dead_code)]

extern crate autoload;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use autoload::runner::autoload::{
    Autoloader, CallableRuntime, FunctionState, SymbolOracle, UnitLoader,
};
use autoload::runner::ds::callable::{DecodedHandler, HandlerTarget};
use autoload::runner::ds::error::{AutoloadError, RuntimeError};
use autoload::runner::ds::symbol::{canonical_name, SymbolKind};
use autoload::runner::ds::value::Value;

pub type Callback =
    Rc<dyn Fn(&FakeRuntime, &mut Autoloader, &[Value]) -> Result<Value, AutoloadError>>;

/// A loadable unit: optional top-level code, then the symbols it defines.
#[derive(Clone, Default)]
pub struct Unit {
    defines: Vec<(SymbolKind, String)>,
    body: Option<Callback>,
}

impl Unit {
    pub fn new() -> Self {
        Unit::default()
    }

    pub fn defines(mut self, kind: SymbolKind, name: &str) -> Self {
        self.defines.push((kind, name.to_string()));
        self
    }

    pub fn class(self, name: &str) -> Self {
        self.defines(SymbolKind::Class, name)
    }

    /// Top-level code that fails with `error` before anything is defined.
    pub fn raises(self, error: AutoloadError) -> Self {
        self.runs(move |_, _, _| Err(error.clone()))
    }

    pub fn runs<F>(mut self, body: F) -> Self
    where
        F: Fn(&FakeRuntime, &mut Autoloader, &[Value]) -> Result<Value, AutoloadError> + 'static,
    {
        self.body = Some(Rc::new(body));
        self
    }
}

#[derive(Default)]
pub struct FakeRuntime {
    symbols: RefCell<HashSet<(SymbolKind, String)>>,
    functions: RefCell<HashMap<String, FunctionState>>,
    units: RefCell<HashMap<String, Unit>>,
    loaded: RefCell<HashSet<String>>,
    loads: RefCell<Vec<String>>,
    callables: RefCell<HashMap<String, Callback>>,
    calls: RefCell<Vec<(String, Vec<Value>)>>,
}

fn symbol_key(kind: SymbolKind, name: &str) -> (SymbolKind, String) {
    (kind, canonical_name(name, kind.folds_case()).into_owned())
}

impl FakeRuntime {
    pub fn new() -> Rc<FakeRuntime> {
        Rc::new(FakeRuntime::default())
    }

    pub fn define(&self, kind: SymbolKind, name: &str) {
        if kind == SymbolKind::Function {
            self.set_function_state(name, FunctionState::Defined);
        }
        self.symbols.borrow_mut().insert(symbol_key(kind, name));
    }

    pub fn define_class(&self, name: &str) {
        self.define(SymbolKind::Class, name);
    }

    pub fn set_function_state(&self, name: &str, state: FunctionState) {
        self.functions
            .borrow_mut()
            .insert(canonical_name(name, true).into_owned(), state);
    }

    pub fn exists(&self, kind: SymbolKind, name: &str) -> bool {
        self.symbols.borrow().contains(&symbol_key(kind, name))
    }

    pub fn add_unit(&self, path: &str, unit: Unit) {
        self.units.borrow_mut().insert(path.to_string(), unit);
    }

    /// Registers a callable under `key`. Free functions also become defined
    /// functions, so `"__autoload"` turns on the magic fallback.
    pub fn register<F>(&self, key: &str, f: F)
    where
        F: Fn(&FakeRuntime, &mut Autoloader, &[Value]) -> Result<Value, AutoloadError> + 'static,
    {
        if !key.contains("::") && !key.contains("->") {
            self.set_function_state(key, FunctionState::Defined);
        }
        self.callables
            .borrow_mut()
            .insert(key.to_string(), Rc::new(f));
    }

    /// Every path handed to `load_unit`, in order.
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    /// Keys of every callable invoked, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn call_args(&self, key: &str) -> Vec<Vec<Value>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn key_of(target: &HandlerTarget) -> String {
        match target {
            HandlerTarget::Function(name) => name.clone(),
            HandlerTarget::StaticMethod { class, method } => format!("{}::{}", class, method),
            HandlerTarget::BoundMethod { object, method }
            | HandlerTarget::Invokable { object, method } => {
                format!("{}->{}", object.class_name(), method)
            }
        }
    }

    fn is_registered(&self, key: &str) -> bool {
        self.callables.borrow().contains_key(key)
    }
}

impl SymbolOracle for FakeRuntime {
    fn class_exists(&self, name: &str) -> bool {
        self.exists(SymbolKind::Class, name)
    }

    fn function_state(&self, name: &str) -> FunctionState {
        self.functions
            .borrow()
            .get(canonical_name(name, true).as_ref())
            .copied()
            .unwrap_or(FunctionState::Missing)
    }

    fn constant_exists(&self, name: &str) -> bool {
        self.exists(SymbolKind::Constant, name)
    }

    fn type_alias_exists(&self, name: &str) -> bool {
        self.exists(SymbolKind::Type, name)
    }

    fn record_exists(&self, name: &str) -> bool {
        self.exists(SymbolKind::Record, name)
    }
}

impl UnitLoader for FakeRuntime {
    fn load_unit(&self, ctx: &mut Autoloader, path: &str) -> Result<bool, AutoloadError> {
        self.loads.borrow_mut().push(path.to_string());
        let unit = match self.units.borrow().get(path) {
            Some(unit) => unit.clone(),
            None => return Ok(false),
        };
        if !self.loaded.borrow_mut().insert(path.to_string()) {
            return Ok(true);
        }
        if let Some(body) = &unit.body {
            body(self, ctx, &[])?;
        }
        for (kind, name) in &unit.defines {
            self.define(*kind, name);
        }
        Ok(true)
    }
}

impl CallableRuntime for FakeRuntime {
    fn decode(&self, callable: &Value) -> Option<DecodedHandler> {
        let target = match callable {
            Value::Str(name) => match name.split_once("::") {
                Some((class, method)) => HandlerTarget::StaticMethod {
                    class: class.to_string(),
                    method: method.to_string(),
                },
                None => HandlerTarget::Function(name.clone()),
            },
            Value::Vec(parts) => match parts.as_slice() {
                [Value::Str(class), Value::Str(method)] => HandlerTarget::StaticMethod {
                    class: class.clone(),
                    method: method.clone(),
                },
                [Value::Object(object), Value::Str(method)] => HandlerTarget::BoundMethod {
                    object: object.clone(),
                    method: method.clone(),
                },
                _ => return None,
            },
            Value::Object(object) => HandlerTarget::Invokable {
                object: object.clone(),
                method: "__invoke".to_string(),
            },
            _ => return None,
        };
        if !self.is_registered(&FakeRuntime::key_of(&target)) {
            return None;
        }
        Some(DecodedHandler::new(target))
    }

    fn invoke(
        &self,
        ctx: &mut Autoloader,
        handler: &DecodedHandler,
        args: Vec<Value>,
    ) -> Result<Value, AutoloadError> {
        let key = FakeRuntime::key_of(&handler.target);
        self.calls.borrow_mut().push((key.clone(), args.clone()));
        let callback = self.callables.borrow().get(&key).cloned();
        match callback {
            Some(callback) => callback(self, ctx, &args),
            None => Err(RuntimeError::new(format!("Call to undefined function {}()", key)).into()),
        }
    }

    fn call_user_func(
        &self,
        ctx: &mut Autoloader,
        callable: &Value,
        args: Vec<Value>,
    ) -> Result<Value, AutoloadError> {
        match self.decode(callable) {
            Some(decoded) => self.invoke(ctx, &decoded, args),
            None => Err(RuntimeError::new("call_user_func() expects a valid callback").into()),
        }
    }
}

/// An autoloader over `runtime`.
pub fn autoloader(runtime: &Rc<FakeRuntime>) -> Autoloader {
    Autoloader::new(runtime.clone())
}
