//! The host runtime as seen by the autoloader.
//!
//! The autoloader does not know how symbols are stored, how units are
//! compiled or how callables are dispatched. It asks the host through the
//! traits below. Anything the host runs on its behalf (a unit's top-level
//! code, a handler, the failure callback) receives the [`Autoloader`] back so
//! it can trigger nested autoloads.

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::ds::callable::DecodedHandler;
use crate::runner::ds::error::AutoloadError;
use crate::runner::ds::value::Value;

/// What the symbol table knows about a function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionState {
    Missing,
    /// Declared by the runtime but backed by a placeholder that only raises.
    Unimplemented,
    Defined,
}

/// Answers "does this symbol exist right now".
///
/// Implementations must not trigger autoloading themselves.
pub trait SymbolOracle {
    fn class_exists(&self, name: &str) -> bool;

    fn function_state(&self, name: &str) -> FunctionState;

    fn constant_exists(&self, name: &str) -> bool;

    fn type_alias_exists(&self, name: &str) -> bool;

    fn record_exists(&self, name: &str) -> bool;

    fn class_or_type_exists(&self, name: &str) -> bool {
        self.class_exists(name) || self.type_alias_exists(name)
    }
}

/// Loads source units by path.
pub trait UnitLoader {
    /// Loads the unit at `path` and, the first time it is loaded in this
    /// request, runs its top-level code.
    ///
    /// Returns `Ok(false)` when there is no unit at `path`. Errors raised by
    /// the unit's code are returned as-is; the autoloader decides which ones
    /// it may swallow.
    fn load_unit(&self, ctx: &mut Autoloader, path: &str) -> Result<bool, AutoloadError>;
}

/// Decodes and calls user callables.
pub trait CallableRuntime {
    /// Decodes a callable value, or `None` if it cannot be called.
    /// Must not warn or raise.
    fn decode(&self, callable: &Value) -> Option<DecodedHandler>;

    /// Calls a handler decoded earlier by [`CallableRuntime::decode`].
    fn invoke(
        &self,
        ctx: &mut Autoloader,
        handler: &DecodedHandler,
        args: Vec<Value>,
    ) -> Result<Value, AutoloadError>;

    /// Calls a callable value that was never registered as a handler
    /// (the map's failure callback, the magic autoload function).
    fn call_user_func(
        &self,
        ctx: &mut Autoloader,
        callable: &Value,
        args: Vec<Value>,
    ) -> Result<Value, AutoloadError>;
}

/// Everything the autoloader needs from its host.
pub trait Runtime: SymbolOracle + UnitLoader + CallableRuntime {}

impl<T: SymbolOracle + UnitLoader + CallableRuntime + ?Sized> Runtime for T {}

/// A per-kind existence query, picked once by each entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistsCheck<'a> {
    Class(&'a str),
    /// A function only counts once it is more than the unimplemented stub.
    Function(&'a str),
    Constant(&'a str),
    Type(&'a str),
    Record(&'a str),
    ClassOrType(&'a str),
}

impl ExistsCheck<'_> {
    pub fn holds<O: SymbolOracle + ?Sized>(&self, oracle: &O) -> bool {
        match *self {
            ExistsCheck::Class(name) => oracle.class_exists(name),
            ExistsCheck::Function(name) => oracle.function_state(name) == FunctionState::Defined,
            ExistsCheck::Constant(name) => oracle.constant_exists(name),
            ExistsCheck::Type(name) => oracle.type_alias_exists(name),
            ExistsCheck::Record(name) => oracle.record_exists(name),
            ExistsCheck::ClassOrType(name) => oracle.class_or_type_exists(name),
        }
    }
}
