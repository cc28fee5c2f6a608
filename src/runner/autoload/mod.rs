//! Autoloading of undefined symbols.
//!
//! When running code refers to a class, function, constant, type alias or
//! record that does not exist yet, the runtime asks the [`Autoloader`] to
//! produce it. The autoloader runs whichever unit or callback is expected to
//! define the symbol, then asks the runtime whether it exists now.
//!
//! ## Loaders
//!
//! ```text
//! autoload_class("Foo")
//!      ↓
//! 1. Resolution map: class "foo" → "src/Foo.php"
//!      ↓  load unit, check existence
//! 2. Miss? call the map's failure callback
//!      ↓  true → retry, false → stop, anything else → go on
//! 3. Handler chain: call each registered handler with "Foo"
//!      ↓  until the class exists
//! 4. Rethrow whatever the handlers raised
//! ```
//!
//! Only classes fall through to the handler chain. The other kinds are
//! resolved from the map alone. A name that could be either a class or a type
//! alias goes through [`Autoloader::autoload_class_or_type`], which tries both
//! map sections before asking the failure callback about either.
//!
//! ## The Host Runtime
//!
//! The autoloader does not store symbols, compile units or call functions
//! itself. It reaches the host through the traits in [`runtime`]:
//!
//! - **[`SymbolOracle`]**: does a symbol exist right now
//! - **[`UnitLoader`]**: load and run a unit by path
//! - **[`CallableRuntime`]**: decode and call user callables
//!
//! Units and callbacks receive the autoloader back, so they may autoload
//! other symbols while running.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use autoload::runner::autoload::{Autoloader, ResolutionMap};
//! # use autoload::runner::autoload::{CallableRuntime, FunctionState, SymbolOracle, UnitLoader};
//! # use autoload::runner::ds::callable::DecodedHandler;
//! # use autoload::runner::ds::error::AutoloadError;
//! # use autoload::runner::ds::value::Value;
//! # struct Host;
//! # impl SymbolOracle for Host {
//! #     fn class_exists(&self, _: &str) -> bool { false }
//! #     fn function_state(&self, _: &str) -> FunctionState { FunctionState::Missing }
//! #     fn constant_exists(&self, _: &str) -> bool { false }
//! #     fn type_alias_exists(&self, _: &str) -> bool { false }
//! #     fn record_exists(&self, _: &str) -> bool { false }
//! # }
//! # impl UnitLoader for Host {
//! #     fn load_unit(&self, _: &mut Autoloader, _: &str) -> Result<bool, AutoloadError> { Ok(false) }
//! # }
//! # impl CallableRuntime for Host {
//! #     fn decode(&self, _: &Value) -> Option<DecodedHandler> { None }
//! #     fn invoke(&self, _: &mut Autoloader, _: &DecodedHandler, _: Vec<Value>) -> Result<Value, AutoloadError> { Ok(Value::Null) }
//! #     fn call_user_func(&self, _: &mut Autoloader, _: &Value, _: Vec<Value>) -> Result<Value, AutoloadError> { Ok(Value::Null) }
//! # }
//!
//! let mut autoloader = Autoloader::new(Rc::new(Host));
//! autoloader.set_map(
//!     ResolutionMap::builder().class("Foo", "src/Foo.php").build(),
//!     "/srv/app/",
//! );
//! // The host has no unit at /srv/app/src/Foo.php, so nothing is defined.
//! assert!(!autoloader.autoload_class("Foo", false).unwrap());
//! ```

pub mod autoloader;
pub mod chain;
pub mod combined;
pub mod failure;
pub mod handlers;
pub mod loader;
pub mod manifest;
pub mod map;
pub mod runtime;

pub use autoloader::Autoloader;
pub use chain::{LoadingGuard, LoadingStack};
pub use handlers::{HandlerBundle, HandlerChain};
pub use loader::{Attempt, LoadResult};
pub use manifest::{Manifest, ManifestError};
pub use map::{ResolutionMap, ResolutionMapBuilder};
pub use runtime::{CallableRuntime, ExistsCheck, FunctionState, Runtime, SymbolOracle, UnitLoader};
