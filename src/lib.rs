//! # autoload - On-demand symbol resolution for a script runtime
//!
//! When running code touches a class, function, constant, type alias or
//! record that has not been defined yet, the runtime hands the name to this
//! crate. It looks the name up in a declarative name → file map, runs the
//! unit that should define it, asks the runtime whether the symbol exists
//! now and, for classes, falls back to a chain of user-registered handlers.
//!
//! ## Quick Start
//!
//! ```
//! use autoload::runner::autoload::Manifest;
//! use autoload::runner::ds::symbol::SymbolKind;
//!
//! let manifest = Manifest::parse(
//!     r#"
//! root = "/srv/app/"
//!
//! [class]
//! Foo = "src/Foo.php"
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(manifest.map.path_for(SymbolKind::Class, "foo"), Some("src/Foo.php"));
//! ```
//!
//! Resolution itself goes through [`runner::autoload::Autoloader`], one per
//! request, built on top of the host's implementation of
//! [`runner::autoload::Runtime`].
//!
//! ## Architecture
//!
//! - **[`runner::autoload`]** - The autoloader: map-driven loading, the
//!   failure callback protocol, class-or-type resolution and the handler chain
//! - **[`runner::ds`]** - Data structures (values, symbol names, decoded
//!   callables, errors)

#[macro_use]
extern crate lazy_static;

pub mod runner;
