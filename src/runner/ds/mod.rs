//! Data structures shared by the autoloader: values, symbols, decoded
//! callables and errors.

pub mod callable;
pub mod error;
pub mod symbol;
pub mod value;
