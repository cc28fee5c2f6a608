//! Resolution of a name that may be either a class or a type alias.
//!
//! Both map sections are tried on every round. A miss in either is only
//! reported to the failure callback once both have been tried, and only the
//! kinds whose callback asked for a retry are tried again. If the callback
//! told the class side to stop, the handler chain is skipped; a stopped type
//! side does not have that effect.

use tracing::debug;

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::autoload::loader::LoadResult;
use crate::runner::autoload::runtime::ExistsCheck;
use crate::runner::ds::error::AutoloadError;
use crate::runner::ds::symbol::{normalize_ns, SymbolKind};
use crate::runner::ds::value::Value;

impl Autoloader {
    pub fn autoload_class_or_type(&mut self, name: &str) -> Result<bool, AutoloadError> {
        if name.is_empty() {
            return Ok(false);
        }
        let class_name = normalize_ns(name).to_string();
        let _span = tracing::debug_span!("autoload_class_or_type", name = %class_name).entered();

        if self.map.is_some() {
            let check = ExistsCheck::ClassOrType(&class_name);
            let (mut try_class, mut try_type) = (true, true);
            let mut class_result = LoadResult::RetryAutoloading;
            let mut type_result = LoadResult::RetryAutoloading;

            loop {
                let mut class_error = None;
                if try_class {
                    let attempt = self.load_partial(&class_name, SymbolKind::Class, check)?;
                    if attempt.result == LoadResult::Success {
                        return Ok(true);
                    }
                    class_result = attempt.result;
                    class_error = attempt.error;
                }

                let mut type_error = None;
                if try_type {
                    let attempt = self.load_partial(&class_name, SymbolKind::Type, check)?;
                    if attempt.result == LoadResult::Success {
                        return Ok(true);
                    }
                    type_result = attempt.result;
                    type_error = attempt.error;
                }

                // Neither map produced the symbol and nothing raised, or the
                // callback already answered for a kind inside load_partial.
                let callback = match self.failure_callback() {
                    Some(callback) => callback,
                    None => break,
                };
                if class_result == LoadResult::Failure {
                    class_result = self.invoke_failure_callback(
                        &callback,
                        SymbolKind::Class,
                        &class_name,
                        class_error.unwrap_or(Value::Null),
                    )?;
                    if check.holds(&*self.runtime) {
                        return Ok(true);
                    }
                }
                if type_result == LoadResult::Failure {
                    type_result = self.invoke_failure_callback(
                        &callback,
                        SymbolKind::Type,
                        &class_name,
                        type_error.unwrap_or(Value::Null),
                    )?;
                    if check.holds(&*self.runtime) {
                        return Ok(true);
                    }
                }

                try_class = class_result == LoadResult::RetryAutoloading;
                try_type = type_result == LoadResult::RetryAutoloading;
                if try_class || try_type {
                    continue;
                }
                if class_result == LoadResult::StopAutoloading {
                    debug!(name = %class_name, "failure callback stopped class autoloading");
                    return Ok(false);
                }
                break;
            }
        }

        self.autoload_class_legacy(&class_name, false)
    }
}
