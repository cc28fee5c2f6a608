//! The failure callback contract.
//!
//! The callback is called as `callback(kind, name, error)` and answers with
//! `true` (the map changed, try again), `false` (stop autoloading; only
//! honoured for classes) or anything else (carry on with other loaders).

use std::rc::Rc;

use tracing::debug;

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::autoload::loader::LoadResult;
use crate::runner::ds::error::AutoloadError;
use crate::runner::ds::symbol::SymbolKind;
use crate::runner::ds::value::Value;

/// Reads the callback's return value. Never yields `Success` or `Failure`.
pub fn interpret_verdict(action: &Value) -> LoadResult {
    match action {
        Value::Bool(true) => LoadResult::RetryAutoloading,
        Value::Bool(false) => LoadResult::StopAutoloading,
        _ => LoadResult::ContinueAutoloading,
    }
}

impl Autoloader {
    /// The map's failure callback, re-read on every call since a callback
    /// may install a different map.
    pub(crate) fn failure_callback(&self) -> Option<Value> {
        self.map.as_ref()?.failure_callback().cloned()
    }

    /// Anything the callback raises propagates to the caller.
    pub fn invoke_failure_callback(
        &mut self,
        callback: &Value,
        kind: SymbolKind,
        name: &str,
        error: Value,
    ) -> Result<LoadResult, AutoloadError> {
        let runtime = Rc::clone(&self.runtime);
        let args = vec![Value::str(kind.tag()), Value::str(name), error];
        let action = runtime.call_user_func(self, callback, args)?;
        let verdict = interpret_verdict(&action);
        debug!(%kind, name, ?verdict, "failure callback answered");
        Ok(verdict)
    }
}
