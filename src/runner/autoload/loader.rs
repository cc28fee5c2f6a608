//! Map-driven loading.
//!
//! One attempt looks the name up in the resolution map, loads the mapped
//! unit and asks the oracle whether the symbol now exists. The retrying
//! wrapper hands misses to the map's failure callback and loops for as long
//! as the callback asks for another try.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::autoload::map::join_root;
use crate::runner::autoload::runtime::ExistsCheck;
use crate::runner::ds::error::{AutoloadError, Miss};
use crate::runner::ds::symbol::{canonical_name, SymbolKind};
use crate::runner::ds::value::Value;

/// Outcome of one loader or failure-callback interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    Success,
    Failure,
    StopAutoloading,
    RetryAutoloading,
    ContinueAutoloading,
}

/// One map lookup plus unit load. `error` is whatever the unit raised, as
/// a message string or the thrown value; `None` if nothing was raised.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub result: LoadResult,
    pub error: Option<Value>,
}

impl Attempt {
    fn failed(error: Option<Value>) -> Self {
        Attempt {
            result: LoadResult::Failure,
            error,
        }
    }
}

impl Autoloader {
    /// A single pass: map lookup, unit load, existence check.
    ///
    /// Fatal signals are returned as errors. Everything else the unit raises
    /// is recorded in [`Attempt::error`].
    pub fn attempt_load(
        &mut self,
        name: &str,
        kind: SymbolKind,
        fold: bool,
        check: ExistsCheck<'_>,
    ) -> Result<Attempt, AutoloadError> {
        let canonical = canonical_name(name, fold);
        let path = self
            .map
            .as_ref()
            .and_then(|map| map.path_for(kind, &canonical))
            .map(|path| join_root(&self.map_root, path));
        let path = match path {
            Some(path) => path,
            None => {
                trace!(%kind, name = %canonical, miss = %Miss::NotFound, "no map entry");
                return Ok(Attempt::failed(None));
            }
        };

        trace!(%kind, name = %canonical, %path, "loading unit from map");
        let runtime = Rc::clone(&self.runtime);
        let (loaded, error) = match runtime.load_unit(self, &path) {
            Ok(found) => (found, None),
            Err(e @ AutoloadError::Fatal(_)) => return Err(e),
            Err(AutoloadError::Runtime(e)) => (false, Some(Value::Str(e.to_string()))),
            Err(AutoloadError::Thrown(t)) => (false, Some(Value::Throwable(t))),
            Err(AutoloadError::Unknown) => (false, Some(Value::str("Unknown Exception"))),
        };
        if let Some(err) = &error {
            debug!(%kind, name = %canonical, %path, miss = %Miss::LoadError, error = ?err, "unit raised while autoloading");
        }

        if loaded && check.holds(&*self.runtime) {
            Ok(Attempt {
                result: LoadResult::Success,
                error,
            })
        } else {
            Ok(Attempt::failed(error))
        }
    }

    /// Attempts a load, consulting the failure callback after every miss
    /// until the symbol exists or the callback stops asking for retries.
    pub fn load_with_retry(
        &mut self,
        name: &str,
        kind: SymbolKind,
        fold: bool,
        check: ExistsCheck<'_>,
    ) -> Result<LoadResult, AutoloadError> {
        loop {
            let attempt = self.attempt_load(name, kind, fold, check)?;
            if attempt.result == LoadResult::Success {
                return Ok(LoadResult::Success);
            }
            let callback = match self.failure_callback() {
                Some(callback) => callback,
                None => return Ok(LoadResult::Failure),
            };
            let verdict = self.invoke_failure_callback(
                &callback,
                kind,
                name,
                attempt.error.unwrap_or(Value::Null),
            )?;
            if check.holds(&*self.runtime) {
                return Ok(LoadResult::Success);
            }
            if verdict != LoadResult::RetryAutoloading {
                return Ok(verdict);
            }
        }
    }

    /// One pass for the class-or-type resolver. The failure callback is only
    /// consulted when the unit actually raised; a plain miss is returned
    /// untouched so the caller can coordinate across kinds.
    pub fn load_partial(
        &mut self,
        name: &str,
        kind: SymbolKind,
        check: ExistsCheck<'_>,
    ) -> Result<Attempt, AutoloadError> {
        let attempt = self.attempt_load(name, kind, true, check)?;
        if attempt.result == LoadResult::Success {
            return Ok(attempt);
        }
        let error = match &attempt.error {
            Some(error) => error.clone(),
            None => return Ok(attempt),
        };
        let callback = match self.failure_callback() {
            Some(callback) => callback,
            None => return Ok(attempt),
        };
        let verdict = self.invoke_failure_callback(&callback, kind, name, error)?;
        let result = if check.holds(&*self.runtime) {
            LoadResult::Success
        } else {
            verdict
        };
        Ok(Attempt {
            result,
            error: attempt.error,
        })
    }
}
