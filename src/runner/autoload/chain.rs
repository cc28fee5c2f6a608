//! The legacy handler chain.
//!
//! When the map cannot produce a class, registered handlers are called in
//! order with the class name until one of them defines it. Before any
//! handler was registered, the single magic `__autoload` function is used
//! instead, if it exists.
//!
//! The loading stack stops a handler from recursively autoloading the class
//! it is already autoloading, which would otherwise never terminate.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::autoload::runtime::FunctionState;
use crate::runner::ds::error::{AutoloadError, Miss, ThrowableChain};
use crate::runner::ds::symbol::MAGIC_AUTOLOAD;
use crate::runner::ds::value::Value;

/// Names of the classes currently being resolved through the handler chain,
/// innermost last.
#[derive(Debug, Clone, Default)]
pub struct LoadingStack {
    names: Rc<RefCell<Vec<String>>>,
}

impl LoadingStack {
    pub fn new() -> Self {
        LoadingStack::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.borrow().is_empty()
    }

    pub fn depth(&self) -> usize {
        self.names.borrow().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.borrow().iter().any(|n| n == name)
    }

    /// Pushes `name`; the returned guard pops it again when dropped.
    pub fn push(&self, name: &str) -> LoadingGuard {
        self.names.borrow_mut().push(name.to_string());
        LoadingGuard {
            names: Rc::clone(&self.names),
            name: name.to_string(),
        }
    }
}

/// Keeps one entry on the loading stack for as long as it lives.
#[must_use = "the name is popped as soon as the guard is dropped"]
pub struct LoadingGuard {
    names: Rc<RefCell<Vec<String>>>,
    name: String,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let popped = self.names.borrow_mut().pop();
        assert_eq!(
            popped.as_deref(),
            Some(self.name.as_str()),
            "autoload loading stack corrupted"
        );
    }
}

impl Autoloader {
    /// Runs the handler chain (or the magic function) for `class_name`.
    ///
    /// `Ok(true)` means some loader ran, not that the class now exists;
    /// callers check that themselves. With `force_reentrant` a class that is
    /// already being loaded is loaded again instead of refused.
    pub fn autoload_class_legacy(
        &mut self,
        class_name: &str,
        force_reentrant: bool,
    ) -> Result<bool, AutoloadError> {
        if !force_reentrant && self.loading.contains(class_name) {
            debug!(name = class_name, miss = %Miss::CycleDetected, "recursive autoload refused");
            return Ok(false);
        }
        let _guard = self.loading.push(class_name);
        let runtime = Rc::clone(&self.runtime);

        if !self.handlers.is_initialized() && !force_reentrant {
            if runtime.function_state(MAGIC_AUTOLOAD) != FunctionState::Defined {
                return Ok(false);
            }
            trace!(name = class_name, "calling magic autoload function");
            runtime.call_user_func(
                self,
                &Value::str(MAGIC_AUTOLOAD),
                vec![Value::str(class_name)],
            )?;
            return Ok(true);
        }
        if !self.handlers.is_initialized() || self.handlers.is_empty() {
            return Ok(false);
        }

        let mut raised = ThrowableChain::new();
        for bundle in self.handlers.snapshot() {
            trace!(name = class_name, handler = ?bundle.decoded.target, "calling autoload handler");
            match runtime.invoke(self, &bundle.decoded, vec![Value::str(class_name)]) {
                Ok(_) => {}
                Err(AutoloadError::Thrown(t)) => {
                    debug!(name = class_name, throwable = %t, "autoload handler raised");
                    raised.push(t);
                }
                Err(e) => return Err(e),
            }
            if runtime.class_exists(class_name) {
                break;
            }
        }

        match raised.into_throwable() {
            Some(t) => Err(AutoloadError::Thrown(t)),
            None => Ok(true),
        }
    }
}
