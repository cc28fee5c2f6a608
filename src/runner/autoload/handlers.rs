//! Registration of autoload handlers.

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::ds::callable::DecodedHandler;
use crate::runner::ds::error::Miss;
use crate::runner::ds::value::Value;

/// A registered handler: the value the user passed in, and what it decoded to.
#[derive(Debug)]
pub struct HandlerBundle {
    pub handler: Value,
    pub decoded: DecodedHandler,
}

/// The ordered handler list plus whether registration ever happened in this
/// request. Until it has, the magic autoload function stands in for the chain.
#[derive(Debug, Default)]
pub struct HandlerChain {
    bundles: VecDeque<Rc<HandlerBundle>>,
    initialized: bool,
}

impl HandlerChain {
    pub fn new() -> Self {
        HandlerChain::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerBundle> {
        self.bundles.iter().map(|b| b.as_ref())
    }

    /// The current handlers, detached from the chain so handlers may
    /// register or remove handlers while the chain runs.
    pub(crate) fn snapshot(&self) -> Vec<Rc<HandlerBundle>> {
        self.bundles.iter().cloned().collect()
    }

    fn position(&self, decoded: &DecodedHandler) -> Option<usize> {
        self.bundles
            .iter()
            .position(|b| b.decoded.same_target(decoded))
    }

    /// Adds `bundle` unless an equivalent handler is already registered, in
    /// which case the chain is left exactly as it was.
    pub fn insert(&mut self, bundle: HandlerBundle, prepend: bool) -> bool {
        self.initialized = true;
        if self.position(&bundle.decoded).is_some() {
            return false;
        }
        if prepend {
            self.bundles.push_front(Rc::new(bundle));
        } else {
            self.bundles.push_back(Rc::new(bundle));
        }
        true
    }

    pub fn remove(&mut self, decoded: &DecodedHandler) -> bool {
        match self.position(decoded) {
            Some(idx) => self.bundles.remove(idx).is_some(),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.bundles.clear();
        self.initialized = false;
    }
}

impl Autoloader {
    /// Registers a handler. Returns `false` only if `handler` is not callable.
    pub fn add_handler(&mut self, handler: Value, prepend: bool) -> bool {
        let decoded = match self.runtime.decode(&handler) {
            Some(decoded) => decoded,
            None => {
                debug!(handler = ?handler, miss = %Miss::HandlerDecodeError, "ignoring uncallable autoload handler");
                return false;
            }
        };
        if self.handlers.insert(HandlerBundle { handler, decoded }, prepend) {
            trace!(prepend, count = self.handlers.len(), "autoload handler registered");
        }
        true
    }

    pub fn remove_handler(&mut self, handler: &Value) {
        match self.runtime.decode(handler) {
            Some(decoded) => {
                if self.handlers.remove(&decoded) {
                    trace!(count = self.handlers.len(), "autoload handler removed");
                }
            }
            None => {
                trace!(handler = ?handler, miss = %Miss::HandlerDecodeError, "ignoring uncallable handler removal");
            }
        }
    }

    /// The registered handlers in call order. Handlers registered as a
    /// string or array come back rebuilt from their decoded form; objects
    /// come back as given.
    pub fn handlers(&self) -> Vec<Value> {
        if !self.handlers.is_initialized() {
            return Vec::new();
        }
        self.handlers
            .iter()
            .map(|bundle| {
                let decoded = &bundle.decoded;
                let func = Value::str(decoded.func());
                if let Value::Object(_) = bundle.handler {
                    bundle.handler.clone()
                } else if let Some(class) = decoded.class() {
                    Value::Vec(vec![Value::str(class), func])
                } else if let Some(object) = decoded.object() {
                    Value::Vec(vec![Value::Object(object.clone()), func])
                } else {
                    func
                }
            })
            .collect()
    }

    pub fn remove_all_handlers(&mut self) {
        self.handlers.clear();
    }
}
