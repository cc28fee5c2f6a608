//! Decoded callables.
//!
//! The host runtime turns whatever value a user registered as an autoload
//! handler into one of these once, at registration time. After that the
//! autoloader treats it as opaque: it is compared for deduplication and
//! handed back to the runtime to invoke.

use crate::runner::ds::value::ObjectRef;

#[derive(Debug, Clone, PartialEq)]
pub enum HandlerTarget {
    /// `$object->method(...)`
    BoundMethod { object: ObjectRef, method: String },
    /// `Class::method(...)`
    StaticMethod { class: String, method: String },
    /// `function(...)`
    Function(String),
    /// An object called directly; `method` is whatever the runtime
    /// dispatches the call to.
    Invokable { object: ObjectRef, method: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedHandler {
    pub target: HandlerTarget,
    /// Invocation must follow dynamic-call rules.
    pub dynamic: bool,
}

impl DecodedHandler {
    pub fn new(target: HandlerTarget) -> Self {
        DecodedHandler {
            target,
            dynamic: false,
        }
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// The function that actually runs.
    pub fn func(&self) -> &str {
        match &self.target {
            HandlerTarget::BoundMethod { method, .. }
            | HandlerTarget::StaticMethod { method, .. }
            | HandlerTarget::Invokable { method, .. } => method,
            HandlerTarget::Function(name) => name,
        }
    }

    /// The owning class, for static calls only.
    pub fn class(&self) -> Option<&str> {
        match &self.target {
            HandlerTarget::StaticMethod { class, .. } => Some(class),
            _ => None,
        }
    }

    /// The bound receiver, if any.
    pub fn object(&self) -> Option<&ObjectRef> {
        match &self.target {
            HandlerTarget::BoundMethod { object, .. } | HandlerTarget::Invokable { object, .. } => {
                Some(object)
            }
            _ => None,
        }
    }

    /// Two handlers are the same registration when they run the same
    /// function on the same class or receiver. The dynamic flag is ignored.
    pub fn same_target(&self, other: &DecodedHandler) -> bool {
        let same_object = match (self.object(), other.object()) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        self.func() == other.func() && self.class() == other.class() && same_object
    }
}
