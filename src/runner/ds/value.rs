use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::runner::ds::error::Throwable;

/// A value as the host runtime hands it to the autoloader.
///
/// The autoloader never looks inside most of these; it only needs enough
/// structure to read a resolution map, pass arguments to callbacks and
/// interpret their return values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Vec(Vec<Value>),
    Dict(HashMap<String, Value>),
    Object(ObjectRef),
    Throwable(Throwable),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Vec(_) => "vec",
            Value::Dict(_) => "dict",
            Value::Object(_) => "object",
            Value::Throwable(_) => "throwable",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

struct ObjectData {
    class_name: String,
}

/// Handle to a host object. Two handles are equal only if they point at the
/// same object, which is what handler deduplication needs.
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectData>);

impl ObjectRef {
    pub fn new(class_name: impl Into<String>) -> Self {
        ObjectRef(Rc::new(ObjectData {
            class_name: class_name.into(),
        }))
    }

    pub fn class_name(&self) -> &str {
        &self.0.class_name
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object({}#{:p})", self.0.class_name, Rc::as_ptr(&self.0))
    }
}
