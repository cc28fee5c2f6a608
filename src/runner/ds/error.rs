use std::fmt;

use thiserror::Error;

/// Control-flow signals that must pass through every autoloader frame
/// untouched. They are never recorded, retried or wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalSignal {
    #[error("resource limit exceeded: {0}")]
    ResourceExceeded(String),
    #[error("exit({0})")]
    Exit(i32),
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// An engine-level error raised while running a unit or a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
    pub location: Option<(String, u32)>,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some((file.into(), line));
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some((file, line)) if !file.is_empty() => {
                write!(f, "{} in {} on line {}", self.message, file, line)
            }
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A user-level throwable together with its chain of previous causes.
///
/// Throwables are values: attaching a cause builds a new chain on an owned
/// copy instead of editing an object someone else may still hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Throwable {
    class_name: String,
    message: String,
    previous: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Throwable {
            class_name: class_name.into(),
            message: message.into(),
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: Throwable) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn previous(&self) -> Option<&Throwable> {
        self.previous.as_deref()
    }

    /// Iterates this throwable followed by each of its previous causes.
    pub fn chain(&self) -> impl Iterator<Item = &Throwable> {
        std::iter::successors(Some(self), |t| t.previous())
    }

    /// Hangs `cause` off the innermost end of this throwable's cause chain,
    /// keeping any causes user code already attached.
    fn attach_root_cause(&mut self, cause: Throwable) {
        match self.previous {
            Some(ref mut prev) => prev.attach_root_cause(cause),
            None => self.previous = Some(Box::new(cause)),
        }
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class_name, self.message)
    }
}

/// Collects throwables raised by successive autoload handlers.
///
/// Nothing is linked until [`ThrowableChain::into_throwable`], which turns
/// the collected values into one throwable whose cause chain runs from the
/// most recent raise back to the first.
#[derive(Debug, Default)]
pub struct ThrowableChain {
    raised: Vec<Throwable>,
}

impl ThrowableChain {
    pub fn new() -> Self {
        ThrowableChain { raised: Vec::new() }
    }

    pub fn push(&mut self, throwable: Throwable) {
        self.raised.push(throwable);
    }

    pub fn is_empty(&self) -> bool {
        self.raised.is_empty()
    }

    pub fn len(&self) -> usize {
        self.raised.len()
    }

    pub fn into_throwable(self) -> Option<Throwable> {
        self.raised.into_iter().reduce(|held, mut newer| {
            newer.attach_root_cause(held);
            newer
        })
    }
}

/// Everything that can escape an autoload call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutoloadError {
    #[error(transparent)]
    Fatal(#[from] FatalSignal),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("uncaught {0}")]
    Thrown(Throwable),
    #[error("Unknown Exception")]
    Unknown,
}

impl AutoloadError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AutoloadError::Fatal(_))
    }
}

impl From<Throwable> for AutoloadError {
    fn from(t: Throwable) -> Self {
        AutoloadError::Thrown(t)
    }
}

/// Why a resolution attempt ended without the symbol. Used for diagnostics
/// only; none of these reach the caller as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    NotFound,
    LoadError,
    InvalidName,
    CycleDetected,
    HandlerDecodeError,
}

impl fmt::Display for Miss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Miss::NotFound => "not-found",
            Miss::LoadError => "load-error",
            Miss::InvalidName => "invalid-name",
            Miss::CycleDetected => "cycle-detected",
            Miss::HandlerDecodeError => "handler-decode-error",
        };
        f.write_str(s)
    }
}
