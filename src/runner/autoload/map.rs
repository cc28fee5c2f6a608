use std::collections::HashMap;

use crate::runner::ds::symbol::{fold_case, SymbolKind, FAILURE_TAG};
use crate::runner::ds::value::Value;

/// The declarative name → file table consulted before any handler runs.
///
/// Keyed by kind tag. Each kind maps canonical symbol names to unit paths;
/// the `"failure"` key holds the failure callback. The map is stored as the
/// runtime handed it over, so a section that is not a dict, or an entry that
/// is not a string, is simply never matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionMap {
    entries: HashMap<String, Value>,
}

impl ResolutionMap {
    pub fn new() -> Self {
        ResolutionMap {
            entries: HashMap::new(),
        }
    }

    /// Takes over a runtime dict. Returns `None` for anything else.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Dict(entries) => Some(ResolutionMap { entries }),
            _ => None,
        }
    }

    pub fn builder() -> ResolutionMapBuilder {
        ResolutionMapBuilder {
            map: ResolutionMap::new(),
        }
    }

    /// The name table for `kind`, if present and well formed.
    pub fn section(&self, kind: SymbolKind) -> Option<&HashMap<String, Value>> {
        self.entries.get(kind.tag()).and_then(Value::as_dict)
    }

    /// The unit path mapped to an already canonicalized name.
    pub fn path_for(&self, kind: SymbolKind, canonical_name: &str) -> Option<&str> {
        self.section(kind)?.get(canonical_name)?.as_str()
    }

    pub fn failure_callback(&self) -> Option<&Value> {
        self.entries.get(FAILURE_TAG).filter(|v| !v.is_null())
    }

    /// Well-formed `(name, path)` pairs of one kind, sorted by name.
    pub fn entries(&self, kind: SymbolKind) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .section(kind)
            .into_iter()
            .flat_map(|section| section.iter())
            .filter_map(|(name, path)| path.as_str().map(|p| (name.as_str(), p)))
            .collect();
        out.sort_unstable();
        out
    }
}

/// Prepends `root` to paths that are not absolute. The root is joined as a
/// plain string, so it normally ends with a separator.
pub fn join_root(root: &str, path: &str) -> String {
    if path.starts_with('/') || root.is_empty() {
        path.to_string()
    } else {
        format!("{}{}", root, path)
    }
}

pub struct ResolutionMapBuilder {
    map: ResolutionMap,
}

impl ResolutionMapBuilder {
    /// Maps `name` to `path`. Names of case-insensitive kinds are stored
    /// lowercased, matching how lookups canonicalize them.
    pub fn entry(mut self, kind: SymbolKind, name: &str, path: impl Into<String>) -> Self {
        let key = fold_case(name, kind.folds_case()).into_owned();
        let section = self
            .map
            .entries
            .entry(kind.tag().to_string())
            .or_insert_with(|| Value::Dict(HashMap::new()));
        if let Value::Dict(section) = section {
            section.insert(key, Value::Str(path.into()));
        }
        self
    }

    pub fn class(self, name: &str, path: impl Into<String>) -> Self {
        self.entry(SymbolKind::Class, name, path)
    }

    pub fn function(self, name: &str, path: impl Into<String>) -> Self {
        self.entry(SymbolKind::Function, name, path)
    }

    pub fn constant(self, name: &str, path: impl Into<String>) -> Self {
        self.entry(SymbolKind::Constant, name, path)
    }

    pub fn type_alias(self, name: &str, path: impl Into<String>) -> Self {
        self.entry(SymbolKind::Type, name, path)
    }

    pub fn record(self, name: &str, path: impl Into<String>) -> Self {
        self.entry(SymbolKind::Record, name, path)
    }

    pub fn failure(mut self, callback: impl Into<Value>) -> Self {
        self.map
            .entries
            .insert(FAILURE_TAG.to_string(), callback.into());
        self
    }

    /// Stores `value` under `tag` without any checking.
    pub fn raw(mut self, tag: &str, value: Value) -> Self {
        self.map.entries.insert(tag.to_string(), value);
        self
    }

    pub fn build(self) -> ResolutionMap {
        self.map
    }
}
