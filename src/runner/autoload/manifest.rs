//! Resolution map manifests.
//!
//! A manifest is a small line-based file describing a [`ResolutionMap`]:
//!
//! ```text
//! # generated by the build
//! root = "/srv/app/"
//! failure = "on_autoload_miss"
//!
//! [class]
//! foo = "src/Foo.php"
//! "ns\\bar" = "src/Ns/Bar.php"
//!
//! [function]
//! helper = "src/helpers.php"
//! ```
//!
//! Top-level keys come before the first section. Sections are named after
//! symbol kinds; names in case-insensitive kinds are stored lowercased.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

use crate::runner::autoload::autoloader::Autoloader;
use crate::runner::autoload::map::ResolutionMap;
use crate::runner::ds::symbol::{fold_case, SymbolKind};
use crate::runner::ds::value::Value;

#[derive(Parser)]
#[grammar = "runner/autoload/manifest.pest"] // relative to src
pub struct ManifestParser;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error reading {}: {}", .path.display(), .error)]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("manifest syntax error: {0}")]
    Syntax(#[from] Box<Error<Rule>>),

    #[error("unknown section [{0}]")]
    UnknownSection(String),

    #[error("unknown key '{0}' outside of a section")]
    UnknownKey(String),

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
}

/// A parsed manifest: the map and the root its relative paths hang off.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub root: String,
    pub map: ResolutionMap,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|error| ManifestError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let pairs = ManifestParser::parse(Rule::manifest, content).map_err(Box::new)?;

        let mut root: Option<String> = None;
        let mut failure: Option<String> = None;
        let mut section: Option<SymbolKind> = None;
        let mut seen = HashSet::new();
        let mut builder = ResolutionMap::builder();

        for pair in pairs.flat_map(|p| p.into_inner()) {
            match pair.as_rule() {
                Rule::header => {
                    let tag = key_text(first_child(&pair)?)?;
                    section = Some(SymbolKind::from_tag(&tag).ok_or(ManifestError::UnknownSection(tag))?);
                }
                Rule::entry => {
                    let mut children = pair.clone().into_inner();
                    let (key, value) = match (children.next(), children.next()) {
                        (Some(key), Some(value)) => (key_text(key)?, unquote(value)?),
                        _ => return Err(unexpected(&pair)),
                    };
                    match section {
                        None => {
                            let slot = match key.as_str() {
                                "root" => &mut root,
                                "failure" => &mut failure,
                                _ => return Err(ManifestError::UnknownKey(key)),
                            };
                            if slot.is_some() {
                                return Err(ManifestError::DuplicateKey(key));
                            }
                            *slot = Some(value);
                        }
                        Some(kind) => {
                            let canonical = fold_case(&key, kind.folds_case()).into_owned();
                            if !seen.insert((kind, canonical)) {
                                return Err(ManifestError::DuplicateKey(format!("{}.{}", kind, key)));
                            }
                            builder = builder.entry(kind, &key, value);
                        }
                    }
                }
                Rule::EOI => { /* Do nothing */ }
                _ => return Err(unexpected(&pair)),
            }
        }

        if let Some(callback) = failure {
            builder = builder.failure(Value::Str(callback));
        }
        Ok(Manifest {
            root: root.unwrap_or_default(),
            map: builder.build(),
        })
    }

    /// Installs the map on a request's autoloader.
    pub fn install(self, autoloader: &mut Autoloader) -> bool {
        autoloader.set_map(self.map, self.root)
    }
}

fn unexpected(pair: &Pair<Rule>) -> ManifestError {
    let message = format!("Unexpected state reached [{:?}]", pair.as_rule());
    ManifestError::Syntax(Box::new(Error::new_from_span(
        ErrorVariant::CustomError { message },
        pair.as_span(),
    )))
}

fn first_child<'i>(pair: &Pair<'i, Rule>) -> Result<Pair<'i, Rule>, ManifestError> {
    pair.clone().into_inner().next().ok_or_else(|| unexpected(pair))
}

fn key_text(key: Pair<Rule>) -> Result<String, ManifestError> {
    let inner = first_child(&key)?;
    match inner.as_rule() {
        Rule::bare_key => Ok(inner.as_str().to_string()),
        Rule::quoted => unquote(inner),
        _ => Err(unexpected(&inner)),
    }
}

fn unquote(quoted: Pair<Rule>) -> Result<String, ManifestError> {
    let raw = first_child(&quoted)?.as_str();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => return Err(unexpected(&quoted)),
        }
    }
    Ok(out)
}
