use std::borrow::Cow;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The kinds of symbol the autoloader can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Function,
    Constant,
    Type,
    Record,
}

/// Map key holding the failure callback rather than a name table.
pub const FAILURE_TAG: &str = "failure";

/// Name of the single global autoload function that predates handler chains.
pub const MAGIC_AUTOLOAD: &str = "__autoload";

const INOUT_SUFFIX: &str = "$inout";

impl SymbolKind {
    pub const ALL: [SymbolKind; 5] = [
        SymbolKind::Class,
        SymbolKind::Function,
        SymbolKind::Constant,
        SymbolKind::Type,
        SymbolKind::Record,
    ];

    /// The tag used both as a resolution-map key and as the first argument
    /// to the failure callback.
    pub fn tag(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
            SymbolKind::Type => "type",
            SymbolKind::Record => "record",
        }
    }

    pub fn from_tag(tag: &str) -> Option<SymbolKind> {
        SymbolKind::ALL.iter().copied().find(|k| k.tag() == tag)
    }

    /// Constants are case-sensitive; every other kind is looked up lowercased.
    pub fn folds_case(self) -> bool {
        !matches!(self, SymbolKind::Constant)
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

lazy_static! {
    static ref CLASS_NAME_BYTES: [bool; 256] = {
        let mut table = [false; 256];
        for b in 0..=255u8 {
            table[b as usize] = b.is_ascii_alphanumeric() || b == b'_' || b == b'\\' || b >= 0x7f;
        }
        table
    };
}

/// Drops one leading namespace separator.
pub fn normalize_ns(name: &str) -> &str {
    name.strip_prefix('\\').unwrap_or(name)
}

pub fn fold_case(name: &str, fold: bool) -> Cow<'_, str> {
    if fold && name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// The map key for `name`: namespace-normalized, then lowercased if `fold`.
pub fn canonical_name(name: &str, fold: bool) -> Cow<'_, str> {
    fold_case(normalize_ns(name), fold)
}

/// Class names may only contain ASCII alphanumerics, `_`, `\` and bytes
/// from 0x7f up.
pub fn is_valid_class_name(name: &str) -> bool {
    name.bytes().all(|b| CLASS_NAME_BYTES[b as usize])
}

/// Strips the reference-parameter-mode mangling from a function name:
/// `foo$inout` and `foo$0;2$inout` both become `foo`.
pub fn strip_inout_suffix(name: &str) -> &str {
    let base = match name.strip_suffix(INOUT_SUFFIX) {
        Some(base) => base,
        None => return name,
    };
    match base.rfind('$') {
        Some(idx)
            if idx + 1 < base.len()
                && base[idx + 1..].bytes().all(|b| b.is_ascii_digit() || b == b';') =>
        {
            &base[..idx]
        }
        _ => base,
    }
}
