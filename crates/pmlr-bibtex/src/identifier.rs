//! ASCII folding of entry identifiers and collision resolution.
//!
//! Identifiers are processed strictly in record encounter order: whether an
//! identifier gets a `_N` suffix depends on which identifiers were assigned
//! before it. [`IdentifierRegistry`] owns that state for one batch.

use indexmap::IndexMap;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Original identifier to the identifier it was rewritten to, in the order
/// the rewrites happened.
pub type IdentifierMap = IndexMap<String, String>;

/// Reduce an identifier to ASCII.
///
/// `ß` is expanded first since compatibility decomposition leaves it alone.
/// After NFKD every remaining code point above ASCII (the now-separate
/// combining marks, plus anything without an ASCII base) is dropped.
pub fn fold_identifier(original: &str) -> String {
    original
        .replace('ß', "ss")
        .nfkd()
        .filter(char::is_ascii)
        .collect()
}

/// The identifier `original` must be renamed to, if any.
///
/// Returns `None` for pure-ASCII identifiers and for identifiers that fold to
/// themselves. Otherwise the folded form, with `_1`, `_2`, ... appended until
/// it is absent from `used`. The caller must add the result to `used` before
/// resolving the next identifier.
pub fn resolve_identifier(original: &str, used: &HashSet<String>) -> Option<String> {
    if original.is_ascii() {
        return None;
    }

    let folded = fold_identifier(original);
    if folded == original {
        return None;
    }

    Some(unique_identifier(&folded, used))
}

fn unique_identifier(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Used identifiers and the rewrites performed so far in one batch.
#[derive(Debug, Default, Clone)]
pub struct IdentifierRegistry {
    used: HashSet<String>,
    changes: IdentifierMap,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that already knows the identifiers which will never be
    /// rewritten, so a folded identifier cannot take the name of an entry
    /// that appears later in the batch.
    pub fn seeded<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used: reserved.into_iter().map(Into::into).collect(),
            changes: IdentifierMap::new(),
        }
    }

    /// Assign the final identifier for `original` and record it as used.
    pub fn assign(&mut self, original: &str) -> String {
        let assigned = match resolve_identifier(original, &self.used) {
            Some(normalized) => {
                self.changes.insert(original.to_string(), normalized.clone());
                normalized
            }
            None => original.to_string(),
        };
        self.used.insert(assigned.clone());
        assigned
    }

    pub fn changes(&self) -> &IdentifierMap {
        &self.changes
    }

    pub fn into_changes(self) -> IdentifierMap {
        self.changes
    }
}
