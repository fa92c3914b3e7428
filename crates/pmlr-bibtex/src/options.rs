//! Run options.
//!
//! Every field has a default, so an options file only needs to name what it
//! changes:
//!
//! ```toml
//! text_fields = ["title", "abstract", "author", "editor"]
//! escape_special_fields = ["abstract", "note"]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixOptions {
    /// Fields run through character mapping and quote rewriting.
    pub text_fields: Vec<String>,
    /// Fields whose `%` and `&` get a backslash.
    pub escape_special_fields: Vec<String>,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            text_fields: ["title", "abstract", "author", "editor", "booktitle", "name", "address"]
                .into_iter()
                .map(String::from)
                .collect(),
            escape_special_fields: vec!["abstract".to_string()],
        }
    }
}

impl FixOptions {
    pub fn is_text_field(&self, name: &str) -> bool {
        self.text_fields.iter().any(|f| f.eq_ignore_ascii_case(name))
    }

    pub fn escapes_specials(&self, name: &str) -> bool {
        self.escape_special_fields
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }
}
