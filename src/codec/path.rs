//! Item paths: root-to-item name sequences and their encoded form.

use std::fmt;

use super::{decode, encode};
use crate::constants::{LIST_DELIMITER, PATH_SEPARATOR};
use crate::core::GdscanError;

/// One root-to-item path.
///
/// Holds the raw names (for programmatic use) together with the encoded string
/// (each name encoded, joined by `/`). Paths are immutable; [`ItemPath::append`]
/// returns a new, longer path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemPath {
    names: Vec<String>,
    encoded: String,
}

impl ItemPath {
    /// Path consisting of a single root item.
    pub fn root(name: impl Into<String>) -> Self {
        Self::from_names(vec![name.into()])
    }

    /// Build a path from names ordered root first.
    pub fn from_names(names: Vec<String>) -> Self {
        let encoded = encode_path(&names);
        Self {
            names,
            encoded,
        }
    }

    /// A new path with `name` appended as the last segment.
    #[must_use]
    pub fn append(&self, name: &str) -> Self {
        let mut names = Vec::with_capacity(self.names.len() + 1);
        names.extend(self.names.iter().cloned());
        names.push(name.to_string());

        let mut encoded = String::with_capacity(self.encoded.len() + name.len() + 1);
        encoded.push_str(&self.encoded);
        encoded.push(PATH_SEPARATOR);
        encoded.push_str(&encode(name));

        Self {
            names,
            encoded,
        }
    }

    /// Raw names, root first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Encoded form, safe to split on `/` and to join with `,`.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Encode every name and join them with `/`.
pub fn encode_path<S: AsRef<str>>(names: &[S]) -> String {
    let separator = PATH_SEPARATOR.to_string();
    names.iter().map(|n| encode(n.as_ref())).collect::<Vec<_>>().join(&separator)
}

/// Split an encoded path on `/` and decode each segment.
///
/// # Errors
///
/// Returns [`GdscanError::Decode`] if any segment is malformed.
pub fn decode_path(text: &str) -> Result<Vec<String>, GdscanError> {
    text.split(PATH_SEPARATOR).map(decode).collect()
}

/// Decode several encoded paths joined by `,`, as found in a report's `paths` column.
///
/// An empty string decodes to no paths. A lone root path whose name is empty also
/// encodes to `""`, so such a cell reads back as no paths; the two cannot be told
/// apart.
///
/// # Errors
///
/// Returns [`GdscanError::Decode`] if any path is malformed.
pub fn decode_path_list(text: &str) -> Result<Vec<Vec<String>>, GdscanError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(LIST_DELIMITER).map(decode_path).collect()
}
