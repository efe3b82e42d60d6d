//! Reversible encoding of item names.
//!
//! Drive item names may contain any character, including the path separator `/` and
//! the list delimiter `,` that the report uses to join several paths (or owners, or
//! grants) inside one CSV field. Encoding a name makes it safe to embed in both
//! structures while keeping it readable:
//!
//! 1. The name is escaped as the body of a JSON string literal: quotes, backslashes
//!    and control characters become `\"`, `\\`, `\n`, `\u001f` and so on. Every other
//!    character, non-ASCII text included, passes through unchanged.
//! 2. Every `,` becomes `\54` and every `/` becomes `\57` (their code points in
//!    octal). Neither token is a valid JSON escape, so they can never be produced by
//!    step 1.
//!
//! [`decode`] reverses the two steps in the opposite order. It tokenizes escapes
//! left to right, so an escaped backslash followed by digits (`\\54`, the encoding
//! of the literal text `\54`) is never mistaken for a delimiter token.
//!
//! ```
//! use gdscan::codec::{decode, encode};
//!
//! let encoded = encode("Q1/Q2, \"final\"");
//! assert_eq!(encoded, r#"Q1\57Q2\54 \"final\""#);
//! assert_eq!(decode(&encoded).unwrap(), "Q1/Q2, \"final\"");
//! ```

mod path;

pub use path::{ItemPath, decode_path, decode_path_list, encode_path};

use crate::constants::{LIST_DELIMITER, PATH_SEPARATOR};
use crate::core::GdscanError;

/// Escape token for [`PATH_SEPARATOR`].
const SEPARATOR_ESCAPE: &str = "\\57";

/// Escape token for [`LIST_DELIMITER`].
const DELIMITER_ESCAPE: &str = "\\54";

/// Encode a single item name.
///
/// The result never contains a raw `/` or `,`, and `decode(&encode(name)) == name`
/// for every string.
#[must_use]
pub fn encode(name: &str) -> String {
    let literal = serde_json::Value::String(name.to_owned()).to_string();
    let body = &literal[1..literal.len() - 1];

    let mut encoded = String::with_capacity(body.len());
    for c in body.chars() {
        match c {
            PATH_SEPARATOR => encoded.push_str(SEPARATOR_ESCAPE),
            LIST_DELIMITER => encoded.push_str(DELIMITER_ESCAPE),
            c => encoded.push(c),
        }
    }
    encoded
}

/// Decode text produced by [`encode`].
///
/// # Errors
///
/// Returns [`GdscanError::Decode`] if the text contains an unescaped separator or
/// delimiter, a dangling backslash, an unknown escape sequence, or an unescaped
/// character that a JSON string literal does not allow.
pub fn decode(text: &str) -> Result<String, GdscanError> {
    let malformed = |reason: String| GdscanError::Decode {
        text: text.to_string(),
        reason,
    };

    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');

    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('5') => match chars.next() {
                    Some('4') => literal.push(LIST_DELIMITER),
                    Some('7') => literal.push(PATH_SEPARATOR),
                    Some(other) => {
                        return Err(malformed(format!("unknown escape sequence '\\5{other}'")));
                    }
                    None => return Err(malformed("truncated escape sequence '\\5'".to_string())),
                },
                // Left for the JSON parser, which validates the escape
                Some(next) => {
                    literal.push('\\');
                    literal.push(next);
                }
                None => return Err(malformed("dangling backslash at end of text".to_string())),
            },
            PATH_SEPARATOR | LIST_DELIMITER => {
                return Err(malformed(format!("unescaped '{c}'")));
            }
            c => literal.push(c),
        }
    }
    literal.push('"');

    serde_json::from_str::<String>(&literal).map_err(|e| malformed(e.to_string()))
}
