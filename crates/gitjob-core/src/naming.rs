//! Normalization of arbitrary text into Kubernetes label values.
//!
//! Repository names and commit identifiers come from outside the cluster and
//! may contain anything. Before they are used as label values or as parts of
//! a resource name they are folded into the restricted label alphabet:
//! lowercase ASCII letters, digits, `.` and `-`, starting and ending with an
//! alphanumeric character, at most 63 characters long.

use derive_more::Display;
use serde::Serialize;

/// Maximum length of a Kubernetes label value.
pub const MAX_LABEL_VALUE_LEN: usize = 63;

/// Value used when the input normalizes to nothing.
pub const PLACEHOLDER_VALUE: &str = "unknown";

/// A string that is known to be a valid label value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct LabelValue(String);

impl LabelValue {
    /// Normalize `raw` into a label value.
    pub fn new(raw: &str) -> Self {
        Self(to_valid_value(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LabelValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<LabelValue> for String {
    fn from(value: LabelValue) -> Self {
        value.0
    }
}

impl PartialEq<str> for LabelValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LabelValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Convert arbitrary text into a valid label value.
///
/// ASCII letters and digits are kept (lowercased) along with `.`; every run of
/// any other characters collapses into a single `-`. Leading and trailing
/// non-alphanumerics are dropped, the result is bounded to
/// [`MAX_LABEL_VALUE_LEN`], and an empty result becomes [`PLACEHOLDER_VALUE`].
pub fn to_valid_value(raw: &str) -> String {
    let mut buffer = String::with_capacity(raw.len().min(MAX_LABEL_VALUE_LEN));
    let mut pending_dash = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' {
            if pending_dash && !buffer.is_empty() {
                buffer.push('-');
            }
            pending_dash = false;
            buffer.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    let trimmed = buffer.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let bounded =
        trim_length(trimmed, MAX_LABEL_VALUE_LEN).trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

    if bounded.is_empty() {
        PLACEHOLDER_VALUE.to_string()
    } else {
        bounded.to_string()
    }
}

/// Keep at most the first `length` characters of `text`.
pub fn trim_length(text: &str, length: usize) -> &str {
    match text.char_indices().nth(length) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
