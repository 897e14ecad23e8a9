//! JSON extraction from free-form model replies
//!
//! Models tend to wrap JSON in prose or code fences. The payload is taken as
//! everything from the first opening bracket to the last closing one.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON {0} found in response")]
    Missing(&'static str),
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Text from the first `open` to the last `close`, inclusive.
pub fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..end + close.len_utf8()])
}

/// Parse the `[...]` slice of `text`.
pub fn extract_array<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let json = slice_between(text, '[', ']').ok_or(ExtractError::Missing("array"))?;
    Ok(serde_json::from_str(json)?)
}

/// Parse the `{...}` slice of `text`.
pub fn extract_object<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let json = slice_between(text, '{', '}').ok_or(ExtractError::Missing("object"))?;
    Ok(serde_json::from_str(json)?)
}
