//! Minimal `$`-rooted path queries over JSON values.
//!
//! Supports `$`, `$.field`, `$.field.nested`, `$.array[0]` and
//! `$.array[*]` (which yields the whole array).

use serde_json::Value;
use thiserror::Error;

/// The path expression itself is malformed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JsonPathError {
    /// Paths must start at the root.
    #[error("JSON path must start with '$': {0}")]
    MissingRoot(String),
    /// Bracket contents are not an index or `*`.
    #[error("invalid array index '{0}'")]
    InvalidIndex(String),
}

/// Resolves `path` against `json`.
///
/// Returns `Ok(None)` when the path is well formed but leads nowhere.
///
/// # Errors
///
/// Returns an error if the path does not parse.
pub fn query_json_path<'a>(json: &'a Value, path: &str) -> Result<Option<&'a Value>, JsonPathError> {
    let trimmed = path.trim();
    let Some(rest) = trimmed.strip_prefix('$') else {
        return Err(JsonPathError::MissingRoot(trimmed.to_string()));
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);

    let mut current = json;
    for segment in split_segments(rest) {
        let (name, index) = match segment.find('[') {
            Some(open) if segment.ends_with(']') => {
                (&segment[..open], Some(&segment[open + 1..segment.len() - 1]))
            }
            _ => (segment, None),
        };

        if !name.is_empty() {
            match current.get(name) {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }

        match index {
            None => {}
            Some("*") => return Ok(Some(current)),
            Some(raw) => {
                let idx: usize = raw
                    .parse()
                    .map_err(|_| JsonPathError::InvalidIndex(raw.to_string()))?;
                match current.get(idx) {
                    Some(value) => current = value,
                    None => return Ok(None),
                }
            }
        }
    }

    Ok(Some(current))
}

/// Splits on dots outside brackets.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (i, ch) in path.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                if i > start {
                    segments.push(&path[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < path.len() {
        segments.push(&path[start..]);
    }
    segments
}
