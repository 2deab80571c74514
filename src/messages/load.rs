// src/messages/load.rs
// =============================================================================
// Loads the message store from disk.
//
// Supported formats:
// - .jsonl / .ndjson: one JSON value per non-empty line
// - anything else: a single JSON document; a top-level array yields its
//   elements, any other value becomes a single message
//
// A missing file is reported as LoadError::NotFound, which aborts the run.
// =============================================================================

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::LoadError;

pub fn load_messages(path: &Path) -> Result<Vec<Value>, LoadError> {
    info!(path = %path.display(), "loading messages");

    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let messages = if is_json_lines(path) {
        parse_json_lines(path, &contents)?
    } else {
        parse_document(path, &contents)?
    };

    info!(messages = messages.len(), "messages loaded");
    Ok(messages)
}

// Keeps only the first `limit` messages when a limit is set
pub fn apply_limit(mut messages: Vec<Value>, limit: Option<usize>) -> Vec<Value> {
    let total = messages.len();

    match limit {
        None => {
            info!(total, "no message limit, processing everything");
        }
        Some(limit) => {
            messages.truncate(limit);
            info!(limit, processed = messages.len(), total, "message limit applied");
        }
    }

    messages
}

// Text a message contributes to URL extraction
//
// Strings are used as-is; anything else is rendered as compact JSON so URLs
// nested inside objects are still visible.
pub fn message_text(message: &Value) -> Cow<'_, str> {
    match message {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

fn is_json_lines(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("jsonl") | Some("ndjson")
    )
}

fn parse_json_lines(path: &Path, contents: &str) -> Result<Vec<Value>, LoadError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}

fn parse_document(path: &Path, contents: &str) -> Result<Vec<Value>, LoadError> {
    let document: Value = serde_json::from_str(contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        line: source.line(),
        source,
    })?;

    match document {
        Value::Array(items) => Ok(items),
        other => {
            warn!("message store is not a JSON array, treating it as a single message");
            Ok(vec![other])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn store(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_array() {
        let file = store(".json", r#"["see bit.ly/abc", {"text": "https://example.com"}]"#);
        let messages = load_messages(file.path()).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], json!("see bit.ly/abc"));
    }

    #[test]
    fn test_load_single_value_is_wrapped() {
        let file = store(".json", r#"{"text": "only one"}"#);
        let messages = load_messages(file.path()).unwrap();

        assert_eq!(messages, vec![json!({"text": "only one"})]);
    }

    #[test]
    fn test_load_json_lines_skips_blank_lines() {
        let file = store(".jsonl", "\"first\"\n\n{\"text\": \"second\"}\n");
        let messages = load_messages(file.path()).unwrap();

        assert_eq!(messages, vec![json!("first"), json!({"text": "second"})]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");

        let err = load_messages(&missing).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(ref p) if p == &missing));
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let file = store(".ndjson", "\"ok\"\n{broken\n");
        let err = load_messages(file.path()).unwrap_err();

        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_apply_limit() {
        let messages = vec![json!("a"), json!("b"), json!("c")];

        assert_eq!(apply_limit(messages.clone(), None).len(), 3);
        assert_eq!(apply_limit(messages.clone(), Some(2)), vec![json!("a"), json!("b")]);
        assert_eq!(apply_limit(messages, Some(10)).len(), 3);
    }

    #[test]
    fn test_message_text() {
        assert_eq!(message_text(&json!("plain text")), "plain text");
        assert_eq!(
            message_text(&json!({"url": "https://a.com/x"})),
            r#"{"url":"https://a.com/x"}"#
        );
    }
}
