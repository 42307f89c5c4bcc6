//! Extracting a JSON tree from raw generator output.

use crate::core::error::StructuralError;
use serde_json::Value;

/// Strip a surrounding Markdown code fence, if present.
///
/// Handles both ```` ```json ```` and bare ```` ``` ```` fences; text outside
/// the first fenced block is ignored.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_ticks = &trimmed[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the line
    let body = match after_ticks.find('\n') {
        Some(newline) => &after_ticks[newline + 1..],
        None => after_ticks,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Parse generator output into a JSON value.
pub fn parse_output(raw: &str) -> Result<Value, StructuralError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(StructuralError::parse("empty response"));
    }
    serde_json::from_str(text).map_err(|e| StructuralError::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StructuralErrorKind;

    #[test]
    fn test_plain_json() {
        let value = parse_output(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_fenced_json() {
        let raw = "Here is the artifact:\n```json\n{\"a\": [1, 2]}\n```\nLet me know.";
        let value = parse_output(raw).unwrap();
        assert_eq!(value["a"][1], 2);

        let bare = "```\n{\"b\": true}\n```";
        assert_eq!(parse_output(bare).unwrap()["b"], true);
    }

    #[test]
    fn test_malformed_output() {
        let err = parse_output("{\"a\": ").unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::Parse);
        assert_eq!(err.path, "$");

        let err = parse_output("   ").unwrap_err();
        assert_eq!(err.kind, StructuralErrorKind::Parse);
    }
}
