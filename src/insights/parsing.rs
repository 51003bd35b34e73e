//! JSON parsing for generative model responses.
//!
//! Model output is unpredictable: the JSON may arrive wrapped in markdown
//! fences, surrounded by prose, or malformed. Parsing degrades to an empty
//! [`ContentInsights`] with a warning instead of failing the request.

use super::ContentInsights;

/// Parse a raw model response into [`ContentInsights`].
///
/// Handles clean JSON objects, fenced JSON (` ```json ... ``` `), objects
/// surrounded by prose, and invalid JSON (empty insights with a warning).
pub fn parse_insights_json(response: &str) -> ContentInsights {
    let json_str = extract_json_object(response);

    match serde_json::from_str::<ContentInsights>(&json_str) {
        Ok(insights) => insights,
        Err(e) => {
            tracing::warn!("Failed to parse insights JSON: {}. Response: {}", e, response);
            ContentInsights::default()
        }
    }
}

/// Extract a JSON object from a response that may contain extra text.
///
/// Tries the following strategies in order:
/// 1. Strip markdown code fences (` ```json ... ``` `)
/// 2. If the (cleaned) text starts with `{`, find matching `}`
/// 3. Search for the first `{` in the text and find its matching `}`
/// 4. Fall back to returning the original text as-is
pub fn extract_json_object(response: &str) -> String {
    let response = response.trim();

    let stripped = strip_code_fences(response);

    if stripped.starts_with('{')
        && let Some(end) = find_matching_brace(stripped)
    {
        return stripped[..=end].to_string();
    }

    if let Some(start) = stripped.find('{')
        && let Some(end) = find_matching_brace(&stripped[start..])
    {
        return stripped[start..=start + end].to_string();
    }

    stripped.to_string()
}

/// Strip markdown code fences (``` or ```json) from around content.
fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();

    if s.starts_with("```") {
        if let Some(first_newline) = s.find('\n') {
            let inner = &s[first_newline + 1..];
            if let Some(closing) = inner.rfind("```") {
                return inner[..closing].trim();
            }
        }
    }

    s
}

/// Find the index of the `}` that matches the first `{` in the string.
///
/// Returns `None` if braces are unbalanced. Braces inside JSON strings are
/// ignored, with escape handling.
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if c == '\\' && in_string {
            escape_next = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── extract_json_object ─────────────────────────────────────────────

    #[test]
    fn test_extract_clean_object() {
        let input = r##"{"caption":"hi","hashtags":["#a"]}"##;
        assert_eq!(extract_json_object(input), input);
    }

    #[test]
    fn test_extract_with_leading_text() {
        let input = r#"Sure! Here is the analysis: {"caption":"hi"}"#;
        let result = extract_json_object(input);
        assert!(result.starts_with('{'));
        assert!(result.ends_with('}'));
        assert!(result.contains("\"caption\""));
    }

    #[test]
    fn test_extract_with_trailing_text() {
        let input = r#"{"caption":"hi"} Hope this helps!"#;
        let result = extract_json_object(input);
        assert_eq!(result, r#"{"caption":"hi"}"#);
    }

    #[test]
    fn test_extract_with_markdown_fences() {
        let input = "```json\n{\"caption\":\"hi\"}\n```";
        assert_eq!(extract_json_object(input), r#"{"caption":"hi"}"#);
    }

    #[test]
    fn test_extract_with_plain_fences() {
        let input = "```\n{\"caption\":\"hi\"}\n```";
        assert_eq!(extract_json_object(input), r#"{"caption":"hi"}"#);
    }

    #[test]
    fn test_extract_no_json_returns_input() {
        let input = "I could not analyze this text.";
        assert_eq!(extract_json_object(input), input);
    }

    #[test]
    fn test_extract_braces_inside_strings_ignored() {
        let input = r#"{"caption":"use {curly} braces"}"#;
        let result = extract_json_object(input);
        assert_eq!(result, input);
    }

    #[test]
    fn test_extract_nested_object() {
        let input = r#"{"outer":{"inner":1},"caption":"x"}"#;
        assert_eq!(extract_json_object(input), input);
    }

    // ── find_matching_brace ─────────────────────────────────────────────

    #[test]
    fn test_brace_simple() {
        assert_eq!(find_matching_brace("{abc}"), Some(4));
    }

    #[test]
    fn test_brace_nested() {
        assert_eq!(find_matching_brace("{{a},{b}}"), Some(8));
    }

    #[test]
    fn test_brace_unbalanced() {
        assert_eq!(find_matching_brace("{abc"), None);
    }

    #[test]
    fn test_brace_string_with_brace() {
        assert_eq!(find_matching_brace(r#"{"a}b"}"#), Some(6));
    }

    #[test]
    fn test_brace_escaped_quote() {
        assert_eq!(find_matching_brace(r#"{"a\"b"}"#), Some(7));
    }

    // ── strip_code_fences ───────────────────────────────────────────────

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_plain_fences() {
        assert_eq!(strip_code_fences("```\nhello\n```"), "hello");
    }

    #[test]
    fn test_strip_no_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    // ── parse_insights_json ─────────────────────────────────────────────

    #[test]
    fn test_parse_full_payload() {
        let input = r##"{
            "caption": "Ship faster with focused tooling",
            "hashtags": ["#rust", "#tooling", "#productivity", "#devtools", "#engineering", "#software", "#builders"],
            "suggestions": ["s1","s2","s3","s4","s5","s6","s7","s8","s9","s10"],
            "tone": "positive",
            "confidence": 0.82
        }"##;
        let insights = parse_insights_json(input);
        assert_eq!(insights.caption.as_deref(), Some("Ship faster with focused tooling"));
        assert_eq!(insights.hashtags.len(), 7);
        assert_eq!(insights.suggestions.len(), 10);
        assert_eq!(insights.tone.as_deref(), Some("positive"));
        assert_eq!(insights.confidence, Some(0.82));
    }

    #[test]
    fn test_parse_missing_keys_default() {
        let insights = parse_insights_json(r#"{"caption":"only a caption"}"#);
        assert_eq!(insights.caption.as_deref(), Some("only a caption"));
        assert!(insights.hashtags.is_empty());
        assert!(insights.suggestions.is_empty());
        assert_eq!(insights.tone, None);
        assert_eq!(insights.confidence, None);
    }

    #[test]
    fn test_parse_wrapped_in_prose_and_fences() {
        let input = r##"Here is the JSON you asked for:

```json
{
  "caption": "A better Monday post",
  "hashtags": ["#monday"],
  "suggestions": ["shorten the intro"],
  "tone": "neutral",
  "confidence": 0.5
}
```

Let me know if you need anything else."##;
        let insights = parse_insights_json(input);
        assert_eq!(insights.caption.as_deref(), Some("A better Monday post"));
        assert_eq!(insights.tone.as_deref(), Some("neutral"));
    }

    #[test]
    fn test_parse_invalid_json_returns_default() {
        let insights = parse_insights_json("This is not JSON at all.");
        assert_eq!(insights, ContentInsights::default());
    }

    #[test]
    fn test_parse_wrong_types_return_default() {
        // A string confidence cannot be coerced; degrade to empty insights.
        let insights = parse_insights_json(r#"{"caption":"x","confidence":"high"}"#);
        assert_eq!(insights, ContentInsights::default());
    }

    #[test]
    fn test_parse_unicode_escapes() {
        let insights = parse_insights_json(r#"{"caption":"café culture"}"#);
        assert_eq!(insights.caption.as_deref(), Some("café culture"));
    }
}
