/// Block tag that marks the custom-params schema inside a node's source text,
/// JSDoc style: `/** @CustomParams { ... } */`.
pub const CUSTOM_PARAMS_TAG: &str = "@CustomParams";

/// Scans source text for the schema marker and returns the JSON object blob
/// that follows it. The scan is brace-balanced and string-aware, so nested
/// objects and `}` inside string literals are handled; it never parses the
/// blob itself.
pub fn extract_custom_params_blob(code: &str) -> Option<&str> {
    let tag_at = code.find(CUSTOM_PARAMS_TAG)?;
    let rest = &code[tag_at + CUSTOM_PARAMS_TAG.len()..];
    let open = rest.find('{')?;
    if !rest[..open].chars().all(char::is_whitespace) {
        return None;
    }
    let blob = &rest[open..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in blob.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&blob[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_blob_from_comment() {
        let code = r#"/** @CustomParams {"a":{"type":"string"}} */ var x = 1;"#;
        assert_eq!(
            extract_custom_params_blob(code),
            Some(r#"{"a":{"type":"string"}}"#)
        );
    }

    #[test]
    fn balances_nested_braces_and_strings() {
        let code = r#"/** @CustomParams {"a":{"description":"closing } brace","options":{"multiple":true}}} */"#;
        assert_eq!(
            extract_custom_params_blob(code),
            Some(r#"{"a":{"description":"closing } brace","options":{"multiple":true}}}"#)
        );
    }

    #[test]
    fn returns_none_without_marker() {
        assert_eq!(extract_custom_params_blob("var a = 43;"), None);
        assert_eq!(extract_custom_params_blob("/** @CustomParams */"), None);
        assert_eq!(extract_custom_params_blob("/** @CustomParams {unterminated"), None);
    }
}
