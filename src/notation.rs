/// Reads the custom-type hint a field description may carry as its leading
/// bold-markdown token, e.g. `"**Date** Enter a date"` yields `"date"`.
/// Returns `None` when the description does not start with one.
pub fn extract_field_type_notation(description: &str) -> Option<String> {
    let rest = description.trim_start().strip_prefix("**")?;
    let end = rest.find("**")?;
    let token = &rest[..end];
    if token.is_empty() || token.contains('*') {
        return None;
    }
    Some(token.to_lowercase())
}
