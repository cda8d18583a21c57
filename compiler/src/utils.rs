/// Renders `text` as a double-quoted JSON string literal, which is also a
/// valid TypeScript string literal.
pub fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
