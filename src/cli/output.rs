// Every command prints exactly one JSON document: results on stdout,
// failures on stderr. Non-ASCII titles are printed as-is.

use serde::Serialize;
use serde_json::json;

pub fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn print_result<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", render_json(value)?);
    Ok(())
}

pub fn error_json(message: &str) -> String {
    let body = json!({ "ok": false, "error": message });
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
}

pub fn print_error(message: &str) {
    eprintln!("{}", error_json(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_json_shape() {
        let parsed: serde_json::Value = serde_json::from_str(&error_json("Tab not found: 美股")).unwrap();
        assert_eq!(parsed, json!({ "ok": false, "error": "Tab not found: 美股" }));
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let out = render_json(&json!({ "title": "台股" })).unwrap();
        assert!(out.contains("台股"));
        assert!(!out.contains("\\u"));
    }
}
