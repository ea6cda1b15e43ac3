//! Structural search over arbitrary JSON trees.

use serde_json::Value;

use super::shortcode::is_shortcode_like;

const SHORTCODE_KEYS: &[&str] = &["shortcode", "code"];

/// Depth-first search for the first string stored under one of `keys` that
/// satisfies `accept`. Objects are walked in document order, arrays in index order.
pub fn find_string<F>(value: &Value, keys: &[&str], accept: &F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    match value {
        Value::Object(map) => map.iter().find_map(|(key, child)| {
            if keys.contains(&key.as_str()) {
                if let Some(s) = child.as_str().filter(|s| accept(s)) {
                    return Some(s.to_string());
                }
            }
            find_string(child, keys, accept)
        }),
        Value::Array(items) => items.iter().find_map(|item| find_string(item, keys, accept)),
        _ => None,
    }
}

/// First `shortcode`/`code` value anywhere in `value` that looks like a reel
/// shortcode.
pub fn find_shortcode(value: &Value) -> Option<String> {
    find_string(value, SHORTCODE_KEYS, &is_shortcode_like)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finds_nested_shortcode() {
        let body = json!({
            "payload": {
                "items": [
                    { "media": { "pk": "1", "code": "Cx9_abc-12" } }
                ]
            }
        });
        assert_eq!(find_shortcode(&body).as_deref(), Some("Cx9_abc-12"));
    }

    #[test]
    fn test_skips_values_that_do_not_look_like_shortcodes() {
        let body = json!({
            "code": 200,
            "error": { "code": "bad" },
            "media": [{ "shortcode": "no spaces allowed" }, { "shortcode": "Good_Code1" }]
        });
        assert_eq!(find_shortcode(&body).as_deref(), Some("Good_Code1"));
    }

    #[test]
    fn test_returns_none_for_scalars_and_empty_trees() {
        assert_eq!(find_shortcode(&json!("ABCDEFG")), None);
        assert_eq!(find_shortcode(&json!(null)), None);
        assert_eq!(find_shortcode(&json!({ "items": [] })), None);
    }

    #[test]
    fn test_depth_first_order() {
        // The nested hit under "a" wins over the shallower one under "b".
        let body = json!({
            "a": { "deep": { "code": "FirstHit1" } },
            "b": { "code": "SecondHit" }
        });
        assert_eq!(find_shortcode(&body).as_deref(), Some("FirstHit1"));
    }

    #[test]
    fn test_follows_document_order_not_key_order() {
        let body: Value = serde_json::from_str(
            r#"{"zeta": {"code": "ZetaCode1"}, "alpha": {"code": "AlphaCode"}}"#,
        )
        .unwrap();
        assert_eq!(find_shortcode(&body).as_deref(), Some("ZetaCode1"));
    }

    #[test]
    fn test_custom_keys() {
        let body = json!({ "x": [{ "id": "42" }, { "id": "4242" }] });
        let found = find_string(&body, &["id"], &|s: &str| s.len() > 2);
        assert_eq!(found.as_deref(), Some("4242"));
    }
}
