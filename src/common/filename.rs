const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
const MAX_LEN: usize = 80;
pub const FALLBACK_NAME: &str = "reel-audio";

/// Makes a value safe to use as a download filename (without extension).
pub fn sanitize_filename(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let truncated: String = collapsed.chars().take(MAX_LEN).collect();
    truncated.trim_end().to_string()
}

/// `Content-Disposition` value for an attachment. Non-ASCII names get an
/// RFC 5987 `filename*` alongside an ASCII fallback.
pub fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    if fallback == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_forbidden_characters() {
        assert_eq!(sanitize_filename(r#"a\b/c:d*e?f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize_filename("  Song \t\n  Title   - Artist "), "Song Title - Artist");
    }

    #[test]
    fn test_fallback_when_empty() {
        assert_eq!(sanitize_filename(""), FALLBACK_NAME);
        assert_eq!(sanitize_filename("   "), FALLBACK_NAME);
        assert_eq!(sanitize_filename("/:*?|"), FALLBACK_NAME);
    }

    #[test]
    fn test_truncates_to_80_chars() {
        let long = "é".repeat(200);
        let out = sanitize_filename(&long);
        assert_eq!(out.chars().count(), 80);
    }

    #[test]
    fn test_truncation_never_leaves_trailing_space() {
        let input = format!("{} tail", "x".repeat(79));
        let out = sanitize_filename(&input);
        assert_eq!(out, "x".repeat(79));
    }

    #[test]
    fn test_properties_over_mixed_inputs() {
        let long = "word ".repeat(40);
        let inputs = [
            "Morning Light (Original Audio)",
            "a  b   c",
            "<<>>",
            "🎵 emoji | title",
            "\"quoted\" name?",
            long.as_str(),
        ];
        for input in inputs {
            let out = sanitize_filename(input);
            assert!(!out.is_empty());
            assert!(out.chars().count() <= 80);
            assert!(!out.contains("  "));
            assert!(!out.chars().any(|c| FORBIDDEN.contains(&c)), "{out}");
        }
    }

    #[test]
    fn test_attachment_disposition_ascii() {
        assert_eq!(
            attachment_disposition("Morning Light.mp3"),
            "attachment; filename=\"Morning Light.mp3\""
        );
    }

    #[test]
    fn test_attachment_disposition_unicode_with_spaces() {
        assert_eq!(
            attachment_disposition("Ünder Sky.mp3"),
            "attachment; filename=\"_nder Sky.mp3\"; filename*=UTF-8''%C3%9Cnder%20Sky.mp3"
        );
    }

    #[test]
    fn test_attachment_disposition_unicode() {
        assert_eq!(
            attachment_disposition("Café.mp3"),
            "attachment; filename=\"Caf_.mp3\"; filename*=UTF-8''Caf%C3%A9.mp3"
        );
    }
}
