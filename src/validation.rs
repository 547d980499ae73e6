use url::Url;

/// Parses and checks a submitted URL. Only absolute URLs with a non-empty
/// scheme and host are accepted; the trimmed input is returned as-is so the
/// stored value matches what the client sent.
///
/// Control characters are rejected outright: `Url::parse` silently strips or
/// encodes them, but the raw value could never go out in a `Location` header.
pub fn validate_url(raw: &str) -> Option<&str> {
    let candidate = raw.trim();
    if candidate.is_empty() || candidate.chars().any(char::is_control) {
        return None;
    }

    let parsed = Url::parse(candidate).ok()?;
    if parsed.scheme().is_empty() {
        return None;
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(candidate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_absolute_urls() {
        assert_eq!(
            validate_url("https://example.com/a?b=c#d"),
            Some("https://example.com/a?b=c#d")
        );
        assert_eq!(validate_url("http://127.0.0.1:8080"), Some("http://127.0.0.1:8080"));
        assert_eq!(validate_url("ftp://files.example.org/x"), Some("ftp://files.example.org/x"));
        assert_eq!(validate_url("http://[::1]/"), Some("http://[::1]/"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(
            validate_url("  https://example.com/path \n"),
            Some("https://example.com/path")
        );
    }

    #[test]
    fn test_rejects_missing_scheme_or_host() {
        assert_eq!(validate_url(""), None);
        assert_eq!(validate_url("   "), None);
        assert_eq!(validate_url("example.com"), None);
        assert_eq!(validate_url("/relative/path"), None);
        assert_eq!(validate_url("http://"), None);
        assert_eq!(validate_url("mailto:someone@example.com"), None);
        assert_eq!(validate_url("file:///etc/passwd"), None);
        assert_eq!(validate_url("not a url"), None);
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(validate_url("https://example.com/a\u{7f}b"), None);
        assert_eq!(validate_url("https://example.com/a\tb"), None);
        assert_eq!(validate_url("https://example.com/a\nb"), None);
        assert_eq!(validate_url("https://exa\u{0}mple.com/"), None);
        assert_eq!(validate_url("https://example.com/\u{85}"), None);
    }

    #[test]
    fn test_accepts_non_ascii() {
        assert_eq!(
            validate_url("https://example.com/café"),
            Some("https://example.com/café")
        );
    }
}
