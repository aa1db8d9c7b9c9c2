/// Identity used when the caller's address cannot be determined.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Derive a rate-limit identity from an `x-forwarded-for` header value.
///
/// Takes the first comma-separated address. Missing or blank values map to
/// [`UNKNOWN_IDENTITY`]; the header is client-controlled and may be spoofed.
pub fn identity_from_forwarded(header: Option<&str>) -> String {
    header
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| UNKNOWN_IDENTITY.to_owned())
}

/// Interpret a config flag like `1`, `true`, `yes`, or `on`.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a trimmed unsigned integer, rejecting empty input.
pub fn parse_u64(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    value.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_takes_first_address() {
        assert_eq!(
            identity_from_forwarded(Some("203.0.113.7, 10.0.0.1, 10.0.0.2")),
            "203.0.113.7"
        );
        assert_eq!(identity_from_forwarded(Some("  198.51.100.4  ")), "198.51.100.4");
    }

    #[test]
    fn forwarded_missing_or_blank_is_unknown() {
        assert_eq!(identity_from_forwarded(None), UNKNOWN_IDENTITY);
        assert_eq!(identity_from_forwarded(Some("")), UNKNOWN_IDENTITY);
        assert_eq!(identity_from_forwarded(Some(" , 10.0.0.1")), UNKNOWN_IDENTITY);
    }

    #[test]
    fn flags() {
        for raw in ["1", "true", "YES", " on "] {
            assert!(parse_flag(raw), "{raw} should be truthy");
        }
        for raw in ["0", "false", "off", "", "enabled"] {
            assert!(!parse_flag(raw), "{raw} should be falsy");
        }
    }

    #[test]
    fn u64_values() {
        assert_eq!(parse_u64(" 50 "), Some(50));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("-1"), None);
        assert_eq!(parse_u64("ten"), None);
    }
}
