use once_cell::sync::Lazy;
use regex::Regex;

// Angka desimal positif tanpa tanda (contoh: "10", "2.5", "0.75")
static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap()
});

// Validate format angka desimal (input dimensi dari form)
pub fn is_valid_decimal(input: &str) -> bool {
    DECIMAL_REGEX.is_match(input.trim())
}

// Parse angka desimal, None jika format tidak valid
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if !is_valid_decimal(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// Trim text opsional, string kosong dianggap tidak diisi
pub fn normalize_optional_text(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_validation() {
        assert!(is_valid_decimal("10"));
        assert!(is_valid_decimal("2.5"));
        assert!(is_valid_decimal(" 0 "));
        assert!(!is_valid_decimal(""));
        assert!(!is_valid_decimal("-3"));
        assert!(!is_valid_decimal("abc"));
        assert!(!is_valid_decimal("1e5"));
        assert!(!is_valid_decimal("3."));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("10"), Some(10.0));
        assert_eq!(parse_decimal("0.5"), Some(0.5));
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("five"), None);
    }

    #[test]
    fn test_normalize_optional_text() {
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(
            normalize_optional_text(Some("  Blue Dart ")),
            Some("Blue Dart".to_string())
        );
    }
}
