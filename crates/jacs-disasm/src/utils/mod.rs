/// Whether `s` is a non-empty run of ASCII digits (a non-negative decimal literal).
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Formats an offset with an explicit sign.
pub fn signed(v: i64) -> String {
    if v >= 0 {
        format!("+{}", v)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_number() {
        assert!(is_number("0"));
        assert!(is_number("1234"));
        assert!(!is_number(""));
        assert!(!is_number("-1"));
        assert!(!is_number("_l3"));
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(0), "+0");
        assert_eq!(signed(12), "+12");
        assert_eq!(signed(-10), "-10");
    }
}
