//! Shared utility functions for NSD crates.

/// Hydrologic unit code helpers
pub mod huc {
    use crate::error::HucError;

    /// Number of digits in a subbasin (HUC8) code.
    pub const HUC8_DIGITS: usize = 8;

    /// True if `code` is exactly eight ASCII digits, e.g. "10160002".
    pub fn is_huc8(code: &str) -> bool {
        code.len() == HUC8_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
    }

    /// Validate a HUC8 code, trimming surrounding whitespace.
    pub fn parse_huc8(s: &str) -> anyhow::Result<String> {
        let code = s.trim();
        if !is_huc8(code) {
            return Err(HucError(code.to_string()).into());
        }
        Ok(code.to_string())
    }

    /// Hierarchy level of a hydrologic unit code: 2 digits per level.
    /// e.g., "10" -> 1 (region), "10160002" -> 4 (subbasin)
    pub fn level(code: &str) -> Option<usize> {
        let digits = code.len();
        if digits == 0 || digits % 2 != 0 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(digits / 2)
    }

    /// The two-digit region a code belongs to, e.g. "10160002" -> "10".
    pub fn region(code: &str) -> Option<&str> {
        level(code).map(|_| &code[..2])
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_is_huc8() {
            assert!(is_huc8("10160002"));
            assert!(is_huc8("01020304"));
            assert!(!is_huc8("1016000"));
            assert!(!is_huc8("101600021"));
            assert!(!is_huc8("1016000a"));
            assert!(!is_huc8(""));
        }

        #[test]
        fn test_parse_huc8() {
            assert_eq!(parse_huc8(" 10160002\n").unwrap(), "10160002");
            let err = parse_huc8("pipestem").unwrap_err();
            assert_eq!(err.to_string(), "Invalid HUC8 code: pipestem");
        }

        #[test]
        fn test_level_and_region() {
            assert_eq!(level("10"), Some(1));
            assert_eq!(level("1016"), Some(2));
            assert_eq!(level("10160002"), Some(4));
            assert_eq!(level("101600020101"), Some(6));
            assert_eq!(level("101"), None);
            assert_eq!(region("10160002"), Some("10"));
            assert_eq!(region("x"), None);
        }
    }
}

/// Unit conversions for depression statistics
pub mod units {
    /// Square meters per square kilometer
    pub const SQ_M_PER_SQ_KM: f64 = 1e6;

    /// Cubic meters per cubic kilometer
    pub const CU_M_PER_CU_KM: f64 = 1e9;

    /// Convert m² to km²
    pub fn sq_m_to_sq_km(value: f64) -> f64 {
        value / SQ_M_PER_SQ_KM
    }

    /// Convert m³ to km³
    pub fn cu_m_to_cu_km(value: f64) -> f64 {
        value / CU_M_PER_CU_KM
    }

}

/// Color string helpers
pub mod color {
    /// Append a two-hex-digit alpha to a color, e.g. ("#008837", "99") -> "#00883799"
    pub fn with_alpha(color: &str, alpha: &str) -> String {
        format!("{}{}", color, alpha)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_with_alpha() {
            assert_eq!(with_alpha("#008837", "99"), "#00883799");
            assert_eq!(with_alpha("00000000", ""), "00000000");
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct HucError(pub String);

    impl fmt::Display for HucError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Invalid HUC8 code: {}", self.0)
        }
    }

    impl std::error::Error for HucError {}
}
