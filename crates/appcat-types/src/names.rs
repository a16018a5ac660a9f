//! Category name rules.
//!
//! Category names are unique within a catalog ignoring case, so `"VPN"` and
//! `"vpn"` name the same category. A valid name:
//! - Must not be empty or whitespace only
//! - Must not contain control characters (newlines, tabs, NUL, ...)

use crate::error::ShapeError;

/// File name offered for a full catalog export.
pub const FULL_EXPORT_FILE_NAME: &str = "linux_signatures.json";

/// Case-insensitive category name comparison.
///
/// # Examples
///
/// ```
/// use appcat_types::category_eq;
///
/// assert!(category_eq("VPN", "vpn"));
/// assert!(!category_eq("VPN", "VPNs"));
/// ```
pub fn category_eq(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Validate a category name, returning `Ok(())` if valid.
pub fn validate_category_name(name: &str) -> Result<(), ShapeError> {
    if name.trim().is_empty() {
        return Err(ShapeError::InvalidCategoryName {
            name: name.to_string(),
            reason: "category name must not be empty".into(),
        });
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(ShapeError::InvalidCategoryName {
            name: name.to_string(),
            reason: format!("contains control character: {ch:?}"),
        });
    }

    Ok(())
}

/// Download file name for a single-category export.
///
/// Lower-cases the category and replaces spaces with underscores, so
/// `"Web Browsers"` becomes `"web_browsers_signatures.json"`. Characters that
/// would break a `Content-Disposition` header are replaced as well.
pub fn download_file_name(category: &str) -> String {
    let stem: String = category
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '"' | '/' | '\\' | ';' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{stem}_signatures.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_equality() {
        assert!(category_eq("Security", "SECURITY"));
        assert!(category_eq("Éditeurs", "éditeurs"));
        assert!(!category_eq("Security", "Secure"));
    }

    #[test]
    fn valid_names() {
        assert!(validate_category_name("VPN").is_ok());
        assert!(validate_category_name("Web Browsers").is_ok());
    }

    #[test]
    fn empty_and_blank_names_rejected() {
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("   ").is_err());
    }

    #[test]
    fn control_characters_rejected() {
        let err = validate_category_name("bad\nname").unwrap_err();
        assert!(matches!(err, ShapeError::InvalidCategoryName { .. }));
    }

    #[test]
    fn download_names() {
        assert_eq!(download_file_name("VPN"), "vpn_signatures.json");
        assert_eq!(download_file_name("Web Browsers"), "web_browsers_signatures.json");
        assert_eq!(download_file_name("a/b\"c"), "a_b_c_signatures.json");
    }
}
