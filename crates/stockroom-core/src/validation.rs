//! # Validation
//!
//! Input normalization and the upload rules.
//!
//! Product fields are coerced and stored as given. Hard rejections only
//! happen for image uploads.
//!
//! ## Upload Rules
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  multipart part "image"                                          │
//! │    missing                    → 400 "image is required"          │
//! │    content type !~ image/*    → 400 "... must be one of: image/*"│
//! │    size > MAX_FILE_SIZE       → 413 "... is too large"           │
//! │    otherwise                  → <uuid><ext> in the upload dir    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Field name of the upload part, also used in error messages.
pub const IMAGE_FIELD: &str = "image";

/// Longest extension kept from a client-supplied file name (dot excluded).
const MAX_EXTENSION_LEN: usize = 10;

/// Trims a search term; blank terms mean "no text filter".
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::normalize_search_query;
///
/// assert_eq!(normalize_search_query(Some("  vis ")), Some("vis".to_string()));
/// assert_eq!(normalize_search_query(Some("   ")), None);
/// assert_eq!(normalize_search_query(None), None);
/// ```
pub fn normalize_search_query(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

/// Accepts only `image/*` content types.
pub fn validate_image_content_type(content_type: Option<&str>) -> Result<(), ValidationError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        _ => Err(ValidationError::NotAllowed {
            field: IMAGE_FIELD.to_string(),
            allowed: "image/*".to_string(),
        }),
    }
}

/// Rejects payloads strictly larger than `max` bytes.
pub fn validate_upload_size(actual: usize, max: usize) -> Result<(), ValidationError> {
    if actual > max {
        return Err(ValidationError::TooLarge {
            field: IMAGE_FIELD.to_string(),
            max,
            actual,
        });
    }
    Ok(())
}

/// Extension of a client-supplied file name, dot included (`".png"`).
///
/// Returns `""` when there is none, when the name is a dotfile, or when the
/// extension contains anything but ASCII letters and digits.
pub fn image_extension(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(dot) => {
            let ext = &base[dot + 1..];
            if !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
            {
                &base[dot..]
            } else {
                ""
            }
        }
    }
}

/// Stored file name referenced by an image URL such as `/uploads/abc.png`.
///
/// Only the last path component is kept, so a URL cannot point outside the
/// upload directory. `None` for empty names and `.`/`..`.
pub fn image_file_name(image_url: &str) -> Option<&str> {
    let name = image_url
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

/// Parses a product id from a query-string value.
pub fn parse_product_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_must_be_image() {
        assert!(validate_image_content_type(Some("image/png")).is_ok());
        assert!(validate_image_content_type(Some("IMAGE/JPEG")).is_ok());
        assert!(validate_image_content_type(Some("text/plain")).is_err());
        assert!(validate_image_content_type(None).is_err());
    }

    #[test]
    fn test_upload_size_cap_is_inclusive() {
        assert!(validate_upload_size(5_000_000, 5_000_000).is_ok());
        let err = validate_upload_size(5_000_001, 5_000_000).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { actual: 5_000_001, .. }));
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("photo.png"), ".png");
        assert_eq!(image_extension("archive.tar.GZ"), ".GZ");
        assert_eq!(image_extension("noext"), "");
        assert_eq!(image_extension(".hidden"), "");
        assert_eq!(image_extension("evil.p/ng"), "");
        assert_eq!(image_extension("weird.p!g"), "");
        assert_eq!(image_extension("C:\\pics\\cat.jpeg"), ".jpeg");
    }

    #[test]
    fn test_image_file_name_confines_to_last_component() {
        assert_eq!(image_file_name("/uploads/abc.png"), Some("abc.png"));
        assert_eq!(image_file_name("/uploads/../../etc/passwd"), Some("passwd"));
        assert_eq!(image_file_name("/uploads/.."), None);
        assert_eq!(image_file_name("/uploads/"), None);
        assert_eq!(image_file_name(""), None);
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id(" 12 "), Some(12));
        assert_eq!(parse_product_id("abc"), None);
    }
}
