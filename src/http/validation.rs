//! Request-path validation for the counter API.
//!
//! # Responsibilities
//! - Reject directory traversal and control characters
//! - Bound path length, nesting depth and segment length
//! - Restrict to the character set realistic API paths use

use thiserror::Error;

const MAX_PATH_LEN: usize = 1_000;
const MAX_SEGMENTS: usize = 20;
const MAX_SEGMENT_LEN: usize = 100;

/// Rejection reasons for user-supplied API paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path too long (max {MAX_PATH_LEN} characters)")]
    TooLong,

    #[error("Path traversal not allowed")]
    Traversal,

    #[error("Invalid characters in path")]
    InvalidCharacters,

    #[error("Path too deeply nested (max {MAX_SEGMENTS} segments)")]
    TooDeep,

    #[error("Path segment too long (max {MAX_SEGMENT_LEN} characters per segment)")]
    SegmentTooLong,
}

/// Validate the path component under `/api/`. An empty path is valid.
pub fn validate_api_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Ok(());
    }

    if path.len() > MAX_PATH_LEN {
        return Err(PathError::TooLong);
    }

    if path.contains("..") {
        return Err(PathError::Traversal);
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-');
    if !path.chars().all(allowed) {
        return Err(PathError::InvalidCharacters);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > MAX_SEGMENTS {
        return Err(PathError::TooDeep);
    }
    if segments.iter().any(|s| s.len() > MAX_SEGMENT_LEN) {
        return Err(PathError::SegmentTooLong);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realistic_paths_accepted() {
        for path in ["", "users/123/posts/abc-def/", "a/b_c/d.e/", "x"] {
            assert_eq!(validate_api_path(path), Ok(()), "path: {:?}", path);
        }
    }

    #[test]
    fn test_traversal_rejected() {
        assert_eq!(validate_api_path("a/../etc"), Err(PathError::Traversal));
        assert_eq!(validate_api_path(".."), Err(PathError::Traversal));
    }

    #[test]
    fn test_control_and_unsafe_characters_rejected() {
        assert_eq!(validate_api_path("a\0b"), Err(PathError::InvalidCharacters));
        assert_eq!(validate_api_path("a b"), Err(PathError::InvalidCharacters));
        assert_eq!(validate_api_path("a%20b"), Err(PathError::InvalidCharacters));
    }

    #[test]
    fn test_length_limits() {
        assert_eq!(validate_api_path(&"a".repeat(1_001)), Err(PathError::TooLong));
        assert_eq!(
            validate_api_path(&format!("{}/", "a".repeat(101))),
            Err(PathError::SegmentTooLong)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let deep = vec!["a"; 21].join("/");
        assert_eq!(validate_api_path(&deep), Err(PathError::TooDeep));

        let ok = vec!["a"; 20].join("/");
        assert_eq!(validate_api_path(&ok), Ok(()));
    }
}
