//! Utility functions

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MAX_SLUG_LENGTH;

/// Group slugs: lowercase ascii letters, digits and dashes.
pub static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern is a valid regex"));

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LENGTH && SLUG_PATTERN.is_match(slug)
}

/// Splits a location into its non-empty path segments and the raw query string.
pub fn split_location(location: &str) -> (Vec<&str>, Option<&str>) {
    let (path, query) = match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    };
    let segments = path.split('/').filter(|s| !s.is_empty()).collect();
    (segments, query)
}

/// Looks up `key` in a `a=b&c=d` query string.
pub fn query_param<'a>(query: Option<&'a str>, key: &str) -> Option<&'a str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("aet-research"));
        assert!(is_valid_slug("i4"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Upper-Case"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn test_split_location() {
        let (segments, query) = split_location("/groups/aet/settings?tab=members");
        assert_eq!(segments, vec!["groups", "aet", "settings"]);
        assert_eq!(query, Some("tab=members"));

        let (segments, query) = split_location("/");
        assert!(segments.is_empty());
        assert_eq!(query, None);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param(Some("step=motivation&x=1"), "step"), Some("motivation"));
        assert_eq!(query_param(Some("x=1"), "step"), None);
        assert_eq!(query_param(None, "step"), None);
    }
}
