use crate::UrlError;
use url::Url;

/// Canonicalizes a raw URL string
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Parse; reject malformed input
/// 3. Require an `http` or `https` scheme; scheme and host are lowercased
/// 4. Drop the port when it equals the scheme default, keep it otherwise
/// 5. An empty path becomes `/`
/// 6. Remove a single trailing slash from non-root paths
/// 7. Strip the fragment
/// 8. Preserve the query string verbatim
///
/// The result is idempotent: canonicalizing a canonical URL yields the
/// same URL.
///
/// # Arguments
///
/// * `raw` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(Url)` - The canonical URL
/// * `Err(UrlError)` - Empty, malformed, or non-http(s) input
///
/// # Examples
///
/// ```
/// use scour::url::canonicalize;
///
/// let url = canonicalize("HTTPS://Example.COM/path/").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/path");
/// ```
pub fn canonicalize(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    // The url crate lowercases scheme and host and elides default ports.
    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = url.path();
    if path.is_empty() {
        url.set_path("/");
    } else if path.len() > 1 && path.ends_with('/') {
        let stripped = path[..path.len() - 1].to_string();
        url.set_path(&stripped);
    }

    Ok(url)
}

/// Resolves a (possibly relative) reference against a base URL
///
/// Performs RFC-3986 relative resolution and canonicalizes the result.
///
/// # Arguments
///
/// * `base` - The base URL (typically the page the reference was found on)
/// * `reference` - The href value to resolve
///
/// # Returns
///
/// * `Ok(Url)` - The canonical absolute URL
/// * `Err(UrlError)` - The reference cannot be resolved or canonicalized
pub fn resolve(base: &Url, reference: &str) -> Result<Url, UrlError> {
    let joined = base
        .join(reference.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(joined.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_scheme_and_host() {
        let result = canonicalize("HTTPS://Example.COM/path").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path");
    }

    #[test]
    fn test_removes_trailing_slash() {
        let result = canonicalize("HTTPS://Example.COM/path/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path");
    }

    #[test]
    fn test_keeps_root_slash() {
        let result = canonicalize("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = canonicalize("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_strips_fragment() {
        let result = canonicalize("https://example.com/path#foo").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path");
    }

    #[test]
    fn test_drops_default_port() {
        let result = canonicalize("http://example.com:80/").unwrap();
        assert_eq!(result.as_str(), "http://example.com/");

        let result = canonicalize("https://example.com:443/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_keeps_non_default_port() {
        let result = canonicalize("http://example.com:8080/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com:8080/page");
    }

    #[test]
    fn test_preserves_query_verbatim() {
        let result = canonicalize("https://example.com/search?b=2&a=1").unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?b=2&a=1");
    }

    #[test]
    fn test_trims_whitespace() {
        let result = canonicalize("  https://example.com/page  ").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(matches!(
            canonicalize("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            canonicalize("mailto:a@b"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(canonicalize("not a url").is_err());
        assert!(canonicalize("http://").is_err());
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "HTTPS://Example.COM/path/",
            "http://example.com:80/a/b/?q=1",
            "https://example.com/p#frag",
            "https://example.com",
        ];
        for input in inputs {
            let once = canonicalize(input).unwrap();
            let twice = canonicalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", input);
        }
    }

    #[test]
    fn test_case_insensitive_scheme_host() {
        assert_eq!(
            canonicalize("HTTPS://EX.com/p").unwrap(),
            canonicalize("https://ex.com/p").unwrap()
        );
    }

    #[test]
    fn test_fragment_stripping_equivalence() {
        assert_eq!(
            canonicalize("https://ex.com/p#x").unwrap(),
            canonicalize("https://ex.com/p").unwrap()
        );
    }

    #[test]
    fn test_resolve_relative() {
        let base = Url::parse("https://example.com/dir/page").unwrap();
        let result = resolve(&base, "/other").unwrap();
        assert_eq!(result.as_str(), "https://example.com/other");

        let result = resolve(&base, "sibling").unwrap();
        assert_eq!(result.as_str(), "https://example.com/dir/sibling");
    }

    #[test]
    fn test_resolve_absolute() {
        let base = Url::parse("https://example.com/").unwrap();
        let result = resolve(&base, "https://other.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://other.com/page");
    }

    #[test]
    fn test_resolve_dot_segments() {
        let base = Url::parse("https://example.com/a/b/c").unwrap();
        let result = resolve(&base, "../x").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a/x");
    }

    #[test]
    fn test_resolve_rejects_bad_scheme() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(resolve(&base, "javascript:void(0)").is_err());
    }
}
