use url::Url;

/// Builds the origin key for a URL: `scheme://host[:port]`
///
/// Default ports are elided, matching the canonical URL form. This is the
/// cache key used by the robots policy.
///
/// # Examples
///
/// ```
/// use scour::url::origin_key;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/deep/path?q=1").unwrap();
/// assert_eq!(origin_key(&url), "https://example.com");
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(origin_key(&url), "http://example.com:8080");
/// ```
pub fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elides_default_port() {
        let url = Url::parse("http://example.com:80/path").unwrap();
        assert_eq!(origin_key(&url), "http://example.com");
    }

    #[test]
    fn test_keeps_explicit_port() {
        let url = Url::parse("http://example.com:8080/path").unwrap();
        assert_eq!(origin_key(&url), "http://example.com:8080");
    }

    #[test]
    fn test_lowercases_host() {
        let url = Url::parse("https://EXAMPLE.com/").unwrap();
        assert_eq!(origin_key(&url), "https://example.com");
    }
}
