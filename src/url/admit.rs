use url::Url;

/// Maximum accepted URL length in characters
const MAX_URL_LEN: usize = 2048;

/// Path suffixes that identify media and binary content the crawler skips
const BLOCKED_SUFFIXES: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "ico", "webp", "pdf", "doc", "docx", "xls", "xlsx",
    "ppt", "pptx", "zip", "rar", "tar", "gz", "7z", "mp3", "mp4", "avi", "mov", "wmv", "flv",
    "wav", "exe", "dmg", "pkg", "deb", "rpm",
];

/// Decides whether a URL is admissible for crawling
///
/// Rejects:
/// - anything that does not parse as a URL
/// - non-http(s) schemes (`mailto:`, `javascript:`, `tel:`, `ftp:`, ...)
/// - paths ending in a known media or binary suffix
/// - URLs longer than 2048 characters
///
/// # Examples
///
/// ```
/// use scour::url::admissible;
///
/// assert!(admissible("https://example.com/article"));
/// assert!(!admissible("mailto:a@b"));
/// assert!(!admissible("https://example.com/image.jpg"));
/// ```
pub fn admissible(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_URL_LEN {
        return false;
    }

    let url = match Url::parse(trimmed) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    !has_blocked_suffix(url.path())
}

/// Checks whether two URLs share an origin host
///
/// Only the lowercase host is compared; scheme and port are ignored.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha.eq_ignore_ascii_case(hb),
        _ => false,
    }
}

fn has_blocked_suffix(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => BLOCKED_SUFFIXES
            .iter()
            .any(|s| ext.eq_ignore_ascii_case(s)),
        None => false,
    }
}
