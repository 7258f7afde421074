//! Snippet extraction and term highlighting
//!
//! A snippet is a window of body text around the earliest query-term
//! occurrence, or the leading text when no term matches. Every term
//! occurrence inside the snippet is wrapped in `**` markers,
//! non-overlapping, matching case-insensitively.

/// Ellipsis marker used at trimmed snippet edges
const ELLIPSIS: &str = "…";

/// How far back from a cut point to look for a whitespace boundary
const BOUNDARY_BACKOFF: usize = 20;

/// Builds a highlighted snippet of `body` around the query terms
///
/// # Arguments
///
/// * `body` - Full page body text
/// * `terms` - Pre-stem lowercased query terms
/// * `snippet_length` - Target snippet size in characters
pub fn make_snippet(body: &str, terms: &[String], snippet_length: usize) -> String {
    let raw = extract_window(body, terms, snippet_length);
    highlight_terms(&raw, terms)
}

/// Extracts the unhighlighted snippet window
fn extract_window(body: &str, terms: &[String], snippet_length: usize) -> String {
    let earliest = terms
        .iter()
        .filter(|t| !t.is_empty())
        .filter_map(|t| find_ignore_ascii_case(body, t, 0).map(|p| (p, t.len())))
        .min_by_key(|&(p, _)| p);

    match earliest {
        Some((position, match_len)) => {
            let context = snippet_length / 2;
            let start = floor_char_boundary(body, position.saturating_sub(context));
            let end = ceil_char_boundary(
                body,
                (position + match_len + context).min(body.len()),
            );

            let mut snippet = body[start..end].trim().to_string();
            if start > 0 {
                snippet = format!("{}{}", ELLIPSIS, snippet);
            }
            if end < body.len() {
                snippet.push_str(ELLIPSIS);
            }
            snippet
        }
        None => leading_text(body, snippet_length),
    }
}

/// Takes the page prefix, backing off to whitespace near the cut
fn leading_text(body: &str, snippet_length: usize) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= snippet_length {
        return trimmed.to_string();
    }

    let mut cut = floor_char_boundary(trimmed, snippet_length);
    if let Some(ws) = trimmed[..cut]
        .char_indices()
        .rev()
        .take_while(|&(i, _)| cut - i <= BOUNDARY_BACKOFF)
        .find(|&(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
    {
        cut = ws;
    }

    format!("{}{}", trimmed[..cut].trim_end(), ELLIPSIS)
}

/// Wraps every term occurrence in `**` markers, non-overlapping
fn highlight_terms(text: &str, terms: &[String]) -> String {
    let mut matches: Vec<(usize, usize)> = Vec::new();
    for term in terms {
        if term.is_empty() {
            continue;
        }
        let mut from = 0;
        while let Some(position) = find_ignore_ascii_case(text, term, from) {
            matches.push((position, position + term.len()));
            from = position + term.len();
        }
    }

    if matches.is_empty() {
        return text.to_string();
    }

    // Earliest first; on shared starts prefer the longer match.
    matches.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut result = String::with_capacity(text.len() + matches.len() * 4);
    let mut cursor = 0;
    for (start, end) in matches {
        if start < cursor {
            continue;
        }
        result.push_str(&text[cursor..start]);
        result.push_str("**");
        result.push_str(&text[start..end]);
        result.push_str("**");
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    result
}

/// Finds `needle` in `haystack[from..]` ignoring ASCII case
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() || from + needle_bytes.len() > haystack_bytes.len() {
        return None;
    }

    (from..=haystack_bytes.len() - needle_bytes.len()).find(|&i| {
        haystack.is_char_boundary(i)
            && haystack_bytes[i..i + needle_bytes.len()].eq_ignore_ascii_case(needle_bytes)
    })
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_snippet_centers_on_match() {
        let body = format!("{} the needle sits here {}", "x".repeat(200), "y".repeat(200));
        let snippet = make_snippet(&body, &terms(&["needle"]), 60);

        assert!(snippet.contains("**needle**"));
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        // Window stays near the target length plus markers and ellipses.
        assert!(snippet.len() < 120);
    }

    #[test]
    fn test_snippet_at_start_has_no_leading_ellipsis() {
        let body = format!("needle first, then padding {}", "z".repeat(200));
        let snippet = make_snippet(&body, &terms(&["needle"]), 60);
        assert!(snippet.starts_with("**needle**"));
        assert!(snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_snippet_case_insensitive_match() {
        let body = "Programming in Java is common.";
        let snippet = make_snippet(body, &terms(&["java"]), 160);
        assert!(snippet.contains("**Java**"));
    }

    #[test]
    fn test_earliest_term_wins() {
        let body = "alpha comes before beta in this text about beta and alpha";
        let snippet = make_snippet(body, &terms(&["beta", "alpha"]), 30);
        // Window centers on the first "alpha", the earliest of any term.
        assert!(snippet.starts_with("**alpha**"));
    }

    #[test]
    fn test_no_match_uses_prefix() {
        let body = "word ".repeat(100);
        let snippet = make_snippet(&body, &terms(&["absent"]), 50);
        assert!(snippet.ends_with(ELLIPSIS));
        assert!(snippet.len() <= 50 + ELLIPSIS.len());
        // Cut lands on a word boundary.
        assert!(!snippet.trim_end_matches(ELLIPSIS).ends_with("wor"));
    }

    #[test]
    fn test_short_body_returned_whole() {
        let body = "short body";
        let snippet = make_snippet(body, &terms(&["absent"]), 160);
        assert_eq!(snippet, "short body");
    }

    #[test]
    fn test_all_occurrences_highlighted() {
        let body = "java here and java there";
        let snippet = make_snippet(body, &terms(&["java"]), 160);
        assert_eq!(snippet, "**java** here and **java** there");
    }

    #[test]
    fn test_multiple_terms_highlighted() {
        let body = "Java programming is java Programming";
        let snippet = make_snippet(body, &terms(&["java", "programming"]), 160);
        assert_eq!(
            snippet,
            "**Java** **programming** is **java** **Programming**"
        );
    }

    #[test]
    fn test_overlapping_matches_do_not_nest() {
        let body = "javascript";
        let snippet = make_snippet(body, &terms(&["javascript", "java"]), 160);
        assert_eq!(snippet, "**javascript**");
    }

    #[test]
    fn test_unicode_body_does_not_split_chars() {
        let body = format!("préfixe {} needle {}", "é".repeat(100), "à".repeat(100));
        let snippet = make_snippet(&body, &terms(&["needle"]), 40);
        assert!(snippet.contains("**needle**"));
    }

    #[test]
    fn test_empty_terms_gives_prefix() {
        let body = "just some text";
        assert_eq!(make_snippet(body, &[], 160), "just some text");
    }
}
