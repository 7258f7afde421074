//! HTML parsing: title, readable body text, outgoing links
//!
//! Links come back as raw href values; resolution and admission filtering
//! stay with the caller. Obvious non-links (fragments, `javascript:`,
//! `mailto:`, `tel:`, `data:`) are dropped here.

use scraper::{Html, Selector};

/// Extracted content of one HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Document title, empty when absent
    pub title: String,
    /// Human-readable body text with collapsed whitespace
    pub body: String,
    /// Raw href values of `<a>` tags worth following
    pub links: Vec<String>,
}

/// Parses an HTML document into title, body text, and candidate links
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        body: extract_body_text(&document),
        links: extract_hrefs(&document),
    }
}

fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Collects the text content of `<body>`, skipping script-like elements
fn extract_body_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };

    let Some(body) = document.select(&selector).next() else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for node in body.descendants() {
        if let Some(text) = node.value().as_text() {
            // Text inside script-like elements is not readable content.
            let skipped = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name().to_string()))
                .map(|name| matches!(name.as_str(), "script" | "style" | "noscript"))
                .unwrap_or(false);
            if skipped {
                continue;
            }

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.split_whitespace().collect::<Vec<_>>().join(" "));
            }
        }
    }

    parts.join(" ")
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("data:")
        {
            continue;
        }

        links.push(href.to_string());
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let page = parse_page("<html><head><title>  Test Page </title></head><body></body></html>");
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let page = parse_page("<html><head></head><body>text</body></html>");
        assert_eq!(page.title, "");
    }

    #[test]
    fn test_body_text_extraction() {
        let page = parse_page(
            "<html><body><h1>Heading</h1><p>First paragraph.</p><p>Second one.</p></body></html>",
        );
        assert_eq!(page.body, "Heading First paragraph. Second one.");
    }

    #[test]
    fn test_script_and_style_excluded() {
        let page = parse_page(
            r#"<html><body>
                <p>Visible</p>
                <script>var hidden = "code";</script>
                <style>.also { hidden: true; }</style>
                <noscript>fallback</noscript>
            </body></html>"#,
        );
        assert_eq!(page.body, "Visible");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let page = parse_page("<html><body><p>spread\n   out\t text</p></body></html>");
        assert_eq!(page.body, "spread out text");
    }

    #[test]
    fn test_extract_links() {
        let page = parse_page(
            r#"<html><body>
                <a href="/relative">One</a>
                <a href="https://other.com/abs">Two</a>
            </body></html>"#,
        );
        assert_eq!(page.links, vec!["/relative", "https://other.com/abs"]);
    }

    #[test]
    fn test_special_hrefs_skipped() {
        let page = parse_page(
            r##"<html><body>
                <a href="#section">Anchor</a>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:a@b.c">Mail</a>
                <a href="tel:+123">Phone</a>
                <a href="data:text/plain,x">Data</a>
                <a href="/real">Real</a>
            </body></html>"##,
        );
        assert_eq!(page.links, vec!["/real"]);
    }

    #[test]
    fn test_nested_text_collected_in_order() {
        let page = parse_page(
            "<html><body><div>outer <span>inner</span> tail</div></body></html>",
        );
        assert_eq!(page.body, "outer inner tail");
    }
}
