//! robots.txt parsing
//!
//! Only the two directives the crawler consumes are recognized:
//! `User-agent` groups rules and `Disallow` contributes a path prefix.
//! Blank lines and `#` comments are skipped, unknown directives ignored.

/// Crawl rules extracted from one robots.txt for one user agent
///
/// Holds the disallowed path prefixes collected from every group whose
/// `User-agent` value matched. An empty rule set allows everything, which
/// is also the stand-in when robots.txt could not be fetched.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    disallow: Vec<String>,
}

impl RobotsRules {
    /// Creates a permissive rule set that allows every path
    pub fn allow_all() -> Self {
        Self {
            disallow: Vec::new(),
        }
    }

    /// Parses robots.txt content against a specific user agent
    ///
    /// A group matches when its `User-agent` value is `*` or a
    /// case-insensitive substring of the agent's product token (the part
    /// of the user agent string before the first `/`). Every non-empty
    /// `Disallow` value in a matching group becomes a path prefix.
    ///
    /// # Arguments
    ///
    /// * `content` - Raw robots.txt text
    /// * `user_agent` - The configured user agent string
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let token = product_token(user_agent).to_lowercase();

        let mut disallow = Vec::new();
        let mut group_matches = false;
        // True while consuming consecutive User-agent lines that open a group.
        let mut in_group_header = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if !in_group_header {
                        // A new group begins; forget the previous match.
                        group_matches = false;
                        in_group_header = true;
                    }
                    let value = value.to_lowercase();
                    if value == "*" || token.contains(&value) {
                        group_matches = true;
                    }
                }
                "disallow" => {
                    in_group_header = false;
                    if group_matches && !value.is_empty() {
                        disallow.push(value.to_string());
                    }
                }
                _ => {
                    in_group_header = false;
                }
            }
        }

        Self { disallow }
    }

    /// Checks whether a path is allowed
    ///
    /// A path is allowed unless it starts with one of the disallowed
    /// prefixes.
    pub fn is_allowed(&self, path: &str) -> bool {
        !self.disallow.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Number of disallowed prefixes collected
    pub fn rule_count(&self) -> usize {
        self.disallow.len()
    }
}

/// Extracts the product token from a user agent string
///
/// The product token is everything before the first `/`, so
/// `"ScourBot/1.0 (+https://example.com)"` yields `"ScourBot"`.
pub fn product_token(user_agent: &str) -> &str {
    user_agent.split('/').next().unwrap_or(user_agent).trim()
}
