//! Tokenizer: lowercased alphanumeric runs with positions
//!
//! Tokens are maximal ASCII `[a-z0-9]+` runs. Runs outside the configured
//! length bounds and runs that are purely digits are dropped before they
//! receive a position, so position indexes count only emitted tokens.

/// A token with its position in the emitted stream and byte offset in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased token text
    pub text: String,
    /// Zero-based index in the emitted token stream
    pub position: usize,
    /// Byte offset of the run's first character in the input
    pub offset: usize,
}

/// Splits text into position-tagged tokens
///
/// # Arguments
///
/// * `text` - Input text (any UTF-8; only ASCII alphanumerics form tokens)
/// * `min_len` - Minimum kept token length
/// * `max_len` - Maximum kept token length
pub fn tokenize(text: &str, min_len: usize, max_len: usize) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut position = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_alphanumeric() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }

            let run = &text[start..i];
            let len = run.len();
            if len >= min_len && len <= max_len && !run.bytes().all(|b| b.is_ascii_digit()) {
                tokens.push(Token {
                    text: run.to_ascii_lowercase(),
                    position,
                    offset: start,
                });
                position += 1;
            }
        } else {
            i += 1;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = tokenize("Hello, World!", 2, 50);
        assert_eq!(texts(&tokens), vec!["hello", "world"]);
    }

    #[test]
    fn test_positions_are_sequential() {
        let tokens = tokenize("one two three", 2, 50);
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_offsets_point_into_input() {
        let input = "alpha  beta";
        let tokens = tokenize(input, 2, 50);
        assert_eq!(&input[tokens[0].offset..tokens[0].offset + 5], "alpha");
        assert_eq!(&input[tokens[1].offset..tokens[1].offset + 4], "beta");
    }

    #[test]
    fn test_short_tokens_dropped_without_position() {
        let tokens = tokenize("a big x dog", 2, 50);
        assert_eq!(texts(&tokens), vec!["big", "dog"]);
        // "a" and "x" never consumed a position.
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 1);
    }

    #[test]
    fn test_long_runs_dropped() {
        let long = "x".repeat(51);
        let input = format!("{} keep", long);
        let tokens = tokenize(&input, 2, 50);
        assert_eq!(texts(&tokens), vec!["keep"]);
    }

    #[test]
    fn test_pure_digits_dropped() {
        let tokens = tokenize("call 911 now", 2, 50);
        assert_eq!(texts(&tokens), vec!["call", "now"]);
    }

    #[test]
    fn test_mixed_alphanumeric_kept() {
        let tokens = tokenize("ipv6 and sha256", 2, 50);
        assert_eq!(texts(&tokens), vec!["ipv6", "and", "sha256"]);
    }

    #[test]
    fn test_punctuation_splits_runs() {
        let tokens = tokenize("rust-lang.org", 2, 50);
        assert_eq!(texts(&tokens), vec!["rust", "lang", "org"]);
    }

    #[test]
    fn test_non_ascii_is_a_boundary() {
        let tokens = tokenize("café au lait", 2, 50);
        assert_eq!(texts(&tokens), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", 2, 50).is_empty());
        assert!(tokenize("   ...   ", 2, 50).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let input = "The same input, twice.";
        assert_eq!(tokenize(input, 2, 50), tokenize(input, 2, 50));
    }
}
