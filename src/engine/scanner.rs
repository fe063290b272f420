//! Placeholder scanning
//!
//! Finds `${name}` and `${name:argument}` tokens. Names and arguments can't
//! contain `$`, `{`, `}` or `:`, so tokens never nest and no bracket balancing
//! is needed.

use regex::Regex;

/// Token grammar; surrounding whitespace is captured and trimmed afterwards
const PLACEHOLDER_PATTERN: &str = r"\$\{([^${}:]+)(?::([^${}:]+))?\}";

/// One matched placeholder within a specific scan of a specific buffer
///
/// Offsets are byte offsets and are only valid until the buffer is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte offset of the leading `$`
    pub start: usize,

    /// Byte offset just past the closing `}`
    pub end: usize,

    /// Trimmed variable name
    pub name: String,

    /// Trimmed argument; `None` when no `:argument` part was written
    pub argument: Option<String>,
}

impl Token {
    /// Length of the matched text in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: the grammar can't match an empty span
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Locates placeholder tokens in text
#[derive(Debug, Clone)]
pub struct PlaceholderScanner {
    pattern: Regex,
}

impl PlaceholderScanner {
    /// Create a scanner for the placeholder grammar
    pub fn new() -> Self {
        PlaceholderScanner {
            pattern: Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"),
        }
    }

    /// Find the leftmost token starting at or after `from`
    pub fn find_next(&self, text: &str, from: usize) -> Option<Token> {
        if from > text.len() || !text.is_char_boundary(from) {
            return None;
        }

        let caps = self.pattern.captures_at(text, from)?;
        let whole = caps.get(0)?;

        Some(Token {
            start: whole.start(),
            end: whole.end(),
            name: caps[1].trim().to_string(),
            argument: caps.get(2).map(|m| m.as_str().trim().to_string()),
        })
    }

    /// Every token in `text`, left to right
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while let Some(token) = self.find_next(text, pos) {
            pos = token.end;
            tokens.push(token);
        }
        tokens
    }
}

impl Default for PlaceholderScanner {
    fn default() -> Self {
        Self::new()
    }
}
