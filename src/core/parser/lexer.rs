//! Lexer for splitting a command line into words.
//!
//! Handles:
//! - Whitespace-separated words
//! - Single and double quotes (no escapes inside either)
//! - Quoted runs glued to adjacent characters (`a"b c"` is one word)
//! - Unterminated quotes, which swallow the rest of the line literally
//!
//! Operators such as `|`, `;` and `&&` are ordinary characters here.

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing shell input
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input into a vector
    ///
    /// This is a convenience method that collects all words.
    /// For lazy evaluation, use the `Iterator` implementation directly.
    pub fn tokenize(self) -> Vec<String> {
        self.collect()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            let c = self.current_char();
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn current_char(&self) -> char {
        self.input[self.pos..].chars().next().unwrap_or('\0')
    }

    /// Read one word starting at a non-whitespace character.
    fn parse_word(&mut self) -> String {
        let mut word = String::new();

        while self.pos < self.input.len() {
            let c = self.current_char();
            match c {
                '"' | '\'' => self.parse_quoted(c, &mut word),
                c if c.is_whitespace() => break,
                c => {
                    word.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }

        word
    }

    /// Append the body of a quoted run to `word`, consuming the closing quote.
    fn parse_quoted(&mut self, quote: char, word: &mut String) {
        self.pos += quote.len_utf8();
        let start = self.pos;

        match self.input[start..].find(quote) {
            Some(offset) => {
                word.push_str(&self.input[start..start + offset]);
                self.pos = start + offset + quote.len_utf8();
            }
            None => {
                // Unclosed quote, the rest of the line is literal
                word.push_str(&self.input[start..]);
                self.pos = self.input.len();
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        Some(self.parse_word())
    }
}

// =============================================================================
// Tests
// =============================================================================
