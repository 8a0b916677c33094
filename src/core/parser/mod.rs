//! Command line tokenizer.
//!
//! Supports quote handling only: `"string with spaces"`, `'literal string'`.
//! There is no variable expansion, globbing, or statement chaining.

mod lexer;

pub use lexer::Lexer;

/// Split a raw input line into an argument vector.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn tokenize(line: &str) -> Vec<String> {
    Lexer::new(line).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spec_example() {
        assert_eq!(
            tokenize(r#"echo "hello world" 'a b'"#),
            vec!["echo", "hello world", "a b"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }
}
