//! Splitting command lines into tokens.
//!
//! The shell has no quoting, so tokenizing is plain splitting on the space
//! character. Adjacent spaces are not collapsed: `"a  b"` is three tokens,
//! the middle one empty, and callers see that empty token.

/// The only character the shell treats as a token separator.
pub const SEPARATOR: char = ' ';

/// Split `line` on single spaces, keeping empty tokens.
///
/// An empty line yields one empty token, the same as a line with nothing
/// between two separators.
pub fn split_whitespace(line: &str) -> Vec<&str> {
    line.split(SEPARATOR).collect()
}

/// Remove leading and trailing spaces.
///
/// Returns a subslice of `line`, so the original buffer is never touched.
/// Tabs and other whitespace are kept.
pub fn trim(line: &str) -> &str {
    line.trim_matches(SEPARATOR)
}
