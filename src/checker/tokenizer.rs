use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// A word extracted from one line of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// 1-based line number
    pub line: usize,
    /// Byte offset of the token within its line
    pub start: usize,
}

impl Token<'_> {
    /// 1-based column counted in chars, not bytes.
    pub fn column(&self, line: &str) -> usize {
        line[..self.start].chars().count() + 1
    }
}

/// Split a line into word tokens (`\w+` runs), left to right.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(line).map(|m| m.as_str())
}

/// Tokens of a single line, tagged with its line number.
pub fn tokens(line: &str, line_number: usize) -> impl Iterator<Item = Token<'_>> {
    WORD.find_iter(line).map(move |m| Token {
        text: m.as_str(),
        line: line_number,
        start: m.start(),
    })
}

/// Lines of `content` with 1-based numbers. Handles both `\n` and `\r\n`.
pub fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.lines().enumerate().map(|(idx, line)| (idx + 1, line))
}

/// True when `text` is exactly one token.
pub fn is_word(text: &str) -> bool {
    WORD.find(text).is_some_and(|m| m.start() == 0 && m.end() == text.len())
}
