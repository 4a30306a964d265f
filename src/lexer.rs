/*!
 * Tokenizer for ADL text.
 *
 * The lexer turns the document text into section tags (`<NAME>`,
 * `</NAME>`), keywords (`(NAME)`), data words, quoted strings and
 * comments (`/* ... */`). It supports one level of push-back and can
 * replay the input from the beginning up to a recorded token position,
 * which is how the section parser recovers from overlapping tags.
 */

use std::io::Read;

use log::{debug, trace};

use crate::errors::AdlError;

/// Escape marker of the ADL format. The character after it is literal.
pub const ESCAPE: char = '\u{1B}';

const QUOTE: char = '"';

/// Kind of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    SectionOpen,
    SectionClose,
    Keyword,
    Data,
    Comment,
    EndOfInput,
}

/// A lexical token.
///
/// For tags and keywords `text` is the bare name without delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Index of the token in the stream, starting at 1
    pub position: usize,
    /// Source line the token starts on, starting at 1
    pub line: usize,
    /// Data came from a `"..."` span
    pub quoted: bool,
}

impl Token {
    /// Unquoted `_` marks an unset optional field
    pub fn is_placeholder(&self) -> bool {
        !self.quoted && self.text == "_"
    }

    /// Case-insensitive name comparison for tags and keywords
    pub fn names(&self, name: &str) -> bool {
        self.text.eq_ignore_ascii_case(name)
    }
}

fn is_separator(c: char) -> bool {
    c != ESCAPE && (c <= ' ' || c == '\u{7F}' || c.is_whitespace())
}

/// Tokenizer over an owned copy of the document text
pub struct Lexer {
    chars: Vec<char>,
    cursor: usize,
    line: usize,
    position: usize,
    current: Option<Token>,
    pushed_back: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            cursor: 0,
            line: 1,
            position: 0,
            current: None,
            pushed_back: false,
        }
    }

    /// Read the whole input, then release the reader.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, AdlError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        drop(reader);
        Ok(Self::new(&String::from_utf8_lossy(&bytes)))
    }

    /// Number of tokens consumed so far
    pub fn token_position(&self) -> usize {
        self.position
    }

    /// Line of the most recently returned token
    pub fn line(&self) -> usize {
        self.current.as_ref().map_or(self.line, |t| t.line)
    }

    pub fn next_token(&mut self) -> Token {
        if self.pushed_back {
            if let Some(token) = &self.current {
                self.pushed_back = false;
                self.position += 1;
                return token.clone();
            }
        }

        let mut token = self.scan();
        self.position += 1;
        token.position = self.position;
        trace!("token {} {:?} '{}'", token.position, token.kind, token.text);
        self.current = Some(token.clone());
        token
    }

    /// Undo the last `next_token`. Only one level is kept.
    pub fn push_back(&mut self) {
        if self.pushed_back || self.current.is_none() {
            debug!("Push-back ignored at token {}", self.position);
            return;
        }
        self.pushed_back = true;
        self.position -= 1;
    }

    /// Start over and consume tokens until `position` tokens have been read
    pub fn restart_from(&mut self, position: usize) {
        debug!("Replaying input up to token {}", position);
        self.cursor = 0;
        self.line = 1;
        self.position = 0;
        self.current = None;
        self.pushed_back = false;
        while self.position < position {
            if self.next_token().kind == TokenKind::EndOfInput {
                break;
            }
        }
    }

    /// Collect the data tokens following a keyword.
    ///
    /// A comment ends the run and is dropped, any other token is pushed back.
    pub fn data_for_keyword(&mut self) -> Vec<Token> {
        let mut data = Vec::new();
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Data => data.push(token),
                TokenKind::Comment => break,
                _ => {
                    self.push_back();
                    break;
                }
            }
        }
        data
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if !is_separator(c) {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.cursor += 1;
        }
    }

    fn token(&self, kind: TokenKind, text: String, line: usize, quoted: bool) -> Token {
        Token { kind, text, position: 0, line, quoted }
    }

    fn scan(&mut self) -> Token {
        self.skip_separators();
        let line = self.line;
        let Some(first) = self.peek() else {
            return self.token(TokenKind::EndOfInput, String::new(), line, false);
        };

        if first == QUOTE {
            let text = self.scan_quoted();
            return self.token(TokenKind::Data, text, line, true);
        }

        if first == '<' || first == '(' {
            if let Some(token) = self.scan_delimited(first, line) {
                return token;
            }
        }

        let word = self.scan_word();
        if word.starts_with("/*") {
            let text = self.scan_comment(word);
            return self.token(TokenKind::Comment, text, line, false);
        }
        self.token(TokenKind::Data, word, line, false)
    }

    fn scan_quoted(&mut self) -> String {
        let mut text = String::new();
        self.cursor += 1;
        while let Some(c) = self.peek() {
            match c {
                QUOTE => {
                    self.cursor += 1;
                    break;
                }
                '\n' => break,
                ESCAPE => {
                    self.cursor += 1;
                    if let Some(escaped) = self.peek().filter(|e| *e != '\n') {
                        text.push(escaped);
                        self.cursor += 1;
                    }
                }
                _ => {
                    text.push(c);
                    self.cursor += 1;
                }
            }
        }
        text
    }

    // `<NAME>` or `(NAME)` at the start of a word; the rest of the word is
    // left for the next token
    fn scan_delimited(&mut self, open: char, line: usize) -> Option<Token> {
        let close = if open == '<' { '>' } else { ')' };
        let mut end = self.cursor + 1;
        while let Some(&c) = self.chars.get(end) {
            if c == close {
                break;
            }
            if is_separator(c) || c == QUOTE {
                return None;
            }
            end += 1;
        }
        if end >= self.chars.len() {
            return None;
        }

        let inner: String = self.chars[self.cursor + 1..end].iter().collect();
        self.cursor = end + 1;

        let token = if open == '(' {
            self.token(TokenKind::Keyword, inner, line, false)
        } else if let Some(name) = inner.strip_prefix('/') {
            self.token(TokenKind::SectionClose, name.to_string(), line, false)
        } else {
            self.token(TokenKind::SectionOpen, inner, line, false)
        };
        Some(token)
    }

    fn scan_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_separator(c) || c == QUOTE {
                break;
            }
            self.cursor += 1;
            if c == ESCAPE {
                if let Some(escaped) = self.peek().filter(|e| !is_separator(*e)) {
                    word.push(escaped);
                    self.cursor += 1;
                }
                continue;
            }
            word.push(c);
        }
        word
    }

    // Comments run over word boundaries until a word ends in `*/`
    fn scan_comment(&mut self, first_word: String) -> String {
        let mut text = first_word;
        while !text.ends_with("*/") {
            self.skip_separators();
            if self.peek().is_none() {
                break;
            }
            let mut word = String::new();
            while let Some(c) = self.peek().filter(|c| !is_separator(*c)) {
                word.push(c);
                self.cursor += 1;
            }
            text.push(' ');
            text.push_str(&word);
        }
        text
    }
}
