//! Lexer (tokenizer) for class source files
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Comments and whitespace are dropped. Each lexeme is classified from its own
//! text only, in a fixed order: keyword table, symbol set, integer constant,
//! identifier, string constant. Anything left over is an invalid token and
//! aborts lexing.

use super::token::{is_symbol, Keyword, SourceLocation, Token};
use crate::constants::MAX_INT_CONSTANT;
use std::fmt;

/// What went wrong while lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// The lexeme matches none of the token patterns.
    InvalidToken,
    /// A string constant hit a newline or the end of input before its closing quote.
    UnterminatedString,
    UnterminatedComment,
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            LexErrorKind::InvalidToken => "invalid token",
            LexErrorKind::UnterminatedString => "unterminated string constant",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
        };
        write!(
            f,
            "Lexer error at line {}, column {}: {} '{}'",
            self.location.line, self.location.column, what, self.lexeme
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for class source files
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            kind: LexErrorKind::InvalidToken,
            lexeme: String::new(),
            location: loc,
        })?;

        if ch == '"' {
            return self.string_constant(loc);
        }

        if ch.is_ascii_alphanumeric() || ch == '_' {
            let word = self.word(ch);
            return classify_word(word, loc);
        }

        if is_symbol(ch) {
            return Ok(Token::Symbol(ch, loc));
        }

        Err(LexError {
            kind: LexErrorKind::InvalidToken,
            lexeme: ch.to_string(),
            location: loc,
        })
    }

    /// Read the rest of a maximal run of letters, digits and underscores.
    fn word(&mut self, first: char) -> String {
        let mut word = String::new();
        word.push(first);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        word
    }

    /// Parse a string constant; the opening quote is already consumed.
    fn string_constant(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return if fits_vm_constants(&string) {
                        Ok(Token::StringConst(string, loc))
                    } else {
                        Err(LexError {
                            kind: LexErrorKind::InvalidToken,
                            lexeme: format!("\"{}\"", string),
                            location: loc,
                        })
                    };
                }
                '\n' => break,
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            kind: LexErrorKind::UnterminatedString,
            lexeme: format!("\"{}", string),
            location: loc,
        })
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip `/* ... */`, which also covers `/** ... */` doc comments.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            kind: LexErrorKind::UnterminatedComment,
            lexeme: "/*".to_string(),
            location: start_loc,
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Classify a word lexeme: keyword, then integer constant, then identifier.
fn classify_word(word: String, loc: SourceLocation) -> Result<Token, LexError> {
    if let Some(keyword) = Keyword::lookup(&word) {
        return Ok(Token::Keyword(keyword, loc));
    }

    if word.chars().all(|c| c.is_ascii_digit()) {
        return match word.parse::<u32>() {
            Ok(value) if value <= MAX_INT_CONSTANT as u32 => Ok(Token::IntConst(value as u16, loc)),
            _ => Err(LexError {
                kind: LexErrorKind::InvalidToken,
                lexeme: word,
                location: loc,
            }),
        };
    }

    if is_identifier(&word) {
        return Ok(Token::Ident(word, loc));
    }

    Err(LexError {
        kind: LexErrorKind::InvalidToken,
        lexeme: word,
        location: loc,
    })
}

/// String literals become `push constant` per character plus one for the length.
fn fits_vm_constants(string: &str) -> bool {
    string.chars().count() <= MAX_INT_CONSTANT as usize
        && string.chars().all(|c| c as u32 <= MAX_INT_CONSTANT as u32)
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
