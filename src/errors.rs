//! Compile error types
//!
//! This module defines [`CompileError`], covering every way compiling a single
//! class can fail. All errors are fatal for the file being compiled: the parser
//! stops at the first one and does not try to recover. The batch driver decides
//! whether to carry on with the remaining files.

use crate::parser::lexer::LexError;
use crate::parser::token::{SourceLocation, Token, TokenKind};
use std::fmt;

/// Errors that abort compilation of one class
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The lexer could not classify a lexeme
    Lexical(LexError),

    /// A token was present but not one the production accepts
    Syntax {
        production: &'static str,
        found: Token,
        expected: Vec<String>,
    },

    /// A token of the wrong category (e.g. a symbol where an identifier belongs)
    UnexpectedTokenType {
        production: &'static str,
        found: Token,
        expected: TokenKind,
    },

    /// A name used as a variable is not declared in any visible scope
    UndefinedVariable {
        production: &'static str,
        name: String,
        location: SourceLocation,
    },

    /// A count that the VM stores in 16 bits (declared variables of one kind,
    /// locals, call arguments) went past 65535
    TooMany {
        production: &'static str,
        what: &'static str,
        location: SourceLocation,
    },

    /// The function header to patch with the local count is not where it was
    /// recorded; the output buffer is inconsistent
    UnresolvedPatchTarget { subroutine: String, offset: usize },
}

impl CompileError {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CompileError::Lexical(err) => Some(err.location),
            CompileError::Syntax { found, .. } => Some(found.location()),
            CompileError::UnexpectedTokenType { found, .. } => Some(found.location()),
            CompileError::UndefinedVariable { location, .. }
            | CompileError::TooMany { location, .. } => Some(*location),
            CompileError::UnresolvedPatchTarget { .. } => None,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lexical(err) => write!(f, "{}", err),
            CompileError::Syntax {
                production,
                found,
                expected,
            } => {
                let loc = found.location();
                write!(
                    f,
                    "Syntax error at line {}, column {} in {}: found {} '{}', expected {}",
                    loc.line,
                    loc.column,
                    production,
                    found.kind(),
                    found.lexeme(),
                    expected.join(" or ")
                )
            }
            CompileError::UnexpectedTokenType {
                production,
                found,
                expected,
            } => {
                let loc = found.location();
                write!(
                    f,
                    "Unexpected token type at line {}, column {} in {}: found {} '{}', expected {}",
                    loc.line,
                    loc.column,
                    production,
                    found.kind(),
                    found.lexeme(),
                    expected
                )
            }
            CompileError::UndefinedVariable {
                production,
                name,
                location,
            } => {
                write!(
                    f,
                    "Undefined variable '{}' at line {}, column {} in {}",
                    name, location.line, location.column, production
                )
            }
            CompileError::TooMany {
                production,
                what,
                location,
            } => {
                write!(
                    f,
                    "Too many {} at line {}, column {} in {}: at most {} are allowed",
                    what,
                    location.line,
                    location.column,
                    production,
                    u16::MAX
                )
            }
            CompileError::UnresolvedPatchTarget { subroutine, offset } => {
                write!(
                    f,
                    "Internal error: no function header for '{}' at output offset {}",
                    subroutine, offset
                )
            }
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lexical(err)
    }
}
