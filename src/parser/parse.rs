//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct: the token cursor, the symbol
//! table, the instruction writer and the optional parse trace, plus the helper
//! methods every production uses to inspect and consume tokens.
//!
//! # Parser Architecture
//!
//! Parsing and code generation are one pass. Each production validates its
//! tokens and emits VM instructions as it goes; no syntax tree is built.
//! - This module: Parser struct, cursor helpers, error construction
//! - `declarations`: class, class variables, subroutines, parameters, locals
//! - `statements`: `let`, `if`, `while`, `do`, `return`
//! - `expressions`: expressions, terms, subroutine calls
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::codegen::{render, Emitted, VmWriter};
use crate::errors::CompileError;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Keyword, SourceLocation, Token, TokenKind};
use crate::symbols::SymbolTable;
use crate::trace::ParseTrace;

/// Options for compiling one class.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Record the structural parse trace alongside the instructions.
    pub emit_trace: bool,
}

/// Result of compiling one class.
#[derive(Debug, Clone)]
pub struct CompiledClass {
    pub class_name: String,
    pub instructions: Vec<Emitted>,
    pub trace: Option<String>,
}

impl CompiledClass {
    /// The instruction stream as VM text.
    pub fn vm_code(&self) -> String {
        render(&self.instructions)
    }
}

/// Recursive descent compiler for one class
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) symbols: SymbolTable,
    pub(crate) writer: VmWriter,
    pub(crate) trace: ParseTrace,
    pub(crate) class_name: String,
    pub(crate) label_counter: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, CompileError> {
        Self::with_options(source, CompileOptions::default())
    }

    pub fn with_options(source: &str, options: CompileOptions) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            symbols: SymbolTable::new(),
            writer: VmWriter::new(),
            trace: ParseTrace::new(options.emit_trace),
            class_name: String::new(),
            label_counter: 0,
        })
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Everything emitted so far. After a failed compile this is the partial
    /// output up to the error, which must not be used as a result.
    pub fn output(&self) -> &[Emitted] {
        self.writer.lines()
    }

    pub fn into_output(self) -> CompiledClass {
        CompiledClass {
            class_name: self.class_name,
            instructions: self.writer.into_lines(),
            trace: self.trace.finish(),
        }
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    pub(crate) fn check_symbol(&self, symbol: char) -> bool {
        self.peek().is_symbol(symbol)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    /// Consume the current token without recording it in the trace. Later
    /// instructions are attributed to its location.
    pub(crate) fn next_token(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        self.writer.set_location(token.location());
        token
    }

    /// Consume the current token and record it in the trace.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.next_token();
        self.trace.token(&token);
        token
    }

    pub(crate) fn expect_keyword(
        &mut self,
        production: &'static str,
        expected: &[Keyword],
    ) -> Result<Keyword, CompileError> {
        match self.peek() {
            Token::Keyword(kw, _) if expected.contains(kw) => {
                let kw = *kw;
                self.advance();
                Ok(kw)
            }
            _ => Err(self.syntax_error(
                production,
                expected.iter().map(|kw| format!("'{}'", kw.as_str())).collect(),
            )),
        }
    }

    pub(crate) fn expect_symbol(
        &mut self,
        production: &'static str,
        symbol: char,
    ) -> Result<(), CompileError> {
        if self.check_symbol(symbol) {
            self.advance();
            Ok(())
        } else {
            Err(self.syntax_error(production, vec![format!("'{}'", symbol)]))
        }
    }

    /// Consume an identifier that names a class or subroutine.
    pub(crate) fn expect_identifier(
        &mut self,
        production: &'static str,
    ) -> Result<String, CompileError> {
        let (name, _) = self.expect_name(production)?;
        self.trace.token(&self.tokens[self.position - 1]);
        Ok(name)
    }

    /// Consume an identifier without tracing it; variable names are traced by
    /// the caller once the symbol table has been consulted.
    pub(crate) fn expect_name(
        &mut self,
        production: &'static str,
    ) -> Result<(String, SourceLocation), CompileError> {
        if let Token::Ident(name, loc) = self.peek() {
            let found = (name.clone(), *loc);
            self.next_token();
            Ok(found)
        } else {
            Err(self.type_error(production, TokenKind::Identifier))
        }
    }

    pub(crate) fn syntax_error(&self, production: &'static str, expected: Vec<String>) -> CompileError {
        CompileError::Syntax {
            production,
            found: self.peek().clone(),
            expected,
        }
    }

    pub(crate) fn type_error(&self, production: &'static str, expected: TokenKind) -> CompileError {
        CompileError::UnexpectedTokenType {
            production,
            found: self.peek().clone(),
            expected,
        }
    }

    /// Fresh suffix for a pair of branch labels.
    pub(crate) fn next_label_id(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }
}
