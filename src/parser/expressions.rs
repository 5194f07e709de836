//! Expression compilation
//!
//! ```text
//! expression     ::= term (op expression)?
//! term           ::= integerConstant | stringConstant | keywordConstant
//!                  | varName | varName '[' expression ']' | subroutineCall
//!                  | '(' expression ')' | unaryOp term
//! subroutineCall ::= subroutineName '(' expressionList ')'
//!                  | (className | varName) '.' subroutineName '(' expressionList ')'
//! expressionList ::= (expression (',' expression)*)?
//! op             ::= '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '='
//! unaryOp        ::= '-' | '~'
//! ```
//!
//! # Evaluation order
//!
//! Binary operators have no precedence among themselves. The right operand of
//! an operator is the whole remaining expression, so `1 + 2 * 3` pushes all
//! three operands before it multiplies and then adds. Parentheses are the only
//! way to group to the left.
//!
//! A chain is compiled with a loop rather than by recursion: operands are
//! emitted as they are read and the operators are held back, then emitted
//! last-read first. Only parentheses and unary operators nest.
//!
//! `*` and `/` are runtime library calls; every other operator maps to a
//! single VM command.
//!
//! # Calls
//!
//! The callee is resolved by looking at the name before the dot:
//! - a variable: the object is pushed as a hidden first argument and the call
//!   goes to the variable's declared class
//! - anything else: the name is taken as a class, no hidden argument
//! - no dot at all: a method of the current object, with `pointer 0` as the
//!   hidden argument

use crate::codegen::{Command, Segment};
use crate::constants::{MATH_DIVIDE, MATH_MULTIPLY, STRING_APPEND_CHAR, STRING_NEW};
use crate::errors::CompileError;
use crate::parser::parse::Parser;
use crate::parser::token::{Keyword, SourceLocation, Token};
use crate::symbols::Symbol;
use crate::trace::Usage;

const BINARY_OPS: [char; 9] = ['+', '-', '*', '/', '&', '|', '<', '>', '='];

impl Parser {
    /// Compile an expression, leaving exactly one value on the stack.
    pub(crate) fn compile_expression(&mut self) -> Result<(), CompileError> {
        self.trace.open("expression");
        self.compile_operator_chain()?;
        self.trace.close("expression");
        Ok(())
    }

    /// `term (op term)*`, applied right to left once every operand is pushed.
    fn compile_operator_chain(&mut self) -> Result<(), CompileError> {
        self.compile_term()?;

        let mut pending = Vec::new();
        while let Token::Symbol(ch, _) = self.peek() {
            if !BINARY_OPS.contains(ch) {
                break;
            }
            let op = *ch;
            let op_token = self.advance();
            pending.push((op, op_token.location()));
            self.compile_term()?;
        }

        for (op, location) in pending.into_iter().rev() {
            self.writer.set_location(location);
            self.emit_binary(op);
        }
        Ok(())
    }

    fn emit_binary(&mut self, op: char) {
        match op {
            '*' => self.writer.call(MATH_MULTIPLY, 2),
            '/' => self.writer.call(MATH_DIVIDE, 2),
            '+' => self.writer.arithmetic(Command::Add),
            '-' => self.writer.arithmetic(Command::Sub),
            '&' => self.writer.arithmetic(Command::And),
            '|' => self.writer.arithmetic(Command::Or),
            '<' => self.writer.arithmetic(Command::Lt),
            '>' => self.writer.arithmetic(Command::Gt),
            _ => self.writer.arithmetic(Command::Eq),
        }
    }

    fn compile_term(&mut self) -> Result<(), CompileError> {
        self.trace.open("term");

        match self.peek() {
            Token::IntConst(value, _) => {
                let value = *value;
                self.advance();
                self.writer.push(Segment::Constant, value);
            }
            Token::StringConst(text, _) => {
                let text = text.clone();
                self.advance();
                self.emit_string(&text);
            }
            Token::Keyword(Keyword::True, _) => {
                self.advance();
                self.writer.push(Segment::Constant, 0);
                self.writer.arithmetic(Command::Not);
            }
            Token::Keyword(Keyword::False | Keyword::Null, _) => {
                self.advance();
                self.writer.push(Segment::Constant, 0);
            }
            Token::Keyword(Keyword::This, _) => {
                self.advance();
                self.writer.push(Segment::Pointer, 0);
            }
            Token::Ident(..) => {
                let indexed = self.peek_ahead(1).is_some_and(|t| t.is_symbol('['));
                let called = self
                    .peek_ahead(1)
                    .is_some_and(|t| t.is_symbol('(') || t.is_symbol('.'));

                if indexed {
                    self.compile_array_read()?;
                } else if called {
                    self.compile_subroutine_call("term")?;
                } else {
                    let (name, loc) = self.expect_name("term")?;
                    let symbol = self.resolve_variable("term", &name, loc)?;
                    self.writer.push(symbol.kind.segment(), symbol.index);
                }
            }
            Token::Symbol('(', _) => {
                self.advance();
                self.compile_expression()?;
                self.expect_symbol("term", ')')?;
            }
            Token::Symbol(op @ ('-' | '~'), _) => {
                let command = if *op == '-' { Command::Neg } else { Command::Not };
                let op_token = self.advance();
                self.compile_term()?;
                self.writer.set_location(op_token.location());
                self.writer.arithmetic(command);
            }
            _ => {
                return Err(self.syntax_error(
                    "term",
                    [
                        "integerConstant",
                        "stringConstant",
                        "'true'",
                        "'false'",
                        "'null'",
                        "'this'",
                        "identifier",
                        "'('",
                        "'-'",
                        "'~'",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ))
            }
        }

        self.trace.close("term");
        Ok(())
    }

    /// Build a string object one character at a time.
    fn emit_string(&mut self, text: &str) {
        // the lexer only admits strings whose length and codes fit a constant
        self.writer
            .push(Segment::Constant, text.chars().count() as u16);
        self.writer.call(STRING_NEW, 1);
        for ch in text.chars() {
            self.writer.push(Segment::Constant, ch as u16);
            self.writer.call(STRING_APPEND_CHAR, 2);
        }
    }

    /// `name '[' expression ']'` as a value.
    fn compile_array_read(&mut self) -> Result<(), CompileError> {
        let (name, loc) = self.expect_name("term")?;
        let symbol = self.resolve_variable("term", &name, loc)?;

        self.expect_symbol("term", '[')?;
        self.writer.push(symbol.kind.segment(), symbol.index);
        self.compile_expression()?;
        self.expect_symbol("term", ']')?;

        self.writer.arithmetic(Command::Add);
        self.writer.pop(Segment::Pointer, 1);
        self.writer.push(Segment::That, 0);
        Ok(())
    }

    /// Look up a name used as a value. Names the table does not know are not
    /// variables, and a value cannot be read from them.
    fn resolve_variable(
        &mut self,
        production: &'static str,
        name: &str,
        location: SourceLocation,
    ) -> Result<Symbol, CompileError> {
        let symbol = self.symbols.lookup(name).cloned();
        self.trace.variable(name, Usage::Used, symbol.as_ref());

        symbol.ok_or_else(|| CompileError::UndefinedVariable {
            production,
            name: name.to_string(),
            location,
        })
    }

    pub(crate) fn compile_subroutine_call(
        &mut self,
        production: &'static str,
    ) -> Result<(), CompileError> {
        let (first, loc) = self.expect_name(production)?;
        let receiver = self.symbols.lookup(&first).cloned();
        match &receiver {
            Some(symbol) => self.trace.variable(&first, Usage::Used, Some(symbol)),
            None => self.trace.token(&Token::Ident(first.clone(), loc)),
        }

        let (target, hidden) = if self.check_symbol('.') {
            self.advance();
            let name = self.expect_identifier(production)?;
            match receiver {
                Some(symbol) => {
                    self.writer.push(symbol.kind.segment(), symbol.index);
                    (format!("{}.{}", symbol.ty, name), 1)
                }
                None => (format!("{}.{}", first, name), 0),
            }
        } else {
            self.writer.push(Segment::Pointer, 0);
            (format!("{}.{}", self.class_name, first), 1)
        };

        self.expect_symbol(production, '(')?;
        let args = self.compile_expression_list()?;
        self.expect_symbol(production, ')')?;

        let nargs = args.checked_add(hidden).ok_or(CompileError::TooMany {
            production,
            what: "call arguments",
            location: loc,
        })?;
        self.writer.set_location(loc);
        self.writer.call(&target, nargs);
        Ok(())
    }

    /// Returns the number of expressions compiled.
    fn compile_expression_list(&mut self) -> Result<u16, CompileError> {
        self.trace.open("expressionList");
        let mut count: u16 = 0;

        if !self.check_symbol(')') {
            loop {
                let location = self.peek().location();
                self.compile_expression()?;
                count = count.checked_add(1).ok_or(CompileError::TooMany {
                    production: "expressionList",
                    what: "call arguments",
                    location,
                })?;

                if self.check_symbol(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.trace.close("expressionList");
        Ok(count)
    }
}
