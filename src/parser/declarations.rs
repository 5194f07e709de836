//! Declaration compilation
//!
//! This module handles the class-level structure of a compilation unit:
//!
//! - The class itself: `class Name { ... }`
//! - Class variables: `static` / `field` declarations
//! - Subroutines: `constructor`, `function`, `method`
//! - Parameter lists and `var` declarations
//!
//! # Grammar
//!
//! ```text
//! class          ::= 'class' className '{' classVarDec* subroutineDec* '}'
//! classVarDec    ::= ('static' | 'field') type varName (',' varName)* ';'
//! type           ::= 'int' | 'char' | 'boolean' | className
//! subroutineDec  ::= ('constructor' | 'function' | 'method') ('void' | type)
//!                    subroutineName '(' parameterList ')' subroutineBody
//! parameterList  ::= ((type varName) (',' type varName)*)?
//! subroutineBody ::= '{' varDec* statements '}'
//! varDec         ::= 'var' type varName (',' varName)* ';'
//! ```
//!
//! # Calling convention
//!
//! Every subroutine starts with `function Class.name nLocals`. The local count
//! is patched in once the body is done. A constructor then allocates one word
//! per field and binds the result to `pointer 0`; a method binds its hidden
//! argument 0 to `pointer 0`; a function has no preamble.

use crate::codegen::{HeaderSlot, Segment};
use crate::constants::{MEMORY_ALLOC, THIS_NAME};
use crate::errors::CompileError;
use crate::parser::parse::Parser;
use crate::parser::token::{Keyword, SourceLocation, Token, TokenKind};
use crate::symbols::Kind;
use crate::trace::Usage;

/// Which calling convention a subroutine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl Parser {
    /// Compile the whole compilation unit. Exactly one class per source.
    pub fn compile_class(&mut self) -> Result<(), CompileError> {
        self.trace.open("class");

        self.expect_keyword("class", &[Keyword::Class])?;
        self.class_name = self.expect_identifier("class")?;
        self.expect_symbol("class", '{')?;

        while self.check_keyword(Keyword::Static) || self.check_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }

        while self.check_keyword(Keyword::Constructor)
            || self.check_keyword(Keyword::Function)
            || self.check_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        self.expect_symbol("class", '}')?;
        self.trace.close("class");

        if !self.is_at_end() {
            return Err(self.syntax_error("class", vec!["end of file".to_string()]));
        }

        Ok(())
    }

    /// `static int a, b;` / `field Point origin;`
    fn compile_class_var_dec(&mut self) -> Result<(), CompileError> {
        self.trace.open("classVarDec");

        let kind = match self.expect_keyword("classVarDec", &[Keyword::Static, Keyword::Field])? {
            Keyword::Static => Kind::Static,
            _ => Kind::Field,
        };
        let ty = self.compile_type("classVarDec")?;
        self.declare_names("classVarDec", &ty, kind)?;

        self.trace.close("classVarDec");
        Ok(())
    }

    /// `int` | `char` | `boolean` | class name. Returns the type's spelling.
    pub(crate) fn compile_type(&mut self, production: &'static str) -> Result<String, CompileError> {
        match self.peek() {
            Token::Keyword(kw @ (Keyword::Int | Keyword::Char | Keyword::Boolean), _) => {
                let ty = kw.as_str().to_string();
                self.advance();
                Ok(ty)
            }
            Token::Ident(..) => self.expect_identifier(production),
            Token::Keyword(..) => Err(self.syntax_error(
                production,
                vec![
                    "'int'".to_string(),
                    "'char'".to_string(),
                    "'boolean'".to_string(),
                    "class name".to_string(),
                ],
            )),
            _ => Err(self.type_error(production, TokenKind::Identifier)),
        }
    }

    /// `varName (',' varName)* ';'`, defining each name. Returns how many were declared.
    fn declare_names(
        &mut self,
        production: &'static str,
        ty: &str,
        kind: Kind,
    ) -> Result<u16, CompileError> {
        let mut count: u16 = 0;

        loop {
            let location = self.declare_name(production, ty, kind)?;
            count = count
                .checked_add(1)
                .ok_or_else(|| too_many(production, kind, location))?;

            if self.check_symbol(',') {
                self.advance();
            } else {
                break;
            }
        }

        self.expect_symbol(production, ';')?;
        Ok(count)
    }

    /// Define one name and return where it was declared.
    fn declare_name(
        &mut self,
        production: &'static str,
        ty: &str,
        kind: Kind,
    ) -> Result<SourceLocation, CompileError> {
        let (name, location) = self.expect_name(production)?;
        self.symbols
            .define(&name, ty, kind)
            .ok_or_else(|| too_many(production, kind, location))?;
        self.trace
            .variable(&name, Usage::Defined, self.symbols.lookup(&name));
        Ok(location)
    }

    fn compile_subroutine(&mut self) -> Result<(), CompileError> {
        self.symbols.start_subroutine();
        self.trace.open("subroutineDec");

        let kind = match self.expect_keyword(
            "subroutineDec",
            &[Keyword::Constructor, Keyword::Function, Keyword::Method],
        )? {
            Keyword::Constructor => SubroutineKind::Constructor,
            Keyword::Method => SubroutineKind::Method,
            _ => SubroutineKind::Function,
        };

        if self.check_keyword(Keyword::Void) {
            self.advance();
        } else {
            self.compile_type("subroutineDec")?;
        }

        let name = self.expect_identifier("subroutineDec")?;
        let full_name = format!("{}.{}", self.class_name, name);

        if kind == SubroutineKind::Method {
            let class_name = self.class_name.clone();
            let location = self.peek().location();
            self.symbols
                .define(THIS_NAME, &class_name, Kind::Argument)
                .ok_or_else(|| too_many("subroutineDec", Kind::Argument, location))?;
        }

        self.expect_symbol("subroutineDec", '(')?;
        self.compile_parameter_list()?;
        self.expect_symbol("subroutineDec", ')')?;

        let header = self.writer.function(&full_name);
        self.compile_subroutine_body(kind, header)?;

        self.trace.close("subroutineDec");
        Ok(())
    }

    /// Returns the number of declared parameters (excluding a method's hidden `this`).
    fn compile_parameter_list(&mut self) -> Result<u16, CompileError> {
        self.trace.open("parameterList");
        let mut count: u16 = 0;

        if !self.check_symbol(')') {
            loop {
                let ty = self.compile_type("parameterList")?;
                let location = self.declare_name("parameterList", &ty, Kind::Argument)?;
                count = count
                    .checked_add(1)
                    .ok_or_else(|| too_many("parameterList", Kind::Argument, location))?;

                if self.check_symbol(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.trace.close("parameterList");
        Ok(count)
    }

    /// Compile `{ varDec* statements }` and fix up the header's local count.
    /// Returns the local count.
    fn compile_subroutine_body(
        &mut self,
        kind: SubroutineKind,
        header: HeaderSlot,
    ) -> Result<u16, CompileError> {
        self.trace.open("subroutineBody");
        self.expect_symbol("subroutineBody", '{')?;

        let mut locals: u16 = 0;
        while self.check_keyword(Keyword::Var) {
            let location = self.peek().location();
            locals = self
                .compile_var_dec()?
                .checked_add(locals)
                .ok_or_else(|| too_many("subroutineBody", Kind::Local, location))?;
        }
        debug_assert_eq!(locals, self.symbols.var_count(Kind::Local));

        match kind {
            SubroutineKind::Constructor => {
                let fields = self.symbols.var_count(Kind::Field);
                self.writer.push(Segment::Constant, fields);
                self.writer.call(MEMORY_ALLOC, 1);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Method => {
                self.writer.push(Segment::Argument, 0);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol("subroutineBody", '}')?;

        self.writer.patch_locals(&header, locals)?;

        self.trace.close("subroutineBody");
        Ok(locals)
    }

    /// `var type name (',' name)* ';'`. Returns how many names it declared.
    fn compile_var_dec(&mut self) -> Result<u16, CompileError> {
        self.trace.open("varDec");

        self.expect_keyword("varDec", &[Keyword::Var])?;
        let ty = self.compile_type("varDec")?;
        let count = self.declare_names("varDec", &ty, Kind::Local)?;

        self.trace.close("varDec");
        Ok(count)
    }
}

fn too_many(production: &'static str, kind: Kind, location: SourceLocation) -> CompileError {
    let what = match kind {
        Kind::Static => "static variables",
        Kind::Field => "fields",
        Kind::Argument => "arguments",
        Kind::Local => "local variables",
    };
    CompileError::TooMany {
        production,
        what,
        location,
    }
}
