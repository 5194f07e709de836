//! Statement compilation
//!
//! ```text
//! statements      ::= statement*
//! statement       ::= letStatement | ifStatement | whileStatement
//!                   | doStatement | returnStatement
//! letStatement    ::= 'let' varName ('[' expression ']')? '=' expression ';'
//! ifStatement     ::= 'if' '(' expression ')' '{' statements '}'
//!                     ('else' '{' statements '}')?
//! whileStatement  ::= 'while' '(' expression ')' '{' statements '}'
//! doStatement     ::= 'do' subroutineCall ';'
//! returnStatement ::= 'return' expression? ';'
//! ```
//!
//! Branches jump on the negated condition. Every `if`/`while` draws a fresh
//! number from the parser's label counter, so labels never collide within a
//! file however deeply the constructs nest.

use crate::codegen::{Command, Segment};
use crate::constants::{IF_END_LABEL, IF_FALSE_LABEL, WHILE_END_LABEL, WHILE_EXP_LABEL};
use crate::errors::CompileError;
use crate::parser::parse::Parser;
use crate::parser::token::{Keyword, Token};
use crate::trace::Usage;

impl Parser {
    /// Compile statements until a token that cannot start one.
    pub(crate) fn compile_statements(&mut self) -> Result<(), CompileError> {
        self.trace.open("statements");

        loop {
            match self.peek() {
                Token::Keyword(Keyword::Let, _) => self.compile_let()?,
                Token::Keyword(Keyword::If, _) => self.compile_if()?,
                Token::Keyword(Keyword::While, _) => self.compile_while()?,
                Token::Keyword(Keyword::Do, _) => self.compile_do()?,
                Token::Keyword(Keyword::Return, _) => self.compile_return()?,
                _ => break,
            }
        }

        self.trace.close("statements");
        Ok(())
    }

    fn compile_let(&mut self) -> Result<(), CompileError> {
        self.trace.open("letStatement");
        self.expect_keyword("letStatement", &[Keyword::Let])?;

        let (name, loc) = self.expect_name("letStatement")?;
        let target = self.symbols.lookup(&name).cloned();
        self.trace.variable(&name, Usage::Used, target.as_ref());

        let undefined = || CompileError::UndefinedVariable {
            production: "letStatement",
            name: name.clone(),
            location: loc,
        };

        if self.check_symbol('[') {
            let target = target.ok_or_else(undefined)?;
            self.advance();
            self.writer.push(target.kind.segment(), target.index);
            self.compile_expression()?;
            self.expect_symbol("letStatement", ']')?;
            self.writer.arithmetic(Command::Add);

            self.expect_symbol("letStatement", '=')?;
            self.compile_expression()?;
            self.expect_symbol("letStatement", ';')?;

            self.writer.pop(Segment::Temp, 0);
            self.writer.pop(Segment::Pointer, 1);
            self.writer.push(Segment::Temp, 0);
            self.writer.pop(Segment::That, 0);
        } else {
            self.expect_symbol("letStatement", '=')?;
            let target = target.ok_or_else(undefined)?;
            self.compile_expression()?;
            self.expect_symbol("letStatement", ';')?;

            self.writer.pop(target.kind.segment(), target.index);
        }

        self.trace.close("letStatement");
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), CompileError> {
        self.trace.open("ifStatement");
        self.expect_keyword("ifStatement", &[Keyword::If])?;

        let id = self.next_label_id();
        let false_label = format!("{}{}", IF_FALSE_LABEL, id);
        let end_label = format!("{}{}", IF_END_LABEL, id);

        self.expect_symbol("ifStatement", '(')?;
        self.compile_expression()?;
        self.expect_symbol("ifStatement", ')')?;
        self.writer.arithmetic(Command::Not);
        self.writer.if_goto(&false_label);

        self.compile_block("ifStatement")?;
        self.writer.goto(&end_label);
        self.writer.label(&false_label);

        if self.check_keyword(Keyword::Else) {
            self.advance();
            self.compile_block("ifStatement")?;
        }

        self.writer.label(&end_label);
        self.trace.close("ifStatement");
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), CompileError> {
        self.trace.open("whileStatement");
        self.expect_keyword("whileStatement", &[Keyword::While])?;

        let id = self.next_label_id();
        let exp_label = format!("{}{}", WHILE_EXP_LABEL, id);
        let end_label = format!("{}{}", WHILE_END_LABEL, id);

        self.writer.label(&exp_label);
        self.expect_symbol("whileStatement", '(')?;
        self.compile_expression()?;
        self.expect_symbol("whileStatement", ')')?;
        self.writer.arithmetic(Command::Not);
        self.writer.if_goto(&end_label);

        self.compile_block("whileStatement")?;
        self.writer.goto(&exp_label);
        self.writer.label(&end_label);

        self.trace.close("whileStatement");
        Ok(())
    }

    /// `'{' statements '}'`
    fn compile_block(&mut self, production: &'static str) -> Result<(), CompileError> {
        self.expect_symbol(production, '{')?;
        self.compile_statements()?;
        self.expect_symbol(production, '}')
    }

    /// The call's value is discarded.
    fn compile_do(&mut self) -> Result<(), CompileError> {
        self.trace.open("doStatement");
        self.expect_keyword("doStatement", &[Keyword::Do])?;

        self.compile_subroutine_call("doStatement")?;
        self.expect_symbol("doStatement", ';')?;
        self.writer.pop(Segment::Temp, 0);

        self.trace.close("doStatement");
        Ok(())
    }

    /// Every call site pops exactly one result, so a bare `return` still pushes one.
    fn compile_return(&mut self) -> Result<(), CompileError> {
        self.trace.open("returnStatement");
        self.expect_keyword("returnStatement", &[Keyword::Return])?;

        if self.check_symbol(';') {
            self.writer.push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol("returnStatement", ';')?;
        self.writer.ret();

        self.trace.close("returnStatement");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::render;
    use crate::errors::CompileError;
    use crate::parser::parse::Parser;
    use crate::parser::token::TokenKind;

    fn body(statements: &str) -> String {
        let source = format!(
            "class T {{ field int f; static Array s; method void m(int a, Array arr) {{ var int x, y; {} }} }}",
            statements
        );
        let mut parser = Parser::new(&source).unwrap();
        parser.compile_class().unwrap();
        let vm = render(parser.output());
        // drop the header and the method preamble
        vm.lines().skip(3).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_let_simple_targets_each_segment() {
        assert_eq!(body("let x = 1; return;").lines().nth(1), Some("pop local 0"));
        assert_eq!(body("let f = 1; return;").lines().nth(1), Some("pop this 0"));
        assert_eq!(body("let a = 1; return;").lines().nth(1), Some("pop argument 1"));
        assert_eq!(body("let s = 1; return;").lines().nth(1), Some("pop static 0"));
    }

    #[test]
    fn test_let_array_element() {
        assert_eq!(
            body("let arr[y] = x; return;"),
            "push argument 2\npush local 1\nadd\npush local 0\npop temp 0\npop pointer 1\npush temp 0\npop that 0\npush constant 0\nreturn"
        );
    }

    #[test]
    fn test_if_else() {
        assert_eq!(
            body("if (x) { let y = 1; } else { let y = 2; } return;"),
            "push local 0\nnot\nif-goto IF_FALSE0\npush constant 1\npop local 1\ngoto IF_END0\nlabel IF_FALSE0\npush constant 2\npop local 1\nlabel IF_END0\npush constant 0\nreturn"
        );
    }

    #[test]
    fn test_while() {
        assert_eq!(
            body("while (x) { let x = 0; } return;"),
            "label WHILE_EXP0\npush local 0\nnot\nif-goto WHILE_END0\npush constant 0\npop local 0\ngoto WHILE_EXP0\nlabel WHILE_END0\npush constant 0\nreturn"
        );
    }

    #[test]
    fn test_do_discards_result() {
        assert_eq!(
            body("do Output.printInt(x); return;"),
            "push local 0\ncall Output.printInt 1\npop temp 0\npush constant 0\nreturn"
        );
    }

    #[test]
    fn test_return_value() {
        assert_eq!(body("return x;"), "push local 0\nreturn");
    }

    #[test]
    fn test_let_missing_equals() {
        let mut parser =
            Parser::new("class T { function void f() { var int x; let x 5; return; } }").unwrap();
        let err = parser.compile_class().unwrap_err();

        match &err {
            CompileError::Syntax {
                production,
                found,
                expected,
            } => {
                assert_eq!(*production, "letStatement");
                assert_eq!(found.kind(), TokenKind::IntegerConstant);
                assert_eq!(found.lexeme(), "5");
                assert_eq!(expected, &vec!["'='".to_string()]);
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }

        // only the header was emitted
        assert_eq!(render(parser.output()), "function T.f 0\n");
    }

    #[test]
    fn test_let_array_missing_equals_keeps_target_code() {
        let mut parser =
            Parser::new("class T { function void f() { var Array a; let a[1] 5; return; } }")
                .unwrap();
        let err = parser.compile_class().unwrap_err();

        match &err {
            CompileError::Syntax {
                production,
                found,
                expected,
            } => {
                assert_eq!(*production, "letStatement");
                assert_eq!(found.lexeme(), "5");
                assert_eq!(expected, &vec!["'='".to_string()]);
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }

        // the element address is computed before '=' is reached
        assert_eq!(
            render(parser.output()),
            "function T.f 0\npush local 0\npush constant 1\nadd\n"
        );
    }

    #[test]
    fn test_let_undeclared_target() {
        let mut parser =
            Parser::new("class T { function void f() { let nope = 1; return; } }").unwrap();
        let err = parser.compile_class().unwrap_err();
        assert!(matches!(
            err,
            CompileError::UndefinedVariable { ref name, .. } if name == "nope"
        ));
    }
}
