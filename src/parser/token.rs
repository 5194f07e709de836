//! Token definitions shared by the lexer, the parser and the parse trace.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "class" => Keyword::Class,
            "constructor" => Keyword::Constructor,
            "function" => Keyword::Function,
            "method" => Keyword::Method,
            "field" => Keyword::Field,
            "static" => Keyword::Static,
            "var" => Keyword::Var,
            "int" => Keyword::Int,
            "char" => Keyword::Char,
            "boolean" => Keyword::Boolean,
            "void" => Keyword::Void,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            "this" => Keyword::This,
            "let" => Keyword::Let,
            "do" => Keyword::Do,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "return" => Keyword::Return,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }
}

/// The fixed single-character symbol set.
pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|',
    '<', '>', '=', '~',
];

pub fn is_symbol(ch: char) -> bool {
    SYMBOLS.contains(&ch)
}

/// Token category, independent of the token's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    IntegerConstant,
    StringConstant,
    Identifier,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
            TokenKind::Identifier => "identifier",
            TokenKind::Eof => "end of file",
        };
        f.write_str(name)
    }
}

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that errors and emitted
/// instructions can point back at the source without a side table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword, SourceLocation),
    Symbol(char, SourceLocation),
    IntConst(u16, SourceLocation),
    StringConst(String, SourceLocation),
    Ident(String, SourceLocation),
    Eof(SourceLocation),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(..) => TokenKind::Keyword,
            Token::Symbol(..) => TokenKind::Symbol,
            Token::IntConst(..) => TokenKind::IntegerConstant,
            Token::StringConst(..) => TokenKind::StringConstant,
            Token::Ident(..) => TokenKind::Identifier,
            Token::Eof(_) => TokenKind::Eof,
        }
    }

    /// The literal text of the token (string constants without quotes).
    pub fn lexeme(&self) -> String {
        match self {
            Token::Keyword(kw, _) => kw.as_str().to_string(),
            Token::Symbol(ch, _) => ch.to_string(),
            Token::IntConst(n, _) => n.to_string(),
            Token::StringConst(s, _) | Token::Ident(s, _) => s.clone(),
            Token::Eof(_) => String::new(),
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Keyword(_, loc)
            | Token::Symbol(_, loc)
            | Token::IntConst(_, loc)
            | Token::StringConst(_, loc)
            | Token::Ident(_, loc)
            | Token::Eof(loc) => *loc,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(kw, _) if *kw == keyword)
    }

    pub fn is_symbol(&self, symbol: char) -> bool {
        matches!(self, Token::Symbol(ch, _) if *ch == symbol)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(kw, _) => write!(f, "keyword '{}'", kw.as_str()),
            Token::Symbol(ch, _) => write!(f, "symbol '{}'", ch),
            Token::IntConst(n, _) => write!(f, "integerConstant {}", n),
            Token::StringConst(s, _) => write!(f, "stringConstant \"{}\"", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(Keyword::lookup("while"), Some(Keyword::While));
        assert_eq!(Keyword::lookup("While"), None);
        assert_eq!(Keyword::lookup("whilex"), None);
        assert_eq!(Keyword::lookup(Keyword::Constructor.as_str()), Some(Keyword::Constructor));
    }

    #[test]
    fn test_token_kind_and_lexeme() {
        let loc = SourceLocation::new(3, 7);
        let token = Token::StringConst("hi there".to_string(), loc);
        assert_eq!(token.kind(), TokenKind::StringConstant);
        assert_eq!(token.lexeme(), "hi there");
        assert_eq!(token.location(), loc);
        assert!(Token::Symbol('=', loc).is_symbol('='));
        assert!(!Token::Symbol('=', loc).is_keyword(Keyword::Let));
    }
}
