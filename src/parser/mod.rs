//! Front end and code generator for class source files
//!
//! Compilation is a single pass over the token stream:
//! - [`token`]: token kinds, keywords, source locations
//! - [`lexer`]: tokenization (source text → tokens)
//! - [`parse`]: the [`Parser`] cursor and its helpers
//! - `declarations`, `statements`, `expressions`: one `impl Parser` block
//!   per grammar layer, each emitting VM instructions as it recognizes them
//!
//! # Supported Language
//!
//! - One class per source, with `static` and `field` variables
//! - Subroutines: `constructor`, `function`, `method`
//! - Types: `int`, `char`, `boolean`, class names
//! - Statements: `let`, `if`/`else`, `while`, `do`, `return`
//! - Expressions: integer and string constants, `true`/`false`/`null`/`this`,
//!   array indexing, subroutine calls, `- ~` unary and `+ - * / & | < > =`
//!   binary operators with no precedence
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent. No syntax tree is built.

pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
pub mod token;

pub use parse::{CompileOptions, CompiledClass, Parser};
