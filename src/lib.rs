//! # Introduction
//!
//! jackc compiles class source files (`.jack`) into text for a stack-based
//! virtual machine (`.vm`). A file is compiled in a single pass: the parser
//! validates the grammar and emits instructions as it goes, consulting a
//! scoped symbol table for every variable it meets.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Parser + SymbolTable → VmWriter → .vm text
//!                         ↘ ParseTrace → .xml (optional)
//! ```
//!
//! 1. [`parser`] tokenises the source and drives compilation.
//! 2. [`symbols`] maps variable names to a kind, type and segment index.
//! 3. [`codegen`] holds the instruction model and the writer that records
//!    each instruction with the source location it came from.
//! 4. [`trace`] optionally renders the parse structure as XML.
//! 5. [`driver`] finds source files, compiles them and writes the outputs.
//! 6. [`ui`] is a ratatui viewer that lines generated code up with its
//!    source; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let class = jackc::compile("class Main { function int one() { return 1; } }").unwrap();
//! assert_eq!(class.vm_code(), "function Main.one 0\npush constant 1\nreturn\n");
//! ```

pub mod codegen;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod parser;
pub mod symbols;
pub mod trace;
pub mod ui;

pub use errors::CompileError;
pub use parser::{CompileOptions, CompiledClass};

use parser::Parser;

/// Compile one class source into VM code.
pub fn compile(source: &str) -> Result<CompiledClass, CompileError> {
    compile_with_options(source, CompileOptions::default())
}

pub fn compile_with_options(
    source: &str,
    options: CompileOptions,
) -> Result<CompiledClass, CompileError> {
    let mut parser = Parser::with_options(source, options)?;
    parser.compile_class()?;
    Ok(parser.into_output())
}
