//! Symbol table
//!
//! Names are declared with a type and a [`Kind`]; each kind numbers its
//! entries from zero. Statics and fields belong to the class scope and live for
//! the whole compilation unit. Arguments and locals belong to the subroutine
//! scope, which is emptied at the start of every subroutine.
//!
//! A name that resolves to nothing is not an error here. The parser reads
//! "no kind" as "this is a class or subroutine name".

pub mod table;

pub use table::{Kind, Symbol, SymbolTable};
