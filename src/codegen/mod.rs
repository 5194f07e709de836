//! Code generation back end
//!
//! - [`vm`]: the VM instruction set ([`Segment`], [`Command`], [`Instruction`])
//!   and its textual mnemonics
//! - [`writer`]: [`VmWriter`], the append-only instruction sink the parser
//!   emits into
//!
//! The parser decides *what* to emit; nothing here knows about the grammar.

pub mod vm;
pub mod writer;

pub use vm::{Command, Instruction, Segment};
pub use writer::{render, Emitted, HeaderSlot, VmWriter};
