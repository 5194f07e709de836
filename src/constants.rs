// Constants for the compiler

/// Largest integer constant the lexer accepts (the VM word is 16-bit signed)
pub const MAX_INT_CONSTANT: u16 = 32767;

/// Placeholder local count written into a function header until the body is known
pub const LOCALS_PLACEHOLDER: u16 = 0;

/// Name bound to argument 0 inside methods
pub const THIS_NAME: &str = "this";

// Runtime library routines called by generated code
pub const MATH_MULTIPLY: &str = "Math.multiply";
pub const MATH_DIVIDE: &str = "Math.divide";
pub const MEMORY_ALLOC: &str = "Memory.alloc";
pub const STRING_NEW: &str = "String.new";
pub const STRING_APPEND_CHAR: &str = "String.appendChar";

// Branch label prefixes, suffixed with the per-file label counter
pub const IF_FALSE_LABEL: &str = "IF_FALSE";
pub const IF_END_LABEL: &str = "IF_END";
pub const WHILE_EXP_LABEL: &str = "WHILE_EXP";
pub const WHILE_END_LABEL: &str = "WHILE_END";

/// Source file extension
pub const SOURCE_EXTENSION: &str = "jack";

/// Instruction stream file extension
pub const VM_EXTENSION: &str = "vm";

/// Parse trace file extension
pub const TRACE_EXTENSION: &str = "xml";
