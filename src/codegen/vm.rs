//! VM instruction set as emitted by the compiler.

use std::fmt;

/// Named storage regions of the virtual machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine arithmetic/logical opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Sub => "sub",
            Command::Neg => "neg",
            Command::Eq => "eq",
            Command::Gt => "gt",
            Command::Lt => "lt",
            Command::And => "and",
            Command::Or => "or",
            Command::Not => "not",
        }
    }
}

/// One line of VM code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arithmetic(Command),
    Label(String),
    Goto(String),
    IfGoto(String),
    Call { name: String, args: u16 },
    Function { name: String, locals: u16 },
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(segment, index) => write!(f, "push {} {}", segment, index),
            Instruction::Pop(segment, index) => write!(f, "pop {} {}", segment, index),
            Instruction::Arithmetic(command) => f.write_str(command.as_str()),
            Instruction::Label(label) => write!(f, "label {}", label),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::IfGoto(label) => write!(f, "if-goto {}", label),
            Instruction::Call { name, args } => write!(f, "call {} {}", name, args),
            Instruction::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Instruction::Return => f.write_str("return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::Push(Segment::Constant, 7).to_string(), "push constant 7");
        assert_eq!(Instruction::Pop(Segment::Pointer, 1).to_string(), "pop pointer 1");
        assert_eq!(Instruction::Arithmetic(Command::Not).to_string(), "not");
        assert_eq!(Instruction::IfGoto("IF_FALSE0".into()).to_string(), "if-goto IF_FALSE0");
        assert_eq!(
            Instruction::Call { name: "Math.multiply".into(), args: 2 }.to_string(),
            "call Math.multiply 2"
        );
        assert_eq!(
            Instruction::Function { name: "Main.main".into(), locals: 3 }.to_string(),
            "function Main.main 3"
        );
        assert_eq!(Instruction::Return.to_string(), "return");
    }
}
