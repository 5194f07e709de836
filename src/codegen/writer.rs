//! Append-only instruction sink.
//!
//! The writer keeps every emitted [`Instruction`] together with the source
//! location of the token that produced it. Nothing is ever removed or
//! reordered. The single exception to write-once is the local count of a
//! function header, which is only known after the subroutine body has been
//! compiled: [`VmWriter::function`] hands back a [`HeaderSlot`] recording the
//! header's offset, and [`VmWriter::patch_locals`] rewrites that one entry.

use super::vm::{Command, Instruction, Segment};
use crate::constants::LOCALS_PLACEHOLDER;
use crate::errors::CompileError;
use crate::parser::token::SourceLocation;

/// An instruction plus the source location it was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub instruction: Instruction,
    pub location: SourceLocation,
}

/// Offset of a function header awaiting its local count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSlot {
    offset: usize,
    name: String,
}

impl HeaderSlot {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

#[derive(Debug, Default)]
pub struct VmWriter {
    lines: Vec<Emitted>,
    location: SourceLocation,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location attached to instructions emitted from now on.
    pub fn set_location(&mut self, location: SourceLocation) {
        self.location = location;
    }

    pub fn push(&mut self, segment: Segment, index: u16) {
        self.emit(Instruction::Push(segment, index));
    }

    pub fn pop(&mut self, segment: Segment, index: u16) {
        self.emit(Instruction::Pop(segment, index));
    }

    pub fn arithmetic(&mut self, command: Command) {
        self.emit(Instruction::Arithmetic(command));
    }

    pub fn label(&mut self, label: &str) {
        self.emit(Instruction::Label(label.to_string()));
    }

    pub fn goto(&mut self, label: &str) {
        self.emit(Instruction::Goto(label.to_string()));
    }

    pub fn if_goto(&mut self, label: &str) {
        self.emit(Instruction::IfGoto(label.to_string()));
    }

    pub fn call(&mut self, name: &str, args: u16) {
        self.emit(Instruction::Call {
            name: name.to_string(),
            args,
        });
    }

    /// Emit a function header with a placeholder local count.
    pub fn function(&mut self, name: &str) -> HeaderSlot {
        let slot = HeaderSlot {
            offset: self.lines.len(),
            name: name.to_string(),
        };
        self.emit(Instruction::Function {
            name: name.to_string(),
            locals: LOCALS_PLACEHOLDER,
        });
        slot
    }

    pub fn ret(&mut self) {
        self.emit(Instruction::Return);
    }

    /// Rewrite the local count of the header recorded in `slot`.
    pub fn patch_locals(&mut self, slot: &HeaderSlot, locals: u16) -> Result<(), CompileError> {
        match self.lines.get_mut(slot.offset).map(|line| &mut line.instruction) {
            Some(Instruction::Function { name, locals: count }) if *name == slot.name => {
                *count = locals;
                Ok(())
            }
            _ => Err(CompileError::UnresolvedPatchTarget {
                subroutine: slot.name.clone(),
                offset: slot.offset,
            }),
        }
    }

    pub fn lines(&self) -> &[Emitted] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Emitted> {
        self.lines
    }

    fn emit(&mut self, instruction: Instruction) {
        self.lines.push(Emitted {
            instruction,
            location: self.location,
        });
    }
}

/// Render instructions as VM text, one per line, with a trailing newline.
pub fn render(lines: &[Emitted]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.instruction.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_in_order_with_location() {
        let mut writer = VmWriter::new();
        writer.set_location(SourceLocation::new(4, 2));
        writer.push(Segment::Constant, 1);
        writer.set_location(SourceLocation::new(5, 9));
        writer.arithmetic(Command::Neg);

        assert_eq!(writer.len(), 2);
        assert_eq!(writer.lines()[0].location.line, 4);
        assert_eq!(writer.lines()[1].location.line, 5);
        assert_eq!(render(writer.lines()), "push constant 1\nneg\n");
    }

    #[test]
    fn test_patch_locals_targets_offset() {
        let mut writer = VmWriter::new();
        let first = writer.function("Foo.same");
        writer.ret();
        let second = writer.function("Foo.same");
        writer.ret();

        writer.patch_locals(&second, 4).unwrap();
        writer.patch_locals(&first, 1).unwrap();

        assert_eq!(
            render(writer.lines()),
            "function Foo.same 1\nreturn\nfunction Foo.same 4\nreturn\n"
        );
    }

    #[test]
    fn test_patch_locals_rejects_wrong_target() {
        let mut writer = VmWriter::new();
        let slot = writer.function("Foo.bar");
        writer.ret();

        let shifted = HeaderSlot {
            offset: slot.offset() + 1,
            name: "Foo.bar".to_string(),
        };
        let err = writer.patch_locals(&shifted, 2).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedPatchTarget { offset: 1, .. }));

        let renamed = HeaderSlot {
            offset: slot.offset(),
            name: "Foo.baz".to_string(),
        };
        let err = writer.patch_locals(&renamed, 2).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvedPatchTarget {
                subroutine: "Foo.baz".to_string(),
                offset: 0
            }
        );
        assert_eq!(render(writer.lines()), "function Foo.bar 0\nreturn\n");
    }
}
