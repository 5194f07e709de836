//! Two-level scoped symbol table.

use crate::codegen::Segment;
use rustc_hash::FxHashMap;
use std::fmt;

/// Storage category of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Static, Kind::Field, Kind::Argument, Kind::Local];

    /// The VM segment that stores variables of this kind.
    pub fn segment(self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Argument => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }

    /// Whether entries of this kind live in the class scope.
    pub fn is_class_scoped(self) -> bool {
        matches!(self, Kind::Static | Kind::Field)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Static => "static",
            Kind::Field => "field",
            Kind::Argument => "argument",
            Kind::Local => "var",
        }
    }

    fn slot(self) -> usize {
        match self {
            Kind::Static => 0,
            Kind::Field => 1,
            Kind::Argument => 2,
            Kind::Local => 3,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Primitive type keyword or class name
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

/// Class scope (statics, fields) plus subroutine scope (arguments, locals).
///
/// Lookups consult the subroutine scope first, so an argument or local
/// shadows a field or static of the same name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: FxHashMap<String, Symbol>,
    subroutine_scope: FxHashMap<String, Symbol>,
    counts: [u16; 4],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget arguments and locals; statics and fields survive.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.counts[Kind::Argument.slot()] = 0;
        self.counts[Kind::Local.slot()] = 0;
    }

    /// Add `name` with the next free index of `kind` and return that index.
    /// `None` when the kind already holds `u16::MAX` entries; nothing is added.
    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> Option<u16> {
        let index = self.counts[kind.slot()];
        self.counts[kind.slot()] = index.checked_add(1)?;

        let symbol = Symbol {
            name: name.to_string(),
            ty: ty.to_string(),
            kind,
            index,
        };
        let scope = if kind.is_class_scoped() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };
        scope.insert(name.to_string(), symbol);

        Some(index)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// `None` means the name is not a variable (a class or subroutine name).
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|s| s.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|s| s.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|s| s.index)
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counts[kind.slot()]
    }
}
