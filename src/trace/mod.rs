//! Structural parse trace
//!
//! An optional debugging aid: while compiling, the parser reports every
//! production it enters and leaves and every token it consumes, and the trace
//! renders them as indented XML-like elements. Variable identifiers carry an
//! annotation with their symbol-table entry. Downstream stages never read the
//! trace; when it is disabled every call is a no-op.

use crate::parser::token::Token;
use crate::symbols::Symbol;

/// Whether an identifier occurrence declares the name or refers to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Defined,
    Used,
}

#[derive(Debug, Default)]
pub struct ParseTrace {
    enabled: bool,
    depth: usize,
    out: String,
}

impl ParseTrace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn open(&mut self, tag: &str) {
        if !self.enabled {
            return;
        }
        self.indent();
        self.out.push_str(&format!("<{}>\n", tag));
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        if !self.enabled {
            return;
        }
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str(&format!("</{}>\n", tag));
    }

    /// Record a consumed terminal.
    pub fn token(&mut self, token: &Token) {
        if !self.enabled || matches!(token, Token::Eof(_)) {
            return;
        }
        let tag = token.kind().to_string();
        self.indent();
        self.out.push_str(&format!(
            "<{}> {} </{}>\n",
            tag,
            escape(&token.lexeme()),
            tag
        ));
    }

    /// Record a variable name together with what the symbol table knows about it.
    pub fn variable(&mut self, name: &str, usage: Usage, symbol: Option<&Symbol>) {
        if !self.enabled {
            return;
        }
        let defined = usage == Usage::Defined;
        let info = match symbol {
            Some(s) => format!(
                "defined: {}, type: {}, kind: {}, index: {}",
                defined, s.ty, s.kind, s.index
            ),
            None => format!("defined: {}, kind: none", defined),
        };
        self.indent();
        self.out.push_str(&format!(
            "<identifier> {} </identifier> {}\n",
            escape(name),
            info
        ));
    }

    /// The rendered trace, or `None` when tracing was off.
    pub fn finish(self) -> Option<String> {
        self.enabled.then_some(self.out)
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::SourceLocation;
    use crate::symbols::Kind;

    #[test]
    fn test_nesting_and_escaping() {
        let loc = SourceLocation::new(1, 1);
        let mut trace = ParseTrace::new(true);
        trace.open("expression");
        trace.open("term");
        trace.token(&Token::IntConst(1, loc));
        trace.close("term");
        trace.token(&Token::Symbol('<', loc));
        trace.close("expression");

        assert_eq!(
            trace.finish().unwrap(),
            "<expression>\n  <term>\n    <integerConstant> 1 </integerConstant>\n  </term>\n  <symbol> &lt; </symbol>\n</expression>\n"
        );
    }

    #[test]
    fn test_variable_annotation() {
        let mut trace = ParseTrace::new(true);
        let symbol = Symbol {
            name: "x".to_string(),
            ty: "int".to_string(),
            kind: Kind::Field,
            index: 0,
        };
        trace.variable("x", Usage::Defined, Some(&symbol));

        assert_eq!(
            trace.finish().unwrap(),
            "<identifier> x </identifier> defined: true, type: int, kind: field, index: 0\n"
        );
    }

    #[test]
    fn test_disabled_trace_records_nothing() {
        let mut trace = ParseTrace::new(false);
        trace.open("class");
        trace.token(&Token::Symbol('{', SourceLocation::new(1, 1)));
        trace.close("class");
        assert_eq!(trace.finish(), None);
    }
}
