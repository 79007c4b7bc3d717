//! Diagnostics sink shared by the front end.
//!
//! The lexer reports recoverable problems (bad escapes, empty character
//! constants) here and keeps scanning; fatal problems (missing input file,
//! unknown flags) are recorded by the driver. Nothing is printed until the
//! caller asks for it, so a failed parse still gets the diagnostics that were
//! collected before the failure.

use crate::parser::ast::Position;

/// Message severity. `Error` diagnostics carry a source position; `Fatal`
/// ones come from the driver and usually do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Note => "note:",
            Severity::Warning => "warning:",
            Severity::Error => "error:",
            Severity::Fatal => "fatal error:",
        }
    }
}

/// One collected diagnostic.
#[derive(Debug, Clone)]
pub struct DiagMessage {
    pub level: Severity,
    pub message: String,
    pub pos: Option<Position>,
}

/// Ordered collector of diagnostics for a single compilation pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<DiagMessage>,
    error_count: usize,
    fatal_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a recoverable error at a source position.
    pub fn error(&mut self, pos: Position, message: impl Into<String>) {
        self.messages.push(DiagMessage {
            level: Severity::Error,
            message: message.into(),
            pos: Some(pos),
        });
        self.error_count += 1;
    }

    /// Record a fatal driver-level error (no source position).
    pub fn fatal(&mut self, message: impl Into<String>) {
        self.messages.push(DiagMessage {
            level: Severity::Fatal,
            message: message.into(),
            pos: None,
        });
        self.fatal_count += 1;
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal_count > 0
    }

    pub fn messages(&self) -> &[DiagMessage] {
        &self.messages
    }

    /// Print every collected message to stderr, in collection order.
    ///
    /// Only a single input file is supported, so positioned messages are
    /// prefixed with `input_file:line:column`.
    pub fn print_all(&self) {
        for msg in &self.messages {
            let location = match msg.pos {
                Some(pos) => format!("input_file:{}:{}", pos.line, pos.column),
                None => "cigrid".to_string(),
            };
            eprintln!("{}: {} {}", location, msg.level.label(), msg.message);
        }
        if self.fatal_count > 0 {
            eprintln!("compilation terminated.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut diag = Diagnostics::new();
        assert!(!diag.has_errors());

        diag.error(Position::new(3, 7), "unknown escape sequence: '\\q'");
        assert!(diag.has_errors());
        assert!(!diag.has_fatal());

        diag.fatal("missing.c: No such file or directory");
        assert!(diag.has_fatal());
        assert_eq!(diag.messages().len(), 2);
    }

    #[test]
    fn test_error_keeps_position() {
        let mut diag = Diagnostics::new();
        diag.error(Position::new(1, 2), "undefined symbol");

        let msg = &diag.messages()[0];
        assert_eq!(msg.level, Severity::Error);
        assert_eq!(msg.pos, Some(Position::new(1, 2)));
    }
}
