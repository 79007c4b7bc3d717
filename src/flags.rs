//! Compilation option set.
//!
//! Flags only toggle auxiliary output (tracing, pretty-printing, error
//! formatting); none of them may change what the parser produces. The
//! later-stage flags (`name_analysis` through `liveness`) are accepted so
//! that driver scripts can pass them, but the stages they gate are not part
//! of this snapshot.

/// Boolean options collected from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CigridFlags {
    pub pretty_print: bool,
    pub line_error: bool,
    pub name_analysis: bool,
    pub type_check: bool,
    pub debug: bool,
    pub compile: bool,
    pub asm_gen: bool,
    pub liveness: bool,
}
