//! Cigrid compiler front end.
//!
//! Cigrid is a small C-like language (ints, chars, pointers, structs, heap
//! arrays via `new`/`delete`). This crate lexes and parses one source file
//! into an AST and can pretty-print the result; later compilation stages sit
//! behind command-line flags that are accepted but not yet wired up.

pub mod diagnostics;
pub mod flags;
pub mod parser;
pub mod printer;

pub use diagnostics::{DiagMessage, Diagnostics, Severity};
pub use flags::CigridFlags;
pub use parser::{ParseError, Parser, Program};
pub use printer::{pretty_print, AstPrinter};
