//! Front end: source text to AST.
//!
//! [`lexer`] turns the input into a token stream, [`parser`] consumes that
//! stream with one token of lookahead and builds the trees defined in
//! [`ast`].

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{BinOp, Expr, Global, Param, Position, Program, Stmt, Type, UnOp};
pub use lexer::{Lexer, Literal, Token, TokenKind};
pub use parser::{ParseError, Parser};
