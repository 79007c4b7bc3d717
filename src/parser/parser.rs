//! Recursive-descent parser for Cigrid.
//!
//! The parser pulls tokens lazily from the [`Lexer`] with a single token of
//! lookahead and builds the AST in one pass: precedence climbing for binary
//! expressions, plain top-down dispatch for statements and globals. Two
//! constructs are desugared during parsing: `for` loops become a scoped
//! `while`, and scalar `i++`/`i--` becomes an assignment of an explicit
//! add/subtract. Array-element `a[i]++`/`a[i]--` is kept as its own
//! statement variant; see [`Stmt`].
//!
//! Any syntax error is fatal: the first `Err` propagates to the caller and
//! no recovery is attempted. Recoverable lexical diagnostics collected up to
//! that point remain available through [`Parser::into_diagnostics`].

use rustc_hash::FxHashMap;
use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::flags::CigridFlags;
use crate::parser::ast::{
    BinOp, Expr, Global, Param, Position, Program, Stmt, Type, UnOp,
};
use crate::parser::lexer::{Lexer, Literal, Token, TokenKind};

/// Fatal parse error: message plus the position of the offending token.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub pos: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.pos.line, self.pos.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Binding strength of the binary operators, higher binds tighter. `^` is
/// deliberately absent: it is tokenized but never wired into the expression
/// grammar.
fn precedence_table() -> FxHashMap<TokenKind, u8> {
    let mut table = FxHashMap::default();
    table.insert(TokenKind::OrOr, 1);
    table.insert(TokenKind::AndAnd, 2);
    table.insert(TokenKind::Pipe, 3);
    table.insert(TokenKind::Amp, 4);
    table.insert(TokenKind::EqEq, 5);
    table.insert(TokenKind::NotEq, 5);
    table.insert(TokenKind::Lt, 6);
    table.insert(TokenKind::Gt, 6);
    table.insert(TokenKind::Le, 6);
    table.insert(TokenKind::Ge, 6);
    table.insert(TokenKind::Shl, 7);
    table.insert(TokenKind::Shr, 7);
    table.insert(TokenKind::Plus, 8);
    table.insert(TokenKind::Minus, 8);
    table.insert(TokenKind::Star, 9);
    table.insert(TokenKind::Slash, 9);
    table.insert(TokenKind::Percent, 9);
    table
}

fn binop_for(kind: TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Minus => Some(BinOp::Sub),
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        TokenKind::Percent => Some(BinOp::Mod),
        TokenKind::Caret => Some(BinOp::Pow),
        TokenKind::Lt => Some(BinOp::Lt),
        TokenKind::Gt => Some(BinOp::Gt),
        TokenKind::Le => Some(BinOp::Le),
        TokenKind::Ge => Some(BinOp::Ge),
        TokenKind::EqEq => Some(BinOp::Eq),
        TokenKind::NotEq => Some(BinOp::Ne),
        TokenKind::Amp => Some(BinOp::BitAnd),
        TokenKind::Pipe => Some(BinOp::BitOr),
        TokenKind::AndAnd => Some(BinOp::And),
        TokenKind::OrOr => Some(BinOp::Or),
        TokenKind::Shl => Some(BinOp::Shl),
        TokenKind::Shr => Some(BinOp::Shr),
        _ => None,
    }
}

fn unop_for(kind: TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Bang => Some(UnOp::Not),
        TokenKind::Tilde => Some(UnOp::BitNot),
        TokenKind::Minus => Some(UnOp::Neg),
        _ => None,
    }
}

fn is_type_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Char | TokenKind::Int | TokenKind::Void | TokenKind::Ident
    )
}

/// Single-pass parser with one token of lookahead.
pub struct Parser {
    flags: CigridFlags,
    lexer: Lexer,
    current: Token,
    lookahead: Option<Token>,
    precedence: FxHashMap<TokenKind, u8>,
}

impl Parser {
    /// Create a parser over `source`. Recoverable lexical diagnostics are
    /// collected into `diag` and can be retrieved after parsing.
    pub fn new(source: &str, flags: CigridFlags, diag: Diagnostics) -> Self {
        let mut lexer = Lexer::new(source, diag);
        let current = lexer.next_token();
        if flags.debug {
            eprintln!("parser initialized, first token: {}", current.lexeme);
        }
        Self {
            flags,
            lexer,
            current,
            lookahead: None,
            precedence: precedence_table(),
        }
    }

    /// Parse a whole program and require that nothing but end-of-file
    /// follows the last global.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        if self.current.kind == TokenKind::Bad {
            return Err(self.error(format!(
                "bad token encountered, {}",
                self.current.lexeme
            )));
        }
        let prog = self.parse_prog()?;
        self.expect(TokenKind::Eof)?;
        Ok(prog)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.lexer.diagnostics()
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.lexer.into_diagnostics()
    }

    // ===== Token plumbing =====

    /// Commit the current token and pull the next one, from the lookahead
    /// buffer if it is filled. A `Bad` token becoming current is a fatal
    /// parse error.
    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        if self.flags.debug {
            eprintln!("advanced to token: {}", self.current.lexeme);
        }
        if self.current.kind == TokenKind::Bad {
            return Err(self.error(format!(
                "bad token encountered, {}",
                self.current.lexeme
            )));
        }
        Ok(())
    }

    /// Look at the next token without consuming it. Only a window of one is
    /// supported.
    fn peek(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        self.lookahead.get_or_insert_with(|| lexer.next_token())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.current.kind == kind {
            self.advance()
        } else {
            Err(self.error(format!(
                "expected {}, but got {}",
                kind, self.current
            )))
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            pos: self.current.pos,
        }
    }

    // ===== Types and primitives =====

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        match self.current.ident_name() {
            Some(name) => {
                let name = name.to_string();
                self.advance()?;
                Ok(name)
            }
            None => Err(self.error(format!(
                "expected identifier, but got {}",
                self.current
            ))),
        }
    }

    /// `ty → ("void" | "int" | "char" | Ident) "*"*`. Each `*` wraps the
    /// prior result, so `int**` nests as `Pointer(Pointer(Int))`.
    fn parse_type(&mut self) -> Result<Type, ParseError> {
        let pos = self.current.pos;
        let mut result = match self.current.kind {
            TokenKind::Void => {
                self.advance()?;
                Type::Void { pos }
            }
            TokenKind::Int => {
                self.advance()?;
                Type::Int { pos }
            }
            TokenKind::Char => {
                self.advance()?;
                Type::Char { pos }
            }
            TokenKind::Ident => {
                let name = self.parse_ident()?;
                Type::Ident { pos, name }
            }
            _ => {
                return Err(self.error(format!(
                    "expected a type token, but got {}",
                    self.current
                )));
            }
        };

        while self.current.kind == TokenKind::Star {
            let star_pos = self.current.pos;
            self.advance()?;
            result = Type::Pointer {
                pos: star_pos,
                inner: Box::new(result),
            };
        }
        Ok(result)
    }

    // ===== Expressions =====

    fn parse_binop(&mut self) -> Result<BinOp, ParseError> {
        match binop_for(self.current.kind) {
            Some(op) => {
                self.advance()?;
                Ok(op)
            }
            None => Err(self.error(format!(
                "expected a binary operator, but got {}",
                self.current
            ))),
        }
    }

    fn parse_unop(&mut self) -> Result<UnOp, ParseError> {
        match unop_for(self.current.kind) {
            Some(op) => {
                self.advance()?;
                Ok(op)
            }
            None => Err(self.error(format!(
                "expected a unary operator, but got {}",
                self.current
            ))),
        }
    }

    /// Precedence climbing: parse one atom, then fold binary operators of
    /// at least `min_prec` into a left-deepening tree. Left associativity is
    /// encoded by parsing the right-hand side with `prec + 1`.
    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let pos = self.current.pos;
        let mut lhs = self.parse_atom()?;
        loop {
            let prec = match self.precedence.get(&self.current.kind) {
                Some(&prec) if prec >= min_prec => prec,
                _ => break,
            };
            let op = self.parse_binop()?;
            let rhs = self.parse_expr(prec + 1)?;
            lhs = Expr::BinOp {
                pos,
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    /// One expression atom, dispatched on the current token (plus one token
    /// of lookahead to tell array accesses and calls from bare variables).
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.current.kind {
            TokenKind::Ident => {
                let next = self.peek().kind;
                match next {
                    TokenKind::LBracket => self.parse_array_access(),
                    TokenKind::LParen => self.parse_call(),
                    _ => {
                        let pos = self.current.pos;
                        let name = self.parse_ident()?;
                        Ok(Expr::Var { pos, name })
                    }
                }
            }
            TokenKind::IntLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral => self.parse_constant(),
            TokenKind::Bang | TokenKind::Tilde | TokenKind::Minus => {
                let pos = self.current.pos;
                let op = self.parse_unop()?;
                let operand = self.parse_atom()?;
                Ok(Expr::UnOp {
                    pos,
                    op,
                    operand: Box::new(operand),
                })
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expr(1)?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::New => self.parse_new(),
            _ => Err(self.error(format!(
                "expected an expression, but got {}",
                self.current
            ))),
        }
    }

    fn parse_constant(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current.pos;
        let expr = match (&self.current.kind, &self.current.literal) {
            (TokenKind::IntLiteral, Literal::Int(value)) => Expr::IntLit {
                pos,
                value: *value,
            },
            (TokenKind::CharLiteral, Literal::Char(value)) => Expr::CharLit {
                pos,
                value: *value,
            },
            (TokenKind::StringLiteral, Literal::Str(value)) => Expr::StringLit {
                pos,
                value: value.clone(),
            },
            _ => {
                return Err(self.error(format!(
                    "expected a constant, but got {}",
                    self.current
                )));
            }
        };
        self.advance()?;
        Ok(expr)
    }

    /// `Ident "(" [ expr { "," expr } ] ")"`
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current.pos;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.current.kind != TokenKind::RParen {
            args.push(self.parse_expr(1)?);
            while self.current.kind == TokenKind::Comma {
                self.advance()?;
                args.push(self.parse_expr(1)?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::Call { pos, name, args })
    }

    /// `"new" ty "[" expr "]"`
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        let elem_type = self.parse_type()?;
        self.expect(TokenKind::LBracket)?;
        let size = self.parse_expr(1)?;
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::New {
            pos,
            elem_type: Box::new(elem_type),
            size: Box::new(size),
        })
    }

    /// `Ident "[" expr "]" [ "." Ident ]`
    fn parse_array_access(&mut self) -> Result<Expr, ParseError> {
        let pos = self.current.pos;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LBracket)?;
        let index = self.parse_expr(1)?;
        self.expect(TokenKind::RBracket)?;
        let field = if self.current.kind == TokenKind::Dot {
            self.advance()?;
            Some(self.parse_ident()?)
        } else {
            None
        };
        Ok(Expr::ArrayAccess {
            pos,
            name,
            index: Box::new(index),
            field,
        })
    }

    // ===== Statements =====

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current.kind {
            TokenKind::LBrace => self.parse_scope(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::For => self.parse_for(),
            _ => {
                let stmt = self.parse_varassign()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(stmt)
            }
        }
    }

    /// `"{" { stmt } "}"`
    fn parse_scope(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        let mut stmts = Vec::new();
        while self.current.kind != TokenKind::RBrace {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Scope { pos, stmts })
    }

    /// `"if" "(" expr ")" stmt [ "else" stmt ]`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(1)?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.current.kind == TokenKind::Else {
            self.advance()?;
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            pos,
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    /// `"while" "(" expr ")" stmt`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(1)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        Ok(Stmt::While {
            pos,
            cond: Box::new(cond),
            body: Box::new(body),
        })
    }

    fn parse_break(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Break { pos })
    }

    /// `"return" [ expr ] ";"`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        let expr = if self.current.kind != TokenKind::Semicolon {
            Some(Box::new(self.parse_expr(1)?))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return { pos, expr })
    }

    /// `"delete" "[" "]" Ident ";"`
    fn parse_delete(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        self.expect(TokenKind::LBracket)?;
        self.expect(TokenKind::RBracket)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Delete { pos, name })
    }

    /// `"for" "(" varassign ";" expr ";" assign ")" stmt`, desugared at
    /// parse time into `{ init; while (cond) { body; step; } }` so the loop
    /// variable's scope is the enclosing block.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        let init = self.parse_varassign()?;
        self.expect(TokenKind::Semicolon)?;
        let cond = self.parse_expr(1)?;
        self.expect(TokenKind::Semicolon)?;
        let step = self.parse_assign()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_stmt()?;

        let while_body = Stmt::Scope {
            pos,
            stmts: vec![body, step],
        };
        let while_loop = Stmt::While {
            pos,
            cond: Box::new(cond),
            body: Box::new(while_body),
        };
        Ok(Stmt::Scope {
            pos,
            stmts: vec![init, while_loop],
        })
    }

    // ===== Assignments =====

    /// `lvalue "=" expr | lvalue "++" | lvalue "--"` where
    /// `lvalue → Ident | Ident "[" expr "]" [ "." Ident ]`.
    ///
    /// Scalar `++`/`--` desugars here into an assignment of an explicit
    /// add/subtract; the array forms stay distinct statement variants.
    fn parse_lvalue(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.current.pos;
        let name = self.parse_ident()?;

        if self.current.kind == TokenKind::LBracket {
            self.advance()?;
            let index = self.parse_expr(1)?;
            self.expect(TokenKind::RBracket)?;
            let field = if self.current.kind == TokenKind::Dot {
                self.advance()?;
                Some(self.parse_ident()?)
            } else {
                None
            };

            match self.current.kind {
                TokenKind::Eq => {
                    self.advance()?;
                    let value = self.parse_expr(1)?;
                    Ok(Stmt::ArrayAssign {
                        pos,
                        name,
                        index: Box::new(index),
                        field,
                        value: Box::new(value),
                    })
                }
                TokenKind::Plus => {
                    self.advance()?;
                    self.expect(TokenKind::Plus)?;
                    Ok(Stmt::ArrayPlusAssign {
                        pos,
                        name,
                        index: Box::new(index),
                        field,
                        value: Box::new(Expr::IntLit { pos, value: 1 }),
                    })
                }
                TokenKind::Minus => {
                    self.advance()?;
                    self.expect(TokenKind::Minus)?;
                    Ok(Stmt::ArrayMinusAssign {
                        pos,
                        name,
                        index: Box::new(index),
                        field,
                        value: Box::new(Expr::IntLit { pos, value: 1 }),
                    })
                }
                _ => Err(self.error(format!(
                    "expected '=', '++' or '--' after lvalue, but got {}",
                    self.current
                ))),
            }
        } else {
            match self.current.kind {
                TokenKind::Eq => {
                    self.advance()?;
                    let value = self.parse_expr(1)?;
                    Ok(Stmt::VarAssign {
                        pos,
                        name,
                        value: Box::new(value),
                    })
                }
                TokenKind::Plus => {
                    self.advance()?;
                    self.expect(TokenKind::Plus)?;
                    Ok(Self::incr_assign(pos, name, BinOp::Add))
                }
                TokenKind::Minus => {
                    self.advance()?;
                    self.expect(TokenKind::Minus)?;
                    Ok(Self::incr_assign(pos, name, BinOp::Sub))
                }
                _ => Err(self.error(format!(
                    "expected '=', '++' or '--' after lvalue, but got {}",
                    self.current
                ))),
            }
        }
    }

    /// `name = name op 1` — the desugared form of scalar `++`/`--`.
    fn incr_assign(pos: Position, name: String, op: BinOp) -> Stmt {
        let value = Expr::BinOp {
            pos,
            op,
            lhs: Box::new(Expr::Var {
                pos,
                name: name.clone(),
            }),
            rhs: Box::new(Expr::IntLit { pos, value: 1 }),
        };
        Stmt::VarAssign {
            pos,
            name,
            value: Box::new(value),
        }
    }

    /// `assign → Ident "(" [ expr { "," expr } ] ")" | lvalue ...`
    fn parse_assign(&mut self) -> Result<Stmt, ParseError> {
        if self.current.kind != TokenKind::Ident {
            return Err(self.error(format!(
                "expected identifier to be assigned, but got {}",
                self.current
            )));
        }
        if self.peek().kind == TokenKind::LParen {
            let pos = self.current.pos;
            let call = self.parse_call()?;
            Ok(Stmt::Expr {
                pos,
                expr: Box::new(call),
            })
        } else {
            self.parse_lvalue()
        }
    }

    /// `varassign → ty Ident "=" expr | assign`
    ///
    /// A leading type token could also start a plain assignment (named types
    /// are identifiers), so peek one further: only a following identifier or
    /// `*` makes this a declaration.
    fn parse_varassign(&mut self) -> Result<Stmt, ParseError> {
        if !is_type_token(self.current.kind) {
            return Err(self.error(format!(
                "expected type token or identifier, but got {}",
                self.current
            )));
        }
        if matches!(self.peek().kind, TokenKind::Ident | TokenKind::Star) {
            let pos = self.current.pos;
            let var_type = self.parse_type()?;
            let name = self.parse_ident()?;
            self.expect(TokenKind::Eq)?;
            let init = self.parse_expr(1)?;
            Ok(Stmt::VarDef {
                pos,
                var_type: Box::new(var_type),
                name,
                init: Box::new(init),
            })
        } else {
            self.parse_assign()
        }
    }

    // ===== Globals =====

    /// `params → [ ty Ident { "," ty Ident } ]`
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        if is_type_token(self.current.kind) {
            params.push(Param {
                param_type: self.parse_type()?,
                name: self.parse_ident()?,
            });
            while self.current.kind == TokenKind::Comma {
                self.advance()?;
                params.push(Param {
                    param_type: self.parse_type()?,
                    name: self.parse_ident()?,
                });
            }
        }
        Ok(params)
    }

    fn parse_global(&mut self) -> Result<Global, ParseError> {
        match self.current.kind {
            TokenKind::Struct => self.parse_global_struct(),
            TokenKind::Extern => self.parse_global_extern(),
            kind if is_type_token(kind) => self.parse_global_def(),
            _ => Err(self.error(format!(
                "expected 'struct', 'extern' or type token, but got {}",
                self.current
            ))),
        }
    }

    /// `"struct" Ident "{" { ty Ident ";" } "}" ";"`
    fn parse_global_struct(&mut self) -> Result<Global, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        while self.current.kind != TokenKind::RBrace {
            fields.push(Param {
                param_type: self.parse_type()?,
                name: self.parse_ident()?,
            });
            self.expect(TokenKind::Semicolon)?;
        }
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Global::Struct { pos, name, fields })
    }

    /// `"extern" ty Ident "(" params ")" ";" | "extern" ty Ident ";"`
    fn parse_global_extern(&mut self) -> Result<Global, ParseError> {
        let pos = self.current.pos;
        self.advance()?;
        let return_type = self.parse_type()?;
        let name = self.parse_ident()?;

        match self.current.kind {
            TokenKind::LParen => {
                self.advance()?;
                let params = self.parse_params()?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Global::FuncDecl {
                    pos,
                    return_type: Box::new(return_type),
                    name,
                    params,
                })
            }
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Global::VarDecl {
                    pos,
                    var_type: Box::new(return_type),
                    name,
                })
            }
            _ => Err(self.error(format!(
                "expected ';' or '(', but got {}",
                self.current
            ))),
        }
    }

    /// `ty Ident "(" params ")" "{" { stmt } "}" | ty Ident "=" expr ";"`
    fn parse_global_def(&mut self) -> Result<Global, ParseError> {
        let pos = self.current.pos;
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;

        match self.current.kind {
            TokenKind::LParen => {
                self.advance()?;
                let params = self.parse_params()?;
                self.expect(TokenKind::RParen)?;
                self.expect(TokenKind::LBrace)?;
                let body_pos = self.current.pos;
                let mut stmts = Vec::new();
                while self.current.kind != TokenKind::RBrace {
                    stmts.push(self.parse_stmt()?);
                }
                self.expect(TokenKind::RBrace)?;
                Ok(Global::FuncDef {
                    pos,
                    return_type: Box::new(ty),
                    name,
                    params,
                    body: Box::new(Stmt::Scope {
                        pos: body_pos,
                        stmts,
                    }),
                })
            }
            TokenKind::Eq => {
                self.advance()?;
                let value = self.parse_expr(1)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Global::VarDef {
                    pos,
                    var_type: Box::new(ty),
                    name,
                    value: Box::new(value),
                })
            }
            _ => Err(self.error(format!(
                "expected '(' or '=', but got {}",
                self.current
            ))),
        }
    }

    fn parse_prog(&mut self) -> Result<Program, ParseError> {
        let mut prog = Program::new();
        while self.current.kind != TokenKind::Eof {
            prog.globals.push(self.parse_global()?);
        }
        Ok(prog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source, CigridFlags::default(), Diagnostics::new()).parse()
    }

    fn parse_stmts(body: &str) -> Vec<Stmt> {
        let source = format!("void f() {{ {} }}", body);
        let prog = parse(&source).expect("parsing failed");
        match prog.globals.into_iter().next() {
            Some(Global::FuncDef { body, .. }) => match *body {
                Stmt::Scope { stmts, .. } => stmts,
                other => panic!("expected scope body, got {:?}", other),
            },
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    fn parse_expr(expr: &str) -> Expr {
        let stmts = parse_stmts(&format!("x = {};", expr));
        match stmts.into_iter().next() {
            Some(Stmt::VarAssign { value, .. }) => *value,
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let prog = parse("int main() { return 0; }").unwrap();
        assert_eq!(prog.globals.len(), 1);
        match &prog.globals[0] {
            Global::FuncDef {
                name,
                params,
                return_type,
                ..
            } => {
                assert_eq!(name, "main");
                assert!(params.is_empty());
                assert!(matches!(**return_type, Type::Int { .. }));
            }
            other => panic!("expected function definition, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_mul_binds_tighter() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::BinOp {
                op: BinOp::Add,
                lhs,
                rhs,
                ..
            } => {
                assert!(matches!(*lhs, Expr::IntLit { value: 1, .. }));
                match *rhs {
                    Expr::BinOp {
                        op: BinOp::Mul,
                        lhs,
                        rhs,
                        ..
                    } => {
                        assert!(matches!(*lhs, Expr::IntLit { value: 2, .. }));
                        assert!(matches!(*rhs, Expr::IntLit { value: 3, .. }));
                    }
                    other => panic!("expected multiplication, got {:?}", other),
                }
            }
            other => panic!("expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associativity() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = parse_expr("1 - 2 - 3");
        match expr {
            Expr::BinOp {
                op: BinOp::Sub,
                lhs,
                rhs,
                ..
            } => {
                assert!(matches!(*rhs, Expr::IntLit { value: 3, .. }));
                assert!(matches!(
                    *lhs,
                    Expr::BinOp {
                        op: BinOp::Sub,
                        ..
                    }
                ));
            }
            other => panic!("expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_binds_loosest() {
        let expr = parse_expr("a + 1 < b && c");
        match expr {
            Expr::BinOp {
                op: BinOp::And,
                lhs,
                ..
            } => {
                assert!(matches!(*lhs, Expr::BinOp { op: BinOp::Lt, .. }));
            }
            other => panic!("expected logical and, got {:?}", other),
        }
    }

    #[test]
    fn test_pointer_nesting() {
        let prog = parse("int** p = 0;").unwrap();
        match &prog.globals[0] {
            Global::VarDef { var_type, .. } => match &**var_type {
                Type::Pointer { inner, .. } => {
                    assert!(matches!(
                        **inner,
                        Type::Pointer { ref inner, .. }
                            if matches!(**inner, Type::Int { .. })
                    ));
                }
                other => panic!("expected pointer type, got {:?}", other),
            },
            other => panic!("expected variable definition, got {:?}", other),
        }
    }

    #[test]
    fn test_for_desugars_into_while() {
        let stmts = parse_stmts("for (int i = 0; i < n; i++) x = 1;");
        assert_eq!(stmts.len(), 1);
        let scope = match stmts.into_iter().next() {
            Some(Stmt::Scope { stmts, .. }) => stmts,
            other => panic!("expected scope, got {:?}", other),
        };
        assert_eq!(scope.len(), 2);
        assert!(matches!(scope[0], Stmt::VarDef { ref name, .. } if name == "i"));
        match &scope[1] {
            Stmt::While { body, .. } => match &**body {
                Stmt::Scope { stmts, .. } => {
                    assert_eq!(stmts.len(), 2);
                    // loop body first, then the step assignment
                    assert!(matches!(
                        stmts[0],
                        Stmt::VarAssign { ref name, .. } if name == "x"
                    ));
                    assert!(matches!(
                        stmts[1],
                        Stmt::VarAssign { ref name, .. } if name == "i"
                    ));
                }
                other => panic!("expected scope body, got {:?}", other),
            },
            other => panic!("expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_increment_desugars() {
        let stmts = parse_stmts("i++;");
        match &stmts[0] {
            Stmt::VarAssign { name, value, .. } => {
                assert_eq!(name, "i");
                match &**value {
                    Expr::BinOp {
                        op: BinOp::Add,
                        lhs,
                        rhs,
                        ..
                    } => {
                        assert!(matches!(
                            **lhs,
                            Expr::Var { ref name, .. } if name == "i"
                        ));
                        assert!(matches!(**rhs, Expr::IntLit { value: 1, .. }));
                    }
                    other => panic!("expected binary op, got {:?}", other),
                }
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_array_increment_stays_distinct() {
        let stmts = parse_stmts("a[i]++; b[j]--;");
        assert!(matches!(
            stmts[0],
            Stmt::ArrayPlusAssign { ref name, .. } if name == "a"
        ));
        assert!(matches!(
            stmts[1],
            Stmt::ArrayMinusAssign { ref name, .. } if name == "b"
        ));
    }

    #[test]
    fn test_array_assign_with_field_label() {
        let stmts = parse_stmts("p[0].x = 5;");
        match &stmts[0] {
            Stmt::ArrayAssign { name, field, .. } => {
                assert_eq!(name, "p");
                assert_eq!(field.as_deref(), Some("x"));
            }
            other => panic!("expected array assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_new_and_delete() {
        let stmts = parse_stmts("int* a = new int[10]; delete[] a;");
        match &stmts[0] {
            Stmt::VarDef { init, .. } => match &**init {
                Expr::New {
                    elem_type, size, ..
                } => {
                    assert!(matches!(**elem_type, Type::Int { .. }));
                    assert!(matches!(**size, Expr::IntLit { value: 10, .. }));
                }
                other => panic!("expected new expression, got {:?}", other),
            },
            other => panic!("expected variable definition, got {:?}", other),
        }
        assert!(matches!(
            stmts[1],
            Stmt::Delete { ref name, .. } if name == "a"
        ));
    }

    #[test]
    fn test_unary_operators() {
        let expr = parse_expr("!a");
        assert!(matches!(expr, Expr::UnOp { op: UnOp::Not, .. }));
        let expr = parse_expr("-5");
        assert!(matches!(expr, Expr::UnOp { op: UnOp::Neg, .. }));
        let expr = parse_expr("~b");
        assert!(matches!(expr, Expr::UnOp { op: UnOp::BitNot, .. }));
    }

    #[test]
    fn test_call_with_arguments() {
        let expr = parse_expr("f(1, x + 2, g())");
        match expr {
            Expr::Call { name, args, .. } => {
                assert_eq!(name, "f");
                assert_eq!(args.len(), 3);
                assert!(matches!(args[2], Expr::Call { .. }));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_and_while() {
        let stmts = parse_stmts("if (x > 0) return 1; else return 0; while (x) break;");
        assert!(matches!(
            stmts[0],
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
        match &stmts[1] {
            Stmt::While { body, .. } => {
                assert!(matches!(**body, Stmt::Break { .. }));
            }
            other => panic!("expected while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_definition() {
        let prog = parse("struct Point { int x; int y; };").unwrap();
        match &prog.globals[0] {
            Global::Struct { name, fields, .. } => {
                assert_eq!(name, "Point");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].name, "x");
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_extern_declarations() {
        let prog = parse("extern int putchar(int c); extern int errno;").unwrap();
        assert!(matches!(prog.globals[0], Global::FuncDecl { .. }));
        assert!(matches!(prog.globals[1], Global::VarDecl { .. }));
    }

    #[test]
    fn test_named_type_declaration() {
        let stmts = parse_stmts("Point* p = new Point[1];");
        match &stmts[0] {
            Stmt::VarDef { var_type, .. } => match &**var_type {
                Type::Pointer { inner, .. } => {
                    assert!(matches!(
                        **inner,
                        Type::Ident { ref name, .. } if name == "Point"
                    ));
                }
                other => panic!("expected pointer type, got {:?}", other),
            },
            other => panic!("expected variable definition, got {:?}", other),
        }
    }

    #[test]
    fn test_first_error_halts() {
        // both globals are malformed; only the first is reported
        let err = parse("int x 5; int y @;").unwrap_err();
        assert_eq!(err.pos.line, 1);
        assert_eq!(err.pos.column, 7);
        assert!(err.message.contains("expected"));
    }

    #[test]
    fn test_bad_token_aborts_parse() {
        let err = parse("int x = @;").unwrap_err();
        assert!(err.message.contains("bad token"));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse("int main() { return 0; } }").unwrap_err();
        assert!(err.message.contains("expected"));
    }

    #[test]
    fn test_expected_expression_error() {
        let err = parse("int x = ;").unwrap_err();
        assert!(err.message.contains("expected an expression"));
    }

    #[test]
    fn test_caret_not_a_binary_operator() {
        // '^' is tokenized but not in the precedence table, so the parser
        // stops after the first atom and the statement fails on the '^'.
        let err = parse("void f() { x = 2 ^ 3; }").unwrap_err();
        assert!(err.message.contains("expected"));
    }

    #[test]
    fn test_diagnostics_survive_parse_failure() {
        let mut parser = Parser::new(
            "void f() { char c = '\\q' }",
            CigridFlags::default(),
            Diagnostics::new(),
        );
        let result = parser.parse();
        assert!(result.is_err());
        let diag = parser.into_diagnostics();
        assert!(diag.has_errors());
    }
}
