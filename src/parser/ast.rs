// AST definitions for the Cigrid front end

use std::fmt;

/// Source position (1-based line and column) attached to every token and
/// AST node for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary operators.
///
/// `Pow` is tokenized (`^`) but has no entry in the parser's precedence
/// table, so it never appears in a parsed tree. Kept to mirror the grammar's
/// operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    Shl,
    Shr,
}

/// Unary operators (prefix only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
}

/// Type expressions: `void`, `int`, `char`, a named (struct) type, or a
/// pointer wrapping another type. `int**` nests as `Pointer(Pointer(Int))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Void { pos: Position },
    Int { pos: Position },
    Char { pos: Position },
    Ident { pos: Position, name: String },
    Pointer { pos: Position, inner: Box<Type> },
}

impl Type {
    pub fn pos(&self) -> Position {
        match self {
            Type::Void { pos }
            | Type::Int { pos }
            | Type::Char { pos }
            | Type::Ident { pos, .. }
            | Type::Pointer { pos, .. } => *pos,
        }
    }
}

/// Expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var {
        pos: Position,
        name: String,
    },
    IntLit {
        pos: Position,
        value: i32,
    },
    CharLit {
        pos: Position,
        value: char,
    },
    StringLit {
        pos: Position,
        value: String,
    },
    BinOp {
        pos: Position,
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    UnOp {
        pos: Position,
        op: UnOp,
        operand: Box<Expr>,
    },
    Call {
        pos: Position,
        name: String,
        args: Vec<Expr>,
    },
    /// `new T[size]` heap array allocation.
    New {
        pos: Position,
        elem_type: Box<Type>,
        size: Box<Expr>,
    },
    /// `a[i]` or `a[i].field`.
    ArrayAccess {
        pos: Position,
        name: String,
        index: Box<Expr>,
        field: Option<String>,
    },
}

impl Expr {
    pub fn pos(&self) -> Position {
        match self {
            Expr::Var { pos, .. }
            | Expr::IntLit { pos, .. }
            | Expr::CharLit { pos, .. }
            | Expr::StringLit { pos, .. }
            | Expr::BinOp { pos, .. }
            | Expr::UnOp { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::New { pos, .. }
            | Expr::ArrayAccess { pos, .. } => *pos,
        }
    }
}

/// Statements.
///
/// `ArrayPlusAssign`/`ArrayMinusAssign` stay distinct from `ArrayAssign` at
/// parse time; only the printer rewrites them to an explicit add/subtract
/// form. Scalar `i++`/`i--`, by contrast, is rewritten into a `VarAssign` of
/// a `BinOp` already during parsing. The asymmetry is grammar behavior, not
/// an oversight to unify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr {
        pos: Position,
        expr: Box<Expr>,
    },
    VarDef {
        pos: Position,
        var_type: Box<Type>,
        name: String,
        init: Box<Expr>,
    },
    VarAssign {
        pos: Position,
        name: String,
        value: Box<Expr>,
    },
    ArrayAssign {
        pos: Position,
        name: String,
        index: Box<Expr>,
        field: Option<String>,
        value: Box<Expr>,
    },
    ArrayPlusAssign {
        pos: Position,
        name: String,
        index: Box<Expr>,
        field: Option<String>,
        value: Box<Expr>,
    },
    ArrayMinusAssign {
        pos: Position,
        name: String,
        index: Box<Expr>,
        field: Option<String>,
        value: Box<Expr>,
    },
    Scope {
        pos: Position,
        stmts: Vec<Stmt>,
    },
    If {
        pos: Position,
        cond: Box<Expr>,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        pos: Position,
        cond: Box<Expr>,
        body: Box<Stmt>,
    },
    Break {
        pos: Position,
    },
    Return {
        pos: Position,
        expr: Option<Box<Expr>>,
    },
    /// `delete[] name;`
    Delete {
        pos: Position,
        name: String,
    },
}

impl Stmt {
    pub fn pos(&self) -> Position {
        match self {
            Stmt::Expr { pos, .. }
            | Stmt::VarDef { pos, .. }
            | Stmt::VarAssign { pos, .. }
            | Stmt::ArrayAssign { pos, .. }
            | Stmt::ArrayPlusAssign { pos, .. }
            | Stmt::ArrayMinusAssign { pos, .. }
            | Stmt::Scope { pos, .. }
            | Stmt::If { pos, .. }
            | Stmt::While { pos, .. }
            | Stmt::Break { pos }
            | Stmt::Return { pos, .. }
            | Stmt::Delete { pos, .. } => *pos,
        }
    }
}

/// Function parameter or struct field: a type paired with a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub param_type: Type,
    pub name: String,
}

/// Top-level declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Global {
    FuncDef {
        pos: Position,
        return_type: Box<Type>,
        name: String,
        params: Vec<Param>,
        body: Box<Stmt>,
    },
    FuncDecl {
        pos: Position,
        return_type: Box<Type>,
        name: String,
        params: Vec<Param>,
    },
    VarDef {
        pos: Position,
        var_type: Box<Type>,
        name: String,
        value: Box<Expr>,
    },
    VarDecl {
        pos: Position,
        var_type: Box<Type>,
        name: String,
    },
    Struct {
        pos: Position,
        name: String,
        fields: Vec<Param>,
    },
}

impl Global {
    pub fn pos(&self) -> Position {
        match self {
            Global::FuncDef { pos, .. }
            | Global::FuncDecl { pos, .. }
            | Global::VarDef { pos, .. }
            | Global::VarDecl { pos, .. }
            | Global::Struct { pos, .. } => *pos,
        }
    }
}

/// Root of the AST: the ordered top-level declarations of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub globals: Vec<Global>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
