//! Pretty-printer for the AST, used by `--pretty-print`.
//!
//! Output is constructor syntax (`GFuncDef(TInt, main, {}, ...)`), one global
//! per block separated by blank lines. Statements are indented two spaces per
//! scope level. Array `a[i]++`/`a[i]--` statements are rewritten at print
//! time into an `SArrayAssign` whose value is an explicit `EBinOp` over an
//! `EArrayAccess`, matching how scalar increments are already desugared in
//! the tree itself.

use std::fmt::{self, Write};

use crate::parser::ast::{BinOp, Expr, Global, Param, Program, Stmt, Type, UnOp};

fn binop_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Pow => "^",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::Le => "<=",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::BitAnd => "&",
        BinOp::BitOr => "|",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Shl => "<<",
        BinOp::Shr => ">>",
    }
}

fn unop_symbol(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "-",
        UnOp::Not => "!",
        UnOp::BitNot => "~",
    }
}

/// Writes the constructor-syntax rendering of an AST into any [`fmt::Write`]
/// sink.
pub struct AstPrinter<W: Write> {
    out: W,
    indent: usize,
}

const INDENT_STEP: usize = 2;

impl<W: Write> AstPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, indent: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_program(&mut self, prog: &Program) -> fmt::Result {
        for global in &prog.globals {
            self.print_global(global)?;
            write!(self.out, "\n\n")?;
        }
        Ok(())
    }

    fn print_indent(&mut self) -> fmt::Result {
        write!(self.out, "{}", " ".repeat(self.indent))
    }

    fn print_type(&mut self, ty: &Type) -> fmt::Result {
        match ty {
            Type::Void { .. } => write!(self.out, "TVoid"),
            Type::Int { .. } => write!(self.out, "TInt"),
            Type::Char { .. } => write!(self.out, "TChar"),
            Type::Ident { name, .. } => write!(self.out, "TIdent(\"{}\")", name),
            Type::Pointer { inner, .. } => {
                write!(self.out, "TPoint(")?;
                self.print_type(inner)?;
                write!(self.out, ")")
            }
        }
    }

    fn print_char(&mut self, value: char) -> fmt::Result {
        match value {
            '\\' => write!(self.out, "'\\\\'"),
            '\n' => write!(self.out, "'\\n'"),
            '\t' => write!(self.out, "'\\t'"),
            '\'' => write!(self.out, "'\\''"),
            '"' => write!(self.out, "'\\\"'"),
            _ => write!(self.out, "'{}'", value),
        }
    }

    fn print_expr(&mut self, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Var { name, .. } => write!(self.out, "EVar(\"{}\")", name),
            Expr::IntLit { value, .. } => write!(self.out, "EInt({})", value),
            Expr::CharLit { value, .. } => {
                write!(self.out, "EChar(")?;
                self.print_char(*value)?;
                write!(self.out, ")")
            }
            Expr::StringLit { value, .. } => {
                write!(self.out, "EString({:?})", value)
            }
            Expr::BinOp { op, lhs, rhs, .. } => {
                write!(self.out, "EBinOp({}, ", binop_symbol(*op))?;
                self.print_expr(lhs)?;
                write!(self.out, ", ")?;
                self.print_expr(rhs)?;
                write!(self.out, ")")
            }
            Expr::UnOp { op, operand, .. } => {
                write!(self.out, "EUnOp({}, ", unop_symbol(*op))?;
                self.print_expr(operand)?;
                write!(self.out, ")")
            }
            Expr::Call { name, args, .. } => {
                write!(self.out, "ECall(\"{}\", {{", name)?;
                for arg in args {
                    self.print_expr(arg)?;
                }
                write!(self.out, "}})")
            }
            Expr::New {
                elem_type, size, ..
            } => {
                write!(self.out, "ENew(")?;
                self.print_type(elem_type)?;
                write!(self.out, ", ")?;
                self.print_expr(size)?;
                write!(self.out, ")")
            }
            Expr::ArrayAccess {
                name, index, field, ..
            } => {
                write!(self.out, "EArrayAccess(\"{}\", ", name)?;
                self.print_expr(index)?;
                if let Some(field) = field {
                    write!(self.out, ", \"{}\"", field)?;
                }
                write!(self.out, ")")
            }
        }
    }

    /// Shared head of the three array-assignment forms:
    /// `SArrayAssign("name", index, ["field", ]`.
    fn print_array_assign_head(
        &mut self,
        name: &str,
        index: &Expr,
        field: &Option<String>,
    ) -> fmt::Result {
        self.print_indent()?;
        write!(self.out, "SArrayAssign(\"{}\", ", name)?;
        self.print_expr(index)?;
        write!(self.out, ", ")?;
        if let Some(field) = field {
            write!(self.out, "\"{}\", ", field)?;
        }
        Ok(())
    }

    /// `a[i]++`/`a[i]--` printed as an ordinary array assignment whose value
    /// re-reads the element.
    fn print_array_incr(
        &mut self,
        name: &str,
        index: &Expr,
        field: &Option<String>,
        value: &Expr,
        symbol: &str,
    ) -> fmt::Result {
        self.print_array_assign_head(name, index, field)?;
        write!(
            self.out,
            "EBinOp({}, EArrayAccess(\"{}\", ",
            symbol, name
        )?;
        self.print_expr(index)?;
        write!(self.out, ", ")?;
        self.print_expr(value)?;
        write!(self.out, "))")
    }

    fn print_stmt(&mut self, stmt: &Stmt) -> fmt::Result {
        match stmt {
            Stmt::Expr { expr, .. } => {
                self.print_indent()?;
                write!(self.out, "SExpr(")?;
                self.print_expr(expr)?;
                write!(self.out, ")")
            }
            Stmt::VarDef {
                var_type,
                name,
                init,
                ..
            } => {
                self.print_indent()?;
                write!(self.out, "SVarDef(")?;
                self.print_type(var_type)?;
                write!(self.out, ", \"{}\", ", name)?;
                self.print_expr(init)?;
                write!(self.out, ")")
            }
            Stmt::VarAssign { name, value, .. } => {
                self.print_indent()?;
                write!(self.out, "SVarAssign(\"{}\", ", name)?;
                self.print_expr(value)?;
                write!(self.out, ")")
            }
            Stmt::ArrayAssign {
                name,
                index,
                field,
                value,
                ..
            } => {
                self.print_array_assign_head(name, index, field)?;
                self.print_expr(value)?;
                write!(self.out, ")")
            }
            Stmt::ArrayPlusAssign {
                name,
                index,
                field,
                value,
                ..
            } => self.print_array_incr(name, index, field, value, "+"),
            Stmt::ArrayMinusAssign {
                name,
                index,
                field,
                value,
                ..
            } => self.print_array_incr(name, index, field, value, "-"),
            Stmt::Scope { stmts, .. } => {
                self.print_indent()?;
                write!(self.out, "SScope({{")?;
                self.indent += INDENT_STEP;
                for stmt in stmts {
                    writeln!(self.out)?;
                    self.print_stmt(stmt)?;
                }
                self.indent -= INDENT_STEP;
                writeln!(self.out)?;
                self.print_indent()?;
                write!(self.out, "}})")
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.print_indent()?;
                write!(self.out, "SIf(")?;
                self.print_expr(cond)?;
                write!(self.out, ", ")?;
                self.print_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(self.out, ", ")?;
                    self.print_stmt(else_branch)?;
                }
                write!(self.out, ")")
            }
            Stmt::While { cond, body, .. } => {
                self.print_indent()?;
                write!(self.out, "SWhile(")?;
                self.print_expr(cond)?;
                write!(self.out, ", ")?;
                self.print_stmt(body)?;
                write!(self.out, ")")
            }
            Stmt::Break { .. } => {
                self.print_indent()?;
                write!(self.out, "SBreak")
            }
            Stmt::Return { expr, .. } => {
                self.print_indent()?;
                write!(self.out, "SReturn(")?;
                if let Some(expr) = expr {
                    self.print_expr(expr)?;
                }
                write!(self.out, ")")
            }
            Stmt::Delete { name, .. } => {
                self.print_indent()?;
                write!(self.out, "SDelete({})", name)
            }
        }
    }

    fn print_params(&mut self, params: &[Param]) -> fmt::Result {
        write!(self.out, "{{")?;
        for param in params {
            write!(self.out, "(")?;
            self.print_type(&param.param_type)?;
            write!(self.out, ", {})", param.name)?;
        }
        write!(self.out, "}}")
    }

    fn print_global(&mut self, global: &Global) -> fmt::Result {
        self.print_indent()?;
        match global {
            Global::FuncDef {
                return_type,
                name,
                params,
                body,
                ..
            } => {
                write!(self.out, "GFuncDef(")?;
                self.print_type(return_type)?;
                write!(self.out, ", {}, ", name)?;
                self.print_params(params)?;
                writeln!(self.out, ", ")?;
                self.indent += INDENT_STEP;
                self.print_stmt(body)?;
                self.indent -= INDENT_STEP;
                writeln!(self.out, ")")
            }
            Global::FuncDecl {
                return_type,
                name,
                params,
                ..
            } => {
                write!(self.out, "GFuncDecl(")?;
                self.print_type(return_type)?;
                write!(self.out, ", {}, ", name)?;
                self.print_params(params)?;
                writeln!(self.out, ")")
            }
            Global::VarDef {
                var_type,
                name,
                value,
                ..
            } => {
                write!(self.out, "GVarDef(")?;
                self.print_type(var_type)?;
                write!(self.out, ", {}, ", name)?;
                self.print_expr(value)?;
                writeln!(self.out, ")")
            }
            Global::VarDecl { var_type, name, .. } => {
                write!(self.out, "GVarDecl(")?;
                self.print_type(var_type)?;
                writeln!(self.out, ", {})", name)
            }
            Global::Struct { name, fields, .. } => {
                write!(self.out, "GStruct({}, ", name)?;
                self.print_params(fields)?;
                writeln!(self.out, ")")
            }
        }
    }
}

/// Render a whole program to a string.
pub fn pretty_print(prog: &Program) -> String {
    let mut printer = AstPrinter::new(String::new());
    // writing into a String cannot fail
    let _ = printer.print_program(prog);
    printer.into_inner()
}
