//! Lexer (tokenizer) for Cigrid source code.
//!
//! Converts raw source text into [`Token`]s on demand. The parser pulls one
//! token at a time via [`Lexer::next_token`]; [`Lexer::tokenize`] drains the
//! whole stream for debugging. Preprocessor-style `#` lines are skipped
//! rather than parsed.
//!
//! Lexical errors come in two tiers: recoverable ones (unknown escape
//! sequences, empty character constants) are reported to the
//! [`Diagnostics`] sink and scanning continues; stream-terminating ones
//! (undefined symbols, unterminated comments/literals) produce a
//! [`TokenKind::Bad`] token, after which no further tokens follow.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::parser::ast::Position;

/// All token kinds produced by the lexer.
///
/// `Eof` is always the last token of a healthy stream; `Bad` marks a
/// stream-terminating lexical error and carries its message as the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Operators
    Bang,    // !
    Tilde,   // ~
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Caret,   // ^
    Percent, // %
    Lt,      // <
    Gt,      // >
    Le,      // <=
    Ge,      // >=
    EqEq,    // ==
    Eq,      // =
    NotEq,   // !=
    Amp,     // &
    Pipe,    // |
    AndAnd,  // &&
    OrOr,    // ||
    Shl,     // <<
    Shr,     // >>

    // Separators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,

    // Keywords
    Break,
    Char,
    Delete,
    Else,
    Extern,
    For,
    If,
    Int,
    New,
    Return,
    Struct,
    Void,
    While,

    // Constants and identifiers
    Ident,
    IntLiteral,
    CharLiteral,
    StringLiteral,

    // Sentinels
    Eof,
    Bad,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Bang => "'!'",
            TokenKind::Tilde => "'~'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Percent => "'%'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Le => "'<='",
            TokenKind::Ge => "'>='",
            TokenKind::EqEq => "'=='",
            TokenKind::Eq => "'='",
            TokenKind::NotEq => "'!='",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Break => "'break'",
            TokenKind::Char => "'char'",
            TokenKind::Delete => "'delete'",
            TokenKind::Else => "'else'",
            TokenKind::Extern => "'extern'",
            TokenKind::For => "'for'",
            TokenKind::If => "'if'",
            TokenKind::Int => "'int'",
            TokenKind::New => "'new'",
            TokenKind::Return => "'return'",
            TokenKind::Struct => "'struct'",
            TokenKind::Void => "'void'",
            TokenKind::While => "'while'",
            TokenKind::Ident => "identifier",
            TokenKind::IntLiteral => "int literal",
            TokenKind::CharLiteral => "char literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Eof => "end of file",
            TokenKind::Bad => "bad token",
        };
        write!(f, "{}", text)
    }
}

/// Literal payload of a token. Identifiers carry their text as `Str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    None,
    Int(i32),
    Char(char),
    Str(String),
}

/// One scanned token: kind, exact source substring, start position, and an
/// optional literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub pos: Position,
    pub literal: Literal,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
            literal: Literal::None,
        }
    }

    fn with_literal(
        kind: TokenKind,
        lexeme: impl Into<String>,
        pos: Position,
        literal: Literal,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
            literal,
        }
    }

    /// The identifier text, if this token is an identifier.
    pub fn ident_name(&self) -> Option<&str> {
        match (&self.kind, &self.literal) {
            (TokenKind::Ident, Literal::Str(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntLiteral => write!(f, "int literal {}", self.lexeme),
            TokenKind::CharLiteral => write!(f, "char literal {}", self.lexeme),
            TokenKind::StringLiteral => {
                write!(f, "string literal {}", self.lexeme)
            }
            TokenKind::Bad => write!(f, "bad token ({})", self.lexeme),
            _ => write!(f, "{}", self.kind),
        }
    }
}

fn keyword_table() -> FxHashMap<&'static str, TokenKind> {
    let mut keywords = FxHashMap::default();
    keywords.insert("break", TokenKind::Break);
    keywords.insert("char", TokenKind::Char);
    keywords.insert("delete", TokenKind::Delete);
    keywords.insert("else", TokenKind::Else);
    keywords.insert("extern", TokenKind::Extern);
    keywords.insert("for", TokenKind::For);
    keywords.insert("if", TokenKind::If);
    keywords.insert("int", TokenKind::Int);
    keywords.insert("new", TokenKind::New);
    keywords.insert("return", TokenKind::Return);
    keywords.insert("struct", TokenKind::Struct);
    keywords.insert("void", TokenKind::Void);
    keywords.insert("while", TokenKind::While);
    keywords
}

/// Pull-based lexer over an in-memory source buffer.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashMap<&'static str, TokenKind>,
    diag: Diagnostics,
}

impl Lexer {
    /// Create a lexer over `input`, reporting recoverable lexical errors
    /// into `diag`.
    pub fn new(input: &str, diag: Diagnostics) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: keyword_table(),
            diag,
        }
    }

    /// Scan and return the next token. Callers stop pulling once they see
    /// `Eof` or `Bad`; nothing meaningful follows either.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            match self.peek() {
                None => {
                    return Token::new(TokenKind::Eof, "EOF", self.current_position());
                }
                // `#` lines (preprocessor directives) are comments to us
                Some('#') => self.skip_line(),
                Some('/') if self.peek_ahead(1) == Some('/') => self.skip_line(),
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    if let Some(bad) = self.skip_block_comment() {
                        return bad;
                    }
                }
                Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                    return self.read_ident_or_keyword();
                }
                Some(ch) if ch.is_ascii_digit() => return self.read_number(),
                Some('\'') => return self.read_char_literal(),
                Some('"') => return self.read_string_literal(),
                Some(_) => return self.read_symbol(),
            }
        }
    }

    /// Drain the stream, collecting every token up to and including the
    /// terminating `Eof` or `Bad` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let kind = token.kind;
            let pos = token.pos;
            tokens.push(token);
            match kind {
                TokenKind::Eof => break,
                TokenKind::Bad => {
                    self.diag.error(pos, "bad token encountered");
                    break;
                }
                _ => {}
            }
        }
        tokens
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diag
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let pos = self.current_position();
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        match self.keywords.get(text.as_str()) {
            Some(&kind) => Token::new(kind, text, pos),
            None => Token::with_literal(
                TokenKind::Ident,
                text.clone(),
                pos,
                Literal::Str(text),
            ),
        }
    }

    /// Integer literals: decimal, or hexadecimal with a `0x`/`0X` prefix.
    /// No floating point. Overflow wraps, as the downstream stages expect
    /// 32-bit machine arithmetic anyway.
    fn read_number(&mut self) -> Token {
        let pos = self.current_position();
        let start = self.position;

        if self.peek() == Some('0')
            && matches!(self.peek_ahead(1), Some('x') | Some('X'))
        {
            self.advance(); // 0
            self.advance(); // x
            let mut value: i32 = 0;
            while let Some(ch) = self.peek() {
                match ch.to_digit(16) {
                    Some(digit) => {
                        value = value.wrapping_mul(16).wrapping_add(digit as i32);
                        self.advance();
                    }
                    None => break,
                }
            }
            let lexeme: String = self.input[start..self.position].iter().collect();
            return Token::with_literal(
                TokenKind::IntLiteral,
                lexeme,
                pos,
                Literal::Int(value),
            );
        }

        let mut value: i32 = 0;
        while let Some(ch) = self.peek() {
            match ch.to_digit(10) {
                Some(digit) => {
                    value = value.wrapping_mul(10).wrapping_add(digit as i32);
                    self.advance();
                }
                None => break,
            }
        }
        let lexeme: String = self.input[start..self.position].iter().collect();
        Token::with_literal(TokenKind::IntLiteral, lexeme, pos, Literal::Int(value))
    }

    /// Character literals: exactly one (possibly escaped) character between
    /// single quotes. An unknown escape is reported and scanning continues
    /// with the literal escape character; a missing closing quote ends the
    /// stream with a `Bad` token.
    fn read_char_literal(&mut self) -> Token {
        let pos = self.current_position();
        let start = self.position;
        self.advance(); // opening quote

        let value = match self.peek() {
            None => {
                return Token::new(
                    TokenKind::Bad,
                    "missing terminating ' character",
                    pos,
                );
            }
            Some('\'') => {
                self.diag.error(pos, "empty character constant");
                self.advance(); // closing quote
                let lexeme: String =
                    self.input[start..self.position].iter().collect();
                return Token::with_literal(
                    TokenKind::CharLiteral,
                    lexeme,
                    pos,
                    Literal::Char('\0'),
                );
            }
            Some('\\') => {
                self.advance();
                match self.peek() {
                    Some('n') => {
                        self.advance();
                        '\n'
                    }
                    Some('t') => {
                        self.advance();
                        '\t'
                    }
                    Some('\\') => {
                        self.advance();
                        '\\'
                    }
                    Some('\'') => {
                        self.advance();
                        '\''
                    }
                    Some('"') => {
                        self.advance();
                        '"'
                    }
                    Some(other) => {
                        self.diag.error(
                            pos,
                            format!("unknown escape sequence: '\\{}'", other),
                        );
                        self.advance();
                        other
                    }
                    None => {
                        return Token::new(
                            TokenKind::Bad,
                            "missing terminating ' character",
                            pos,
                        );
                    }
                }
            }
            Some(ch) => {
                self.advance();
                ch
            }
        };

        if self.peek() == Some('\'') {
            self.advance();
            let lexeme: String = self.input[start..self.position].iter().collect();
            Token::with_literal(
                TokenKind::CharLiteral,
                lexeme,
                pos,
                Literal::Char(value),
            )
        } else {
            Token::new(TokenKind::Bad, "missing terminating ' character", pos)
        }
    }

    /// String literals run until an unescaped `"`. A raw newline (or end of
    /// input) before the closing quote is fatal for the token: the error is
    /// reported and a `Bad` token ends the stream.
    fn read_string_literal(&mut self) -> Token {
        let pos = self.current_position();
        let start = self.position;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.diag.error(pos, "missing terminating \" character");
                    return Token::new(
                        TokenKind::Bad,
                        "missing terminating \" character",
                        pos,
                    );
                }
                Some('"') => {
                    self.advance();
                    let lexeme: String =
                        self.input[start..self.position].iter().collect();
                    return Token::with_literal(
                        TokenKind::StringLiteral,
                        lexeme,
                        pos,
                        Literal::Str(value),
                    );
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('\'') => value.push('\''),
                        Some('"') => value.push('"'),
                        Some(other) => {
                            self.diag.error(
                                pos,
                                format!("unknown escape sequence: '\\{}'", other),
                            );
                            value.push(other);
                        }
                        None => continue, // loop reports at EOF
                    }
                    self.advance();
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Symbols: greedily match the longest multi-character operator before
    /// falling back to the single-character kind.
    fn read_symbol(&mut self) -> Token {
        let pos = self.current_position();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, "EOF", pos),
        };

        match ch {
            '~' => Token::new(TokenKind::Tilde, "~", pos),
            '+' => Token::new(TokenKind::Plus, "+", pos),
            '-' => Token::new(TokenKind::Minus, "-", pos),
            '*' => Token::new(TokenKind::Star, "*", pos),
            '/' => Token::new(TokenKind::Slash, "/", pos),
            '^' => Token::new(TokenKind::Caret, "^", pos),
            '%' => Token::new(TokenKind::Percent, "%", pos),
            '(' => Token::new(TokenKind::LParen, "(", pos),
            ')' => Token::new(TokenKind::RParen, ")", pos),
            '[' => Token::new(TokenKind::LBracket, "[", pos),
            ']' => Token::new(TokenKind::RBracket, "]", pos),
            '{' => Token::new(TokenKind::LBrace, "{", pos),
            '}' => Token::new(TokenKind::RBrace, "}", pos),
            ';' => Token::new(TokenKind::Semicolon, ";", pos),
            ',' => Token::new(TokenKind::Comma, ",", pos),
            '.' => Token::new(TokenKind::Dot, ".", pos),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::NotEq, "!=", pos)
                } else {
                    Token::new(TokenKind::Bang, "!", pos)
                }
            }
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    Token::new(TokenKind::Shl, "<<", pos)
                } else if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Le, "<=", pos)
                } else {
                    Token::new(TokenKind::Lt, "<", pos)
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    Token::new(TokenKind::Shr, ">>", pos)
                } else if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Ge, ">=", pos)
                } else {
                    Token::new(TokenKind::Gt, ">", pos)
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::EqEq, "==", pos)
                } else {
                    Token::new(TokenKind::Eq, "=", pos)
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Token::new(TokenKind::OrOr, "||", pos)
                } else {
                    Token::new(TokenKind::Pipe, "|", pos)
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Token::new(TokenKind::AndAnd, "&&", pos)
                } else {
                    Token::new(TokenKind::Amp, "&", pos)
                }
            }
            _ => {
                self.diag.error(pos, "undefined symbol");
                Token::new(TokenKind::Bad, "undefined symbol", pos)
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip to (and past) the next newline. Used for `#` lines and `//`
    /// comments.
    fn skip_line(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip a `/* ... */` comment. Returns a `Bad` token if the comment is
    /// never terminated.
    fn skip_block_comment(&mut self) -> Option<Token> {
        let pos = self.current_position();
        self.advance(); // /
        self.advance(); // *

        while self.peek().is_some() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return None;
            }
            self.advance();
        }

        self.diag.error(pos, "unterminated comment");
        Some(Token::new(TokenKind::Bad, "unterminated comment", pos))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Render a token list as `input_file:line:column  lexeme` lines, the format
/// used by the token-dump debug output.
pub fn format_token_list(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let location =
            format!("input_file:{}:{}", token.pos.line, token.pos.column);
        out.push_str(&format!("{:<20}{}\n", location, token.lexeme));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source, Diagnostics::new()).tokenize()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("int main() { return 0; }");

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].ident_name(), Some("main"));
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(tokens[3].kind, TokenKind::RParen);
        assert_eq!(tokens[4].kind, TokenKind::LBrace);
        assert_eq!(tokens[5].kind, TokenKind::Return);
        assert_eq!(tokens[6].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[6].literal, Literal::Int(0));
        assert_eq!(tokens[7].kind, TokenKind::Semicolon);
        assert_eq!(tokens[8].kind, TokenKind::RBrace);
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_multi_char_operators_greedy() {
        let tokens = tokenize("<< <= < >> >= > == = != ! && & || |");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Shl,
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::Shr,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::EqEq,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Bang,
                TokenKind::AndAnd,
                TokenKind::Amp,
                TokenKind::OrOr,
                TokenKind::Pipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hex_and_decimal_equivalence() {
        let hex = tokenize("0x1A");
        let dec = tokenize("26");
        assert_eq!(hex[0].kind, TokenKind::IntLiteral);
        assert_eq!(hex[0].literal, Literal::Int(26));
        assert_eq!(dec[0].literal, Literal::Int(26));
        assert_eq!(hex[0].lexeme, "0x1A");

        let upper = tokenize("0XfF");
        assert_eq!(upper[0].literal, Literal::Int(255));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens =
            tokenize("int x # pragma line\n// comment\n/* block\ncomment */ int y");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].ident_name(), Some("x"));
        assert_eq!(tokens[2].kind, TokenKind::Int);
        assert_eq!(tokens[3].ident_name(), Some("y"));
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_comment_is_bad() {
        let mut lexer = Lexer::new("int /* oops", Diagnostics::new());
        let tokens = lexer.tokenize();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Bad));
        assert_eq!(tokens.last().map(|t| t.lexeme.as_str()), Some("unterminated comment"));
        assert!(lexer.diagnostics().has_errors());
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""hello\n\tworld\"""#);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(
            tokens[0].literal,
            Literal::Str("hello\n\tworld\"".to_string())
        );
        // lexeme is the exact source substring, escapes unprocessed
        assert_eq!(tokens[0].lexeme, r#""hello\n\tworld\"""#);
    }

    #[test]
    fn test_string_raw_newline_is_fatal_for_token() {
        let mut lexer = Lexer::new("\"abc\ndef\"", Diagnostics::new());
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Bad);
        assert!(lexer.diagnostics().has_errors());
    }

    #[test]
    fn test_char_literals() {
        let tokens = tokenize(r"'a' '\n' '\\' '\''");
        assert_eq!(tokens[0].literal, Literal::Char('a'));
        assert_eq!(tokens[1].literal, Literal::Char('\n'));
        assert_eq!(tokens[2].literal, Literal::Char('\\'));
        assert_eq!(tokens[3].literal, Literal::Char('\''));
        assert_eq!(tokens[1].lexeme, r"'\n'");
    }

    #[test]
    fn test_unknown_escape_is_recoverable() {
        let mut lexer = Lexer::new(r"'\q' 42", Diagnostics::new());
        let first = lexer.next_token();
        // scanning continues with the literal escape character
        assert_eq!(first.kind, TokenKind::CharLiteral);
        assert_eq!(first.literal, Literal::Char('q'));
        assert!(lexer.diagnostics().has_errors());

        let second = lexer.next_token();
        assert_eq!(second.kind, TokenKind::IntLiteral);
        assert_eq!(second.literal, Literal::Int(42));
    }

    #[test]
    fn test_unterminated_char_is_bad() {
        let tokens = tokenize("'a");
        assert_eq!(tokens[0].kind, TokenKind::Bad);
        assert_eq!(tokens[0].lexeme, "missing terminating ' character");
    }

    #[test]
    fn test_undefined_symbol_is_bad() {
        let mut lexer = Lexer::new("int @", Diagnostics::new());
        let tokens = lexer.tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Bad);
        assert_eq!(tokens[1].lexeme, "undefined symbol");
        assert!(lexer.diagnostics().has_errors());
    }

    #[test]
    fn test_keywords_case_sensitive() {
        let tokens = tokenize("while While WHILE");
        assert_eq!(tokens[0].kind, TokenKind::While);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_eof_sentinel_exactly_once_and_last() {
        let tokens = tokenize("int x = 5;");
        let eof_count = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .count();
        assert_eq!(eof_count, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_lexeme_round_trip() {
        let tokens = tokenize("foo 0x1A 'x' \"s\\n\" <= >> while");
        for token in &tokens {
            if token.kind == TokenKind::Eof {
                continue;
            }
            let rescanned = tokenize(&token.lexeme);
            assert_eq!(
                rescanned[0].kind, token.kind,
                "lexeme {:?} did not round-trip",
                token.lexeme
            );
        }
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("int\n  x;");
        assert_eq!(tokens[0].pos, Position::new(1, 1));
        assert_eq!(tokens[1].pos, Position::new(2, 3));
        assert_eq!(tokens[2].pos, Position::new(2, 4));
    }

    #[test]
    fn test_format_token_list() {
        let tokens = tokenize("int x");
        let dump = format_token_list(&tokens);
        assert!(dump.starts_with("input_file:1:1"));
        assert!(dump.contains("int"));
    }
}
