//! Tokenizer for ParaC source text, built on `logos`.
//!
//! The engine itself (`spec.md` §1) is defined against the AST grammar in
//! §6, not against any particular surface syntax; this lexer and the parser
//! built on top of it in [`super::parser`] are the one conformant front end
//! the workspace ships so the crate is runnable end to end.

use logos::Logos;

/// One lexical token. `Ident` and `Int` borrow from the source text they
/// were scanned from; every other variant is a fixed spelling.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'src> {
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice(), priority = 1)]
    Ident(&'src str),

    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("print")]
    Print,
    #[token("repeat")]
    Repeat,
    #[token("of")]
    Of,

    #[token(":=")]
    Assign,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "integer literal {n}"),
            Self::Ident(name) => write!(f, "identifier {name:?}"),
            Self::If => write!(f, "`if`"),
            Self::Else => write!(f, "`else`"),
            Self::While => write!(f, "`while`"),
            Self::Print => write!(f, "`print`"),
            Self::Repeat => write!(f, "`repeat`"),
            Self::Of => write!(f, "`of`"),
            Self::Assign => write!(f, "`:=`"),
            Self::Semi => write!(f, "`;`"),
            Self::Comma => write!(f, "`,`"),
            Self::Question => write!(f, "`?`"),
            Self::LParen => write!(f, "`(`"),
            Self::RParen => write!(f, "`)`"),
            Self::LBracket => write!(f, "`[`"),
            Self::RBracket => write!(f, "`]`"),
            Self::LBrace => write!(f, "`{{`"),
            Self::RBrace => write!(f, "`}}`"),
            Self::Plus => write!(f, "`+`"),
            Self::Minus => write!(f, "`-`"),
            Self::Star => write!(f, "`*`"),
            Self::Slash => write!(f, "`/`"),
            Self::Percent => write!(f, "`%`"),
            Self::Le => write!(f, "`<=`"),
            Self::Ge => write!(f, "`>=`"),
            Self::Lt => write!(f, "`<`"),
            Self::Gt => write!(f, "`>`"),
            Self::EqEq => write!(f, "`==`"),
            Self::NotEq => write!(f, "`!=`"),
            Self::AndAnd => write!(f, "`&&`"),
            Self::OrOr => write!(f, "`||`"),
            Self::Bang => write!(f, "`!`"),
        }
    }
}

use std::fmt;
