//! Recursive-descent parser with precedence climbing.
//!
//! Consumes the token stream from [`super::lexer`] and allocates nodes
//! directly into an [`Arena`] as it goes — there is no separate parse tree
//! sitting between tokens and the AST the evaluator walks (`SPEC_FULL.md`
//! §11). Binary operators climb the standard C-like precedence ladder, low
//! to high: `||`, `&&`, equality, relational, additive, multiplicative; unary
//! `-`/`!` bind tighter than any binary operator, and `[]`/`()` bind
//! tightest of all. `:=` sits below every expression operator and is
//! right-associative, which is what lets `a := b := 5` parse as
//! `a := (b := 5)`.

use std::ops::Range;

use logos::Logos;

use super::lexer::Token;
use crate::{
    arena::{Arena, NodeId},
    ast::{AssignTarget, BinOp, Expr, Node, Program, Stmt, UnOp},
    error::ParseError,
    intern::{Interner, NameId},
};

/// Parses a complete ParaC program, returning the AST the evaluator walks.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut parser = Parser::new(source);
    let root = parser.parse_program()?;
    Ok(Program { arena: parser.arena, interner: parser.interner, root })
}

struct Spanned<'src> {
    token: Token<'src>,
    span: Range<usize>,
}

struct Parser<'src> {
    source: &'src str,
    lexer: logos::Lexer<'src, Token<'src>>,
    /// One token of lookahead, filled lazily by [`Parser::peek`].
    lookahead: Option<Spanned<'src>>,
    arena: Arena,
    interner: Interner,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self { source, lexer: Token::lexer(source), lookahead: None, arena: Arena::new(), interner: Interner::new() }
    }

    fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let mut statements = Vec::new();
        while self.peek()?.is_some() {
            statements.push(self.parse_stmt()?);
        }
        Ok(self.arena.alloc(Node::Stmt(Stmt::Scope(statements))))
    }

    // --- token plumbing -------------------------------------------------

    fn peek(&mut self) -> Result<Option<&Token<'src>>, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = self.advance_raw()?;
        }
        Ok(self.lookahead.as_ref().map(|s| &s.token))
    }

    fn bump(&mut self) -> Result<Spanned<'src>, ParseError> {
        if let Some(spanned) = self.lookahead.take() {
            return Ok(spanned);
        }
        self.advance_raw()?.ok_or_else(|| self.error_at(self.source.len(), "unexpected end of input".to_string()))
    }

    fn advance_raw(&mut self) -> Result<Option<Spanned<'src>>, ParseError> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(Spanned { token, span: self.lexer.span() })),
            Some(Err(())) => {
                let span = self.lexer.span();
                Err(self.error_at(span.start, format!("unrecognized character {:?}", &self.source[span])))
            }
        }
    }

    fn check(&mut self, token: Token<'src>) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_some_and(|t| *t == token))
    }

    fn eat(&mut self, token: Token<'src>) -> Result<bool, ParseError> {
        if self.check(token)? {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: Token<'src>) -> Result<(), ParseError> {
        if self.eat(token)? {
            Ok(())
        } else {
            let found = self.describe_next()?;
            self.fail(format!("expected {token}, found {found}"))
        }
    }

    fn describe_next(&mut self) -> Result<String, ParseError> {
        Ok(match self.peek()? {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        })
    }

    fn fail<T>(&mut self, message: String) -> Result<T, ParseError> {
        let offset = self.lookahead.as_ref().map_or(self.source.len(), |s| s.span.start);
        Err(self.error_at(offset, message))
    }

    fn error_at(&self, offset: usize, message: String) -> ParseError {
        let (line, column) = line_col(self.source, offset);
        ParseError { message, line, column }
    }

    fn expect_ident(&mut self) -> Result<NameId, ParseError> {
        let spanned = self.bump()?;
        match spanned.token {
            Token::Ident(text) => Ok(self.interner.intern(text)),
            other => {
                let (line, column) = line_col(self.source, spanned.span.start);
                Err(ParseError { message: format!("expected an identifier, found {other}"), line, column })
            }
        }
    }

    // --- statements -------------------------------------------------------

    fn parse_stmt(&mut self) -> Result<NodeId, ParseError> {
        match self.peek()? {
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::If) => self.parse_if(),
            Some(Token::While) => self.parse_while(),
            Some(Token::Print) => self.parse_print(),
            Some(Token::Ident(_)) => self.parse_assign_stmt(),
            _ => {
                let found = self.describe_next()?;
                self.fail(format!("expected a statement, found {found}"))
            }
        }
    }

    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(Token::RBrace)? {
            statements.push(self.parse_stmt()?);
        }
        self.expect(Token::RBrace)?;
        Ok(self.arena.alloc(Node::Stmt(Stmt::Scope(statements))))
    }

    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let then_branch = self.parse_stmt()?;
        let else_branch = if self.eat(Token::Else)? { Some(self.parse_stmt()?) } else { None };
        Ok(self.arena.alloc(Node::Stmt(Stmt::If { cond, then_branch, else_branch })))
    }

    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = self.parse_stmt()?;
        Ok(self.arena.alloc(Node::Stmt(Stmt::While { cond, body })))
    }

    fn parse_print(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::Print)?;
        let expr = self.parse_expr()?;
        self.expect(Token::Semi)?;
        Ok(self.arena.alloc(Node::Stmt(Stmt::Print(expr))))
    }

    fn parse_assign_stmt(&mut self) -> Result<NodeId, ParseError> {
        let lhs = self.parse_postfix()?;
        let target = self.lhs_target(lhs)?;
        self.expect(Token::Assign)?;
        let rhs = self.parse_rhs()?;
        self.expect(Token::Semi)?;
        Ok(self.arena.alloc(Node::Stmt(Stmt::Assign(target, rhs))))
    }

    /// The right-hand side of `:=`: either initialiser form, or an
    /// expression (itself possibly another `:=`, per `a := b := 5`).
    fn parse_rhs(&mut self) -> Result<NodeId, ParseError> {
        match self.peek()? {
            Some(Token::Repeat) => self.parse_repeat(),
            Some(Token::LBracket) => self.parse_array_literal(),
            _ => self.parse_assign_or_expr(),
        }
    }

    fn parse_repeat(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::Repeat)?;
        let first = self.parse_expr()?;
        let (element, size) = if self.eat(Token::Of)? { (Some(first), self.parse_expr()?) } else { (None, first) };
        Ok(self.arena.alloc(Node::Expr(Expr::Repeat { element, size })))
    }

    fn parse_array_literal(&mut self) -> Result<NodeId, ParseError> {
        self.expect(Token::LBracket)?;
        let mut elements = vec![self.parse_expr()?];
        while self.eat(Token::Comma)? {
            elements.push(self.parse_expr()?);
        }
        self.expect(Token::RBracket)?;
        Ok(self.arena.alloc(Node::Expr(Expr::ArrayLiteral(elements))))
    }

    /// Converts an already-parsed expression node into an assignment
    /// target. Only a bare variable or an index chain on one qualifies
    /// (`spec.md` §6's `lhs` production); anything else is a parse error.
    fn lhs_target(&mut self, node: NodeId) -> Result<AssignTarget, ParseError> {
        match self.arena.get(node) {
            Node::Expr(Expr::Variable(name)) => Ok(AssignTarget::Variable(*name)),
            Node::Expr(Expr::Index(..)) => Ok(AssignTarget::Index(node)),
            _ => self.fail("invalid assignment target: expected a variable or an indexed access".to_string()),
        }
    }

    /// Parses one expression, then — if it is immediately followed by
    /// `:=` — reinterprets it as an assignment target and recurses into the
    /// right-hand side, producing `Expr::Assign`. `:=` is right-associative
    /// because the recursive call is what parses everything to its right.
    fn parse_assign_or_expr(&mut self) -> Result<NodeId, ParseError> {
        let expr = self.parse_expr()?;
        if self.eat(Token::Assign)? {
            let target = self.lhs_target(expr)?;
            let rhs = self.parse_rhs()?;
            Ok(self.arena.alloc(Node::Expr(Expr::Assign(target, rhs))))
        } else {
            Ok(expr)
        }
    }

    // --- expressions, precedence climbing low to high ---------------------

    fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(Self::parse_and, &[(Token::OrOr, BinOp::Or)])
    }

    fn parse_and(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(Self::parse_equality, &[(Token::AndAnd, BinOp::And)])
    }

    fn parse_equality(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(Self::parse_relational, &[(Token::EqEq, BinOp::Eq), (Token::NotEq, BinOp::Ne)])
    }

    fn parse_relational(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(
            Self::parse_additive,
            &[(Token::Lt, BinOp::Lt), (Token::Gt, BinOp::Gt), (Token::Le, BinOp::Le), (Token::Ge, BinOp::Ge)],
        )
    }

    fn parse_additive(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(Self::parse_multiplicative, &[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Sub)])
    }

    fn parse_multiplicative(&mut self) -> Result<NodeId, ParseError> {
        self.parse_left_assoc(
            Self::parse_unary,
            &[(Token::Star, BinOp::Mul), (Token::Slash, BinOp::Div), (Token::Percent, BinOp::Mod)],
        )
    }

    /// Shared left-associative binary tier: parses one `next` operand, then
    /// repeatedly matches any of `ops` and folds in another `next` operand.
    fn parse_left_assoc(
        &mut self,
        next: fn(&mut Self) -> Result<NodeId, ParseError>,
        ops: &[(Token<'src>, BinOp)],
    ) -> Result<NodeId, ParseError> {
        let mut lhs = next(self)?;
        loop {
            let Some(op) = self.match_any(ops)? else { break };
            let rhs = next(self)?;
            lhs = self.arena.alloc(Node::Expr(Expr::Binary(op, lhs, rhs)));
        }
        Ok(lhs)
    }

    fn match_any(&mut self, ops: &[(Token<'src>, BinOp)]) -> Result<Option<BinOp>, ParseError> {
        let Some(found) = self.peek()?.copied() else { return Ok(None) };
        let Some(&(_, op)) = ops.iter().find(|(token, _)| *token == found) else { return Ok(None) };
        self.bump()?;
        Ok(Some(op))
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let op = match self.peek()? {
            Some(Token::Minus) => Some(UnOp::Neg),
            Some(Token::Bang) => Some(UnOp::Not),
            _ => None,
        };
        match op {
            Some(op) => {
                self.bump()?;
                let operand = self.parse_unary()?;
                Ok(self.arena.alloc(Node::Expr(Expr::Unary(op, operand))))
            }
            None => self.parse_postfix(),
        }
    }

    /// Parses a primary expression, then any chain of `[expr]` subscripts.
    /// Subscripting is only legal on a variable or another index (`spec.md`
    /// §6's `lhs`), so the loop only continues when the expression built so
    /// far is one of those two shapes.
    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let mut node = self.parse_primary()?;
        while self.check(Token::LBracket)? {
            if !matches!(self.arena.get(node), Node::Expr(Expr::Variable(_) | Expr::Index(..))) {
                return self.fail("only a variable or an indexed access can be subscripted".to_string());
            }
            self.bump()?;
            let index = self.parse_expr()?;
            self.expect(Token::RBracket)?;
            node = self.arena.alloc(Node::Expr(Expr::Index(node, index)));
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let spanned = self.bump()?;
        match spanned.token {
            Token::Int(n) => Ok(self.arena.alloc(Node::Expr(Expr::Constant(n)))),
            Token::Ident(text) => {
                let name = self.interner.intern(text);
                Ok(self.arena.alloc(Node::Expr(Expr::Variable(name))))
            }
            Token::Question => Ok(self.arena.alloc(Node::Expr(Expr::Input))),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => {
                let (line, column) = line_col(self.source, spanned.span.start);
                Err(ParseError { message: format!("expected an expression, found {other}"), line, column })
            }
        }
    }
}

/// 1-based line and column of a byte offset into `source`.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let prefix = &source[..offset];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix.len() - prefix.rfind('\n').map_or(0, |pos| pos + 1) + 1;
    (line, column)
}
