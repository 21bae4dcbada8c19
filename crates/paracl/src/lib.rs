//! A tree-walking interpreter for ParaC: integer and array variables,
//! lexical scoping with shadowing, arithmetic/logical/comparison operators,
//! `if`/`while` control flow, and line-buffered integer I/O.
//!
//! The crate is organized leaves-first, matching how a program actually gets
//! evaluated: identifiers are interned ([`intern`]) into handles stored in
//! arena-owned AST nodes ([`arena`], [`ast`]), which [`eval`] walks against a
//! scope stack ([`namespace`]) and a pair of I/O collaborators ([`io`]).
//! [`syntax`] is the one conformant front end that turns source text into an
//! [`ast::Program`]; the engine itself only depends on the AST shape, not on
//! any particular parser.
#![expect(clippy::module_name_repetitions, reason = "matches the corpus's naming style")]

pub mod arena;
pub mod ast;
pub mod error;
pub mod eval;
pub mod intern;
pub mod io;
pub mod namespace;
pub mod resource;
pub mod syntax;
pub mod value;

pub use crate::{
    arena::{Arena, NodeId},
    ast::{AssignTarget, BinOp, Expr, Node, Program, Stmt, UnOp},
    error::{ParseError, RuntimeError},
    eval::{Evaluator, run, run_silent, run_with_guard},
    intern::{Interner, NameId},
    io::{CollectStringPrint, InputSource, NoInput, NoPrint, PrintWriter, StdInput, StdPrint, VecInput},
    namespace::Scopes,
    resource::{DEFAULT_MAX_RECURSION_DEPTH, LimitedDepth, RecursionGuard, Unbounded},
    syntax::parse,
    value::Value,
};
