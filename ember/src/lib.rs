//! Ember language library
//!
//! A small dynamically-typed expression language with closures and
//! constant bindings.

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use ast::Span;
pub use error::{CompileError, Result};
