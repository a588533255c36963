//! Declarative generation of command-line invocations.
//!
//! A caller describes one logical command as an [`Expr`] tree with variation
//! points: selectors, named arguments that replace, append or delete earlier
//! occurrences, and variable bindings. [`evaluate`] lazily enumerates every
//! concrete command the tree denotes, each paired with the [`Environment`]
//! that produced it, and [`Combiner`] renders and runs them.

pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod expr;
pub mod render;
pub mod resolve;
pub mod runner;
pub mod utils;

pub use env::Environment;
pub use error::{CombError, Result};
pub use eval::{Candidate, Candidates, evaluate};
pub use expr::builders::{
    arg, arg_append, arg_delete, bind, bind_if_undefined, deferred, fmt, list, sel, selarg, split,
};
pub use expr::{ArgMode, Argument, Binding, Choices, Deferred, Expr, Key, Literal, Selector, Which};
pub use render::{render, to_command};
pub use resolve::{flatten, resolve_arguments};
pub use runner::Combiner;
