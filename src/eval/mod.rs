//! Lazy cross-product expansion of expression trees.
//!
//! [`evaluate`] turns one expression and an environment into every
//! `(resolved expression, environment)` pair the tree denotes. Results are
//! produced depth-first and in a fixed order: in a list the first element
//! varies slowest, and a selector yields its keys in the order they were
//! chosen. Nothing is materialized up front, so a caller can stop consuming
//! at any point.

use crate::env::Environment;
use crate::error::{CombError, Result};
use crate::expr::{Argument, Binding, Choices, Expr, Key, Literal, Selector, Which};
use log::trace;
use std::iter;


/// One concrete outcome of evaluation.
pub type Candidate = (Expr, Environment);

/// Lazy stream of candidates. An `Err` item ends the stream.
pub type Candidates = Box<dyn Iterator<Item = Result<Candidate>>>;

/// Enumerates every candidate of `expr` under `env`.
///
/// The stream ends right after the first `Err`, so no branch past a failure
/// is evaluated.
pub fn evaluate(expr: Expr, env: Environment) -> Candidates {
    until_error(expand(expr, env))
}

// Raw recursion. A failing branch yields one `Err` item and its siblings
// carry on, so only `evaluate` may hand this stream out.
fn expand(expr: Expr, env: Environment) -> Candidates {
    match expr {
        Expr::List(items) => evaluate_list(items, env),
        Expr::Argument(argument) => evaluate_argument(argument, env),
        Expr::Selector(selector) => evaluate_selector(selector, env),
        Expr::Binding(binding) => evaluate_binding(binding, env),
        Expr::Deferred(deferred) => match deferred.apply(&env) {
            Ok(expr) => expand(expr, env),
            Err(e) => fail(e),
        },
        leaf @ Expr::Literal(_) => single(leaf, env),
    }
}

/// Stops after the first error so nothing is produced past a failure.
pub fn until_error<T: 'static>(
    mut items: Box<dyn Iterator<Item = Result<T>>>,
) -> Box<dyn Iterator<Item = Result<T>>> {
    // Not `take_while`: that would pull one more item past the error.
    let mut failed = false;
    Box::new(iter::from_fn(move || {
        if failed {
            return None;
        }
        let item = items.next()?;
        failed = item.is_err();
        Some(item)
    }))
}

fn single(expr: Expr, env: Environment) -> Candidates {
    Box::new(iter::once(Ok((expr, env))))
}

fn fail(e: CombError) -> Candidates {
    Box::new(iter::once(Err(e)))
}

fn evaluate_list(items: Vec<Expr>, env: Environment) -> Candidates {
    let mut items = items.into_iter();
    let Some(first) = items.next() else {
        return single(Expr::List(Vec::new()), env);
    };
    let rest: Vec<Expr> = items.collect();

    Box::new(expand(first, env).flat_map(move |candidate| -> Candidates {
        let (head, head_env) = match candidate {
            Ok(c) => c,
            Err(e) => return fail(e),
        };
        let tail_source = rest.clone();
        Box::new(evaluate_list(rest.clone(), head_env).map(move |tail| {
            let (tail, env) = tail?;
            let tail = match tail {
                Expr::List(tail) => tail,
                other => {
                    return Err(CombError::InternalShape(format!(
                        "execute on list {} should return list, but got {}",
                        Expr::List(tail_source.clone()),
                        other
                    )));
                }
            };
            let mut items = Vec::with_capacity(tail.len() + 1);
            items.push(head.clone());
            items.extend(tail);
            Ok((Expr::List(items), env))
        }))
    }))
}

fn evaluate_argument(argument: Argument, env: Environment) -> Candidates {
    let Argument { name, values, mode } = argument;
    Box::new(evaluate_list(values, env).map(move |candidate| {
        let (values, env) = candidate?;
        let values = match values {
            Expr::List(values) => values,
            other => {
                return Err(CombError::InternalShape(format!(
                    "values of --{} should evaluate to a list, but got {}",
                    name, other
                )));
            }
        };
        let argument = Argument {
            name: name.clone(),
            values,
            mode,
        };
        Ok((Expr::Argument(argument), env))
    }))
}

fn evaluate_selector(selector: Selector, env: Environment) -> Candidates {
    let Selector { which, choices } = selector;
    let keys = match selected_keys(&which, &choices, &env) {
        Ok(keys) => keys,
        Err(e) => return fail(e),
    };
    trace!("selector picks {:?}", keys);

    // Each key starts again from the environment the selector was reached with.
    Box::new(keys.into_iter().flat_map(move |key| -> Candidates {
        let key = match key {
            Ok(key) => key,
            Err(e) => return fail(e),
        };
        match choices.get(&key) {
            Some(choice) => expand(choice.clone(), env.clone()),
            None => fail(CombError::UnknownChoice {
                key: key.to_string(),
                available: choices.describe_keys(),
            }),
        }
    }))
}

/// Normalizes `which` to the list of keys to visit.
///
/// A key that cannot name a choice at all (a float, a nested list) is kept as
/// an error in its slot, so keys before it still produce their results.
fn selected_keys(which: &Which, choices: &Choices, env: &Environment) -> Result<Vec<Result<Key>>> {
    let resolved = match which {
        Which::All => return Ok(choices.keys().cloned().map(Ok).collect()),
        Which::Var(name) => env.lookup(name)?,
        Which::Value(value) => value.as_ref(),
    };

    let to_key = |expr: &Expr| {
        Key::from_expr(expr).ok_or_else(|| CombError::UnknownChoice {
            key: expr.to_string(),
            available: choices.describe_keys(),
        })
    };

    Ok(match resolved {
        Expr::Literal(Literal::Null) => choices.keys().cloned().map(Ok).collect(),
        Expr::List(items) => items.iter().map(|item| to_key(item)).collect(),
        other => vec![to_key(other)],
    })
}

fn evaluate_binding(binding: Binding, env: Environment) -> Candidates {
    // An already bound variable keeps its value and `value` is never evaluated.
    if binding.if_undefined && env.contains(&binding.variable) {
        return single(Expr::Binding(binding), env);
    }

    let value = (*binding.value).clone();
    Box::new(expand(value, env).map(move |candidate| {
        let (value, env) = candidate?;
        let env = env.bind(binding.variable.clone(), value);
        Ok((Expr::Binding(binding.clone()), env))
    }))
}
