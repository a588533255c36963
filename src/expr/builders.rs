//! Free functions for writing expression trees that read like the command they build.
//!
//! ```ignore
//! list([
//!     Expr::from("echo"),
//!     bind_if_undefined("@mode", "slow"),
//!     sel("@mode", Choices::keyed([("fast", arg("num-iters", [5])), ("slow", arg("num-iters", [10]))])?),
//!     arg("output", [fmt("@mode.out")]),
//! ])
//! ```

use super::{ArgMode, Argument, Binding, Choices, Deferred, Expr, Selector, Which};
use crate::env::Environment;
use crate::error::{CombError, Result};
use regex::Regex;
use std::sync::LazyLock;

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("variable pattern is valid"));

pub fn list<I, V>(items: I) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Expr>,
{
    Expr::List(items.into_iter().map(Into::into).collect())
}

fn argument<I, V>(name: &str, values: I, mode: ArgMode) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Expr>,
{
    Expr::Argument(Argument {
        name: name.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        mode,
    })
}

/// `--name values...`, replacing any earlier `--name`.
pub fn arg<I, V>(name: &str, values: I) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Expr>,
{
    argument(name, values, ArgMode::Replace)
}

/// Appends `values` to an earlier `--name`, or starts it.
pub fn arg_append<I, V>(name: &str, values: I) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Expr>,
{
    argument(name, values, ArgMode::Append)
}

/// Erases an earlier `--name`.
pub fn arg_delete(name: &str) -> Expr {
    argument(name, Vec::<Expr>::new(), ArgMode::Delete)
}

pub fn sel(which: impl Into<Which>, choices: impl Into<Choices>) -> Expr {
    Expr::Selector(Selector {
        which: which.into(),
        choices: choices.into(),
    })
}

/// Selects among `--name value` arguments, one per value.
pub fn selarg<I, V>(which: impl Into<Which>, name: &str, values: I) -> Expr
where
    I: IntoIterator<Item = V>,
    V: Into<Expr>,
{
    let choices = Choices::positional(values.into_iter().map(|v| arg(name, [v])));
    sel(which, choices)
}

pub fn bind(variable: &str, value: impl Into<Expr>) -> Expr {
    Expr::Binding(Binding {
        variable: variable.to_string(),
        value: Box::new(value.into()),
        if_undefined: false,
    })
}

/// Binds `variable` only when nothing has bound it yet. Useful for defaults.
pub fn bind_if_undefined(variable: &str, value: impl Into<Expr>) -> Expr {
    Expr::Binding(Binding {
        variable: variable.to_string(),
        value: Box::new(value.into()),
        if_undefined: true,
    })
}

pub fn deferred<F>(label: &str, func: F) -> Expr
where
    F: Fn(&Environment) -> Result<Expr> + 'static,
{
    Expr::Deferred(Deferred::new(label, func))
}

/// Replaces every `@name` in `template` with the value bound in the environment.
pub fn fmt(template: &str) -> Expr {
    let owned = template.to_string();
    deferred(&format!("fmt {:?}", template), move |env| {
        interpolate(&owned, env).map(Expr::from)
    })
}

pub fn interpolate(template: &str, env: &Environment) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for m in VARIABLE_RE.find_iter(template) {
        out.push_str(&template[last..m.start()]);
        out.push_str(&env.lookup(m.as_str())?.to_string());
        last = m.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Splits a command prefix into tokens the way a POSIX shell would.
pub fn split(line: &str) -> Result<Expr> {
    let words = shell_words::split(line).map_err(|e| CombError::Split {
        line: line.to_string(),
        reason: e.to_string(),
    })?;
    Ok(list(words))
}
