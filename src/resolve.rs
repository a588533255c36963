use crate::error::{CombError, Result};
use crate::expr::{ArgMode, Expr, Literal};
use indexmap::IndexMap;

/// Depth-first flattening of nested lists. Every other node is a leaf.
pub fn flatten(expr: &Expr) -> Vec<Expr> {
    let mut out = Vec::new();
    flatten_into(expr, &mut out);
    out
}

fn flatten_into(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::List(items) => items.iter().for_each(|item| flatten_into(item, out)),
        leaf => out.push(leaf.clone()),
    }
}

/// Collapses repeated `--name` occurrences into final command tokens.
///
/// The first pass merges every occurrence per name: replace overwrites,
/// append extends, delete drops the entry. The second pass emits `--name`
/// with the merged values at the first occurrence that still has an entry,
/// and suppresses every later one. Bindings carry no text and are dropped.
pub fn resolve_arguments(tokens: &[Expr]) -> Result<Vec<Literal>> {
    let mut merged: IndexMap<&str, Vec<&Expr>> = IndexMap::new();
    for token in tokens {
        if let Expr::Argument(argument) = token {
            let name = argument.name.as_str();
            match argument.mode {
                ArgMode::Append => merged.entry(name).or_default().extend(&argument.values),
                ArgMode::Delete => {
                    merged.shift_remove(name);
                }
                ArgMode::Replace => {
                    merged.insert(name, argument.values.iter().collect());
                }
            }
        }
    }

    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Expr::Literal(lit) => out.push(lit.clone()),
            Expr::Binding(_) => {}
            Expr::Argument(argument) => {
                let Some(values) = merged.shift_remove(argument.name.as_str()) else {
                    continue;
                };
                out.push(Literal::Str(format!("--{}", argument.name)));
                for value in values {
                    for atom in flatten(value) {
                        out.push(expect_literal(atom, &argument.name)?);
                    }
                }
            }
            other => {
                return Err(CombError::InternalShape(format!(
                    "unresolved {} reached argument resolution",
                    other
                )));
            }
        }
    }
    Ok(out)
}

fn expect_literal(atom: Expr, name: &str) -> Result<Literal> {
    match atom {
        Expr::Literal(lit) => Ok(lit),
        other => Err(CombError::InternalShape(format!(
            "value {} of --{} is not a plain value",
            other, name
        ))),
    }
}
