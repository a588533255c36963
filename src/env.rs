use crate::error::{CombError, Result};
use crate::expr::Expr;
use indexmap::IndexMap;
use std::rc::Rc;

/// Immutable snapshot of variable bindings.
///
/// Cloning is cheap and shares the map. `bind` copies it, so a branch that
/// extends its environment never disturbs a sibling branch holding the same
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: Rc<IndexMap<String, Expr>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Expr)>,
        K: Into<String>,
    {
        let vars = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self { vars: Rc::new(vars) }
    }

    /// Returns a new snapshot with `name` bound to `value`, shadowing any previous binding.
    pub fn bind(&self, name: impl Into<String>, value: Expr) -> Self {
        let mut vars = (*self.vars).clone();
        vars.insert(name.into(), value);
        Self { vars: Rc::new(vars) }
    }

    /// Fails with `UndefinedVariable` when `name` is not bound.
    pub fn lookup(&self, name: &str) -> Result<&Expr> {
        self.vars.get(name).ok_or_else(|| CombError::UndefinedVariable {
            name: name.to_string(),
            known: self.describe(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Expr)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn describe(&self) -> String {
        let pairs = self
            .vars
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", pairs)
    }
}
