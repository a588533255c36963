pub mod builders;
pub mod decode;

use crate::env::Environment;
use crate::error::{CombError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// A primitive scalar. Evaluates to itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Str(s) => write!(f, "{}", s),
        }
    }
}

/// How an argument merges with earlier occurrences of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgMode {
    #[default]
    Replace,
    Append,
    Delete,
}

/// A named option, rendered as `--name v1 v2 ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub values: Vec<Expr>,
    pub mode: ArgMode,
}

/// Key of a selector choice. Positional choices use `Int(0..N)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Interprets a resolved expression as a choice key, if it can be one.
    pub fn from_expr(expr: &Expr) -> Option<Key> {
        match expr {
            Expr::Literal(Literal::Int(i)) => Some(Key::Int(*i)),
            Expr::Literal(Literal::Str(s)) => Some(Key::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<Key> for Expr {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(i) => Expr::Literal(Literal::Int(i)),
            Key::Str(s) => Expr::Literal(Literal::Str(s)),
        }
    }
}

/// Ordered `key -> expression` mapping of a selector. Keys are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choices(IndexMap<Key, Expr>);

impl Choices {
    /// Keys are `0..N-1` in order.
    pub fn positional<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Expr>,
    {
        Self(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Int(i as i64), v.into()))
                .collect(),
        )
    }

    /// Keys as given, insertion order preserved. Duplicate keys are rejected.
    pub fn keyed<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Expr>,
    {
        let mut map = IndexMap::new();
        for (key, value) in pairs {
            let key = key.into();
            if map.contains_key(&key) {
                return Err(CombError::MalformedChoices(format!("duplicate key {}", key)));
            }
            map.insert(key, value.into());
        }
        Ok(Self(map))
    }

    pub fn get(&self, key: &Key) -> Option<&Expr> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Expr)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma separated key list, used in error messages.
    pub fn describe_keys(&self) -> String {
        self.keys().map(Key::to_string).collect::<Vec<_>>().join(", ")
    }
}

impl From<Vec<Expr>> for Choices {
    fn from(items: Vec<Expr>) -> Self {
        Choices::positional(items)
    }
}

/// Which choices a selector picks.
#[derive(Debug, Clone, PartialEq)]
pub enum Which {
    /// Every key, in definition order.
    All,
    /// Look the keys up in the environment at evaluation time.
    Var(String),
    /// A key or a list of keys, used literally.
    Value(Box<Expr>),
}

impl Which {
    /// `null` selects everything and `@name` strings are variable references.
    pub fn from_expr(expr: Expr) -> Self {
        match expr {
            Expr::Literal(Literal::Null) => Which::All,
            Expr::Literal(Literal::Str(s)) if is_variable(&s) => Which::Var(s),
            other => Which::Value(Box::new(other)),
        }
    }
}

impl From<&str> for Which {
    fn from(s: &str) -> Self {
        Which::from_expr(Expr::from(s))
    }
}

impl From<i64> for Which {
    fn from(i: i64) -> Self {
        Which::Value(Box::new(Expr::from(i)))
    }
}

impl From<Expr> for Which {
    fn from(expr: Expr) -> Self {
        Which::from_expr(expr)
    }
}

impl<K: Into<Key>> From<Vec<K>> for Which {
    fn from(keys: Vec<K>) -> Self {
        let keys = keys.into_iter().map(|k| Expr::from(k.into())).collect();
        Which::Value(Box::new(Expr::List(keys)))
    }
}

/// A branch point yielding one result per chosen key.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub which: Which,
    pub choices: Choices,
}

/// An update to the environment. Carries no command text.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub variable: String,
    pub value: Box<Expr>,
    pub if_undefined: bool,
}

type DeferredFn = dyn Fn(&Environment) -> Result<Expr>;

/// An expression computed from the environment when evaluation reaches it.
#[derive(Clone)]
pub struct Deferred {
    label: String,
    func: Rc<DeferredFn>,
}

impl Deferred {
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Environment) -> Result<Expr> + 'static,
    {
        Self {
            label: label.into(),
            func: Rc::new(func),
        }
    }

    pub fn apply(&self, env: &Environment) -> Result<Expr> {
        (self.func)(env)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").field("label", &self.label).finish_non_exhaustive()
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

/// The closed set of node kinds the evaluator understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    List(Vec<Expr>),
    Argument(Argument),
    Selector(Selector),
    Binding(Binding),
    Deferred(Deferred),
}

impl Expr {
    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Expr::List(_))
    }
}

/// Variable names carry a leading `@`.
pub fn is_variable(name: &str) -> bool {
    name.starts_with('@')
}

fn join_exprs(items: &[Expr]) -> String {
    items.iter().map(Expr::to_string).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::List(items) => write!(f, "[{}]", join_exprs(items)),
            Expr::Argument(a) => {
                write!(f, "--{}", a.name)?;
                for v in &a.values {
                    write!(f, " {}", v)?;
                }
                match a.mode {
                    ArgMode::Replace => Ok(()),
                    ArgMode::Append => write!(f, " (append)"),
                    ArgMode::Delete => write!(f, " (delete)"),
                }
            }
            Expr::Selector(s) => {
                let which = match &s.which {
                    Which::All => "null".to_string(),
                    Which::Var(name) => name.clone(),
                    Which::Value(v) => v.to_string(),
                };
                let choices = s
                    .choices
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "sel({}, {{{}}})", which, choices)
            }
            Expr::Binding(b) => {
                let op = if b.if_undefined { "?=" } else { "=" };
                write!(f, "let {} {} {}", b.variable, op, b.value)
            }
            Expr::Deferred(d) => write!(f, "<{}>", d.label),
        }
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Literal(Literal::Str(s.to_string()))
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::Str(s))
    }
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        Expr::Literal(Literal::Int(i))
    }
}

impl From<i32> for Expr {
    fn from(i: i32) -> Self {
        Expr::Literal(Literal::Int(i as i64))
    }
}

impl From<f64> for Expr {
    fn from(x: f64) -> Self {
        Expr::Literal(Literal::Float(x))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }
}

impl From<Argument> for Expr {
    fn from(a: Argument) -> Self {
        Expr::Argument(a)
    }
}

impl From<Selector> for Expr {
    fn from(s: Selector) -> Self {
        Expr::Selector(s)
    }
}

impl From<Binding> for Expr {
    fn from(b: Binding) -> Self {
        Expr::Binding(b)
    }
}

impl From<Deferred> for Expr {
    fn from(d: Deferred) -> Self {
        Expr::Deferred(d)
    }
}
