//! Decodes expression trees from JSON values.
//!
//! Combinator files (TOML or JSON) and `@var=value` invocation arguments are
//! both read into a [`serde_json::Value`] first and then decoded here.

use super::builders::{arg, fmt, split};
use super::{ArgMode, Argument, Binding, Choices, Expr, Key, Selector, Which};
use crate::error::{CombError, Result};
use serde_json::{Map, Value};

/// Interprets `raw` as JSON, falling back to the raw string.
pub fn parse_value(raw: &str) -> Expr {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| decode_expr(&value).ok())
        .unwrap_or_else(|| Expr::from(raw))
}

pub fn decode_expr(value: &Value) -> Result<Expr> {
    match value {
        Value::Null => Ok(Expr::null()),
        Value::Bool(b) => Ok(Expr::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Expr::from(i)),
            None => n
                .as_f64()
                .map(Expr::from)
                .ok_or_else(|| CombError::Malformed(format!("number out of range: {}", n))),
        },
        Value::String(s) => Ok(Expr::from(s.as_str())),
        Value::Array(items) => items.iter().map(decode_expr).collect::<Result<Vec<_>>>().map(Expr::List),
        Value::Object(map) => decode_node(map),
    }
}

fn decode_node(map: &Map<String, Value>) -> Result<Expr> {
    if map.contains_key("choices") {
        decode_selector(map)
    } else if let Some(name) = map.get("arg") {
        decode_argument(name, map)
    } else if let Some(variable) = map.get("let") {
        decode_binding(variable, map)
    } else if let Some(template) = map.get("fmt") {
        Ok(fmt(expect_str(template, "fmt")?))
    } else if let Some(line) = map.get("split") {
        split(expect_str(line, "split")?)
    } else {
        Err(CombError::Malformed(Value::Object(map.clone()).to_string()))
    }
}

fn expect_str<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| CombError::Malformed(format!("'{}' must be a string, got {}", field, value)))
}

fn decode_values(map: &Map<String, Value>) -> Result<Vec<Expr>> {
    match map.get("values") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(decode_expr).collect(),
        Some(single) => Ok(vec![decode_expr(single)?]),
    }
}

fn flag(map: &Map<String, Value>, field: &str) -> Result<bool> {
    match map.get(field) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(CombError::Malformed(format!("'{}' must be a boolean, got {}", field, other))),
    }
}

fn decode_mode(map: &Map<String, Value>) -> Result<ArgMode> {
    if let Some(mode) = map.get("mode") {
        return match expect_str(mode, "mode")? {
            "replace" => Ok(ArgMode::Replace),
            "append" => Ok(ArgMode::Append),
            "delete" => Ok(ArgMode::Delete),
            other => Err(CombError::Malformed(format!("unknown argument mode '{}'", other))),
        };
    }
    if flag(map, "append")? {
        Ok(ArgMode::Append)
    } else if flag(map, "delete")? {
        Ok(ArgMode::Delete)
    } else {
        Ok(ArgMode::Replace)
    }
}

fn decode_argument(name: &Value, map: &Map<String, Value>) -> Result<Expr> {
    Ok(Expr::Argument(Argument {
        name: expect_str(name, "arg")?.to_string(),
        values: decode_values(map)?,
        mode: decode_mode(map)?,
    }))
}

fn decode_binding(variable: &Value, map: &Map<String, Value>) -> Result<Expr> {
    let value = map
        .get("value")
        .ok_or_else(|| CombError::Malformed(format!("'let' without 'value': {}", variable)))?;
    Ok(Expr::Binding(Binding {
        variable: expect_str(variable, "let")?.to_string(),
        value: Box::new(decode_expr(value)?),
        if_undefined: flag(map, "if_undefined")?,
    }))
}

fn decode_selector(map: &Map<String, Value>) -> Result<Expr> {
    // `arg` next to `choices` wraps every choice in that argument.
    let wrap = map.get("arg").map(|name| expect_str(name, "arg")).transpose()?;
    let choice = |value: &Value| -> Result<Expr> {
        let expr = decode_expr(value)?;
        Ok(match wrap {
            Some(name) => arg(name, [expr]),
            None => expr,
        })
    };

    let choices = match map.get("choices") {
        Some(Value::Array(items)) => Choices::positional(items.iter().map(choice).collect::<Result<Vec<_>>>()?),
        Some(Value::Object(entries)) => {
            let pairs = entries
                .iter()
                .map(|(k, v)| Ok((Key::from(k.as_str()), choice(v)?)))
                .collect::<Result<Vec<_>>>()?;
            Choices::keyed(pairs)?
        }
        Some(other) => return Err(CombError::MalformedChoices(other.to_string())),
        None => return Err(CombError::MalformedChoices("nothing".to_string())),
    };

    let which = match map.get("which") {
        None => Which::All,
        Some(value) => Which::from_expr(decode_expr(value)?),
    };

    Ok(Expr::Selector(Selector { which, choices }))
}
