use crate::expr::Expr;
use crate::expr::decode::decode_expr;
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A combinator file: the root command tree plus optional settings.
#[derive(Debug, Deserialize)]
pub struct CombinatorFile {
    pub command: Value,
    pub settings: Option<Settings>,
    /// Initial variables. Values given on the command line take precedence.
    #[serde(default)]
    pub vars: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub name: Option<String>,
    pub description: Option<String>,
    pub shell: Option<String>,
}

impl CombinatorFile {
    pub fn command_expr(&self) -> Result<Expr> {
        decode_expr(&self.command).context("Invalid 'command' tree")
    }

    pub fn var_exprs(&self) -> Result<Vec<(String, Expr)>> {
        self.vars
            .iter()
            .map(|(name, value)| {
                let expr = decode_expr(value).with_context(|| format!("Invalid value for variable '{}'", name))?;
                Ok((name.clone(), expr))
            })
            .collect()
    }

    pub fn shell(&self) -> Option<&String> {
        self.settings.as_ref().and_then(|s| s.shell.as_ref())
    }
}

/// Loads a TOML combinator file, or JSON when the extension is `.json`.
pub fn load_config(path: &Path) -> Result<CombinatorFile> {
    if !path.exists() {
        bail!("❌ Critical: {:?} not found.", path);
    }
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: CombinatorFile = if is_json {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?
    } else {
        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?
    };

    if config.command.is_null() {
        bail!("❌ Configuration Error: 'command' must not be null in {:?}.", path);
    }

    Ok(config)
}
