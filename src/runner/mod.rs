use crate::env::Environment;
use crate::error::{CombError, Result};
use crate::eval::{Candidates, evaluate, until_error};
use crate::expr::Expr;
use crate::expr::decode::parse_value;
use crate::render::to_command;
use crate::utils::{detect_shell, run_shell_command};
use colored::*;
use log::{debug, error, info};
use regex::Regex;
use std::sync::LazyLock;

static INIT_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@\w+)=(.*)$").expect("init variable pattern is valid"));

/// Lazy stream of rendered commands, each with the environment that produced it.
pub type Commands = Box<dyn Iterator<Item = Result<(String, Environment)>>>;

/// Evaluates a root expression and turns every candidate into a command.
#[derive(Debug, Clone, Default)]
pub struct Combiner {
    init_env: Environment,
    extra_args: Vec<String>,
    pretend: bool,
    shell: Option<String>,
}

impl Combiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits invocation tokens into the pretend flag (`-n`), initial
    /// variables (`@name=value`) and extra literal tokens.
    pub fn from_args<I, S>(args: I, pretend: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut combiner = Self {
            pretend,
            ..Self::default()
        };
        for arg in args {
            let arg = arg.as_ref();
            if arg == "-n" {
                combiner.pretend = true;
                continue;
            }
            if let Some(caps) = INIT_VAR_RE.captures(arg) {
                let value = parse_value(&caps[2]);
                combiner.init_env = combiner.init_env.bind(&caps[1], value);
                continue;
            }
            combiner.extra_args.push(arg.to_string());
        }
        combiner
    }

    /// Binds `name` unless the invocation already did; invocation values win.
    pub fn with_default(mut self, name: &str, value: Expr) -> Self {
        if !self.init_env.contains(name) {
            self.init_env = self.init_env.bind(name, value);
        }
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn with_pretend(mut self, pretend: bool) -> Self {
        self.pretend = pretend;
        self
    }

    pub fn init_env(&self) -> &Environment {
        &self.init_env
    }

    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    pub fn is_pretend(&self) -> bool {
        self.pretend
    }

    /// Evaluates `expr ++ extra_args` under the initial environment.
    pub fn execute(&self, expr: &Expr) -> Result<Candidates> {
        let Expr::List(items) = expr else {
            return Err(CombError::NotAList(expr.to_string()));
        };
        let mut items = items.clone();
        items.extend(self.extra_args.iter().map(|a| Expr::from(a.as_str())));
        Ok(evaluate(Expr::List(items), self.init_env.clone()))
    }

    /// Every rendered command with the environment that produced it.
    pub fn commands(&self, expr: &Expr) -> Result<Commands> {
        let commands: Commands = Box::new(self.execute(expr)?.map(|candidate| {
            let (resolved, env) = candidate?;
            debug!("candidate {}", resolved);
            Ok((to_command(&resolved)?, env))
        }));
        Ok(until_error(commands))
    }

    /// Prints or executes every command in order.
    ///
    /// Returns the first non-zero exit status (remaining commands are not
    /// run), or 0 when everything succeeded.
    pub fn run(&self, expr: &Expr) -> anyhow::Result<i32> {
        let shell = detect_shell(self.shell.as_ref());
        for item in self.commands(expr)? {
            let (command, _) = item?;
            if self.pretend {
                println!("{}", command);
                continue;
            }

            info!("{} Executing: {}", "::".blue(), command);
            let code = run_shell_command(&command, &shell)?;
            if code != 0 {
                error!("{} '{}' -> Exit code {}", "❌".red(), command, code);
                return Ok(code);
            }
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Which;
    use crate::expr::builders::{deferred, fmt, list, sel};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;

    fn rendered(combiner: &Combiner, expr: &Expr) -> Vec<String> {
        combiner
            .commands(expr)
            .unwrap()
            .map(|item| item.unwrap().0)
            .collect()
    }

    #[test]
    fn test_from_args() {
        let combiner = Combiner::from_args(["@mode=fast", "-n", "--verbose", "@n=[1, 2]", "@bad-name=x"], false);
        assert!(combiner.is_pretend());
        assert_eq!(combiner.init_env().get("@mode"), Some(&Expr::from("fast")));
        assert_eq!(combiner.init_env().get("@n"), Some(&list([1, 2])));
        assert_eq!(combiner.extra_args(), &["--verbose".to_string(), "@bad-name=x".to_string()]);
    }

    #[test]
    fn test_with_default_does_not_override() {
        let combiner = Combiner::from_args(["@mode=fast"], false)
            .with_default("@mode", Expr::from("slow"))
            .with_default("@seed", Expr::from(7));
        assert_eq!(combiner.init_env().get("@mode"), Some(&Expr::from("fast")));
        assert_eq!(combiner.init_env().get("@seed"), Some(&Expr::from(7)));
    }

    #[test]
    fn test_not_a_list() {
        let err = Combiner::new().execute(&Expr::from("echo")).err().unwrap();
        assert_eq!(err, CombError::NotAList("echo".to_string()));
    }

    #[test]
    fn test_extra_args_appended() {
        let combiner = Combiner::from_args(["extra", "two words"], false);
        assert_eq!(rendered(&combiner, &list(["echo", "hi"])), vec!["echo hi extra 'two words'"]);
    }

    #[test]
    fn test_commands_carry_environment() {
        let combiner = Combiner::from_args(["@who=world"], false);
        let expr = list([Expr::from("echo"), fmt("hello-@who")]);
        let items: Vec<_> = combiner.commands(&expr).unwrap().map(Result::unwrap).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, "echo hello-world");
        assert_eq!(items[0].1.get("@who"), Some(&Expr::from("world")));
    }

    #[test]
    fn test_commands_end_at_later_undefined_variable() {
        let visited = Rc::new(Cell::new(0));
        let counter = visited.clone();
        let tail = deferred("tail", move |_| {
            counter.set(counter.get() + 1);
            Ok(Expr::from("done"))
        });
        let expr = list([
            Expr::from("echo"),
            sel(
                Which::All,
                vec![Expr::from("a"), Expr::from("b"), fmt("@late"), Expr::from("c")],
            ),
            tail,
        ]);

        let items: Vec<_> = Combiner::new().commands(&expr).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().0, "echo a done");
        assert_eq!(items[1].as_ref().unwrap().0, "echo b done");
        assert!(matches!(&items[2], Err(CombError::UndefinedVariable { name, .. }) if name == "@late"));
        assert_eq!(visited.get(), 2);
    }

    #[test]
    fn test_run_pretend_executes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("touched");
        let expr = list(["touch", marker.to_str().unwrap()]);
        let code = Combiner::new().with_pretend(true).run(&expr).unwrap();
        assert_eq!(code, 0);
        assert!(!marker.exists());
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        if !cfg!(unix) {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("after");
        let expr = list([
            Expr::from("sh"),
            Expr::from("-c"),
            sel(
                Which::All,
                vec![
                    Expr::from("exit 0"),
                    Expr::from("exit 3"),
                    Expr::from(format!("touch {}", marker.to_string_lossy())),
                ],
            ),
        ]);
        let code = Combiner::new().with_shell("sh").run(&expr).unwrap();
        assert_eq!(code, 3);
        assert!(!marker.exists());
    }

    #[test]
    fn test_run_success() {
        if !cfg!(unix) {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let expr = list([
            Expr::from("sh"),
            Expr::from("-c"),
            Expr::from(format!("echo hello > {}", out.to_string_lossy())),
        ]);
        assert_eq!(Combiner::new().with_shell("sh").run(&expr).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "hello");
    }

    #[test]
    fn test_run_reports_evaluation_errors() {
        let expr = list([sel("@missing", vec![Expr::from("a")])]);
        let err = Combiner::new().with_pretend(true).run(&expr).unwrap_err();
        assert!(err.to_string().contains("@missing not in"));
    }
}
