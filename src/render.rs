use crate::error::Result;
use crate::expr::{Expr, Literal};
use crate::resolve::{flatten, resolve_arguments};

/// Shell-quotes each token and joins them with single spaces.
pub fn render(tokens: &[Literal]) -> String {
    shell_words::join(tokens.iter().map(Literal::to_string))
}

/// Flatten, resolve arguments, render.
pub fn to_command(expr: &Expr) -> Result<String> {
    let tokens = resolve_arguments(&flatten(expr))?;
    Ok(render(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::builders::list;

    #[test]
    fn test_render_plain() {
        assert_eq!(to_command(&list(["echo", "hello"])).unwrap(), "echo hello");
    }

    #[test]
    fn test_render_quotes_spaces() {
        assert_eq!(to_command(&list(["echo", "hello world"])).unwrap(), "echo 'hello world'");
    }

    #[test]
    fn test_render_scalars() {
        let tokens = vec![
            Literal::Int(3),
            Literal::Float(0.5),
            Literal::Bool(true),
            Literal::Null,
            Literal::Str(String::new()),
        ];
        assert_eq!(render(&tokens), "3 0.5 true null ''");
    }

    #[test]
    fn test_render_integral_float() {
        assert_eq!(render(&[Literal::Float(1.0), Literal::Float(-2.0)]), "1.0 -2.0");
    }
}
