use std::collections::HashMap;
use std::sync::LazyLock;

use minijinja::{Environment, UndefinedBehavior, Value};

use crate::error::ActionError;

/// Shared minijinja environment with strict undefined behavior.
static JINJA_ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
});

/// Render one template source with the given variables.
///
/// Variable values are inserted literally; template syntax inside them is
/// never evaluated.
pub fn render_template(
    name: &str,
    source: &str,
    vars: HashMap<String, Value>,
) -> Result<String, ActionError> {
    let env = &*JINJA_ENV;
    let ctx = Value::from_iter(vars);

    let tmpl = env
        .template_from_str(source)
        .map_err(|e| ActionError::Other(format!("failed to parse {name} template: {e}")))?;

    tmpl.render(ctx)
        .map_err(|e| ActionError::Other(format!("failed to render {name} template: {e}")))
}

/// Build a variables map from `(name, value)` pairs.
pub fn vars<I, V>(pairs: I) -> HashMap<String, Value>
where
    I: IntoIterator<Item = (&'static str, V)>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_variables() {
        let out = render_template(
            "greeting",
            "Issue #{{ number }}: {{ title }}",
            vars([("number", Value::from(42)), ("title", Value::from("Crash"))]),
        )
        .unwrap();
        assert_eq!(out, "Issue #42: Crash");
    }

    #[test]
    fn test_render_strict_undefined_fails() {
        let err = render_template("broken", "{{ undefined_var }}", HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("failed to render broken template"));
    }

    #[test]
    fn test_render_syntax_error_fails() {
        let err = render_template("broken", "{% if %}", HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("failed to parse broken template"));
    }

    #[test]
    fn test_template_injection_safe() {
        let out = render_template(
            "title",
            "Title: {{ title }}",
            vars([("title", "{{ secrets.TOKEN }} {% for i in range(9) %}x{% endfor %}")]),
        )
        .unwrap();
        assert_eq!(
            out,
            "Title: {{ secrets.TOKEN }} {% for i in range(9) %}x{% endfor %}"
        );
    }

    #[test]
    fn test_no_html_escaping() {
        let out = render_template("body", "{{ body }}", vars([("body", "<b>a & b</b>")])).unwrap();
        assert_eq!(out, "<b>a & b</b>");
    }
}
