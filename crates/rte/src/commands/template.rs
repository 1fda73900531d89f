//! `rte template` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use minijinja::Environment;
use rte_renderer::{WidgetRenderer, register_functions};
use serde_json::Value;

use super::{GlobalArgs, parse_json_arg, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the template command.
#[derive(Args)]
pub(crate) struct TemplateArgs {
    /// Template file, or `-` for stdin.
    template: PathBuf,

    /// Template context as a JSON object.
    #[arg(long)]
    context: Option<String>,
}

impl TemplateArgs {
    /// Execute the template command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or rendering fails.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let renderer = global.renderer(global.load_config()?);
        let source = read_input(&self.template)?;
        let context: Value = match self.context.as_deref() {
            Some(json) => parse_json_arg(json, "--context")?,
            None => Value::Object(serde_json::Map::new()),
        };

        let html = render_template(renderer, &source, &context)?;
        Output::html(&html)?;
        Ok(())
    }
}

fn render_template(
    renderer: WidgetRenderer,
    source: &str,
    context: &Value,
) -> Result<String, CliError> {
    let mut env = Environment::new();
    register_functions(&mut env, Arc::new(renderer));
    Ok(env.render_str(source, context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rte_config::Config;

    #[test]
    fn test_render_template_with_context() {
        let renderer = WidgetRenderer::new(Arc::new(Config::default()));
        let context = serde_json::json!({"page": {"content": "# Hi"}});

        let html = render_template(
            renderer,
            r#"<div id="body"></div>{{ editor_widget("body", page.content) }}"#,
            &context,
        )
        .unwrap();

        assert!(html.starts_with(r#"<div id="body"></div><script src="#));
        assert!(html.contains(r##"initialValue: "# Hi","##));
    }

    #[test]
    fn test_render_template_error() {
        let renderer = WidgetRenderer::new(Arc::new(Config::default()));

        let err = render_template(
            renderer,
            r#"{{ editor_widget("body", "", {"extensions": ["sparkles"]}) }}"#,
            &serde_json::json!({}),
        )
        .unwrap_err();

        assert!(err.to_string().contains("Unknown extension `sparkles`"));
    }
}
