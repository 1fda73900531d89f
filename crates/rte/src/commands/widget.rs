//! `rte editor` and `rte viewer` command implementation.

use std::path::PathBuf;

use clap::Args;
use rte_config::WidgetOptions;
use rte_renderer::WidgetRenderer;

use super::{GlobalArgs, parse_json_arg, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Which widget to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidgetKind {
    Editor,
    Viewer,
}

/// Arguments for the editor and viewer commands.
#[derive(Args)]
pub(crate) struct WidgetArgs {
    /// Element id the widget binds to (also its script variable name).
    id: String,

    /// Initial content file, or `-` for stdin (default: empty).
    #[arg(long)]
    content: Option<PathBuf>,

    /// Instance options as a JSON object (e.g. '{"height": "500px"}').
    #[arg(long)]
    options: Option<String>,
}

impl WidgetArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or rendering fails.
    pub(crate) fn execute(self, global: &GlobalArgs, kind: WidgetKind) -> Result<(), CliError> {
        let renderer = global.renderer(global.load_config()?);
        let html = self.render(&renderer, kind)?;

        match html {
            Some(html) => Output::html(&html)?,
            None => {
                tracing::warn!(id = %self.id, "Widgets are disabled, nothing rendered");
                Output::new().warning("Widgets are disabled (options.enable = false)");
            }
        }
        Ok(())
    }

    /// Render the widget, or `None` when widgets are disabled.
    fn render(
        &self,
        renderer: &WidgetRenderer,
        kind: WidgetKind,
    ) -> Result<Option<String>, CliError> {
        if !renderer.is_enabled() {
            return Ok(None);
        }

        let options: Option<WidgetOptions> = self
            .options
            .as_deref()
            .map(|json| parse_json_arg(json, "--options"))
            .transpose()?;
        let content = match &self.content {
            Some(path) => read_input(path)?,
            None => String::new(),
        };

        let html = match kind {
            WidgetKind::Editor => renderer.render_editor(&self.id, &content, options.as_ref())?,
            WidgetKind::Viewer => renderer.render_viewer(&self.id, &content, options.as_ref())?,
        };
        Ok(Some(html))
    }
}
