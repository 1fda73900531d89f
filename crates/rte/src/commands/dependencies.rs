//! `rte dependencies` command implementation.

use clap::Args;
use rte_config::ExtensionSelection;

use super::{GlobalArgs, parse_json_arg};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the dependencies command.
#[derive(Args)]
pub(crate) struct DependenciesArgs {
    /// Dependencies to include, as a JSON list of names or an object of
    /// per-dependency overrides (default: all registered).
    #[arg(long)]
    select: Option<String>,
}

impl DependenciesArgs {
    /// Execute the dependencies command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, the selection or rendering fails.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let renderer = global.renderer(global.load_config()?);
        if !renderer.is_enabled() {
            tracing::warn!("Widgets are disabled, nothing rendered");
            Output::new().warning("Widgets are disabled (options.enable = false)");
            return Ok(());
        }

        let selection: Option<ExtensionSelection> = self
            .select
            .as_deref()
            .map(|json| parse_json_arg(json, "--select"))
            .transpose()?;

        let html = renderer.render_dependencies(selection.as_ref())?;
        Output::html(&html)?;
        Ok(())
    }
}
