//! `rte check` command implementation.

use clap::Args;
use rte_config::Config;
use rte_renderer::WidgetRenderer;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Also render every fragment once with the resolved defaults.
    #[arg(long)]
    render: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a trial render
    /// fails.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config()?;

        for (label, value) in summary(&config) {
            output.field(label, &value);
        }

        if self.render {
            let renderer = global.renderer(config);
            trial_render(&renderer)?;
            output.field("Trial render", "editor, viewer, dependencies");
        }

        output.success("Configuration is valid");
        Ok(())
    }
}

/// Configuration summary as label/value pairs.
fn summary(config: &Config) -> Vec<(&'static str, String)> {
    let options = &config.options;
    let mut fields = Vec::new();

    fields.push((
        "Config file",
        config.config_path.as_ref().map_or_else(
            || "none (built-in defaults)".to_owned(),
            |path| path.display().to_string(),
        ),
    ));
    fields.push((
        "Widgets",
        if options.enable { "enabled" } else { "disabled" }.to_owned(),
    ));
    fields.push(("Base path", options.base_path.clone()));
    if options.use_shared_library {
        fields.push(("Shared library", options.shared_library_path.clone()));
    }
    fields.push((
        "Default profile",
        options
            .default_profile
            .clone()
            .unwrap_or_else(|| "none".to_owned()),
    ));
    if !config.configs.is_empty() {
        let names: Vec<&str> = config.configs.keys().map(String::as_str).collect();
        fields.push(("Profiles", names.join(", ")));
    }
    fields.push((
        "Extensions",
        config.extensions.keys().collect::<Vec<_>>().join(", "),
    ));
    fields.push((
        "Dependencies",
        config.dependencies.keys().collect::<Vec<_>>().join(", "),
    ));
    if let Some(version) = &config.assets.version {
        fields.push(("Asset version", version.clone()));
    }
    fields
}

fn trial_render(renderer: &WidgetRenderer) -> Result<(), CliError> {
    renderer.render_dependencies(None)?;
    renderer.render_editor("rte_check", "", None)?;
    renderer.render_viewer("rte_check", "", None)?;
    Ok(())
}
