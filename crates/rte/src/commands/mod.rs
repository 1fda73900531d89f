//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod dependencies;
pub(crate) mod template;
pub(crate) mod widget;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use rte_config::{CliSettings, Config};
use rte_renderer::{StaticLocale, VersionedPathResolver, WidgetRenderer};
use serde::de::DeserializeOwned;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use dependencies::DependenciesArgs;
pub(crate) use template::TemplateArgs;
pub(crate) use widget::{WidgetArgs, WidgetKind};

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover rte.toml).
    #[arg(short, long, global = true, env = "RTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request locale used to pick the widget language (e.g. de-de).
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Widget language used when no other source supplies one
    /// (overrides options.fallback_locale).
    #[arg(long, global = true)]
    pub fallback_locale: Option<String>,

    /// Profile to fall back to (overrides options.default_profile).
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Asset version token appended to URLs (overrides assets.version).
    #[arg(long, global = true)]
    pub asset_version: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the configuration with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            default_profile: self.profile.clone(),
            fallback_locale: self.fallback_locale.clone(),
            asset_version: self.asset_version.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(
            path = ?config.config_path,
            profile = ?config.options.default_profile,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Build a renderer over `config`.
    ///
    /// Asset URLs go through a [`VersionedPathResolver`] when `[assets]`
    /// sets a base URL or version.
    pub(crate) fn renderer(&self, config: Config) -> WidgetRenderer {
        let versioned = (config.assets.base_url.is_some() || config.assets.version.is_some())
            .then(|| VersionedPathResolver::from_config(&config.assets));

        let mut renderer = WidgetRenderer::new(Arc::new(config));
        if let Some(resolver) = versioned {
            renderer = renderer.with_path_resolver(Arc::new(resolver));
        }
        if let Some(locale) = &self.locale {
            renderer = renderer.with_locale_provider(Arc::new(StaticLocale(locale.clone())));
        }
        renderer
    }
}

/// Read a file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Parse a JSON command-line argument.
pub(crate) fn parse_json_arg<T: DeserializeOwned>(
    value: &str,
    flag: &str,
) -> Result<T, CliError> {
    serde_json::from_str(value)
        .map_err(|e| CliError::Validation(format!("Invalid JSON in {flag}: {e}")))
}
