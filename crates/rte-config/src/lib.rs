//! Configuration management for RTE.
//!
//! Parses `rte.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The loaded
//! [`Config`] is the immutable tree every render call resolves against:
//! global options, named profiles (`[configs.<name>]`), and the extension
//! and dependency registries.
//!
//! Registry entries not mentioned in the file keep their built-in values;
//! entries that are mentioned override only the fields they set.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `options.base_path`
//! - `assets.base_url`
//! - `assets.version`

mod defaults;
mod expand;
mod options;
mod ordered;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use options::{
    AssetDescriptor, AssetGroup, AssetList, AssetOverride, AssetsConfig, GlobalOptions,
    WidgetOptions,
};
pub use ordered::{ExtensionSelection, NamedMap};

use options::AssetDescriptorRaw;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the default profile.
    pub default_profile: Option<String>,
    /// Override the fallback locale.
    pub fallback_locale: Option<String>,
    /// Override the asset version token.
    pub asset_version: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rte.toml";

/// Widget configuration tree.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global options.
    pub options: GlobalOptions,
    /// Named profiles.
    pub configs: BTreeMap<String, WidgetOptions>,
    /// Asset URL versioning.
    pub assets: AssetsConfig,
    /// Extension registry entries as parsed from TOML.
    #[serde(rename = "extensions")]
    extensions_raw: NamedMap<AssetDescriptorRaw>,
    /// Dependency registry entries as parsed from TOML.
    #[serde(rename = "dependencies")]
    dependencies_raw: NamedMap<AssetDescriptorRaw>,

    /// Resolved extension registry (built-ins merged with file entries).
    #[serde(skip)]
    pub extensions: NamedMap<AssetDescriptor>,
    /// Resolved dependency registry (built-ins merged with file entries).
    #[serde(skip)]
    pub dependencies: NamedMap<AssetDescriptor>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: GlobalOptions::default(),
            configs: BTreeMap::new(),
            assets: AssetsConfig::default(),
            extensions_raw: NamedMap::new(),
            dependencies_raw: NamedMap::new(),
            extensions: defaults::extensions(),
            dependencies: defaults::dependencies(),
            config_path: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`assets.base_url`").
        field: String,
        /// Error message (e.g., "${`CDN_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rte.toml` in current directory and parents,
    /// falling back to the built-in defaults.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse, expand and resolve configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_registries();
        config.validate()?;
        Ok(config)
    }

    /// Profile selected by `options.default_profile`, if set and defined.
    #[must_use]
    pub fn default_profile(&self) -> Option<&WidgetOptions> {
        self.options
            .default_profile
            .as_deref()
            .and_then(|name| self.configs.get(name))
    }

    /// Registry for the given group.
    #[must_use]
    pub fn registry(&self, group: AssetGroup) -> &NamedMap<AssetDescriptor> {
        match group {
            AssetGroup::Extensions => &self.extensions,
            AssetGroup::Dependencies => &self.dependencies,
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(profile) = &settings.default_profile {
            self.options.default_profile = Some(profile.clone());
        }
        if let Some(locale) = &settings.fallback_locale {
            self.options.fallback_locale = Some(locale.clone());
        }
        if let Some(version) = &settings.asset_version {
            self.assets.version = Some(version.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve_registries();
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] and [`Config::from_toml`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_paths()?;
        self.validate_profiles()?;
        self.validate_selection()?;
        self.validate_assets()?;
        Ok(())
    }

    /// Validate core asset paths.
    fn validate_paths(&self) -> Result<(), ConfigError> {
        let options = &self.options;
        require_non_empty(&options.base_path, "options.base_path")?;
        require_non_empty(&options.editor_js_path, "options.editor_js_path")?;
        require_non_empty(&options.viewer_js_path, "options.viewer_js_path")?;
        require_non_empty(&options.editor_css_path, "options.editor_css_path")?;
        require_non_empty(&options.viewer_css_path, "options.viewer_css_path")?;
        if options.use_shared_library {
            require_non_empty(&options.shared_library_path, "options.shared_library_path")?;
        }
        Ok(())
    }

    /// The default profile, when set, must be defined under `[configs]`.
    fn validate_profiles(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.options.default_profile
            && !self.configs.contains_key(name)
        {
            return Err(ConfigError::Validation(format!(
                "options.default_profile refers to undefined profile `{name}`"
            )));
        }
        Ok(())
    }

    /// Globally enabled extensions must exist in the registry.
    fn validate_selection(&self) -> Result<(), ConfigError> {
        if let Some(name) = self
            .options
            .extensions
            .names()
            .find(|name| !self.extensions.contains_key(name))
        {
            return Err(ConfigError::Validation(format!(
                "options.extensions refers to unknown extension `{name}`"
            )));
        }
        Ok(())
    }

    /// Validate asset versioning settings.
    fn validate_assets(&self) -> Result<(), ConfigError> {
        if self.assets.version_format.matches("%s").count() != 2 {
            return Err(ConfigError::Validation(
                "assets.version_format must contain exactly two %s placeholders".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.options.base_path = expand::expand_env(&self.options.base_path, "options.base_path")?;

        if let Some(ref url) = self.assets.base_url {
            self.assets.base_url = Some(expand::expand_env(url, "assets.base_url")?);
        }
        if let Some(ref version) = self.assets.version {
            self.assets.version = Some(expand::expand_env(version, "assets.version")?);
        }

        Ok(())
    }

    /// Merge parsed registry entries over the built-in registries.
    fn resolve_registries(&mut self) {
        self.extensions = merge_registry(
            defaults::extensions(),
            std::mem::take(&mut self.extensions_raw),
        );
        self.dependencies = merge_registry(
            defaults::dependencies(),
            std::mem::take(&mut self.dependencies_raw),
        );
    }
}

/// Apply raw entries on top of `base`; new names are appended in file order.
fn merge_registry(
    mut base: NamedMap<AssetDescriptor>,
    raw: NamedMap<AssetDescriptorRaw>,
) -> NamedMap<AssetDescriptor> {
    for (name, entry) in raw {
        let current = base.get(&name).cloned().unwrap_or_default();
        base.insert(name, entry.apply_to(current));
    }
    base
}
