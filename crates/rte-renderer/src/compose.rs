//! Extension and dependency asset composition.

use std::collections::HashSet;
use std::fmt;

use rte_config::{AssetGroup, AssetList, AssetOverride, Config, ExtensionSelection};

use crate::error::RenderError;
use crate::html::{module_script_tag, script_safe_json, script_tag, style_tag};
use crate::path::{AssetPathResolver, fix_path};
use crate::resolver::OptionResolver;

/// One element of the initializer's `plugins` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitEntry {
    /// Plugin expression without options.
    Bare(String),
    /// Plugin expression with its options as an encoded JSON literal.
    WithOptions { plugin: String, options: String },
}

impl fmt::Display for InitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(plugin) => f.write_str(plugin),
            Self::WithOptions { plugin, options } => write!(f, "[{plugin}, {options}]"),
        }
    }
}

/// Tags and initializer entries produced for a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedAssets {
    pub js_html: String,
    pub css_html: String,
    pub init_entries: Vec<InitEntry>,
}

impl ComposedAssets {
    /// All script tags followed by all stylesheet tags.
    #[must_use]
    pub fn html(&self) -> String {
        format!("{}{}", self.js_html, self.css_html)
    }

    /// Comma-joined initializer entries.
    #[must_use]
    pub fn plugin_list(&self) -> String {
        self.init_entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Turns a selection of registry entries into asset tags.
pub struct ExtensionComposer<'a> {
    config: &'a Config,
    resolver: OptionResolver<'a>,
    paths: Option<&'a dyn AssetPathResolver>,
}

impl<'a> ExtensionComposer<'a> {
    #[must_use]
    pub fn new(config: &'a Config, paths: Option<&'a dyn AssetPathResolver>) -> Self {
        Self {
            config,
            resolver: OptionResolver::new(config),
            paths,
        }
    }

    /// Compose `selection` in order, skipping names in `excluded`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExtension`/`UnknownDependency` for names no tier
    /// knows about, and propagates path resolution and encoding errors.
    pub fn compose(
        &self,
        group: AssetGroup,
        selection: &'a ExtensionSelection,
        excluded: &HashSet<&str>,
    ) -> Result<ComposedAssets, RenderError> {
        let mut composed = ComposedAssets::default();

        for (name, overrides) in selection.iter() {
            if excluded.contains(name) {
                tracing::trace!(group = group.key(), name, "Skipping excluded entry");
                continue;
            }
            if !self.resolver.is_known(group, name, overrides, true) {
                return Err(match group {
                    AssetGroup::Extensions => RenderError::UnknownExtension(name.to_owned()),
                    AssetGroup::Dependencies => RenderError::UnknownDependency(name.to_owned()),
                });
            }

            for list in [AssetList::ModuleJs, AssetList::Js, AssetList::Css] {
                for path in self.asset_paths(group, name, list, overrides)? {
                    let url = fix_path(self.paths, path)?;
                    match list {
                        AssetList::ModuleJs => composed.js_html.push_str(&module_script_tag(&url)),
                        AssetList::Js => composed.js_html.push_str(&script_tag(&url)),
                        AssetList::Css => composed.css_html.push_str(&style_tag(&url)),
                    }
                }
            }

            composed.init_entries.push(self.init_entry(group, name, overrides)?);
        }

        Ok(composed)
    }

    /// Non-null paths of one list; a list unset at every tier is empty.
    fn asset_paths(
        &self,
        group: AssetGroup,
        name: &str,
        list: AssetList,
        overrides: Option<&'a AssetOverride>,
    ) -> Result<impl Iterator<Item = &'a str>, RenderError> {
        let resolved: &[Option<String>] = match self
            .resolver
            .resolve_under_parent(group, name, list, overrides, true)
        {
            Ok(hit) => hit.value,
            Err(err) if err.is_missing_option() => &[],
            Err(err) => return Err(err),
        };
        Ok(resolved.iter().filter_map(Option::as_deref))
    }

    fn init_entry(
        &self,
        group: AssetGroup,
        name: &str,
        overrides: Option<&AssetOverride>,
    ) -> Result<InitEntry, RenderError> {
        let plugin = self
            .config
            .registry(group)
            .get(name)
            .and_then(|descriptor| descriptor.plugin.clone())
            .unwrap_or_else(|| name.to_owned());

        Ok(match overrides.and_then(|o| o.options.as_ref()) {
            Some(options) => InitEntry::WithOptions {
                plugin,
                options: script_safe_json(options)?,
            },
            None => InitEntry::Bare(plugin),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rte_config::{AssetDescriptor, NamedMap, WidgetOptions};

    fn paths(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|p| Some((*p).to_owned())).collect()
    }

    fn config() -> Config {
        let mut config = Config::default();
        let mut extensions = NamedMap::new();
        extensions.insert(
            "chart",
            AssetDescriptor {
                js_paths: paths(&["chart.js"]),
                css_paths: paths(&["chart.css"]),
                ..Default::default()
            },
        );
        extensions.insert(
            "tableMergedCell",
            AssetDescriptor {
                js_paths: vec![Some("table.js".to_owned()), None],
                plugin: Some("toastui.Editor.plugin.tableMergedCell".to_owned()),
                ..Default::default()
            },
        );
        extensions.insert(
            "mermaid",
            AssetDescriptor {
                module_js_paths: paths(&["mermaid.mjs"]),
                ..Default::default()
            },
        );
        config.extensions = extensions;
        config
    }

    fn compose(
        config: &Config,
        selection: &ExtensionSelection,
    ) -> Result<ComposedAssets, RenderError> {
        ExtensionComposer::new(config, None).compose(
            AssetGroup::Extensions,
            selection,
            &HashSet::new(),
        )
    }

    #[test]
    fn test_compose_chart() {
        let config = config();
        let selection = ExtensionSelection::from_names(["chart"]);

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(composed.js_html, r#"<script src="chart.js"></script>"#);
        assert_eq!(composed.css_html, r#"<link rel="stylesheet" href="chart.css" />"#);
        assert_eq!(composed.plugin_list(), "chart");
    }

    #[test]
    fn test_compose_preserves_selection_order() {
        let config = config();
        let forward = ExtensionSelection::from_names(["chart", "tableMergedCell"]);
        let reverse = ExtensionSelection::from_names(["tableMergedCell", "chart"]);

        let forward = compose(&config, &forward).unwrap();
        let reverse = compose(&config, &reverse).unwrap();

        assert_eq!(
            forward.js_html,
            r#"<script src="chart.js"></script><script src="table.js"></script>"#
        );
        assert_eq!(
            reverse.js_html,
            r#"<script src="table.js"></script><script src="chart.js"></script>"#
        );
        assert_eq!(
            forward.plugin_list(),
            "chart,toastui.Editor.plugin.tableMergedCell"
        );
        assert_eq!(
            reverse.plugin_list(),
            "toastui.Editor.plugin.tableMergedCell,chart"
        );
    }

    #[test]
    fn test_compose_module_scripts() {
        let config = config();
        let selection = ExtensionSelection::new()
            .with("chart", None)
            .with("mermaid", None);

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(
            composed.js_html,
            r#"<script src="chart.js"></script><script type="module" src="mermaid.mjs"></script>"#
        );
        assert!(composed.html().ends_with(r#"<link rel="stylesheet" href="chart.css" />"#));
    }

    #[test]
    fn test_compose_with_options() {
        let config = config();
        let mut options = serde_json::Map::new();
        options.insert("minWidth".to_owned(), serde_json::json!(100));
        let selection = ExtensionSelection::new().with(
            "chart",
            Some(AssetOverride {
                options: Some(options),
                ..Default::default()
            }),
        );

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(composed.plugin_list(), r#"[chart, {"minWidth":100}]"#);
        // options alone keep the registry paths
        assert_eq!(composed.js_html, r#"<script src="chart.js"></script>"#);
    }

    #[test]
    fn test_compose_override_paths() {
        let config = config();
        let selection = ExtensionSelection::new().with(
            "chart",
            Some(AssetOverride {
                css_paths: Some(Vec::new()),
                ..Default::default()
            }),
        );

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(composed.js_html, r#"<script src="chart.js"></script>"#);
        assert_eq!(composed.css_html, "");
    }

    #[test]
    fn test_compose_unregistered_with_paths() {
        let config = config();
        let selection = ExtensionSelection::new().with(
            "sparkles",
            Some(AssetOverride {
                js_paths: Some(paths(&["sparkles.js"])),
                ..Default::default()
            }),
        );

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(composed.js_html, r#"<script src="sparkles.js"></script>"#);
        assert_eq!(composed.plugin_list(), "sparkles");
    }

    #[test]
    fn test_compose_unknown_extension() {
        let config = config();
        let selection = ExtensionSelection::from_names(["chart", "sparkles"]);

        let err = compose(&config, &selection).unwrap_err();

        assert!(matches!(err, RenderError::UnknownExtension(ref name) if name == "sparkles"));
        assert!(err.is_missing_option());
    }

    #[test]
    fn test_compose_unknown_dependency() {
        let config = config();
        let selection = ExtensionSelection::from_names(["leftpad"]);

        let err = ExtensionComposer::new(&config, None)
            .compose(AssetGroup::Dependencies, &selection, &HashSet::new())
            .unwrap_err();

        assert!(matches!(err, RenderError::UnknownDependency(ref name) if name == "leftpad"));
    }

    #[test]
    fn test_compose_excluded() {
        let config = config();
        let selection = ExtensionSelection::from_names(["chart", "tableMergedCell"]);
        let excluded = HashSet::from(["tableMergedCell"]);

        let composed = ExtensionComposer::new(&config, None)
            .compose(AssetGroup::Extensions, &selection, &excluded)
            .unwrap();

        assert_eq!(composed.plugin_list(), "chart");
    }

    #[test]
    fn test_compose_profile_entry_paths() {
        let mut config = config();
        config.configs.insert(
            "basic".to_owned(),
            WidgetOptions {
                extensions: Some(ExtensionSelection::new().with(
                    "chart",
                    Some(AssetOverride {
                        js_paths: Some(paths(&["profile-chart.js"])),
                        ..Default::default()
                    }),
                )),
                ..Default::default()
            },
        );
        config.options.default_profile = Some("basic".to_owned());
        let selection = ExtensionSelection::from_names(["chart"]);

        let composed = compose(&config, &selection).unwrap();

        assert_eq!(composed.js_html, r#"<script src="profile-chart.js"></script>"#);
    }

    #[test]
    fn test_init_entry_display() {
        assert_eq!(InitEntry::Bare("chart".to_owned()).to_string(), "chart");
        assert_eq!(
            InitEntry::WithOptions {
                plugin: "uml".to_owned(),
                options: "{}".to_owned()
            }
            .to_string(),
            "[uml, {}]"
        );
    }
}
