//! Configuration tiers: global options, per-profile/per-instance options
//! and the asset registries.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ordered::ExtensionSelection;

/// Registry group an asset descriptor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetGroup {
    /// Editor plugins, contributing assets and an initializer entry.
    Extensions,
    /// Third-party libraries loaded ahead of the editor.
    Dependencies,
}

impl AssetGroup {
    /// Configuration key of the group.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Extensions => "extensions",
            Self::Dependencies => "dependencies",
        }
    }
}

/// Kind of asset path list in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetList {
    /// ES module scripts (`<script type="module">`).
    ModuleJs,
    /// Classic scripts.
    Js,
    /// Stylesheets.
    Css,
}

impl AssetList {
    /// Configuration key of the list.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ModuleJs => "module_js_paths",
            Self::Js => "js_paths",
            Self::Css => "css_paths",
        }
    }
}

/// Global options: the last resolution tier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalOptions {
    /// Whether widget rendering is enabled at all.
    pub enable: bool,
    /// Prefix dependency output with the shared library script.
    #[serde(alias = "jquery")]
    pub use_shared_library: bool,
    /// Directory holding the editor bundle.
    pub base_path: String,
    pub editor_js_path: String,
    pub viewer_js_path: String,
    pub editor_css_path: String,
    pub viewer_css_path: String,
    /// Extra stylesheet for rendered contents; omitted when unset.
    pub contents_css_path: Option<String>,
    /// Default widget theme.
    pub theme_name: String,
    #[serde(alias = "jquery_path")]
    pub shared_library_path: String,
    /// Profile consulted between instance options and these globals.
    #[serde(alias = "default_config")]
    pub default_profile: Option<String>,
    /// Language used when neither the instance nor the request has one.
    pub fallback_locale: Option<String>,
    pub initial_edit_type: String,
    pub preview_style: String,
    pub height: String,
    pub toolbar_items: Option<Value>,
    /// Extensions enabled when no profile or instance selects any.
    pub extensions: ExtensionSelection,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            enable: true,
            use_shared_library: false,
            base_path: crate::defaults::BASE_PATH.to_owned(),
            editor_js_path: crate::defaults::bundle("@toast-ui/editor/dist/toastui-editor.js"),
            viewer_js_path: crate::defaults::bundle(
                "@toast-ui/editor/dist/toastui-editor-viewer.js",
            ),
            editor_css_path: crate::defaults::bundle("@toast-ui/editor/dist/toastui-editor.css"),
            viewer_css_path: crate::defaults::bundle(
                "@toast-ui/editor/dist/toastui-editor-viewer.css",
            ),
            contents_css_path: None,
            theme_name: "light".to_owned(),
            shared_library_path: crate::defaults::bundle("jquery/dist/jquery.min.js"),
            default_profile: None,
            fallback_locale: Some("en".to_owned()),
            initial_edit_type: "markdown".to_owned(),
            preview_style: "vertical".to_owned(),
            height: "300px".to_owned(),
            toolbar_items: Some(crate::defaults::toolbar_items()),
            extensions: ExtensionSelection::new(),
        }
    }
}

/// Partial widget options, used both for named profiles and for the
/// options passed with a single render call.
///
/// Keys are accepted in `snake_case` and in the widget's own `camelCase`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    pub language: Option<String>,
    pub locale: Option<String>,
    #[serde(alias = "initialEditType")]
    pub initial_edit_type: Option<String>,
    #[serde(alias = "previewStyle")]
    pub preview_style: Option<String>,
    pub height: Option<String>,
    pub theme: Option<String>,
    #[serde(alias = "toolbarItems")]
    pub toolbar_items: Option<Value>,
    #[serde(alias = "exts", alias = "plugins")]
    pub extensions: Option<ExtensionSelection>,
    pub dependencies: Option<ExtensionSelection>,
}

impl WidgetOptions {
    /// Selection for the given registry group.
    #[must_use]
    pub fn selection(&self, group: AssetGroup) -> Option<&ExtensionSelection> {
        match group {
            AssetGroup::Extensions => self.extensions.as_ref(),
            AssetGroup::Dependencies => self.dependencies.as_ref(),
        }
    }
}

/// Per-entry override inside an extension or dependency selection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetOverride {
    /// Plugin options passed to the widget initializer.
    pub options: Option<Map<String, Value>>,
    #[serde(alias = "jsPaths")]
    pub js_paths: Option<Vec<Option<String>>>,
    #[serde(alias = "cssPaths")]
    pub css_paths: Option<Vec<Option<String>>>,
    #[serde(alias = "moduleJsPaths")]
    pub module_js_paths: Option<Vec<Option<String>>>,
}

impl AssetOverride {
    /// Path list of the given kind, if this override sets it.
    #[must_use]
    pub fn paths(&self, list: AssetList) -> Option<&[Option<String>]> {
        match list {
            AssetList::ModuleJs => self.module_js_paths.as_deref(),
            AssetList::Js => self.js_paths.as_deref(),
            AssetList::Css => self.css_paths.as_deref(),
        }
    }

    /// Whether any path list is set.
    #[must_use]
    pub fn has_paths(&self) -> bool {
        [AssetList::ModuleJs, AssetList::Js, AssetList::Css]
            .into_iter()
            .any(|list| self.paths(list).is_some())
    }
}

/// Registry entry for an extension or dependency.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    pub js_paths: Vec<Option<String>>,
    pub css_paths: Vec<Option<String>>,
    pub module_js_paths: Vec<Option<String>>,
    /// JavaScript expression naming the plugin in the initializer.
    /// Defaults to the registry name.
    pub plugin: Option<String>,
    /// Whether the extension is loaded by read-only viewers.
    pub viewer: bool,
}

impl Default for AssetDescriptor {
    fn default() -> Self {
        Self {
            js_paths: Vec::new(),
            css_paths: Vec::new(),
            module_js_paths: Vec::new(),
            plugin: None,
            viewer: true,
        }
    }
}

impl AssetDescriptor {
    /// Path list of the given kind.
    #[must_use]
    pub fn paths(&self, list: AssetList) -> &[Option<String>] {
        match list {
            AssetList::ModuleJs => &self.module_js_paths,
            AssetList::Js => &self.js_paths,
            AssetList::Css => &self.css_paths,
        }
    }
}

/// Raw registry entry as parsed from TOML; unset fields keep the built-in
/// value of the entry with the same name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AssetDescriptorRaw {
    #[serde(alias = "js_path", deserialize_with = "one_or_many")]
    js_paths: Option<Vec<Option<String>>>,
    #[serde(alias = "css_path", deserialize_with = "one_or_many")]
    css_paths: Option<Vec<Option<String>>>,
    #[serde(alias = "module_js_path", deserialize_with = "one_or_many")]
    module_js_paths: Option<Vec<Option<String>>>,
    plugin: Option<String>,
    viewer: Option<bool>,
}

impl AssetDescriptorRaw {
    /// Apply the set fields on top of `base`.
    pub(crate) fn apply_to(self, mut base: AssetDescriptor) -> AssetDescriptor {
        if let Some(paths) = self.js_paths {
            base.js_paths = paths;
        }
        if let Some(paths) = self.css_paths {
            base.css_paths = paths;
        }
        if let Some(paths) = self.module_js_paths {
            base.module_js_paths = paths;
        }
        if self.plugin.is_some() {
            base.plugin = self.plugin;
        }
        if let Some(viewer) = self.viewer {
            base.viewer = viewer;
        }
        base
    }
}

/// Accept a single path string as a one-element list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<Option<String>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<Option<String>>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|paths| match paths {
        OneOrMany::One(path) => vec![Some(path)],
        OneOrMany::Many(paths) => paths,
    }))
}

/// Built-in asset URL versioning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Prefix for relative asset paths (e.g. a CDN origin).
    pub base_url: Option<String>,
    /// Version token appended to file URLs.
    pub version: Option<String>,
    /// Format with two `%s` placeholders: path, then version.
    pub version_format: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            version: None,
            version_format: "%s?%s".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_options_accept_camel_case() {
        let options: WidgetOptions = serde_json::from_str(
            r#"{"initialEditType": "wysiwyg", "previewStyle": "tab", "toolbarItems": [["bold"]]}"#,
        )
        .unwrap();
        assert_eq!(options.initial_edit_type.as_deref(), Some("wysiwyg"));
        assert_eq!(options.preview_style.as_deref(), Some("tab"));
        assert_eq!(options.toolbar_items, Some(serde_json::json!([["bold"]])));
    }

    #[test]
    fn test_widget_options_selection_by_group() {
        let options: WidgetOptions =
            serde_json::from_str(r#"{"extensions": ["chart"], "dependencies": ["dompurify"]}"#)
                .unwrap();
        assert!(
            options
                .selection(AssetGroup::Extensions)
                .unwrap()
                .contains("chart")
        );
        assert!(
            options
                .selection(AssetGroup::Dependencies)
                .unwrap()
                .contains("dompurify")
        );
    }

    #[test]
    fn test_raw_descriptor_applies_set_fields_only() {
        let raw: AssetDescriptorRaw = toml::from_str(r#"js_path = "custom.js""#).unwrap();
        let base = AssetDescriptor {
            css_paths: vec![Some("chart.css".to_owned())],
            plugin: Some("toastui.Editor.plugin.chart".to_owned()),
            ..AssetDescriptor::default()
        };
        let merged = raw.apply_to(base);
        assert_eq!(merged.js_paths, vec![Some("custom.js".to_owned())]);
        assert_eq!(merged.css_paths, vec![Some("chart.css".to_owned())]);
        assert_eq!(merged.plugin.as_deref(), Some("toastui.Editor.plugin.chart"));
        assert!(merged.viewer);
    }

    #[test]
    fn test_override_has_paths() {
        let mut entry = AssetOverride::default();
        assert!(!entry.has_paths());
        entry.css_paths = Some(Vec::new());
        assert!(entry.has_paths());
        assert_eq!(entry.paths(AssetList::Css), Some(&[][..]));
        assert_eq!(entry.paths(AssetList::Js), None);
    }
}
