//! Editor, viewer and dependency fragment rendering.
//!
//! Each render call is a pure function of its arguments and the shared
//! configuration snapshot: identical calls produce byte-identical HTML, and
//! any error aborts the call without partial output.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use rte_config::{AssetGroup, Config, ExtensionSelection, WidgetOptions};

use crate::compose::{ComposedAssets, ExtensionComposer};
use crate::error::RenderError;
use crate::html::{self, script_safe_json};
use crate::locale::{LocaleProvider, derive_language};
use crate::path::{AssetPathResolver, fix_path};
use crate::resolver::{OptionPath, OptionResolver};

/// Renders widget HTML fragments against a configuration snapshot.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rte_config::Config;
/// use rte_renderer::WidgetRenderer;
///
/// let renderer = WidgetRenderer::new(Arc::new(Config::default()));
/// let html = renderer.render_editor("body", "# Hello", None).unwrap();
/// assert!(html.contains("new toastui.Editor("));
/// ```
#[derive(Clone)]
pub struct WidgetRenderer {
    config: Arc<Config>,
    paths: Option<Arc<dyn AssetPathResolver>>,
    locale: Option<Arc<dyn LocaleProvider>>,
}

impl WidgetRenderer {
    /// Create a renderer without a path resolver or locale provider.
    #[must_use]
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            paths: None,
            locale: None,
        }
    }

    /// Resolve asset paths through `resolver`.
    #[must_use]
    pub fn with_path_resolver(mut self, resolver: Arc<dyn AssetPathResolver>) -> Self {
        self.paths = Some(resolver);
        self
    }

    /// Read the request locale from `provider`.
    #[must_use]
    pub fn with_locale_provider(mut self, provider: Arc<dyn LocaleProvider>) -> Self {
        self.locale = Some(provider);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether widgets are enabled globally.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.options.enable
    }

    /// Render an editable widget bound to the element `#id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAnchor` for an unusable `id`, `MissingOption` (or one
    /// of its specializations) when an option resolves nowhere, and
    /// propagates path resolution and encoding errors.
    pub fn render_editor(
        &self,
        id: &str,
        content: &str,
        options: Option<&WidgetOptions>,
    ) -> Result<String, RenderError> {
        validate_anchor(id)?;
        let global = &self.config.options;
        let resolver = OptionResolver::new(&self.config);

        let language = self.language(options)?;
        let selection = resolver.resolve(
            OptionPath::new("extensions"),
            options,
            true,
            |o| o.extensions.as_ref(),
            Some(&global.extensions),
        )?;
        let initial_edit_type = resolver.resolve(
            OptionPath::new("initial_edit_type"),
            options,
            true,
            |o| o.initial_edit_type.as_deref(),
            Some(global.initial_edit_type.as_str()),
        )?;
        let preview_style = resolver.resolve(
            OptionPath::new("preview_style"),
            options,
            true,
            |o| o.preview_style.as_deref(),
            Some(global.preview_style.as_str()),
        )?;
        let height = resolver.resolve(
            OptionPath::new("height"),
            options,
            true,
            |o| o.height.as_deref(),
            Some(global.height.as_str()),
        )?;
        let theme = resolver.resolve(
            OptionPath::new("theme"),
            options,
            true,
            |o| o.theme.as_deref(),
            Some(global.theme_name.as_str()),
        )?;
        let toolbar_items = resolver.resolve(
            OptionPath::new("toolbar_items"),
            options,
            true,
            |o| o.toolbar_items.as_ref(),
            global.toolbar_items.as_ref(),
        )?;

        let composed = self.composer().compose(
            AssetGroup::Extensions,
            selection.value,
            &HashSet::new(),
        )?;

        let js_url = self.editor_js_url(None)?;
        let css_url = self.editor_css_url(None)?;
        let mut html = self.asset_tags(&composed, &js_url, &css_url)?;
        let _ = write!(
            html,
            concat!(
                r#"<script class="code-js">var {id} = new toastui.Editor({{"#,
                r##"el: document.querySelector("#{id}"),"##,
                "initialEditType: {edit_type},",
                "previewStyle: {preview_style},",
                "height: {height},",
                "language: {language},",
                "initialValue: {content},",
                "plugins: [{plugins}],",
                "theme: {theme},",
                "toolbarItems: {toolbar_items}",
                "}});</script>"
            ),
            id = id,
            edit_type = script_safe_json(initial_edit_type.value)?,
            preview_style = script_safe_json(preview_style.value)?,
            height = script_safe_json(height.value)?,
            language = script_safe_json(&language)?,
            content = script_safe_json(content)?,
            plugins = composed.plugin_list(),
            theme = script_safe_json(theme.value)?,
            toolbar_items = script_safe_json(toolbar_items.value)?,
        );

        tracing::debug!(
            id,
            plugins = composed.init_entries.len(),
            language = %language,
            "Rendered editor widget"
        );
        Ok(html)
    }

    /// Render a read-only viewer bound to the element `#id`.
    ///
    /// Extensions registered with `viewer = false` are left out.
    ///
    /// # Errors
    ///
    /// Same as [`render_editor`](Self::render_editor).
    pub fn render_viewer(
        &self,
        id: &str,
        content: &str,
        options: Option<&WidgetOptions>,
    ) -> Result<String, RenderError> {
        validate_anchor(id)?;
        let global = &self.config.options;
        let resolver = OptionResolver::new(&self.config);

        let selection = resolver.resolve(
            OptionPath::new("extensions"),
            options,
            true,
            |o| o.extensions.as_ref(),
            Some(&global.extensions),
        )?;
        let height = resolver.resolve(
            OptionPath::new("height"),
            options,
            true,
            |o| o.height.as_deref(),
            Some(global.height.as_str()),
        )?;

        let excluded: HashSet<&str> = self
            .config
            .extensions
            .iter()
            .filter(|(_, descriptor)| !descriptor.viewer)
            .map(|(name, _)| name)
            .collect();
        let composed = self
            .composer()
            .compose(AssetGroup::Extensions, selection.value, &excluded)?;

        let js_url = self.viewer_js_url(None)?;
        let css_url = self.viewer_css_url(None)?;
        let mut html = self.asset_tags(&composed, &js_url, &css_url)?;
        let _ = write!(
            html,
            concat!(
                r#"<script class="code-js">var {id} = toastui.Editor.factory({{"#,
                r##"el: document.querySelector("#{id}"),"##,
                "viewer: true,",
                "height: {height},",
                "initialValue: {content},",
                "plugins: [{plugins}]",
                "}});</script>"
            ),
            id = id,
            height = script_safe_json(height.value)?,
            content = script_safe_json(content)?,
            plugins = composed.plugin_list(),
        );

        tracing::debug!(id, plugins = composed.init_entries.len(), "Rendered viewer widget");
        Ok(html)
    }

    /// Render the script and stylesheet tags of third-party dependencies.
    ///
    /// Without a selection every registered dependency is included in
    /// registry order. The shared library script comes first when enabled.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDependency` for unregistered names without paths and
    /// propagates path resolution errors.
    pub fn render_dependencies(
        &self,
        selection: Option<&ExtensionSelection>,
    ) -> Result<String, RenderError> {
        let all;
        let selection = if let Some(selection) = selection {
            selection
        } else {
            all = ExtensionSelection::from_names(self.config.dependencies.keys());
            &all
        };

        let mut html = String::new();
        if self.config.options.use_shared_library {
            html.push_str(&html::script_tag(&self.shared_library_url(None)?));
        }

        let composed = self
            .composer()
            .compose(AssetGroup::Dependencies, selection, &HashSet::new())?;
        html.push_str(&composed.html());

        tracing::debug!(dependencies = composed.init_entries.len(), "Rendered widget dependencies");
        Ok(html)
    }

    /// Base path of the bundled assets, resolved as a directory.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn render_base_path(&self) -> Result<String, RenderError> {
        self.asset_url(&self.config.options.base_path)
    }

    /// Public URL of a raw asset path.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn asset_url(&self, path: &str) -> Result<String, RenderError> {
        fix_path(self.paths.as_deref(), path)
    }

    /// `<script>` tag for a raw asset path.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn script_tag(&self, path: &str) -> Result<String, RenderError> {
        Ok(html::script_tag(&self.asset_url(path)?))
    }

    /// `<script type="module">` tag for a raw asset path.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn module_script_tag(&self, path: &str) -> Result<String, RenderError> {
        Ok(html::module_script_tag(&self.asset_url(path)?))
    }

    /// Stylesheet `<link>` tag for a raw asset path.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn style_tag(&self, path: &str) -> Result<String, RenderError> {
        Ok(html::style_tag(&self.asset_url(path)?))
    }

    /// URL of the editor script, or of `path` when given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn editor_js_url(&self, path: Option<&str>) -> Result<String, RenderError> {
        self.asset_url(path.unwrap_or(&self.config.options.editor_js_path))
    }

    /// URL of the editor stylesheet, or of `path` when given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn editor_css_url(&self, path: Option<&str>) -> Result<String, RenderError> {
        self.asset_url(path.unwrap_or(&self.config.options.editor_css_path))
    }

    /// URL of the viewer script, or of `path` when given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn viewer_js_url(&self, path: Option<&str>) -> Result<String, RenderError> {
        self.asset_url(path.unwrap_or(&self.config.options.viewer_js_path))
    }

    /// URL of the viewer stylesheet, or of `path` when given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn viewer_css_url(&self, path: Option<&str>) -> Result<String, RenderError> {
        self.asset_url(path.unwrap_or(&self.config.options.viewer_css_path))
    }

    /// URL of the content stylesheet, if one is configured or given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn contents_css_url(&self, path: Option<&str>) -> Result<Option<String>, RenderError> {
        path.or(self.config.options.contents_css_path.as_deref())
            .map(|path| self.asset_url(path))
            .transpose()
    }

    /// URL of the shared library script, or of `path` when given.
    ///
    /// # Errors
    ///
    /// Propagates path resolution errors.
    pub fn shared_library_url(&self, path: Option<&str>) -> Result<String, RenderError> {
        self.asset_url(path.unwrap_or(&self.config.options.shared_library_path))
    }

    fn composer(&self) -> ExtensionComposer<'_> {
        ExtensionComposer::new(&self.config, self.paths.as_deref())
    }

    fn language(&self, options: Option<&WidgetOptions>) -> Result<String, RenderError> {
        let request_locale = self.locale.as_ref().and_then(|p| p.current_locale());
        derive_language(
            options,
            request_locale.as_deref(),
            self.config.options.fallback_locale.as_deref(),
        )
        .ok_or_else(|| OptionPath::new("locale").missing())
    }

    /// Extension tags, widget script, widget stylesheet, content stylesheet.
    fn asset_tags(
        &self,
        composed: &ComposedAssets,
        js_url: &str,
        css_url: &str,
    ) -> Result<String, RenderError> {
        let mut html = composed.html();
        html.push_str(&html::script_tag(js_url));
        html.push_str(&html::style_tag(css_url));
        if let Some(url) = self.contents_css_url(None)? {
            html.push_str(&html::style_tag(&url));
        }
        Ok(html)
    }
}

/// The id names both a script variable and the `#id` element.
fn validate_anchor(id: &str) -> Result<(), RenderError> {
    let mut chars = id.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidAnchor(id.to_owned()))
    }
}
