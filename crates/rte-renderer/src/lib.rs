//! HTML fragment renderer for the TOAST UI rich-text editor widget.
//!
//! Given a loaded [`rte_config::Config`], [`WidgetRenderer`] produces
//! self-contained HTML fragments: the asset tags of the selected extensions,
//! the widget's own script and stylesheet, and one inline initializer.
//!
//! Options are resolved by a three-tier cascade (render call, default
//! profile, global options; see [`resolver`]) and every value embedded in
//! the initializer is encoded as a script-safe JSON literal.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rte_config::{Config, ExtensionSelection, WidgetOptions};
//! use rte_renderer::WidgetRenderer;
//!
//! let renderer = WidgetRenderer::new(Arc::new(Config::default()));
//! let options = WidgetOptions {
//!     extensions: Some(ExtensionSelection::from_names(["chart"])),
//!     ..Default::default()
//! };
//!
//! let deps = renderer.render_dependencies(None).unwrap();
//! let editor = renderer.render_editor("body", "# Title", Some(&options)).unwrap();
//! assert!(deps.contains("purify.min.js"));
//! assert!(editor.contains("plugins: [toastui.Editor.plugin.chart]"));
//! ```
//!
//! # Features
//!
//! - `minijinja`: template functions (`editor_widget`, `viewer_widget`,
//!   `editor_dependencies`) for `minijinja` environments.

mod compose;
mod error;
mod html;
mod locale;
mod path;
pub mod resolver;
#[cfg(feature = "minijinja")]
mod template;
mod widget;

pub use compose::{ComposedAssets, ExtensionComposer, InitEntry};
pub use error::{PathResolveError, RenderError};
pub use html::{escape_html, script_safe_json};
pub use locale::{LocaleProvider, StaticLocale, derive_language, language_code};
pub use path::{AssetPathResolver, VersionedPathResolver, fix_path};
pub use resolver::{OptionPath, OptionResolver, Resolved, Tier};
#[cfg(feature = "minijinja")]
pub use template::register_functions;
pub use widget::WidgetRenderer;
