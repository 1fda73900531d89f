//! Template functions for `minijinja` environments.
//!
//! ```jinja
//! {{ editor_dependencies() }}
//! <div id="body"></div>
//! {{ editor_widget("body", page.content, {"height": "500px"}) }}
//! ```

use std::sync::Arc;

use minijinja::{Environment, Error, ErrorKind, Value};
use rte_config::{ExtensionSelection, WidgetOptions};
use serde::de::DeserializeOwned;

use crate::error::RenderError;
use crate::widget::WidgetRenderer;

/// Register `editor_widget`, `viewer_widget` and `editor_dependencies`.
///
/// Each function returns markup that is not auto-escaped.
pub fn register_functions(env: &mut Environment<'_>, renderer: Arc<WidgetRenderer>) {
    let editor = Arc::clone(&renderer);
    env.add_function(
        "editor_widget",
        move |id: String, content: String, options: Option<Value>| -> Result<Value, Error> {
            let options = from_template::<WidgetOptions>(options, "editor_widget")?;
            editor
                .render_editor(&id, &content, options.as_ref())
                .map(Value::from_safe_string)
                .map_err(|e| render_failed("editor_widget", e))
        },
    );

    let viewer = Arc::clone(&renderer);
    env.add_function(
        "viewer_widget",
        move |id: String, content: String, options: Option<Value>| -> Result<Value, Error> {
            let options = from_template::<WidgetOptions>(options, "viewer_widget")?;
            viewer
                .render_viewer(&id, &content, options.as_ref())
                .map(Value::from_safe_string)
                .map_err(|e| render_failed("viewer_widget", e))
        },
    );

    env.add_function(
        "editor_dependencies",
        move |selection: Option<Value>| -> Result<Value, Error> {
            let selection =
                from_template::<ExtensionSelection>(selection, "editor_dependencies")?;
            renderer
                .render_dependencies(selection.as_ref())
                .map(Value::from_safe_string)
                .map_err(|e| render_failed("editor_dependencies", e))
        },
    );
}

/// Convert an optional template argument; `none` and undefined mean absent.
fn from_template<T: DeserializeOwned>(
    value: Option<Value>,
    function: &str,
) -> Result<Option<T>, Error> {
    let Some(value) = value.filter(|v| !v.is_none() && !v.is_undefined()) else {
        return Ok(None);
    };
    serde_json::to_value(&value)
        .and_then(serde_json::from_value)
        .map(Some)
        .map_err(|e| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("{function}: invalid options argument"),
            )
            .with_source(e)
        })
}

fn render_failed(function: &str, err: RenderError) -> Error {
    Error::new(ErrorKind::InvalidOperation, format!("{function}: {err}")).with_source(err)
}
