//! Built-in defaults matching the layout of the bundled editor assets.

use serde_json::{Value, json};

use crate::options::AssetDescriptor;
use crate::ordered::NamedMap;

/// Directory holding the editor bundle and its `node_modules`.
pub(crate) const BASE_PATH: &str = "bundles/tuieditor/";

/// Path of a file inside the bundled `node_modules`.
pub(crate) fn bundle(path: &str) -> String {
    format!("{BASE_PATH}node_modules/{path}")
}

fn paths(items: &[&str]) -> Vec<Option<String>> {
    items.iter().map(|path| Some(bundle(path))).collect()
}

fn descriptor(js: &[&str], css: &[&str], plugin: &str, viewer: bool) -> AssetDescriptor {
    AssetDescriptor {
        js_paths: paths(js),
        css_paths: paths(css),
        module_js_paths: Vec::new(),
        plugin: Some(format!("toastui.Editor.plugin.{plugin}")),
        viewer,
    }
}

/// Built-in extension registry.
pub(crate) fn extensions() -> NamedMap<AssetDescriptor> {
    let mut map = NamedMap::new();
    map.insert(
        "chart",
        descriptor(
            &[
                "@toast-ui/chart/dist/toastui-chart.min.js",
                "@toast-ui/editor-plugin-chart/dist/toastui-editor-plugin-chart.js",
            ],
            &["@toast-ui/chart/dist/toastui-chart.min.css"],
            "chart",
            true,
        ),
    );
    map.insert(
        "codeSyntaxHighlight",
        descriptor(
            &["@toast-ui/editor-plugin-code-syntax-highlight/dist/toastui-editor-plugin-code-syntax-highlight.js"],
            &["@toast-ui/editor-plugin-code-syntax-highlight/dist/toastui-editor-plugin-code-syntax-highlight.css"],
            "codeSyntaxHighlight",
            false,
        ),
    );
    map.insert(
        "colorSyntax",
        descriptor(
            &["@toast-ui/editor-plugin-color-syntax/dist/toastui-editor-plugin-color-syntax.js"],
            &["@toast-ui/editor-plugin-color-syntax/dist/toastui-editor-plugin-color-syntax.css"],
            "colorSyntax",
            false,
        ),
    );
    map.insert(
        "tableMergedCell",
        descriptor(
            &["@toast-ui/editor-plugin-table-merged-cell/dist/toastui-editor-plugin-table-merged-cell.js"],
            &["@toast-ui/editor-plugin-table-merged-cell/dist/toastui-editor-plugin-table-merged-cell.css"],
            "tableMergedCell",
            true,
        ),
    );
    map.insert(
        "uml",
        descriptor(
            &["@toast-ui/editor-plugin-uml/dist/toastui-editor-plugin-uml.js"],
            &[],
            "uml",
            true,
        ),
    );
    map
}

/// Built-in dependency registry.
pub(crate) fn dependencies() -> NamedMap<AssetDescriptor> {
    let script = |js: &str| AssetDescriptor {
        js_paths: paths(&[js]),
        ..AssetDescriptor::default()
    };
    let module = |js: &str| AssetDescriptor {
        module_js_paths: paths(&[js]),
        ..AssetDescriptor::default()
    };

    let mut map = NamedMap::new();
    map.insert("dompurify", script("dompurify/dist/purify.min.js"));
    map.insert("orderedmap", module("orderedmap/dist/index.js"));
    map.insert(
        "plantuml-encoder",
        script("plantuml-encoder/dist/plantuml-encoder.min.js"),
    );
    map.insert(
        "plantuml-decoder",
        script("plantuml-encoder/dist/plantuml-decoder.min.js"),
    );
    map.insert("prismjs", script("prismjs/prism.js"));
    map.insert(
        "prosemirror",
        AssetDescriptor {
            module_js_paths: vec![Some(format!("{BASE_PATH}prosemirror-bundle.js"))],
            ..AssetDescriptor::default()
        },
    );
    map.insert(
        "tui-color-picker",
        AssetDescriptor {
            js_paths: paths(&["tui-color-picker/dist/tui-color-picker.min.js"]),
            css_paths: paths(&["tui-color-picker/dist/tui-color-picker.min.css"]),
            ..AssetDescriptor::default()
        },
    );
    map.insert("w3c-keyname", module("w3c-keyname/index.js"));
    map
}

/// Default toolbar layout of the editor.
pub(crate) fn toolbar_items() -> Value {
    json!([
        ["heading", "bold", "italic", "strike"],
        ["hr", "quote"],
        ["ul", "ol", "task", "indent", "outdent"],
        ["table", "image", "link"],
        ["code", "codeblock"]
    ])
}
