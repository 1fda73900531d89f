//! Render error types.

/// Error returned by an [`AssetPathResolver`](crate::AssetPathResolver).
pub type PathResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Error returned when a widget fragment cannot be rendered.
///
/// Rendering is atomic: on error no partial HTML is produced.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Option not set at any resolution tier.
    #[error("Option `{}` is not set at any configuration tier", dotted(.option, .leaf.as_deref()))]
    MissingOption {
        /// Option name, prefixed by its parent group when scoped
        /// (e.g. "`extensions.chart`").
        option: String,
        /// Key inside the option (e.g. "`js_paths`").
        leaf: Option<String>,
    },
    /// Selected extension is not registered.
    #[error("Unknown extension `{0}`")]
    UnknownExtension(String),
    /// Selected dependency is not registered.
    #[error("Unknown dependency `{0}`")]
    UnknownDependency(String),
    /// The asset path resolver failed.
    #[error("Failed to resolve asset path `{path}`: {source}")]
    PathResolution {
        path: String,
        #[source]
        source: PathResolveError,
    },
    /// Widget id is not usable as a script identifier.
    #[error("Invalid widget id `{0}`: expected [A-Za-z_$][A-Za-z0-9_$]*")]
    InvalidAnchor(String),
    /// JSON encoding of an embedded value failed.
    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RenderError {
    /// Whether this error means the resolution chain was exhausted.
    ///
    /// Unknown extensions and dependencies count as missing options.
    #[must_use]
    pub fn is_missing_option(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. } | Self::UnknownExtension(_) | Self::UnknownDependency(_)
        )
    }
}

fn dotted(option: &str, leaf: Option<&str>) -> String {
    match leaf {
        Some(leaf) => format!("{option}.{leaf}"),
        None => option.to_owned(),
    }
}
