//! Asset URL resolution.
//!
//! The host application owns the mapping from a relative asset path to a
//! public URL (asset packages, CDN prefixes, cache-busting versions). The
//! renderer only needs the [`AssetPathResolver`] contract plus one fix-up
//! of its own: directory paths are never versioned.

use rte_config::AssetsConfig;

use crate::error::{PathResolveError, RenderError};

/// Maps a raw relative asset path to a public URL.
pub trait AssetPathResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> Result<String, PathResolveError>;
}

/// Resolve `raw` through `resolver`, or return it verbatim without one.
///
/// When `raw` denotes a directory (trailing `/`), any query string the
/// resolver appended is stripped.
pub fn fix_path(
    resolver: Option<&dyn AssetPathResolver>,
    raw: &str,
) -> Result<String, RenderError> {
    let Some(resolver) = resolver else {
        return Ok(raw.to_owned());
    };

    let mut url = resolver
        .resolve(raw)
        .map_err(|source| RenderError::PathResolution {
            path: raw.to_owned(),
            source,
        })?;

    if raw.ends_with('/')
        && let Some(query) = url.find('?')
    {
        url.truncate(query);
    }

    Ok(url)
}

/// Prefixes relative paths with a base URL and appends a version token.
///
/// Absolute URLs (`http://`, `https://`, `//`) pass through unchanged.
///
/// # Example
///
/// ```
/// use rte_renderer::{AssetPathResolver, VersionedPathResolver};
///
/// let resolver = VersionedPathResolver::new(Some("/static"), Some("v3"));
/// assert_eq!(resolver.resolve("editor.js").unwrap(), "/static/editor.js?v3");
/// ```
#[derive(Debug, Clone)]
pub struct VersionedPathResolver {
    base_url: Option<String>,
    version: Option<String>,
    format: String,
}

impl VersionedPathResolver {
    /// Create a resolver using the `%s?%s` version format.
    #[must_use]
    pub fn new(base_url: Option<&str>, version: Option<&str>) -> Self {
        Self {
            base_url: base_url.map(str::to_owned),
            version: version.map(str::to_owned),
            format: "%s?%s".to_owned(),
        }
    }

    /// Build from the `[assets]` configuration section.
    #[must_use]
    pub fn from_config(assets: &AssetsConfig) -> Self {
        Self {
            base_url: assets.base_url.clone(),
            version: assets.version.clone(),
            format: assets.version_format.clone(),
        }
    }

    /// Use a custom version format (`%s` for the path, then the version).
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    fn apply_version(&self, path: &str) -> String {
        let Some(version) = &self.version else {
            return path.to_owned();
        };
        match self.format.split("%s").collect::<Vec<_>>().as_slice() {
            [head, middle, tail] => format!("{head}{path}{middle}{version}{tail}"),
            _ => format!("{path}?{version}"),
        }
    }
}

impl AssetPathResolver for VersionedPathResolver {
    fn resolve(&self, raw: &str) -> Result<String, PathResolveError> {
        if is_absolute_url(raw) {
            return Ok(raw.to_owned());
        }

        let versioned = self.apply_version(raw);
        Ok(match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                versioned.trim_start_matches('/')
            ),
            None => versioned,
        })
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingResolver;

    impl AssetPathResolver for FailingResolver {
        fn resolve(&self, raw: &str) -> Result<String, PathResolveError> {
            Err(format!("no package for {raw}").into())
        }
    }

    #[test]
    fn test_fix_path_without_resolver_is_verbatim() {
        assert_eq!(fix_path(None, "a/b.js?x=1").unwrap(), "a/b.js?x=1");
    }

    #[test]
    fn test_fix_path_keeps_query_on_files() {
        let resolver = VersionedPathResolver::new(None, Some("v2"));
        assert_eq!(
            fix_path(Some(&resolver), "bundles/editor.js").unwrap(),
            "bundles/editor.js?v2"
        );
    }

    #[test]
    fn test_fix_path_strips_query_on_directories() {
        let resolver = VersionedPathResolver::new(Some("/static"), Some("v2"));
        assert_eq!(
            fix_path(Some(&resolver), "bundles/tuieditor/").unwrap(),
            "/static/bundles/tuieditor/"
        );
    }

    #[test]
    fn test_fix_path_propagates_resolver_error() {
        let err = fix_path(Some(&FailingResolver), "editor.js").unwrap_err();
        assert!(matches!(err, RenderError::PathResolution { ref path, .. } if path == "editor.js"));
        assert!(err.to_string().contains("no package for editor.js"));
    }

    #[test]
    fn test_versioned_resolver_base_url_join() {
        let resolver = VersionedPathResolver::new(Some("https://cdn.example.com/"), None);
        assert_eq!(
            resolver.resolve("/bundles/editor.js").unwrap(),
            "https://cdn.example.com/bundles/editor.js"
        );
    }

    #[test]
    fn test_versioned_resolver_root_base_url() {
        let resolver = VersionedPathResolver::new(Some("/"), None);
        assert_eq!(resolver.resolve("editor.js").unwrap(), "/editor.js");
    }

    #[test]
    fn test_versioned_resolver_custom_format() {
        let resolver =
            VersionedPathResolver::new(None, Some("abc123")).with_format("%s?version=%s");
        assert_eq!(
            resolver.resolve("editor.css").unwrap(),
            "editor.css?version=abc123"
        );
    }

    #[test]
    fn test_versioned_resolver_absolute_url_untouched() {
        let resolver = VersionedPathResolver::new(Some("/static"), Some("v1"));
        assert_eq!(
            resolver.resolve("https://unpkg.com/chart.js").unwrap(),
            "https://unpkg.com/chart.js"
        );
    }

    #[test]
    fn test_versioned_resolver_from_config() {
        let assets = AssetsConfig {
            base_url: Some("/assets".to_owned()),
            version: Some("7".to_owned()),
            version_format: "%s?v=%s".to_owned(),
        };
        let resolver = VersionedPathResolver::from_config(&assets);
        assert_eq!(resolver.resolve("a.js").unwrap(), "/assets/a.js?v=7");
    }
}
