//! Cascading option lookup.
//!
//! Every option is resolved against an ordered list of at most three
//! candidate sources and the first one that sets it wins:
//!
//! 1. [`Tier::Instance`]: options passed with the render call
//! 2. [`Tier::Profile`]: the profile named by `options.default_profile`
//! 3. [`Tier::Global`]: global options or the registry
//!
//! Profiles never reference other profiles, so the chain is fixed at three
//! tiers and cannot cycle.

use std::fmt;

use rte_config::{AssetGroup, AssetList, AssetOverride, Config, WidgetOptions};

use crate::error::RenderError;

/// Source of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Instance,
    Profile,
    Global,
}

/// Logical address of an option, used for diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionPath<'p> {
    pub parent: Option<&'p str>,
    pub name: &'p str,
    pub leaf: Option<&'p str>,
}

impl<'p> OptionPath<'p> {
    /// Top-level option.
    #[must_use]
    pub const fn new(name: &'p str) -> Self {
        Self {
            parent: None,
            name,
            leaf: None,
        }
    }

    /// Option scoped under a parent group (e.g. `extensions.chart.js_paths`).
    #[must_use]
    pub const fn under(parent: &'p str, name: &'p str, leaf: &'p str) -> Self {
        Self {
            parent: Some(parent),
            name,
            leaf: Some(leaf),
        }
    }

    /// Error reporting this option as unset at every tier.
    #[must_use]
    pub fn missing(&self) -> RenderError {
        let option = match self.parent {
            Some(parent) => format!("{parent}.{}", self.name),
            None => self.name.to_owned(),
        };
        RenderError::MissingOption {
            option,
            leaf: self.leaf.map(str::to_owned),
        }
    }
}

impl fmt::Display for OptionPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{parent}.")?;
        }
        f.write_str(self.name)?;
        if let Some(leaf) = self.leaf {
            write!(f, ".{leaf}")?;
        }
        Ok(())
    }
}

/// A resolved value and the tier it came from.
#[derive(Debug, PartialEq)]
pub struct Resolved<'a, T: ?Sized> {
    pub tier: Tier,
    pub value: &'a T,
}

impl<T: ?Sized> Clone for Resolved<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Resolved<'_, T> {}

/// Return the first candidate that holds a value.
///
/// # Errors
///
/// Returns `RenderError::MissingOption` for `path` when every candidate is
/// empty.
pub fn first_hit<'a, T, I>(
    path: OptionPath<'_>,
    candidates: I,
) -> Result<Resolved<'a, T>, RenderError>
where
    T: ?Sized,
    I: IntoIterator<Item = (Tier, Option<&'a T>)>,
{
    candidates
        .into_iter()
        .find_map(|(tier, value)| value.map(|value| Resolved { tier, value }))
        .inspect(|hit| tracing::trace!(option = %path, tier = ?hit.tier, "Resolved option"))
        .ok_or_else(|| path.missing())
}

/// Resolves options against a configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'a> {
    config: &'a Config,
}

impl<'a> OptionResolver<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Profile tier, when fallback is requested and a default profile exists.
    fn profile(&self, use_profile_fallback: bool) -> Option<&'a WidgetOptions> {
        if use_profile_fallback {
            self.config.default_profile()
        } else {
            None
        }
    }

    /// Resolve a widget option.
    ///
    /// `pick` reads the option from an instance or profile options object;
    /// `global` is the global-tier value.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::MissingOption` when no tier sets the option.
    pub fn resolve<T, F>(
        &self,
        path: OptionPath<'_>,
        overrides: Option<&'a WidgetOptions>,
        use_profile_fallback: bool,
        pick: F,
        global: Option<&'a T>,
    ) -> Result<Resolved<'a, T>, RenderError>
    where
        T: ?Sized,
        F: Fn(&'a WidgetOptions) -> Option<&'a T>,
    {
        let profile = self.profile(use_profile_fallback);
        first_hit(
            path,
            [
                (Tier::Instance, overrides.and_then(&pick)),
                (Tier::Profile, profile.and_then(&pick)),
                (Tier::Global, global),
            ],
        )
    }

    /// Resolve an asset path list of a registry entry
    /// (`<group>.<name>.<list>`).
    ///
    /// The instance tier is the entry's override in the render call's
    /// selection, the profile tier the same entry in the profile's
    /// selection, the global tier the registry.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::MissingOption` when no tier sets the list.
    pub fn resolve_under_parent(
        &self,
        group: AssetGroup,
        name: &str,
        list: AssetList,
        overrides: Option<&'a AssetOverride>,
        use_profile_fallback: bool,
    ) -> Result<Resolved<'a, [Option<String>]>, RenderError> {
        let path = OptionPath::under(group.key(), name, list.key());
        first_hit(
            path,
            [
                (Tier::Instance, overrides.and_then(|entry| entry.paths(list))),
                (
                    Tier::Profile,
                    self.profile_entry(group, name, use_profile_fallback)
                        .and_then(|entry| entry.paths(list)),
                ),
                (
                    Tier::Global,
                    self.config
                        .registry(group)
                        .get(name)
                        .map(|descriptor| descriptor.paths(list)),
                ),
            ],
        )
    }

    /// Whether `name` is known at any tier: registered globally, or given
    /// asset paths by the instance override or the profile.
    #[must_use]
    pub fn is_known(
        &self,
        group: AssetGroup,
        name: &str,
        overrides: Option<&AssetOverride>,
        use_profile_fallback: bool,
    ) -> bool {
        self.config.registry(group).contains_key(name)
            || overrides.is_some_and(AssetOverride::has_paths)
            || self
                .profile_entry(group, name, use_profile_fallback)
                .is_some_and(AssetOverride::has_paths)
    }

    fn profile_entry(
        &self,
        group: AssetGroup,
        name: &str,
        use_profile_fallback: bool,
    ) -> Option<&'a AssetOverride> {
        self.profile(use_profile_fallback)?
            .selection(group)?
            .get(name)
    }
}
