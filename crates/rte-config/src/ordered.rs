//! Insertion-ordered name mappings.
//!
//! Registries and extension selections are observable in rendered output in
//! declaration order, so they are kept as ordered vectors rather than hash
//! maps. Lookups are linear; registries hold a handful of entries.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::options::AssetOverride;

/// Ordered mapping from name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> NamedMap<V> {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether a value is registered under `name`.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert a value, replacing an existing entry in place or appending.
    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterate names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for NamedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<V> IntoIterator for NamedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Push an entry, rejecting duplicate names.
fn push_unique<V, E: de::Error>(map: &mut NamedMap<V>, name: String, value: V) -> Result<(), E> {
    if map.contains_key(&name) {
        return Err(E::custom(format!("duplicate entry `{name}`")));
    }
    map.entries.push((name, value));
    Ok(())
}

struct NamedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for NamedMapVisitor<V> {
    type Value = NamedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of named entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = NamedMap::new();
        while let Some((name, value)) = access.next_entry::<String, V>()? {
            push_unique(&mut map, name, value)?;
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for NamedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamedMapVisitor(PhantomData))
    }
}

/// Ordered selection of extensions (or dependencies) with optional
/// per-entry overrides.
///
/// Deserializes from either a list of names (`["chart", "uml"]`) or a
/// mapping of name to override (`{ chart = {}, uml = { options = {...} } }`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionSelection(NamedMap<Option<AssetOverride>>);

impl ExtensionSelection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the given names, without overrides, in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(|name| (name.into(), None)).collect())
    }

    /// Append (or replace) an entry.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, entry: Option<AssetOverride>) -> Self {
        self.0.insert(name, entry);
        self
    }

    /// Override for `name`, if the name is selected and carries one.
    pub fn get(&self, name: &str) -> Option<&AssetOverride> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate selected names with their overrides, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&AssetOverride>)> {
        self.0.iter().map(|(name, entry)| (name, entry.as_ref()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct SelectionVisitor;

impl<'de> Visitor<'de> for SelectionVisitor {
    type Value = ExtensionSelection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of names or a table of name to options")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = NamedMap::new();
        while let Some(name) = access.next_element::<String>()? {
            push_unique(&mut map, name, None)?;
        }
        Ok(ExtensionSelection(map))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
        NamedMapVisitor(PhantomData)
            .visit_map(access)
            .map(ExtensionSelection)
    }
}

impl<'de> Deserialize<'de> for ExtensionSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SelectionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_map_preserves_insertion_order() {
        let mut map = NamedMap::new();
        map.insert("uml", 1);
        map.insert("chart", 2);
        map.insert("colorSyntax", 3);
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["uml", "chart", "colorSyntax"]
        );
    }

    #[test]
    fn test_named_map_insert_replaces_in_place() {
        let mut map = NamedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_selection_from_json_map_keeps_order() {
        let json = r#"{"tableMergedCell": null, "chart": {"options": {"minWidth": 100}}}"#;
        let selection: ExtensionSelection = serde_json::from_str(json).unwrap();
        assert_eq!(
            selection.names().collect::<Vec<_>>(),
            vec!["tableMergedCell", "chart"]
        );
        assert!(selection.get("tableMergedCell").is_none());
        let chart = selection.get("chart").unwrap();
        assert_eq!(chart.options.as_ref().unwrap()["minWidth"], 100);
    }

    #[test]
    fn test_selection_from_json_list() {
        let selection: ExtensionSelection = serde_json::from_str(r#"["chart", "uml"]"#).unwrap();
        assert_eq!(selection.names().collect::<Vec<_>>(), vec!["chart", "uml"]);
        assert!(selection.get("chart").is_none());
    }

    #[test]
    fn test_selection_rejects_duplicates() {
        let result: Result<ExtensionSelection, _> = serde_json::from_str(r#"["chart", "chart"]"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("duplicate entry `chart`"));
    }

    #[test]
    fn test_selection_builder() {
        let selection = ExtensionSelection::new()
            .with("chart", None)
            .with("uml", Some(AssetOverride::default()));
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("uml"));
        assert!(selection.get("uml").is_some());
    }
}
