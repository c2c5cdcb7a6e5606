//! Ordered keyword bags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rc::RcValue;

/// Keyword arguments as supplied by a caller, in insertion order.
///
/// Resolution consumes the keywords it understands; whatever is left is
/// passed through to the rendering collaborator untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kwargs(IndexMap<String, RcValue>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RcValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RcValue>) -> Option<RcValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&RcValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a keyword, keeping the order of the others
    pub fn pop(&mut self, key: &str) -> Option<RcValue> {
        self.0.shift_remove(key)
    }

    /// Remove every spelling in `aliases` and return the first non-null one.
    ///
    /// Priority follows the order of `aliases`, not the order the caller
    /// supplied the keywords in.
    pub fn take_first(&mut self, aliases: &[&str]) -> Option<(String, RcValue)> {
        let mut found = None;
        for alias in aliases {
            match self.pop(alias) {
                Some(value) if found.is_none() && !value.is_null() => {
                    found = Some((alias.to_string(), value));
                }
                _ => {}
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RcValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> IndexMap<String, RcValue> {
        self.0
    }
}

impl<K: Into<String>, V: Into<RcValue>> FromIterator<(K, V)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<RcValue>, const N: usize> From<[(K, V); N]> for Kwargs {
    fn from(items: [(K, V); N]) -> Self {
        items.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_first_uses_alias_priority() {
        let mut kwargs = Kwargs::new()
            .with("locator", vec![4.0, 5.0, 6.0])
            .with("ticks", vec![1.0, 2.0, 3.0])
            .with("extend", "both");
        let (alias, value) = kwargs.take_first(&["ticks", "locator"]).unwrap();
        assert_eq!(alias, "ticks");
        assert_eq!(value, RcValue::from(vec![1.0, 2.0, 3.0]));
        // Both spellings are consumed
        assert_eq!(kwargs.keys().collect::<Vec<_>>(), vec!["extend"]);
    }

    #[test]
    fn test_take_first_skips_null() {
        let mut kwargs = Kwargs::from([("c", RcValue::Null), ("color", RcValue::from("red"))]);
        let (alias, value) = kwargs.take_first(&["c", "color"]).unwrap();
        assert_eq!(alias, "color");
        assert_eq!(value, RcValue::from("red"));
        assert!(kwargs.is_empty());

        let mut kwargs = Kwargs::from([("c", RcValue::Null)]);
        assert_eq!(kwargs.take_first(&["c", "color"]), None);
        assert!(kwargs.is_empty());
    }

    #[test]
    fn test_deserialize_from_json() {
        let kwargs: Kwargs = serde_json::from_str(r#"{"loc": "bottom", "ticks": [0, 1]}"#).unwrap();
        assert_eq!(kwargs.len(), 2);
        assert_eq!(kwargs.get("loc"), Some(&RcValue::from("bottom")));
    }
}
