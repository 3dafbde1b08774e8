//! Profile attributes sent to the provider

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Attribute name → string value
///
/// Values are always strings by the time they reach the provider. Use
/// [`ProfileAttributes::from_values`] for loosely typed input; nothing is
/// dropped, non-strings are stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileAttributes(HashMap<String, String>);

impl ProfileAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from JSON-ish values, stringifying everything that is not a string
    ///
    /// `null` becomes the empty string.
    pub fn from_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), stringify(v)))
                .collect(),
        )
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply `other` on top of `self`, later values winning
    pub fn merge(&mut self, other: ProfileAttributes) {
        self.0.extend(other.0);
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProfileAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<HashMap<String, String>> for ProfileAttributes {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_values_stringifies() {
        let attrs = ProfileAttributes::from_values([
            ("name", json!("Ada")),
            ("age", json!(36)),
            ("score", json!(4.5)),
            ("vip", json!(true)),
            ("nickname", Value::Null),
            ("tags", json!(["a", "b"])),
        ]);

        assert_eq!(attrs.len(), 6);
        assert_eq!(attrs.get("name"), Some("Ada"));
        assert_eq!(attrs.get("age"), Some("36"));
        assert_eq!(attrs.get("score"), Some("4.5"));
        assert_eq!(attrs.get("vip"), Some("true"));
        assert_eq!(attrs.get("nickname"), Some(""));
        assert_eq!(attrs.get("tags"), Some(r#"["a","b"]"#));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut attrs: ProfileAttributes =
            [("tier", "gold"), ("city", "Oslo")].into_iter().collect();
        attrs.merge([("tier", "platinum")].into_iter().collect());

        assert_eq!(attrs.get("tier"), Some("platinum"));
        assert_eq!(attrs.get("city"), Some("Oslo"));
    }
}
