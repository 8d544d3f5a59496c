// Attribute record returned by the device
//
// One `!re` reply carries an ordered set of `=key=value` attributes.
// Order is preserved so generic views can show "the first N fields"
// exactly as the device reported them.

use indexmap::IndexMap;
use serde::Serialize;

/// A single device record: ordered `key -> value` attributes.
///
/// Values are always strings on the wire; typed interpretation happens
/// in `tikgate-core`'s conversion layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    attrs: IndexMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Insert or replace an attribute, keeping first-insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Iterate attributes in device order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_insertion_order() {
        let record: Record = [("name", "ether1"), ("type", "ether"), ("mtu", "1500")]
            .into_iter()
            .collect();

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["name", "type", "mtu"]);
        assert_eq!(record.get("mtu"), Some("1500"));
        assert_eq!(record.get("missing"), None);
    }
}
