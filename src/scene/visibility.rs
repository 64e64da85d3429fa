use rustc_hash::FxHashMap;
use serde_json::Value;

/// Node name to visibility flag, as toggled from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap(FxHashMap<String, bool>);

impl VisibilityMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a host object. `true`/`false`, `1`/`0` and their string forms
    /// are accepted; every other entry is dropped with a debug log.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let map = object
            .iter()
            .filter_map(|(name, flag)| {
                let parsed = boolean_like(flag);
                if parsed.is_none() {
                    log::debug!("ignoring visibility entry {name}: {flag}");
                }
                parsed.map(|v| (name.clone(), v))
            })
            .collect();
        Self(map)
    }

    /// Set one entry.
    pub fn set(&mut self, name: impl Into<String>, visible: bool) {
        let _ = self.0.insert(name.into(), visible);
    }

    /// Flag for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for VisibilityMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn boolean_like(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 1.0 => Some(true),
            Some(v) if v == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_boolean_like_entries() {
        let map = VisibilityMap::from_value(&json!({
            "atoms": 1,
            "bonds": false,
            "unit_cell": "0",
            "polyhedra": true,
        }));
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("atoms"), Some(true));
        assert_eq!(map.get("bonds"), Some(false));
        assert_eq!(map.get("unit_cell"), Some(false));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn drops_malformed_entries() {
        let map = VisibilityMap::from_value(&json!({
            "atoms": 2,
            "bonds": "maybe",
            "axes": null,
            "labels": [1],
            "ok": 0,
        }));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ok"), Some(false));
        assert!(VisibilityMap::from_value(&json!([1, 2])).is_empty());
    }
}
