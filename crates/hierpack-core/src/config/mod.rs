use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// Layered configuration document.
///
/// The document is a JSON object with one section per component (`hierarchy`, `pack`,
/// `labels`, `search`). Typed option structs are read from a section with
/// [`HierpackConfig::section`]; missing keys fall back to the struct's serde defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct HierpackConfig(Value);

impl Default for HierpackConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl HierpackConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Built-in defaults for every section.
    pub fn defaults() -> Self {
        Self(json!({
            "hierarchy": {
                "useDescriptiveNames": true,
                "maxLevels": crate::hierarchy::MAX_LEVELS,
            },
            "pack": {
                "padding": 3.0,
                "zeroWeightRadiusRatio": 0.1,
            },
            "labels": {
                "minRadius": 20.0,
                "overlapAllowance": 0.0,
                "charsPerRadius": 4.0,
            },
            "search": {
                "limit": 10,
            },
        }))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON document and merges it onto [`HierpackConfig::defaults`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        let mut cfg = Self::defaults();
        cfg.deep_merge(&overrides);
        Ok(cfg)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.lookup(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_i64().map(|n| n as f64))
            .or_else(|| v.as_u64().map(|n| n as f64))
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // `from_value` accepts any JSON; coerce non-objects so this never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Deserializes one top-level section into a typed options struct.
    ///
    /// An absent section yields `T::default()`.
    pub fn section<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.0.as_object().and_then(|root| root.get(name)) else {
            return Ok(T::default());
        };
        serde_json::from_value(value.clone()).map_err(|err| Error::InvalidConfig {
            section: name.to_string(),
            message: err.to_string(),
        })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
