//! Parameter bags passed to connectors and echoed back in results.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Result, SkyfetchError};

/// Ordered map of named JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vars {
    inner: Map<String, Value>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous one.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) {
        self.inner.insert(key.to_string(), value.into());
    }

    /// Builder-style variant of [`Vars::set`].
    pub fn with(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.set(key, value);
        self
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.inner.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains(
        &self,
        key: &str,
    ) -> bool {
        self.inner.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Move the value stored under `from` to `to`, replacing any value already there.
    pub fn rename(
        mut self,
        from: &str,
        to: &str,
    ) -> Self {
        if let Some(value) = self.inner.remove(from) {
            self.inner.insert(to.to_string(), value);
        }
        self
    }

    /// Overlay `other` on top of `self`. Keys present in both take `other`'s value.
    pub fn merge(
        mut self,
        other: Vars,
    ) -> Self {
        for (k, v) in other.inner {
            self.inner.insert(k, v);
        }
        self
    }

    /// Build a parameter bag from raw `key=value` strings, typing each value
    /// after the property type declared in a connector's JSON schema.
    ///
    /// Properties declared as `number`, `integer` or `boolean` are parsed;
    /// everything else, including undeclared keys, stays a string. A
    /// property accepting several types keeps the string when `string` is
    /// one of them.
    pub fn coerce(
        schema: &Value,
        pairs: &[(String, String)],
    ) -> Result<Self> {
        let mut vars = Vars::new();
        for (key, raw) in pairs {
            let declared = schema.pointer(&format!("/properties/{}/type", key));
            let value = match declared {
                Some(Value::String(t)) => Self::coerce_scalar(key, raw, t)?,
                Some(Value::Array(types)) if !types.iter().any(|t| t == "string") => {
                    let first = types.iter().filter_map(Value::as_str).next().unwrap_or("string");
                    Self::coerce_scalar(key, raw, first)?
                }
                _ => Value::String(raw.clone()),
            };
            vars.inner.insert(key.clone(), value);
        }
        Ok(vars)
    }

    fn coerce_scalar(
        key: &str,
        raw: &str,
        declared: &str,
    ) -> Result<Value> {
        let invalid = || SkyfetchError::Config(format!("parameter '{}' expects {}, got '{}'", key, declared, raw));
        match declared {
            "integer" => raw.parse::<i64>().map(Value::from).map_err(|_| invalid()),
            "number" => raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64).map(Value::Number).ok_or_else(invalid),
            "boolean" => raw.parse::<bool>().map(Value::Bool).map_err(|_| invalid()),
            _ => Ok(Value::String(raw.to_string())),
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.inner)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_set_and_get() {
        let vars = Vars::new().with("name", "results").with("count", 3);
        assert_eq!(vars.get::<String>("name"), Some("results".to_string()));
        assert_eq!(vars.get::<u32>("count"), Some(3));
        assert_eq!(vars.get::<String>("missing"), None);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = Vars::new().with("dest", "/tmp").with("name", "a");
        let merged = base.merge(Vars::new().with("name", "b"));
        assert_eq!(merged.get::<String>("dest"), Some("/tmp".to_string()));
        assert_eq!(merged.get::<String>("name"), Some("b".to_string()));
    }

    #[test]
    fn test_coerce_follows_schema_types() {
        let schema = json!({
            "type": "object",
            "properties": {
                "lon": { "type": "number" },
                "page": { "type": "integer" },
                "hd": { "type": "boolean" },
                "date": { "type": "string" },
                "sol": { "type": ["string", "integer"] }
            }
        });
        let vars = Vars::coerce(&schema, &pairs(&[("lon", "100.75"), ("page", "2"), ("hd", "false"), ("date", "2021-01-01"), ("sol", "1000"), ("extra", "x")])).unwrap();
        let value: Value = vars.into();
        assert_eq!(value, json!({"lon": 100.75, "page": 2, "hd": false, "date": "2021-01-01", "sol": "1000", "extra": "x"}));
    }

    #[test]
    fn test_coerce_rejects_bad_number() {
        let schema = json!({ "properties": { "lat": { "type": "number" } } });
        let err = Vars::coerce(&schema, &pairs(&[("lat", "north")])).unwrap_err();
        assert!(matches!(err, SkyfetchError::Config(_)));
    }

    #[test]
    fn test_rename_moves_value() {
        let vars = Vars::new().with("apikey", "mine").with("api_key", "configured").rename("apikey", "api_key");
        assert_eq!(vars.get::<String>("api_key"), Some("mine".to_string()));
        assert!(!vars.contains("apikey"));

        let untouched = Vars::new().with("date", "2021-01-01").rename("apikey", "api_key");
        assert!(!untouched.contains("api_key"));
    }
}
