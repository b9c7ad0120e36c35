use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding per-series entries (a list in chart configs, a mapping in site defaults).
pub const SERIES_KEY: &str = "series";
/// Key holding the partial config applied over the defaults when dark mode is preferred.
pub const DARK_MODE_KEY: &str = "darkMode";
pub const FIGCAPTION_KEY: &str = "figcaption";
pub const RENDERER_KEY: &str = "renderer";

/// A schema-less ECharts option tree.
///
/// Everything the charting runtime accepts is carried through verbatim; only the keys with
/// special merge semantics (`series`, `darkMode`) and the ones that drive embed side effects
/// (`figcaption`, `renderer`) get typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartConfig(Value);

impl Default for ChartConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl From<Value> for ChartConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Map<String, Value>> for ChartConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

impl ChartConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.as_object_mut()?.remove(key)
    }

    pub fn get_path(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get_path(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get_path(dotted_path)?.as_bool()
    }

    /// Merges `other` into `self` in place. `other` is only read.
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Returns a fresh config with `overlay` merged over a copy of `self`.
    pub fn merged(&self, overlay: &Value) -> ChartConfig {
        let mut out = self.clone();
        out.deep_merge(overlay);
        out
    }

    /// The author's series list (`config.series`).
    pub fn series(&self) -> Option<&Vec<Value>> {
        self.get(SERIES_KEY)?.as_array()
    }

    pub fn series_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.0.as_object_mut()?.get_mut(SERIES_KEY)?.as_array_mut()
    }

    /// Per-series defaults (`defaults.series`), keyed by series option name.
    pub fn series_defaults(&self) -> Option<&Map<String, Value>> {
        self.get(SERIES_KEY)?.as_object()
    }

    /// The dark-mode override block (`defaults.darkMode`).
    pub fn dark_mode(&self) -> Option<&Map<String, Value>> {
        self.get(DARK_MODE_KEY)?.as_object()
    }

    /// Caption text. Only scalars produce a caption; `null`, `false`, `""`, mappings and
    /// sequences mean none.
    pub fn figcaption(&self) -> Option<String> {
        match self.get(FIGCAPTION_KEY)? {
            Value::Null | Value::Bool(false) | Value::Object(_) | Value::Array(_) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(true) => Some("true".to_string()),
            // f64 `Display` prints integral floats without a fraction, as `String(n)` does.
            Value::Number(n) => Some(match n.as_f64() {
                Some(f) if n.is_f64() => format!("{f}"),
                _ => n.to_string(),
            }),
        }
    }

    pub fn renderer(&self) -> Option<&str> {
        self.get(RENDERER_KEY)?.as_str()
    }

    /// `type` of every series entry, in order, duplicates removed.
    pub fn series_types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let Some(series) = self.series() else {
            return out;
        };
        for entry in series {
            let Some(ty) = entry.get("type").and_then(Value::as_str) else {
                continue;
            };
            if !ty.is_empty() && !out.contains(&ty) {
                out.push(ty);
            }
        }
        out
    }
}

pub(crate) fn deep_merge_value(base: &mut Value, incoming: &Value) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn figcaption_ignores_empty_values() {
        assert_eq!(ChartConfig::from_value(json!({ "figcaption": "" })).figcaption(), None);
        assert_eq!(ChartConfig::from_value(json!({ "figcaption": null })).figcaption(), None);
        assert_eq!(
            ChartConfig::from_value(json!({ "figcaption": "Weekly" })).figcaption(),
            Some("Weekly".to_string())
        );
    }

    #[test]
    fn figcaption_only_accepts_scalars() {
        let caption = |v: Value| ChartConfig::from_value(json!({ "figcaption": v })).figcaption();
        assert_eq!(caption(json!({ "text": "x" })), None);
        assert_eq!(caption(json!(["a", "b"])), None);
        assert_eq!(caption(json!(3)), Some("3".to_string()));
        assert_eq!(caption(json!(2.0)), Some("2".to_string()));
        assert_eq!(caption(json!(2.5)), Some("2.5".to_string()));
        assert_eq!(caption(json!(true)), Some("true".to_string()));
    }

    #[test]
    fn series_types_are_deduplicated_in_order() {
        let cfg = ChartConfig::from_value(json!({
            "series": [{ "type": "bar" }, { "type": "line" }, { "type": "bar" }, { "data": [] }]
        }));
        assert_eq!(cfg.series_types(), vec!["bar", "line"]);
    }

    #[test]
    fn series_accessors_distinguish_list_and_mapping() {
        let defaults = ChartConfig::from_value(json!({ "series": { "smooth": true } }));
        assert!(defaults.series().is_none());
        assert!(defaults.series_defaults().is_some());

        let config = ChartConfig::from_value(json!({ "series": [{ "type": "line" }] }));
        assert_eq!(config.series().map(Vec::len), Some(1));
        assert!(config.series_defaults().is_none());
    }
}
