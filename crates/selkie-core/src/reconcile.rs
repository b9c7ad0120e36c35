//! Headless counterpart of the in-browser reconciler.
//!
//! The functions here implement the same merge steps as the emitted script (`deepMerge` /
//! `applyDefaults` in `selkie-render/assets/embed.html`). Every function takes its inputs by
//! reference and returns a fresh value.

use crate::config::{ChartConfig, DARK_MODE_KEY, SERIES_KEY, deep_merge_value};
use serde_json::Value;

/// Merges `incoming` over a copy of `base`.
///
/// Mappings merge recursively; any other pairing is won by `incoming` (sequences are replaced,
/// not concatenated). `None` means the key is absent on the incoming side and keeps `base`.
pub fn merge_value(base: &Value, incoming: Option<&Value>) -> Value {
    let mut out = base.clone();
    if let Some(incoming) = incoming {
        deep_merge_value(&mut out, incoming);
    }
    out
}

/// Defaults as seen by one pass: the dark-mode block folded in when `dark_mode` is set, and the
/// `darkMode` key removed in every case.
pub fn effective_defaults(defaults: &ChartConfig, dark_mode: bool) -> ChartConfig {
    let mut out = match defaults.dark_mode() {
        Some(dark) if dark_mode => defaults.merged(&Value::Object(dark.clone())),
        _ => defaults.clone(),
    };
    out.remove(DARK_MODE_KEY);
    out
}

/// Injects `defaults.series` into every entry of `config.series`; entry values win.
fn inject_series_defaults(config: &mut ChartConfig, defaults: &ChartConfig) {
    let Some(series_defaults) = defaults.series_defaults() else {
        return;
    };
    let Some(entries) = config.series_mut() else {
        return;
    };
    for (key, default_value) in series_defaults {
        for entry in entries.iter_mut() {
            let Value::Object(entry) = entry else {
                continue;
            };
            let merged = merge_value(default_value, entry.get(key));
            entry.insert(key.clone(), merged);
        }
    }
}

/// Computes the option submitted to the charting runtime for one pass.
///
/// Neither `config` nor `defaults` is modified.
pub fn apply_defaults(config: &ChartConfig, defaults: &ChartConfig, dark_mode: bool) -> ChartConfig {
    let mut working_defaults = effective_defaults(defaults, dark_mode);
    let mut adjusted = config.clone();

    inject_series_defaults(&mut adjusted, &working_defaults);
    working_defaults.remove(SERIES_KEY);

    working_defaults.deep_merge(adjusted.as_value());
    working_defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(value: Value) -> ChartConfig {
        ChartConfig::from_value(value)
    }

    #[test]
    fn merge_value_without_incoming_copies_base() {
        assert_eq!(merge_value(&json!({ "a": 1 }), None), json!({ "a": 1 }));
    }

    #[test]
    fn merge_value_scalar_incoming_wins() {
        assert_eq!(merge_value(&json!(true), Some(&json!(false))), json!(false));
        assert_eq!(
            merge_value(&json!({ "width": 2 }), Some(&json!({ "type": "dashed" }))),
            json!({ "width": 2, "type": "dashed" })
        );
    }

    #[test]
    fn effective_defaults_in_light_mode_only_drops_dark_block() {
        let defaults = cfg(json!({ "color": "light", "darkMode": { "color": "dark" } }));
        let light = effective_defaults(&defaults, false);
        assert_eq!(light.as_value(), &json!({ "color": "light" }));
    }

    #[test]
    fn series_key_without_config_series_is_still_dropped() {
        let defaults = cfg(json!({ "series": { "smooth": true }, "animation": false }));
        let merged = apply_defaults(&cfg(json!({ "title": { "text": "t" } })), &defaults, false);
        assert_eq!(
            merged.as_value(),
            &json!({ "animation": false, "title": { "text": "t" } })
        );
    }

    #[test]
    fn nested_series_defaults_merge_under_entry_values() {
        let defaults = cfg(json!({ "series": { "lineStyle": { "width": 3, "type": "solid" } } }));
        let config = cfg(json!({
            "series": [{ "type": "line", "lineStyle": { "type": "dashed" } }]
        }));
        let merged = apply_defaults(&config, &defaults, false);
        assert_eq!(
            merged.get("series"),
            Some(&json!([{ "type": "line", "lineStyle": { "width": 3, "type": "dashed" } }]))
        );
    }

    #[test]
    fn non_mapping_series_entries_are_left_alone() {
        let defaults = cfg(json!({ "series": { "smooth": true } }));
        let config = cfg(json!({ "series": [null, { "type": "line" }] }));
        let merged = apply_defaults(&config, &defaults, false);
        assert_eq!(
            merged.get("series"),
            Some(&json!([null, { "type": "line", "smooth": true }]))
        );
    }
}
