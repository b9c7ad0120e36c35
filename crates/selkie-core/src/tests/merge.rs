use crate::*;
use serde_json::json;

#[test]
fn deep_merge_combines_nested_mappings() {
    let base = ChartConfig::from_value(json!({ "a": { "x": 1 } }));
    let merged = base.merged(&json!({ "a": { "y": 2 } }));
    assert_eq!(merged.as_value(), &json!({ "a": { "x": 1, "y": 2 } }));
}

#[test]
fn deep_merge_later_scalar_wins() {
    let base = ChartConfig::from_value(json!({ "a": 1 }));
    let merged = base.merged(&json!({ "a": 2 }));
    assert_eq!(merged.as_value(), &json!({ "a": 2 }));
}

#[test]
fn deep_merge_replaces_sequences() {
    let base = ChartConfig::from_value(json!({ "color": ["#111", "#222", "#333"] }));
    let merged = base.merged(&json!({ "color": ["#fff"] }));
    assert_eq!(merged.as_value(), &json!({ "color": ["#fff"] }));
}

#[test]
fn deep_merge_mapping_over_scalar_replaces() {
    let base = ChartConfig::from_value(json!({ "legend": false }));
    let merged = base.merged(&json!({ "legend": { "show": true } }));
    assert_eq!(merged.as_value(), &json!({ "legend": { "show": true } }));
}

#[test]
fn deep_merge_leaves_arguments_untouched() {
    let a = ChartConfig::from_value(json!({ "a": { "x": 1 }, "list": [1, 2] }));
    let b = json!({ "a": { "x": 5, "y": 2 }, "list": [3] });
    let a_before = a.clone();
    let b_before = b.clone();

    let _ = a.merged(&b);

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn dark_mode_overrides_win_and_block_is_removed() {
    let defaults = ChartConfig::from_value(json!({
        "color": "light",
        "darkMode": { "color": "dark" }
    }));
    let config = ChartConfig::from_value(json!({ "series": [] }));

    let dark = apply_defaults(&config, &defaults, true);
    assert_eq!(dark.get_str("color"), Some("dark"));
    assert!(!dark.contains_key("darkMode"));

    let light = apply_defaults(&config, &defaults, false);
    assert_eq!(light.get_str("color"), Some("light"));
    assert!(!light.contains_key("darkMode"));
}

#[test]
fn dark_mode_merges_nested_overrides() {
    let defaults = ChartConfig::from_value(json!({
        "textStyle": { "color": "#000", "fontSize": 12 },
        "darkMode": { "textStyle": { "color": "#eee" } }
    }));
    let effective = effective_defaults(&defaults, true);
    assert_eq!(
        effective.as_value(),
        &json!({ "textStyle": { "color": "#eee", "fontSize": 12 } })
    );
}

#[test]
fn author_dark_mode_key_survives() {
    // Only the defaults' darkMode block is consumed; the author's key is an ECharts option.
    let defaults = ChartConfig::from_value(json!({ "darkMode": { "color": "dark" } }));
    let config = ChartConfig::from_value(json!({ "darkMode": true }));
    let merged = apply_defaults(&config, &defaults, true);
    assert_eq!(merged.as_value(), &json!({ "color": "dark", "darkMode": true }));
}

#[test]
fn series_defaults_are_injected_under_entry_values() {
    let defaults = ChartConfig::from_value(json!({ "series": { "smooth": true } }));
    let config = ChartConfig::from_value(json!({
        "series": [{ "type": "line" }, { "type": "bar", "smooth": false }]
    }));

    let merged = apply_defaults(&config, &defaults, false);

    assert_eq!(
        merged.as_value(),
        &json!({
            "series": [
                { "type": "line", "smooth": true },
                { "type": "bar", "smooth": false }
            ]
        })
    );
}

#[test]
fn author_config_wins_over_remaining_defaults() {
    let defaults = ChartConfig::from_value(json!({
        "animation": false,
        "title": { "left": "center", "text": "default" }
    }));
    let config = ChartConfig::from_value(json!({ "title": { "text": "Sales" } }));

    let merged = apply_defaults(&config, &defaults, false);

    assert_eq!(
        merged.as_value(),
        &json!({ "animation": false, "title": { "left": "center", "text": "Sales" } })
    );
}

#[test]
fn apply_defaults_does_not_mutate_inputs() {
    let defaults = ChartConfig::from_value(json!({
        "color": "light",
        "series": { "smooth": true },
        "darkMode": { "color": "dark" }
    }));
    let config = ChartConfig::from_value(json!({ "series": [{ "type": "line" }] }));
    let defaults_before = defaults.clone();
    let config_before = config.clone();

    let _ = apply_defaults(&config, &defaults, true);
    let _ = apply_defaults(&config, &defaults, false);

    assert_eq!(defaults, defaults_before);
    assert_eq!(config, config_before);
}

#[test]
fn apply_defaults_is_idempotent() {
    let defaults = ChartConfig::from_value(json!({
        "font": { "fontFamily": "X" },
        "series": { "smooth": true, "lineStyle": { "width": 2 } },
        "darkMode": { "backgroundColor": "#111" }
    }));
    let config = ChartConfig::from_value(json!({
        "xAxis": { "type": "category" },
        "series": [{ "type": "line", "data": [1, 2, 3] }]
    }));

    let first = apply_defaults(&config, &defaults, true);
    let second = apply_defaults(&config, &defaults, true);
    assert_eq!(first, second);
}

#[test]
fn merged_output_preserves_key_order() {
    let defaults = ChartConfig::from_value(json!({ "b": 1, "a": 2 }));
    let config = ChartConfig::from_value(json!({ "c": 3 }));
    let merged = apply_defaults(&config, &defaults, false);
    let keys: Vec<&str> = merged
        .as_value()
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(keys, vec!["b", "a", "c"]);
}
