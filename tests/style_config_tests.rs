use chart_compose::StyleConfig;
use chart_compose::core::BarMode;
use chart_compose::style::{Palette, Theme};
use serde_json::json;

#[test]
fn default_style_is_valid() {
    StyleConfig::default().validate().expect("valid default");
    StyleConfig::for_theme(Theme::Greyscale)
        .validate()
        .expect("valid greyscale");
}

#[test]
fn greyscale_theme_switches_every_palette() {
    let style = StyleConfig::for_theme(Theme::Greyscale);
    assert_eq!(style.color_singular, Palette::Grey);
    assert_eq!(style.color_multiple, Palette::Grey);
    assert_eq!(style.heatmap_palette, Palette::Grey);
    assert!(style.refline_color.is_some());
}

#[test]
fn partial_json_keeps_defaults_for_missing_fields() {
    let style = StyleConfig::from_json_str(r#"{"bar_width": 0.6, "overlay_bar_mode": "stack"}"#)
        .expect("parse");
    assert!((style.bar_width - 0.6).abs() <= 1e-12);
    assert_eq!(style.overlay_bar_mode, BarMode::Stack);
    assert_eq!(style.hist_bins, StyleConfig::default().hist_bins);
}

#[test]
fn json_round_trip_preserves_config() {
    let style = StyleConfig::default()
        .with_overlay_auto_threshold(4.5)
        .with_hist_bins(12);
    let json = style.to_json_pretty().expect("serialize");
    assert_eq!(StyleConfig::from_json_str(&json).expect("parse"), style);
}

#[test]
fn update_reports_unknown_keys_and_applies_known_ones() {
    let mut style = StyleConfig::default();
    let unknown = style
        .update(&json!({ "hist_bins": 7, "not_a_key": true }))
        .expect("update");
    assert_eq!(unknown, vec!["not_a_key".to_owned()]);
    assert_eq!(style.hist_bins, 7);
}

#[test]
fn invalid_update_leaves_style_untouched() {
    let mut style = StyleConfig::default();
    let before = style.clone();
    assert!(style.update(&json!({ "bar_width": 1.5 })).is_err());
    assert!(style.update(&json!({ "hist_bins": "many" })).is_err());
    assert!(style.update(&json!([1, 2, 3])).is_err());
    assert_eq!(style, before);
}

#[test]
fn out_of_range_values_fail_validation() {
    let cases = [
        StyleConfig {
            overlay_auto_threshold: 0.0,
            ..StyleConfig::default()
        },
        StyleConfig {
            ci_level: 1.0,
            ..StyleConfig::default()
        },
        StyleConfig {
            overlay_hist_alpha: 1.2,
            ..StyleConfig::default()
        },
        StyleConfig {
            scatter_size_range: (50.0, 10.0),
            ..StyleConfig::default()
        },
    ];
    for style in cases {
        assert!(style.validate().is_err());
    }
}
