use stage_core::*;

#[test]
fn darken_scales_each_channel() {
    assert_eq!(darken_hex("#808080", 0.75).unwrap(), "#606060");
    assert_eq!(darken_hex("#000000", 0.75).unwrap(), "#000000");
}

#[test]
fn darken_rejects_malformed_hex() {
    assert!(darken_hex("", 0.75).is_err());
    assert!(darken_hex("#zzzzzz", 0.75).is_err());
}

#[test]
fn hex_parsing_accepts_short_and_bare_forms() {
    assert_eq!(Rgb::from_hex("#fff").unwrap().to_hex(), "#ffffff");
    assert_eq!(Rgb::from_hex("87CEEB").unwrap().to_hex(), "#87ceeb");
    assert!(matches!(Rgb::from_hex(""), Err(ColorError::Empty)));
}

#[test]
fn dark_branch_without_overrides_darkens_base() {
    let base = ColorMap::new()
        .with_color("darkGreenPlane", "#808080")
        .with_nested(SKY_KEY, &[("lightBlueSky", "#808080")]);
    let dark = derive_theme(&base, ThemeMode::Dark, None);
    assert_eq!(dark.color("darkGreenPlane"), Some("#606060"));
    assert_eq!(dark.sky("lightBlueSky"), Some("#606060"));
    // Base stays untouched.
    assert_eq!(base.color("darkGreenPlane"), Some("#808080"));
}

#[test]
fn repeated_derivation_does_not_accumulate() {
    let base = ColorMap::new().with_color("darkGreenPlane", "#808080");
    let first = derive_theme(&base, ThemeMode::Dark, None);
    let second = derive_theme(&base, ThemeMode::Dark, None);
    assert_eq!(first, second);
    assert_eq!(second.color("darkGreenPlane"), Some("#606060"));
}

#[test]
fn light_branch_without_overrides_is_base() {
    let base = base_colors();
    assert_eq!(derive_theme(&base, ThemeMode::Light, None), base);
}

#[test]
fn overrides_win_and_merge_nested_maps() {
    let base = base_colors();
    let overrides = ColorMap::new()
        .with_color("darkGreenPlane", "#111111")
        .with_color("mediumGreenPlane", "")
        .with_nested(SKY_KEY, &[("lightBlueSky", "#222222")]);
    let dark = derive_theme(&base, ThemeMode::Dark, Some(&overrides));
    assert_eq!(dark.color("darkGreenPlane"), Some("#111111"));
    // Empty override keeps the base colour, and is not darkened.
    assert_eq!(dark.color("mediumGreenPlane"), Some("#6b8e23"));
    assert_eq!(dark.sky("lightBlueSky"), Some("#222222"));
    assert_eq!(dark.sky("darkBlueSky"), Some("#00bfff"));
}

#[test]
fn layer_color_reads_sky_from_nested_map() {
    let base = base_colors();
    let sky = LayerLayout::new("mediumBlueSky", 5.0, -9.0, LayerKind::Sky);
    let ground = LayerLayout::new("lightGreenPlane", -3.0, -5.0, LayerKind::Ground);
    assert_eq!(base.layer_color(&sky), Some("#87ceeb"));
    assert_eq!(base.layer_color(&ground), Some("#9acd32"));
    assert_eq!(base.color("mediumBlueSky"), None);
}

#[test]
fn builtin_registry_has_reference_palettes() {
    let registry = ThemeRegistry::builtin();
    let names: Vec<_> = registry.names().collect();
    assert_eq!(names, vec!["desert", "meadow"]);

    let meadow = registry.get("meadow").unwrap();
    assert_eq!(meadow.light.sky("lightBlueSky"), Some("#add8e6"));
    assert_eq!(meadow.dark.color("darkGreenPlane"), Some("#37412a"));
    assert_eq!(meadow.branch(ThemeMode::Dark).sky("darkBlueSky"), Some("#0f1d3d"));

    let desert = registry.get("desert").unwrap();
    assert_eq!(desert.light.color("lightGreenPlane"), Some("#c29c62"));
}

#[test]
fn unknown_theme_is_reported() {
    let registry = ThemeRegistry::builtin();
    assert_eq!(
        registry.get("tundra").unwrap_err(),
        ThemeError::NotFound("tundra".to_string())
    );
}

#[test]
fn config_fills_missing_fields_from_reference_stage() {
    let config = StageConfig::from_json(r#"{ "theme": "desert", "seed": 3 }"#).unwrap();
    assert_eq!(config.theme, "desert");
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.layout, StageLayout::default());
    assert_eq!(config.transition_secs, THEME_TRANSITION_SECS);
    assert!(config.themes.get("meadow").is_ok());
}

#[test]
fn config_accepts_custom_theme_table() {
    let json = r##"{
        "theme": "mono",
        "themes": {
            "mono": {
                "light": { "darkGreenPlane": "#808080", "sky": { "lightBlueSky": "#ffffff" } },
                "dark": { "darkGreenPlane": "#606060", "sky": { "lightBlueSky": "#000000" } }
            }
        }
    }"##;
    let config = StageConfig::from_json(json).unwrap();
    let mono = config.themes.get("mono").unwrap();
    assert_eq!(mono.dark.sky("lightBlueSky"), Some("#000000"));
    assert!(config.themes.get("meadow").is_err());
}

#[test]
fn malformed_config_is_an_error() {
    assert!(matches!(
        StageConfig::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}
