// SPDX-License-Identifier: MPL-2.0
use wayfarer::config::{self, BackendKind, Config};
use wayfarer::i18n::fluent::I18n;
use tempfile::tempdir;

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let temp_config_file_path = dir.path().join("settings.toml");

    // 1. Initial config: en-US
    let mut initial_config = Config::default();
    initial_config.general.language = Some("en-US".to_string());
    config::save_to_path(&initial_config, &temp_config_file_path)
        .expect("Failed to write initial config file");

    let loaded_initial_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load initial config from path");
    let i18n_en = I18n::new(None, &loaded_initial_config);
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");
    assert_eq!(i18n_en.tr("header-map"), "Map");

    // 2. Change config to fr
    let mut french_config = Config::default();
    french_config.general.language = Some("fr".to_string());
    config::save_to_path(&french_config, &temp_config_file_path)
        .expect("Failed to write french config file");

    let loaded_french_config = config::load_from_path(&temp_config_file_path)
        .expect("Failed to load french config from path");
    let i18n_fr = I18n::new(None, &loaded_french_config);
    assert_eq!(i18n_fr.current_locale().to_string(), "fr");
    assert_eq!(i18n_fr.tr("header-map"), "Carte");

    dir.close().expect("Failed to close temporary directory");
}

#[test]
fn cli_language_wins_over_config() {
    let mut config = Config::default();
    config.general.language = Some("en-US".to_string());
    let i18n = I18n::new(Some("fr".to_string()), &config);
    assert_eq!(i18n.current_locale().to_string(), "fr");
}

#[test]
fn full_config_survives_round_trip() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut original = Config::default();
    original.map.access_token = Some("pk.test".to_string());
    original.map.initial_zoom = 5;
    original.search.debounce_ms = 450;
    original.backend.kind = BackendKind::Supabase;
    original.backend.supabase.url = "https://abcd.supabase.co".to_string();
    original.backend.supabase.anon_key = "anon".to_string();

    config::save_to_path(&original, &path).expect("Failed to write config");
    let loaded = config::load_from_path(&path).expect("Failed to load config");

    assert_eq!(loaded, original);
}

#[test]
fn every_locale_translates_user_facing_keys() {
    const KEYS: [&str; 8] = [
        "window-title",
        "map-hint",
        "search-placeholder",
        "add-pin-error-title-required",
        "notification-save-pin-error",
        "sign-in-error-credentials",
        "timeline-empty",
        "gallery-no-photos",
    ];

    let config = Config::default();
    for lang in ["en-US", "fr"] {
        let i18n = I18n::new(Some(lang.to_string()), &config);
        for key in KEYS {
            let text = i18n.tr(key);
            assert!(!text.starts_with("MISSING"), "{lang} lacks {key}");
        }
    }
}
