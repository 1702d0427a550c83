use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CAREFINDER_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:5000");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "carefinder/0.1 (therapist-finder)");
    assert_eq!(
        cfg.location_store_path,
        std::path::PathBuf::from("./.carefinder/location.json")
    );
    assert_eq!(cfg.location_max_age_ms, 3_600_000);
    assert_eq!(cfg.location_timeout_ms, 10_000);
    assert!(cfg.enhanced_search);
    assert!(cfg.placeholder_ratings);
    assert!(!cfg.sample_fallback);
    assert_eq!(cfg.gazetteer_path, None);
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_API_BASE_URL", "ftp://example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAREFINDER_API_BASE_URL"),
        "expected InvalidEnvVar(CAREFINDER_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn location_max_age_override() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_LOCATION_MAX_AGE_MS", "60000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.location_max_age_ms, 60_000);
}

#[test]
fn location_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_LOCATION_TIMEOUT_MS", "ten seconds");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAREFINDER_LOCATION_TIMEOUT_MS"),
        "expected InvalidEnvVar(CAREFINDER_LOCATION_TIMEOUT_MS), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn boolean_flags_accept_common_spellings() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_ENHANCED_SEARCH", "off");
    map.insert("CAREFINDER_PLACEHOLDER_RATINGS", "No");
    map.insert("CAREFINDER_SAMPLE_FALLBACK", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(!cfg.enhanced_search);
    assert!(!cfg.placeholder_ratings);
    assert!(cfg.sample_fallback);
}

#[test]
fn boolean_flag_invalid() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_SAMPLE_FALLBACK", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAREFINDER_SAMPLE_FALLBACK"),
        "expected InvalidEnvVar(CAREFINDER_SAMPLE_FALLBACK), got: {result:?}"
    );
}

#[test]
fn gazetteer_path_override() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_GAZETTEER_PATH", "/etc/carefinder/places.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.gazetteer_path,
        Some(std::path::PathBuf::from("/etc/carefinder/places.json"))
    );
}

#[test]
fn blank_gazetteer_path_is_unset() {
    let mut map = HashMap::new();
    map.insert("CAREFINDER_GAZETTEER_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gazetteer_path, None);
}
