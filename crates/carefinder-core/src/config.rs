use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_flag(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got '{raw}'")))
    };

    let env = parse_environment(&or_default("CAREFINDER_ENV", "development"))?;
    let log_level = or_default("CAREFINDER_LOG_LEVEL", "info");

    let api_base_url = or_default("CAREFINDER_API_BASE_URL", "http://127.0.0.1:5000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "CAREFINDER_API_BASE_URL",
            format!("'{api_base_url}' is not an http(s) URL"),
        ));
    }

    let request_timeout_secs = parse_u64("CAREFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CAREFINDER_USER_AGENT", "carefinder/0.1 (therapist-finder)");

    let location_store_path = PathBuf::from(or_default(
        "CAREFINDER_LOCATION_STORE_PATH",
        "./.carefinder/location.json",
    ));
    let location_max_age_ms = parse_u64("CAREFINDER_LOCATION_MAX_AGE_MS", "3600000")?;
    let location_timeout_ms = parse_u64("CAREFINDER_LOCATION_TIMEOUT_MS", "10000")?;

    let enhanced_search = parse_bool("CAREFINDER_ENHANCED_SEARCH", "true")?;
    let placeholder_ratings = parse_bool("CAREFINDER_PLACEHOLDER_RATINGS", "true")?;
    let sample_fallback = parse_bool("CAREFINDER_SAMPLE_FALLBACK", "false")?;
    let gazetteer_path = lookup("CAREFINDER_GAZETTEER_PATH")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        request_timeout_secs,
        user_agent,
        location_store_path,
        location_max_age_ms,
        location_timeout_ms,
        enhanced_search,
        placeholder_ratings,
        sample_fallback,
        gazetteer_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAREFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
