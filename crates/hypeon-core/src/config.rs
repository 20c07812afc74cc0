use crate::app_config::{AppConfig, Environment};
use crate::CoreError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `CoreError` if a config value fails to parse.
pub fn load_app_config() -> Result<AppConfig, CoreError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the actual environment so it can be
/// tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, CoreError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let raw_addr = or_default("HYPEON_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = raw_addr
        .parse::<SocketAddr>()
        .map_err(|e| CoreError::InvalidEnvVar {
            var: "HYPEON_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    Ok(AppConfig {
        env: parse_environment(&or_default("HYPEON_ENV", "development")),
        bind_addr,
        log_level: or_default("HYPEON_LOG_LEVEL", "info"),
        data_dir: PathBuf::from(or_default("HYPEON_DATA_DIR", "./data")),
        api_keys: parse_api_keys(&or_default("HYPEON_API_KEYS", "")),
    })
}

/// Split a comma-separated token list, dropping blanks so trailing commas
/// and padded entries are harmless.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
