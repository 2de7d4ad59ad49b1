//! Configuration Loader
//!
//! Environment-aware loading of the proxy TOML file. String values may
//! reference environment variables as `${VAR}` or `${VAR:-default}`; a
//! reference without a default to an unset variable fails loading.

use super::ProxyConfig;
use crate::constants::env as env_keys;
use crate::error::{ProxyError, ProxyResult};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::env;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn env_var_pattern() -> &'static Regex {
    ENV_VAR_PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("static pattern compiles")
    })
}

impl ProxyConfig {
    /// Load configuration from the file named by `ARI_PROXY_CONFIG`
    ///
    /// Falls back to defaults when the variable is unset.
    pub fn load() -> ProxyResult<Self> {
        match env::var(env_keys::CONFIG_PATH) {
            Ok(path) => Self::load_from_file(Path::new(&path)),
            Err(_) => {
                info!(
                    environment = %detect_environment(),
                    "No {} set, using default configuration",
                    env_keys::CONFIG_PATH
                );
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from_file(path: &Path) -> ProxyResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProxyError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: ProxyConfig =
            parse_with_env_substitution(&contents, &path.to_string_lossy())?;
        config.validate()?;

        info!(
            path = %path.display(),
            environment = %detect_environment(),
            store_backend = %config.store.backend,
            "Configuration loaded"
        );

        Ok(config)
    }
}

/// Parse TOML, substitute environment references in every string, then deserialize
pub(crate) fn parse_with_env_substitution<T: DeserializeOwned>(
    contents: &str,
    source: &str,
) -> ProxyResult<T> {
    let mut value: toml::Value = toml::from_str(contents).map_err(|e| {
        ProxyError::ConfigurationError(format!("Failed to parse TOML in {source}: {e}"))
    })?;

    substitute_env_vars_in_value(&mut value)?;

    value.try_into().map_err(|e: toml::de::Error| {
        ProxyError::ConfigurationError(format!("Invalid configuration in {source}: {e}"))
    })
}

fn substitute_env_vars_in_value(value: &mut toml::Value) -> ProxyResult<()> {
    match value {
        toml::Value::String(s) => {
            *s = expand_env_vars(s)?;
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                substitute_env_vars_in_value(v)?;
            }
        }
        toml::Value::Array(array) => {
            for v in array.iter_mut() {
                substitute_env_vars_in_value(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Expand `${VAR}` and `${VAR:-default}` references
pub fn expand_env_vars(input: &str) -> ProxyResult<String> {
    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;

    for cap in env_var_pattern().captures_iter(input) {
        let Some(whole_match) = cap.get(0) else {
            continue;
        };
        let var_name = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let default_value = cap.get(2).map(|m| m.as_str());

        result.push_str(&input[last_end..whole_match.start()]);

        match (env::var(var_name), default_value) {
            (Ok(value), _) => result.push_str(&value),
            (Err(_), Some(default)) => result.push_str(default),
            (Err(_), None) => {
                return Err(ProxyError::ConfigurationError(format!(
                    "Environment variable '{var_name}' not found and no default provided"
                )));
            }
        }

        last_end = whole_match.end();
    }

    result.push_str(&input[last_end..]);
    Ok(result)
}

/// Current deployment environment name
pub fn detect_environment() -> String {
    let environment = env::var(env_keys::ENVIRONMENT)
        .or_else(|_| env::var(env_keys::APP_ENVIRONMENT))
        .unwrap_or_else(|_| "development".to_string());
    debug!(environment = %environment, "Detected environment");
    environment
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_without_references() {
        assert_eq!(expand_env_vars("plain").unwrap(), "plain");
    }

    #[test]
    fn test_expand_uses_default_when_unset() {
        let out = expand_env_vars("redis://${ARI_PROXY_TEST_SURELY_UNSET_HOST:-localhost}:6379")
            .unwrap();
        assert_eq!(out, "redis://localhost:6379");
    }

    #[test]
    fn test_expand_prefers_environment_value() {
        env::set_var("ARI_PROXY_TEST_LOADER_HOST", "cache.internal");
        let out = expand_env_vars("redis://${ARI_PROXY_TEST_LOADER_HOST:-localhost}").unwrap();
        assert_eq!(out, "redis://cache.internal");
        env::remove_var("ARI_PROXY_TEST_LOADER_HOST");
    }

    #[test]
    fn test_expand_missing_without_default_fails() {
        let err = expand_env_vars("${ARI_PROXY_TEST_SURELY_UNSET_VAR}").unwrap_err();
        assert!(matches!(err, ProxyError::ConfigurationError(_)));
    }

    #[test]
    fn test_load_from_file_substitutes_nested_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
backend = "redis"

[store.redis]
url = "${{ARI_PROXY_TEST_SURELY_UNSET_URL:-redis://fallback:6379}}"
"#
        )
        .unwrap();

        let config = ProxyConfig::load_from_file(file.path()).unwrap();
        assert_eq!(
            config.store.redis.unwrap().url,
            "redis://fallback:6379".to_string()
        );
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let err = ProxyConfig::load_from_file(Path::new("/nonexistent/ari-proxy.toml"))
            .unwrap_err();
        assert!(matches!(err, ProxyError::ConfigurationError(ref msg) if msg.contains("Failed to read")));
    }
}
