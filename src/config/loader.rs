//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns a detailed error if the file cannot be read, TOML parsing
/// fails, or a validation rule is violated.
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        native = %config.chain.native_symbol,
        request_timeout_ms = config.http.request_timeout_ms,
        source_timeout_ms = config.http.source_timeout_ms,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.chain.native_symbol.is_empty(),
        "chain.native_symbol must not be empty"
    );
    anyhow::ensure!(
        config.chain.native_decimals <= 28,
        "chain.native_decimals must be at most 28, got {}",
        config.chain.native_decimals
    );
    anyhow::ensure!(
        !config.chain.rpc_url.is_empty(),
        "chain.rpc_url must not be empty"
    );

    anyhow::ensure!(
        config.http.request_timeout_ms > 0,
        "http.request_timeout_ms must be positive"
    );
    anyhow::ensure!(
        config.http.source_timeout_ms > 0,
        "http.source_timeout_ms must be positive"
    );

    for (name, url) in [
        ("paraswap", &config.sources.paraswap.base_url),
        ("oneinch", &config.sources.oneinch.base_url),
        ("totle", &config.sources.totle.base_url),
        ("dexag", &config.sources.dexag.base_url),
        ("zeroex", &config.sources.zeroex.base_url),
    ] {
        anyhow::ensure!(
            !url.is_empty(),
            "sources.{name}.base_url must not be empty"
        );
    }

    anyhow::ensure!(
        config.sources.paraswap.network > 0,
        "sources.paraswap.network must be positive"
    );

    if let Some(demo) = &config.demo {
        anyhow::ensure!(
            demo.source_token != demo.destination_token,
            "demo.source_token and demo.destination_token must differ"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_nonexistent_file_fails() {
        assert!(load_config("nonexistent.toml").is_err());
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            "#,
        )
        .unwrap();
        validate_config(&config).unwrap();
        assert_eq!(config.chain.native_symbol, "ETH");
        assert_eq!(config.chain.native_decimals, 18);
        assert_eq!(config.sources.paraswap.network, 1);
        assert!(config.sources.zeroex.base_url.contains("0x.org"));
        assert!(config.demo.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            [http]
            source_timeout_ms = 0
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn demo_with_identical_tokens_is_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            [demo]
            source_token = "0x0000000000000000000000000000000000000000"
            destination_token = "0x0000000000000000000000000000000000000000"
            source_amount = "1000000000000000000"
            "#,
        )
        .unwrap();
        assert!(validate_config(&config).is_err());
    }
}
