use crate::models::AppConfig;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config = parse_config(&contents)?;

    info!(
        "Configuration loaded: listening on {}:{}, session cookie '{}'",
        config.server.host, config.server.port, config.session.cookie_name
    );

    Ok(config)
}

/// Parse and validate configuration from YAML text
pub fn parse_config(contents: &str) -> Result<AppConfig, String> {
    let config: AppConfig = serde_yaml::from_str(contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with fallback options
pub fn load_config_with_fallback() -> Result<AppConfig, String> {
    // Try loading from environment variable first
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        match load_config(&config_path) {
            Ok(config) => return Ok(config),
            Err(e) => warn!(
                "Failed to load config from CONFIG_PATH ({}): {}",
                config_path, e
            ),
        }
    }

    let paths = ["config.yaml", "config.yml"];

    for path in paths {
        if Path::new(path).exists() {
            match load_config(path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Failed to load config from '{}': {}", path, e),
            }
        }
    }

    Err(
        "No configuration file found. Create a config.yaml file or set the CONFIG_PATH environment variable."
            .to_string(),
    )
}
