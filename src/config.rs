use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, path::PathBuf};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE_FILE: &str = "./notes.db";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://127.0.0.1:5173", "http://localhost:5173"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_file: default_database_file(),
            cors_origins: default_cors_origins(),
        }
    }
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect()
}

/// Build a config from `PORT`, `DATABASE_FILE` and `CORS_ORIGIN` (comma separated).
fn load_from_vars<F>(var: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(port) = var("PORT") {
        config.port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?;
    }

    if let Some(file) = var("DATABASE_FILE").filter(|f| !f.trim().is_empty()) {
        config.database_file = PathBuf::from(file);
    }

    if let Some(origins) = var("CORS_ORIGIN") {
        config.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
    }

    Ok(config)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_SERVICE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        let contents = fs::read_to_string("config.yaml")?;
        return serde_yaml::from_str(&contents).map_err(Into::into);
    }

    // Fallback to environment variables
    tracing::info!("No config file found, loading configuration from environment variables");
    load_from_vars(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_defaults_when_nothing_is_set() {
        let config = load_from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_file, PathBuf::from("./notes.db"));
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = load_from_vars(vars(&[
            ("PORT", "9090"),
            ("DATABASE_FILE", "/tmp/notes-test.db"),
            ("CORS_ORIGIN", "https://a.example, https://b.example,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.database_file, PathBuf::from("/tmp/notes-test.db"));
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn invalid_port_is_an_error() {
        assert!(load_from_vars(vars(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config: Config = serde_yaml::from_str("port: 3000\n").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_file, PathBuf::from("./notes.db"));
        assert_eq!(config.cors_origins, default_cors_origins());
    }
}
