// crates/agora-cli/src/config.rs
//
// Host configuration for the `agora` binary.
// Loaded from a TOML file or populated with defaults.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory holding the local state file and generated keys.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Log level used when `RUST_LOG` is unset: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Genesis document `agora init` starts from. When unset, init builds an
    /// empty genesis from its flags.
    #[serde(default)]
    pub genesis_file: Option<String>,
}

fn default_data_dir() -> String {
    "~/.agora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            genesis_file: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(expand_tilde(&self.data_dir))
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir().join("state.json")
    }

    pub fn keys_dir(&self) -> PathBuf {
        self.data_dir().join("keys")
    }
}

pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
