use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const MODEL_DIR: &str = "model";
const MODEL_FILE: &str = "classifier.json";
const LABELS_FILE: &str = "labels.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub max_body_bytes: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

impl Config {
    /// Reads `FLOCKSCAN_*` environment variables. Artifact paths default to
    /// `model/` next to the running executable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok(), &install_dir())
    }

    fn from_lookup<F>(lookup: F, install_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_dir = install_dir.join(MODEL_DIR);
        Ok(Config {
            host: lookup("FLOCKSCAN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "FLOCKSCAN_PORT", DEFAULT_PORT)?,
            model_path: lookup("FLOCKSCAN_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join(MODEL_FILE)),
            labels_path: lookup("FLOCKSCAN_LABELS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join(LABELS_FILE)),
            max_body_bytes: parse_or(&lookup, "FLOCKSCAN_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

/// Directory holding the running executable, falling back to the working
/// directory when it cannot be determined.
fn install_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
