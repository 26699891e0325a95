use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_SOLVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STORE_DIR: &str = ".simplex-editor";
pub const DEFAULT_PAYLOAD_LIMIT: usize = 2 * 1024 * 1024; // 2 MB

/// Runtime settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `PORT`
    pub port: u16,
    /// `SOLVER_URL`: base URL of the simplex service
    pub solver_url: String,
    /// `STORE_DIR`: where the last inputs and result are kept
    pub store_dir: PathBuf,
    /// `JSON_PAYLOAD_LIMIT`: request body limit in bytes
    pub payload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            solver_url: DEFAULT_SOLVER_URL.to_string(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source; unset or unparseable values use defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        Config {
            port: lookup("PORT")
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            solver_url: lookup("SOLVER_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.solver_url),
            store_dir: lookup("STORE_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            payload_limit: lookup("JSON_PAYLOAD_LIMIT")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.payload_limit),
        }
    }
}
