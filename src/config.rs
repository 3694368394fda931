//! Server configuration, read once from the environment at startup.
//!
//! | Variable           | Default   |
//! |--------------------|-----------|
//! | `HOST`             | `0.0.0.0` |
//! | `PORT`             | `8080`    |
//! | `UPLOAD_DIR`       | `uploads` |
//! | `DATA_FILE`        | unset: tournaments live in memory only |
//! | `MAX_UPLOAD_BYTES` | 5 MiB     |

use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where player pictures are written and served from.
    pub upload_dir: PathBuf,
    /// JSON snapshot of every tournament, rewritten after each change.
    pub data_file: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            data_file: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: non_empty("HOST").unwrap_or_else(default_host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or_else(default_port),
            upload_dir: non_empty("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_upload_dir),
            data_file: non_empty("DATA_FILE").map(PathBuf::from),
            max_upload_bytes: non_empty("MAX_UPLOAD_BYTES")
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or_else(default_max_upload_bytes),
        }
    }
}
