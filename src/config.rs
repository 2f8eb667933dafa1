//! Runtime configuration for storage paths and the listen address.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_MUSIC_DIR: &str = "/tmp/quiz_music";
const DEFAULT_DATA_FILE: &str = "/tmp/quiz_data.json";
// 7849 spells QUIZ on a phone keypad
const DEFAULT_BIND: &str = "0.0.0.0:7849";

/// Where uploads and the state snapshot live, and where the server binds
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Directory uploaded music tracks are written to
    pub music_dir: PathBuf,
    /// Path of the JSON state snapshot
    pub data_file: PathBuf,
    /// Socket address the HTTP server listens on
    pub bind: SocketAddr,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from(DEFAULT_MUSIC_DIR),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            bind: DEFAULT_BIND.parse().expect("default bind address parses"),
        }
    }
}

impl QuizConfig {
    /// Load configuration from environment variables
    /// (QUIZ_MUSIC_DIR, QUIZ_DATA_FILE, QUIZ_BIND), keeping the default
    /// for anything unset or blank.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env_path("QUIZ_MUSIC_DIR") {
            config.music_dir = dir;
        }
        if let Some(file) = env_path("QUIZ_DATA_FILE") {
            config.data_file = file;
        }
        if let Ok(raw) = std::env::var("QUIZ_BIND") {
            match raw.trim().parse() {
                Ok(addr) => config.bind = addr,
                Err(_) => {
                    tracing::warn!(
                        "QUIZ_BIND {:?} is not a socket address, keeping {}",
                        raw,
                        config.bind
                    );
                }
            }
        }

        config
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
