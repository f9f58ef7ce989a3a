//! Configuration management for bumplist.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Values are read once into a
//! [`Config`] that is passed to every component that needs it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the bumplist configuration directory
//! 3. Application defaults (everything except the client id)

use std::{env, path::PathBuf, time::Duration};

use crate::{Error, Res};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-private playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public user-read-playback-state";

/// Returns the directory holding the `.env` file and the session file.
///
/// - Linux: `~/.config/bumplist`
/// - macOS: `~/Library/Application Support/bumplist`
/// - Windows: `%APPDATA%/bumplist`
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("bumplist");
    path
}

/// Loads environment variables from the `.env` file in [`config_dir`].
///
/// A missing `.env` file is not an error; the environment alone may carry
/// the configuration (for example when run from a scheduler).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub async fn load_env() -> Result<(), String> {
    let path = config_dir().join(".env");
    if !path.is_file() {
        log::debug!("no .env file at {}", path.display());
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Runtime configuration of a single run.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SPOTIFY_API_AUTH_CLIENT_ID`, the id of the registered Spotify app.
    pub client_id: String,
    /// `SPOTIFY_API_REDIRECT_URI`, must match the app registration.
    pub redirect_uri: String,
    /// `SERVER_ADDRESS`, where the callback server binds.
    pub server_addr: String,
    /// `SPOTIFY_API_AUTH_SCOPE`, space separated scopes.
    pub scope: String,
    /// `SPOTIFY_API_AUTH_URL`
    pub auth_url: String,
    /// `SPOTIFY_API_TOKEN_URL`
    pub token_url: String,
    /// `SPOTIFY_API_URL`, base of the Web API without trailing slash.
    pub api_url: String,
    /// `BUMPLIST_SESSION_FILE`
    pub session_path: PathBuf,
    /// `BUMPLIST_AUTH_TIMEOUT` in seconds; `None` waits for the browser forever.
    pub auth_timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let client_id = get("SPOTIFY_API_AUTH_CLIENT_ID")
            .ok_or(Error::MissingConfig("SPOTIFY_API_AUTH_CLIENT_ID"))?;

        let auth_timeout = match get("BUMPLIST_AUTH_TIMEOUT") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| Error::InvalidConfig {
                    name: "BUMPLIST_AUTH_TIMEOUT",
                    reason: e.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let session_path = get("BUMPLIST_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir().join("session.json"));

        Ok(Self {
            client_id,
            redirect_uri: or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            server_addr: or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            scope: or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            session_path,
            auth_timeout,
        })
    }
}
