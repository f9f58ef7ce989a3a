use std::path::PathBuf;

use thiserror::Error;

/// Every failure a run can end with.
///
/// Only [`Error::SessionNotFound`] and [`Error::SessionCorrupt`] are treated as
/// recoverable (they trigger a fresh authorization); everything else aborts
/// the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("no session file at {}", .0.display())]
    SessionNotFound(PathBuf),

    #[error("session file {} is not valid: {source}", path.display())]
    SessionCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored credential is unusable: {0}")]
    InvalidCredential(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify returned {status} for {endpoint}: {message}")]
    Api {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("token request failed: {0}")]
    TokenExchange(String),

    #[error("authorization state mismatch: expected {expected:?}, got {received:?}")]
    StateMismatch { expected: String, received: String },

    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("authorization callback did not include a code")]
    MissingCode,

    #[error("authorization was aborted before a credential arrived")]
    AuthorizationAborted,

    #[error("interrupted")]
    Interrupted,

    #[error("no authorization callback within {0} seconds")]
    AuthorizationTimedOut(u64),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("playlist selection cancelled")]
    SelectionCancelled,

    #[error("there are no playlists to choose from")]
    NoPlaylists,

    #[error("no playlist named {0:?}, run with --reset to choose another one")]
    PlaylistNotFound(String),

    #[error("{count} playlists are named {name:?}, rename all but one or choose another with --reset")]
    DuplicatePlaylistName { name: String, count: usize },

    #[error("the currently playing item {0:?} has no Spotify ID")]
    UnidentifiedTrack(String),

    #[error("{step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns the innermost error, skipping any step context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attaches the name of the failing step to an error.
pub trait StepExt<T> {
    fn step(self, step: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<Error>> StepExt<T> for Result<T, E> {
    fn step(self, step: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::Step {
            step,
            source: Box::new(e.into()),
        })
    }
}
