//! # Spotify Integration Module
//!
//! This module wraps the parts of the Spotify Web API a bump run needs and the
//! OAuth 2.0 authorization code flow with PKCE that produces the credential.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator (cli::bump)
//!          ↓
//! PlaylistService trait
//!          ↓
//! SpotifyClient
//!     ├── users     GET /me
//!     ├── playlist  GET/POST/DELETE /users/{id}/playlists, /playlists/{id}/tracks
//!     └── player    GET /me/player/currently-playing
//!          ↓
//! reqwest
//! ```
//!
//! The orchestrator only sees [`PlaylistService`], so runs can be exercised
//! against a mock without any network.
//!
//! ## Token Management
//!
//! Every request asks the embedded [`TokenManager`] for a valid token, which
//! refreshes it shortly before expiry. Whatever the manager holds at the end
//! of a run is what gets persisted.
//!
//! ## Pagination
//!
//! Listing endpoints are drained completely through [`paging::drain`],
//! following Spotify's `next` URLs one page at a time.

pub mod auth;
pub mod paging;
pub mod player;
pub mod playlist;
pub mod users;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Config,
    management::TokenManager,
    types::{ApiErrorResponse, NowPlaying, Playlist, Token, TrackRef, User},
};

/// The remote operations a run performs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Returns a valid credential, refreshing it first if it expired.
    async fn token(&self) -> Res<Token>;

    /// Returns the credential as currently held, without refreshing.
    async fn current_token(&self) -> Token;

    async fn current_user(&self) -> Res<User>;

    /// All playlists of `user_id`, every page drained.
    async fn list_playlists(&self, user_id: &str) -> Res<Vec<Playlist>>;

    /// All tracks of a playlist, every page drained.
    async fn list_playlist_tracks(&self, playlist_id: &str) -> Res<Vec<TrackRef>>;

    /// `None` when nothing is playing.
    async fn currently_playing(&self) -> Res<Option<NowPlaying>>;

    /// Removes every occurrence of `track`; a 404 counts as success.
    async fn remove_track(&self, playlist_id: &str, track: &TrackRef) -> Res<()>;

    /// Appends `track` to the end of the playlist.
    async fn add_track(&self, playlist_id: &str, track: &TrackRef) -> Res<()>;
}

/// [`PlaylistService`] backed by the Spotify Web API.
pub struct SpotifyClient {
    http: Client,
    config: Config,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Builds a client from a stored credential.
    ///
    /// Fails when the credential can never authenticate, which callers treat
    /// like a missing session.
    pub fn new(config: Config, http: Client, token: Token) -> Res<Self> {
        Ok(Self {
            http,
            config,
            tokens: Mutex::new(TokenManager::new(token)?),
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    pub(crate) async fn bearer(&self) -> Res<String> {
        let mut tokens = self.tokens.lock().await;
        let token = tokens.get_valid_token(&self.http, &self.config).await?;
        Ok(token.access_token.clone())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let token = self.bearer().await?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response, url).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Passes successful responses through and turns the rest into
/// [`Error::Api`] with Spotify's error message when there is one.
pub(crate) async fn check_status(response: Response, endpoint: &str) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    };

    Err(Error::Api {
        status: status.as_u16(),
        endpoint: endpoint.to_string(),
        message,
    })
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    async fn token(&self) -> Res<Token> {
        let mut tokens = self.tokens.lock().await;
        let token = tokens.get_valid_token(&self.http, &self.config).await?;
        Ok(token.clone())
    }

    async fn current_token(&self) -> Token {
        self.tokens.lock().await.current_token().clone()
    }

    async fn current_user(&self) -> Res<User> {
        users::get_current_user(self).await
    }

    async fn list_playlists(&self, user_id: &str) -> Res<Vec<Playlist>> {
        playlist::get_user_playlists(self, user_id).await
    }

    async fn list_playlist_tracks(&self, playlist_id: &str) -> Res<Vec<TrackRef>> {
        playlist::get_playlist_tracks(self, playlist_id).await
    }

    async fn currently_playing(&self) -> Res<Option<NowPlaying>> {
        player::get_currently_playing(self).await
    }

    async fn remove_track(&self, playlist_id: &str, track: &TrackRef) -> Res<()> {
        playlist::remove_track(self, playlist_id, track).await
    }

    async fn add_track(&self, playlist_id: &str, track: &TrackRef) -> Res<()> {
        playlist::add_track(self, playlist_id, track).await
    }
}
