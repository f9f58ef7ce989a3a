use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// OAuth credential as persisted in the session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
    #[serde(default)]
    pub scope: String,
}

/// Body of a successful response from the accounts token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn bearer() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    /// Turns the response into a [`Token`] obtained at `now`.
    ///
    /// Refresh responses may omit the refresh token, in which case
    /// `previous_refresh` is kept.
    pub fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            expiry: now + Duration::seconds(self.expires_in),
            scope: self.scope.unwrap_or_default(),
        }
    }
}

/// The only persisted entity: the credential plus the chosen playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Token,
    #[serde(default)]
    pub playlist_name: String,
}

impl Session {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            playlist_name: String::new(),
        }
    }

    pub fn has_playlist(&self) -> bool {
        !self.playlist_name.is_empty()
    }
}

/// Spotify's paging object; `next` is the absolute URL of the next page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

/// A track (or episode) as referenced by the player or a playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRef {
    pub id: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

impl std::fmt::Display for TrackRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.artists.is_empty() {
            return write!(f, "{}", self.name);
        }
        let artists: Vec<&str> = self.artists.iter().map(|a| a.name.as_str()).collect();
        write!(f, "{} by {}", self.name, artists.join(", "))
    }
}

/// An entry of `GET /playlists/{id}/tracks`; `track` is null for items
/// removed from the catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    pub item: Option<TrackRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub is_playing: bool,
    pub track: TrackRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error body returned by the Web API: `{"error": {"status", "message"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}

/// Query parameters of the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
