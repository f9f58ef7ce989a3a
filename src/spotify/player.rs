use reqwest::StatusCode;

use crate::{
    Res,
    spotify::{SpotifyClient, check_status},
    types::{CurrentlyPlayingResponse, NowPlaying},
};

/// Retrieves the item currently playing for the authenticated user.
///
/// Spotify answers `204 No Content` when there is no active playback and may
/// return a null `item` (for example during ads or for unsupported item
/// types). Both are reported as `Ok(None)`, not as an error.
///
/// # Errors
///
/// Network failures and any non-success status other than 204 are
/// propagated.
pub async fn get_currently_playing(client: &SpotifyClient) -> Res<Option<NowPlaying>> {
    let url = client.url("/me/player/currently-playing");
    let token = client.bearer().await?;

    log::debug!("GET {}", url);
    let response = client.http().get(&url).bearer_auth(token).send().await?;
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let response = check_status(response, &url).await?;
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let playing: CurrentlyPlayingResponse = serde_json::from_str(&body)?;
    Ok(playing.item.map(|track| NowPlaying {
        is_playing: playing.is_playing,
        track,
    }))
}
