use reqwest::StatusCode;

use crate::{
    Res,
    spotify::{SpotifyClient, check_status, paging},
    types::{
        AddTrackToPlaylistRequest, Page, Playlist, PlaylistItem, RemoveTracksRequest,
        SnapshotResponse, TrackRef, TrackUri,
    },
};

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 100;

/// Lists every playlist owned or followed by `user_id`.
///
/// Uses `GET /users/{user_id}/playlists` and follows the `next` URL of each
/// page until Spotify reports no further page. The playlists keep the order
/// in which the API returned them.
pub async fn get_user_playlists(client: &SpotifyClient, user_id: &str) -> Res<Vec<Playlist>> {
    let first = client.url(&format!(
        "/users/{user_id}/playlists?limit={limit}",
        limit = PLAYLIST_PAGE_LIMIT
    ));

    paging::drain(|cursor| {
        let url = cursor.unwrap_or_else(|| first.clone());
        async move { client.get_json::<Page<Playlist>>(&url).await }
    })
    .await
}

/// Lists every track of a playlist.
///
/// Entries whose track is null (no longer available in the catalogue) are
/// skipped.
pub async fn get_playlist_tracks(client: &SpotifyClient, playlist_id: &str) -> Res<Vec<TrackRef>> {
    let first = client.url(&format!(
        "/playlists/{playlist_id}/tracks?limit={limit}&fields=items(track(id,uri,name,artists(name))),next",
        limit = TRACK_PAGE_LIMIT
    ));

    let items = paging::drain(|cursor| {
        let url = cursor.unwrap_or_else(|| first.clone());
        async move { client.get_json::<Page<PlaylistItem>>(&url).await }
    })
    .await?;

    Ok(items.into_iter().filter_map(|item| item.track).collect())
}

/// Removes all occurrences of `track` from the playlist.
///
/// A `404 Not Found` is accepted: the track is gone either way, and the
/// following add still leaves it at the end exactly once.
pub async fn remove_track(client: &SpotifyClient, playlist_id: &str, track: &TrackRef) -> Res<()> {
    let url = client.url(&format!("/playlists/{playlist_id}/tracks"));
    let token = client.bearer().await?;
    let body = RemoveTracksRequest {
        tracks: vec![TrackUri {
            uri: track.uri.clone(),
        }],
    };

    log::debug!("DELETE {} ({})", url, track.uri);
    let response = client
        .http()
        .delete(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    if response.status() == StatusCode::NOT_FOUND {
        log::debug!("{} not found in playlist {}, nothing removed", track.uri, playlist_id);
        return Ok(());
    }

    let response = check_status(response, &url).await?;
    if let Ok(snapshot) = response.json::<SnapshotResponse>().await {
        log::debug!("playlist {} now at snapshot {}", playlist_id, snapshot.snapshot_id);
    }
    Ok(())
}

/// Appends `track` to the end of the playlist.
pub async fn add_track(client: &SpotifyClient, playlist_id: &str, track: &TrackRef) -> Res<()> {
    let url = client.url(&format!("/playlists/{playlist_id}/tracks"));
    let token = client.bearer().await?;
    let body = AddTrackToPlaylistRequest {
        uris: vec![track.uri.clone()],
    };

    log::debug!("POST {} ({})", url, track.uri);
    let response = client
        .http()
        .post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    let response = check_status(response, &url).await?;
    if let Ok(snapshot) = response.json::<SnapshotResponse>().await {
        log::debug!("playlist {} now at snapshot {}", playlist_id, snapshot.snapshot_id);
    }
    Ok(())
}
