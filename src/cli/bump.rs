use crate::{
    Error, Res, StepExt,
    cli::select::PlaylistSelector,
    info,
    spotify::PlaylistService,
    success,
    types::{Playlist, Session, TrackRef},
    utils,
};

#[derive(Debug, Clone, Default)]
pub struct BumpOptions {
    /// Choose the playlist again even if one is stored.
    pub reset: bool,
    /// Only remove the track, do not add it back.
    pub remove_only: bool,
    /// Only report whether the track is in the playlist.
    pub check_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NothingPlaying,
    Removed { track: TrackRef, playlist: Playlist },
    Bumped { track: TrackRef, playlist: Playlist },
    Checked {
        track: TrackRef,
        playlist: Playlist,
        /// Zero based position of the first occurrence.
        position: Option<usize>,
        total: usize,
    },
}

/// Performs one run against an authenticated service.
///
/// The session is updated in place (refreshed token, chosen playlist); the
/// caller persists it whatever this returns.
pub async fn bump(
    api: &dyn PlaylistService,
    selector: &dyn PlaylistSelector,
    session: &mut Session,
    options: &BumpOptions,
) -> Res<Outcome> {
    session.token = api.token().await.step("refresh credential")?;

    let user = api.current_user().await.step("fetch current user")?;
    let playlists = api
        .list_playlists(&user.id)
        .await
        .step("list playlists")?;
    log::debug!("{} has {} playlists", user.id, playlists.len());

    if options.reset || !session.has_playlist() {
        if playlists.is_empty() {
            return Err(Error::NoPlaylists);
        }
        session.playlist_name = selector
            .select(&utils::playlist_names(&playlists))
            .step("select playlist")?;
        info!("Using playlist {:?}", session.playlist_name);
    }

    let playlist = resolve_playlist(&session.playlist_name, &playlists)
        .step("resolve playlist")?
        .clone();

    let Some(now_playing) = api
        .currently_playing()
        .await
        .step("fetch currently playing")?
    else {
        info!("Currently not playing a song");
        return Ok(Outcome::NothingPlaying);
    };
    let track = now_playing.track;
    let Some(track_id) = track.id.clone() else {
        return Err(Error::UnidentifiedTrack(track.uri));
    };

    if options.check_only {
        let tracks = api
            .list_playlist_tracks(&playlist.id)
            .await
            .step("list playlist tracks")?;
        let position = tracks
            .iter()
            .position(|t| t.id.as_deref() == Some(track_id.as_str()));
        match position {
            Some(index) => info!(
                "{} is track {} of {} in {}",
                track,
                index + 1,
                tracks.len(),
                playlist.name
            ),
            None => info!("{} is not in {}", track, playlist.name),
        }
        return Ok(Outcome::Checked {
            track,
            playlist,
            position,
            total: tracks.len(),
        });
    }

    api.remove_track(&playlist.id, &track)
        .await
        .step("remove track")?;

    if options.remove_only {
        success!("Removed {} from {}", track, playlist.name);
        return Ok(Outcome::Removed { track, playlist });
    }

    api.add_track(&playlist.id, &track).await.step("add track")?;
    success!("Moved {} to the end of {}", track, playlist.name);
    Ok(Outcome::Bumped { track, playlist })
}

/// Finds the playlist called `name`; an ambiguous name is an error rather
/// than a silent pick.
pub fn resolve_playlist<'a>(name: &str, playlists: &'a [Playlist]) -> Res<&'a Playlist> {
    let mut matches = playlists.iter().filter(|p| p.name == name);
    match (matches.next(), matches.count()) {
        (Some(playlist), 0) => Ok(playlist),
        (Some(_), others) => Err(Error::DuplicatePlaylistName {
            name: name.to_string(),
            count: others + 1,
        }),
        (None, _) => Err(Error::PlaylistNotFound(name.to_string())),
    }
}
