use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use bumplist::{
    Error,
    config::Config,
    spotify::{PlaylistService, SpotifyClient},
    types::{Token, TrackRef},
};

struct FakeApi {
    base: String,
    playing: Option<Value>,
    playlist_requests: AtomicUsize,
    removed: Mutex<Vec<(String, Value)>>,
    added: Mutex<Vec<(String, Value)>>,
}

type Shared = State<Arc<FakeApi>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer access")
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error": {"status": status.as_u16(), "message": message}})),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return api_error(StatusCode::UNAUTHORIZED, "Invalid access token");
    }
    Json(json!({"id": "user-1", "display_name": "Tester"})).into_response()
}

async fn playlists(
    State(api): Shared,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    api.playlist_requests.fetch_add(1, Ordering::SeqCst);
    if user_id == "blocked" {
        return api_error(StatusCode::FORBIDDEN, "Forbidden");
    }

    match query.get("offset").map(String::as_str) {
        None => Json(json!({
            "items": [{"id": "p1", "name": "Played"}, {"id": "p2", "name": "Chill"}],
            "next": format!("{}/users/{}/playlists?offset=2&limit=2", api.base, user_id),
        }))
        .into_response(),
        Some("2") => Json(json!({
            "items": [{"id": "p3", "name": "Workout"}],
            "next": null,
        }))
        .into_response(),
        Some(_) => api_error(StatusCode::BAD_REQUEST, "unexpected page"),
    }
}

async fn playlist_tracks(
    State(api): Shared,
    Path(playlist_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match query.get("offset").map(String::as_str) {
        None => Json(json!({
            "items": [
                {"track": {"id": "t1", "uri": "spotify:track:t1", "name": "One", "artists": [{"name": "A"}]}},
                {"track": null},
            ],
            "next": format!("{}/playlists/{}/tracks?offset=2", api.base, playlist_id),
        }))
        .into_response(),
        Some(_) => Json(json!({
            "items": [{"track": {"id": "t2", "uri": "spotify:track:t2", "name": "Two"}}],
            "next": null,
        }))
        .into_response(),
    }
}

async fn remove_tracks(
    State(api): Shared,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if playlist_id == "missing" {
        return api_error(StatusCode::NOT_FOUND, "Not found");
    }
    if playlist_id == "readonly" {
        return api_error(StatusCode::FORBIDDEN, "You cannot remove tracks from a playlist you don't own.");
    }
    api.removed.lock().unwrap().push((playlist_id, body));
    Json(json!({"snapshot_id": "snap-1"})).into_response()
}

async fn add_tracks(
    State(api): Shared,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    api.added.lock().unwrap().push((playlist_id, body));
    (StatusCode::CREATED, Json(json!({"snapshot_id": "snap-2"}))).into_response()
}

async fn currently_playing(State(api): Shared) -> Response {
    match &api.playing {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn start_fake_api(playing: Option<Value>) -> (Arc<FakeApi>, SpotifyClient) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/v1", listener.local_addr().unwrap());

    let api = Arc::new(FakeApi {
        base: base.clone(),
        playing,
        playlist_requests: AtomicUsize::new(0),
        removed: Mutex::new(Vec::new()),
        added: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/v1/me", get(me))
        .route("/v1/users/{user_id}/playlists", get(playlists))
        .route(
            "/v1/playlists/{playlist_id}/tracks",
            get(playlist_tracks).delete(remove_tracks).post(add_tracks),
        )
        .route("/v1/me/player/currently-playing", get(currently_playing))
        .with_state(Arc::clone(&api));
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let config = Config::from_vars(|name| match name {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("client-id".to_string()),
        "SPOTIFY_API_URL" => Some(base.clone()),
        _ => None,
    })
    .unwrap();

    let token = Token {
        access_token: "access".to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: "refresh".to_string(),
        expiry: Utc::now() + Duration::hours(1),
        scope: String::new(),
    };
    let client = SpotifyClient::new(config, reqwest::Client::new(), token).unwrap();

    (api, client)
}

fn track(id: &str) -> TrackRef {
    TrackRef {
        id: Some(id.to_string()),
        uri: format!("spotify:track:{id}"),
        name: "Song".to_string(),
        artists: Vec::new(),
    }
}

#[tokio::test]
async fn test_current_user_sends_bearer_token() {
    let (_, client) = start_fake_api(None).await;

    let user = client.current_user().await.unwrap();

    assert_eq!(user.id, "user-1");
}

#[tokio::test]
async fn test_list_playlists_drains_every_page_once() {
    let (api, client) = start_fake_api(None).await;

    let playlists = client.list_playlists("user-1").await.unwrap();

    let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Played", "Chill", "Workout"]);
    assert_eq!(api.playlist_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_api_errors_carry_status_and_message() {
    let (_, client) = start_fake_api(None).await;

    let err = client.list_playlists("blocked").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Api { status: 403, ref message, .. } if message == "Forbidden"
    ));
}

#[tokio::test]
async fn test_list_playlist_tracks_skips_unavailable_entries() {
    let (_, client) = start_fake_api(None).await;

    let tracks = client.list_playlist_tracks("p1").await.unwrap();

    let ids: Vec<Option<&str>> = tracks.iter().map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("t1"), Some("t2")]);
    assert_eq!(tracks[0].to_string(), "One by A");
}

#[tokio::test]
async fn test_nothing_playing_is_none() {
    let (_, client) = start_fake_api(None).await;

    assert_eq!(client.currently_playing().await.unwrap(), None);
}

#[tokio::test]
async fn test_null_item_is_none() {
    let (_, client) = start_fake_api(Some(json!({"is_playing": true, "item": null}))).await;

    assert_eq!(client.currently_playing().await.unwrap(), None);
}

#[tokio::test]
async fn test_currently_playing_track() {
    let (_, client) = start_fake_api(Some(json!({
        "is_playing": true,
        "item": {"id": "t9", "uri": "spotify:track:t9", "name": "Nine", "artists": [{"name": "B"}]}
    })))
    .await;

    let playing = client.currently_playing().await.unwrap().unwrap();

    assert!(playing.is_playing);
    assert_eq!(playing.track.id.as_deref(), Some("t9"));
    assert_eq!(playing.track.uri, "spotify:track:t9");
}

#[tokio::test]
async fn test_remove_and_add_send_track_uris() {
    let (api, client) = start_fake_api(None).await;

    client.remove_track("p1", &track("t1")).await.unwrap();
    client.add_track("p1", &track("t1")).await.unwrap();

    let removed = api.removed.lock().unwrap().clone();
    let added = api.added.lock().unwrap().clone();
    assert_eq!(
        removed,
        vec![(
            "p1".to_string(),
            json!({"tracks": [{"uri": "spotify:track:t1"}]})
        )]
    );
    assert_eq!(
        added,
        vec![("p1".to_string(), json!({"uris": ["spotify:track:t1"]}))]
    );
}

#[tokio::test]
async fn test_remove_not_found_is_accepted() {
    let (_, client) = start_fake_api(None).await;

    assert!(client.remove_track("missing", &track("t1")).await.is_ok());
}

#[tokio::test]
async fn test_remove_other_errors_are_surfaced() {
    let (_, client) = start_fake_api(None).await;

    let err = client.remove_track("readonly", &track("t1")).await.unwrap_err();

    assert!(matches!(err, Error::Api { status: 403, .. }));
}
