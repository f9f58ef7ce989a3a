use chrono::{TimeZone, Utc};

use bumplist::{
    Error,
    management::SessionStore,
    types::{Session, Token},
};

fn create_test_session(playlist_name: &str) -> Session {
    Session {
        token: Token {
            access_token: "BQC-access/+=".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: "AQD-refresh".to_string(),
            expiry: Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 5).unwrap(),
            scope: "user-read-private playlist-modify-public".to_string(),
        },
        playlist_name: playlist_name.to_string(),
    }
}

#[tokio::test]
async fn test_persist_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("nested/dir/session.json"));
    let session = create_test_session("Played Tracks ✓");

    store.persist(&session).await.unwrap();
    let loaded = store.load().await.unwrap();

    assert_eq!(loaded, session);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    let err = store.load().await.unwrap_err();

    assert!(matches!(err, Error::SessionNotFound(path) if path == dir.path().join("session.json")));
}

#[tokio::test]
async fn test_corrupt_file_is_reported_as_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = SessionStore::new(path).load().await.unwrap_err();

    assert!(matches!(err, Error::SessionCorrupt { .. }));
}

#[tokio::test]
async fn test_file_uses_the_documented_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    SessionStore::new(path.clone())
        .persist(&create_test_session("Mix"))
        .await
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["playlistName"], "Mix");
    assert_eq!(json["token"]["access_token"], "BQC-access/+=");
    assert_eq!(json["token"]["refresh_token"], "AQD-refresh");
    assert_eq!(json["token"]["token_type"], "Bearer");
    assert_eq!(json["token"]["expiry"], "2026-10-18T12:30:05Z");
}

#[tokio::test]
async fn test_missing_playlist_name_loads_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{"token":{"access_token":"a","token_type":"Bearer","refresh_token":"r","expiry":"2026-01-01T00:00:00Z"}}"#,
    )
    .unwrap();

    let session = SessionStore::new(path).load().await.unwrap();

    assert!(!session.has_playlist());
    assert_eq!(session.token.scope, "");
}

#[tokio::test]
async fn test_persist_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();

    // a regular file where a directory is expected
    let store = SessionStore::new(blocker.join("session.json"));

    assert!(store.persist(&create_test_session("Mix")).await.is_err());
}
