use std::{collections::HashMap, path::PathBuf, time::Duration};

use bumplist::{
    Error,
    config::{self, Config},
};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_defaults_apply_when_only_client_id_is_set() {
    let config = Config::from_vars(vars(&[("SPOTIFY_API_AUTH_CLIENT_ID", "client")])).unwrap();

    assert_eq!(config.client_id, "client");
    assert_eq!(config.redirect_uri, config::DEFAULT_REDIRECT_URI);
    assert_eq!(config.server_addr, config::DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.scope, config::DEFAULT_SCOPE);
    assert_eq!(config.auth_url, config::DEFAULT_AUTH_URL);
    assert_eq!(config.token_url, config::DEFAULT_TOKEN_URL);
    assert_eq!(config.api_url, config::DEFAULT_API_URL);
    assert_eq!(config.session_path, config::config_dir().join("session.json"));
    assert_eq!(config.auth_timeout, None);
}

#[test]
fn test_missing_client_id_is_an_error() {
    let err = Config::from_vars(vars(&[])).unwrap_err();
    assert!(matches!(err, Error::MissingConfig("SPOTIFY_API_AUTH_CLIENT_ID")));

    let err = Config::from_vars(vars(&[("SPOTIFY_API_AUTH_CLIENT_ID", "  ")])).unwrap_err();
    assert!(matches!(err, Error::MissingConfig(_)));
}

#[test]
fn test_overrides_are_used() {
    let config = Config::from_vars(vars(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
        ("SPOTIFY_API_URL", "http://127.0.0.1:9999/v1/"),
        ("SERVER_ADDRESS", "127.0.0.1:9000"),
        ("BUMPLIST_SESSION_FILE", "/tmp/bumplist-session.json"),
        ("BUMPLIST_AUTH_TIMEOUT", "90"),
    ]))
    .unwrap();

    assert_eq!(config.api_url, "http://127.0.0.1:9999/v1");
    assert_eq!(config.server_addr, "127.0.0.1:9000");
    assert_eq!(
        config.session_path,
        PathBuf::from("/tmp/bumplist-session.json")
    );
    assert_eq!(config.auth_timeout, Some(Duration::from_secs(90)));
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let err = Config::from_vars(vars(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
        ("BUMPLIST_AUTH_TIMEOUT", "soon"),
    ]))
    .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidConfig {
            name: "BUMPLIST_AUTH_TIMEOUT",
            ..
        }
    ));
}
