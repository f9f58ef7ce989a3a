use reqwest::Client;

use crate::{
    Error, Res, StepExt,
    config::Config,
    info,
    management::SessionStore,
    spotify::{self, SpotifyClient},
    success,
    types::Session,
};

/// Loads the stored session or, when there is none usable, runs the browser
/// authorization and starts a fresh session without a chosen playlist.
pub async fn obtain_session(
    store: &SessionStore,
    config: &Config,
    http: &Client,
) -> Res<(Session, SpotifyClient)> {
    let path = store.path().display();
    match store.load().await {
        Ok(session) => match SpotifyClient::new(config.clone(), http.clone(), session.token.clone()) {
            Ok(client) => return Ok((session, client)),
            Err(e) => info!(
                "Could not create client from data in file {} ({}), processing with initial setup",
                path, e
            ),
        },
        Err(Error::SessionNotFound(_)) => {
            info!("No session file {} found, processing with initial setup", path)
        }
        Err(Error::SessionCorrupt { source, .. }) => info!(
            "Could not parse session file {} ({}), processing with initial setup",
            path, source
        ),
        Err(e) => info!(
            "Could not read session file {} ({}), processing with initial setup",
            path, e
        ),
    }

    let token = spotify::auth::authorize(config, http).await.step("authorize")?;
    success!("Authentication successful!");

    let client = SpotifyClient::new(config.clone(), http.clone(), token.clone())?;
    Ok((Session::new(token), client))
}
