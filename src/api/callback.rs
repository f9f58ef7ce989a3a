use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use reqwest::Client;
use tokio::sync::{Mutex, oneshot};

use crate::{
    Error, Res,
    config::Config,
    spotify,
    types::{CallbackParams, Token},
    warning,
};

const LOGIN_SUCCESSFUL: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <title>Login Successful</title>
        <meta charset="UTF-8">
    </head>
    <body>
        <h1>Login Successful</h1>
        <p>If this page isn't automatically closing you can close it now.</p>
        <script>
            window.close();
        </script>
    </body>
</html>
"#;

const LOGIN_FAILED: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <title>Login Failed</title>
        <meta charset="UTF-8">
    </head>
    <body>
        <h1>Login Failed</h1>
        <p>Check the terminal for details.</p>
    </body>
</html>
"#;

const ALREADY_HANDLED: &str = "<h4>Authorization was already handled. You can close this page.</h4>";

/// Everything the callback handler needs for one authorization attempt.
#[derive(Clone)]
pub struct CallbackState {
    pub config: Config,
    pub http: Client,
    /// Anti-forgery token sent with the authorization request.
    pub expected_state: String,
    pub code_verifier: String,
    /// Taken by the first callback, so the outcome is delivered exactly once.
    pub result_tx: Arc<Mutex<Option<oneshot::Sender<Res<Token>>>>>,
}

/// Handles Spotify's redirect after the user authorized (or denied) access.
///
/// The first request validates the state token, exchanges the code and hands
/// the outcome to the waiting flow. A state mismatch is delivered as an error
/// and the code is never exchanged.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<CallbackState>,
) -> (StatusCode, Html<&'static str>) {
    let mut result_tx = shared_state.result_tx.lock().await;
    let Some(tx) = result_tx.take() else {
        return (StatusCode::CONFLICT, Html(ALREADY_HANDLED));
    };

    let outcome = complete_authorization(&params, &shared_state).await;
    let response = match &outcome {
        Ok(_) => (StatusCode::OK, Html(LOGIN_SUCCESSFUL)),
        Err(Error::StateMismatch { .. }) => (StatusCode::FORBIDDEN, Html(LOGIN_FAILED)),
        Err(e) => {
            warning!("Authorization failed: {}", e);
            (StatusCode::BAD_REQUEST, Html(LOGIN_FAILED))
        }
    };

    if tx.send(outcome).is_err() {
        log::warn!("authorization result arrived after the flow stopped waiting");
    }

    response
}

async fn complete_authorization(params: &CallbackParams, shared_state: &CallbackState) -> Res<Token> {
    let received = params.state.clone().unwrap_or_default();
    if received != shared_state.expected_state {
        return Err(Error::StateMismatch {
            expected: shared_state.expected_state.clone(),
            received,
        });
    }

    if let Some(error) = &params.error {
        return Err(Error::AuthorizationDenied(error.clone()));
    }

    let code = params.code.as_deref().ok_or(Error::MissingCode)?;

    spotify::auth::exchange_code_pkce(
        &shared_state.http,
        &shared_state.config,
        code,
        &shared_state.code_verifier,
    )
    .await
}
