use std::{future, sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use tokio::sync::{Mutex, oneshot};

use crate::{
    Error, Res,
    api::CallbackState,
    config::Config,
    info,
    server::{bind_callback_listener, start_callback_server},
    types::{Token, TokenResponse},
    utils, warning,
};

/// Runs the complete OAuth 2.0 authorization code flow with PKCE.
///
/// 1. Generates the PKCE verifier/challenge and the anti-forgery state token
/// 2. Binds the local callback server and starts it in the background
/// 3. Opens the authorization URL in the user's browser (or prints it)
/// 4. Waits for the callback handler to deliver the outcome over a one-shot
///    channel
/// 5. Shuts the callback server down
///
/// # Cancellation
///
/// The wait ends with [`Error::AuthorizationTimedOut`] if
/// `BUMPLIST_AUTH_TIMEOUT` is configured and elapses. Without a timeout the
/// wait is unbounded; Ctrl-C is handled for the whole run by the caller.
pub async fn authorize(config: &Config, http: &Client) -> Res<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let listener = bind_callback_listener(&config.server_addr).await?;

    let (token_tx, token_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let callback_state = CallbackState {
        config: config.clone(),
        http: http.clone(),
        expected_state: state.clone(),
        code_verifier,
        result_tx: Arc::new(Mutex::new(Some(token_tx))),
    };

    let server = tokio::spawn(async move {
        if let Err(e) = start_callback_server(listener, callback_state, shutdown_rx).await {
            log::error!("callback server stopped: {}", e);
        }
    });

    let auth_url = authorization_url(config, &code_challenge, &state)?;
    info!("Opening the Spotify authorization page in your browser");
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message("Waiting for authorization in the browser...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = tokio::select! {
        received = token_rx => received.unwrap_or(Err(Error::AuthorizationAborted)),
        secs = deadline(config.auth_timeout) => Err(Error::AuthorizationTimedOut(secs)),
    };
    spinner.finish_and_clear();

    match &outcome {
        // lets the confirmation page finish before the listener closes
        Ok(_) => {
            let _ = shutdown_tx.send(());
        }
        Err(_) => server.abort(),
    }

    outcome
}

async fn deadline(timeout: Option<Duration>) -> u64 {
    match timeout {
        Some(timeout) => {
            tokio::time::sleep(timeout).await;
            timeout.as_secs()
        }
        None => future::pending().await,
    }
}

/// Builds the URL of Spotify's authorization page for this run.
pub fn authorization_url(config: &Config, code_challenge: &str, state: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::InvalidConfig {
        name: "SPOTIFY_API_AUTH_URL",
        reason: e.to_string(),
    })?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for a credential using the PKCE verifier
/// generated at the start of the flow.
pub async fn exchange_code_pkce(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Res<Token> {
    let form = [
        ("grant_type", "authorization_code"),
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = request_token(http, config, &form).await?;
    Ok(response.into_token(Utc::now(), None))
}

/// Exchanges the refresh token for a new access token.
///
/// Spotify may rotate the refresh token; if the response carries none the
/// previous one is kept.
pub async fn refresh_token(http: &Client, config: &Config, token: &Token) -> Res<Token> {
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", token.refresh_token.as_str()),
        ("client_id", config.client_id.as_str()),
    ];

    let response = request_token(http, config, &form).await?;
    log::debug!("access token refreshed");
    Ok(response.into_token(Utc::now(), Some(&token.refresh_token)))
}

async fn request_token(http: &Client, config: &Config, form: &[(&str, &str)]) -> Res<TokenResponse> {
    let response = http.post(&config.token_url).form(form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::TokenExchange(format!("{}: {}", status, body)));
    }

    serde_json::from_str(&body).map_err(|e| Error::TokenExchange(e.to_string()))
}
