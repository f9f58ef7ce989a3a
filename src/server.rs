use std::{net::SocketAddr, str::FromStr};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::oneshot};

use crate::{Error, Res, api};

/// Binds the callback listener before the browser is opened, so the redirect
/// can never arrive at a closed port.
pub async fn bind_callback_listener(server_addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(server_addr).map_err(|e| Error::InvalidConfig {
        name: "SERVER_ADDRESS",
        reason: e.to_string(),
    })?;

    let listener = TcpListener::bind(&addr).await?;
    log::debug!("callback server listening on {}", addr);
    Ok(listener)
}

pub fn router(state: api::CallbackState) -> Router {
    Router::new().route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the callback route until `shutdown` fires (or its sender is
/// dropped), finishing in-flight responses first.
pub async fn start_callback_server(
    listener: TcpListener,
    state: api::CallbackState,
    shutdown: oneshot::Receiver<()>,
) -> Res<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await?;
    Ok(())
}
