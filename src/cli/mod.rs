//! # CLI Module
//!
//! The user-facing side of bumplist: a single run that moves the currently
//! playing track to the end of the chosen playlist.
//!
//! ## Run sequence
//!
//! 1. **Session**: load the stored session or authorize in the browser
//!    ([`obtain_session`])
//! 2. **Bump**: refresh the token, resolve the playlist (prompting if needed),
//!    remove the playing track and add it again ([`bump`])
//! 3. **Persist**: write the session back, on success and on failure alike
//!
//! ## Error Handling
//!
//! Nothing playing is a successful run. Every other failure aborts the run,
//! but the session is still written so a refreshed token or a freshly chosen
//! playlist is not lost.

mod auth;
mod bump;
mod select;

pub use auth::obtain_session;
pub use bump::{BumpOptions, Outcome, bump, resolve_playlist};
pub use select::{PlaylistSelector, PromptSelector};

use std::{future::Future, io};

use reqwest::Client;

use crate::{
    Error, Res, StepExt, config::Config, management::SessionStore, spotify::PlaylistService,
    warning,
};

/// Runs one bump end to end and persists the session afterwards.
///
/// When both the run and the save fail, the run's error is returned and the
/// save failure is printed as a warning.
pub async fn run(config: Config, options: BumpOptions) -> Res<Outcome> {
    let store = SessionStore::new(config.session_path.clone());
    let http = Client::new();

    let (mut session, client) = obtain_session(&store, &config, &http).await?;

    let outcome = bump(&client, &PromptSelector::default(), &mut session, &options).await;
    session.token = client.current_token().await;

    let saved = store.persist(&session).await.step("save session");
    match (outcome, saved) {
        (Ok(outcome), Ok(())) => Ok(outcome),
        (Err(e), Ok(())) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(save_error)) => {
            warning!("{}", save_error);
            Err(e)
        }
    }
}

/// Drives `run` until it finishes or `interrupt` (Ctrl-C in `main`) fires,
/// whichever comes first. An interrupt ends the run with
/// [`Error::Interrupted`] and drops it mid-flight.
///
/// If the interrupt listener itself fails, the run continues unguarded.
pub async fn until_interrupted<T, R, I>(run: R, interrupt: I) -> Res<T>
where
    R: Future<Output = Res<T>>,
    I: Future<Output = io::Result<()>>,
{
    let interrupted = async {
        if let Err(e) = interrupt.await {
            log::warn!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = run => result,
        _ = interrupted => Err(Error::Interrupted),
    }
}
