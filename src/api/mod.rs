//! # API Module
//!
//! HTTP endpoints of the local server that receives Spotify's OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - Completes the authorization code flow: checks the
//!   anti-forgery state, exchanges the code for a token using the PKCE
//!   verifier and hands the result to the waiting authorization flow.
//!
//! The handler gets its per-run data from a [`CallbackState`] extension
//! instead of globals, so each authorization attempt is self-contained.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use bumplist::api::{callback, CallbackState};
//!
//! let app = Router::new().route("/callback", get(callback).layer(Extension(state)));
//! ```

mod callback;

pub use callback::{CallbackState, callback};
