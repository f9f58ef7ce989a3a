use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::Playlist;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Anti-forgery token round-tripped through the authorization redirect.
pub fn generate_state() -> String {
    random_alphanumeric(16)
}

pub fn playlist_names(playlists: &[Playlist]) -> Vec<String> {
    playlists.iter().map(|p| p.name.clone()).collect()
}

/// Case-insensitive substring filter that keeps the input order.
pub fn filter_names(names: &[String], query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
