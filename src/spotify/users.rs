use crate::{Res, spotify::SpotifyClient, types::User};

/// Fetches the profile of the user the credential belongs to (`GET /me`).
pub async fn get_current_user(client: &SpotifyClient) -> Res<User> {
    client.get_json(&client.url("/me")).await
}
