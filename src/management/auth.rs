use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

use crate::{Error, Res, config::Config, spotify, types::Token};

/// Seconds before the real expiry at which a token counts as expired.
const EXPIRY_MARGIN_SECS: i64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    /// Wraps a stored credential, rejecting one that can never authenticate.
    pub fn new(token: Token) -> Res<Self> {
        if token.access_token.is_empty() && token.refresh_token.is_empty() {
            return Err(Error::InvalidCredential(
                "neither an access token nor a refresh token is present".to_string(),
            ));
        }
        Ok(TokenManager { token })
    }

    /// Returns a token that is valid for at least the expiry margin,
    /// refreshing it first when needed. Refresh may rotate the refresh token.
    pub async fn get_valid_token(&mut self, http: &Client, config: &Config) -> Res<&Token> {
        if self.is_expired() {
            if self.token.refresh_token.is_empty() {
                return Err(Error::InvalidCredential(
                    "access token expired and no refresh token is stored".to_string(),
                ));
            }
            log::debug!("access token expired at {}, refreshing", self.token.expiry);
            self.token = spotify::auth::refresh_token(http, config, &self.token).await?;
        }

        Ok(&self.token)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.token.expiry - Duration::seconds(EXPIRY_MARGIN_SECS)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
