//! Spotify authorization-code OAuth flow.
//!
//! The user opens the authorization URL, approves access and pastes the URL
//! the browser was redirected to. The code in it is exchanged for tokens,
//! which are cached in the cache directory and refreshed when they expire.

use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{info, warn};

use super::types::{TokenRecord, TokenResponse};
use crate::cache::JsonStore;
use crate::config::SpotifyCredentials;
use crate::error::{AppError, Result};

/// Authorization page of the Spotify accounts service.
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Token endpoint of the Spotify accounts service.
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scopes needed to read liked songs and write playlists.
pub const SCOPES: &str = "user-library-read playlist-modify-public playlist-modify-private";

/// Key of the token record inside the cache directory.
pub const TOKEN_FILE: &str = "token";

/// OAuth helper for one set of client credentials.
pub struct SpotifyAuth {
    http: Client,
    credentials: SpotifyCredentials,
    store: JsonStore,
}

impl SpotifyAuth {
    /// Creates the helper, caching tokens in `cache_dir`.
    pub fn new(
        credentials: SpotifyCredentials,
        cache_dir: &Path,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::transport("Creating accounts HTTP client", e))?;

        Ok(Self {
            http,
            credentials,
            store: JsonStore::new(cache_dir),
        })
    }

    /// Returns the URL the user must open to grant access.
    pub fn authorize_url(&self) -> Result<Url> {
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| AppError::auth_failed(format!("could not build authorization URL: {}", e)))
    }

    /// Returns the cached token record, if any.
    pub fn cached_token(&self) -> Option<TokenRecord> {
        self.store.load(TOKEN_FILE)
    }

    /// Returns a usable access token.
    ///
    /// Uses the cached token while valid, then tries the refresh token, and
    /// finally runs the interactive flow: `prompt` receives the authorization
    /// URL and must return the redirect URL pasted by the user.
    pub fn access_token<F>(&self, prompt: F) -> Result<String>
    where
        F: FnOnce(&str) -> io::Result<String>,
    {
        if let Some(token) = self.cached_token() {
            if token.is_valid_at(Utc::now()) {
                info!("Using cached Spotify access token");
                return Ok(token.access_token);
            }
            if let Some(refresh_token) = token.refresh_token {
                match self.refresh(&refresh_token) {
                    Ok(token) => {
                        info!("Refreshed Spotify access token");
                        return Ok(token.access_token);
                    }
                    Err(e) => warn!("Token refresh failed, re-authorizing: {}", e.message),
                }
            }
        }

        let url = self.authorize_url()?;
        let pasted = prompt(url.as_str())
            .map_err(|e| AppError::auth_failed(format!("could not read redirect URL: {}", e)))?;
        let code = parse_redirect_code(&pasted)?;
        let token = self.exchange_code(&code)?;
        info!("Spotify authorization complete");
        Ok(token.access_token)
    }

    /// Exchanges an authorization code for tokens and caches them.
    pub fn exchange_code(&self, code: &str) -> Result<TokenRecord> {
        let response = self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ])?;
        let token = TokenRecord::from_response(response, Utc::now(), None)?;
        self.store.save(TOKEN_FILE, &token);
        Ok(token)
    }

    /// Uses a refresh token to obtain a new access token and caches it.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenRecord> {
        let response = self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])?;
        let previous = Some(refresh_token.to_string());
        let token = TokenRecord::from_response(response, Utc::now(), previous)?;
        self.store.save(TOKEN_FILE, &token);
        Ok(token)
    }

    fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(form)
            .send()
            .map_err(|e| AppError::transport("Requesting Spotify token", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AppError::auth_failed(format!(
                "token endpoint returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        response
            .json()
            .map_err(|e| AppError::invalid_response("Spotify token endpoint", e))
    }
}

/// Extracts the authorization code from a pasted redirect URL.
pub fn parse_redirect_code(pasted: &str) -> Result<String> {
    let url = Url::parse(pasted.trim())
        .map_err(|e| AppError::auth_failed(format!("pasted text is not a URL: {}", e)))?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => {
                return Err(AppError::auth_failed(format!(
                    "Spotify returned error '{}'",
                    value
                )))
            }
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            _ => {}
        }
    }

    code.ok_or_else(|| AppError::auth_failed("redirect URL has no 'code' parameter"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    fn credentials() -> SpotifyCredentials {
        SpotifyCredentials {
            client_id: "client123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://127.0.0.1:8888/callback".to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_client_and_scopes() {
        let dir = tempdir().unwrap();
        let auth = SpotifyAuth::new(credentials(), dir.path(), Duration::from_secs(5)).unwrap();
        let url = auth.authorize_url().unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(url.as_str().starts_with(AUTHORIZE_URL));
        assert!(pairs.contains(&("client_id".to_string(), "client123".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "https://127.0.0.1:8888/callback".to_string()
        )));
        assert!(pairs.contains(&("scope".to_string(), SCOPES.to_string())));
    }

    #[test]
    fn parses_code_from_redirect() {
        let code =
            parse_redirect_code("  https://127.0.0.1:8888/callback?code=AQB123&state=x \n")
                .unwrap();
        assert_eq!(code, "AQB123");
    }

    #[test]
    fn denied_authorization_is_an_error() {
        let err = parse_redirect_code("https://127.0.0.1:8888/callback?error=access_denied")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
        assert!(err.message.contains("access_denied"));
    }

    #[test]
    fn missing_code_is_an_error() {
        assert!(parse_redirect_code("https://127.0.0.1:8888/callback").is_err());
        assert!(parse_redirect_code("https://127.0.0.1:8888/callback?code=").is_err());
        assert!(parse_redirect_code("not a url").is_err());
    }

    #[test]
    fn valid_cached_token_skips_prompt() {
        let dir = tempdir().unwrap();
        let token = TokenRecord {
            access_token: "cached".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            scope: None,
        };
        JsonStore::new(dir.path()).save(TOKEN_FILE, &token);

        let auth = SpotifyAuth::new(credentials(), dir.path(), Duration::from_secs(5)).unwrap();
        let access = auth
            .access_token(|_| panic!("prompt must not run with a valid token"))
            .unwrap();
        assert_eq!(access, "cached");
    }

    #[test]
    fn prompt_failure_is_auth_error() {
        let dir = tempdir().unwrap();
        let auth = SpotifyAuth::new(credentials(), dir.path(), Duration::from_secs(5)).unwrap();
        let err = auth
            .access_token(|_| Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed")))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
    }

    #[test]
    fn bad_paste_fails_before_any_request() {
        let dir = tempdir().unwrap();
        let auth = SpotifyAuth::new(credentials(), dir.path(), Duration::from_secs(5)).unwrap();
        let err = auth
            .access_token(|url| {
                assert!(url.contains("client123"));
                Ok("https://127.0.0.1:8888/callback?error=access_denied".to_string())
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
    }
}
