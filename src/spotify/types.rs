//! Spotify request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::library::{SavedTrackItem, SavedTracksPage};

/// Token lifetime margin: a token this close to expiry is refreshed.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// `GET /me` response (only the fields used here).
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl CurrentUser {
    /// Returns the display name, falling back to the user id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

/// `GET /me/tracks` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedTracksResponse {
    #[serde(default)]
    pub items: Vec<SavedTrackItem>,
    #[serde(default)]
    pub next: Option<String>,
}

impl SavedTracksResponse {
    /// Converts the response into a provider-neutral page.
    pub fn into_page(self) -> SavedTracksPage {
        SavedTracksPage {
            items: self.items,
            has_next: self.next.is_some(),
        }
    }
}

/// `POST /users/{id}/playlists` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

/// Playlist object returned on creation (only the fields used here).
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    pub id: String,
}

/// `POST /playlists/{id}/tracks` request body.
#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Accounts service token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Cached OAuth token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenRecord {
    /// Builds a record from a token response received at `now`.
    ///
    /// Refresh responses may omit the refresh token; `previous_refresh` is
    /// kept in that case. An `expires_in` outside the representable range
    /// is an INVALID_RESPONSE error.
    pub fn from_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> Result<Self> {
        let expires_at = chrono::Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::invalid_response(
                    "Spotify token endpoint",
                    format!("expires_in out of range: {}", response.expires_in),
                )
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at,
            scope: response.scope,
        })
    }

    /// Returns true if the access token is usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn saved_tracks_page_has_next_from_next_url() {
        let json = r#"{
            "href": "https://api.spotify.com/v1/me/tracks?offset=0&limit=50",
            "items": [{"track": {"id": "A", "name": "Song1", "artists": [{"name": "X"}]}}],
            "limit": 50,
            "next": "https://api.spotify.com/v1/me/tracks?offset=50&limit=50",
            "offset": 0,
            "total": 51
        }"#;
        let page = serde_json::from_str::<SavedTracksResponse>(json)
            .unwrap()
            .into_page();
        assert!(page.has_next);
        assert_eq!(page.items.len(), 1);

        let last = r#"{"items": [], "next": null}"#;
        let page = serde_json::from_str::<SavedTracksResponse>(last)
            .unwrap()
            .into_page();
        assert!(!page.has_next);
    }

    #[test]
    fn user_label_prefers_display_name() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"id": "u1", "display_name": "Alice"}"#).unwrap();
        assert_eq!(user.label(), "Alice");
        let user: CurrentUser =
            serde_json::from_str(r#"{"id": "u1", "display_name": null}"#).unwrap();
        assert_eq!(user.label(), "u1");
    }

    #[test]
    fn token_keeps_previous_refresh_token() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = r#"{"access_token": "new", "token_type": "Bearer", "expires_in": 3600}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let record = TokenRecord::from_response(response, now, Some("r1".to_string())).unwrap();
        assert_eq!(record.refresh_token.as_deref(), Some("r1"));
        assert_eq!(record.expires_at, now + chrono::Duration::hours(1));
    }

    #[test]
    fn out_of_range_lifetime_is_invalid_response() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let response = TokenResponse {
            access_token: "t".to_string(),
            expires_in: i64::MAX,
            refresh_token: None,
            scope: None,
        };
        let err = TokenRecord::from_response(response, now, None).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidResponse);
        assert!(err.message.contains("expires_in"));
    }

    #[test]
    fn token_expires_with_margin() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = TokenRecord {
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: now + chrono::Duration::seconds(120),
            scope: None,
        };
        assert!(record.is_valid_at(now));
        assert!(!record.is_valid_at(now + chrono::Duration::seconds(60)));
        assert!(!record.is_valid_at(now + chrono::Duration::seconds(200)));
    }

    #[test]
    fn add_tracks_body_shape() {
        let body = AddTracksRequest {
            uris: vec!["spotify:track:A".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"uris":["spotify:track:A"]}"#
        );
    }
}
