use crate::endpoints::authentication;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
/// Bearer token issued by the OAuth token exchange.
pub struct AccessToken {
    /// The token value sent as `Authorization: Bearer <token>`.
    pub access_token: String,

    /// Token type.
    ///
    /// NOTE: Always `"Bearer"`.
    #[serde(default)]
    pub token_type: String,

    /// Seconds until the token expires.
    #[serde(default)]
    pub expires_in: u64,

    /// Space-separated scopes granted to the token.
    #[serde(default)]
    pub scope: String,

    /// When the token was issued.
    #[serde(default)]
    pub issued_at: String,

    /// Refresh token, when the grant provides one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AccessToken {
    /// Exchange an authorization code for an access token.
    ///
    /// Uses HTTP Basic with the client id/secret configured on the
    /// `Client`; this is the only endpoint that does.
    pub async fn create(
        client: &Client,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, Error> {
        let form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
        ];

        let value = client
            .send(&authentication::OAUTH_ACCESS_TOKEN.bind(), &[], &form)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(client: &Client, refresh_token: &str) -> Result<AccessToken, Error> {
        let form = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ];

        let value = client
            .send(&authentication::OAUTH_ACCESS_TOKEN.bind(), &[], &form)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl Client {
    /// The URL a user should visit to authorize this application.
    pub fn oauth_url(&self, redirect_uri: &str, scope: &str) -> String {
        let mut query = vec![("response_type".to_string(), "code".to_string())];
        if let Some(client_id) = self.oauth_client_id() {
            query.push(("client_id".to_string(), client_id.to_string()));
        }
        query.push(("redirect_uri".to_string(), redirect_uri.to_string()));
        if !scope.is_empty() {
            query.push(("scope".to_string(), scope.to_string()));
        }

        let qs = crate::encode::form_encode(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        format!("{}{}?{qs}", self.base_url, authentication::OAUTH_AUTHORIZE.template)
    }

    /// Exchange an authorization code for an access token.
    pub async fn create_access_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, Error> {
        AccessToken::create(self, code, redirect_uri).await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken, Error> {
        AccessToken::refresh(self, refresh_token).await
    }
}
