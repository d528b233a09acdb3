//! Gmail API transport using domain-wide delegation.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use google_cloud_token::{TokenSource, TokenSourceProvider};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, Error, MailOptions, Transport};

/// Gmail API scopes required for sending emails.
const SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/gmail.send"];

const SEND_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// Configuration for the Gmail client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Config {
    /// Google Workspace user to impersonate for domain-wide delegation.
    /// Gmail sends as this user whatever the `From` header says.
    pub impersonate_user: String,
}

/// Gmail API client for sending emails.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token_source: Arc<dyn TokenSource>,
}

impl Client {
    /// Creates a new Gmail client with domain-wide delegation.
    ///
    /// Credentials are discovered the usual Google way, e.g. through
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token source provider cannot be created.
    pub async fn new(Config { impersonate_user }: Config) -> Result<Self, Error> {
        tracing::info!(%impersonate_user, "Using domain-wide delegation for Gmail API");

        let auth_config = google_cloud_auth::project::Config::default()
            .with_scopes(&SCOPES)
            .with_sub(&impersonate_user);

        let provider = google_cloud_auth::token::DefaultTokenSourceProvider::new(auth_config)
            .await
            .map_err(|e| Error::CreateTokenSource { message: e.to_string() })?;

        Ok(Self { http: reqwest::Client::new(), token_source: provider.token_source() })
    }

    async fn authorization(&self) -> Result<String, Error> {
        let token = self
            .token_source
            .token()
            .await
            .map_err(|e| Error::AccessToken { message: e.to_string() })?;

        Ok(bearer(token))
    }
}

#[async_trait]
impl Transport for Client {
    async fn send(&self, mail: &MailOptions) -> Result<(), Error> {
        let raw = encode_raw(mail)?;
        let authorization = self.authorization().await?;

        let response = self
            .http
            .post(SEND_ENDPOINT)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await
            .context(error::HttpRequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::GmailApi { status, message });
        }

        tracing::debug!(to = %mail.to, "Gmail API accepted message");
        Ok(())
    }
}

/// The message in the base64url form the `raw` field expects.
fn encode_raw(mail: &MailOptions) -> Result<String, Error> {
    Ok(URL_SAFE.encode(mail.to_message()?.formatted()))
}

fn bearer(token: String) -> String {
    if token.starts_with("Bearer ") {
        token
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmailRequest;

    #[test]
    fn test_encode_raw() {
        let mail = MailOptions::new(
            "sender@example.com",
            EmailRequest::new("recipient@example.com", "Build report", "All green."),
        );

        let raw = encode_raw(&mail).unwrap();
        let decoded = String::from_utf8(URL_SAFE.decode(raw).unwrap()).unwrap();

        assert!(decoded.contains("sender@example.com"));
        assert!(decoded.contains("recipient@example.com"));
        assert!(decoded.contains("Build report"));
        assert!(decoded.contains("All green."));
    }

    #[test]
    fn test_encode_raw_invalid_to() {
        let mail = MailOptions::new(
            "sender@example.com",
            EmailRequest::new("invalid-email", "Subject", "Body"),
        );

        assert!(encode_raw(&mail).is_err());
    }

    #[test]
    fn test_bearer() {
        assert_eq!(bearer("abc".to_string()), "Bearer abc");
        assert_eq!(bearer("Bearer abc".to_string()), "Bearer abc");
    }
}
