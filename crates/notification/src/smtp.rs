//! SMTP transport built on `lettre`'s asynchronous tokio relay.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
    time::Duration,
};

use async_trait::async_trait;
use lettre::{
    transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
    Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, Error, MailOptions, Transport};

/// How the connection to the relay is secured.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// Upgrade a plaintext connection with `STARTTLS` (port 587 by default).
    #[default]
    StartTls,
    /// Implicit TLS from the first byte (port 465 by default).
    Tls,
    /// No encryption (port 25 by default). Only for local relays.
    None,
}

impl FromStr for Security {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(format!("unknown SMTP security mode `{other}`")),
        }
    }
}

impl Display for Security {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTls => write!(f, "starttls"),
            Self::Tls => write!(f, "tls"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Configuration for the SMTP client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Config {
    #[serde(default = "Config::default_host")]
    pub host: String,

    /// Overrides the port implied by `security`.
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub security: Security,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    #[inline]
    #[must_use]
    pub fn default_host() -> String { "localhost".to_string() }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: None,
            security: Security::default(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

/// SMTP client for sending emails.
///
/// The underlying relay keeps a connection pool, so one client is meant to be
/// built at start-up and shared.
pub struct Client {
    relay: AsyncSmtpTransport<Tokio1Executor>,
}

impl Client {
    /// Creates a new SMTP client. No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS parameters for `host` cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use notification::smtp::{Client, Config};
    ///
    /// # fn example() -> Result<(), notification::Error> {
    /// let config = Config {
    ///     host: "smtp.example.com".to_string(),
    ///     username: Some("mailer".to_string()),
    ///     password: Some("secret".to_string()),
    ///     ..Config::default()
    /// };
    ///
    /// let client = Client::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config { host, port, security, username, password, timeout_secs } = config;

        tracing::info!(%host, ?port, %security, "Using SMTP relay");

        let builder = match security {
            Security::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                .context(error::CreateSmtpRelaySnafu { host: host.as_str() })?,
            Security::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
                .context(error::CreateSmtpRelaySnafu { host: host.as_str() })?,
            Security::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host),
        };

        let builder = if let Some(port) = port { builder.port(port) } else { builder };

        let builder = match (username, password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username, password))
            }
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("SMTP credentials need both username and password, ignoring");
                builder
            }
            (None, None) => builder,
        };

        let builder = builder.timeout(timeout_secs.map(Duration::from_secs));

        Ok(Self { relay: builder.build() })
    }
}

#[async_trait]
impl Transport for Client {
    async fn send(&self, mail: &MailOptions) -> Result<(), Error> {
        let message = mail.to_message()?;

        let _response = self.relay.send(message).await.context(error::SendSmtpSnafu)?;

        tracing::debug!(to = %mail.to, "SMTP relay accepted message");
        Ok(())
    }
}
