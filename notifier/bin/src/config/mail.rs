use std::sync::Arc;

use notification::{gmail, smtp, EmailDispatcher, Transport};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use super::{error, Error};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MailConfig {
    /// Sender address of every dispatched email.
    #[serde(default = "MailConfig::default_from")]
    pub from: String,

    #[serde(default)]
    pub transport: TransportConfig,
}

impl MailConfig {
    #[inline]
    pub fn default_from() -> String { notifier_core::DEFAULT_MAIL_FROM.to_string() }

    /// Builds the transport once and wraps it in a dispatcher.
    pub async fn load(self) -> Result<EmailDispatcher, Error> {
        let Self { from, transport } = self;
        let transport_name = transport.name();

        let transport: Arc<dyn Transport> = match transport {
            TransportConfig::Smtp(config) => Arc::new(
                smtp::Client::new(config)
                    .context(error::InitializeTransportSnafu { transport: transport_name })?,
            ),
            TransportConfig::Gmail(config) => Arc::new(
                gmail::Client::new(config)
                    .await
                    .context(error::InitializeTransportSnafu { transport: transport_name })?,
            ),
        };

        tracing::info!(%from, transport = transport_name, "Mail transport is ready");
        Ok(EmailDispatcher::new(transport, from))
    }
}

impl Default for MailConfig {
    fn default() -> Self { Self { from: Self::default_from(), transport: TransportConfig::default() } }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Smtp(smtp::Config),
    Gmail(gmail::Config),
}

impl TransportConfig {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Gmail(_) => "gmail",
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self { Self::Smtp(smtp::Config::default()) }
}
