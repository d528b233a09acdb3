//! Email dispatch through an injected transport.

use std::{
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    Message,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{error, Error};

/// A request to send one email.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EmailRequest {
    /// The recipient's email address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The plain-text body.
    pub text: String,
}

impl EmailRequest {
    #[must_use]
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self { to: to.into(), subject: subject.into(), text: text.into() }
    }
}

/// An [`EmailRequest`] merged with the configured sender address.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MailOptions {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl MailOptions {
    #[must_use]
    pub fn new(from: impl Into<String>, EmailRequest { to, subject, text }: EmailRequest) -> Self {
        Self { from: from.into(), to, subject, text }
    }

    /// Builds the plain-text MIME message for these options.
    ///
    /// # Errors
    ///
    /// Returns an error if either address is invalid or the message cannot be
    /// built.
    pub fn to_message(&self) -> Result<Message, Error> {
        Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.text.clone())
            .context(error::BuildEmailSnafu)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, Error> {
    address.parse().context(error::InvalidAddressSnafu { address })
}

/// A configured connection to a mail-delivery service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is malformed or the service refuses it.
    async fn send(&self, mail: &MailOptions) -> Result<(), Error>;
}

/// What happened to a dispatched email.
#[must_use]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    Sent { to: String },
    Failed { to: String, reason: String },
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_sent(&self) -> bool { matches!(self, Self::Sent { .. }) }

    #[must_use]
    pub fn recipient(&self) -> &str {
        match self {
            Self::Sent { to } | Self::Failed { to, .. } => to,
        }
    }
}

impl Display for DispatchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { to } => write!(f, "Email sent to {to}"),
            Self::Failed { to, reason } => write!(f, "Failed to send email to {to}: {reason}"),
        }
    }
}

/// Sends emails from a fixed sender address through a shared transport.
///
/// Failures are logged and handed back as [`DispatchOutcome::Failed`]; the
/// dispatcher never panics and never returns an error to its caller.
#[derive(Clone)]
pub struct EmailDispatcher {
    transport: Arc<dyn Transport>,
    from: String,
}

impl EmailDispatcher {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, from: impl Into<String>) -> Self {
        Self { transport, from: from.into() }
    }

    #[must_use]
    pub fn from_address(&self) -> &str { &self.from }

    pub async fn dispatch(&self, request: EmailRequest) -> DispatchOutcome {
        let mail = MailOptions::new(self.from.as_str(), request);

        match self.transport.send(&mail).await {
            Ok(()) => {
                let outcome = DispatchOutcome::Sent { to: mail.to };
                tracing::info!(to = %outcome.recipient(), "{outcome}");
                outcome
            }
            Err(error) => {
                let outcome = DispatchOutcome::Failed { to: mail.to, reason: error.to_string() };
                tracing::error!(to = %outcome.recipient(), %error, "{outcome}");
                outcome
            }
        }
    }
}
