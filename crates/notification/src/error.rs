use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A sender or recipient address could not be parsed.
    #[snafu(display("Invalid email address `{address}`: {source}"))]
    InvalidAddress {
        /// The rejected address.
        address: String,
        /// The underlying parse error.
        source: lettre::address::AddressError,
    },

    /// Failed to build email.
    #[snafu(display("Failed to build email message: {source}"))]
    BuildEmail {
        /// The underlying builder error.
        source: lettre::error::Error,
    },

    /// Failed to create the SMTP relay for a host.
    #[snafu(display("Failed to create SMTP relay for `{host}`: {source}"))]
    CreateSmtpRelay {
        /// The relay host name.
        host: String,
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// The SMTP server did not accept the message.
    #[snafu(display("Failed to send email via SMTP: {source}"))]
    SendSmtp {
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// Failed to create mailer client.
    #[snafu(display("Failed to create Gmail token source: {message}"))]
    CreateTokenSource {
        /// Description reported by the auth library.
        message: String,
    },

    /// Failed to obtain an access token for the Gmail API.
    #[snafu(display("Failed to obtain Gmail access token: {message}"))]
    AccessToken {
        /// Description reported by the token source.
        message: String,
    },

    /// HTTP request failed.
    #[snafu(display("HTTP request failed: {source}"))]
    HttpRequest {
        /// The underlying reqwest error.
        source: reqwest::Error,
    },

    /// The Gmail API answered with a non-success status.
    #[snafu(display("Gmail API responded with {status}: {message}"))]
    GmailApi {
        /// The HTTP status returned.
        status: reqwest::StatusCode,
        /// Response body, if any.
        message: String,
    },

    /// A transport refused the message for a reason of its own.
    #[snafu(display("{message}"))]
    Rejected {
        /// Reason given by the transport.
        message: String,
    },

    /// The host environment could not display a notification.
    #[snafu(display("Failed to display notification: {message}"))]
    DisplayNotification {
        /// Reason given by the host.
        message: String,
    },
}
