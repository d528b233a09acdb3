use std::path::PathBuf;

use snafu::Snafu;

use crate::config;

/// Result type alias for the CLI.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for the CLI.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not initialize tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: tokio::io::Error },

    #[snafu(display("{source}"))]
    Config { source: config::Error },

    #[snafu(display("Could not read push payload from {}, error: {source}", path.display()))]
    ReadPayload { path: PathBuf, source: std::io::Error },

    #[snafu(display("Email to {to} was not delivered: {reason}"))]
    Undelivered { to: String, reason: String },
}

impl From<config::Error> for Error {
    fn from(source: config::Error) -> Self { Self::Config { source } }
}

pub trait CommandError {
    fn exit_code(&self) -> exitcode::ExitCode;
}

impl CommandError for Error {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Config { .. } => exitcode::CONFIG,
            Self::InitializeTokioRuntime { .. } => exitcode::IOERR,
            Self::ReadPayload { .. } => exitcode::NOINPUT,
            Self::Undelivered { .. } => exitcode::UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let undelivered =
            Error::Undelivered { to: "a@example.com".to_string(), reason: "SMTP down".to_string() };
        let unreadable = Error::ReadPayload {
            path: PathBuf::from("/nonexistent"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert_eq!(undelivered.exit_code(), exitcode::UNAVAILABLE);
        assert_eq!(unreadable.exit_code(), exitcode::NOINPUT);
        assert_eq!(undelivered.to_string(), "Email to a@example.com was not delivered: SMTP down");
    }
}
