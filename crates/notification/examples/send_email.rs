//! Example: Send one email through an SMTP relay.
//!
//! # Usage
//!
//! ```bash
//! export SMTP_HOST="smtp.example.com"
//! export SMTP_USERNAME="mailer"
//! export SMTP_PASSWORD="secret"
//! cargo run --example send_email -- noreply@example.com user@example.com
//! ```

use std::sync::Arc;

use notification::{
    smtp::{Client, Config},
    EmailDispatcher, EmailRequest,
};

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let from = args.next().unwrap_or_else(|| "noreply@example.com".to_string());
    let to = args.next().unwrap_or_else(|| "user@example.com".to_string());

    let config = Config {
        host: std::env::var("SMTP_HOST").unwrap_or_else(|_| Config::default_host()),
        username: std::env::var("SMTP_USERNAME").ok(),
        password: std::env::var("SMTP_PASSWORD").ok(),
        ..Config::default()
    };

    let dispatcher = EmailDispatcher::new(Arc::new(Client::new(config)?), from);

    let outcome = dispatcher
        .dispatch(EmailRequest::new(to, "Hello from notifier", "This is a test message."))
        .await;

    tracing::info!(sent = outcome.is_sent(), "{outcome}");
    Ok(())
}
