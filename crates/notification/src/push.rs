//! Push event handling.
//!
//! A [`PushNotificationHandler`] turns the optional JSON payload of a
//! [`PushEvent`] into a [`DisplayRequest`] and hands it to the host's
//! [`NotificationDisplay`]. The display request is registered on the event, so
//! the event is only finished once the host has settled it.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::task::TaskTracker;

use crate::Error;

/// Title used when the payload carries none.
pub const DEFAULT_TITLE: &str = "Notification";

/// Body used when the payload carries none.
pub const DEFAULT_BODY: &str = "You have a new notification.";

/// Icon shown with every notification.
pub const ICON_PATH: &str = "./vite.svg";

/// Badge shown with every notification.
pub const BADGE_PATH: &str = "./vite.svg";

/// The recognised fields of a push payload.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NotificationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NotificationPayload {
    /// Parses raw push data, never failing.
    ///
    /// Absent data, invalid JSON and JSON documents that are not objects all
    /// yield the empty payload. Fields that are not non-empty strings are
    /// ignored individually.
    #[must_use]
    pub fn parse(data: Option<&[u8]>) -> Self {
        let Some(data) = data else {
            return Self::default();
        };

        match serde_json::from_slice::<Value>(data) {
            Ok(Value::Object(fields)) => {
                let text = |key: &str| {
                    fields
                        .get(key)
                        .and_then(Value::as_str)
                        .filter(|value| !value.is_empty())
                        .map(ToString::to_string)
                };
                Self { title: text("title"), body: text("body") }
            }
            Ok(other) => {
                tracing::debug!(kind = %json_kind(&other), "Push payload is not an object");
                Self::default()
            }
            Err(error) => {
                tracing::debug!(%error, "Push payload is not valid JSON");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn title(&self) -> &str { self.title.as_deref().unwrap_or(DEFAULT_TITLE) }

    #[must_use]
    pub fn body(&self) -> &str { self.body.as_deref().unwrap_or(DEFAULT_BODY) }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub body: String,
    pub icon: &'static str,
    pub badge: &'static str,
}

impl DisplayOptions {
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into(), icon: ICON_PATH, badge: BADGE_PATH }
    }
}

/// A fully resolved request for the host to show a notification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DisplayRequest {
    pub title: String,
    pub options: DisplayOptions,
}

impl From<&NotificationPayload> for DisplayRequest {
    fn from(payload: &NotificationPayload) -> Self {
        Self { title: payload.title().to_string(), options: DisplayOptions::new(payload.body()) }
    }
}

/// The host environment's ability to show a system notification.
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    /// Shows a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to show the notification.
    async fn show_notification(&self, title: &str, options: &DisplayOptions) -> Result<(), Error>;
}

/// Surfaces notifications as structured log events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDisplay;

#[async_trait]
impl NotificationDisplay for LogDisplay {
    async fn show_notification(&self, title: &str, options: &DisplayOptions) -> Result<(), Error> {
        let DisplayOptions { body, icon, badge } = options;
        tracing::info!(%title, %body, %icon, %badge, "Showing notification");
        Ok(())
    }
}

/// One inbound push message.
#[derive(Debug)]
pub struct PushEvent {
    data: Option<Vec<u8>>,
    pending: TaskTracker,
}

impl PushEvent {
    #[must_use]
    pub fn new(data: Option<Vec<u8>>) -> Self { Self { data, pending: TaskTracker::new() } }

    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self { Self::new(Some(data.into())) }

    #[must_use]
    pub fn data(&self) -> Option<&[u8]> { self.data.as_deref() }

    /// Keeps the event alive until `work` has completed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn wait_until<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let _handle = self.pending.spawn(work);
    }

    /// Number of registered operations that have not settled yet.
    #[must_use]
    pub fn pending(&self) -> usize { self.pending.len() }

    /// Waits for every registered operation to settle.
    pub async fn settled(self) {
        let _closed = self.pending.close();
        self.pending.wait().await;
    }
}

/// Displays a system notification for every push event it handles.
#[derive(Clone)]
pub struct PushNotificationHandler {
    display: Arc<dyn NotificationDisplay>,
}

impl PushNotificationHandler {
    #[must_use]
    pub const fn new(display: Arc<dyn NotificationDisplay>) -> Self { Self { display } }

    /// Handles a push event.
    ///
    /// The display request is registered on `event`; failures are logged and
    /// never reach the caller.
    pub fn handle(&self, event: &PushEvent) {
        let payload = NotificationPayload::parse(event.data());
        let DisplayRequest { title, options } = DisplayRequest::from(&payload);
        let display = Arc::clone(&self.display);

        event.wait_until(async move {
            if let Err(error) = display.show_notification(&title, &options).await {
                tracing::warn!(%title, %error, "Failed to display push notification");
            }
        });
    }
}
