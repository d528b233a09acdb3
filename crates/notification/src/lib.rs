//! # Notification Crate
//!
//! This crate provides the two notification channels of the notifier:
//!
//! - [`push`]: turns an inbound push event into a system notification request
//!   for the host environment, falling back to default text when the payload
//!   is absent or malformed.
//! - [`email`]: sends one email through an injected [`email::Transport`] and
//!   reports the outcome to the caller instead of raising.
//!
//! ## Transports
//!
//! - [`smtp`]: SMTP relay through `lettre`
//! - [`gmail`]: Gmail API with domain-wide delegation

pub mod email;
mod error;
pub mod gmail;
pub mod push;
pub mod smtp;

pub use self::{
    email::{DispatchOutcome, EmailDispatcher, EmailRequest, MailOptions, Transport},
    error::Error,
    push::{
        DisplayOptions, DisplayRequest, LogDisplay, NotificationDisplay, NotificationPayload,
        PushEvent, PushNotificationHandler,
    },
};
