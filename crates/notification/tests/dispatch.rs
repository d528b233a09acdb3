use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use notification::{
    DispatchOutcome, DisplayOptions, EmailDispatcher, EmailRequest, Error, MailOptions,
    NotificationDisplay, PushEvent, PushNotificationHandler, Transport,
};

/// Accepts every message except those addressed to `bounce@example.com`.
#[derive(Default)]
struct SelectiveTransport {
    delivered: Mutex<Vec<String>>,
}

#[async_trait]
impl Transport for SelectiveTransport {
    async fn send(&self, mail: &MailOptions) -> Result<(), Error> {
        tokio::time::sleep(Duration::from_millis(5)).await;

        if mail.to == "bounce@example.com" {
            return Err(Error::Rejected { message: "mailbox unavailable".to_string() });
        }
        self.delivered.lock().unwrap().push(mail.to.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDisplay {
    titles: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationDisplay for RecordingDisplay {
    async fn show_notification(&self, title: &str, options: &DisplayOptions) -> Result<(), Error> {
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(options.icon, "./vite.svg");
        self.titles.lock().unwrap().push(title.to_string());
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_share_one_transport() {
    let transport = Arc::new(SelectiveTransport::default());
    let dispatcher = EmailDispatcher::new(transport.clone(), "noreply@example.com");

    let recipients: Vec<String> = (0..16)
        .map(|i| {
            if i % 4 == 0 {
                "bounce@example.com".to_string()
            } else {
                format!("user{i}@example.com")
            }
        })
        .collect();

    let handles: Vec<_> = recipients
        .iter()
        .cloned()
        .map(|to| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(EmailRequest::new(to, "Digest", "Nothing new.")).await
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    let failed: Vec<&DispatchOutcome> = outcomes.iter().filter(|o| !o.is_sent()).collect();
    assert_eq!(failed.len(), 4);
    for outcome in failed {
        assert_eq!(
            outcome,
            &DispatchOutcome::Failed {
                to: "bounce@example.com".to_string(),
                reason: "mailbox unavailable".to_string(),
            }
        );
    }

    let delivered: BTreeSet<String> = transport.delivered.lock().unwrap().iter().cloned().collect();
    let expected: BTreeSet<String> =
        recipients.into_iter().filter(|to| to != "bounce@example.com").collect();
    assert_eq!(delivered, expected);
}

#[tokio::test]
async fn every_push_event_settles_independently() {
    let display = Arc::new(RecordingDisplay::default());
    let handler = PushNotificationHandler::new(display.clone());

    let events: Vec<PushEvent> = [
        Some(r#"{"title":"First"}"#),
        None,
        Some("garbage"),
        Some(r#"{"title":"Last","body":"Bye"}"#),
    ]
    .into_iter()
    .map(|data| PushEvent::new(data.map(|data| data.as_bytes().to_vec())))
    .collect();

    for event in &events {
        handler.handle(event);
    }
    for event in events {
        event.settled().await;
    }

    let titles: BTreeSet<String> = display.titles.lock().unwrap().iter().cloned().collect();
    assert_eq!(
        titles,
        ["First", "Notification", "Last"].into_iter().map(ToString::to_string).collect()
    );
    assert_eq!(display.titles.lock().unwrap().len(), 4);
}
