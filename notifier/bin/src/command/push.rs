use std::sync::Arc;

use notification::{LogDisplay, PushEvent, PushNotificationHandler};

use super::initialize_runtime;
use crate::{config::Config, error::Result};

/// Show the notification for one push event and wait until it has settled
pub fn run_push(config: Config, payload: Option<Vec<u8>>) -> Result<()> {
    config.log.registry();

    let runtime = initialize_runtime("push")?;

    runtime.block_on(async move {
        let handler = PushNotificationHandler::new(Arc::new(LogDisplay));

        let event = PushEvent::new(payload);
        handler.handle(&event);
        event.settled().await;

        tracing::info!("Push event settled");
    });

    Ok(())
}
