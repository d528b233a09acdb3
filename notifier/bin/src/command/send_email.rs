use notification::{DispatchOutcome, EmailRequest};

use super::initialize_runtime;
use crate::{
    config::Config,
    error::{Error, Result},
};

/// Send one email through the configured transport
pub fn run_send_email(config: Config, request: EmailRequest) -> Result<()> {
    let Config { ref log, .. } = config;

    log.registry();

    let runtime = initialize_runtime("send-email")?;

    runtime.block_on(async move {
        let dispatcher = config.mail.load().await?;

        match dispatcher.dispatch(request).await {
            DispatchOutcome::Sent { .. } => Ok(()),
            DispatchOutcome::Failed { to, reason } => Err(Error::Undelivered { to, reason }),
        }
    })
}
