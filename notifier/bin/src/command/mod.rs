mod push;
mod send_email;

use std::process;

use notifier_core::PROGRAM_NAME;
use snafu::ResultExt;
use tokio::runtime::Runtime;

pub use self::{push::run_push, send_email::run_send_email};
use crate::{
    error,
    error::Result,
    shadow::{BRANCH, PKG_VERSION, SHORT_COMMIT},
};

/// Announces the process and builds the runtime a command runs on.
fn initialize_runtime(command: &str) -> Result<Runtime> {
    tracing::info!(
        version = PKG_VERSION,
        branch = BRANCH,
        commit = SHORT_COMMIT,
        "{PROGRAM_NAME} {command} is initializing, pid: {}",
        process::id()
    );

    Runtime::new().context(error::InitializeTokioRuntimeSnafu)
}
