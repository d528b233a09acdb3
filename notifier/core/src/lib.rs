use std::{path::PathBuf, sync::LazyLock};

use directories::ProjectDirs;

pub const PROJECT_NAME: &str = "notifier";

pub const PROGRAM_NAME: &str = "notifier";
pub const CONFIG_NAME: &str = "notifier.yaml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_FILE_PATH_ENV: &str = "NOTIFIER_CONFIG_FILE_PATH";

pub const DEFAULT_MAIL_FROM: &str = "noreply@localhost";

pub static PROJECT_CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    ProjectDirs::from("", PROJECT_NAME, PROJECT_NAME)
        .expect("Creating `ProjectDirs` should always success")
        .config_dir()
        .to_path_buf()
});

#[must_use]
pub fn default_config_path() -> PathBuf { PROJECT_CONFIG_DIR.join(CONFIG_NAME) }
