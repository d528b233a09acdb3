mod error;
mod mail;

use std::path::{Path, PathBuf};

use notifier_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error,
    mail::{MailConfig, TransportConfig},
};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf { notifier_core::default_config_path() }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = config
            .log
            .file_path
            .map(|path| {
                path.try_resolve()
                    .map(|path| path.to_path_buf())
                    .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
            })
            .transpose()?;

        Ok(config)
    }

    /// Loads `path` if given; otherwise the default file, falling back to
    /// built-in defaults when that file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use notification::smtp::Security;

    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let text = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&text).unwrap();

        assert_eq!(config, Config::default());
        assert!(text.contains("type: smtp"));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.mail.from, "noreply@localhost");
    }

    #[test]
    fn test_smtp_transport() {
        let config: Config = serde_yaml::from_str(
            r"
mail:
  from: alerts@example.com
  transport:
    type: smtp
    host: smtp.example.com
    port: 2525
    security: tls
",
        )
        .unwrap();

        assert_eq!(config.mail.from, "alerts@example.com");
        let TransportConfig::Smtp(smtp) = config.mail.transport else {
            panic!("expected an SMTP transport");
        };
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, Some(2525));
        assert_eq!(smtp.security, Security::Tls);
    }

    #[test]
    fn test_gmail_transport() {
        let config: Config = serde_yaml::from_str(
            r"
mail:
  from: alerts@example.com
  transport:
    type: gmail
    impersonate_user: alerts@example.com
",
        )
        .unwrap();

        assert_eq!(config.mail.transport.name(), "gmail");
        assert_eq!(
            config.mail.transport,
            TransportConfig::Gmail(notification::gmail::Config {
                impersonate_user: "alerts@example.com".to_string()
            })
        );
    }

    #[test]
    fn test_load_reports_missing_file() {
        let path = std::env::temp_dir().join("notifier-missing-config.yaml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::OpenConfig { .. }));
        assert!(Config::load_or_default(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path =
            std::env::temp_dir().join(format!("notifier-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "mail:\n  from: ops@example.com\nlog:\n  formatter: json\n")
            .unwrap();

        let config = Config::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.mail.from, "ops@example.com");
        assert_eq!(config.log.formatter, notifier_cli_common::config::LogFormatter::Json);
    }

    #[test]
    fn test_load_rejects_unknown_transport() {
        let path =
            std::env::temp_dir().join(format!("notifier-bad-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "mail:\n  transport:\n    type: carrier-pigeon\n").unwrap();

        let result = Config::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(Error::ParseConfig { .. })));
    }
}
