use std::{io, io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use notification::EmailRequest;
use snafu::ResultExt;

use crate::{
    command::{run_push, run_send_email},
    config::Config,
    error, shadow,
};

#[derive(Debug, Parser)]
#[command(author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about,
    long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long = "config",
        short = 'c',
        env = notifier_core::CONFIG_FILE_PATH_ENV,
        help = "Specify a configuration file"
    )]
    config_file_path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(about = "Print version information")]
    Version,

    #[clap(about = "Output shell completion code for the specified shell (bash, zsh, fish)")]
    Completion { shell: Shell },

    #[clap(about = "Output default configuration")]
    DefaultConfig,

    #[clap(about = "Send one email through the configured transport")]
    #[command(visible_alias = "mail")]
    SendEmail {
        #[arg(long, help = "Recipient address")]
        to: String,

        #[arg(long, help = "Subject line")]
        subject: String,

        #[arg(long, help = "Plain-text body")]
        text: String,
    },

    #[clap(about = "Show the system notification for one push event")]
    Push {
        #[arg(long, conflicts_with = "payload_file", help = "Push payload as a JSON string")]
        payload: Option<String>,

        #[arg(long, value_name = "PATH", help = "Read the push payload from a file")]
        payload_file: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), Box<error::Error>> {
        match self.command {
            Command::Version => {
                io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .expect("failed to write to stdout");
            }
            Command::Completion { shell } => {
                let mut command = Self::command();
                let bin_name = command.get_name().to_string();
                clap_complete::generate(shell, &mut command, bin_name, &mut io::stdout());
            }
            Command::DefaultConfig => {
                let config_text =
                    serde_yaml::to_string(&Config::default()).expect("`Config` is serializable");
                io::stdout().write_all(config_text.as_bytes()).expect("failed to write to stdout");
            }
            Command::SendEmail { ref to, ref subject, ref text } => {
                let request = EmailRequest::new(to, subject, text);
                let config = self.load_config()?;
                run_send_email(config, request)?;
            }
            Command::Push { ref payload, ref payload_file } => {
                let payload = read_payload(payload.as_deref(), payload_file.as_deref())?;
                let config = self.load_config()?;
                run_push(config, payload)?;
            }
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn load_config(&self) -> Result<Config, error::Error> {
        Ok(Config::load_or_default(self.config_file_path.as_deref())?)
    }
}

fn read_payload(
    payload: Option<&str>,
    payload_file: Option<&std::path::Path>,
) -> Result<Option<Vec<u8>>, error::Error> {
    match (payload, payload_file) {
        (Some(payload), _) => Ok(Some(payload.as_bytes().to_vec())),
        (None, Some(path)) => std::fs::read(path)
            .map(Some)
            .context(error::ReadPayloadSnafu { path: path.to_path_buf() }),
        (None, None) => Ok(None),
    }
}
