use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    fs::OpenOptions,
    path::PathBuf,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

// SAFETY: Configuration file needs many bools.
#[allow(clippy::struct_excessive_bools)]
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    #[serde(default = "LogConfig::default_emit_journald")]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    #[serde(default = "LogConfig::default_log_filters")]
    pub log_filters: String,

    #[serde(default = "LogConfig::default_log_formatter")]
    #[serde_as(as = "DisplayFromStr")]
    pub formatter: LogFormatter,

    // Display function latency in logs
    #[serde(default = "LogConfig::default_show_fn_latency")]
    pub show_fn_latency: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_journald: Self::default_emit_journald(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            log_filters: Self::default_log_filters(),
            formatter: Self::default_log_formatter(),
            show_fn_latency: Self::default_show_fn_latency(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub fn default_log_filters() -> String { "info,lettre=warn".to_string() }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_journald() -> bool { false }

    // stdout is left to command output
    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { true }

    #[inline]
    #[must_use]
    pub const fn default_log_formatter() -> LogFormatter { LogFormatter::Compact }

    #[inline]
    #[must_use]
    pub const fn default_show_fn_latency() -> bool { false }

    /// Installs the global subscriber described by this config.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed.
    pub fn registry(&self) {
        let Self {
            emit_journald,
            file_path,
            emit_stdout,
            emit_stderr,
            log_filters,
            formatter,
            show_fn_latency,
        } = self;

        let filter_layer = tracing_subscriber::filter::EnvFilter::new(log_filters.as_str());

        // Display function latency in logs, for example:
        // `send close, time.busy: 37.5µs, time.idle: 2.01s`.
        let span_events = if *show_fn_latency { FmtSpan::CLOSE } else { FmtSpan::NONE };

        let drivers = [
            emit_journald.then_some(LogDriver::Journald),
            file_path.clone().map(LogDriver::File),
            emit_stdout.then_some(LogDriver::Stdout),
            emit_stderr.then_some(LogDriver::Stderr),
        ];

        let layers: Vec<_> = drivers
            .into_iter()
            .flatten()
            .filter_map(|driver| driver.layer(*formatter, &span_events))
            .collect();

        tracing_subscriber::registry().with(layers).with(filter_layer).init();
    }
}

#[derive(Clone, Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogDriver {
    fn layer<S>(self, formatter: LogFormatter, span_events: &FmtSpan) -> Option<BoxedLayer<S>>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        match self {
            Self::Stdout => Some(formatted(std::io::stdout, formatter, span_events.clone())),
            Self::Stderr => Some(formatted(std::io::stderr, formatter, span_events.clone())),
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
                Some(formatted(file, formatter, span_events.clone()))
            }
            Self::Journald => Some(tracing_journald::layer().ok()?.boxed()),
        }
    }
}

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn formatted<S, W>(writer: W, formatter: LogFormatter, span_events: FmtSpan) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    // Shared configuration regardless of where logs are output to.
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(true)
        .with_span_events(span_events);

    match formatter {
        LogFormatter::Pretty => fmt.pretty().boxed(),
        LogFormatter::Compact => fmt.compact().boxed(),
        LogFormatter::Json => fmt.json().flatten_event(true).boxed(),
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogFormatter {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormatter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Ok(Self::Pretty),
        }
    }
}

impl Display for LogFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_from_str() {
        assert_eq!("JSON".parse::<LogFormatter>(), Ok(LogFormatter::Json));
        assert_eq!("compact".parse::<LogFormatter>(), Ok(LogFormatter::Compact));
        assert_eq!("pretty".parse::<LogFormatter>(), Ok(LogFormatter::Pretty));
        assert_eq!("anything".parse::<LogFormatter>(), Ok(LogFormatter::Pretty));
    }

    #[test]
    fn test_formatter_display_round_trips() {
        for formatter in [LogFormatter::Pretty, LogFormatter::Compact, LogFormatter::Json] {
            assert_eq!(formatter.to_string().parse::<LogFormatter>(), Ok(formatter));
        }
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LogConfig =
            serde_yaml::from_str("formatter: json\nlog_filters: debug\n").unwrap();

        assert_eq!(config.formatter, LogFormatter::Json);
        assert_eq!(config.log_filters, "debug");
        assert!(config.emit_stderr);
        assert!(!config.emit_stdout);
        assert_eq!(config.file_path, None);
    }

    #[test]
    fn test_default_config_serializes_formatter_as_text() {
        let text = serde_yaml::to_string(&LogConfig::default()).unwrap();

        assert!(text.contains("formatter: compact"));
        assert_eq!(serde_yaml::from_str::<LogConfig>(&text).unwrap(), LogConfig::default());
    }
}
