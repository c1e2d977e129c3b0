//! Logging setup for ircev.
//!
//! [`init_from_config`] installs a `tracing-subscriber` registry with an
//! [`EnvFilter`] and one fmt layer shaped by [`LoggingConfig`]. The
//! dispatcher runs every handler task inside a `dispatch{code=...}` span, so
//! turning on `span_events.new` and `span_events.close` logs when each
//! handler starts and how long it ran.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "full"
//!
//! [logging.filters]
//! ircev_core = "debug"
//!
//! [logging.span_events]
//! new = true
//! close = true
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber described by `config`.
///
/// A subscriber installed earlier wins; the error is ignored.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

fn span_events(config: &SpanEventConfig) -> FmtSpan {
    let mut span = FmtSpan::NONE;
    for (enabled, flag) in [
        (config.new, FmtSpan::NEW),
        (config.enter, FmtSpan::ENTER),
        (config.exit, FmtSpan::EXIT),
        (config.close, FmtSpan::CLOSE),
    ] {
        if enabled {
            span |= flag;
        }
    }
    span
}

/// A subscriber description resolved from [`LoggingConfig`].
#[derive(Debug)]
pub struct LoggingBuilder {
    level: tracing::Level,
    directives: Vec<String>,
    span_events: FmtSpan,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    thread_ids: bool,
    file_location: bool,
    ansi: bool,
}

impl LoggingBuilder {
    /// Resolves `config` into a builder.
    pub fn from_config(config: &LoggingConfig) -> Self {
        // Sorted so the resulting filter does not depend on map order.
        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));

        Self {
            level: config.level.to_tracing_level(),
            directives: filters
                .into_iter()
                .map(|(target, level)| format!("{target}={level}"))
                .collect(),
            span_events: span_events(&config.span_events),
            format: config.format,
            output: config.output,
            file_path: config.file_path.clone(),
            thread_ids: config.thread_ids,
            file_location: config.file_location,
            ansi: config.output != LogOutput::File,
        }
    }

    /// Per-target filter directives, e.g. `"ircev_core=debug"`.
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    /// `RUST_LOG` replaces the configured base level. Invalid directives are
    /// skipped.
    fn build_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()));
        self.directives
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(base, EnvFilter::add_directive)
    }

    fn build_writer(&self) -> BoxMakeWriter {
        match self.output {
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::File => match &self.file_path {
                Some(path) => BoxMakeWriter::new(tracing_appender::rolling::never(
                    path.parent().unwrap_or_else(|| Path::new(".")),
                    path.file_name().unwrap_or_else(|| OsStr::new("ircev.log")),
                )),
                None => {
                    warn!("File output requested without a file path, logging to stdout");
                    BoxMakeWriter::new(std::io::stdout)
                }
            },
        }
    }

    fn build_layer(&self, writer: BoxMakeWriter) -> BoxedLayer {
        macro_rules! shaped {
            ($layer:expr) => {
                $layer
                    .with_writer(writer)
                    .with_ansi(self.ansi)
                    .with_span_events(self.span_events.clone())
                    .with_thread_ids(self.thread_ids)
                    .with_file(self.file_location)
                    .with_line_number(self.file_location)
                    .boxed()
            };
        }

        match self.format {
            #[cfg(feature = "json-log")]
            LogFormat::Json => shaped!(fmt::layer().json()),
            LogFormat::Compact => shaped!(fmt::layer().compact()),
            LogFormat::Full => shaped!(fmt::layer()),
            LogFormat::Pretty => shaped!(fmt::layer().pretty()),
        }
    }

    /// Installs the subscriber globally. Fails if one is already set.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let layer = self.build_layer(self.build_writer());
        tracing_subscriber::registry()
            .with(layer)
            .with(self.build_filter())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::{Level, span};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs a `dispatch` span the way the dispatcher does and returns the output.
    fn dispatch_span_output(builder: &LoggingBuilder) -> String {
        let buffer = LogBuffer::default();
        let layer = builder.build_layer(BoxMakeWriter::new(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = span!(Level::DEBUG, "dispatch", code = %"PING");
            let _entered = span.enter();
            tracing::info!("handled");
        });
        buffer.contents()
    }

    #[test]
    fn test_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            thread_ids: true,
            file_location: true,
            ..Default::default()
        };
        config.filters.insert("ircev_runtime".into(), LogLevel::Warn);
        config.filters.insert("ircev_core".into(), LogLevel::Trace);
        config.span_events.close = true;

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, Level::DEBUG);
        assert!(builder.thread_ids && builder.file_location);
        assert_eq!(builder.span_events, FmtSpan::CLOSE);
        assert!(builder.ansi);
        assert_eq!(
            builder.directives(),
            ["ircev_core=trace", "ircev_runtime=warn"]
        );
    }

    #[test]
    fn test_file_output_disables_ansi() {
        let config = LoggingConfig {
            output: LogOutput::File,
            file_path: Some(PathBuf::from("ircev.log")),
            ..Default::default()
        };
        assert!(!LoggingBuilder::from_config(&config).ansi);
    }

    #[test]
    fn test_dispatch_span_lifecycle() {
        let mut config = LoggingConfig {
            format: LogFormat::Full,
            output: LogOutput::File,
            ..Default::default()
        };
        config.span_events.new = true;
        config.span_events.close = true;

        let logs = dispatch_span_output(&LoggingBuilder::from_config(&config));
        let lines: Vec<_> = logs.lines().collect();
        assert_eq!(lines.len(), 3, "{logs}");
        assert!(lines.iter().all(|line| line.contains("dispatch{code=PING}")), "{logs}");
        assert!(lines[0].ends_with("new"), "{logs}");
        assert!(lines[1].contains("handled"), "{logs}");
        assert!(lines[2].contains("close"), "{logs}");
    }

    #[test]
    fn test_no_span_events_by_default() {
        let config = LoggingConfig {
            format: LogFormat::Full,
            output: LogOutput::File,
            ..Default::default()
        };

        let logs = dispatch_span_output(&LoggingBuilder::from_config(&config));
        assert_eq!(logs.lines().count(), 1, "{logs}");
        assert!(logs.contains("handled"), "{logs}");
    }
}
