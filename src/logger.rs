//! Log output for the command line tool. Everything goes to stderr with
//! uptime stamps; `RUST_LOG` wins over the configured directive.

use thiserror::Error;
use tracing_subscriber::filter::{LevelFilter, ParseError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log directive: {0}")]
    Directive(#[from] ParseError),

    #[error("Logger already installed: {0}")]
    Install(#[from] TryInitError),
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `bayer_demosaic_rs=debug`.
    pub default_directive: String,
    /// Emit a close event with busy/idle time for each instrumented stage.
    pub stage_spans: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogSettings {
    pub fn new(default_directive: impl Into<String>) -> Self {
        Self {
            default_directive: default_directive.into(),
            stage_spans: false,
        }
    }

    pub fn with_stage_spans(mut self, enable: bool) -> Self {
        self.stage_spans = enable;
        self
    }

    fn filter(&self, env_directives: Option<&str>) -> Result<EnvFilter, ParseError> {
        match env_directives.filter(|d| !d.trim().is_empty()) {
            Some(directives) => EnvFilter::try_new(directives),
            None => EnvFilter::try_new(&self.default_directive),
        }
    }

    // Stage spans are always shown at debug verbosity
    fn span_events(&self, filter: &EnvFilter) -> FmtSpan {
        let verbose = filter
            .max_level_hint()
            .is_some_and(|level| level >= LevelFilter::DEBUG);
        if self.stage_spans || verbose {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Installs the global subscriber.
    pub fn try_init(&self) -> Result<(), LoggerError> {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let env_filter = self.filter(env.as_deref())?;
        let span_events = self.span_events(&env_filter);

        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::uptime())
            .with_span_events(span_events);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
        Ok(())
    }
}
