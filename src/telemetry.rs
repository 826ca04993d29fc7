use crate::config::TelemetryConfig;
use std::fmt;
use tracing::debug;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directive: String, source: ParseError },
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directive, .. } => {
                write!(f, "APP_LOG_LEVEL '{directive}' is not a valid log filter")
            }
            TelemetryError::Install(err) => {
                write!(f, "could not install the log subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

/// Which setting produced the active log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    RustLog,
    AppLogLevel,
}

/// Installs the global subscriber on stderr, keeping stdout for the
/// analysis, letter links, and listings shown to the user.
pub fn init(config: &TelemetryConfig) -> Result<FilterOrigin, TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (filter, origin) = resolve_filter(rust_log.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(TelemetryError::Install)?;

    debug!(?origin, "logging ready");
    Ok(origin)
}

/// A usable `RUST_LOG` wins. Otherwise the configured level must parse.
fn resolve_filter(
    rust_log: Option<&str>,
    log_level: &str,
) -> Result<(EnvFilter, FilterOrigin), TelemetryError> {
    if let Some(filter) = rust_log
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
    {
        return Ok((filter, FilterOrigin::RustLog));
    }

    EnvFilter::try_new(log_level)
        .map(|filter| (filter, FilterOrigin::AppLogLevel))
        .map_err(|source| TelemetryError::InvalidFilter {
            directive: log_level.to_string(),
            source,
        })
}
