//! Rolling file logs for the chore engine.
//!
//! # Responsibility
//! - Turn the `log_level` / `log_dir` part of [`NandyConfig`] into a running
//!   `flexi_logger` backend, once per process.
//! - Keep `event=... module=... status=...` records on one line, including
//!   values that come from chore data or collaborator errors.
//!
//! # Invariants
//! - Without a `log_dir` nothing is installed and records go nowhere.
//! - A second init with the same settings is a no-op; different settings are
//!   rejected, never applied.
//! - Initialization never panics.

use crate::config::NandyConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "nandy";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_FIELD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Validated logging settings taken from a [`NandyConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogSettings {
    /// Returns `Ok(None)` when the config has no `log_dir`.
    pub fn from_config(config: &NandyConfig) -> Result<Option<Self>, LoggingError> {
        let Some(dir) = config.log_dir.as_ref() else {
            return Ok(None);
        };
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeDir(dir.clone()));
        }
        Ok(Some(Self {
            level: parse_level(&config.log_level)?,
            dir: dir.clone(),
        }))
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    RelativeDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// Logging is already running with other settings.
    Conflict { active: LogSettings },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected off|error|warn|info|debug|trace"
            ),
            Self::RelativeDir(dir) => {
                write!(f, "log_dir must be an absolute path, got `{}`", dir.display())
            }
            Self::CreateDir { dir, source } => write!(
                f,
                "failed to create log directory `{}`: {source}",
                dir.display()
            ),
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::Conflict { active } => write!(
                f,
                "logging already runs at level {} in `{}`",
                active.level,
                active.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            Self::UnknownLevel(_) | Self::RelativeDir(_) | Self::Conflict { .. } => None,
        }
    }
}

/// Starts file logging as configured.
///
/// Returns `Ok(false)` when the config has no `log_dir`, `Ok(true)` once
/// logging runs with exactly these settings.
pub fn init_logging(config: &NandyConfig) -> Result<bool, LoggingError> {
    let Some(settings) = LogSettings::from_config(config)? else {
        return Ok(false);
    };

    let active = ACTIVE.get_or_try_init(|| start(settings.clone()))?;
    if active.settings != settings {
        return Err(LoggingError::Conflict {
            active: active.settings.clone(),
        });
    }
    Ok(true)
}

/// Level used when the config does not name one.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Renders a record value on one line, capped in length.
///
/// Use for chore text, area statuses and collaborator errors.
pub fn field(value: impl Display) -> String {
    let rendered = value.to_string().replace(['\n', '\r'], " ");
    if rendered.chars().count() <= MAX_FIELD_CHARS {
        return rendered;
    }
    let mut capped: String = rendered.chars().take(MAX_FIELD_CHARS).collect();
    capped.push_str("...");
    capped
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    match level.trim() {
        "warning" => Ok(LevelFilter::Warn),
        other => other
            .parse()
            .map_err(|_| LoggingError::UnknownLevel(other.to_string())),
    }
}

fn start(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(settings.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={} log_dir={} version={}",
        settings.level,
        settings.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

// Called from inside the `ACTIVE` initializer, so it runs at most once.
fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(field)
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(field))
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!("event=panic module=logging status=error location={location} payload={payload}");
        previous_hook(panic_info);
    }));
}
