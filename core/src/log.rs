//!
//! Logger setup for symhd binaries and tests.
//!
//! Records always go to stderr. When a log directory is given they also go
//! to a rolling log file, with warnings and errors copied to a separate one.
//!

pub use log::{Level, LevelFilter, debug, error, info, trace, warn};

mod appender;
mod consts;
mod logger;

pub use consts::{DEFAULT_LOGGER_ENV, ERR_LOG_FILE_NAME, LOG_FILE_NAME};
pub use logger::LogError;

use appender::AppenderSpec;
use log4rs::{
    Config,
    config::{Appender, Root},
};
use logger::Builder;
use std::{iter::once, path::Path};

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Build the logger configuration.
///
/// `filters` uses the `RUST_LOG` syntax and is applied after the
/// `RUST_LOG` environment variable itself, so explicit filters win.
fn config(log_dir: Option<&Path>, filters: &str) -> Result<Config, LogError> {
    let stderr_appender = AppenderSpec::console(CONSOLE_APPENDER, None);
    let file_appender = log_dir.map(|dir| AppenderSpec::roller(LOG_FILE_APPENDER, None, dir, LOG_FILE_NAME)).transpose()?;
    let err_file_appender = log_dir
        .map(|dir| AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), dir, ERR_LOG_FILE_NAME))
        .transpose()?;

    let specs = once(stderr_appender).chain(file_appender).chain(err_file_appender).collect::<Vec<_>>();
    let names = specs.iter().map(|spec| spec.name).collect::<Vec<_>>();

    let loggers = Builder::new()
        .root_level(LevelFilter::Info)
        .appenders(names.iter().copied())
        .parse_env(consts::DEFAULT_LOGGER_ENV)
        .parse_expression(filters)
        .build();

    let config = Config::builder()
        .appenders(specs.into_iter().map(AppenderSpec::appender).collect::<Vec<Appender>>())
        .loggers(loggers.items())
        .build(Root::builder().appenders(names.iter().copied()).build(loggers.root_level()))
        .map_err(|err| LogError::Config(err.to_string()))?;

    for rejected in loggers.rejected() {
        eprintln!("Ignoring invalid logging spec: {rejected}");
    }

    Ok(config)
}

/// Install the global logger.
///
/// Fails if an appender cannot be created or a logger is already installed.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    let config = config(log_dir.map(Path::new), filters)?;
    log4rs::init_config(config).map_err(|err| LogError::Init(err.to_string()))?;
    Ok(())
}
