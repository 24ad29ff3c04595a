use log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::BTreeMap, env, mem, str::FromStr};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("Logger spec parsing error: {0}")]
    ParseLoggerSpecError(String),

    #[error("Log appender `{name}` could not be built: {reason}")]
    Appender { name: &'static str, reason: String },

    #[error("Logger configuration error: {0}")]
    Config(String),

    #[error("Logger initialization error: {0}")]
    Init(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct LoggerSpec {
    pub name: String,
    pub level: LevelFilter,
    pub appenders: Vec<&'static str>,
}

impl LoggerSpec {
    pub fn new(name: String, level: LevelFilter, appenders: Vec<&'static str>) -> Self {
        Self { name, level, appenders }
    }

    pub fn logger(&self) -> Logger {
        Logger::builder().appenders(self.appenders.iter().map(|x| x.to_string())).build(self.name.clone(), self.level)
    }
}

pub(super) struct Loggers {
    loggers: Vec<LoggerSpec>,
    root_level: LevelFilter,
    rejected: Vec<LogError>,
}

impl Loggers {
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    pub fn items(&self) -> impl IntoIterator<Item = Logger> + '_ {
        self.loggers.iter().map(|x| x.logger())
    }

    /// Filter specs that were skipped while parsing.
    pub fn rejected(&self) -> &[LogError] {
        &self.rejected
    }
}

/// Collects per-module levels from filter expressions such as
/// `info,symhd_hdkey=trace`.
///
/// A bare level sets the root level, a bare module name enables every level
/// for that module. Later expressions override earlier ones.
pub(super) struct Builder {
    appenders: Vec<&'static str>,
    loggers: BTreeMap<String, (Vec<&'static str>, LevelFilter)>,
    root_level: Option<LevelFilter>,
    rejected: Vec<LogError>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { appenders: vec![], loggers: BTreeMap::new(), root_level: None, rejected: vec![] }
    }

    pub fn parse_env(&mut self, env: &str) -> &mut Self {
        self.parse_expression(&env::var(env).unwrap_or_default())
    }

    /// Initializes the builder from a specs expression.
    pub fn from_expression(expression: &str) -> Self {
        let mut builder = Self::new();
        builder.parse_expression(expression);
        builder
    }

    pub fn parse_expression(&mut self, expression: &str) -> &mut Self {
        for spec in expression.split(',').map(|x| x.trim()) {
            if spec.is_empty() {
                continue;
            }
            match Self::parse_spec(spec) {
                Ok((Some(name), level)) => {
                    self.logger(name.to_string(), level);
                }
                Ok((None, level)) => {
                    self.root_level(level);
                }
                Err(err) => self.rejected.push(err),
            }
        }
        self
    }

    fn parse_spec(spec: &str) -> Result<(Option<&str>, LevelFilter), LogError> {
        let mut parts = spec.split('=');
        match (parts.next(), parts.next().map(|x| x.trim()), parts.next()) {
            // a single level string defines the root level
            (Some(part0), None, None) => match part0.parse() {
                Ok(level) => Ok((None, level)),
                Err(_) => Ok((Some(part0.trim()), LevelFilter::max())),
            },
            (Some(part0), Some(""), None) => Ok((Some(part0.trim()), LevelFilter::max())),
            (Some(part0), Some(part1), None) => {
                part1.parse().map(|level| (Some(part0.trim()), level)).map_err(|_| LogError::ParseLoggerSpecError(spec.to_string()))
            }
            _ => Err(LogError::ParseLoggerSpecError(spec.to_string())),
        }
    }

    pub fn appenders(&mut self, appenders: impl Iterator<Item = &'static str>) -> &mut Self {
        self.appenders = appenders.collect();
        self
    }

    pub fn root_level(&mut self, root_level: LevelFilter) -> &mut Self {
        self.root_level.replace(root_level);
        self
    }

    pub fn logger(&mut self, name: String, level: LevelFilter) -> &mut Self {
        self.loggers.insert(name, (self.appenders.clone(), level));
        self
    }

    pub fn build(&mut self) -> Loggers {
        let loggers =
            mem::take(&mut self.loggers).into_iter().map(|(name, (appenders, level))| LoggerSpec::new(name, level, appenders)).collect();
        Loggers { loggers, root_level: self.root_level.take().unwrap_or(LevelFilter::Error), rejected: mem::take(&mut self.rejected) }
    }
}

impl FromStr for Builder {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_expression(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_level() {
        let loggers = Builder::from_expression("debug").build();
        assert_eq!(loggers.root_level(), LevelFilter::Debug);
        assert!(loggers.loggers.is_empty());

        assert_eq!(Builder::new().build().root_level(), LevelFilter::Error);
        assert_eq!(Builder::from_expression("info, warn").build().root_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_module_levels() {
        let mut builder = Builder::new();
        builder.appenders(["stderr", "log_file"].into_iter()).parse_expression("info,symhd_hdkey=trace, symhd_hashes ,symhd=");
        let loggers = builder.build();
        assert_eq!(loggers.root_level(), LevelFilter::Info);
        assert_eq!(
            loggers.loggers,
            vec![
                LoggerSpec::new("symhd".into(), LevelFilter::Trace, vec!["stderr", "log_file"]),
                LoggerSpec::new("symhd_hashes".into(), LevelFilter::Trace, vec!["stderr", "log_file"]),
                LoggerSpec::new("symhd_hdkey".into(), LevelFilter::Trace, vec!["stderr", "log_file"]),
            ]
        );
        assert!(loggers.rejected().is_empty());
    }

    #[test]
    fn test_later_specs_override() {
        let loggers = "symhd=debug,symhd=warn".parse::<Builder>().unwrap().build();
        assert_eq!(loggers.loggers.len(), 1);
        assert_eq!(loggers.loggers[0].level, LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_specs_are_rejected() {
        let loggers = Builder::from_expression("info,symhd=loud,a=b=c").build();
        assert_eq!(loggers.root_level(), LevelFilter::Info);
        assert!(loggers.loggers.is_empty());
        assert_eq!(
            loggers.rejected(),
            &[LogError::ParseLoggerSpecError("symhd=loud".into()), LogError::ParseLoggerSpecError("a=b=c".into())]
        );
    }
}
