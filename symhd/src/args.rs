use clap::{Arg, ArgAction, Command, arg};
use serde::Deserialize;
use std::{ffi::OsString, fs};
use symhd_hashes::HashKind;
use toml::from_str;

pub const DEFAULT_SCHEMA: &str = "m / application: any / purpose: any / context: any / index: num";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Args {
    // NOTE: property names match config file fields
    pub hash: HashKind,
    pub schema: String,
    pub secret: Option<String>,
    pub path: String,
    pub verify_parent: Option<String>,
    #[serde(rename = "loglevel")]
    pub log_level: String,
    pub logdir: Option<String>,
    pub json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            hash: HashKind::default(),
            schema: DEFAULT_SCHEMA.into(),
            secret: None,
            path: "m".into(),
            verify_parent: None,
            log_level: "info".into(),
            logdir: None,
            json: false,
        }
    }
}

pub fn cli() -> Command {
    let defaults: Args = Default::default();

    #[allow(clippy::let_and_return)]
    let cmd = Command::new("symhd")
        .about(format!("{} v{}", env!("CARGO_PKG_DESCRIPTION"), env!("CARGO_PKG_VERSION")))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg!(-C --configfile <CONFIG_FILE> "Path of a TOML config file."))
        .arg(
            Arg::new("hash")
                .short('H')
                .long("hash")
                .env("SYMHD_HASH")
                .value_name("ADAPTER")
                .value_parser(clap::value_parser!(HashKind))
                .help(format!(
                    "Hash adapter, one of {{{}}} (default: {}).",
                    HashKind::ALL.map(|kind| kind.as_str()).join(", "),
                    defaults.hash
                )),
        )
        .arg(
            Arg::new("schema")
                .short('s')
                .long("schema")
                .env("SYMHD_SCHEMA")
                .value_name("SCHEMA")
                .help(format!("Path schema (default: `{}`).", defaults.schema)),
        )
        .arg(
            Arg::new("secret")
                .long("secret")
                .env("SYMHD_SECRET")
                .hide_env_values(true)
                .value_name("SECRET")
                .help("Master secret; even-length hex text is decoded, anything else is used as UTF-8."),
        )
        .arg(Arg::new("path").short('p').long("path").value_name("PATH").help("Derivation path such as m/42/0/1/0 (default: m)."))
        .arg(
            Arg::new("verify-parent")
                .long("verify-parent")
                .value_name("PARENT_KEY_HEX")
                .help("Check that the given hex key is the parent of the derived key."),
        )
        .arg(
            Arg::new("log_level")
                .short('d')
                .long("loglevel")
                .env("SYMHD_LOG_LEVEL")
                .value_name("LEVEL")
                .default_value("info")
                .help("Logging level for all subsystems {off, error, warn, info, debug, trace}\n-- You may also specify <subsystem>=<level>,<subsystem2>=<level>,... to set the log level for individual subsystems.".to_string()),
        )
        .arg(arg!(--logdir <LOG_DIR> "Directory to log output."))
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue).help("Print the result as JSON."));

    cmd
}

/// Parse process arguments, printing the error and exiting on failure.
pub fn parse_args() -> Args {
    match Args::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    }
}

impl Args {
    /// Command line values take precedence over the config file, which takes
    /// precedence over built-in defaults.
    pub fn parse<I, T>(itr: I) -> Result<Args, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let m: clap::ArgMatches = cli().try_get_matches_from(itr)?;
        let mut defaults: Args = Default::default();

        if let Some(config_file) = m.get_one::<String>("configfile") {
            let config_str = fs::read_to_string(config_file)?;
            defaults = from_str(&config_str).map_err(|toml_error| {
                clap::Error::raw(
                    clap::error::ErrorKind::ValueValidation,
                    format!("failed parsing config file, reason: {}", toml_error.message()),
                )
            })?;
        }

        let args = Args {
            hash: arg_match_unwrap_or::<HashKind>(&m, "hash", defaults.hash),
            schema: arg_match_unwrap_or::<String>(&m, "schema", defaults.schema),
            secret: m.get_one::<String>("secret").cloned().or(defaults.secret),
            path: arg_match_unwrap_or::<String>(&m, "path", defaults.path),
            verify_parent: m.get_one::<String>("verify-parent").cloned().or(defaults.verify_parent),
            log_level: arg_match_unwrap_or::<String>(&m, "log_level", defaults.log_level),
            logdir: m.get_one::<String>("logdir").cloned().or(defaults.logdir),
            json: m.get_flag("json") || defaults.json,
        };

        if args.secret.is_none() {
            return Err(clap::Error::raw(
                clap::error::ErrorKind::MissingRequiredArgument,
                "a master secret is required (--secret, SYMHD_SECRET or `secret` in the config file)\n",
            ));
        }

        Ok(args)
    }
}

use clap::parser::ValueSource::DefaultValue;

fn arg_match_unwrap_or<T: Clone + Send + Sync + 'static>(m: &clap::ArgMatches, arg_id: &str, default: T) -> T {
    m.get_one::<T>(arg_id).cloned().filter(|_| m.value_source(arg_id) != Some(DefaultValue)).unwrap_or(default)
}
