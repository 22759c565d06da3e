// Configuration module entry point
// Resolves defaults, caller options and command-line arguments into one immutable config

mod state;
mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ServerError;

pub use state::AppState;
pub use types::{
    LoggingConfig, LoggingOptions, PerformanceConfig, PerformanceOptions, ServerConfig,
    ServerOptions,
};

/// Port used when neither the options nor the command line name one
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Prefix for environment overrides, e.g. `FALLBACK_PORT=8080`
const ENV_PREFIX: &str = "FALLBACK";

/// Separates entries of `FALLBACK_HEADERS`
const HEADER_LIST_SEPARATOR: &str = "|";

impl ServerOptions {
    /// Load options from a config file (without extension) layered under
    /// environment variables. A missing file is not an error.
    ///
    /// `FALLBACK_HEADERS` holds several headers separated by `|`, since
    /// header values themselves may contain `,` or `;`.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        Self::load_layered(config_path, None)
    }

    /// `env` replaces the process environment when given
    fn load_layered(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(HEADER_LIST_SEPARATOR)
                    .with_list_parse_key("headers")
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl ServerConfig {
    /// Resolve options and process arguments into the effective config.
    ///
    /// Port comes from the explicit option, then the first `-pNNNN` argument,
    /// then [`DEFAULT_PORT`]. `cors` and `ls` default to on when absent.
    #[must_use]
    pub fn resolve<I, S>(options: ServerOptions, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let port = options
            .port
            .or_else(|| port_from_args(args))
            .unwrap_or(DEFAULT_PORT);

        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            access_log_format: options
                .logging
                .access_log_format
                .unwrap_or(defaults.access_log_format),
            access_log_file: options.logging.access_log_file,
            error_log_file: options.logging.error_log_file,
        };

        let perf_defaults = PerformanceConfig::default();
        let performance = PerformanceConfig {
            keep_alive: options
                .performance
                .keep_alive
                .unwrap_or(perf_defaults.keep_alive),
            request_timeout: options
                .performance
                .request_timeout
                .unwrap_or(perf_defaults.request_timeout),
        };

        Self {
            port,
            host: options.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            root: resolve_root(options.root),
            cors_enabled: options.cors.unwrap_or(true),
            dir_listing_enabled: options.ls.unwrap_or(true),
            extra_headers: options.headers.unwrap_or_default(),
            logging,
            performance,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{}:{}: {e}", self.host, self.port)))
    }
}

/// Find the first argument shaped like `-p` followed by 3 to 5 digits.
///
/// A matching flag whose value is not a usable port (0 or above 65535) is
/// ignored rather than rejected.
#[must_use]
pub fn port_from_args<I, S>(args: I) -> Option<u16>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .find_map(|arg| port_flag_digits(arg.as_ref()).map(str::to_owned))
        .and_then(|digits| digits.parse::<u16>().ok())
        .filter(|port| *port != 0)
}

fn port_flag_digits(arg: &str) -> Option<&str> {
    let digits = arg.strip_prefix("-p")?;
    let well_formed =
        (3..=5).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
    well_formed.then_some(digits)
}

/// Make the root absolute so probes never depend on the working directory
fn resolve_root(root: Option<PathBuf>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let root = match root {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd,
    };
    canonical_or_self(&root)
}

fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
