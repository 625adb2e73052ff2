//! Server configuration from the command line and environment.

use thiserror::Error;

use crate::{domain::DEFAULT_PARTICIPANT_CAPACITY, usecase::RenameNoticePolicy};

pub const DEFAULT_PORT: u16 = 8989;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_LOG_PATH: &str = "/tmp/log.txt";

/// Printed for `help`, too many arguments, or an invalid port.
pub const USAGE: &str = "[USAGE]: ./TCPChat $port";

pub const ENV_HOST: &str = "TCP_CHAT_HOST";
pub const ENV_MAX_PARTICIPANTS: &str = "TCP_CHAT_MAX_PARTICIPANTS";
pub const ENV_LOG_PATH: &str = "TCP_CHAT_LOG_PATH";
pub const ENV_HISTORY_LIMIT: &str = "TCP_CHAT_HISTORY_LIMIT";
pub const ENV_RENAME_NOTICE: &str = "TCP_CHAT_RENAME_NOTICE";
pub const ENV_ADMIN_ADDR: &str = "TCP_CHAT_ADMIN_ADDR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// What the positional arguments ask the binary to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Print the usage line and exit successfully.
    Usage,
    /// Serve on the given port.
    Serve(u16),
}

/// Interpret the positional arguments (program name excluded).
pub fn parse_positional(args: &[String]) -> Result<Launch, ConfigError> {
    match args {
        [] => Ok(Launch::Serve(DEFAULT_PORT)),
        [arg] if arg == "help" => Ok(Launch::Usage),
        [port] => port
            .parse::<u16>()
            .map(Launch::Serve)
            .map_err(|_| ConfigError::InvalidPort(port.clone())),
        _ => Ok(Launch::Usage),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_participants: usize,
    pub log_path: String,
    /// `None` keeps the full history.
    pub history_limit: Option<usize>,
    pub rename_notice: RenameNoticePolicy,
    /// Enables the read-only admin HTTP API when set.
    pub admin_addr: Option<String>,
}

impl ServerConfig {
    /// Defaults for everything except the port.
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            max_participants: DEFAULT_PARTICIPANT_CAPACITY,
            log_path: DEFAULT_LOG_PATH.to_string(),
            history_limit: None,
            rename_notice: RenameNoticePolicy::default(),
            admin_addr: None,
        }
    }

    pub fn from_env(port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(port, |key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(port: u16, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new(port);

        if let Some(host) = get(ENV_HOST) {
            config.host = host.trim().to_string();
        }
        if let Some(value) = get(ENV_MAX_PARTICIPANTS) {
            config.max_participants = parse_positive(ENV_MAX_PARTICIPANTS, &value)?;
        }
        if let Some(path) = get(ENV_LOG_PATH) {
            config.log_path = path;
        }
        if let Some(value) = get(ENV_HISTORY_LIMIT) {
            config.history_limit = Some(parse_positive(ENV_HISTORY_LIMIT, &value)?);
        }
        if let Some(value) = get(ENV_RENAME_NOTICE) {
            config.rename_notice =
                value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: ENV_RENAME_NOTICE,
                        value: value.clone(),
                        reason,
                    })?;
        }
        config.admin_addr = get(ENV_ADMIN_ADDR).map(|addr| addr.trim().to_string());

        Ok(config)
    }

    /// `host:port` for the chat listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
