//! Resolution of the run configuration from command-line flags and the
//! `MRCON_*` environment variables.

use crate::{
    cli::Cli,
    errors::{ConfigurationError, Requirement},
    output::OutputOptions,
};
use std::{env, time::Duration};
use tracing::warn;

/// Environment variable consulted when `--host` is absent.
pub const HOST_ENV: &str = "MRCON_HOST";
/// Environment variable consulted when `--port` is absent.
pub const PORT_ENV: &str = "MRCON_PORT";
/// Environment variable consulted when `--password` is absent.
pub const PASSWORD_ENV: &str = "MRCON_PASSWORD";

/// Where commands come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the positional commands, then exit.
    Batch,
    /// Read commands from standard input until it is exhausted.
    Terminal,
}

/// Everything needed for one run, validated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host name or address.
    pub host: String,
    /// Server RCON port, never zero.
    pub port: u16,
    /// RCON password, never empty.
    pub password: String,
    /// Positional commands. Non-empty in [`Mode::Batch`].
    pub commands: Vec<String>,
    /// Batch or terminal mode.
    pub mode: Mode,
    /// Response rendering.
    pub output: OutputOptions,
    /// Pause after each batch command.
    pub wait: Duration,
}

impl Config {
    /// Resolve a configuration from `cli`, falling back to the process
    /// environment for host, port and password.
    ///
    /// # Errors
    /// Returns [`ConfigurationError`] if host, port or password are missing,
    /// or no command was given outside terminal mode.
    pub fn resolve(cli: Cli) -> Result<Self, ConfigurationError> {
        Self::resolve_with(cli, |key| env::var(key).ok())
    }

    /// Like [`Config::resolve`], reading environment variables through `lookup`.
    ///
    /// # Errors
    /// See [`Config::resolve`].
    pub fn resolve_with<F>(cli: Cli, lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let host = cli
            .host
            .filter(|host| !host.is_empty())
            .or_else(|| lookup(HOST_ENV));
        let port = cli
            .port
            .filter(|port| *port != 0)
            .or_else(|| lookup(PORT_ENV).and_then(|raw| parse_port(&raw)));
        let password = cli
            .password
            .filter(|password| !password.is_empty())
            .or_else(|| lookup(PASSWORD_ENV));
        let mode = if cli.terminal {
            Mode::Terminal
        } else {
            Mode::Batch
        };

        let mut missing = Vec::new();
        if host.is_none() {
            missing.push(Requirement::Host);
        }
        if port.is_none() {
            missing.push(Requirement::Port);
        }
        if password.is_none() {
            missing.push(Requirement::Password);
        }
        if mode == Mode::Batch && cli.commands.is_empty() {
            missing.push(Requirement::Command);
        }

        match (host, port, password) {
            (Some(host), Some(port), Some(password)) if missing.is_empty() => Ok(Self {
                host,
                port,
                password,
                commands: cli.commands,
                mode,
                output: OutputOptions {
                    raw: cli.raw,
                    no_color: cli.no_color,
                    silent: cli.silent,
                },
                wait: Duration::from_secs(cli.wait),
            }),
            _ => Err(ConfigurationError::new(missing)),
        }
    }

    /// The `host:port` pair, for messages.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Some(port),
        _ => {
            warn!(value = raw, "ignoring {PORT_ENV}, not a port number");
            None
        }
    }
}
