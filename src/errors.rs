//! All the errors defined by this crate.

use std::io::{self, ErrorKind};
use thiserror::Error;

/// An error from the RCON protocol.
#[derive(Error, Debug)]
pub enum RconProtocolError {
    /// Authentication failed. You probably entered the wrong RCON password.
    #[error("authentication failed")]
    AuthFailed,

    /// Invalid or unexpected packet type recieved from the server.
    #[error("invalid packet type")]
    InvalidPacketType,

    /// Other kind of invalid response, such as a bad length or missing padding.
    #[error("invalid rcon response")]
    InvalidRconResponse,

    /// Payload too long.
    ///
    /// | Direction   | Payload Length limit |
    /// | ----------- | -------------------- |
    /// | Serverbound | 1446                 |
    /// | Clientbound | 4096                 |
    #[error("payload too long")]
    PayloadTooLong,

    /// Mismatch with the given request ID.
    ///
    /// Note: the server replies with a request ID of -1 in the case of an
    /// authentication failure. In that case, `AuthFailed` will be returned.
    /// This variant is returned if any *other* request ID was recieved.
    #[error("request id mismatch")]
    RequestIdMismatch,
}

impl From<RconProtocolError> for io::Error {
    fn from(err: RconProtocolError) -> Self {
        io::Error::new(ErrorKind::InvalidData, err)
    }
}

/// One of the inputs the client cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// `--host` or `MRCON_HOST`.
    Host,
    /// `--port` or `MRCON_PORT`.
    Port,
    /// `--password` or `MRCON_PASSWORD`.
    Password,
    /// At least one positional command, unless terminal mode is on.
    Command,
}

/// Required configuration was not supplied by flags or environment.
///
/// The message always names every required input, whichever ones are
/// actually missing; use [`ConfigurationError::missing`] to find out which.
#[derive(Error, Debug)]
#[error(
    "--host, --port, --password, and a command are required. \
     You can also set MRCON_HOST, MRCON_PORT, MRCON_PASSWORD."
)]
pub struct ConfigurationError {
    missing: Vec<Requirement>,
}

impl ConfigurationError {
    pub(crate) fn new(missing: Vec<Requirement>) -> Self {
        Self { missing }
    }

    /// The requirements that were not satisfied.
    #[must_use]
    pub fn missing(&self) -> &[Requirement] {
        &self.missing
    }
}

/// A single command failed to round-trip. Never fatal to the run.
#[derive(Error, Debug)]
#[error("{source}")]
pub struct CommandExecutionError {
    /// The command that was being executed.
    pub command: String,

    /// What went wrong.
    #[source]
    pub source: io::Error,
}

/// Top-level error of a `mrcon` run.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is missing.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Dialing or authenticating with the server failed.
    #[error("failed to connect to {address}: {source}")]
    Connection {
        /// The `host:port` pair that was dialed.
        address: String,

        /// The underlying network or protocol error.
        #[source]
        source: io::Error,
    },

    /// Reading commands or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for fallible `mrcon` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_every_requirement() {
        let err = ConfigurationError::new(vec![Requirement::Password]);
        let message = err.to_string();

        assert!(message.contains("--host, --port, --password"));
        assert!(message.contains("MRCON_HOST, MRCON_PORT, MRCON_PASSWORD"));
        assert_eq!(err.missing(), &[Requirement::Password]);
    }

    #[test]
    fn protocol_error_becomes_invalid_data() {
        let err: io::Error = RconProtocolError::AuthFailed.into();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn connection_error_mentions_address() {
        let err = Error::Connection {
            address: "127.0.0.1:25575".to_string(),
            source: io::Error::new(ErrorKind::ConnectionRefused, "connection refused"),
        };

        assert_eq!(
            err.to_string(),
            "failed to connect to 127.0.0.1:25575: connection refused"
        );
    }
}
