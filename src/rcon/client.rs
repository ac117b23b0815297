//! Implementation of the [RCON](https://wiki.vg/RCON) protocol.

use super::{
    packet::{RconPacket, RconPacketType, EMPTY_REMAINING_LEN},
    MAX_LEN_CLIENTBOUND, MAX_LEN_SERVERBOUND,
};
use crate::{dispatch::Session, errors::RconProtocolError};
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::{
    io::{self, AsyncReadExt, AsyncWriteExt, Error},
    net::TcpStream,
};
use tracing::debug;

/// Struct that stores the connection and other state of the RCON protocol with the server.
///
/// # Examples
///
/// ```no_run
/// use mrcon::rcon::RconClient;
/// use tokio::io::Result;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let mut client = RconClient::connect("localhost", 25575, "password").await?;
///
///     let output = client.run_command("time set day").await?;
///     println!("{output}");
///
///     client.disconnect().await
/// }
/// ```
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct RconClient {
    socket: TcpStream,
    /// Request id of the previous end-of-response marker.
    last_marker: Option<i32>,
}

impl RconClient {
    /// Construct an [`RconClient`] that connects to the given host and port.
    /// Note: to authenticate use the `authenticate` method, this method does not take a password.
    ///
    /// Clients wait arbitrarily long (maybe forever!) to recieve a response from the server.
    ///
    /// # Arguments
    /// * `host` - A string slice that holds the hostname of the server to connect to.
    /// * `port` - The port to connect to.
    ///
    /// # Errors
    /// Returns `Err` if there was a network error.
    pub async fn new(host: &str, port: u16) -> io::Result<Self> {
        let socket = TcpStream::connect((host, port)).await?;
        debug!(host, port, "tcp connection established");

        Ok(Self {
            socket,
            last_marker: None,
        })
    }

    /// Connect to the server and authenticate in one step.
    ///
    /// # Errors
    /// Returns `Err` on any condition that [`RconClient::new`] or
    /// [`RconClient::authenticate`] does.
    pub async fn connect(host: &str, port: u16, password: &str) -> io::Result<Self> {
        let mut client = Self::new(host, port).await?;
        client.authenticate(password).await?;

        Ok(client)
    }

    /// Disconnect from the server and close the RCON connection.
    ///
    /// # Errors
    /// Returns `Err` if there was an issue closing the connection.
    pub async fn disconnect(mut self) -> io::Result<()> {
        self.socket.shutdown().await
    }

    /// Authenticate with the server, with the given password.
    ///
    /// If authentication fails, this method will return [`RconProtocolError::AuthFailed`].
    ///
    /// # Arguments
    /// * `password` - A string slice that holds the RCON password.
    ///
    /// # Errors
    /// Returns the raw `tokio::io::Error` if there was a network error.
    /// Returns an apprpriate [`RconProtocolError`] if the authentication failed for other reasons.
    pub async fn authenticate(&mut self, password: &str) -> io::Result<()> {
        let request_id = next_request_id();
        let packet = RconPacket::new(request_id, RconPacketType::Login, password.to_string());

        self.write_packet(packet).await?;

        let packet = loop {
            let packet = self.read_packet().await?;

            // source engine servers send an empty response value ahead of the auth response
            if packet.packet_type == RconPacketType::ResponseValue && packet.payload.is_empty() {
                continue;
            }

            break packet;
        };

        if packet.packet_type != RconPacketType::ExecCommand {
            return Err(RconProtocolError::InvalidPacketType.into());
        }

        if packet.request_id == -1 {
            return Err(RconProtocolError::AuthFailed.into());
        } else if packet.request_id != request_id {
            return Err(RconProtocolError::RequestIdMismatch.into());
        }

        debug!("authenticated");
        Ok(())
    }

    /// Run the given command on the server and return the result.
    ///
    /// The command is followed by an empty response-value packet. Servers
    /// answer requests in order, so the reply to that marker ends the
    /// command's response, however many fragments it was split into.
    ///
    /// # Arguments
    /// * `command` - A string slice that holds the command to run. Must be under 1446 bytes in length.
    ///
    /// # Errors
    /// Returns an error if there was a network issue or an [`RconProtocolError`] for other failures.
    pub async fn run_command(&mut self, command: &str) -> io::Result<String> {
        if command.len() > MAX_LEN_SERVERBOUND {
            return Err(RconProtocolError::PayloadTooLong.into());
        }

        let request_id = next_request_id();
        let marker_id = loop {
            let id = next_request_id();
            if id != request_id && Some(id) != self.last_marker {
                break id;
            }
        };

        let packet = RconPacket::new(request_id, RconPacketType::ExecCommand, command.to_string());
        self.write_packet(packet).await?;

        let marker = RconPacket::new(marker_id, RconPacketType::ResponseValue, Bytes::new());
        self.write_packet(marker).await?;

        let mut full_payload = BytesMut::new();

        loop {
            let recieved = self.read_packet().await?;

            if recieved.request_id == marker_id {
                break;
            } else if recieved.request_id == -1 {
                return Err(RconProtocolError::AuthFailed.into());
            } else if Some(recieved.request_id) == self.last_marker {
                // source engine servers follow the marker echo with one more packet
                continue;
            } else if recieved.request_id != request_id {
                return Err(RconProtocolError::RequestIdMismatch.into());
            }

            full_payload.extend_from_slice(&recieved.payload);
        }

        self.last_marker = Some(marker_id);

        Ok(String::from_utf8_lossy(&full_payload).into_owned())
    }

    /// Read a packet from the socket.
    async fn read_packet(&mut self) -> io::Result<RconPacket> {
        let len = self.socket.read_i32_le().await?;

        let remaining = usize::try_from(len)
            .ok()
            .filter(|n| (EMPTY_REMAINING_LEN..=MAX_LEN_CLIENTBOUND + EMPTY_REMAINING_LEN).contains(n))
            .ok_or(RconProtocolError::InvalidRconResponse)?;

        let mut bytes = BytesMut::with_capacity(4 + remaining);
        bytes.put_i32_le(len);
        bytes.resize(4 + remaining, 0);

        self.socket.read_exact(&mut bytes[4..]).await?;

        RconPacket::try_from(bytes.freeze()).map_err(Error::from)
    }

    /// Write a packet to the socket.
    ///
    /// # Arguments
    /// * `packet` - An owned [`RconPacket`] to write to the socket.
    async fn write_packet(&mut self, packet: RconPacket) -> io::Result<()> {
        let bytes = packet.bytes();

        self.socket.write_all(&bytes).await
    }
}

#[async_trait]
impl Session for RconClient {
    async fn execute(&mut self, command: &str) -> io::Result<String> {
        self.run_command(command).await
    }
}

/// A fresh non-negative request id. Never `-1`, which servers reserve for auth failures.
fn next_request_id() -> i32 {
    rand::random::<i32>() & i32::MAX
}
