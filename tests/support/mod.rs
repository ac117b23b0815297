//! A blocking fake RCON server running on its own thread.

#![allow(dead_code)]

use std::{
    io::{self, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex},
    thread,
    time::Instant,
};

pub const PASSWORD: &str = "secret";

/// What the fake server saw, shared with the test.
#[derive(Debug, Default)]
pub struct Transcript {
    pub commands: Vec<(String, Instant)>,
    pub authenticated: bool,
}

pub struct FakeServer {
    pub port: u16,
    transcript: Arc<Mutex<Transcript>>,
}

impl FakeServer {
    /// Serve a single connection, answering commands with `reply`.
    pub fn start(reply: fn(&str) -> String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let transcript = Arc::new(Mutex::new(Transcript::default()));

        let shared = Arc::clone(&transcript);
        thread::spawn(move || {
            if let Ok((socket, _)) = listener.accept() {
                // the client hanging up ends the session
                let _ = serve(socket, reply, &shared);
            }
        });

        Self { port, transcript }
    }

    pub fn commands(&self) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap()
            .commands
            .iter()
            .map(|(c, _)| c.clone())
            .collect()
    }

    pub fn timestamps(&self) -> Vec<Instant> {
        self.transcript
            .lock()
            .unwrap()
            .commands
            .iter()
            .map(|(_, t)| *t)
            .collect()
    }

    pub fn authenticated(&self) -> bool {
        self.transcript.lock().unwrap().authenticated
    }

    pub fn port_arg(&self) -> String {
        self.port.to_string()
    }
}

/// Port that nothing is listening on.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn read_i32(socket: &mut TcpStream) -> io::Result<i32> {
    let mut buf = [0; 4];
    socket.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_request(socket: &mut TcpStream) -> io::Result<(i32, i32, String)> {
    let len = read_i32(socket)?;
    let id = read_i32(socket)?;
    let packet_type = read_i32(socket)?;

    let mut body = vec![0; len as usize - 8];
    socket.read_exact(&mut body)?;
    body.truncate(body.len() - 2);

    Ok((id, packet_type, String::from_utf8_lossy(&body).into_owned()))
}

fn write_reply(socket: &mut TcpStream, id: i32, packet_type: i32, body: &str) -> io::Result<()> {
    let mut packet = Vec::new();
    packet.extend_from_slice(&(body.len() as i32 + 10).to_le_bytes());
    packet.extend_from_slice(&id.to_le_bytes());
    packet.extend_from_slice(&packet_type.to_le_bytes());
    packet.extend_from_slice(body.as_bytes());
    packet.extend_from_slice(&[0, 0]);
    socket.write_all(&packet)
}

fn serve(
    mut socket: TcpStream,
    reply: fn(&str) -> String,
    transcript: &Mutex<Transcript>,
) -> io::Result<()> {
    let (id, _, password) = read_request(&mut socket)?;
    if password != PASSWORD {
        return write_reply(&mut socket, -1, 2, "");
    }
    transcript.lock().unwrap().authenticated = true;
    write_reply(&mut socket, id, 2, "")?;

    loop {
        let (id, packet_type, command) = read_request(&mut socket)?;

        // end-of-response marker, answered the way vanilla servers do
        if packet_type == 0 {
            write_reply(&mut socket, id, 0, "Unknown request 0")?;
            continue;
        }

        transcript
            .lock()
            .unwrap()
            .commands
            .push((command.clone(), Instant::now()));
        write_reply(&mut socket, id, 0, &reply(&command))?;
    }
}
