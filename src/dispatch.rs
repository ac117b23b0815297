//! Sending commands to a [`Session`] and reporting what comes back.
//!
//! Batch mode and terminal mode only differ in where commands come from:
//! both hand each command to the same routine, which executes it and either
//! formats the response or reports the failure and moves on.

use crate::{
    config::{Config, Mode},
    errors::{CommandExecutionError, Result},
    output::Formatter,
};
use async_trait::async_trait;
use std::{
    io::{self, Write},
    time::Duration,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Printed to standard error when terminal mode starts.
pub const TERMINAL_BANNER: &str = "Entering terminal mode. Type commands, Ctrl+C to exit.";

const PROMPT: &str = "> ";

/// An authenticated connection that commands can be run against.
#[async_trait]
pub trait Session: Send {
    /// Run `command` on the server and return its response.
    ///
    /// # Errors
    /// Returns `Err` if the command could not be sent or its response could
    /// not be read.
    async fn execute(&mut self, command: &str) -> io::Result<String>;
}

/// Runs commands against a borrowed [`Session`], writing responses to `out`
/// and failures to `err`.
pub struct Dispatcher<'a, S: ?Sized, O, E> {
    session: &'a mut S,
    formatter: Formatter,
    wait: Duration,
    out: O,
    err: E,
}

impl<'a, S, O, E> Dispatcher<'a, S, O, E>
where
    S: Session + ?Sized,
    O: Write,
    E: Write,
{
    /// Create a dispatcher that pauses for `wait` after each batch command.
    pub fn new(session: &'a mut S, formatter: Formatter, wait: Duration, out: O, err: E) -> Self {
        Self {
            session,
            formatter,
            wait,
            out,
            err,
        }
    }

    /// Execute every command in order, pausing for `wait` after each one.
    /// A failed command is reported and skipped; it never stops the batch.
    ///
    /// # Errors
    /// Returns `Err` only if writing to `out` or `err` fails.
    pub async fn run_batch(&mut self, commands: &[String]) -> io::Result<()> {
        for command in commands {
            self.process(command).await?;

            if !self.wait.is_zero() {
                debug!(wait = ?self.wait, "pausing after command");
                tokio::time::sleep(self.wait).await;
            }
        }

        Ok(())
    }

    /// Prompt for commands on `err` and execute each non-empty line read
    /// from `input`, until `input` is exhausted.
    ///
    /// Lines are split on raw bytes; invalid UTF-8 is replaced rather than
    /// ending the session.
    ///
    /// # Errors
    /// Returns `Err` if reading `input` or writing `out`/`err` fails.
    pub async fn run_terminal<R>(&mut self, mut input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(self.err, "{TERMINAL_BANNER}")?;

        let mut buf = Vec::new();

        loop {
            write!(self.err, "{PROMPT}")?;
            self.err.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                debug!("end of input");
                break;
            }

            let line = strip_line_ending(&buf);
            if line.is_empty() {
                continue;
            }

            self.process(&String::from_utf8_lossy(line)).await?;
        }

        Ok(())
    }

    async fn process(&mut self, command: &str) -> io::Result<()> {
        debug!(command, "executing command");

        match self.session.execute(command).await {
            Ok(response) => self.formatter.write_response(&mut self.out, &response),
            Err(source) => {
                let err = CommandExecutionError {
                    command: command.to_string(),
                    source,
                };
                debug!(command = %err.command, error = %err, "command failed");

                writeln!(self.err, "Error: {err}")
            }
        }
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Run the commands described by `config` against `session`, in batch or
/// terminal mode. Terminal mode reads from `input`; batch mode ignores it.
///
/// # Errors
/// Returns `Err` if reading input or writing output fails. Failed commands
/// are reported on `err` and are not errors of the run.
pub async fn dispatch<S, R, O, E>(
    session: &mut S,
    config: &Config,
    input: R,
    out: O,
    err: E,
) -> Result<()>
where
    S: Session + ?Sized,
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    let formatter = Formatter::new(config.output);
    let mut dispatcher = Dispatcher::new(session, formatter, config.wait, out, err);

    match config.mode {
        Mode::Batch => dispatcher.run_batch(&config.commands).await?,
        Mode::Terminal => dispatcher.run_terminal(input).await?,
    }

    Ok(())
}
