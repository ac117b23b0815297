//! Command-line interface definition using clap derive macros.

use clap::Parser;

const LONG_ABOUT: &str = "\
mrcon is a simple Minecraft RCON client.

Flag/env resolution order:
  1. CLI flags (e.g. --host, --port, --password)
  2. Environment variables: MRCON_HOST, MRCON_PORT, MRCON_PASSWORD
  3. If neither is set, the program will error.

Examples:
  mrcon --host 127.0.0.1 --port 25575 --password secret 'say hello'
  MRCON_HOST=127.0.0.1 MRCON_PORT=25575 MRCON_PASSWORD=secret mrcon 'say hello'";

/// Minecraft RCON client
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mrcon")]
#[command(about = "Minecraft RCON client", long_about = LONG_ABOUT)]
#[command(disable_version_flag = true)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// RCON server host
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// RCON server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// RCON password
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Show version information
    #[arg(short, long)]
    pub version: bool,

    /// Output raw response without formatting
    #[arg(short, long)]
    pub raw: bool,

    /// Disable colored output
    #[arg(short, long)]
    pub no_color: bool,

    /// Suppress command output
    #[arg(short, long)]
    pub silent: bool,

    /// Wait time in seconds between commands
    #[arg(short, long, default_value_t = 0)]
    pub wait: u64,

    /// Enable terminal mode for interactive commands
    #[arg(short, long)]
    pub terminal: bool,

    /// Commands to run on the server
    pub commands: Vec<String>,
}

/// The version banner printed by `--version`.
///
/// Commit and build date are taken from the `MRCON_COMMIT_SHA` and
/// `MRCON_BUILD_DATE` environment variables at compile time.
#[must_use]
pub fn version_banner() -> String {
    format!(
        "mrcon version: {}\ncommit: {}\nbuild date: {}\n",
        env!("CARGO_PKG_VERSION"),
        option_env!("MRCON_COMMIT_SHA").unwrap_or("none"),
        option_env!("MRCON_BUILD_DATE").unwrap_or("unknown"),
    )
}
