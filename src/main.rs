use clap::{CommandFactory, Parser};
use mrcon::{
    cli::{version_banner, Cli},
    config::Config,
    dispatch::dispatch,
    errors::{Error, Result},
    rcon::RconClient,
};
use std::{io, process::ExitCode};
use tokio::io::BufReader;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("MRCON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, Error::Configuration(_)) {
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.version {
        print!("{}", version_banner());
        return Ok(());
    }

    let config = Config::resolve(cli)?;

    debug!(address = %config.address(), mode = ?config.mode, "connecting");
    let mut client = RconClient::connect(&config.host, config.port, &config.password)
        .await
        .map_err(|source| Error::Connection {
            address: config.address(),
            source,
        })?;

    let stdin = BufReader::new(tokio::io::stdin());
    let result = dispatch(&mut client, &config, stdin, io::stdout(), io::stderr()).await;

    if let Err(e) = client.disconnect().await {
        warn!(error = %e, "failed to close rcon connection");
    }

    result
}
