//! Hangar - encrypted identities and a resource tree for remote servers.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hangar::cli::output;
use hangar::cli::{execute, Cli};
use hangar::core::constants::LOG_ENV;
use hangar::error::{ConfigError, Error, ErrorKind, ExternalError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("hangar=debug")
        } else {
            EnvFilter::new("hangar=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NotInitialized(_)) => Some("run: hangar config init"),
            Error::Config(ConfigError::MissingKey(_)) => Some("generate one with: openssl rand -hex 32"),
            Error::External(ExternalError::NoClient(_)) => {
                Some("connect and power actions need a client wired in through the library")
            }
            _ if e.kind() == ErrorKind::Integrity => {
                Some("the stored secret does not match the encryption key")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
