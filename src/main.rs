use std::io::stderr;
use std::process::ExitCode;

use gnome_keyring_master_password::cli;
use gnome_keyring_master_password::service::DbusBackend;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    ExitCode::from(cli::run(std::env::args_os(), DbusBackend::new))
}
