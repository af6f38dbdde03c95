use anyhow::Context;
use flite_cli::{display, Session};
use flite_store::{app_config::Config, load_dataset, ReservationStore};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let mut config = Config::load().context("Failed to load config")?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset.path = PathBuf::from(path);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!(cabin = %config.cabin, dataset = %config.dataset.path.display(), "Starting flight reservation system");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "===== FLIGHT RESERVATION SYSTEM =====")?;
    writeln!(out, "\nLoading passenger data...")?;

    let mut store = ReservationStore::new(config.cabin);
    let report = match load_dataset(&mut store, &config.dataset.path) {
        Ok(report) => {
            display::write_load_report(&mut out, &report)?;
            Some(report)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Continuing with an empty store");
            writeln!(out, "CSV file not found. Please check the path.")?;
            None
        }
    };

    let stdin = io::stdin();
    let mut session = Session::new(store, stdin.lock(), out);
    if let Some(report) = report {
        session = session.with_load_report(report);
    }
    session.run()
}
