use clap::Parser;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use qifcat::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    tracing::debug!("{cli:?}");

    if let Err(e) = cli::import::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so prompts on stdout stay readable. `RUST_LOG` wins over
/// `--verbose` when set.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        filter::LevelFilter::DEBUG
    } else {
        filter::LevelFilter::INFO
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}
