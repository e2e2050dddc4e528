use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "trackml=info";

/// Install the global subscriber. `verbose` forces debug output for this crate.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("trackml=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    // Logs go to stderr so JSON on stdout stays machine readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
