use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `verbose` is set.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
