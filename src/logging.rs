use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber used by the command-line tools.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: i32) {
    let default_level = match verbose {
        i32::MIN..=0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
