//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Configure tracing once at startup for the whole process.
///
/// `directive` is an `EnvFilter` directive such as `warn` or
/// `inventory=debug`. Output goes to stderr so it never interleaves with the
/// menu and listings on stdout. An unparsable directive falls back to `warn`.
pub fn setup_tracing(directive: &str) {
    let env_filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
