use tracing_subscriber::EnvFilter;

/// Install a plain fmt subscriber writing to stderr.
///
/// The default log level is `debug`; override it with `RUST_LOG`. Safe to
/// call more than once, later calls keep the subscriber already installed,
/// so every test module can call this first without coordinating.
pub fn install_fmt_log() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
