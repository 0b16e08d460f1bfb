use tracing_subscriber::EnvFilter;

/// Initialize diagnostics logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise `log_level` is used as the filter.
/// Stdout stays reserved for command output.
pub fn init(log_level: &str) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}
