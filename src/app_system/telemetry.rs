/// Sets up structured logging for the whole process.
///
/// Log lines go to stderr so they never interleave with the console's table
/// on stdout.
///
/// ```text
/// RUST_LOG=debug user_manager                 # Show debug logs
/// RUST_LOG=warn user_manager                  # Show warnings and errors only
/// RUST_LOG=user_manager::sync=debug user_manager
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
