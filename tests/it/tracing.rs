use std::sync::Once;

/// Configure a [`tracing_subscriber`] with provided env settings.
/// For details, see [filtering events with environment variables].
///
/// # Example Usage
///
/// ```ignore
/// RUST_LOG=parsley=trace cargo test
/// ```
///
/// [filtering events with environment variables]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
#[track_caller]
pub fn setup() {
    static SETUP: Once = Once::new();
    SETUP.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init()
    });
}
