use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber once for the whole process.
///
/// `RUST_LOG` controls filtering and defaults to `info`. JSON output is for
/// log shippers; the plain format is for terminals.
pub fn setup_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(false);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "tracing init failed");
    }
}
