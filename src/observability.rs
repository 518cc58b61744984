use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing and logging
///
/// - `RUST_LOG` wins over the configured level when set
/// - JSON lines in production, human readable output otherwise
pub fn init_observability(
    service_name: &str,
    service_version: &str,
    log_level: &str,
    json: bool,
) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_filter(env_filter))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(env_filter),
            )
            .try_init()?;
    }

    tracing::info!(
        service.name = service_name,
        service.version = service_version,
        "Observability initialized"
    );

    Ok(())
}
