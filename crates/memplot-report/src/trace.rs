use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable consulted for the log filter directive.
pub const LOG_ENV_VAR: &str = "MEMPLOT_LOG";

#[derive(Debug, thiserror::Error)]
pub enum TraceInitError {
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Install the console tracing subscriber.
///
/// The filter comes from `MEMPLOT_LOG` when set, else `default_directive`.
/// An already-installed global subscriber is reused rather than treated as an
/// error.
pub fn init_tracing(default_directive: &str) -> Result<(), TraceInitError> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt_layer = fmt::layer().with_target(false);

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
    {
        let msg = err.to_string();
        if msg.contains("global default trace dispatcher has already been set") {
            tracing::warn!("tracing subscriber already initialized, reusing existing subscriber");
            return Ok(());
        }
        return Err(TraceInitError::SubscriberInit(msg));
    }

    Ok(())
}
