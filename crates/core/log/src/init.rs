use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static LOGGER_INIT: Once = Once::new();

fn default_filter(debug: bool) -> EnvFilter {
    let base_level = if debug { "debug" } else { "info" };
    EnvFilter::new(format!("{},rdev=warn", base_level))
}

pub fn init(debug: bool) {
    LOGGER_INIT.call_once(|| {
        let _ = tracing_log::LogTracer::init();

        let fmt_layer = fmt::layer()
            .without_time()
            .with_target(false)
            .with_level(true)
            .compact();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug));

        let subscriber = tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter);

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
