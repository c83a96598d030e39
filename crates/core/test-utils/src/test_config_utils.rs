use config::Config;
use std::sync::Arc;

pub fn initialize_for_test(
    bindings: Vec<String>,
    sequence_timeout_ms: Option<u64>,
) -> Arc<Config> {
    let config = Arc::new(Config::new_for_test(bindings, sequence_timeout_ms));

    let _ = Config::set_global_for_test(config.clone());

    config
}
