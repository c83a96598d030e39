use clap::Parser;
use std::ffi::OsString;
use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<Arc<Config>> = OnceLock::new();

#[derive(Parser, Debug, Clone)]
#[command(name = "keychord")]
#[command(about = "Global chord and key-sequence dispatcher", long_about = None)]
#[command(version)]
pub struct Config {
    #[arg(short = 'd', long, env = "KEYCHORD_DEBUG", help = "Enable debug mode")]
    pub debug: bool,

    #[arg(
        long = "bind",
        env = "KEYCHORD_BINDINGS",
        value_delimiter = ';',
        required = false,
        help = "Binding as NAME=PATTERN, e.g. copy=Ctrl+C or grab=seq(Print, Shift+A, 300)"
    )]
    pub bindings: Vec<String>,

    #[arg(
        long = "sequence-timeout-ms",
        env = "KEYCHORD_SEQUENCE_TIMEOUT_MS",
        help = "Default timeout between sequence steps in milliseconds"
    )]
    pub sequence_timeout_ms: Option<u64>,

    #[arg(
        long = "swallow",
        env = "KEYCHORD_SWALLOW",
        help = "Consume matched key events instead of passing them on to other applications"
    )]
    pub swallow: bool,

    #[arg(
        long = "ignore-injected",
        env = "KEYCHORD_IGNORE_INJECTED",
        help = "Never let software-injected key events trigger a binding"
    )]
    pub ignore_injected: bool,
}

impl Config {
    pub fn initialize() -> Arc<Config> {
        dotenv::dotenv().ok();

        let config = Arc::new(Config::parse());
        let _ = CONFIG.set(config.clone());
        config
    }

    /// The process-wide configuration. Falls back to defaults plus
    /// environment variables when `initialize` was never called (tests,
    /// library embedders).
    pub fn global() -> Arc<Config> {
        CONFIG
            .get_or_init(|| Arc::new(Config::parse_from(std::iter::empty::<OsString>())))
            .clone()
    }

    pub fn new_for_test(bindings: Vec<String>, sequence_timeout_ms: Option<u64>) -> Config {
        Config {
            debug: false,
            bindings,
            sequence_timeout_ms,
            swallow: false,
            ignore_injected: false,
        }
    }

    pub fn set_global_for_test(config: Arc<Config>) -> Result<(), Arc<Config>> {
        CONFIG.set(config)
    }
}
