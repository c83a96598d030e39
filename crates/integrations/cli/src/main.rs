use config::Config;
use keychord_cli::{panic_handler, KeychordApp};

fn main() {
    let config = Config::initialize();

    panic_handler::install(config.debug);

    log::init(config.debug);

    log::info!("Configuration: {:?}", config);

    let app = match KeychordApp::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("\nInvalid configuration: {}\n", e);
            eprintln!("Bindings take the form NAME=PATTERN, for example:");
            eprintln!("  keychord --bind 'copy=Ctrl+C'");
            eprintln!("  keychord --bind 'grab=seq(Print, Shift+A, 300)'");
            std::process::exit(2);
        }
    };

    if let Err(e) = app.run() {
        let error_chain = e
            .chain()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ");

        eprintln!("\nError: {}\n", error_chain);
        if config.debug {
            eprintln!("Debug backtrace:\n{:?}", e);
        }
        std::process::exit(1);
    }
}
