use anyhow::{bail, Context, Result};
use chord_matcher::{
    parse_pattern, EventDispatcher, MatchHandler, MatchNotification, ParseOptions, SubscriptionId,
};
use config::Config;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub subscription: SubscriptionId,
}

/// Prints the binding's name once per completed gesture.
struct BindingHandler {
    name: String,
}

impl MatchHandler for BindingHandler {
    fn handle_match(&self, notification: MatchNotification) {
        log::info!(
            "Binding '{}' triggered ({:?})",
            self.name,
            notification.subscription
        );
        println!("{}", self.name);
    }

    fn handle_error(&self, error: String) {
        log::error!("Binding '{}': {}", self.name, error);
    }
}

/// Parses every `NAME=PATTERN` entry from the config and registers it on
/// the dispatcher.
pub fn install_bindings(dispatcher: &EventDispatcher, config: &Config) -> Result<Vec<Binding>> {
    let options = ParseOptions {
        ignore_injected: config.ignore_injected,
        pass_through: !config.swallow,
        sequence_timeout: config.sequence_timeout_ms.map(Duration::from_millis),
    };

    let mut bindings = Vec::with_capacity(config.bindings.len());

    for entry in &config.bindings {
        let (name, pattern) = entry
            .split_once('=')
            .with_context(|| format!("binding '{}' is missing the NAME= prefix", entry))?;

        let name = name.trim();
        if name.is_empty() {
            bail!("binding '{}' has an empty name", entry);
        }

        let matcher = parse_pattern(pattern.trim(), options)
            .with_context(|| format!("binding '{}' has an invalid pattern", name))?;

        let handler = Arc::new(BindingHandler {
            name: name.to_string(),
        });

        let subscription = dispatcher.subscribe(matcher, handler);
        log::debug!("Installed binding '{}' as {:?}", name, subscription);

        bindings.push(Binding {
            name: name.to_string(),
            subscription,
        });
    }

    Ok(bindings)
}
