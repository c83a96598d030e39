use crate::bindings::{install_bindings, Binding};
use anyhow::{bail, Result};
use chord_matcher::EventDispatcher;
use config::Config;
use hook_listener::{HookListener, ListenerControl, ListenerHandle};
use log::{error, info};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

enum MainEvent {
    Shutdown,
}

pub struct KeychordApp {
    dispatcher: Arc<EventDispatcher>,
    bindings: Vec<Binding>,
}

impl KeychordApp {
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.bindings.is_empty() {
            bail!("no bindings configured; pass at least one --bind NAME=PATTERN");
        }

        let dispatcher = Arc::new(EventDispatcher::new());
        let bindings = install_bindings(&dispatcher, config)?;

        Ok(Self {
            dispatcher,
            bindings,
        })
    }

    pub fn run(self) -> Result<()> {
        info!("Starting keychord ...");

        for binding in &self.bindings {
            info!("Watching binding '{}'", binding.name);
        }

        let listener = HookListener::new(self.dispatcher.clone());
        let (listener_handle, control) = listener.spawn();

        let (event_tx, event_rx) = mpsc::channel();
        let event_tx_clone = event_tx.clone();

        thread::spawn(move || {
            if let Err(e) = Self::setup_signal_handlers(event_tx_clone) {
                error!("Failed to setup signal handlers: {}", e);
            }
        });

        info!("keychord is running");
        info!("Press Ctrl+C to exit");

        self.run_main_event_loop(event_rx, control, listener_handle)
    }

    fn run_main_event_loop(
        &self,
        event_rx: mpsc::Receiver<MainEvent>,
        control: ListenerControl,
        listener_handle: ListenerHandle,
    ) -> Result<()> {
        loop {
            match event_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(MainEvent::Shutdown) => {
                    info!("Received shutdown request");

                    if let Err(e) = control.stop() {
                        error!("Failed to send stop signal to listener: {}", e);
                    } else {
                        info!("Stop signal sent to listener");
                    }

                    break;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if listener_handle.is_finished() {
                        // A dead grab usually means the hook registration
                        // failed; surface the thread's error.
                        match listener_handle.join() {
                            Ok(()) => bail!("listener thread exited unexpectedly"),
                            Err(e) => bail!("listener failed: {}", e),
                        }
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Event channel disconnected unexpectedly");
                    if let Err(e) = control.stop() {
                        error!("Failed to stop listener after channel disconnect: {}", e);
                    }
                    break;
                }
            }
        }

        thread::sleep(Duration::from_millis(100));

        info!("Shutdown complete");
        Ok(())
    }

    fn setup_signal_handlers(event_tx: mpsc::Sender<MainEvent>) -> Result<()> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])?;
        info!("Signal handlers installed for SIGTERM, SIGINT, SIGQUIT, SIGHUP");

        for sig in signals.forever() {
            match sig {
                SIGTERM => info!("Received SIGTERM signal"),
                SIGINT => info!("Received SIGINT signal (Ctrl+C)"),
                SIGQUIT => info!("Received SIGQUIT signal"),
                SIGHUP => info!("Received SIGHUP signal"),
                _ => continue,
            }

            match event_tx.send(MainEvent::Shutdown) {
                Ok(_) => {
                    break;
                }
                Err(e) => {
                    error!("CRITICAL: Failed to send shutdown event: {}", e);
                    error!("Application may not shut down cleanly");
                    break;
                }
            }
        }
        info!("Signal handler thread exiting");
        Ok(())
    }
}
