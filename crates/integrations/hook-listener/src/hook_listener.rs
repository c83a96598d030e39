use rdev::{grab, Event, EventType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chord_matcher::{EventDispatcher, KeyEvent};

/// Bridges the OS keyboard grab onto a dispatcher. The grab callback runs
/// on the platform's hook thread and must return quickly; all it does is
/// translate the event, fan it out, and honour the swallow disposition.
pub struct HookListener {
    dispatcher: Arc<EventDispatcher>,
}

pub struct ListenerHandle {
    handle: Option<JoinHandle<Result<(), String>>>,
}

impl ListenerHandle {
    pub fn join(mut self) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .unwrap_or_else(|_| Err("Listener thread panicked".into()))
        } else {
            Ok(())
        }
    }

    pub fn join_with_timeout(mut self, timeout: Duration) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            let start = std::time::Instant::now();
            while !handle.is_finished() {
                if start.elapsed() > timeout {
                    log::warn!("Listener thread did not stop within timeout, abandoning");
                    return Err("Listener thread timeout".into());
                }
                thread::sleep(Duration::from_millis(10));
            }
            handle
                .join()
                .unwrap_or_else(|_| Err("Listener thread panicked".into()))
        } else {
            Ok(())
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }
}

#[derive(Clone)]
pub struct ListenerControl {
    shutdown_tx: mpsc::Sender<()>,
    should_stop: Arc<AtomicBool>,
}

impl HookListener {
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn spawn(self) -> (ListenerHandle, ListenerControl) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_clone = should_stop.clone();

        let handle = thread::spawn(move || self.run_grab_loop(shutdown_rx, should_stop_clone));

        let control = ListenerControl {
            shutdown_tx,
            should_stop,
        };

        (
            ListenerHandle {
                handle: Some(handle),
            },
            control,
        )
    }

    fn run_grab_loop(
        self,
        shutdown_rx: mpsc::Receiver<()>,
        should_stop: Arc<AtomicBool>,
    ) -> Result<(), String> {
        let should_stop_watcher = should_stop.clone();

        thread::spawn(move || {
            if shutdown_rx.recv().is_ok() {
                should_stop_watcher.store(true, Ordering::SeqCst);
                log::info!("Shutdown signal received - grab will pass events through until the process exits");
            }
        });

        let dispatcher = self.dispatcher.clone();
        let should_stop_grab = should_stop.clone();

        let grab_callback = move |event: Event| -> Option<Event> {
            if should_stop_grab.load(Ordering::SeqCst) {
                return Some(event);
            }

            // rdev carries no injected flag; everything from the grab is
            // treated as physical input.
            let key_event = match event.event_type {
                EventType::KeyPress(key) => KeyEvent::press(key),
                EventType::KeyRelease(key) => KeyEvent::release(key),
                _ => return Some(event),
            };

            let disposition = dispatcher.handle(key_event);

            if disposition.swallow {
                log::debug!("Swallowed matched event {:?}", event.event_type);
                None
            } else {
                Some(event)
            }
        };

        if let Err(e) = grab(grab_callback) {
            return Err(format!("Keyboard grab failed: {:?}", e));
        }

        log::info!("Keyboard grab stopped cleanly");
        Ok(())
    }
}

impl ListenerControl {
    pub fn stop(&self) -> Result<(), String> {
        log::info!("Initiating listener shutdown");

        self.should_stop.store(true, Ordering::SeqCst);

        self.shutdown_tx
            .send(())
            .map_err(|_| "Listener already stopped".to_string())?;

        log::info!("Shutdown signal sent to listener thread");
        Ok(())
    }

    pub fn is_stopping(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }
}
