use rdev::Key;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// One raw key transition as delivered by the hook adapter.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
    pub injected: bool,
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self::press_at(key, Instant::now())
    }

    pub fn release(key: Key) -> Self {
        Self::release_at(key, Instant::now())
    }

    pub fn press_at(key: Key, timestamp: Instant) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            injected: false,
            timestamp,
        }
    }

    pub fn release_at(key: Key, timestamp: Instant) -> Self {
        Self {
            key,
            state: KeyState::Released,
            injected: false,
            timestamp,
        }
    }

    /// Marks this event as software-generated rather than physical input.
    pub fn injected(mut self) -> Self {
        self.injected = true;
        self
    }
}

/// Which transition completes a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerOn {
    #[default]
    KeyPress,
    KeyRelease,
}

#[derive(Debug, Clone)]
pub struct ChordConfig {
    pub keys: Vec<Key>,
    pub trigger: TriggerOn,
    pub ignore_injected: bool,
    pub pass_through: bool,
}

impl ChordConfig {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            trigger: TriggerOn::KeyPress,
            ignore_injected: false,
            pass_through: true,
        }
    }

    pub fn trigger(mut self, trigger: TriggerOn) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn ignore_injected(mut self, ignore_injected: bool) -> Self {
        self.ignore_injected = ignore_injected;
        self
    }

    pub fn pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SequenceConfig {
    /// Maximum gap between step completions. `None` means the sequence
    /// never times out.
    pub timeout: Option<Duration>,
    pub pass_through: bool,
}

impl SequenceConfig {
    pub fn new() -> Self {
        Self {
            timeout: None,
            pass_through: true,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self::new()
    }
}
