use super::KeyMatcher;
use crate::error::ConfigError;
use crate::types::{ChordConfig, KeyEvent, KeyState, TriggerOn};
use rdev::Key;
use std::collections::HashSet;

/// Matches one fixed set of simultaneously-down keys.
///
/// The pressed set mirrors every key transition the matcher observes,
/// required or not, so extra keys are always visible to the exactness check.
#[derive(Debug)]
pub struct ChordMatcher {
    required: HashSet<Key>,
    pressed: HashSet<Key>,
    trigger: TriggerOn,
    ignore_injected: bool,
    pass_through: bool,
    /// Press-trigger guard: set when the chord fires, cleared when a
    /// required key is released. Suppresses key-repeat double fires.
    fired: bool,
    /// Release-trigger latch: set on the transition into an exact match,
    /// cleared by the first firing release or by any extra key.
    armed: bool,
}

impl ChordMatcher {
    pub fn new(config: ChordConfig) -> Result<Self, ConfigError> {
        if config.keys.is_empty() {
            return Err(ConfigError::EmptyChord);
        }

        Ok(Self {
            required: config.keys.into_iter().collect(),
            pressed: HashSet::new(),
            trigger: config.trigger,
            ignore_injected: config.ignore_injected,
            pass_through: config.pass_through,
            fired: false,
            armed: false,
        })
    }

    fn is_exact_match(&self) -> bool {
        self.pressed == self.required
    }

    fn handle_press(&mut self, key: Key, inert: bool) -> bool {
        let was_exact = self.is_exact_match();
        self.pressed.insert(key);
        let exact = self.is_exact_match();

        if inert {
            // Injected input keeps the pressed set honest and can spoil a
            // pending match, but never arms or fires.
            if !exact {
                self.armed = false;
            }
            return false;
        }

        match self.trigger {
            TriggerOn::KeyPress => {
                if exact && !was_exact && !self.fired {
                    self.fired = true;
                    true
                } else {
                    false
                }
            }
            TriggerOn::KeyRelease => {
                if exact && !was_exact {
                    self.armed = true;
                } else if !exact {
                    self.armed = false;
                }
                false
            }
        }
    }

    fn handle_release(&mut self, key: Key, inert: bool) -> bool {
        self.pressed.remove(&key);

        if inert {
            if self.required.contains(&key) {
                self.armed = false;
            }
            return false;
        }

        match self.trigger {
            TriggerOn::KeyPress => {
                // A clean re-press may fire again once a required key has
                // actually gone up.
                if self.required.contains(&key) {
                    self.fired = false;
                }
                false
            }
            TriggerOn::KeyRelease => {
                if self.armed {
                    self.armed = false;
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl KeyMatcher for ChordMatcher {
    fn handle(&mut self, event: &KeyEvent) -> bool {
        let inert = self.ignore_injected && event.injected;

        match event.state {
            KeyState::Pressed => self.handle_press(event.key, inert),
            KeyState::Released => self.handle_release(event.key, inert),
        }
    }

    fn has_keys_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    fn reset(&mut self) {
        self.pressed.clear();
        self.fired = false;
        self.armed = false;
    }

    fn pass_through(&self) -> bool {
        self.pass_through
    }
}
