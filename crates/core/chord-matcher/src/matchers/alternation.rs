use super::chord::ChordMatcher;
use super::KeyMatcher;
use crate::error::ConfigError;
use crate::types::KeyEvent;

/// One logical step satisfied by any of several chords, e.g. the left and
/// right variants of a modifier.
#[derive(Debug)]
pub struct AlternationMatcher {
    members: Vec<ChordMatcher>,
}

impl AlternationMatcher {
    pub fn new(members: Vec<ChordMatcher>) -> Result<Self, ConfigError> {
        if members.is_empty() {
            return Err(ConfigError::EmptyAlternation);
        }

        Ok(Self { members })
    }
}

impl KeyMatcher for AlternationMatcher {
    fn handle(&mut self, event: &KeyEvent) -> bool {
        // Every member observes every event; a match in one must not
        // starve the others of state updates.
        let mut matched = false;
        for member in &mut self.members {
            matched |= member.handle(event);
        }
        matched
    }

    fn has_keys_pressed(&self) -> bool {
        self.members.iter().any(|m| m.has_keys_pressed())
    }

    fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
    }

    fn pass_through(&self) -> bool {
        self.members.iter().all(|m| m.pass_through())
    }
}
