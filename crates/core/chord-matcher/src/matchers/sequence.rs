use super::alternation::AlternationMatcher;
use super::chord::ChordMatcher;
use super::KeyMatcher;
use crate::error::ConfigError;
use crate::types::{KeyEvent, SequenceConfig};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum SequenceStep {
    Chord(ChordMatcher),
    Alternation(AlternationMatcher),
}

impl SequenceStep {
    fn handle(&mut self, event: &KeyEvent) -> bool {
        match self {
            Self::Chord(matcher) => matcher.handle(event),
            Self::Alternation(matcher) => matcher.handle(event),
        }
    }

    fn has_keys_pressed(&self) -> bool {
        match self {
            Self::Chord(matcher) => matcher.has_keys_pressed(),
            Self::Alternation(matcher) => matcher.has_keys_pressed(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Chord(matcher) => matcher.reset(),
            Self::Alternation(matcher) => matcher.reset(),
        }
    }
}

impl From<ChordMatcher> for SequenceStep {
    fn from(matcher: ChordMatcher) -> Self {
        Self::Chord(matcher)
    }
}

impl From<AlternationMatcher> for SequenceStep {
    fn from(matcher: AlternationMatcher) -> Self {
        Self::Alternation(matcher)
    }
}

/// Ordered steps that must be satisfied one after another.
///
/// The cursor only moves forward or back to zero; events that miss the
/// current step are absorbed without undoing earlier progress, so key noise
/// between steps does not force a restart.
#[derive(Debug)]
pub struct SequenceMatcher {
    steps: Vec<SequenceStep>,
    position: usize,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    pass_through: bool,
}

impl SequenceMatcher {
    pub fn new(
        steps: Vec<SequenceStep>,
        config: SequenceConfig,
    ) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptySequence);
        }

        Ok(Self {
            steps,
            position: 0,
            timeout: config.timeout,
            deadline: None,
            pass_through: config.pass_through,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Timeout-aware progress query for a caller-supplied clock.
    pub fn has_keys_pressed_at(&self, now: Instant) -> bool {
        if self.expired(now) {
            return false;
        }

        self.position > 0 || self.steps[self.position].has_keys_pressed()
    }

    fn expired(&self, now: Instant) -> bool {
        self.position > 0 && self.deadline.is_some_and(|deadline| now > deadline)
    }

    fn restart(&mut self) {
        self.position = 0;
        self.deadline = None;
        for step in &mut self.steps {
            step.reset();
        }
    }
}

impl KeyMatcher for SequenceMatcher {
    fn handle(&mut self, event: &KeyEvent) -> bool {
        if self.expired(event.timestamp) {
            log::debug!("Sequence timed out at step {}, restarting", self.position);
            self.restart();
        }

        if !self.steps[self.position].handle(event) {
            return false;
        }

        self.position += 1;

        if self.position == self.steps.len() {
            log::debug!("Sequence of {} steps completed", self.steps.len());
            self.restart();
            return true;
        }

        self.deadline = self.timeout.map(|timeout| event.timestamp + timeout);
        false
    }

    fn has_keys_pressed(&self) -> bool {
        self.has_keys_pressed_at(Instant::now())
    }

    fn reset(&mut self) {
        self.restart();
    }

    fn pass_through(&self) -> bool {
        self.pass_through
    }
}
