pub mod alternation;
pub mod chord;
pub mod sequence;

use crate::types::KeyEvent;
use std::fmt::Debug;

/// A gesture recognizer fed one event at a time, in arrival order,
/// single-threaded per instance.
pub trait KeyMatcher: Send + Sync + Debug {
    /// Returns `true` exactly when the gesture completed on this event.
    fn handle(&mut self, event: &KeyEvent) -> bool;

    /// Whether any progress state is currently non-idle.
    fn has_keys_pressed(&self) -> bool;

    fn reset(&mut self);

    /// When `false`, the dispatcher asks the hook adapter to consume the
    /// matched OS event instead of letting it propagate.
    fn pass_through(&self) -> bool;
}
