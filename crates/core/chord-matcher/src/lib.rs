mod error;
mod handler;
mod matchers;
mod types;

pub mod dispatch;
pub mod parser;

pub use dispatch::{EventDispatcher, EventDisposition, MatchNotification, SubscriptionId};
pub use error::ConfigError;
pub use handler::MatchHandler;
pub use matchers::alternation::AlternationMatcher;
pub use matchers::chord::ChordMatcher;
pub use matchers::sequence::{SequenceMatcher, SequenceStep};
pub use matchers::KeyMatcher;
pub use parser::{parse_multiple_patterns, parse_pattern, ParseError, ParseOptions};
pub use types::{ChordConfig, KeyEvent, KeyState, SequenceConfig, TriggerOn};
