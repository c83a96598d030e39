use crate::error::ConfigError;
use crate::matchers::alternation::AlternationMatcher;
use crate::matchers::chord::ChordMatcher;
use crate::matchers::sequence::{SequenceMatcher, SequenceStep};
use crate::matchers::KeyMatcher;
use crate::types::{ChordConfig, SequenceConfig, TriggerOn};
use rdev::Key;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid pattern format: {0}")]
    InvalidFormat(String),
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),
    #[error("Empty pattern")]
    EmptyPattern,
    #[error("Invalid matcher configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Construction flags threaded into every matcher a pattern produces.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub ignore_injected: bool,
    pub pass_through: bool,
    /// Default inter-step timeout for `seq(...)` patterns without an
    /// explicit trailing timeout argument.
    pub sequence_timeout: Option<Duration>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ignore_injected: false,
            pass_through: true,
            sequence_timeout: None,
        }
    }
}

/// Parses one pattern into a ready matcher.
///
/// Syntax: `A+B+C` holds a chord, `release(...)` fires it on key-up,
/// `X|Y` accepts either chord for one step, and
/// `seq(S1, S2, ..., [timeout_ms])` chains steps in order. Generic
/// modifier names (`Ctrl`, `Shift`, `Alt`, `Meta`) accept both the left
/// and right key.
pub fn parse_pattern(
    input: &str,
    options: ParseOptions,
) -> Result<Box<dyn KeyMatcher>, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    if input.starts_with("seq(") && input.ends_with(')') {
        return Ok(Box::new(parse_sequence(input, options)?));
    }

    match parse_step(input, options)? {
        SequenceStep::Chord(matcher) => Ok(Box::new(matcher)),
        SequenceStep::Alternation(matcher) => Ok(Box::new(matcher)),
    }
}

/// Parses a `;`-separated list of independent patterns.
pub fn parse_multiple_patterns(
    input: &str,
    options: ParseOptions,
) -> Result<Vec<Box<dyn KeyMatcher>>, ParseError> {
    let mut matchers = Vec::new();

    for pattern in input.split(';').map(str::trim) {
        if !pattern.is_empty() {
            matchers.push(parse_pattern(pattern, options)?);
        }
    }

    Ok(matchers)
}

fn parse_sequence(input: &str, options: ParseOptions) -> Result<SequenceMatcher, ParseError> {
    let content = input
        .strip_prefix("seq(")
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ParseError::InvalidFormat(input.to_string()))?;

    let mut parts = split_top_level(content, ',');

    if parts.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    // A trailing bare number is the inter-step timeout in milliseconds.
    let mut timeout = options.sequence_timeout;
    let trailing_ms = match parts.last() {
        Some(last) if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) => Some(
            last.parse::<u64>()
                .map_err(|_| ParseError::InvalidTimeout(last.to_string()))?,
        ),
        _ => None,
    };
    if let Some(millis) = trailing_ms {
        parts.pop();
        timeout = Some(Duration::from_millis(millis));
    }

    let steps = parts
        .iter()
        .map(|part| parse_step(part, options))
        .collect::<Result<Vec<_>, _>>()?;

    let config = SequenceConfig {
        timeout,
        pass_through: options.pass_through,
    };

    Ok(SequenceMatcher::new(steps, config)?)
}

/// Parses one step: alternatives separated by `|`, each a chord that may
/// expand further through ambiguous modifiers.
fn parse_step(input: &str, options: ParseOptions) -> Result<SequenceStep, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    if input.starts_with("seq(") {
        // Sequences do not nest.
        return Err(ParseError::InvalidFormat(input.to_string()));
    }

    let mut chords = Vec::new();
    for alternative in split_top_level(input, '|') {
        chords.extend(parse_chord_variants(&alternative, options)?);
    }

    if chords.len() == 1 {
        let only = chords.remove(0);
        Ok(SequenceStep::Chord(only))
    } else {
        Ok(SequenceStep::Alternation(AlternationMatcher::new(chords)?))
    }
}

/// Parses one chord into its concrete variants: `Ctrl+Y` yields the
/// ControlLeft and ControlRight chords, explicit key names yield one.
fn parse_chord_variants(
    input: &str,
    options: ParseOptions,
) -> Result<Vec<ChordMatcher>, ParseError> {
    let input = input.trim();

    let (body, trigger) = match input
        .strip_prefix("release(")
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) => (inner, TriggerOn::KeyRelease),
        None => (input, TriggerOn::KeyPress),
    };

    let key_names: Vec<&str> = body.split('+').map(str::trim).collect();

    if key_names.iter().any(|name| name.is_empty()) {
        return Err(ParseError::InvalidFormat(input.to_string()));
    }

    let mut key_sets: Vec<Vec<Key>> = vec![Vec::new()];

    for key_name in key_names {
        if let Some((left, right)) = parse_ambiguous_modifier_key(key_name) {
            let mut expanded = Vec::with_capacity(key_sets.len() * 2);
            for key_set in key_sets {
                let mut left_set = key_set.clone();
                left_set.push(left);
                expanded.push(left_set);

                let mut right_set = key_set;
                right_set.push(right);
                expanded.push(right_set);
            }
            key_sets = expanded;
        } else {
            let key = parse_key_name(key_name)?;
            for key_set in &mut key_sets {
                key_set.push(key);
            }
        }
    }

    key_sets
        .into_iter()
        .map(|keys| {
            let config = ChordConfig::new(keys)
                .trigger(trigger)
                .ignore_injected(options.ignore_injected)
                .pass_through(options.pass_through);
            ChordMatcher::new(config).map_err(ParseError::from)
        })
        .collect()
}

/// Splits on `separator` outside parentheses, trimming each piece.
fn split_top_level(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if c == separator && depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }

    parts.push(current.trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

fn parse_ambiguous_modifier_key(name: &str) -> Option<(Key, Key)> {
    match name {
        "Control" | "Ctrl" => Some((Key::ControlLeft, Key::ControlRight)),
        "Shift" => Some((Key::ShiftLeft, Key::ShiftRight)),
        "Alt" | "Option" => Some((Key::Alt, Key::AltGr)),
        "Meta" | "Cmd" | "Command" | "Win" | "Windows" | "Super" => {
            Some((Key::MetaLeft, Key::MetaRight))
        }
        _ => None,
    }
}

fn parse_key_name(name: &str) -> Result<Key, ParseError> {
    match name {
        "ControlLeft" => Ok(Key::ControlLeft),
        "ControlRight" => Ok(Key::ControlRight),
        "ShiftLeft" => Ok(Key::ShiftLeft),
        "ShiftRight" => Ok(Key::ShiftRight),
        "AltLeft" => Ok(Key::Alt),
        "AltRight" => Ok(Key::AltGr),
        "MetaLeft" | "CommandLeft" => Ok(Key::MetaLeft),
        "MetaRight" | "CommandRight" => Ok(Key::MetaRight),

        "KeyA" | "A" => Ok(Key::KeyA),
        "KeyB" | "B" => Ok(Key::KeyB),
        "KeyC" | "C" => Ok(Key::KeyC),
        "KeyD" | "D" => Ok(Key::KeyD),
        "KeyE" | "E" => Ok(Key::KeyE),
        "KeyF" | "F" => Ok(Key::KeyF),
        "KeyG" | "G" => Ok(Key::KeyG),
        "KeyH" | "H" => Ok(Key::KeyH),
        "KeyI" | "I" => Ok(Key::KeyI),
        "KeyJ" | "J" => Ok(Key::KeyJ),
        "KeyK" | "K" => Ok(Key::KeyK),
        "KeyL" | "L" => Ok(Key::KeyL),
        "KeyM" | "M" => Ok(Key::KeyM),
        "KeyN" | "N" => Ok(Key::KeyN),
        "KeyO" | "O" => Ok(Key::KeyO),
        "KeyP" | "P" => Ok(Key::KeyP),
        "KeyQ" | "Q" => Ok(Key::KeyQ),
        "KeyR" | "R" => Ok(Key::KeyR),
        "KeyS" | "S" => Ok(Key::KeyS),
        "KeyT" | "T" => Ok(Key::KeyT),
        "KeyU" | "U" => Ok(Key::KeyU),
        "KeyV" | "V" => Ok(Key::KeyV),
        "KeyW" | "W" => Ok(Key::KeyW),
        "KeyX" | "X" => Ok(Key::KeyX),
        "KeyY" | "Y" => Ok(Key::KeyY),
        "KeyZ" | "Z" => Ok(Key::KeyZ),

        "Num0" | "0" => Ok(Key::Num0),
        "Num1" | "1" => Ok(Key::Num1),
        "Num2" | "2" => Ok(Key::Num2),
        "Num3" | "3" => Ok(Key::Num3),
        "Num4" | "4" => Ok(Key::Num4),
        "Num5" | "5" => Ok(Key::Num5),
        "Num6" | "6" => Ok(Key::Num6),
        "Num7" | "7" => Ok(Key::Num7),
        "Num8" | "8" => Ok(Key::Num8),
        "Num9" | "9" => Ok(Key::Num9),

        "Escape" | "Esc" => Ok(Key::Escape),
        "Space" => Ok(Key::Space),
        "Return" | "Enter" => Ok(Key::Return),
        "Tab" => Ok(Key::Tab),
        "Backspace" => Ok(Key::Backspace),
        "Delete" => Ok(Key::Delete),
        "Insert" => Ok(Key::Insert),
        "Home" => Ok(Key::Home),
        "End" => Ok(Key::End),
        "PageUp" => Ok(Key::PageUp),
        "PageDown" => Ok(Key::PageDown),
        "Up" | "UpArrow" => Ok(Key::UpArrow),
        "Down" | "DownArrow" => Ok(Key::DownArrow),
        "Left" | "LeftArrow" => Ok(Key::LeftArrow),
        "Right" | "RightArrow" => Ok(Key::RightArrow),
        "Print" | "PrintScreen" => Ok(Key::PrintScreen),
        "CapsLock" => Ok(Key::CapsLock),

        "F1" => Ok(Key::F1),
        "F2" => Ok(Key::F2),
        "F3" => Ok(Key::F3),
        "F4" => Ok(Key::F4),
        "F5" => Ok(Key::F5),
        "F6" => Ok(Key::F6),
        "F7" => Ok(Key::F7),
        "F8" => Ok(Key::F8),
        "F9" => Ok(Key::F9),
        "F10" => Ok(Key::F10),
        "F11" => Ok(Key::F11),
        "F12" => Ok(Key::F12),

        _ => Err(ParseError::UnknownKey(name.to_string())),
    }
}
