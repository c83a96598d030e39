use chord_matcher::{EventDispatcher, KeyEvent};
use config::Config;
use keychord_cli::bindings::install_bindings;
use rdev::Key;

mod tests {
    use super::*;

    #[test]
    fn test_bindings_install_and_match() {
        let config = test_utils::initialize_for_test(
            vec![
                "copy=ControlLeft+KeyC".to_string(),
                "grab=seq(Print, ShiftLeft+KeyA, 300)".to_string(),
            ],
            None,
        );

        let dispatcher = EventDispatcher::new();
        let bindings = install_bindings(&dispatcher, &config).unwrap();

        assert_eq!(bindings.len(), 2);
        assert_eq!(dispatcher.subscription_count(), 2);

        let partial = dispatcher.handle(KeyEvent::press(Key::ControlLeft));
        assert!(!partial.matched);

        let chord = dispatcher.handle(KeyEvent::press(Key::KeyC));
        assert!(chord.matched);
        assert!(!chord.swallow);
    }

    #[test]
    fn test_binding_without_name_rejected() {
        let config = Config::new_for_test(vec!["no-equals-sign".to_string()], None);
        let dispatcher = EventDispatcher::new();

        assert!(install_bindings(&dispatcher, &config).is_err());
    }

    #[test]
    fn test_binding_with_bad_pattern_rejected() {
        let config = Config::new_for_test(vec!["oops=NotAKey".to_string()], None);
        let dispatcher = EventDispatcher::new();

        assert!(install_bindings(&dispatcher, &config).is_err());
        assert_eq!(dispatcher.subscription_count(), 0);
    }

    #[test]
    fn test_swallow_flag_marks_matches_for_consumption() {
        let config = Config {
            debug: false,
            bindings: vec!["mute=F9".to_string()],
            sequence_timeout_ms: None,
            swallow: true,
            ignore_injected: false,
        };

        let dispatcher = EventDispatcher::new();
        install_bindings(&dispatcher, &config).unwrap();

        let disposition = dispatcher.handle(KeyEvent::press(Key::F9));
        assert!(disposition.matched);
        assert!(disposition.swallow);
    }

    #[test]
    fn test_default_sequence_timeout_applies() {
        let config = Config::new_for_test(
            vec!["combo=seq(F1, F2)".to_string()],
            Some(150),
        );

        let dispatcher = EventDispatcher::new();
        install_bindings(&dispatcher, &config).unwrap();

        let start = std::time::Instant::now();
        assert!(!dispatcher
            .handle(KeyEvent::press_at(Key::F1, start))
            .matched);

        // Past the configured default timeout the first step has to be
        // redone before F2 counts.
        let late = start + std::time::Duration::from_millis(500);
        assert!(!dispatcher.handle(KeyEvent::press_at(Key::F2, late)).matched);
        assert!(!dispatcher
            .handle(KeyEvent::release_at(Key::F2, late))
            .matched);
        assert!(!dispatcher.handle(KeyEvent::press_at(Key::F1, late)).matched);
        assert!(dispatcher
            .handle(KeyEvent::press_at(
                Key::F2,
                late + std::time::Duration::from_millis(50)
            ))
            .matched);
    }
}
