
use chord_matcher::{ChordConfig, ChordMatcher, EventDispatcher, KeyEvent, KeyMatcher};
use fixtures::{SlowHandler, TestHandler};
use rdev::Key;
use std::time::{Duration, Instant};

mod tests {
    use super::*;

    fn boxed_chord(keys: &[Key]) -> Box<dyn KeyMatcher> {
        Box::new(ChordMatcher::new(ChordConfig::new(keys.iter().copied())).unwrap())
    }

    fn boxed_swallowing_chord(keys: &[Key]) -> Box<dyn KeyMatcher> {
        let config = ChordConfig::new(keys.iter().copied()).pass_through(false);
        Box::new(ChordMatcher::new(config).unwrap())
    }

    #[test]
    fn test_match_notification_delivered() {
        let dispatcher = EventDispatcher::new();
        let (handler, notifications) = TestHandler::channel();
        let id = dispatcher.subscribe(boxed_chord(&[Key::F6]), handler);

        let disposition = dispatcher.handle(KeyEvent::press(Key::F6));
        assert!(disposition.matched);

        let notification = notifications
            .recv_timeout(Duration::from_millis(500))
            .expect("match should be delivered");
        assert_eq!(notification.subscription, id);
        assert_eq!(notification.event.key, Key::F6);
    }

    #[test]
    fn test_non_matching_events_deliver_nothing() {
        let dispatcher = EventDispatcher::new();
        let (handler, notifications) = TestHandler::channel();
        dispatcher.subscribe(boxed_chord(&[Key::F6]), handler);

        let disposition = dispatcher.handle(KeyEvent::press(Key::F7));
        assert!(!disposition.matched);
        assert!(!disposition.swallow);

        assert!(notifications
            .recv_timeout(Duration::from_millis(100))
            .is_err());
    }

    #[test]
    fn test_swallow_set_only_when_pass_through_disabled() {
        let dispatcher = EventDispatcher::new();
        let (handler, _notifications) = TestHandler::channel();
        dispatcher.subscribe(boxed_swallowing_chord(&[Key::F6]), handler.clone());
        dispatcher.subscribe(boxed_chord(&[Key::F7]), handler);

        let swallowed = dispatcher.handle(KeyEvent::press(Key::F6));
        assert!(swallowed.matched);
        assert!(swallowed.swallow);

        dispatcher.handle(KeyEvent::release(Key::F6));

        let passed = dispatcher.handle(KeyEvent::press(Key::F7));
        assert!(passed.matched);
        assert!(!passed.swallow);
    }

    #[test]
    fn test_subscriptions_do_not_cross_talk() {
        let dispatcher = EventDispatcher::new();
        let (first_handler, first_rx) = TestHandler::channel();
        let (second_handler, second_rx) = TestHandler::channel();

        let first = dispatcher.subscribe(boxed_chord(&[Key::F6]), first_handler);
        let second = dispatcher.subscribe(boxed_chord(&[Key::F6, Key::F7]), second_handler);

        // completes the single-key chord, advances the two-key one
        assert!(dispatcher.handle(KeyEvent::press(Key::F6)).matched);
        let notification = first_rx.recv_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(notification.subscription, first);

        // completes the two-key chord only
        assert!(dispatcher.handle(KeyEvent::press(Key::F7)).matched);
        let notification = second_rx.recv_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(notification.subscription, second);

        assert!(first_rx.try_recv().is_err());
    }

    #[test]
    fn test_slow_subscriber_does_not_stall_event_handling() {
        let dispatcher = EventDispatcher::new();
        let (slow_handler, slow_rx) = SlowHandler::channel(Duration::from_millis(300));
        let (fast_handler, fast_rx) = TestHandler::channel();

        dispatcher.subscribe(boxed_chord(&[Key::F6]), slow_handler);
        dispatcher.subscribe(boxed_chord(&[Key::F7]), fast_handler);

        let start = Instant::now();
        assert!(dispatcher.handle(KeyEvent::press(Key::F6)).matched);
        assert!(!dispatcher.handle(KeyEvent::release(Key::F6)).matched);
        assert!(dispatcher.handle(KeyEvent::press(Key::F7)).matched);

        // fan-out stays on the hook side and never waits for the sleeper
        assert!(start.elapsed() < Duration::from_millis(100));

        assert!(slow_rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(fast_rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn test_unsubscribe_stops_future_delivery_keeps_queued() {
        let dispatcher = EventDispatcher::new();
        let (handler, notifications) = TestHandler::channel();
        let id = dispatcher.subscribe(boxed_chord(&[Key::F6]), handler);

        assert!(dispatcher.handle(KeyEvent::press(Key::F6)).matched);
        assert!(dispatcher.unsubscribe(id));

        // the match queued before unsubscribing still arrives
        assert!(notifications
            .recv_timeout(Duration::from_millis(500))
            .is_ok());

        assert!(!dispatcher.handle(KeyEvent::release(Key::F6)).matched);
        assert!(!dispatcher.handle(KeyEvent::press(Key::F6)).matched);
        assert!(notifications
            .recv_timeout(Duration::from_millis(100))
            .is_err());

        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.subscription_count(), 0);
    }

    #[test]
    fn test_dispatcher_reset_clears_matcher_progress() {
        let dispatcher = EventDispatcher::new();
        let (handler, _notifications) = TestHandler::channel();
        dispatcher.subscribe(boxed_chord(&[Key::F6, Key::F7]), handler);

        assert!(!dispatcher.handle(KeyEvent::press(Key::F6)).matched);
        assert!(dispatcher.has_keys_pressed());

        dispatcher.reset();
        assert!(!dispatcher.has_keys_pressed());

        // half the chord was forgotten, F7 alone does not complete it
        assert!(!dispatcher.handle(KeyEvent::press(Key::F7)).matched);
    }
}
