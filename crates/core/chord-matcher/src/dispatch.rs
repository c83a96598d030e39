use crate::handler::MatchHandler;
use crate::matchers::KeyMatcher;
use crate::types::KeyEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Matches queued faster than the delivery worker drains them are dropped
/// with a warning once this fills up.
const DELIVERY_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// One completed gesture, pushed to the owning subscriber.
#[derive(Debug, Clone, Copy)]
pub struct MatchNotification {
    pub subscription: SubscriptionId,
    pub event: KeyEvent,
}

/// What the hook adapter should do with the OS event after fan-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDisposition {
    pub matched: bool,
    /// Set when a matching subscription has pass-through disabled; the
    /// adapter should consume the event instead of letting it propagate.
    pub swallow: bool,
}

struct Subscription {
    id: SubscriptionId,
    matcher: Box<dyn KeyMatcher>,
    handler: Arc<dyn MatchHandler>,
}

struct Delivery {
    handler: Arc<dyn MatchHandler>,
    notification: MatchNotification,
}

/// Fans the key stream out to registered matchers and converts verdicts
/// into notifications.
///
/// Matcher evaluation happens on the caller's (hook) thread and must stay
/// fast; subscriber callbacks run on a dedicated delivery thread behind a
/// bounded queue, so a slow subscriber can never stall the hook.
pub struct EventDispatcher {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
    delivery_tx: Sender<Delivery>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        let (delivery_tx, delivery_rx) = bounded(DELIVERY_QUEUE_CAPACITY);

        let spawned = thread::Builder::new()
            .name("match-delivery".into())
            .spawn(move || Self::run_delivery_loop(delivery_rx));
        if let Err(e) = spawned {
            log::error!("Failed to spawn delivery worker: {}", e);
        }

        Self {
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            delivery_tx,
        }
    }

    fn run_delivery_loop(delivery_rx: Receiver<Delivery>) {
        for delivery in delivery_rx {
            delivery.handler.handle_match(delivery.notification);
        }
        log::debug!("Delivery worker stopped");
    }

    pub fn subscribe(
        &self,
        matcher: Box<dyn KeyMatcher>,
        handler: Arc<dyn MatchHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.subscriptions.lock().push(Subscription {
            id,
            matcher,
            handler,
        });

        log::debug!("Subscription {:?} registered", id);
        id
    }

    /// Stops future delivery for the subscription. Notifications already
    /// queued are still delivered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        before != subscriptions.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Feeds one event to every subscription, in registration order.
    pub fn handle(&self, event: KeyEvent) -> EventDisposition {
        let mut disposition = EventDisposition::default();
        let mut subscriptions = self.subscriptions.lock();

        for subscription in subscriptions.iter_mut() {
            if !subscription.matcher.handle(&event) {
                continue;
            }

            disposition.matched = true;
            if !subscription.matcher.pass_through() {
                disposition.swallow = true;
            }

            let delivery = Delivery {
                handler: subscription.handler.clone(),
                notification: MatchNotification {
                    subscription: subscription.id,
                    event,
                },
            };

            match self.delivery_tx.try_send(delivery) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    // Subscriber code never runs on this thread, so all we
                    // can do with a backed-up queue is shed the match.
                    log::warn!(
                        "Delivery queue full, dropping match for {:?}",
                        subscription.id
                    );
                }
                Err(TrySendError::Disconnected(_)) => {
                    log::error!(
                        "Delivery worker gone, dropping match for {:?}",
                        subscription.id
                    );
                }
            }
        }

        disposition
    }

    /// Reports whether any subscription has non-idle progress state.
    pub fn has_keys_pressed(&self) -> bool {
        self.subscriptions
            .lock()
            .iter()
            .any(|subscription| subscription.matcher.has_keys_pressed())
    }

    pub fn reset(&self) {
        for subscription in self.subscriptions.lock().iter_mut() {
            subscription.matcher.reset();
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
