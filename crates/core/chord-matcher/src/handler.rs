use crate::dispatch::MatchNotification;

pub trait MatchHandler: Send + Sync {
    fn handle_match(&self, notification: MatchNotification);
    fn handle_error(&self, error: String);
}
