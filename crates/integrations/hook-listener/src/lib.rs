mod hook_listener;

pub use hook_listener::{HookListener, ListenerControl, ListenerHandle};
