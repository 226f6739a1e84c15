// Notifier implementations
pub mod pushover;

pub use pushover::PushoverNotifier;
