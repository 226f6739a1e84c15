pub mod notifier;

pub use notifier::{Notification, NotificationResult, Notifier};
