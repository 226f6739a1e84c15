pub mod traits;
pub mod notifiers;

pub use traits::{Notification, NotificationResult, Notifier};
pub use notifiers::PushoverNotifier;
