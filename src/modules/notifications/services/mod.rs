pub mod notification_dispatcher;
pub mod notifier;

pub use notification_dispatcher::NotificationDispatcher;
pub use notifier::{OrderNotifier, ResendNotifier};
