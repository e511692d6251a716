pub mod models;
pub mod services;

pub use models::{NotificationContext, OrderEvent, OrderSummary};
pub use services::{NotificationDispatcher, OrderNotifier, ResendNotifier};
