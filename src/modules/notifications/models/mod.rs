pub mod order_summary;

pub use order_summary::{NotificationContext, OrderEvent, OrderSummary, SummaryLine};
