//! Order and payment reconciliation service
//!
//! Creates gateway payment intents bound to pending ledger orders, verifies
//! signed completion callbacks, and promotes orders to paid through a single
//! guarded transition. Operator notifications are best-effort.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::AppState;
pub use core::{AppError, Currency, Result, VERIFICATION_FAILED};
pub use modules::gateways;
pub use modules::notifications;
pub use modules::orders;
pub use modules::payments;
