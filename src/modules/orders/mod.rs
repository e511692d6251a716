// Orders module: the ledger record, its store, order intent creation and lookups

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{LineItem, OrderData, OrderRecord, OrderStatus, ShippingAddress};
pub use repositories::{MarkPaidOutcome, MySqlOrderRepository, OrderRepository};
pub use services::{CreateIntentCommand, CreatedIntent, OrderIntentService, OrderQueryService};
