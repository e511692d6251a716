pub mod order_intent_service;
pub mod order_query_service;

pub use order_intent_service::{
    generate_receipt, CreateIntentCommand, CreatedIntent, OrderIntentService,
};
pub use order_query_service::OrderQueryService;
