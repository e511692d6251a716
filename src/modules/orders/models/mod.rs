pub mod line_item;
pub mod order;
pub mod requests;

pub use line_item::{LineItem, ShippingAddress};
pub use order::{OrderData, OrderRecord, OrderStatus};
pub use requests::{
    CreateOrderRequest, CreateOrderResponse, OrderStatusResponse, OrderStatusView,
};
