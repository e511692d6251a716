pub mod gateway_trait;
pub mod razorpay;

pub use gateway_trait::{GatewayOrder, GatewayOrderNotes, GatewayOrderRequest, PaymentGateway};
pub use razorpay::RazorpayClient;
