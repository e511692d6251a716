pub mod services;

pub use services::{
    GatewayOrder, GatewayOrderNotes, GatewayOrderRequest, PaymentGateway, RazorpayClient,
};
