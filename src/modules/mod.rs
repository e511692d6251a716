pub mod gateways;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod payments;
