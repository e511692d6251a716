use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::Currency;
use crate::modules::orders::models::{OrderRecord, OrderStatus, ShippingAddress};

/// Which ledger event triggered the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEvent {
    /// Pending order created alongside a gateway intent
    Created,
    /// Completion callback verified, order marked paid
    PaymentVerified,
}

/// Extra context not stored on the ledger row
#[derive(Debug, Clone, Serialize)]
pub struct NotificationContext {
    pub event: OrderEvent,
    pub payment_method: String,
    pub gateway_payment_id: Option<String>,
}

impl NotificationContext {
    pub fn created() -> Self {
        Self {
            event: OrderEvent::Created,
            payment_method: "Razorpay".to_string(),
            gateway_payment_id: None,
        }
    }

    pub fn payment_verified(gateway_payment_id: impl Into<String>) -> Self {
        Self {
            event: OrderEvent::PaymentVerified,
            payment_method: "Razorpay".to_string(),
            gateway_payment_id: Some(gateway_payment_id.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// `None` when unit_price × quantity does not fit in a `Decimal`
    pub line_total: Option<Decimal>,
    pub customization: Option<String>,
}

/// Structured operator summary of an order
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub event: OrderEvent,
    pub customer_email: String,
    pub shipping_address: ShippingAddress,
    pub lines: Vec<SummaryLine>,
    pub total_price: Decimal,
    pub currency: Currency,
    /// Amount sent to the gateway, back in major units
    pub amount_charged: Decimal,
    pub payment_method: String,
    pub payment_status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
}

impl OrderSummary {
    pub fn from_order(order: &OrderRecord, context: &NotificationContext) -> Self {
        Self {
            order_id: order.id.clone(),
            gateway_order_id: order.gateway_order_id.clone(),
            gateway_payment_id: context.gateway_payment_id.clone(),
            event: context.event,
            customer_email: order.user_email.clone(),
            shipping_address: order.shipping_address.clone(),
            lines: order
                .items
                .iter()
                .map(|item| SummaryLine {
                    title: item.title.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total(),
                    customization: item.customization.clone(),
                })
                .collect(),
            total_price: order.total_price,
            currency: order.currency,
            amount_charged: order.currency.from_subunits(order.amount_subunits),
            payment_method: context.payment_method.clone(),
            payment_status: order.status,
            ordered_at: order.created_at,
        }
    }

    pub fn short_id(&self) -> &str {
        self.order_id.get(..8).unwrap_or(&self.order_id)
    }

    pub fn subject(&self) -> String {
        format!(
            "New Order #{} - {}",
            self.short_id(),
            self.currency.format_amount(self.total_price)
        )
    }

    /// Plain-text body for the operator email
    pub fn render_text(&self, store_name: &str) -> String {
        let address = &self.shipping_address;

        let mut body = format!(
            "New order received: {}\nOrder date: {}\nPayment method: {}\nPayment status: {}\nGateway order: {}\n",
            self.order_id,
            self.ordered_at.format("%d %B %Y %H:%M UTC"),
            self.payment_method,
            self.payment_status.as_str().to_uppercase(),
            self.gateway_order_id,
        );
        if let Some(payment_id) = &self.gateway_payment_id {
            body.push_str(&format!("Gateway payment: {}\n", payment_id));
        }

        body.push_str(&format!(
            "\nCustomer\n  Name:  {}\n  Email: {}\n  Phone: {}\n",
            address.full_name, self.customer_email, address.phone
        ));

        body.push_str(&format!(
            "\nShipping address\n  {}\n  {}\n  {}, {} {}\n  {}\n",
            address.full_name,
            address.address,
            address.city,
            address.state,
            address.postal_code,
            address.country
        ));

        body.push_str("\nItems\n");
        for line in &self.lines {
            let line_total = line
                .line_total
                .map(|total| self.currency.format_amount(total))
                .unwrap_or_else(|| "n/a".to_string());
            body.push_str(&format!(
                "  {} x{} @ {} = {}\n",
                line.title,
                line.quantity,
                self.currency.format_amount(line.unit_price),
                line_total
            ));
            if let Some(custom) = &line.customization {
                body.push_str(&format!("    Custom: \"{}\"\n", custom));
            }
        }

        body.push_str(&format!(
            "\nGrand total: {}\nAmount charged: {}\n",
            self.currency.format_amount(self.total_price),
            self.currency.format_amount(self.amount_charged)
        ));
        body.push_str(&format!(
            "\nThis is an automated notification from {}\n",
            store_name
        ));

        body
    }
}
