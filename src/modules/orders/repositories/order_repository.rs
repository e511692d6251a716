// Ledger store for order records.
//
// The paid transition is a single guarded UPDATE matching id, gateway order id
// and pending status at once. Concurrent duplicate completions race on that
// one statement: exactly one sees a matched row, the rest see zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Currency, Result};
use crate::modules::orders::models::{LineItem, OrderRecord, OrderStatus, ShippingAddress};

/// Result of a guarded `pending -> paid` attempt
#[derive(Debug, Clone, PartialEq)]
pub enum MarkPaidOutcome {
    /// The row matched and is now paid
    Matched(OrderRecord),
    /// No row satisfied the guard: unknown order, wrong gateway id, or not pending
    NotMatched,
}

impl MarkPaidOutcome {
    pub fn matched(&self) -> bool {
        matches!(self, MarkPaidOutcome::Matched(_))
    }

    pub fn into_record(self) -> Option<OrderRecord> {
        match self {
            MarkPaidOutcome::Matched(record) => Some(record),
            MarkPaidOutcome::NotMatched => None,
        }
    }
}

/// Operations on the order ledger
///
/// `try_mark_paid` is reserved for payment completion, after signature verification.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new record. The record must already be `pending` with a gateway order id.
    async fn create_pending(&self, order: &OrderRecord) -> Result<OrderRecord>;

    /// Guarded `pending -> paid` transition
    async fn try_mark_paid(
        &self,
        order_id: &str,
        expected_gateway_order_id: &str,
    ) -> Result<MarkPaidOutcome>;

    async fn find_by_id(&self, order_id: &str) -> Result<Option<OrderRecord>>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

/// Row shape as stored in MySQL
#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    user_id: Option<String>,
    user_email: String,
    shipping_address: Json<ShippingAddress>,
    items: Json<Vec<LineItem>>,
    total_price: Decimal,
    currency: String,
    amount_subunits: i64,
    gateway_order_id: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let currency = row
            .currency
            .parse::<Currency>()
            .map_err(|e| AppError::internal(format!("Corrupt order row {}: {}", row.id, e)))?;
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::internal(format!("Corrupt order row {}: {}", row.id, e)))?;

        Ok(OrderRecord {
            id: row.id,
            user_id: row.user_id,
            user_email: row.user_email,
            shipping_address: row.shipping_address.0,
            items: row.items.0,
            total_price: row.total_price,
            currency,
            amount_subunits: row.amount_subunits,
            gateway_order_id: row.gateway_order_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, user_email, shipping_address, items, total_price,
           currency, amount_subunits, gateway_order_id, status, created_at, updated_at
    FROM orders
"#;

/// MySQL-backed ledger
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn create_pending(&self, order: &OrderRecord) -> Result<OrderRecord> {
        if order.status != OrderStatus::Pending {
            return Err(AppError::internal("Only pending orders can be created"));
        }

        if order.gateway_order_id.trim().is_empty() {
            return Err(AppError::internal(
                "Refusing to persist an order without a gateway order id",
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, user_email, shipping_address, items, total_price,
                currency, amount_subunits, gateway_order_id, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.user_email)
        .bind(Json(&order.shipping_address))
        .bind(Json(&order.items))
        .bind(order.total_price)
        .bind(order.currency.to_string())
        .bind(order.amount_subunits)
        .bind(&order.gateway_order_id)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::persistence(format!(
                        "Gateway order '{}' is already bound to a ledger order",
                        order.gateway_order_id
                    ));
                }
            }
            AppError::persistence(format!("Failed to create order: {}", e))
        })?;

        Ok(order.clone())
    }

    async fn try_mark_paid(
        &self,
        order_id: &str,
        expected_gateway_order_id: &str,
    ) -> Result<MarkPaidOutcome> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'paid', updated_at = ?
            WHERE id = ? AND gateway_order_id = ? AND status = 'pending'
            "#,
        )
        .bind(Utc::now())
        .bind(order_id)
        .bind(expected_gateway_order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to update order status: {}", e)))?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(MarkPaidOutcome::NotMatched);
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MarkPaidOutcome::Matched(OrderRecord::try_from(row)?))
    }

    async fn find_by_id(&self, order_id: &str) -> Result<Option<OrderRecord>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRecord::try_from).transpose()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
