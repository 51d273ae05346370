//! Service order repository.
//!
//! Order lines are stored as a JSONB snapshot of the cart so a quote keeps
//! its prices after the catalog changes.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use arycar_core::{
    CartItem, CustomerId, Money, NewOrder, OrderId, OrderStatus, OrderSummary, Plate,
    StatusFilter, VehicleSize, VehicleType,
};

use super::{RepositoryError, from_jsonb, to_jsonb};

const ORDER_COLUMNS: &str = "id, items, vehicle_type, size, total, status, customer_id, \
                             customer_name, vehicle_plate, pickup_delivery, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    items: serde_json::Value,
    vehicle_type: VehicleType,
    size: VehicleSize,
    total: Money,
    status: OrderStatus,
    customer_id: CustomerId,
    customer_name: String,
    vehicle_plate: Plate,
    pickup_delivery: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<CartItem> = from_jsonb(r.items, "order items")?;
        Ok(Self {
            id: r.id,
            items,
            vehicle_type: r.vehicle_type,
            size: r.size,
            total: r.total,
            status: r.status,
            customer_id: r.customer_id,
            customer_name: r.customer_name,
            vehicle_plate: r.vehicle_plate,
            pickup_delivery: r.pickup_delivery,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Repository for service order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, order: &NewOrder) -> Result<OrderSummary, RepositoryError> {
        let items = to_jsonb(&order.items, "order items")?;
        let sql = format!(
            r"
            INSERT INTO arycar.service_order
                (items, vehicle_type, size, total, status, customer_id, customer_name,
                 vehicle_plate, pickup_delivery)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "
        );
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(items)
            .bind(order.vehicle_type)
            .bind(order.size)
            .bind(order.total)
            .bind(order.status)
            .bind(order.customer_id)
            .bind(&order.customer_name)
            .bind(&order.vehicle_plate)
            .bind(order.pickup_delivery)
            .fetch_one(self.pool)
            .await?
            .try_into()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored items cannot be
    /// decoded.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderSummary>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM arycar.service_order WHERE id = $1");
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(OrderSummary::try_from)
            .transpose()
    }

    /// List orders for the queue board, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: StatusFilter) -> Result<Vec<OrderSummary>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM arycar.service_order
            WHERE $1::arycar.order_status IS NULL OR status = $1
            ORDER BY created_at DESC, id DESC
            "
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(filter.status())
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// Move an order to another status. Any transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderSummary, RepositoryError> {
        let sql = format!(
            r"
            UPDATE arycar.service_order
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        );
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()
    }

    /// Replace an order's lines and total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn save_items(&self, order: &OrderSummary) -> Result<OrderSummary, RepositoryError> {
        let items = to_jsonb(&order.items, "order items")?;
        let sql = format!(
            r"
            UPDATE arycar.service_order
            SET items = $2, total = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        );
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.id)
            .bind(items)
            .bind(order.total)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM arycar.service_order WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
