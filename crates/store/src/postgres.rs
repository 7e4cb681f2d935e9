use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    NewOrder, Order, OrderItem, Result,
    store::OrderStore,
};

/// PostgreSQL-backed order store.
///
/// The pool is injected at construction; the store holds no other state.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_order(row: &PgRow, order_items: Vec<OrderItem>) -> Result<Order> {
        Ok(Order {
            order_id: row.try_get("order_id")?,
            customer_email: row.try_get("customer_email")?,
            status: row.try_get("status")?,
            created: row.try_get("created")?,
            order_items,
        })
    }

    fn row_to_item(row: &PgRow) -> Result<OrderItem> {
        Ok(OrderItem {
            item_id: row.try_get("item_id")?,
            game_id: row.try_get("game_id")?,
            quantity: row.try_get("quantity")?,
        })
    }

    async fn items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT item_id, game_id, quantity
            FROM order_item
            WHERE order_id = $1
            ORDER BY item_id ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_item).collect()
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn list_all(&self) -> Result<Vec<Order>> {
        let order_rows = sqlx::query(
            r#"
            SELECT order_id, customer_email, status, created
            FROM "order"
            ORDER BY order_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // Two-step aggregate fetch: every item row belongs to some order row
        // (FK), so one scan of each table reassembles all aggregates.
        let item_rows = sqlx::query(
            r#"
            SELECT item_id, order_id, game_id, quantity
            FROM order_item
            ORDER BY item_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let order_id: i64 = row.try_get("order_id")?;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(Self::row_to_item(row)?);
        }

        order_rows
            .iter()
            .map(|row| {
                let order_id: i64 = row.try_get("order_id")?;
                let items = items_by_order.remove(&order_id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT order_id, customer_email, status, created
            FROM "order"
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for_order(order_id).await?;
                Ok(Some(Self::row_to_order(&row, items)?))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, new_order: NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query(
            r#"
            INSERT INTO "order" (customer_email, status)
            VALUES ($1, $2)
            RETURNING order_id, customer_email, status, created
            "#,
        )
        .bind(&new_order.customer_email)
        .bind(&new_order.status)
        .fetch_one(&mut *tx)
        .await?;

        let order_id: i64 = order_row.try_get("order_id")?;

        let mut order_items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let item_row = sqlx::query(
                r#"
                INSERT INTO order_item (order_id, game_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING item_id, game_id, quantity
                "#,
            )
            .bind(order_id)
            .bind(item.game_id)
            .bind(item.quantity)
            .fetch_one(&mut *tx)
            .await?;

            order_items.push(Self::row_to_item(&item_row)?);
        }

        tx.commit().await?;

        tracing::debug!(order_id, items = order_items.len(), "order created");

        Self::row_to_order(&order_row, order_items)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: Option<String>,
    ) -> Result<Option<Order>> {
        if let Some(status) = status {
            let result = sqlx::query(r#"UPDATE "order" SET status = $2 WHERE order_id = $1"#)
                .bind(order_id)
                .bind(&status)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }

            tracing::debug!(order_id, %status, "order status updated");
        }

        self.find_by_id(order_id).await
    }
}
