use async_trait::async_trait;

use crate::{NewOrder, Order, Result};

/// Core trait for order store implementations.
///
/// Handlers share a single store instance across requests, so all
/// implementations must be thread-safe (Send + Sync). A missing order is
/// reported as `Ok(None)`, never as an error.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Returns every order with its nested items, in primary-key order.
    ///
    /// An empty store yields an empty vec; whether that is an error is the
    /// caller's policy.
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Looks up a single order by primary key.
    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>>;

    /// Persists a new order and all of its items as one atomic unit.
    ///
    /// Either the order and every item commit together or nothing does.
    /// The store assigns `order_id`, the item ids and `created`; items keep
    /// their payload order.
    async fn create(&self, new_order: NewOrder) -> Result<Order>;

    /// Overwrites an order's status and commits.
    ///
    /// `None` leaves the record untouched but still counts as a successful
    /// update, returning the current row. Returns `Ok(None)` when no order
    /// matches `order_id`; nothing is created in that case.
    async fn update_status(
        &self,
        order_id: i64,
        status: Option<String>,
    ) -> Result<Option<Order>>;
}
