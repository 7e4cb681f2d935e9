use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    NewOrder, Order, OrderItem, Result,
    store::OrderStore,
};

/// In-memory order store implementation for testing.
///
/// Provides the same interface as the PostgreSQL implementation. Ids are
/// assigned sequentially starting at 1, like fresh serial columns.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    last_order_id: i64,
    last_item_id: i64,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Inserts a fully-formed order as a fixture, keeping id assignment
    /// ahead of the seeded keys.
    pub async fn seed_order(&self, order: Order) {
        let mut inner = self.inner.write().await;
        inner.last_order_id = inner.last_order_id.max(order.order_id);
        if let Some(max_item_id) = order.order_items.iter().map(|i| i.item_id).max() {
            inner.last_item_id = inner.last_item_id.max(max_item_id);
        }
        inner.orders.push(order);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn list_all(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders = inner.orders.clone();
        orders.sort_by_key(|o| o.order_id);
        Ok(orders)
    }

    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn create(&self, new_order: NewOrder) -> Result<Order> {
        let mut inner = self.inner.write().await;

        inner.last_order_id += 1;
        let order_id = inner.last_order_id;

        let mut order_items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            inner.last_item_id += 1;
            order_items.push(OrderItem {
                item_id: inner.last_item_id,
                game_id: item.game_id,
                quantity: item.quantity,
            });
        }

        let order = Order {
            order_id,
            customer_email: new_order.customer_email,
            status: new_order.status,
            created: Utc::now(),
            order_items,
        };
        inner.orders.push(order.clone());
        Ok(order)
    }

    async fn update_status(
        &self,
        order_id: i64,
        status: Option<String>,
    ) -> Result<Option<Order>> {
        let mut inner = self.inner.write().await;

        let Some(order) = inner.orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(None);
        };

        if let Some(status) = status {
            order.status = status;
        }

        Ok(Some(order.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn new_order(email: &str, items: &[(i64, i64)]) -> NewOrder {
        NewOrder {
            customer_email: email.to_string(),
            status: "NEW".to_string(),
            items: items
                .iter()
                .map(|&(game_id, quantity)| crate::NewOrderItem { game_id, quantity })
                .collect(),
        }
    }

    #[tokio::test]
    async fn create_populates_items_in_payload_order() {
        let store = InMemoryOrderStore::new();

        let order = store
            .create(new_order("haniel@danley.com", &[(55, 88), (7, 1)]))
            .await
            .unwrap();

        assert_eq!(order.order_id, 1);
        assert_eq!(order.customer_email, "haniel@danley.com");
        assert_eq!(order.status, "NEW");
        assert_eq!(order.order_items.len(), 2);
        assert_eq!(order.order_items[0].game_id, 55);
        assert_eq!(order.order_items[0].quantity, 88);
        assert_eq!(order.order_items[1].game_id, 7);
        assert_eq!(order.order_items[1].quantity, 1);
        // Item ids are assigned in payload order.
        assert!(order.order_items[0].item_id < order.order_items[1].item_id);
    }

    #[tokio::test]
    async fn find_by_id_returns_created_order() {
        let store = InMemoryOrderStore::new();

        let created = store
            .create(new_order("phris@coskitt.com", &[(9, 1)]))
            .await
            .unwrap();

        let found = store.find_by_id(created.order_id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_by_id_missing_order_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_id(55).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_empty_store_is_ok() {
        let store = InMemoryOrderStore::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_orders_in_key_order() {
        let store = InMemoryOrderStore::new();
        store.create(new_order("a@example.com", &[(1, 1)])).await.unwrap();
        store.create(new_order("b@example.com", &[])).await.unwrap();

        let orders = store.list_all().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_id, 1);
        assert_eq!(orders[1].order_id, 2);
    }

    #[tokio::test]
    async fn update_status_changes_only_status() {
        let store = InMemoryOrderStore::new();
        let created = store
            .create(new_order("phris@coskitt.com", &[(9, 1)]))
            .await
            .unwrap();

        let updated = store
            .update_status(created.order_id, Some("CANCELLED".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, "CANCELLED");
        assert_eq!(updated.order_id, created.order_id);
        assert_eq!(updated.customer_email, created.customer_email);
        assert_eq!(updated.created, created.created);
        assert_eq!(updated.order_items, created.order_items);
    }

    #[tokio::test]
    async fn update_without_status_is_a_noop() {
        let store = InMemoryOrderStore::new();
        let created = store
            .create(new_order("phris@coskitt.com", &[(9, 1)]))
            .await
            .unwrap();

        let updated = store
            .update_status(created.order_id, None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn update_status_missing_order_creates_nothing() {
        let store = InMemoryOrderStore::new();

        let result = store
            .update_status(555, Some("CANCELLED".to_string()))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn seed_order_keeps_id_assignment_ahead() {
        let store = InMemoryOrderStore::new();
        store
            .seed_order(Order {
                order_id: 6,
                customer_email: "phris@coskitt.com".to_string(),
                status: "NEW".to_string(),
                created: Utc.with_ymd_and_hms(2021, 8, 10, 0, 0, 0).unwrap(),
                order_items: vec![OrderItem {
                    item_id: 11,
                    game_id: 9,
                    quantity: 1,
                }],
            })
            .await;

        let order = store.create(new_order("next@example.com", &[(1, 1)])).await.unwrap();
        assert_eq!(order.order_id, 7);
        assert_eq!(order.order_items[0].item_id, 12);
    }
}
