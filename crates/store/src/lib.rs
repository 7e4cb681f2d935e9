//! Order and order-item persistence.
//!
//! The [`OrderStore`] trait is the seam between the HTTP layer and storage:
//! [`PostgresOrderStore`] is the production implementation,
//! [`InMemoryOrderStore`] backs the test suites.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use model::{NewOrder, NewOrderItem, Order, OrderItem};
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;
