use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer order with its line items.
///
/// `order_id` and `created` are assigned by the store at creation; `created`
/// is never mutated afterwards. Only `status` may change post-creation, and
/// it is a free-form string (observed values: `NEW`, `CANCELLED`) with no
/// enforced transition graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_email: String,
    pub status: String,
    #[serde(with = "http_date")]
    pub created: DateTime<Utc>,
    /// Line items in insertion order. Populated once at creation and
    /// immutable through the API afterwards.
    pub order_items: Vec<OrderItem>,
}

/// One line item of an order.
///
/// `game_id` is an opaque reference into an external catalog and is not
/// validated here. `quantity` carries no positivity check; non-positive
/// values are stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: i64,
    pub game_id: i64,
    pub quantity: i64,
}

/// Input for creating an order. The store assigns `order_id`, the item ids
/// and the `created` timestamp.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_email: String,
    pub status: String,
    pub items: Vec<NewOrderItem>,
}

/// One line item of a [`NewOrder`].
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub game_id: i64,
    pub quantity: i64,
}

/// Serde adapter for the HTTP-date timestamp format used on the wire,
/// e.g. `Tue, 10 Aug 2021 00:00:00 GMT`.
pub mod http_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)?;
        Ok(naive.and_utc())
    }
}
