use crate::endpoints::accounts;
use crate::execution::enums::{OrderClass, OrderDuration, OrderSide, OrderStatus, OrderType};
use crate::responses;
use crate::validation::{ResponseClass, ResponseValidator, ValidationLevel, ValidationReport};
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// An order record as the server reports it.
///
/// Decoding is tolerant: absent and null fields default. Use
/// [`Order::validate`] to enforce schema expectations afterwards.
pub struct Order {
    /// Broker-assigned order id.
    pub id: u64,

    #[serde(rename = "class")]
    pub order_class: OrderClass,

    pub symbol: String,

    pub side: OrderSide,

    pub quantity: f64,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    pub status: OrderStatus,

    /// Limit price, for limit and stop-limit orders.
    pub price: Option<f64>,

    /// Stop price, for stop and stop-limit orders.
    pub stop_price: Option<f64>,

    /// Average price across fills so far.
    pub avg_fill_price: Option<f64>,

    /// Quantity executed so far.
    pub exec_quantity: f64,

    pub last_fill_price: f64,

    pub last_fill_quantity: f64,

    /// Quantity still working.
    ///
    /// NOTE: `exec_quantity + remaining_quantity` should reconcile with
    /// `quantity`; the paranoid validation level warns when it doesn't.
    pub remaining_quantity: f64,

    pub create_date: String,

    pub transaction_date: String,

    /// Client tag echoed back, when one was sent.
    pub tag: Option<String>,

    /// Legs of multileg/combo orders.
    #[serde(rename = "leg", deserialize_with = "crate::responses::one_or_many")]
    pub legs: Vec<OrderLeg>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One leg of a multileg order record.
pub struct OrderLeg {
    pub id: u64,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub symbol: String,

    /// OCC option symbol for option legs.
    pub option_symbol: String,

    pub side: OrderSide,

    pub quantity: f64,

    pub status: OrderStatus,

    pub price: Option<f64>,

    pub avg_fill_price: Option<f64>,

    pub exec_quantity: f64,

    pub remaining_quantity: f64,
}

impl Order {
    /// Fetch every order on an account.
    pub async fn fetch_all(
        client: &Client,
        account_id: &str,
        include_tags: bool,
    ) -> Result<Vec<Order>, Error> {
        let bound = accounts::orders(account_id)?;
        let mut query = Vec::new();
        if include_tags {
            query.push(("includeTags".to_string(), "true".to_string()));
        }

        let value = client.send(&bound, &query, &[]).await?;
        responses::collection(&value, "orders", "order")
    }

    /// Fetch one order by id.
    pub async fn fetch(client: &Client, account_id: &str, order_id: &str) -> Result<Order, Error> {
        let bound = accounts::order(account_id, order_id)?;
        let value = client.send(&bound, &[], &[]).await?;
        responses::single(&value, &["order"])
    }

    /// Validate this record against the order field registry.
    pub fn validate(&self, level: ValidationLevel) -> ValidationReport {
        match serde_json::to_value(self) {
            Ok(value) => ResponseValidator::validate(&value, ResponseClass::Order, level),
            Err(_) => ValidationReport::new(),
        }
    }

    /// Whether the order can still fill.
    pub fn is_working(&self) -> bool {
        self.status.is_working()
    }
}

impl Client {
    /// Get every order on an account.
    ///
    /// # Example
    /// ---
    /// List the orders still working.
    /// ```ignore
    /// let orders = client.get_orders("YOUR_ACCOUNT_ID", false).await?;
    /// for order in orders.iter().filter(|o| o.is_working()) {
    ///     println!("#{} {} {} x{}", order.id, order.side, order.symbol, order.quantity);
    /// }
    /// ```
    pub async fn get_orders(&self, account_id: &str, include_tags: bool) -> Result<Vec<Order>, Error> {
        Order::fetch_all(self, account_id, include_tags).await
    }

    /// Get one order by id.
    pub async fn get_order(&self, account_id: &str, order_id: &str) -> Result<Order, Error> {
        Order::fetch(self, account_id, order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_full_record() {
        let value = json!({
            "order": {
                "id": 228175,
                "class": "equity",
                "symbol": "AAPL",
                "side": "buy",
                "quantity": 100.0,
                "type": "limit",
                "duration": "day",
                "price": 150.35,
                "status": "partially_filled",
                "exec_quantity": 40.0,
                "last_fill_price": 150.30,
                "last_fill_quantity": 40.0,
                "remaining_quantity": 60.0,
                "create_date": "2024-03-01T14:30:00.000Z",
                "transaction_date": "2024-03-01T14:31:05.000Z"
            }
        });

        let order: Order = crate::responses::single(&value, &["order"]).unwrap();
        assert_eq!(order.id, 228175);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.exec_quantity + order.remaining_quantity, order.quantity);
        assert!(order.is_working());
        assert!(order.legs.is_empty());
    }

    #[test]
    fn decodes_multileg_with_single_leg_object() {
        let value = json!({
            "id": 1001,
            "class": "multileg",
            "symbol": "SPY",
            "side": "buy",
            "quantity": 1.0,
            "type": "limit",
            "duration": "day",
            "status": "open",
            "leg": {
                "id": 1002,
                "option_symbol": "SPY240315C00420000",
                "side": "buy_to_open",
                "quantity": 1.0,
                "type": "limit",
                "status": "open"
            }
        });

        let order: Order = crate::responses::decode(value).unwrap();
        assert_eq!(order.legs.len(), 1);
        assert_eq!(order.legs[0].option_symbol, "SPY240315C00420000");
    }

    #[test]
    fn quantity_mismatch_decodes_but_flags_on_paranoid() {
        let value = json!({
            "id": 1,
            "class": "equity",
            "symbol": "AAPL",
            "side": "buy",
            "quantity": 100.0,
            "type": "market",
            "duration": "day",
            "status": "open",
            "exec_quantity": 10.0,
            "remaining_quantity": 50.0
        });

        let order: Order = crate::responses::decode(value).unwrap();
        let report = order.validate(ValidationLevel::Paranoid);
        assert!(report.ok(), "mismatch is a warning, not an error");
        assert!(report.warning_count() >= 1);
    }
}
