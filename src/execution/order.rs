use crate::endpoints::accounts;
use crate::error_codes::ApiErrorContext;
use crate::execution::enums::{OrderDuration, OrderSide, OrderType};
use crate::execution::request::{price_text, OrderRequest};
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// The broker's acknowledgment of a submitted, modified, or canceled
/// order.
pub struct OrderAck {
    /// The order id the broker assigned (or acted on).
    pub id: u64,

    /// Submission status, usually `"ok"`.
    pub status: String,

    /// Partner routing tag, when present.
    pub partner_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// The broker's pre-flight costing of an order.
pub struct OrderPreview {
    /// Preview outcome, usually `"ok"`.
    pub result: String,

    pub commission: f64,

    /// Total cost including commission and fees.
    pub cost: f64,

    pub fees: f64,

    pub symbol: String,

    pub quantity: f64,

    pub side: OrderSide,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    pub price: Option<f64>,

    /// Strategy classification the broker inferred.
    pub strategy_type: String,

    /// Number of day trades this order would consume.
    pub day_trades: f64,

    /// Buying power after the order.
    pub buying_power: f64,

    /// Margin requirement change.
    pub change: f64,

    /// Order amount.
    pub amount: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
/// Changes to apply to a working order. Unset fields keep their
/// current values.
pub struct OrderModification {
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub duration: Option<OrderDuration>,
    pub price: Option<f64>,
    pub stop: Option<f64>,
    pub quantity: Option<u32>,
}

impl OrderModification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn duration(mut self, duration: OrderDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    fn to_form(&self) -> Vec<(String, String)> {
        let mut form = Vec::new();
        if let Some(order_type) = self.order_type {
            form.push(("type".to_string(), order_type.as_str().to_string()));
        }
        if let Some(duration) = self.duration {
            form.push(("duration".to_string(), duration.as_str().to_string()));
        }
        if let Some(price) = self.price {
            form.push(("price".to_string(), price_text(price)));
        }
        if let Some(stop) = self.stop {
            form.push(("stop".to_string(), price_text(stop)));
        }
        if let Some(quantity) = self.quantity {
            form.push(("quantity".to_string(), quantity.to_string()));
        }
        form
    }
}

impl OrderRequest {
    /// Validate, then submit this order to an account.
    ///
    /// Validation failures (any issue at Error severity) refuse to
    /// dispatch; the request never reaches the wire.
    pub async fn place(&self, client: &Client, account_id: &str) -> Result<OrderAck, Error> {
        let report = self.validate();
        if !report.ok() {
            return Err(Error::Validation(report));
        }

        let bound = accounts::create_order(account_id)?;
        let value = client.send(&bound, &[], &self.to_form()).await?;

        check_order_errors(&value, account_id)?;
        responses::single(&value, &["order"])
    }

    /// Ask the broker to cost this order without placing it.
    ///
    /// The same pre-flight validation applies as for [`Self::place`].
    pub async fn preview(&self, client: &Client, account_id: &str) -> Result<OrderPreview, Error> {
        let report = self.validate();
        if !report.ok() {
            return Err(Error::Validation(report));
        }

        let bound = accounts::create_order(account_id)?;
        let mut form = self.to_form();
        form.push(("preview".to_string(), "true".to_string()));

        let value = client.send(&bound, &[], &form).await?;
        check_order_errors(&value, account_id)?;
        responses::single(&value, &["order"])
    }
}

// The orders endpoint reports rejections inside a 200 body:
// {"errors":{"error": "..."|[...]}}.
fn check_order_errors(value: &serde_json::Value, account_id: &str) -> Result<(), Error> {
    let errors: Vec<String> = responses::collection(value, "errors", "error").unwrap_or_default();
    match errors.first() {
        Some(first) => {
            // The reason code is the first word of the broker message
            // when the message is a bare code; otherwise Unknown.
            let ctx = ApiErrorContext::from_string_code(first, errors.join("; "))
                .with_account_id(account_id);
            Err(Error::Api(ctx))
        }
        None => Ok(()),
    }
}

impl Client {
    /// Validate and place an order.
    ///
    /// # Example
    /// ---
    /// ```ignore
    /// let order = OrderRequest::Equity(
    ///     EquityOrderBuilder::new()
    ///         .symbol("AAPL")
    ///         .side(OrderSide::Buy)
    ///         .quantity(100)
    ///         .order_type(OrderType::Limit)
    ///         .price(150.35)
    ///         .build()?,
    /// );
    /// let ack = client.place_order("VA12345678", &order).await?;
    /// println!("order id: {}", ack.id);
    /// ```
    pub async fn place_order(
        &self,
        account_id: &str,
        order: &OrderRequest,
    ) -> Result<OrderAck, Error> {
        order.place(self, account_id).await
    }

    /// Validate and preview an order without placing it.
    pub async fn preview_order(
        &self,
        account_id: &str,
        order: &OrderRequest,
    ) -> Result<OrderPreview, Error> {
        order.preview(self, account_id).await
    }

    /// Modify a working order.
    pub async fn modify_order(
        &self,
        account_id: &str,
        order_id: &str,
        modification: &OrderModification,
    ) -> Result<OrderAck, Error> {
        let bound = accounts::modify_order(account_id, order_id)?;
        let value = self.send(&bound, &[], &modification.to_form()).await?;
        check_order_errors(&value, account_id)?;
        responses::single(&value, &["order"])
    }

    /// Cancel a working order.
    pub async fn cancel_order(&self, account_id: &str, order_id: &str) -> Result<OrderAck, Error> {
        let bound = accounts::cancel_order(account_id, order_id)?;
        let value = self.send(&bound, &[], &[]).await?;
        check_order_errors(&value, account_id)?;
        responses::single(&value, &["order"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ack_decodes_from_envelope() {
        let value = json!({"order": {"id": 228175, "status": "ok", "partner_id": "tag"}});
        let ack: OrderAck = responses::single(&value, &["order"]).unwrap();
        assert_eq!(ack.id, 228175);
        assert_eq!(ack.status, "ok");
    }

    #[test]
    fn broker_rejections_surface_as_api_errors() {
        let value = json!({"errors": {"error": "InitialMargin"}});
        let err = check_order_errors(&value, "VA12345678").unwrap_err();
        match err {
            Error::Api(ctx) => {
                assert_eq!(ctx.code, crate::error_codes::TradierErrorCode::InitialMargin);
                assert_eq!(ctx.account_id.as_deref(), Some("VA12345678"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn modification_form_only_carries_set_fields() {
        let form = OrderModification::new().price(151.00).to_form();
        assert_eq!(form, vec![("price".to_string(), "151.00".to_string())]);
    }
}
