//! Order requests: what gets validated and submitted to the broker.
//!
//! The request surface is a tagged sum ([`OrderRequest`]) whose variants
//! share the common fields (class, type, duration, optional price/stop,
//! optional client tag); behavior dispatches by variant match. Each
//! variant knows how to encode itself as the
//! `application/x-www-form-urlencoded` body the orders endpoint expects.

use crate::encode::format_price;
use crate::execution::enums::{OrderClass, OrderDuration, OrderSide, OrderType};
use crate::validation::{OrderValidator, ValidationReport};
use crate::Error;
use serde::{Deserialize, Serialize};

/// A single-leg equity order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EquityOrder {
    /// The equity symbol, e.g. `"AAPL"`.
    pub symbol: String,

    /// The intent of the order.
    pub side: OrderSide,

    /// Shares to trade.
    pub quantity: u32,

    /// How the order prices itself.
    #[serde(rename = "type")]
    pub order_type: OrderType,

    /// How long the order stays working.
    pub duration: OrderDuration,

    /// Limit price. Required for `limit` and `stop_limit` orders.
    pub price: Option<f64>,

    /// Stop price. Required for `stop` and `stop_limit` orders.
    pub stop: Option<f64>,

    /// Optional client-side tag echoed back on the order record.
    pub tag: Option<String>,
}

/// A single-leg option order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OptionOrder {
    /// The underlying symbol, e.g. `"AAPL"`.
    pub symbol: String,

    /// The OCC option symbol, e.g. `"AAPL240315C00150000"`.
    pub option_symbol: String,

    /// The intent of the order.
    pub side: OrderSide,

    /// Contracts to trade.
    pub quantity: u32,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    pub price: Option<f64>,

    pub stop: Option<f64>,

    pub tag: Option<String>,
}

/// One option leg of a multileg/combo/spread order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OptionLeg {
    /// The OCC option symbol for this leg.
    pub option_symbol: String,

    /// The intent of this leg.
    pub side: OrderSide,

    /// Contracts on this leg.
    pub quantity: u32,
}

/// A 2-4 leg option order priced as a package.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MultilegOrder {
    /// The underlying symbol shared by the legs.
    pub symbol: String,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    /// Net price for the package.
    pub price: Option<f64>,

    /// The option legs, 2 to 4 of them.
    pub legs: Vec<OptionLeg>,

    pub tag: Option<String>,
}

/// Option legs plus an equity leg, priced as a package.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ComboOrder {
    /// The underlying symbol shared by the legs.
    pub symbol: String,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    pub price: Option<f64>,

    /// The option legs.
    pub legs: Vec<OptionLeg>,

    /// The equity side, when an equity leg is present.
    pub equity_side: Option<OrderSide>,

    /// The equity quantity, when an equity leg is present.
    pub equity_quantity: Option<u32>,

    pub tag: Option<String>,
}

/// One fully-specified component of an advanced (OTO/OCO/OTOCO) order.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrderComponent {
    pub symbol: String,

    pub side: OrderSide,

    pub quantity: u32,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    pub price: Option<f64>,

    pub stop: Option<f64>,

    /// Set when this component trades an option instead of the equity.
    pub option_symbol: Option<String>,

    pub tag: Option<String>,
}

impl OrderComponent {
    /// A market component with no prices attached.
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: u32) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            order_type: OrderType::Market,
            duration: OrderDuration::Day,
            price: None,
            stop: None,
            option_symbol: None,
            tag: None,
        }
    }

    /// A limit component at `price`.
    pub fn limit(symbol: impl Into<String>, side: OrderSide, quantity: u32, price: f64) -> Self {
        Self {
            price: Some(price),
            order_type: OrderType::Limit,
            ..Self::market(symbol, side, quantity)
        }
    }

    /// A stop component triggering at `stop`.
    pub fn stop(symbol: impl Into<String>, side: OrderSide, quantity: u32, stop: f64) -> Self {
        Self {
            stop: Some(stop),
            order_type: OrderType::Stop,
            ..Self::market(symbol, side, quantity)
        }
    }
}

/// One-Triggers-Other: the second order is submitted when the first fills.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OtoOrder {
    pub first: OrderComponent,
    pub second: OrderComponent,
    pub tag: Option<String>,
}

/// One-Cancels-Other: filling either order cancels the other.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OcoOrder {
    pub first: OrderComponent,
    pub second: OrderComponent,
    pub tag: Option<String>,
}

/// Bracket order: an entry plus a profit target and a stop loss, where
/// filling one exit cancels the other.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OtocoOrder {
    pub primary: OrderComponent,
    pub profit: OrderComponent,
    pub stop: OrderComponent,
    pub tag: Option<String>,
}

impl OtocoOrder {
    /// Buy `quantity` at `entry` with a `profit` limit above and a
    /// protective `stop` below.
    pub fn buy_with_bracket(
        symbol: impl Into<String>,
        quantity: u32,
        entry: f64,
        profit: f64,
        stop: f64,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            primary: OrderComponent::limit(symbol.clone(), OrderSide::Buy, quantity, entry),
            profit: OrderComponent::limit(symbol.clone(), OrderSide::Sell, quantity, profit),
            stop: OrderComponent::stop(symbol, OrderSide::Sell, quantity, stop),
            tag: None,
        }
    }

    /// Short `quantity` at `entry` with a `profit` limit below and a
    /// protective `stop` above.
    pub fn sell_with_bracket(
        symbol: impl Into<String>,
        quantity: u32,
        entry: f64,
        profit: f64,
        stop: f64,
    ) -> Self {
        let symbol = symbol.into();
        Self {
            primary: OrderComponent::limit(symbol.clone(), OrderSide::SellShort, quantity, entry),
            profit: OrderComponent::limit(symbol.clone(), OrderSide::Buy, quantity, profit),
            stop: OrderComponent::stop(symbol, OrderSide::Buy, quantity, stop),
            tag: None,
        }
    }
}

/// One leg of a categorized spread.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SpreadLeg {
    pub option_symbol: String,

    pub side: OrderSide,

    pub quantity: u32,

    /// Ratio relative to the other legs, for uneven spreads.
    pub ratio: Option<f64>,
}

/// A multileg order categorized by a named spread strategy.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SpreadOrder {
    /// The underlying symbol shared by the legs.
    pub symbol: String,

    #[serde(rename = "type")]
    pub order_type: OrderType,

    pub duration: OrderDuration,

    /// Net debit/credit for the spread.
    pub price: Option<f64>,

    pub legs: Vec<SpreadLeg>,

    /// The declared strategy, e.g. `"vertical"`, `"iron_condor"`.
    pub spread_type: String,

    pub tag: Option<String>,
}

/// Every order shape the broker accepts, as one tagged sum.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum OrderRequest {
    Equity(EquityOrder),
    Option(OptionOrder),
    Multileg(MultilegOrder),
    Combo(ComboOrder),
    Oto(OtoOrder),
    Oco(OcoOrder),
    Otoco(OtocoOrder),
    /// Serialized to the broker as `multileg` plus a `spread_type` hint.
    Spread(SpreadOrder),
}

impl OrderRequest {
    /// The order class this request serializes under.
    pub fn class(&self) -> OrderClass {
        match self {
            Self::Equity(_) => OrderClass::Equity,
            Self::Option(_) => OrderClass::Option,
            Self::Multileg(_) | Self::Spread(_) => OrderClass::Multileg,
            Self::Combo(_) => OrderClass::Combo,
            Self::Oto(_) => OrderClass::Oto,
            Self::Oco(_) => OrderClass::Oco,
            Self::Otoco(_) => OrderClass::Otoco,
        }
    }

    /// Run the pre-flight validator for this order's class.
    pub fn validate(&self) -> ValidationReport {
        OrderValidator::validate(self)
    }

    /// Encode as the form pairs the orders endpoint expects.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = vec![("class".into(), self.class().as_str().into())];

        match self {
            Self::Equity(order) => {
                form.push(("symbol".into(), order.symbol.clone()));
                form.push(("side".into(), order.side.as_str().into()));
                form.push(("quantity".into(), order.quantity.to_string()));
                form.push(("type".into(), order.order_type.as_str().into()));
                form.push(("duration".into(), order.duration.as_str().into()));
                push_price(&mut form, "price", order.price);
                push_price(&mut form, "stop", order.stop);
                push_tag(&mut form, &order.tag);
            }
            Self::Option(order) => {
                form.push(("symbol".into(), order.symbol.clone()));
                form.push(("option_symbol".into(), order.option_symbol.clone()));
                form.push(("side".into(), order.side.as_str().into()));
                form.push(("quantity".into(), order.quantity.to_string()));
                form.push(("type".into(), order.order_type.as_str().into()));
                form.push(("duration".into(), order.duration.as_str().into()));
                push_price(&mut form, "price", order.price);
                push_price(&mut form, "stop", order.stop);
                push_tag(&mut form, &order.tag);
            }
            Self::Multileg(order) => {
                form.push(("symbol".into(), order.symbol.clone()));
                form.push(("type".into(), order.order_type.as_str().into()));
                form.push(("duration".into(), order.duration.as_str().into()));
                push_price(&mut form, "price", order.price);
                push_option_legs(&mut form, &order.legs);
                push_tag(&mut form, &order.tag);
            }
            Self::Combo(order) => {
                form.push(("symbol".into(), order.symbol.clone()));
                form.push(("type".into(), order.order_type.as_str().into()));
                form.push(("duration".into(), order.duration.as_str().into()));
                push_price(&mut form, "price", order.price);
                push_option_legs(&mut form, &order.legs);
                if let (Some(side), Some(quantity)) = (order.equity_side, order.equity_quantity) {
                    form.push(("equity_side".into(), side.as_str().into()));
                    form.push(("equity_quantity".into(), quantity.to_string()));
                }
                push_tag(&mut form, &order.tag);
            }
            Self::Oto(order) => {
                push_component(&mut form, 0, &order.first);
                push_component(&mut form, 1, &order.second);
                push_tag(&mut form, &order.tag);
            }
            Self::Oco(order) => {
                push_component(&mut form, 0, &order.first);
                push_component(&mut form, 1, &order.second);
                push_tag(&mut form, &order.tag);
            }
            Self::Otoco(order) => {
                push_component(&mut form, 0, &order.primary);
                push_component(&mut form, 1, &order.profit);
                push_component(&mut form, 2, &order.stop);
                push_tag(&mut form, &order.tag);
            }
            Self::Spread(order) => {
                form.push(("symbol".into(), order.symbol.clone()));
                form.push(("type".into(), order.order_type.as_str().into()));
                form.push(("duration".into(), order.duration.as_str().into()));
                form.push(("spread_type".into(), order.spread_type.clone()));
                push_price(&mut form, "price", order.price);
                for (i, leg) in order.legs.iter().enumerate() {
                    form.push((format!("option_symbol[{i}]"), leg.option_symbol.clone()));
                    form.push((format!("side[{i}]"), leg.side.as_str().into()));
                    form.push((format!("quantity[{i}]"), leg.quantity.to_string()));
                }
                push_tag(&mut form, &order.tag);
            }
        }

        form
    }
}

// Sub-$1 prices keep four decimals (the finer tick band), everything
// else serializes to the cent.
pub(crate) fn price_text(price: f64) -> String {
    if price < 1.0 {
        format_price(price, 4)
    } else {
        format_price(price, 2)
    }
}

fn push_price(form: &mut Vec<(String, String)>, key: &str, price: Option<f64>) {
    if let Some(price) = price {
        form.push((key.into(), price_text(price)));
    }
}

fn push_tag(form: &mut Vec<(String, String)>, tag: &Option<String>) {
    if let Some(tag) = tag {
        form.push(("tag".into(), tag.clone()));
    }
}

fn push_option_legs(form: &mut Vec<(String, String)>, legs: &[OptionLeg]) {
    for (i, leg) in legs.iter().enumerate() {
        form.push((format!("option_symbol[{i}]"), leg.option_symbol.clone()));
        form.push((format!("side[{i}]"), leg.side.as_str().into()));
        form.push((format!("quantity[{i}]"), leg.quantity.to_string()));
    }
}

fn push_component(form: &mut Vec<(String, String)>, index: usize, component: &OrderComponent) {
    form.push((format!("symbol[{index}]"), component.symbol.clone()));
    form.push((format!("side[{index}]"), component.side.as_str().into()));
    form.push((format!("quantity[{index}]"), component.quantity.to_string()));
    form.push((format!("type[{index}]"), component.order_type.as_str().into()));
    form.push((format!("duration[{index}]"), component.duration.as_str().into()));
    if let Some(price) = component.price {
        form.push((format!("price[{index}]"), price_text(price)));
    }
    if let Some(stop) = component.stop {
        form.push((format!("stop[{index}]"), price_text(stop)));
    }
    if let Some(option_symbol) = &component.option_symbol {
        form.push((format!("option_symbol[{index}]"), option_symbol.clone()));
    }
}

/// Builder for single-leg equity orders.
#[derive(Debug, Default)]
pub struct EquityOrderBuilder {
    symbol: Option<String>,
    side: Option<OrderSide>,
    quantity: Option<u32>,
    order_type: Option<OrderType>,
    duration: OrderDuration,
    price: Option<f64>,
    stop: Option<f64>,
    tag: Option<String>,
}

impl EquityOrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the symbol to trade. Required.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the order intent. Required.
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the share quantity. Required.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the order type. Required.
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Set the duration. Defaults to `day`.
    pub fn duration(mut self, duration: OrderDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Set a limit price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set a stop price.
    pub fn stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Attach a client tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Finish building. `symbol`, `side`, `quantity`, and `order_type`
    /// are required.
    pub fn build(self) -> Result<EquityOrder, Error> {
        Ok(EquityOrder {
            symbol: self.symbol.ok_or(Error::SymbolNotSet)?,
            side: self.side.ok_or(Error::SideNotSet)?,
            quantity: self.quantity.ok_or(Error::QuantityNotSet)?,
            order_type: self.order_type.ok_or(Error::OrderTypeNotSet)?,
            duration: self.duration,
            price: self.price,
            stop: self.stop,
            tag: self.tag,
        })
    }
}

/// Builder for single-leg option orders.
#[derive(Debug, Default)]
pub struct OptionOrderBuilder {
    symbol: Option<String>,
    option_symbol: Option<String>,
    side: Option<OrderSide>,
    quantity: Option<u32>,
    order_type: Option<OrderType>,
    duration: OrderDuration,
    price: Option<f64>,
    stop: Option<f64>,
    tag: Option<String>,
}

impl OptionOrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the underlying symbol. Required.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the OCC option symbol. Required.
    pub fn option_symbol(mut self, option_symbol: impl Into<String>) -> Self {
        self.option_symbol = Some(option_symbol.into());
        self
    }

    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn duration(mut self, duration: OrderDuration) -> Self {
        self.duration = duration;
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

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn build(self) -> Result<OptionOrder, Error> {
        Ok(OptionOrder {
            symbol: self.symbol.ok_or(Error::SymbolNotSet)?,
            option_symbol: self.option_symbol.ok_or(Error::SymbolNotSet)?,
            side: self.side.ok_or(Error::SideNotSet)?,
            quantity: self.quantity.ok_or(Error::QuantityNotSet)?,
            order_type: self.order_type.ok_or(Error::OrderTypeNotSet)?,
            duration: self.duration,
            price: self.price,
            stop: self.stop,
            tag: self.tag,
        })
    }
}

/// Builder for categorized spread orders.
#[derive(Debug, Default)]
pub struct SpreadOrderBuilder {
    symbol: Option<String>,
    order_type: Option<OrderType>,
    duration: OrderDuration,
    price: Option<f64>,
    legs: Vec<SpreadLeg>,
    spread_type: Option<String>,
    tag: Option<String>,
}

impl SpreadOrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    pub fn duration(mut self, duration: OrderDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Net debit/credit for the package.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Declare the strategy, e.g. `"vertical"` or `"iron_condor"`. Required.
    pub fn spread_type(mut self, spread_type: impl Into<String>) -> Self {
        self.spread_type = Some(spread_type.into());
        self
    }

    /// Add one leg.
    pub fn leg(mut self, option_symbol: impl Into<String>, side: OrderSide, quantity: u32) -> Self {
        self.legs.push(SpreadLeg {
            option_symbol: option_symbol.into(),
            side,
            quantity,
            ratio: None,
        });
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn build(self) -> Result<SpreadOrder, Error> {
        if self.legs.is_empty() {
            return Err(Error::LegsNotSet);
        }
        Ok(SpreadOrder {
            symbol: self.symbol.ok_or(Error::SymbolNotSet)?,
            order_type: self.order_type.ok_or(Error::OrderTypeNotSet)?,
            duration: self.duration,
            price: self.price,
            legs: self.legs,
            spread_type: self.spread_type.ok_or(Error::SpreadTypeNotSet)?,
            tag: self.tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_form_layout() {
        let order = OrderRequest::Equity(EquityOrder {
            symbol: "AAPL".into(),
            side: OrderSide::Buy,
            quantity: 100,
            order_type: OrderType::Limit,
            duration: OrderDuration::Gtc,
            price: Some(150.35),
            stop: None,
            tag: Some("my-strategy".into()),
        });

        let form = order.to_form();
        assert_eq!(form[0], ("class".to_string(), "equity".to_string()));
        assert!(form.contains(&("symbol".to_string(), "AAPL".to_string())));
        assert!(form.contains(&("price".to_string(), "150.35".to_string())));
        assert!(form.contains(&("duration".to_string(), "gtc".to_string())));
        assert!(form.contains(&("tag".to_string(), "my-strategy".to_string())));
        assert!(!form.iter().any(|(k, _)| k == "stop"));
    }

    #[test]
    fn otoco_form_uses_indexed_components() {
        let order = OrderRequest::Otoco(OtocoOrder::buy_with_bracket("AAPL", 100, 150.0, 160.0, 140.0));
        let form = order.to_form();

        assert!(form.contains(&("class".to_string(), "otoco".to_string())));
        assert!(form.contains(&("symbol[0]".to_string(), "AAPL".to_string())));
        assert!(form.contains(&("side[0]".to_string(), "buy".to_string())));
        assert!(form.contains(&("price[1]".to_string(), "160.00".to_string())));
        assert!(form.contains(&("stop[2]".to_string(), "140.00".to_string())));
        assert!(form.contains(&("side[2]".to_string(), "sell".to_string())));
    }

    #[test]
    fn sub_dollar_prices_keep_four_decimals() {
        assert_eq!(price_text(0.1234), "0.1234");
        assert_eq!(price_text(0.5), "0.5000");
        assert_eq!(price_text(12.5), "12.50");
    }

    #[test]
    fn spread_form_carries_strategy_and_legs() {
        let order = SpreadOrderBuilder::new()
            .symbol("SPY")
            .order_type(OrderType::Limit)
            .price(1.25)
            .spread_type("vertical")
            .leg("SPY240315C00420000", OrderSide::BuyToOpen, 1)
            .leg("SPY240315C00425000", OrderSide::SellToOpen, 1)
            .build()
            .unwrap();

        let form = OrderRequest::Spread(order).to_form();
        assert!(form.contains(&("class".to_string(), "multileg".to_string())));
        assert!(form.contains(&("spread_type".to_string(), "vertical".to_string())));
        assert!(form.contains(&("option_symbol[1]".to_string(), "SPY240315C00425000".to_string())));
    }

    #[test]
    fn builders_enforce_required_fields() {
        let missing_symbol = EquityOrderBuilder::new()
            .side(OrderSide::Buy)
            .quantity(1)
            .order_type(OrderType::Market)
            .build();
        assert!(matches!(missing_symbol, Err(Error::SymbolNotSet)));

        let missing_legs = SpreadOrderBuilder::new()
            .symbol("SPY")
            .order_type(OrderType::Limit)
            .spread_type("vertical")
            .build();
        assert!(matches!(missing_legs, Err(Error::LegsNotSet)));
    }
}
