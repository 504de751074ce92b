//! Pre-flight validation of order requests, plus bracket risk analysis
//! and spread-strategy recognition.
//!
//! Validation runs before any request is transmitted. Structural problems
//! (missing prices, bad symbols, impossible quantities) are errors and
//! block submission; judgment calls the broker may still accept (odd tick
//! increments, very large quantities, market orders outside the regular
//! session) are warnings.

use crate::execution::enums::{OrderDuration, OrderSide, OrderType};
use crate::execution::request::{
    ComboOrder, EquityOrder, MultilegOrder, OptionLeg, OptionOrder, OrderComponent, OrderRequest,
    OtoOrder, OcoOrder, OtocoOrder, SpreadLeg, SpreadOrder,
};
use crate::validation::path::{is_valid_option_symbol, is_valid_symbol};
use crate::validation::{Issue, Severity, ValidationReport};

/// Upper bound on equity share quantity.
pub const MAX_EQUITY_QUANTITY: u32 = 1_000_000;
/// Upper bound on stop / stop-limit order quantity.
pub const MAX_STOP_QUANTITY: u32 = 100_000;
/// Upper bound on option contract quantity.
pub const MAX_OPTION_QUANTITY: u32 = 10_000;

const LARGE_EQUITY_QUANTITY: u32 = 100_000;
const LARGE_OPTION_QUANTITY: u32 = 1_000;
const LARGE_SHORT_QUANTITY: u32 = 10_000;
const MAX_PRICE: f64 = 100_000.0;

/// Stateless order validator; one entry point per order class.
pub struct OrderValidator;

impl OrderValidator {
    /// Validate any order request by dispatching on its class.
    pub fn validate(request: &OrderRequest) -> ValidationReport {
        match request {
            OrderRequest::Equity(order) => Self::validate_equity(order),
            OrderRequest::Option(order) => Self::validate_option(order),
            OrderRequest::Multileg(order) => Self::validate_multileg(order),
            OrderRequest::Combo(order) => Self::validate_combo(order),
            OrderRequest::Oto(order) => Self::validate_oto(order),
            OrderRequest::Oco(order) => Self::validate_oco(order),
            OrderRequest::Otoco(order) => Self::validate_otoco(order),
            OrderRequest::Spread(order) => Self::validate_spread(order),
        }
    }

    pub fn validate_equity(order: &EquityOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        check_symbol(&mut report, "symbol", &order.symbol);
        check_equity_quantity(&mut report, order.quantity, order.order_type, order.side);
        check_price_type(&mut report, order.order_type, order.price, order.stop);

        if let Some(price) = order.price {
            check_stock_tick(&mut report, "price", price);
        }
        if let Some(stop) = order.stop {
            check_stock_tick(&mut report, "stop", stop);
        }

        check_session_timing(&mut report, order.order_type, order.duration);

        report
    }

    pub fn validate_option(order: &OptionOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        check_symbol(&mut report, "symbol", &order.symbol);
        check_option_symbol(&mut report, "option_symbol", &order.option_symbol);
        check_option_quantity(&mut report, order.quantity);
        check_price_type(&mut report, order.order_type, order.price, order.stop);

        if let Some(price) = order.price {
            check_option_tick(&mut report, "price", price);
        }

        if order.side == OrderSide::SellToOpen {
            report.push(
                Issue::new(
                    "side",
                    Severity::Warning,
                    "selling options to open carries unlimited risk potential",
                )
                .suggestion("confirm margin coverage before submitting"),
            );
        }

        check_session_timing(&mut report, order.order_type, order.duration);

        report
    }

    pub fn validate_multileg(order: &MultilegOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        check_symbol(&mut report, "symbol", &order.symbol);
        check_price_type(&mut report, order.order_type, order.price, None);
        check_leg_count(&mut report, order.legs.len());

        for (i, leg) in order.legs.iter().enumerate() {
            report.merge_labeled(&format!("legs[{i}]"), validate_option_leg(leg));
        }

        report
    }

    pub fn validate_combo(order: &ComboOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        check_symbol(&mut report, "symbol", &order.symbol);
        check_price_type(&mut report, order.order_type, order.price, None);

        // A combo pairs its equity leg with 1-3 option legs.
        if order.legs.is_empty() || order.legs.len() > 3 {
            report.push(
                Issue::new(
                    "legs",
                    Severity::Error,
                    format!("combo orders carry 1 to 3 option legs, got {}", order.legs.len()),
                )
                .expected("1..=3")
                .actual(order.legs.len().to_string()),
            );
        }

        for (i, leg) in order.legs.iter().enumerate() {
            report.merge_labeled(&format!("legs[{i}]"), validate_option_leg(leg));
        }

        match (order.equity_side, order.equity_quantity) {
            (Some(_), Some(quantity)) => {
                if quantity == 0 || quantity > MAX_EQUITY_QUANTITY {
                    report.error("equity_quantity", format!("invalid equity quantity: {quantity}"));
                }
            }
            (None, None) => {
                report.warning("equity_side", "combo order carries no equity leg");
            }
            _ => {
                report.error(
                    "equity_side",
                    "equity side and quantity must be provided together",
                );
            }
        }

        report
    }

    pub fn validate_oto(order: &OtoOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.merge_labeled("first", validate_component(&order.first));
        report.merge_labeled("second", validate_component(&order.second));

        if order.first.symbol != order.second.symbol {
            report.warning("second.symbol", "OTO legs trade different symbols");
        }
        if order.first.side == order.second.side {
            report.warning("second.side", "both OTO legs share the same side");
        }

        report
    }

    pub fn validate_oco(order: &OcoOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.merge_labeled("first", validate_component(&order.first));
        report.merge_labeled("second", validate_component(&order.second));

        if order.first.symbol != order.second.symbol {
            report.error("second.symbol", "OCO legs must share a symbol");
        }
        if order.first.side != order.second.side {
            report.error("second.side", "OCO legs must share a side");
        }
        if order.first.quantity != order.second.quantity {
            report.error("second.quantity", "OCO legs must share a quantity");
        }

        report
    }

    pub fn validate_otoco(order: &OtocoOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.merge_labeled("primary", validate_component(&order.primary));
        report.merge_labeled("profit", validate_component(&order.profit));
        report.merge_labeled("stop", validate_component(&order.stop));

        if order.primary.symbol != order.profit.symbol || order.primary.symbol != order.stop.symbol {
            report.error("symbol", "all bracket components must share a symbol");
        }
        if order.primary.quantity != order.profit.quantity
            || order.primary.quantity != order.stop.quantity
        {
            report.error("quantity", "all bracket components must share a quantity");
        }

        let entry_buys = order.primary.side.is_buy();
        if order.profit.side.is_buy() == entry_buys {
            report.error("profit.side", "profit order must oppose the entry side");
        }
        if order.stop.side.is_buy() == entry_buys {
            report.error("stop.side", "stop order must oppose the entry side");
        }

        if let (Some(entry), Some(profit), Some(stop)) =
            (order.primary.price, order.profit.price, order.stop.stop)
        {
            if entry_buys {
                if profit <= entry {
                    report.warning("profit.price", "profit target is not above the entry price");
                }
                if stop >= entry {
                    report.warning("stop.stop", "stop loss is not below the entry price");
                }
            } else {
                if profit >= entry {
                    report.warning("profit.price", "profit target is not below the entry price");
                }
                if stop <= entry {
                    report.warning("stop.stop", "stop loss is not above the entry price");
                }
            }
        }

        report
    }

    pub fn validate_spread(order: &SpreadOrder) -> ValidationReport {
        let mut report = ValidationReport::new();

        check_symbol(&mut report, "symbol", &order.symbol);
        check_price_type(&mut report, order.order_type, order.price, None);

        let spread_type = match SpreadType::from_str(&order.spread_type) {
            Some(spread_type) => spread_type,
            None => {
                report.push(
                    Issue::new(
                        "spread_type",
                        Severity::Error,
                        format!("unsupported spread type: {}", order.spread_type),
                    )
                    .suggestion("use one of the named strategies, e.g. vertical or iron_condor"),
                );
                return report;
            }
        };

        if order.legs.is_empty() {
            report.error("legs", "spread order must have at least one leg");
        } else if order.legs.len() > 4 {
            report.warning(
                "legs",
                "complex spreads beyond 4 legs may face execution challenges",
            );
        }

        let expected = spread_type.expected_legs();
        if !order.legs.is_empty() && order.legs.len() != expected {
            report.push(
                Issue::new(
                    "legs",
                    Severity::Warning,
                    format!(
                        "{} spreads usually carry {expected} legs",
                        spread_type.as_str()
                    ),
                )
                .expected(expected.to_string())
                .actual(order.legs.len().to_string()),
            );
        }

        for (i, leg) in order.legs.iter().enumerate() {
            report.merge_labeled(&format!("legs[{i}]"), validate_spread_leg(leg));
        }

        report
    }

    /// Risk profile of a bracket order, when its prices are defined.
    pub fn analyze_otoco(order: &OtocoOrder) -> RiskAnalysis {
        let quantity = order.primary.quantity as f64;

        let max_loss = match (order.primary.price, order.stop.stop) {
            (Some(entry), Some(stop)) => (entry - stop).abs() * quantity,
            _ => 0.0,
        };
        let max_profit = match (order.primary.price, order.profit.price) {
            (Some(entry), Some(profit)) => (profit - entry).abs() * quantity,
            _ => 0.0,
        };
        let risk_reward = if max_loss > 0.0 { max_profit / max_loss } else { 0.0 };

        let mut warnings = Vec::new();
        if max_loss > 0.0 && risk_reward < 1.0 {
            warnings.push(String::from("risk exceeds reward for this bracket"));
        }

        RiskAnalysis {
            max_loss,
            max_profit,
            risk_reward,
            breakeven: order.primary.price,
            warnings,
        }
    }
}

/// Risk numbers for a bracket order.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskAnalysis {
    /// `|entry - stop| * quantity`
    pub max_loss: f64,
    /// `|profit - entry| * quantity`
    pub max_profit: f64,
    /// `max_profit / max_loss` when both are defined, else zero.
    pub risk_reward: f64,
    /// The entry price, when defined.
    pub breakeven: Option<f64>,
    pub warnings: Vec<String>,
}

/// The named spread strategies the validator recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpreadType {
    Vertical,
    Horizontal,
    Diagonal,
    IronCondor,
    IronButterfly,
    Butterfly,
    Calendar,
    Ratio,
}

impl SpreadType {
    /// Recognize a spread-type string; vertical sub-strategies
    /// (`vertical_call_bull` etc.) all classify as vertical.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "vertical" | "vertical_call" | "vertical_put" | "vertical_call_bull"
            | "vertical_call_bear" | "vertical_put_bull" | "vertical_put_bear" => {
                Some(Self::Vertical)
            }
            "horizontal" => Some(Self::Horizontal),
            "diagonal" => Some(Self::Diagonal),
            "iron_condor" => Some(Self::IronCondor),
            "iron_butterfly" => Some(Self::IronButterfly),
            "butterfly" => Some(Self::Butterfly),
            "calendar" => Some(Self::Calendar),
            "ratio" => Some(Self::Ratio),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Diagonal => "diagonal",
            Self::IronCondor => "iron_condor",
            Self::IronButterfly => "iron_butterfly",
            Self::Butterfly => "butterfly",
            Self::Calendar => "calendar",
            Self::Ratio => "ratio",
        }
    }

    /// The leg count the strategy is normally built from.
    pub fn expected_legs(self) -> usize {
        match self {
            Self::Vertical | Self::Horizontal | Self::Diagonal | Self::Calendar | Self::Ratio => 2,
            Self::Butterfly => 3,
            Self::IronCondor | Self::IronButterfly => 4,
        }
    }
}

fn validate_component(component: &OrderComponent) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_symbol(&mut report, "symbol", &component.symbol);
    if let Some(option_symbol) = &component.option_symbol {
        check_option_symbol(&mut report, "option_symbol", option_symbol);
        check_option_quantity(&mut report, component.quantity);
    } else {
        check_equity_quantity(&mut report, component.quantity, component.order_type, component.side);
    }
    check_price_type(&mut report, component.order_type, component.price, component.stop);

    report
}

fn validate_option_leg(leg: &OptionLeg) -> ValidationReport {
    let mut report = ValidationReport::new();
    check_option_symbol(&mut report, "option_symbol", &leg.option_symbol);
    check_option_quantity(&mut report, leg.quantity);
    report
}

fn validate_spread_leg(leg: &SpreadLeg) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_option_symbol(&mut report, "option_symbol", &leg.option_symbol);
    check_option_quantity(&mut report, leg.quantity);

    if let Some(ratio) = leg.ratio {
        if ratio <= 0.0 {
            report.error("ratio", "leg ratio must be positive");
        } else if ratio > 10.0 {
            report.warning("ratio", "unusually high leg ratio");
        }
    }

    report
}

fn check_leg_count(report: &mut ValidationReport, count: usize) {
    if !(2..=4).contains(&count) {
        report.push(
            Issue::new(
                "legs",
                Severity::Error,
                format!("multileg orders carry 2 to 4 option legs, got {count}"),
            )
            .expected("2..=4")
            .actual(count.to_string()),
        );
    }
}

fn check_symbol(report: &mut ValidationReport, field: &str, symbol: &str) {
    if !is_valid_symbol(symbol) {
        report.push(
            Issue::new(field, Severity::Error, format!("invalid symbol: `{symbol}`"))
                .expected("1-10 chars of [A-Z0-9.^-]")
                .actual(symbol.to_string()),
        );
    }
}

fn check_option_symbol(report: &mut ValidationReport, field: &str, option_symbol: &str) {
    if !is_valid_option_symbol(option_symbol) {
        report.push(
            Issue::new(
                field,
                Severity::Error,
                format!("invalid option symbol: `{option_symbol}`"),
            )
            .expected("OCC format, e.g. AAPL240315C00150000")
            .actual(option_symbol.to_string()),
        );
    }
}

fn check_equity_quantity(
    report: &mut ValidationReport,
    quantity: u32,
    order_type: OrderType,
    side: OrderSide,
) {
    let cap = match order_type {
        OrderType::Stop | OrderType::StopLimit => MAX_STOP_QUANTITY,
        _ => MAX_EQUITY_QUANTITY,
    };

    if quantity == 0 || quantity > cap {
        report.push(
            Issue::new(
                "quantity",
                Severity::Error,
                format!("invalid quantity: {quantity}"),
            )
            .expected(format!("1..={cap}"))
            .actual(quantity.to_string()),
        );
        return;
    }

    if quantity > LARGE_EQUITY_QUANTITY {
        report.warning("quantity", "large quantity order, verify this is intentional");
    }
    if side == OrderSide::SellShort && quantity > LARGE_SHORT_QUANTITY {
        report.warning(
            "quantity",
            "large short position, ensure adequate margin and risk controls",
        );
    }
}

fn check_option_quantity(report: &mut ValidationReport, quantity: u32) {
    if quantity == 0 || quantity > MAX_OPTION_QUANTITY {
        report.push(
            Issue::new(
                "quantity",
                Severity::Error,
                format!("invalid contract quantity: {quantity}"),
            )
            .expected(format!("1..={MAX_OPTION_QUANTITY}"))
            .actual(quantity.to_string()),
        );
    } else if quantity > LARGE_OPTION_QUANTITY {
        report.warning("quantity", "large contract quantity, verify this is intentional");
    }
}

fn check_price_type(
    report: &mut ValidationReport,
    order_type: OrderType,
    price: Option<f64>,
    stop: Option<f64>,
) {
    let needs_price = matches!(order_type, OrderType::Limit | OrderType::StopLimit);
    let needs_stop = matches!(order_type, OrderType::Stop | OrderType::StopLimit);

    if needs_price {
        match price {
            None => report.push(
                Issue::new(
                    "price",
                    Severity::Error,
                    format!("{} orders require a limit price", order_type.as_str()),
                )
                .suggestion("set a price or switch to a market order"),
            ),
            Some(price) if !is_valid_price(price) => {
                report.error("price", format!("invalid limit price: {price}"));
            }
            _ => {}
        }
    }

    if needs_stop {
        match stop {
            None => report.push(
                Issue::new(
                    "stop",
                    Severity::Error,
                    format!("{} orders require a stop price", order_type.as_str()),
                )
                .suggestion("set a stop price or switch the order type"),
            ),
            Some(stop) if !is_valid_price(stop) => {
                report.error("stop", format!("invalid stop price: {stop}"));
            }
            _ => {}
        }
    }
}

fn check_session_timing(report: &mut ValidationReport, order_type: OrderType, duration: OrderDuration) {
    if order_type != OrderType::Market {
        return;
    }
    match duration {
        OrderDuration::Pre => {
            report.warning("duration", "market orders in pre-market may see wider spreads");
        }
        OrderDuration::Post => {
            report.warning("duration", "market orders after hours may see limited liquidity");
        }
        _ => {}
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0 && price < MAX_PRICE
}

// Tick bands: stocks under $1 trade in 4-decimal ticks, at or above $1 in
// cents; options under $3 in cents, at or above $3 in nickels.
fn check_stock_tick(report: &mut ValidationReport, field: &str, price: f64) {
    let tick = if price < 1.0 { 0.0001 } else { 0.01 };
    warn_off_tick(report, field, price, tick);
}

fn check_option_tick(report: &mut ValidationReport, field: &str, price: f64) {
    let tick = if price < 3.0 { 0.01 } else { 0.05 };
    warn_off_tick(report, field, price, tick);
}

fn warn_off_tick(report: &mut ValidationReport, field: &str, price: f64, tick: f64) {
    let units = price / tick;
    if (units - units.round()).abs() > 1e-6 {
        report.push(
            Issue::new(
                field,
                Severity::Warning,
                format!("price {price} is off the {tick} tick increment"),
            )
            .suggestion("round to the nearest legal increment"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::enums::{OrderDuration, OrderSide, OrderType};

    fn equity(symbol: &str, quantity: u32, order_type: OrderType, price: Option<f64>) -> EquityOrder {
        EquityOrder {
            symbol: symbol.into(),
            side: OrderSide::Buy,
            quantity,
            order_type,
            duration: OrderDuration::Day,
            price,
            stop: None,
            tag: None,
        }
    }

    #[test]
    fn empty_symbol_is_a_single_error() {
        let report = OrderValidator::validate_equity(&equity("", 100, OrderType::Market, None));
        assert!(!report.ok());
        let symbol_errors: Vec<_> = report
            .issues
            .iter()
            .filter(|i| i.field == "symbol" && i.severity >= Severity::Error)
            .collect();
        assert_eq!(symbol_errors.len(), 1);
    }

    #[test]
    fn limit_without_price_is_rejected() {
        let report = OrderValidator::validate_equity(&equity("AAPL", 100, OrderType::Limit, None));
        assert!(!report.ok());
        assert!(report.issues.iter().any(|i| i.field == "price"));
    }

    #[test]
    fn stop_limit_needs_both_prices() {
        let mut order = equity("AAPL", 100, OrderType::StopLimit, Some(150.0));
        let report = OrderValidator::validate_equity(&order);
        assert!(!report.ok());

        order.stop = Some(149.0);
        assert!(OrderValidator::validate_equity(&order).ok());
    }

    #[test]
    fn off_tick_price_is_a_warning_not_an_error() {
        let report =
            OrderValidator::validate_equity(&equity("AAPL", 100, OrderType::Limit, Some(150.351)));
        assert!(report.ok());
        assert!(report.issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn stop_orders_cap_at_one_hundred_thousand() {
        let mut order = equity("AAPL", 150_000, OrderType::Stop, None);
        order.stop = Some(140.0);
        let report = OrderValidator::validate_equity(&order);
        assert!(!report.ok());
    }

    #[test]
    fn large_quantity_warns() {
        let report =
            OrderValidator::validate_equity(&equity("AAPL", 200_000, OrderType::Market, None));
        assert!(report.ok());
        assert!(report.warning_count() >= 1);
    }

    #[test]
    fn oco_legs_must_match() {
        let order = OcoOrder {
            first: OrderComponent::limit("AAPL", OrderSide::Sell, 100, 160.0),
            second: OrderComponent::stop("AAPL", OrderSide::Sell, 50, 140.0),
            tag: None,
        };
        let report = OrderValidator::validate_oco(&order);
        assert!(!report.ok());
        assert!(report.issues.iter().any(|i| i.field == "second.quantity"));
    }

    #[test]
    fn bracket_sides_must_oppose_entry() {
        let mut order = OtocoOrder::buy_with_bracket("AAPL", 100, 150.0, 160.0, 140.0);
        assert!(OrderValidator::validate_otoco(&order).ok());

        order.profit.side = OrderSide::Buy;
        let report = OrderValidator::validate_otoco(&order);
        assert!(!report.ok());
        assert!(report.issues.iter().any(|i| i.field == "profit.side"));
    }

    #[test]
    fn inverted_bracket_prices_warn() {
        // Profit below entry on a buy bracket.
        let order = OtocoOrder::buy_with_bracket("AAPL", 100, 150.0, 145.0, 140.0);
        let report = OrderValidator::validate_otoco(&order);
        assert!(report.ok());
        assert!(report
            .issues
            .iter()
            .any(|i| i.field == "profit.price" && i.severity == Severity::Warning));
    }

    #[test]
    fn bracket_risk_numbers() {
        // Buy 100 @ 150, profit 160, stop 140.
        let order = OtocoOrder::buy_with_bracket("AAPL", 100, 150.0, 160.0, 140.0);
        let analysis = OrderValidator::analyze_otoco(&order);
        assert_eq!(analysis.max_profit, 1000.0);
        assert_eq!(analysis.max_loss, 1000.0);
        assert_eq!(analysis.risk_reward, 1.0);
        assert_eq!(analysis.breakeven, Some(150.0));
    }

    #[test]
    fn spread_type_recognition() {
        assert_eq!(SpreadType::from_str("vertical_call_bull"), Some(SpreadType::Vertical));
        assert_eq!(SpreadType::from_str("iron_condor"), Some(SpreadType::IronCondor));
        assert_eq!(SpreadType::from_str("strangle"), None);
        assert_eq!(SpreadType::IronCondor.expected_legs(), 4);
        assert_eq!(SpreadType::Butterfly.expected_legs(), 3);
    }

    #[test]
    fn spread_with_unexpected_leg_count_warns() {
        let order = SpreadOrder {
            symbol: "SPY".into(),
            order_type: OrderType::Limit,
            duration: OrderDuration::Day,
            price: Some(1.25),
            legs: vec![
                SpreadLeg {
                    option_symbol: "SPY240315C00420000".into(),
                    side: OrderSide::BuyToOpen,
                    quantity: 1,
                    ratio: None,
                },
                SpreadLeg {
                    option_symbol: "SPY240315C00425000".into(),
                    side: OrderSide::SellToOpen,
                    quantity: 1,
                    ratio: None,
                },
                SpreadLeg {
                    option_symbol: "SPY240315C00430000".into(),
                    side: OrderSide::BuyToOpen,
                    quantity: 1,
                    ratio: None,
                },
            ],
            spread_type: "vertical".into(),
            tag: None,
        };
        let report = OrderValidator::validate_spread(&order);
        assert!(report.ok());
        assert!(report.issues.iter().any(|i| i.field == "legs"));
    }

    #[test]
    fn unsupported_spread_type_is_an_error() {
        let order = SpreadOrder {
            symbol: "SPY".into(),
            order_type: OrderType::Limit,
            duration: OrderDuration::Day,
            price: Some(1.0),
            legs: vec![],
            spread_type: "jade_lizard".into(),
            tag: None,
        };
        assert!(!OrderValidator::validate_spread(&order).ok());
    }
}
