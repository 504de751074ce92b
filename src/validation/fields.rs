//! Static field registry: the wire-level schema for every response class.
//!
//! Consumed by the response validator. Decoders stay tolerant (missing
//! and null fields default); this registry is where "required" and every
//! other constraint actually live, so partial or evolving responses
//! still deserialize and the validator reports the discrepancies.
//!
//! Constraints with associated data use a small typed union
//! ([`Constraint`]); pattern checks are plain function pointers over the
//! crate's fixed-alphabet matchers rather than a regex engine.

use crate::validation::path::is_valid_symbol;

/// The response shapes the registry knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    Order,
    AccountBalances,
    Position,
    Quote,
    Historical,
    GainLoss,
    History,
    AccessToken,
    Clock,
    Calendar,
    SymbolSearch,
    TimeSales,
    UserProfile,
    Streaming,
}

impl ResponseClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "Order",
            Self::AccountBalances => "AccountBalances",
            Self::Position => "Position",
            Self::Quote => "Quote",
            Self::Historical => "Historical",
            Self::GainLoss => "GainLoss",
            Self::History => "History",
            Self::AccessToken => "AccessToken",
            Self::Clock => "Clock",
            Self::Calendar => "Calendar",
            Self::SymbolSearch => "SymbolSearch",
            Self::TimeSales => "TimeSales",
            Self::UserProfile => "UserProfile",
            Self::Streaming => "Streaming",
        }
    }
}

/// Semantic type of a wire field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Double,
    Boolean,
    Date,
    DateTime,
    Enum,
    Array,
    Object,
    Optional,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Object => "object",
            Self::Optional => "optional",
        }
    }
}

/// A single constraint over a field value.
#[derive(Clone, Copy, Debug)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    MinValue(f64),
    MaxValue(f64),
    /// Named predicate over the string form of the value.
    Matches {
        check: fn(&str) -> bool,
        description: &'static str,
    },
    OneOf(&'static [&'static str]),
    PositiveNumber,
    NonEmpty,
}

/// Everything the registry knows about one field.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub constraints: &'static [Constraint],
    pub example: Option<&'static str>,
    pub valid_values: &'static [&'static str],
    pub category: &'static str,
}

const fn field(
    name: &'static str,
    field_type: FieldType,
    required: bool,
    constraints: &'static [Constraint],
    example: Option<&'static str>,
    valid_values: &'static [&'static str],
    category: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required,
        constraints,
        example,
        valid_values,
        category,
    }
}

pub(crate) fn is_date(value: &str) -> bool {
    // YYYY-MM-DD
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

pub(crate) fn is_datetime(value: &str) -> bool {
    // Date followed by a time separator; the broker mixes ISO-8601 and
    // epoch milliseconds, so bare integers pass too.
    if value.len() >= 19 && is_date(&value[..10]) && matches!(value.as_bytes()[10], b'T' | b' ') {
        return true;
    }
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn symbol_check(value: &str) -> bool {
    is_valid_symbol(value)
}

const ORDER_STATUSES: &[&str] = &[
    "open",
    "partially_filled",
    "filled",
    "expired",
    "canceled",
    "pending",
    "rejected",
];
const ORDER_TYPES: &[&str] = &["market", "limit", "stop", "stop_limit"];
const ORDER_DURATIONS: &[&str] = &["day", "gtc", "pre", "post"];
const ORDER_CLASSES: &[&str] = &["equity", "option", "multileg", "combo", "oto", "oco", "otoco"];
const ORDER_SIDES: &[&str] = &[
    "buy",
    "sell",
    "sell_short",
    "buy_to_open",
    "buy_to_close",
    "sell_to_open",
    "sell_to_close",
];

const SYMBOL_CONSTRAINT: Constraint = Constraint::Matches {
    check: symbol_check,
    description: "symbol format [A-Z0-9.^-]{1,10}",
};

const DATETIME_CONSTRAINT: Constraint = Constraint::Matches {
    check: is_datetime,
    description: "ISO-8601 datetime or epoch timestamp",
};

static ORDER_FIELDS: &[FieldSpec] = &[
    field("id", FieldType::Integer, true, &[Constraint::PositiveNumber], Some("228175"), &[], "identity"),
    field("class", FieldType::Enum, true, &[], Some("equity"), ORDER_CLASSES, "identity"),
    field("symbol", FieldType::String, true, &[SYMBOL_CONSTRAINT], Some("AAPL"), &[], "identity"),
    field("side", FieldType::Enum, true, &[], Some("buy"), ORDER_SIDES, "terms"),
    field("quantity", FieldType::Double, true, &[Constraint::PositiveNumber, Constraint::MaxValue(1_000_000.0)], Some("100"), &[], "terms"),
    field("type", FieldType::Enum, true, &[], Some("limit"), ORDER_TYPES, "terms"),
    field("duration", FieldType::Enum, true, &[], Some("day"), ORDER_DURATIONS, "terms"),
    field("status", FieldType::Enum, true, &[], Some("open"), ORDER_STATUSES, "lifecycle"),
    field("price", FieldType::Optional, false, &[Constraint::PositiveNumber], Some("150.35"), &[], "terms"),
    field("stop_price", FieldType::Optional, false, &[Constraint::PositiveNumber], Some("140.00"), &[], "terms"),
    field("avg_fill_price", FieldType::Optional, false, &[Constraint::MinValue(0.0)], None, &[], "fills"),
    field("exec_quantity", FieldType::Double, false, &[Constraint::MinValue(0.0)], Some("0"), &[], "fills"),
    field("last_fill_price", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "fills"),
    field("last_fill_quantity", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "fills"),
    field("remaining_quantity", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "fills"),
    field("create_date", FieldType::DateTime, false, &[DATETIME_CONSTRAINT], Some("2024-03-01T14:30:00.000Z"), &[], "lifecycle"),
    field("transaction_date", FieldType::DateTime, false, &[DATETIME_CONSTRAINT], None, &[], "lifecycle"),
    field("tag", FieldType::Optional, false, &[Constraint::MaxLength(255)], None, &[], "identity"),
    field("leg", FieldType::Array, false, &[], None, &[], "legs"),
];

static BALANCE_FIELDS: &[FieldSpec] = &[
    field("account_number", FieldType::String, true, &[Constraint::NonEmpty], Some("VA12345678"), &[], "identity"),
    field("account_type", FieldType::Enum, false, &[], Some("margin"), &["cash", "margin", "pdt"], "identity"),
    field("total_equity", FieldType::Double, true, &[], None, &[], "equity"),
    field("total_cash", FieldType::Double, false, &[], None, &[], "cash"),
    field("cash", FieldType::Object, false, &[], None, &[], "cash"),
    field("margin", FieldType::Object, false, &[], None, &[], "margin"),
    field("pdt", FieldType::Object, false, &[], None, &[], "margin"),
    field("long_market_value", FieldType::Double, false, &[], None, &[], "equity"),
    field("short_market_value", FieldType::Double, false, &[], None, &[], "equity"),
    field("account_value", FieldType::Double, false, &[], None, &[], "equity"),
    field("close_pl", FieldType::Double, false, &[], None, &[], "pnl"),
    field("current_requirement", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "margin"),
    field("equity", FieldType::Double, false, &[], None, &[], "equity"),
    field("uncleared_funds", FieldType::Double, false, &[], None, &[], "cash"),
    field("pending_orders_count", FieldType::Integer, false, &[Constraint::MinValue(0.0)], None, &[], "orders"),
    field("option_short_value", FieldType::Double, false, &[], None, &[], "options"),
    field("unsettled_funds", FieldType::Double, false, &[], None, &[], "cash"),
    field("dividend", FieldType::Double, false, &[], None, &[], "cash"),
    field("market_value", FieldType::Double, false, &[], None, &[], "equity"),
];

static POSITION_FIELDS: &[FieldSpec] = &[
    field("id", FieldType::Integer, true, &[Constraint::PositiveNumber], None, &[], "identity"),
    field("symbol", FieldType::String, true, &[], Some("AAPL"), &[], "identity"),
    field("quantity", FieldType::Double, true, &[], Some("100"), &[], "terms"),
    field("cost_basis", FieldType::Double, true, &[], Some("15035.00"), &[], "terms"),
    field("date_acquired", FieldType::DateTime, false, &[], None, &[], "lifecycle"),
];

static QUOTE_FIELDS: &[FieldSpec] = &[
    field("symbol", FieldType::String, true, &[SYMBOL_CONSTRAINT], Some("AAPL"), &[], "identity"),
    field("description", FieldType::String, false, &[], Some("Apple Inc"), &[], "identity"),
    field("exch", FieldType::String, false, &[Constraint::MaxLength(2)], Some("Q"), &[], "identity"),
    field("type", FieldType::Enum, false, &[], Some("stock"), &["stock", "option", "etf", "index", "mutual_fund"], "identity"),
    field("last", FieldType::Double, false, &[Constraint::MinValue(0.0)], Some("150.35"), &[], "prices"),
    field("change", FieldType::Double, false, &[], None, &[], "prices"),
    field("change_percentage", FieldType::Double, false, &[], None, &[], "prices"),
    field("volume", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("average_volume", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("last_volume", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("trade_date", FieldType::DateTime, false, &[], None, &[], "timestamps"),
    field("open", FieldType::Double, false, &[], None, &[], "session"),
    field("high", FieldType::Double, false, &[], None, &[], "session"),
    field("low", FieldType::Double, false, &[], None, &[], "session"),
    field("close", FieldType::Double, false, &[], None, &[], "session"),
    field("prevclose", FieldType::Double, false, &[], None, &[], "session"),
    field("week_52_high", FieldType::Double, false, &[], None, &[], "ranges"),
    field("week_52_low", FieldType::Double, false, &[], None, &[], "ranges"),
    field("bid", FieldType::Double, false, &[Constraint::MinValue(0.0)], Some("150.30"), &[], "prices"),
    field("bidsize", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("bidexch", FieldType::String, false, &[Constraint::MaxLength(2)], None, &[], "prices"),
    field("bid_date", FieldType::DateTime, false, &[], None, &[], "timestamps"),
    field("ask", FieldType::Double, false, &[Constraint::MinValue(0.0)], Some("150.40"), &[], "prices"),
    field("asksize", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("askexch", FieldType::String, false, &[Constraint::MaxLength(2)], None, &[], "prices"),
    field("ask_date", FieldType::DateTime, false, &[], None, &[], "timestamps"),
    field("strike", FieldType::Optional, false, &[Constraint::PositiveNumber], None, &[], "options"),
    field("expiration_date", FieldType::Optional, false, &[], None, &[], "options"),
    field("option_type", FieldType::Optional, false, &[Constraint::OneOf(&["call", "put"])], None, &[], "options"),
    field("root_symbol", FieldType::Optional, false, &[], None, &[], "options"),
    field("open_interest", FieldType::Optional, false, &[Constraint::MinValue(0.0)], None, &[], "options"),
    field("greeks", FieldType::Object, false, &[], None, &[], "options"),
];

static HISTORICAL_FIELDS: &[FieldSpec] = &[
    field("date", FieldType::Date, true, &[Constraint::Matches { check: is_date, description: "YYYY-MM-DD" }], Some("2024-03-01"), &[], "identity"),
    field("open", FieldType::Double, true, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("high", FieldType::Double, true, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("low", FieldType::Double, true, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("close", FieldType::Double, true, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("volume", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
];

static GAIN_LOSS_FIELDS: &[FieldSpec] = &[
    field("symbol", FieldType::String, true, &[], None, &[], "identity"),
    field("close_date", FieldType::Date, false, &[Constraint::Matches { check: is_date, description: "YYYY-MM-DD" }], None, &[], "lifecycle"),
    field("open_date", FieldType::Date, false, &[Constraint::Matches { check: is_date, description: "YYYY-MM-DD" }], None, &[], "lifecycle"),
    field("cost", FieldType::Double, false, &[], None, &[], "pnl"),
    field("gain_loss", FieldType::Double, false, &[], None, &[], "pnl"),
    field("gain_loss_percent", FieldType::Double, false, &[], None, &[], "pnl"),
    field("proceeds", FieldType::Double, false, &[], None, &[], "pnl"),
    field("quantity", FieldType::Double, false, &[], None, &[], "terms"),
    field("term", FieldType::Integer, false, &[Constraint::MinValue(0.0)], None, &[], "lifecycle"),
];

static HISTORY_FIELDS: &[FieldSpec] = &[
    field("amount", FieldType::Double, false, &[], None, &[], "money"),
    field("date", FieldType::DateTime, false, &[], None, &[], "lifecycle"),
    field("type", FieldType::String, false, &[], Some("trade"), &[], "identity"),
    field("description", FieldType::String, false, &[], None, &[], "identity"),
];

static ACCESS_TOKEN_FIELDS: &[FieldSpec] = &[
    field("access_token", FieldType::String, true, &[Constraint::NonEmpty, Constraint::MinLength(8)], None, &[], "auth"),
    field("token_type", FieldType::String, false, &[], Some("Bearer"), &[], "auth"),
    field("expires_in", FieldType::Integer, false, &[Constraint::PositiveNumber], Some("86400"), &[], "auth"),
    field("scope", FieldType::String, false, &[], Some("read write trade"), &[], "auth"),
    field("refresh_token", FieldType::Optional, false, &[], None, &[], "auth"),
    field("issued_at", FieldType::DateTime, false, &[], None, &[], "auth"),
];

static CLOCK_FIELDS: &[FieldSpec] = &[
    field("date", FieldType::Date, true, &[Constraint::Matches { check: is_date, description: "YYYY-MM-DD" }], None, &[], "identity"),
    field("state", FieldType::Enum, true, &[], Some("open"), &["premarket", "open", "postmarket", "closed"], "state"),
    field("description", FieldType::String, false, &[], None, &[], "identity"),
    field("timestamp", FieldType::Integer, false, &[Constraint::PositiveNumber], None, &[], "state"),
    field("next_change", FieldType::String, false, &[], None, &[], "state"),
    field("next_state", FieldType::String, false, &[], None, &[], "state"),
];

static CALENDAR_FIELDS: &[FieldSpec] = &[
    field("date", FieldType::Date, true, &[Constraint::Matches { check: is_date, description: "YYYY-MM-DD" }], None, &[], "identity"),
    field("status", FieldType::Enum, true, &[], Some("open"), &["open", "closed"], "state"),
    field("description", FieldType::String, false, &[], None, &[], "identity"),
    field("premarket", FieldType::Object, false, &[], None, &[], "sessions"),
    field("open", FieldType::Object, false, &[], None, &[], "sessions"),
    field("postmarket", FieldType::Object, false, &[], None, &[], "sessions"),
];

static SYMBOL_SEARCH_FIELDS: &[FieldSpec] = &[
    field("symbol", FieldType::String, true, &[SYMBOL_CONSTRAINT], None, &[], "identity"),
    field("company", FieldType::String, false, &[], None, &[], "identity"),
    field("exchange", FieldType::String, false, &[], None, &[], "identity"),
    field("type", FieldType::String, false, &[], None, &[], "identity"),
];

static TIME_SALES_FIELDS: &[FieldSpec] = &[
    field("time", FieldType::DateTime, true, &[], None, &[], "timestamps"),
    field("timestamp", FieldType::Integer, false, &[Constraint::PositiveNumber], None, &[], "timestamps"),
    field("price", FieldType::Double, true, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("open", FieldType::Double, false, &[], None, &[], "prices"),
    field("high", FieldType::Double, false, &[], None, &[], "prices"),
    field("low", FieldType::Double, false, &[], None, &[], "prices"),
    field("close", FieldType::Double, false, &[], None, &[], "prices"),
    field("volume", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("vwap", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "prices"),
];

static USER_PROFILE_FIELDS: &[FieldSpec] = &[
    field("id", FieldType::String, true, &[Constraint::NonEmpty], None, &[], "identity"),
    field("name", FieldType::String, false, &[], None, &[], "identity"),
    field("account", FieldType::Array, false, &[], None, &[], "accounts"),
];

static STREAMING_FIELDS: &[FieldSpec] = &[
    field("type", FieldType::Enum, false, &[], Some("quote"), &["quote", "trade", "summary", "timesale", "tradex", "order", "journal", "fill"], "identity"),
    field("symbol", FieldType::String, false, &[SYMBOL_CONSTRAINT], None, &[], "identity"),
    field("bid", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("ask", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("price", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "prices"),
    field("size", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "sizes"),
    field("last", FieldType::Double, false, &[Constraint::MinValue(0.0)], None, &[], "prices"),
];

/// The field table for a response class.
pub fn fields(class: ResponseClass) -> &'static [FieldSpec] {
    match class {
        ResponseClass::Order => ORDER_FIELDS,
        ResponseClass::AccountBalances => BALANCE_FIELDS,
        ResponseClass::Position => POSITION_FIELDS,
        ResponseClass::Quote => QUOTE_FIELDS,
        ResponseClass::Historical => HISTORICAL_FIELDS,
        ResponseClass::GainLoss => GAIN_LOSS_FIELDS,
        ResponseClass::History => HISTORY_FIELDS,
        ResponseClass::AccessToken => ACCESS_TOKEN_FIELDS,
        ResponseClass::Clock => CLOCK_FIELDS,
        ResponseClass::Calendar => CALENDAR_FIELDS,
        ResponseClass::SymbolSearch => SYMBOL_SEARCH_FIELDS,
        ResponseClass::TimeSales => TIME_SALES_FIELDS,
        ResponseClass::UserProfile => USER_PROFILE_FIELDS,
        ResponseClass::Streaming => STREAMING_FIELDS,
    }
}

/// Look up one field spec by name.
pub fn field_spec(class: ResponseClass, name: &str) -> Option<&'static FieldSpec> {
    fields(class).iter().find(|spec| spec.name == name)
}

/// Names of every required field for a class.
pub fn required_fields(class: ResponseClass) -> Vec<&'static str> {
    fields(class)
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.name)
        .collect()
}

/// Names of every field in a category.
pub fn fields_in_category(class: ResponseClass, category: &str) -> Vec<&'static str> {
    fields(class)
        .iter()
        .filter(|spec| spec.category == category)
        .map(|spec| spec.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_registry_knows_required_fields() {
        let required = required_fields(ResponseClass::Order);
        for name in ["id", "class", "symbol", "side", "quantity", "type", "duration", "status"] {
            assert!(required.contains(&name), "{name} should be required");
        }
        assert!(!required.contains(&"price"));
    }

    #[test]
    fn quote_symbol_spec_has_pattern_constraint() {
        let spec = field_spec(ResponseClass::Quote, "symbol").unwrap();
        assert!(spec.required);
        assert!(matches!(spec.constraints[0], Constraint::Matches { .. }));
    }

    #[test]
    fn enum_fields_list_their_vocabulary() {
        let spec = field_spec(ResponseClass::Order, "status").unwrap();
        assert_eq!(spec.field_type, FieldType::Enum);
        assert!(spec.valid_values.contains(&"partially_filled"));
    }

    #[test]
    fn categories_group_fields() {
        let fills = fields_in_category(ResponseClass::Order, "fills");
        assert!(fills.contains(&"exec_quantity"));
        assert!(fills.contains(&"remaining_quantity"));
    }

    #[test]
    fn date_checks() {
        assert!(is_date("2024-03-01"));
        assert!(!is_date("2024/03/01"));
        assert!(!is_date("24-03-01"));
        assert!(is_datetime("2024-03-01T14:30:00.000Z"));
        assert!(is_datetime("1709303400000"));
        assert!(!is_datetime("not a time"));
    }
}
