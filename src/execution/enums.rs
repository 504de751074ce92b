//! Order enum vocabulary.
//!
//! Every enum has a canonical lowercase-underscore wire string. Parsing
//! never fails: the broker occasionally introduces new values, so unknown
//! strings map to a documented default variant instead of erroring.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The class of an order request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderClass {
    /// Default for unknown wire values.
    #[default]
    Equity,
    Option,
    Multileg,
    Combo,
    /// One-Triggers-Other
    Oto,
    /// One-Cancels-Other
    Oco,
    /// One-Triggers-One-Cancels-Other (bracket)
    Otoco,
}

impl OrderClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Option => "option",
            Self::Multileg => "multileg",
            Self::Combo => "combo",
            Self::Oto => "oto",
            Self::Oco => "oco",
            Self::Otoco => "otoco",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "equity" => Self::Equity,
            "option" => Self::Option,
            "multileg" => Self::Multileg,
            "combo" => Self::Combo,
            "oto" => Self::Oto,
            "oco" => Self::Oco,
            "otoco" => Self::Otoco,
            _ => Self::Equity,
        }
    }
}

/// How the order prices itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderType {
    /// Default for unknown wire values.
    #[default]
    Market,
    Limit,
    Stop,
    StopLimit,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Stop => "stop",
            Self::StopLimit => "stop_limit",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "market" => Self::Market,
            "limit" => Self::Limit,
            "stop" => Self::Stop,
            "stop_limit" => Self::StopLimit,
            _ => Self::Market,
        }
    }
}

/// How long the order stays working.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderDuration {
    /// Default for unknown wire values.
    #[default]
    Day,
    Gtc,
    /// Pre-market session only.
    Pre,
    /// Post-market session only.
    Post,
}

impl OrderDuration {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Gtc => "gtc",
            Self::Pre => "pre",
            Self::Post => "post",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "day" => Self::Day,
            "gtc" => Self::Gtc,
            "pre" => Self::Pre,
            "post" => Self::Post,
            _ => Self::Day,
        }
    }
}

/// The intent of the order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderSide {
    /// Default for unknown wire values.
    #[default]
    Buy,
    Sell,
    SellShort,
    BuyToOpen,
    BuyToClose,
    SellToOpen,
    SellToClose,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::SellShort => "sell_short",
            Self::BuyToOpen => "buy_to_open",
            Self::BuyToClose => "buy_to_close",
            Self::SellToOpen => "sell_to_open",
            Self::SellToClose => "sell_to_close",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "buy" => Self::Buy,
            "sell" => Self::Sell,
            "sell_short" => Self::SellShort,
            "buy_to_open" => Self::BuyToOpen,
            "buy_to_close" => Self::BuyToClose,
            "sell_to_open" => Self::SellToOpen,
            "sell_to_close" => Self::SellToClose,
            _ => Self::Buy,
        }
    }

    /// Whether the side opens or adds exposure in the buy direction.
    pub fn is_buy(self) -> bool {
        matches!(self, Self::Buy | Self::BuyToOpen | Self::BuyToClose)
    }
}

/// The lifecycle state of a working order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderStatus {
    /// Default for unknown wire values.
    #[default]
    Open,
    PartiallyFilled,
    Filled,
    Expired,
    Canceled,
    Pending,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PartiallyFilled => "partially_filled",
            Self::Filled => "filled",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "partially_filled" => Self::PartiallyFilled,
            "filled" => Self::Filled,
            "expired" => Self::Expired,
            "canceled" => Self::Canceled,
            "pending" => Self::Pending,
            "rejected" => Self::Rejected,
            _ => Self::Open,
        }
    }

    /// Whether the order can still fill.
    pub fn is_working(self) -> bool {
        matches!(self, Self::Open | Self::PartiallyFilled | Self::Pending)
    }
}

macro_rules! string_serde {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    Ok(Self::from_str(&s))
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

string_serde!(OrderClass, OrderType, OrderDuration, OrderSide, OrderStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_holds_for_every_named_variant() {
        use OrderSide::*;
        for side in [Buy, Sell, SellShort, BuyToOpen, BuyToClose, SellToOpen, SellToClose] {
            assert_eq!(OrderSide::from_str(side.as_str()), side);
        }
        for class in [
            OrderClass::Equity,
            OrderClass::Option,
            OrderClass::Multileg,
            OrderClass::Combo,
            OrderClass::Oto,
            OrderClass::Oco,
            OrderClass::Otoco,
        ] {
            assert_eq!(OrderClass::from_str(class.as_str()), class);
        }
        for ty in [OrderType::Market, OrderType::Limit, OrderType::Stop, OrderType::StopLimit] {
            assert_eq!(OrderType::from_str(ty.as_str()), ty);
        }
        for duration in [
            OrderDuration::Day,
            OrderDuration::Gtc,
            OrderDuration::Pre,
            OrderDuration::Post,
        ] {
            assert_eq!(OrderDuration::from_str(duration.as_str()), duration);
        }
        for status in [
            OrderStatus::Open,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
            OrderStatus::Expired,
            OrderStatus::Canceled,
            OrderStatus::Pending,
            OrderStatus::Rejected,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_strings_fall_back_to_defaults() {
        assert_eq!(OrderClass::from_str("exotic_new_class"), OrderClass::Equity);
        assert_eq!(OrderType::from_str("trailing_stop"), OrderType::Market);
        assert_eq!(OrderDuration::from_str("fok"), OrderDuration::Day);
        assert_eq!(OrderSide::from_str("exercise"), OrderSide::Buy);
        assert_eq!(OrderStatus::from_str("held"), OrderStatus::Open);
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&OrderType::StopLimit).unwrap();
        assert_eq!(json, r#""stop_limit""#);
        let side: OrderSide = serde_json::from_str(r#""sell_short""#).unwrap();
        assert_eq!(side, OrderSide::SellShort);
    }
}
