//! Streaming frame vocabulary: classification of incoming JSON frames
//! and typed views over the common frame shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kinds of data a streaming session can deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamingDataType {
    Quote,
    Trade,
    Summary,
    TimeSale,
    TradEx,
    OrderStatus,
    AccountActivity,
}

impl StreamingDataType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Trade => "trade",
            Self::Summary => "summary",
            Self::TimeSale => "timesale",
            Self::TradEx => "tradex",
            Self::OrderStatus => "order",
            Self::AccountActivity => "account_activity",
        }
    }

    /// Classify a frame by its `type` discriminator, falling back to
    /// field heuristics for frames that omit it. Unclassifiable frames
    /// read as quotes, the most common frame on a market stream.
    pub fn classify(frame: &Value) -> Self {
        if let Some(frame_type) = frame.get("type").and_then(Value::as_str) {
            match frame_type {
                "quote" => return Self::Quote,
                "trade" => return Self::Trade,
                "summary" => return Self::Summary,
                "timesale" => return Self::TimeSale,
                "tradex" => return Self::TradEx,
                "order" => return Self::OrderStatus,
                "journal" | "fill" => return Self::AccountActivity,
                _ => {}
            }
        }

        if frame.get("bid").is_some() {
            return Self::Quote;
        }
        if frame.get("price").is_some() && frame.get("size").is_some() {
            return Self::Trade;
        }
        if frame.get("order_id").is_some() {
            return Self::OrderStatus;
        }

        Self::Quote
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A top-of-book update from the market stream.
pub struct StreamingQuote {
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    pub bidsize: u64,
    pub asksize: u64,
    pub bidexch: String,
    pub askexch: String,
    /// Epoch milliseconds of the update.
    pub biddate: u64,
    pub askdate: u64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A trade print from the market stream.
pub struct StreamingTrade {
    pub symbol: String,
    pub price: f64,
    pub size: u64,
    pub exch: String,
    pub cvol: u64,
    pub date: u64,
    pub last: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A session summary frame.
pub struct StreamingSummary {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub prev_close: f64,
    pub volume: u64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// An order status update from the account stream.
pub struct StreamingOrderStatus {
    pub order_id: u64,
    pub status: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub side: String,
    pub quantity: f64,
    pub filled_quantity: f64,
    pub avg_fill_price: f64,
    pub remaining_quantity: f64,
}

impl StreamingQuote {
    pub fn from_frame(frame: Value) -> Result<Self, crate::Error> {
        crate::responses::decode(frame)
    }
}

impl StreamingTrade {
    pub fn from_frame(frame: Value) -> Result<Self, crate::Error> {
        crate::responses::decode(frame)
    }
}

impl StreamingSummary {
    pub fn from_frame(frame: Value) -> Result<Self, crate::Error> {
        crate::responses::decode(frame)
    }
}

impl StreamingOrderStatus {
    pub fn from_frame(frame: Value) -> Result<Self, crate::Error> {
        crate::responses::decode(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discriminator_wins() {
        assert_eq!(
            StreamingDataType::classify(&json!({"type": "timesale", "symbol": "SPY"})),
            StreamingDataType::TimeSale
        );
        assert_eq!(
            StreamingDataType::classify(&json!({"type": "journal"})),
            StreamingDataType::AccountActivity
        );
        assert_eq!(
            StreamingDataType::classify(&json!({"type": "fill"})),
            StreamingDataType::AccountActivity
        );
    }

    #[test]
    fn heuristics_cover_untyped_frames() {
        assert_eq!(
            StreamingDataType::classify(&json!({"symbol": "SPY", "bid": 420.0})),
            StreamingDataType::Quote
        );
        assert_eq!(
            StreamingDataType::classify(&json!({"symbol": "SPY", "price": 420.0, "size": 100})),
            StreamingDataType::Trade
        );
        assert_eq!(
            StreamingDataType::classify(&json!({"order_id": 228175, "status": "filled"})),
            StreamingDataType::OrderStatus
        );
        // Unknown shapes default to quote.
        assert_eq!(
            StreamingDataType::classify(&json!({"mystery": true})),
            StreamingDataType::Quote
        );
    }

    #[test]
    fn typed_views_decode_tolerantly() {
        let quote = StreamingQuote::from_frame(json!({
            "type": "quote", "symbol": "SPY", "bid": 420.10, "ask": 420.15
        }))
        .unwrap();
        assert_eq!(quote.symbol, "SPY");
        assert_eq!(quote.bidsize, 0);

        let status = StreamingOrderStatus::from_frame(json!({
            "type": "order", "order_id": 228175, "status": "filled", "avg_fill_price": null
        }))
        .unwrap();
        assert_eq!(status.order_id, 228175);
        assert_eq!(status.avg_fill_price, 0.0);
    }
}
