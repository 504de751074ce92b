use crate::endpoints::markets;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A quote snapshot for one symbol.
///
/// Equity and option quotes share this shape; the option-only fields
/// (strike, expiration, greeks, ...) are `None` for equities.
pub struct Quote {
    pub symbol: String,

    /// Human-readable instrument description.
    pub description: String,

    /// Exchange code of the listing venue.
    pub exch: String,

    #[serde(rename = "type")]
    /// Security type, e.g. `"stock"`, `"option"`, `"etf"`, `"index"`.
    pub security_type: String,

    /// Last trade price.
    pub last: f64,

    /// Change since the previous close.
    pub change: f64,

    /// Change since the previous close, as a percentage.
    pub change_percentage: f64,

    /// Total volume for the session.
    pub volume: f64,

    /// Average daily volume.
    pub average_volume: f64,

    /// Size of the last trade.
    pub last_volume: f64,

    /// Timestamp of the last trade.
    pub trade_date: u64,

    /// Session open price.
    pub open: f64,

    /// Session high.
    pub high: f64,

    /// Session low.
    pub low: f64,

    /// Session close.
    pub close: f64,

    /// Previous session close.
    pub prevclose: f64,

    /// 52-week high.
    pub week_52_high: f64,

    /// 52-week low.
    pub week_52_low: f64,

    /// Best bid.
    pub bid: f64,

    /// Shares/contracts at the bid.
    pub bidsize: f64,

    /// Exchange code of the bid venue.
    pub bidexch: String,

    /// Timestamp of the bid.
    pub bid_date: u64,

    /// Best ask.
    pub ask: f64,

    /// Shares/contracts at the ask.
    pub asksize: f64,

    /// Exchange code of the ask venue.
    pub askexch: String,

    /// Timestamp of the ask.
    pub ask_date: u64,

    // Option-only fields.
    /// Strike price.
    pub strike: Option<f64>,

    /// Contract size, usually 100.
    pub contract_size: Option<u32>,

    /// Expiration date, `YYYY-MM-DD`.
    pub expiration_date: Option<String>,

    /// Expiration style, e.g. `"standard"` or `"weeklys"`.
    pub expiration_type: Option<String>,

    /// `"call"` or `"put"`.
    pub option_type: Option<String>,

    /// Root symbol of the option series.
    pub root_symbol: Option<String>,

    /// Open contracts outstanding.
    pub open_interest: Option<f64>,

    /// Risk sensitivities; populated when the request asked for greeks.
    pub greeks: Option<Greeks>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
/// Option risk sensitivities and implied volatilities.
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    pub phi: f64,
    pub bid_iv: f64,
    pub mid_iv: f64,
    pub ask_iv: f64,
    pub smv_vol: f64,
    pub updated_at: String,
}

impl Quote {
    /// Fetch quote snapshots for the given symbols.
    ///
    /// Symbols are joined into one comma-separated request; set
    /// `greeks` to have option quotes carry their risk sensitivities.
    pub async fn fetch(
        client: &Client,
        symbols: &[&str],
        greeks: bool,
    ) -> Result<Vec<Quote>, Error> {
        let mut query = vec![("symbols".to_string(), symbols.join(","))];
        if greeks {
            query.push(("greeks".to_string(), "true".to_string()));
        }

        let value = client.send(&markets::QUOTES.bind(), &query, &[]).await?;
        responses::collection(&value, "quotes", "quote")
    }

    /// Midpoint of the current bid/ask, when both are set.
    pub fn mid(&self) -> Option<f64> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some((self.bid + self.ask) / 2.0)
        } else {
            None
        }
    }
}

impl Client {
    /// Get quote snapshots for the given symbols.
    ///
    /// # Example
    /// ---
    /// ```ignore
    /// let quotes = client.get_quotes(&["AAPL", "MSFT"], false).await?;
    /// println!("AAPL last: {}", quotes[0].last);
    /// ```
    pub async fn get_quotes(&self, symbols: &[&str], greeks: bool) -> Result<Vec<Quote>, Error> {
        Quote::fetch(self, symbols, greeks).await
    }

    /// Get a quote snapshot for one symbol.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, Error> {
        let mut quotes = Quote::fetch(self, &[symbol], false).await?;
        quotes.pop().ok_or_else(|| {
            Error::Api(crate::error_codes::ApiErrorContext::from_string_code(
                "SecurityUndefined",
                format!("no quote returned for `{symbol}`"),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equity_quote_decodes_without_option_fields() {
        let value = json!({
            "quotes": {"quote": {
                "symbol": "AAPL",
                "description": "Apple Inc",
                "exch": "Q",
                "type": "stock",
                "last": 150.35,
                "bid": 150.30,
                "ask": 150.40,
                "volume": 12345678
            }}
        });
        let quotes: Vec<Quote> = crate::responses::collection(&value, "quotes", "quote").unwrap();
        assert_eq!(quotes.len(), 1);
        let quote = &quotes[0];
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.last, 150.35);
        assert_eq!(quote.mid(), Some(150.35));
        assert!(quote.greeks.is_none());
        assert!(quote.strike.is_none());
    }

    #[test]
    fn option_quote_carries_greeks() {
        let value = json!({
            "symbol": "AAPL240315C00150000",
            "type": "option",
            "strike": 150.0,
            "option_type": "call",
            "root_symbol": "AAPL",
            "open_interest": 4521,
            "greeks": {
                "delta": 0.52,
                "gamma": 0.04,
                "theta": -0.08,
                "vega": 0.11,
                "rho": 0.03,
                "phi": -0.02,
                "bid_iv": 0.24,
                "mid_iv": 0.25,
                "ask_iv": 0.26,
                "smv_vol": 0.25,
                "updated_at": "2024-03-01 14:30:00"
            }
        });
        let quote: Quote = crate::responses::decode(value).unwrap();
        assert_eq!(quote.strike, Some(150.0));
        let greeks = quote.greeks.unwrap();
        assert_eq!(greeks.delta, 0.52);
        assert_eq!(greeks.mid_iv, 0.25);
    }
}
