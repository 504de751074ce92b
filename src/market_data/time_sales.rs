use crate::endpoints::markets;
use crate::responses;
use crate::validation::validate_symbol;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One time & sales tick or intraday aggregate.
pub struct TimeSale {
    /// Tick timestamp, ISO-8601.
    pub time: String,

    /// Tick timestamp, epoch seconds.
    pub timestamp: u64,

    pub price: f64,

    pub open: f64,

    pub high: f64,

    pub low: f64,

    pub close: f64,

    pub volume: f64,

    /// Volume-weighted average price for the interval.
    pub vwap: f64,
}

impl TimeSale {
    /// Fetch time & sales for a symbol.
    ///
    /// `interval` is one of `"tick"`, `"1min"`, `"5min"`, `"15min"`.
    pub async fn fetch(
        client: &Client,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<TimeSale>, Error> {
        let symbol = validate_symbol(symbol)?;

        let mut query = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("interval".to_string(), interval.to_string()),
        ];
        if let Some(start) = start {
            query.push(("start".to_string(), start.to_string()));
        }
        if let Some(end) = end {
            query.push(("end".to_string(), end.to_string()));
        }

        let value = client.send(&markets::TIME_SALES.bind(), &query, &[]).await?;
        responses::collection(&value, "series", "data")
    }
}

impl Client {
    /// Get time & sales for a symbol.
    pub async fn get_time_sales(
        &self,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<TimeSale>, Error> {
        TimeSale::fetch(self, symbol, interval, start, end).await
    }
}
