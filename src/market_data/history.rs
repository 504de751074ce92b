use crate::endpoints::markets;
use crate::responses;
use crate::validation::validate_symbol;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
/// One aggregated bar of trading activity.
pub struct HistoricalBar {
    /// Bar date, `YYYY-MM-DD`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl HistoricalBar {
    /// Fetch historical bars for a symbol.
    ///
    /// `interval` is one of `"daily"`, `"weekly"`, `"monthly"`;
    /// `start`/`end` are `YYYY-MM-DD` bounds forwarded when given.
    pub async fn fetch(
        client: &Client,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<HistoricalBar>, Error> {
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

        let value = client.send(&markets::HISTORY.bind(), &query, &[]).await?;
        responses::collection(&value, "history", "day")
    }
}

impl Client {
    /// Get historical bars for a symbol.
    pub async fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<HistoricalBar>, Error> {
        HistoricalBar::fetch(self, symbol, interval, start, end).await
    }
}
