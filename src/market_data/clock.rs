use crate::endpoints::markets;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// The current state of the market session.
pub struct MarketClock {
    /// Today's date, `YYYY-MM-DD`.
    pub date: String,

    /// Human-readable state description.
    pub description: String,

    /// Session state: `"premarket"`, `"open"`, `"postmarket"`, `"closed"`.
    pub state: String,

    /// Server timestamp, epoch seconds.
    pub timestamp: u64,

    /// When the state next changes, `HH:MM`.
    pub next_change: String,

    /// The state the market changes to next.
    pub next_state: String,
}

impl MarketClock {
    /// Fetch the current market clock.
    pub async fn fetch(client: &Client) -> Result<MarketClock, Error> {
        let value = client.send(&markets::CLOCK.bind(), &[], &[]).await?;
        responses::single(&value, &["clock"])
    }

    /// Whether the regular session is open.
    pub fn is_open(&self) -> bool {
        self.state == "open"
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One day on the market calendar.
pub struct MarketDay {
    pub date: String,

    /// `"open"` or `"closed"`.
    pub status: String,

    pub description: String,

    /// Pre-market session window, when there is one.
    pub premarket: Option<SessionHours>,

    /// Regular session window, when the market is open.
    pub open: Option<SessionHours>,

    /// Post-market session window, when there is one.
    pub postmarket: Option<SessionHours>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A trading session window.
pub struct SessionHours {
    /// Session start, `HH:MM`.
    pub start: String,
    /// Session end, `HH:MM`.
    pub end: String,
}

impl MarketDay {
    /// Fetch the market calendar for a month. Defaults to the current
    /// month server-side when `month`/`year` are `None`.
    pub async fn fetch_calendar(
        client: &Client,
        month: Option<u8>,
        year: Option<u16>,
    ) -> Result<Vec<MarketDay>, Error> {
        let mut query = Vec::new();
        if let Some(month) = month {
            query.push(("month".to_string(), format!("{month:02}")));
        }
        if let Some(year) = year {
            query.push(("year".to_string(), year.to_string()));
        }

        let value = client.send(&markets::CALENDAR.bind(), &query, &[]).await?;
        let nested = value
            .get("calendar")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        responses::collection(&nested, "days", "day")
    }
}

impl Client {
    /// Get the current market clock.
    pub async fn get_clock(&self) -> Result<MarketClock, Error> {
        MarketClock::fetch(self).await
    }

    /// Get the market calendar for a month.
    pub async fn get_calendar(
        &self,
        month: Option<u8>,
        year: Option<u16>,
    ) -> Result<Vec<MarketDay>, Error> {
        MarketDay::fetch_calendar(self, month, year).await
    }
}
