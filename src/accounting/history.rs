use crate::endpoints::accounts;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A page of account activity.
pub struct AccountHistory {
    pub events: Vec<HistoryEvent>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One account activity event: a trade, dividend, wire, fee, etc.
pub struct HistoryEvent {
    /// Signed cash impact of the event.
    pub amount: f64,

    pub date: String,

    #[serde(rename = "type")]
    /// Event kind, e.g. `"trade"`, `"dividend"`, `"ach"`.
    pub event_type: String,

    /// Trade detail, present when `event_type` is `"trade"`.
    pub trade: Option<TradeDetail>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// Fill detail attached to trade events.
pub struct TradeDetail {
    pub commission: f64,
    pub description: String,
    pub price: f64,
    pub quantity: f64,
    pub symbol: String,
    pub trade_type: String,
}

impl AccountHistory {
    /// Fetch a page of account activity. `page` and `limit` are
    /// forwarded verbatim when given.
    pub async fn fetch(
        client: &Client,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<AccountHistory, Error> {
        let bound = accounts::history(account_id)?;
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }

        let value = client.send(&bound, &query, &[]).await?;
        let events = responses::collection(&value, "history", "event")?;
        Ok(AccountHistory { events })
    }
}

impl Client {
    /// Get a page of account activity.
    pub async fn get_account_history(
        &self,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<AccountHistory, Error> {
        AccountHistory::fetch(self, account_id, page, limit).await
    }
}
