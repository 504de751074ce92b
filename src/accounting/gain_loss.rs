use crate::endpoints::accounts;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// A page of realized gain/loss entries.
pub struct GainLoss {
    pub items: Vec<GainLossItem>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One closed round trip.
pub struct GainLossItem {
    /// When the closing trade executed, `YYYY-MM-DD`.
    pub close_date: String,

    /// Total cost of the position.
    pub cost: f64,

    /// Realized gain (positive) or loss (negative).
    pub gain_loss: f64,

    /// Realized gain/loss as a percentage of cost.
    pub gain_loss_percent: f64,

    /// When the opening trade executed, `YYYY-MM-DD`.
    pub open_date: String,

    /// Total proceeds from closing.
    pub proceeds: f64,

    pub quantity: f64,

    pub symbol: String,

    /// Days the position was held.
    pub term: u32,
}

impl GainLossItem {
    /// Whether the round trip qualifies as long-term (held over a year).
    pub fn is_long_term(&self) -> bool {
        self.term > 365
    }
}

impl GainLoss {
    /// Fetch a page of realized gain/loss entries.
    pub async fn fetch(
        client: &Client,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<GainLoss, Error> {
        let bound = accounts::gain_loss(account_id)?;
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }

        let value = client.send(&bound, &query, &[]).await?;
        let items = responses::collection(&value, "gainloss", "closed_position")?;
        Ok(GainLoss { items })
    }

    /// Sum of realized gain/loss across the page.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.gain_loss).sum()
    }
}

impl Client {
    /// Get a page of realized gain/loss entries.
    pub async fn get_gain_loss(
        &self,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<GainLoss, Error> {
        GainLoss::fetch(self, account_id, page, limit).await
    }
}
