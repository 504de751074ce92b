use crate::endpoints::accounts;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// The real-time balances of an account.
///
/// Every numeric field defaults to zero when the server omits it or
/// sends null, so cash-only and margin accounts both decode cleanly.
pub struct AccountBalances {
    /// The account these balances belong to.
    pub account_number: String,

    /// Account type, e.g. `"margin"` or `"cash"`.
    pub account_type: String,

    /// Total account equity.
    pub total_equity: f64,

    /// Market value of all long positions.
    pub long_market_value: f64,

    /// Market value of all short positions.
    pub short_market_value: f64,

    /// Total account value.
    pub account_value: f64,

    /// Realized profit/loss from closed positions today.
    pub close_pl: f64,

    /// Current margin requirement.
    pub current_requirement: f64,

    pub equity: f64,

    pub long_liquid_value: f64,

    pub short_liquid_value: f64,

    /// Funds deposited but not yet cleared.
    pub uncleared_funds: f64,

    /// Number of orders working against the account.
    pub pending_orders_count: u32,

    /// Market value of short option positions.
    pub option_short_value: f64,

    pub total_cash: f64,

    /// Proceeds not yet settled.
    pub unsettled_funds: f64,

    /// Dividend balance.
    pub dividend: f64,

    pub cash: f64,

    pub market_value: f64,
}

impl AccountBalances {
    /// Fetch the current balances of an account.
    pub async fn fetch(client: &Client, account_id: &str) -> Result<AccountBalances, Error> {
        let bound = accounts::balances(account_id)?;
        let value = client.send(&bound, &[], &[]).await?;
        responses::single(&value, &["balances"])
    }
}

impl Client {
    /// Get the current balances of an account.
    ///
    /// # Example
    /// ---
    /// Check how much buying power is left before sizing an order.
    /// ```ignore
    /// let balances = client.get_balances("YOUR_ACCOUNT_ID").await?;
    /// println!(
    ///     "equity: {}, cash: {}",
    ///     balances.total_equity, balances.total_cash
    /// );
    /// ```
    pub async fn get_balances(&self, account_id: &str) -> Result<AccountBalances, Error> {
        AccountBalances::fetch(self, account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_numerics_default_to_zero() {
        let value = serde_json::json!({
            "balances": {
                "account_number": "VA12345678",
                "total_equity": 25000.50,
                "total_cash": null
            }
        });
        let balances: AccountBalances = crate::responses::single(&value, &["balances"]).unwrap();
        assert_eq!(balances.account_number, "VA12345678");
        assert_eq!(balances.total_equity, 25000.50);
        assert_eq!(balances.total_cash, 0.0);
        assert_eq!(balances.pending_orders_count, 0);
    }
}
