use crate::endpoints::accounts;
use crate::responses;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One open position in an account.
pub struct Position {
    /// Position identifier assigned by the broker.
    pub id: u64,

    /// The symbol held. OCC format for option positions.
    pub symbol: String,

    /// Signed quantity; negative for short positions.
    pub quantity: f64,

    /// Total cost of the position.
    pub cost_basis: f64,

    /// When the position was opened.
    pub date_acquired: String,
}

impl Position {
    /// Fetch every open position in an account.
    pub async fn fetch_all(client: &Client, account_id: &str) -> Result<Vec<Position>, Error> {
        let bound = accounts::positions(account_id)?;
        let value = client.send(&bound, &[], &[]).await?;
        responses::collection(&value, "positions", "position")
    }

    /// Whether this is a long position.
    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    /// Whether this is a short position.
    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    /// Average cost per unit.
    pub fn average_cost(&self) -> f64 {
        if self.quantity == 0.0 {
            0.0
        } else {
            self.cost_basis / self.quantity.abs()
        }
    }

    /// Unrealized profit/loss at `current_price`.
    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        current_price * self.quantity - self.cost_basis
    }
}

impl Client {
    /// Get every open position in an account.
    pub async fn get_positions(&self, account_id: &str) -> Result<Vec<Position>, Error> {
        Position::fetch_all(self, account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_math() {
        let position = Position {
            id: 1,
            symbol: "AAPL".into(),
            quantity: 100.0,
            cost_basis: 15000.0,
            date_acquired: String::new(),
        };
        assert!(position.is_long());
        assert_eq!(position.average_cost(), 150.0);
        assert_eq!(position.unrealized_pnl(155.0), 500.0);

        let short = Position {
            quantity: -100.0,
            cost_basis: -15000.0,
            ..position
        };
        assert!(short.is_short());
        assert_eq!(short.unrealized_pnl(140.0), 1000.0);
    }
}
