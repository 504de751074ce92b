use crate::endpoints::markets::options;
use crate::market_data::quote::Quote;
use crate::responses;
use crate::validation::validate_symbol;
use crate::{Client, Error};

/// The full option chain for one underlying and expiration.
///
/// Chain entries share the quote shape; the option-only fields (strike,
/// greeks, open interest) are populated.
#[derive(Clone, Debug, Default)]
pub struct OptionChain {
    pub underlying: String,
    pub expiration: String,
    pub options: Vec<Quote>,
}

impl OptionChain {
    /// Fetch the chain for an underlying and expiration date.
    pub async fn fetch(
        client: &Client,
        symbol: &str,
        expiration: &str,
        greeks: bool,
    ) -> Result<OptionChain, Error> {
        let symbol = validate_symbol(symbol)?;

        let mut query = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("expiration".to_string(), expiration.to_string()),
        ];
        if greeks {
            query.push(("greeks".to_string(), "true".to_string()));
        }

        let value = client.send(&options::CHAINS.bind(), &query, &[]).await?;
        let chain = responses::collection(&value, "options", "option")?;

        Ok(OptionChain {
            underlying: symbol.to_string(),
            expiration: expiration.to_string(),
            options: chain,
        })
    }

    /// The calls in the chain, sorted by strike.
    pub fn calls(&self) -> Vec<&Quote> {
        self.filtered("call")
    }

    /// The puts in the chain, sorted by strike.
    pub fn puts(&self) -> Vec<&Quote> {
        self.filtered("put")
    }

    fn filtered(&self, option_type: &str) -> Vec<&Quote> {
        let mut side: Vec<&Quote> = self
            .options
            .iter()
            .filter(|quote| quote.option_type.as_deref() == Some(option_type))
            .collect();
        side.sort_by(|a, b| {
            a.strike
                .unwrap_or(0.0)
                .partial_cmp(&b.strike.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        side
    }
}

impl Client {
    /// Get the option chain for an underlying and expiration.
    pub async fn get_option_chain(
        &self,
        symbol: &str,
        expiration: &str,
        greeks: bool,
    ) -> Result<OptionChain, Error> {
        OptionChain::fetch(self, symbol, expiration, greeks).await
    }

    /// Get the expiration dates available for an underlying.
    pub async fn get_option_expirations(
        &self,
        symbol: &str,
        include_all_roots: bool,
    ) -> Result<Vec<String>, Error> {
        let symbol = validate_symbol(symbol)?;

        let mut query = vec![("symbol".to_string(), symbol.to_string())];
        if include_all_roots {
            query.push(("includeAllRoots".to_string(), "true".to_string()));
        }

        let value = self.send(&options::EXPIRATIONS.bind(), &query, &[]).await?;
        responses::collection(&value, "expirations", "date")
    }

    /// Get the strikes available for an underlying and expiration.
    pub async fn get_option_strikes(
        &self,
        symbol: &str,
        expiration: &str,
    ) -> Result<Vec<f64>, Error> {
        let symbol = validate_symbol(symbol)?;

        let query = vec![
            ("symbol".to_string(), symbol.to_string()),
            ("expiration".to_string(), expiration.to_string()),
        ];

        let value = self.send(&options::STRIKES.bind(), &query, &[]).await?;
        responses::collection(&value, "strikes", "strike")
    }
}
