use crate::endpoints::markets;
use crate::responses;
use crate::validation::sanitize_search_query;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One company match from the search endpoint.
pub struct CompanySearch {
    pub symbol: String,
    pub company: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub security_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One symbol match from the lookup endpoint.
pub struct SymbolLookup {
    pub symbol: String,
    pub company: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub security_type: String,
}

impl CompanySearch {
    /// Search companies by name fragment.
    ///
    /// The query is sanitized (dangerous characters stripped, whitespace
    /// collapsed, capped at 64 chars) before it leaves the process.
    pub async fn fetch(
        client: &Client,
        query: &str,
        include_indexes: bool,
    ) -> Result<Vec<CompanySearch>, Error> {
        let sanitized = sanitize_search_query(query);

        let mut params = vec![("q".to_string(), sanitized)];
        if include_indexes {
            params.push(("indexes".to_string(), "true".to_string()));
        }

        let value = client.send(&markets::SEARCH.bind(), &params, &[]).await?;
        responses::collection(&value, "securities", "security")
    }
}

impl SymbolLookup {
    /// Look up symbols by prefix, optionally restricted to security
    /// types (`"stock"`, `"option"`, `"etf"`, `"index"`).
    pub async fn fetch(
        client: &Client,
        query: &str,
        types: &[&str],
    ) -> Result<Vec<SymbolLookup>, Error> {
        let sanitized = sanitize_search_query(query);

        let mut params = vec![("q".to_string(), sanitized)];
        if !types.is_empty() {
            params.push(("types".to_string(), types.join(",")));
        }

        let value = client.send(&markets::LOOKUP.bind(), &params, &[]).await?;
        responses::collection(&value, "securities", "security")
    }
}

impl Client {
    /// Search companies by name fragment.
    pub async fn search_companies(
        &self,
        query: &str,
        include_indexes: bool,
    ) -> Result<Vec<CompanySearch>, Error> {
        CompanySearch::fetch(self, query, include_indexes).await
    }

    /// Look up symbols by prefix.
    pub async fn lookup_symbols(
        &self,
        query: &str,
        types: &[&str],
    ) -> Result<Vec<SymbolLookup>, Error> {
        SymbolLookup::fetch(self, query, types).await
    }
}
