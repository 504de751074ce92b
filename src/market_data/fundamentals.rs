//! The beta fundamentals endpoints.
//!
//! These responses are flatter and less stable than the v1 surface;
//! decoding keeps only the commonly present fields and defaults the
//! rest, matching the endpoints' beta status.

use crate::endpoints::fundamentals;
use crate::responses;
use crate::validation::sanitize_symbol_list;
use crate::{Client, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// Company reference data.
pub struct CompanyInfo {
    pub symbol: String,
    pub company_name: String,
    pub exchange: String,
    pub industry: String,
    pub sector: String,
    pub description: String,
    pub website: String,
    pub employees: u64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// Valuation and profitability ratios.
pub struct FinancialRatios {
    pub symbol: String,
    pub pe_ratio: f64,
    pub peg_ratio: f64,
    pub price_to_book: f64,
    pub price_to_sales: f64,
    pub return_on_equity: f64,
    pub return_on_assets: f64,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// Headline income-statement and balance-sheet figures.
pub struct CorporateFinancials {
    pub symbol: String,
    pub fiscal_year: u16,
    pub period: String,
    pub revenue: f64,
    pub gross_profit: f64,
    pub operating_income: f64,
    pub net_income: f64,
    pub eps: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub shareholder_equity: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// Price statistics over standard windows.
pub struct PriceStatistics {
    pub symbol: String,
    pub week_52_high: f64,
    pub week_52_low: f64,
    pub moving_average_50: f64,
    pub moving_average_200: f64,
    pub beta: f64,
    pub volatility: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One corporate calendar event (earnings, meetings, filings).
pub struct CorporateCalendarEvent {
    pub symbol: String,
    pub begin_date: String,
    pub end_date: String,
    pub event: String,
    pub event_type: u32,
    pub estimated_next_date: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
/// One dividend record.
pub struct DividendInfo {
    pub symbol: String,
    pub ex_date: String,
    pub pay_date: String,
    pub record_date: String,
    pub declared_date: String,
    pub cash_amount: f64,
    pub frequency: u32,
}

macro_rules! fundamentals_fetch {
    ($ty:ty, $endpoint:expr, $fetch_doc:expr) => {
        impl $ty {
            #[doc = $fetch_doc]
            pub async fn fetch(client: &Client, symbols: &[&str]) -> Result<Vec<$ty>, Error> {
                let joined = sanitize_symbol_list(&symbols.join(","));
                let query = vec![("symbols".to_string(), joined)];
                let value = client.send(&$endpoint.bind(), &query, &[]).await?;
                responses::collection(&value, "results", "result")
            }
        }
    };
}

fundamentals_fetch!(CompanyInfo, fundamentals::COMPANY, "Fetch company reference data.");
fundamentals_fetch!(FinancialRatios, fundamentals::RATIOS, "Fetch valuation and profitability ratios.");
fundamentals_fetch!(CorporateFinancials, fundamentals::FINANCIALS, "Fetch headline financials.");
fundamentals_fetch!(PriceStatistics, fundamentals::PRICE_STATS, "Fetch price statistics.");
fundamentals_fetch!(CorporateCalendarEvent, fundamentals::CORPORATE_CALENDAR, "Fetch corporate calendar events.");
fundamentals_fetch!(DividendInfo, fundamentals::DIVIDEND, "Fetch dividend records.");

impl Client {
    /// Get company reference data for the given symbols.
    pub async fn get_company_info(&self, symbols: &[&str]) -> Result<Vec<CompanyInfo>, Error> {
        CompanyInfo::fetch(self, symbols).await
    }

    /// Get valuation and profitability ratios for the given symbols.
    pub async fn get_financial_ratios(&self, symbols: &[&str]) -> Result<Vec<FinancialRatios>, Error> {
        FinancialRatios::fetch(self, symbols).await
    }

    /// Get headline financials for the given symbols.
    pub async fn get_corporate_financials(
        &self,
        symbols: &[&str],
    ) -> Result<Vec<CorporateFinancials>, Error> {
        CorporateFinancials::fetch(self, symbols).await
    }

    /// Get price statistics for the given symbols.
    pub async fn get_price_statistics(&self, symbols: &[&str]) -> Result<Vec<PriceStatistics>, Error> {
        PriceStatistics::fetch(self, symbols).await
    }

    /// Get corporate calendar events for the given symbols.
    pub async fn get_corporate_calendar(
        &self,
        symbols: &[&str],
    ) -> Result<Vec<CorporateCalendarEvent>, Error> {
        CorporateCalendarEvent::fetch(self, symbols).await
    }

    /// Get dividend records for the given symbols.
    pub async fn get_dividends(&self, symbols: &[&str]) -> Result<Vec<DividendInfo>, Error> {
        DividendInfo::fetch(self, symbols).await
    }
}
