//! Market data: quotes, the market clock and calendar, bar history,
//! time & sales, option chains, symbol search, and the beta
//! fundamentals suite.

pub mod clock;
pub mod fundamentals;
pub mod history;
pub mod options;
pub mod quote;
pub mod search;
pub mod time_sales;

pub use clock::{MarketClock, MarketDay};
pub use fundamentals::{
    CompanyInfo, CorporateCalendarEvent, CorporateFinancials, DividendInfo, FinancialRatios,
    PriceStatistics,
};
pub use history::HistoricalBar;
pub use options::OptionChain;
pub use quote::{Greeks, Quote};
pub use search::{CompanySearch, SymbolLookup};
pub use time_sales::TimeSale;
