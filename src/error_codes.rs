//! Broker-defined error codes and the static taxonomy behind them.
//!
//! Tradier rejects orders with a PascalCase reason code in the response
//! body. The table here maps every known code to its category, severity,
//! retry behavior, default retry delay, recovery suggestions, and contact
//! info, so callers can build retry policy without string matching.
//! Unknown codes map to [`TradierErrorCode::Unknown`], which is retryable
//! with a 2-second delay.

use std::time::Duration;

const SUPPORT_PHONE: &str = "980-272-3880";

/// Closed enumeration of error codes the broker is known to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TradierErrorCode {
    // Account
    AccountDisabled,
    AccountIsNotApproved,
    AccountMarginRuleViolation,
    AssetTradingNotConfiguredForAccount,
    DayTraderPatternRestriction,
    DayTradingBuyingPowerExceeded,
    LongOptionTradingDeniedForAccount,
    ShortOptionTradingDeniedForAccount,
    ShortStockTradingDeniedForAccount,
    SpreadTradingDeniedForAccount,
    TradingDeniedForAccount,
    TradingDeniedForSecurity,
    UserDisabled,
    TooSmallEquityForDayTrading,

    // Order price & validation
    BuyStopOrderStopPriceLessAsk,
    SellStopOrderStopPriceGreaterBid,
    IncorrectOrderQuantity,
    IncorrectTimeInForce,
    LimitPriceUndefined,
    StopPriceUndefined,
    OrderQuantity,
    OrderPriceIsInvalid,
    QuotePriceIsInvalid,

    // Position & trading
    LongPositionCrossZero,
    ShortPositionCrossZero,
    UnexpectedBuyOrder,
    UnexpectedBuyOrderOption,
    UnexpectedBuyToCoverOrder,
    UnexpectedBuyToCoverOrderOption,
    UnexpectedSellOrder,
    UnexpectedSellOrderOption,
    UnexpectedSellShortOrder,
    UnexpectedSellShortOrderOption,
    WashTradeAttempt,

    // Margin & buying power
    InitialMargin,
    MaintenanceMargin,
    TotalInitialMargin,

    // Order type specific
    MarketOrderIsGtc,
    ShortOrderIsGtc,
    SellShortOrderLastPriceBelow5,

    // Options
    ExpirationDateUndefined,
    InvalidOrderExpiration,
    OptionTypeUndefined,
    StrikePriceUndefined,
    OptionLevelRestriction,
    IndexOptionsOneExpiryDate,
    TradeNonStandardOptions,

    // Complex orders
    ContingentOrderExecution,
    OrderContingentChangeNotAllowed,
    OcoExpirationTypeNotTheSame,
    OcoOrderWithOppositeLegs,
    OcoPriceDifferenceIsLessThanDelta,
    OrderWithDifferentSide,
    OtoFirstLegIsMarketNotAllowed,
    OtoOcoMarketNotAllowed,
    OtoOcoTrailingNotAllowed,

    // System & service
    OmsInternalError,
    OmsUnavailable,
    SecurityUndefined,
    OrderIsNotAllowedForAccount,

    // Market hours & session
    PreMarketTradingUnavailable,
    OtcTradingRestricted,
    VolatilityLimitOrderRequired,
    MarketHoursLimitOrderRequired,
    OrderFailedPriceRangeAggressive,

    /// Any code the library does not recognize.
    Unknown,
}

/// Coarse grouping of error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Account,
    Trading,
    Validation,
    System,
    MarketData,
    Position,
    Margin,
    Options,
    ComplexOrders,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Trading => "Trading",
            Self::Validation => "Validation",
            Self::System => "System",
            Self::MarketData => "MarketData",
            Self::Position => "Position",
            Self::Margin => "Margin",
            Self::Options => "Options",
            Self::ComplexOrders => "ComplexOrders",
        }
    }
}

/// How bad the condition is for the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
        }
    }
}

/// The retry posture the taxonomy advertises for a code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryBehavior {
    NoRetry,
    RetryWithDelay,
    RetryWithBackoff,
    RetryAfterRateLimit,
    RetryAfterMarketOpen,
}

impl RetryBehavior {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoRetry => "NoRetry",
            Self::RetryWithDelay => "RetryWithDelay",
            Self::RetryWithBackoff => "RetryWithBackoff",
            Self::RetryAfterRateLimit => "RetryAfterRateLimit",
            Self::RetryAfterMarketOpen => "RetryAfterMarketOpen",
        }
    }
}

/// Everything the taxonomy knows about one code.
#[derive(Clone, Copy, Debug)]
pub struct ErrorCodeInfo {
    pub code: TradierErrorCode,
    pub string_code: &'static str,
    pub description: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub retry_behavior: RetryBehavior,
    pub retry_delay: Duration,
    pub recovery_suggestions: &'static [&'static str],
    pub contact_info: &'static str,
    pub retryable: bool,
}

const fn info(
    code: TradierErrorCode,
    string_code: &'static str,
    description: &'static str,
    category: ErrorCategory,
    severity: ErrorSeverity,
    retry_behavior: RetryBehavior,
    retry_delay_ms: u64,
    recovery_suggestions: &'static [&'static str],
    contact_info: &'static str,
    retryable: bool,
) -> ErrorCodeInfo {
    ErrorCodeInfo {
        code,
        string_code,
        description,
        category,
        severity,
        retry_behavior,
        retry_delay: Duration::from_millis(retry_delay_ms),
        recovery_suggestions,
        contact_info,
        retryable,
    }
}

impl TradierErrorCode {
    /// Parse the broker's reason string. Unknown strings become
    /// [`TradierErrorCode::Unknown`] rather than failing.
    pub fn from_str(code: &str) -> Self {
        ALL_CODES
            .iter()
            .find(|info| info.string_code == code)
            .map(|info| info.code)
            .unwrap_or(Self::Unknown)
    }

    /// Canonical reason string for this code.
    pub fn as_str(self) -> &'static str {
        self.info().string_code
    }

    /// Whether the taxonomy marks the code retryable.
    pub fn is_retryable(self) -> bool {
        self.info().retryable
    }

    /// The default delay before a retry should be attempted.
    pub fn retry_delay(self) -> Duration {
        self.info().retry_delay
    }

    /// Taxonomy entry for this code.
    pub fn info(self) -> &'static ErrorCodeInfo {
        ALL_CODES
            .iter()
            .find(|info| info.code == self)
            .unwrap_or(&UNKNOWN_INFO)
    }

    /// All codes in a category.
    pub fn codes_in_category(category: ErrorCategory) -> Vec<TradierErrorCode> {
        ALL_CODES
            .iter()
            .filter(|info| info.category == category)
            .map(|info| info.code)
            .collect()
    }

    /// All codes the taxonomy marks retryable.
    pub fn retryable_codes() -> Vec<TradierErrorCode> {
        ALL_CODES
            .iter()
            .filter(|info| info.retryable)
            .map(|info| info.code)
            .collect()
    }
}

const UNKNOWN_INFO: ErrorCodeInfo = info(
    TradierErrorCode::Unknown,
    "Unknown",
    "An unknown error occurred",
    ErrorCategory::System,
    ErrorSeverity::Error,
    RetryBehavior::RetryWithDelay,
    2_000,
    &["Retry operation", "Check request parameters", "Contact support if the error persists"],
    SUPPORT_PHONE,
    true,
);

static ALL_CODES: &[ErrorCodeInfo] = &[
    // ----- Account -----
    info(
        TradierErrorCode::AccountDisabled,
        "AccountDisabled",
        "Account is disabled for trading",
        ErrorCategory::Account,
        ErrorSeverity::Critical,
        RetryBehavior::NoRetry,
        0,
        &["Contact support", "Verify account status", "Check account permissions"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::AccountIsNotApproved,
        "AccountIsNotApproved",
        "Account is not approved for trading",
        ErrorCategory::Account,
        ErrorSeverity::Critical,
        RetryBehavior::NoRetry,
        0,
        &["Contact support", "Complete the account approval process", "Submit required documentation"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::AccountMarginRuleViolation,
        "AccountMarginRuleViolation",
        "The order violates a margin rule on this account",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce order size", "Review margin requirements", "Close existing positions"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::AssetTradingNotConfiguredForAccount,
        "AssetTradingNotConfiguredForAccount",
        "This asset class is not configured for the account",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Request access to this asset class", "Verify account configuration"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::DayTraderPatternRestriction,
        "DayTraderPatternRestriction",
        "Pattern day trader restriction is in effect for this account",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Wait for the restriction to lift", "Maintain the minimum required equity"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::DayTradingBuyingPowerExceeded,
        "DayTradingBuyingPowerExceeded",
        "There is not enough day trading buying power for the requested order",
        ErrorCategory::Margin,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce order size", "Close existing positions", "Add funds to the account", "Wait for settlements"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::LongOptionTradingDeniedForAccount,
        "LongOptionTradingDeniedForAccount",
        "Long option trading is denied for this account",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Apply for the required option level"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::ShortOptionTradingDeniedForAccount,
        "ShortOptionTradingDeniedForAccount",
        "Short option trading is denied for this account",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Apply for the required option level"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::ShortStockTradingDeniedForAccount,
        "ShortStockTradingDeniedForAccount",
        "Short stock trading is denied for this account",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Apply for short selling access", "Use a margin account"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::SpreadTradingDeniedForAccount,
        "SpreadTradingDeniedForAccount",
        "Spread trading is denied for this account",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Apply for the required option level"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::TradingDeniedForAccount,
        "TradingDeniedForAccount",
        "Trading is denied for this account",
        ErrorCategory::Account,
        ErrorSeverity::Critical,
        RetryBehavior::NoRetry,
        0,
        &["Contact support", "Verify account status"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::TradingDeniedForSecurity,
        "TradingDeniedForSecurity",
        "Trading is denied for this security",
        ErrorCategory::Trading,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Choose a different security", "Check for trading halts or restrictions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UserDisabled,
        "UserDisabled",
        "The user is disabled",
        ErrorCategory::Account,
        ErrorSeverity::Critical,
        RetryBehavior::NoRetry,
        0,
        &["Contact support"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::TooSmallEquityForDayTrading,
        "TooSmallEquityForDayTrading",
        "Account equity is below the day trading minimum",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Deposit funds to meet the minimum equity requirement", "Avoid day trades until funded"],
        SUPPORT_PHONE,
        false,
    ),
    // ----- Order price & validation -----
    info(
        TradierErrorCode::BuyStopOrderStopPriceLessAsk,
        "BuyStopOrderStopPriceLessAsk",
        "Buy stop order must have a stop price greater than the current ask",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Set the stop price above the current ask", "Use a limit order instead", "Check the current market price"],
        "",
        true,
    ),
    info(
        TradierErrorCode::SellStopOrderStopPriceGreaterBid,
        "SellStopOrderStopPriceGreaterBid",
        "Sell stop order must have a stop price less than the current bid",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Set the stop price below the current bid", "Use a limit order instead", "Check the current market price"],
        "",
        true,
    ),
    info(
        TradierErrorCode::IncorrectOrderQuantity,
        "IncorrectOrderQuantity",
        "The order quantity is incorrect",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Check quantity limits for the security", "Use a positive whole quantity"],
        "",
        false,
    ),
    info(
        TradierErrorCode::IncorrectTimeInForce,
        "IncorrectTimeInForce",
        "The order duration is not valid for this order",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use `day` or `gtc`", "Check duration rules for the order type"],
        "",
        false,
    ),
    info(
        TradierErrorCode::LimitPriceUndefined,
        "LimitPriceUndefined",
        "A limit order requires a limit price",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Provide a limit price", "Or use a market order"],
        "",
        false,
    ),
    info(
        TradierErrorCode::StopPriceUndefined,
        "StopPriceUndefined",
        "A stop order requires a stop price",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Provide a stop price", "Or use a different order type"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OrderQuantity,
        "OrderQuantity",
        "The order quantity is not allowed",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce the order quantity"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OrderPriceIsInvalid,
        "OrderPriceIsInvalid",
        "The order price is invalid",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Check the price increment rules", "Verify the price is positive"],
        "",
        false,
    ),
    info(
        TradierErrorCode::QuotePriceIsInvalid,
        "QuotePriceIsInvalid",
        "No valid quote price is available for the security",
        ErrorCategory::MarketData,
        ErrorSeverity::Error,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Retry shortly", "Verify the symbol is actively quoted"],
        "",
        true,
    ),
    // ----- Position & trading -----
    info(
        TradierErrorCode::LongPositionCrossZero,
        "LongPositionCrossZero",
        "The order would take a long position across zero",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Split the order into close and open legs"],
        "",
        false,
    ),
    info(
        TradierErrorCode::ShortPositionCrossZero,
        "ShortPositionCrossZero",
        "The order would take a short position across zero",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Split the order into close and open legs"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedBuyOrder,
        "UnexpectedBuyOrder",
        "A buy order is unexpected for the current position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use buy_to_cover to close a short position", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedBuyOrderOption,
        "UnexpectedBuyOrderOption",
        "A buy order is unexpected for the current option position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use buy_to_close to close a short option", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedBuyToCoverOrder,
        "UnexpectedBuyToCoverOrder",
        "A buy-to-cover order is unexpected without a short position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use a plain buy order", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedBuyToCoverOrderOption,
        "UnexpectedBuyToCoverOrderOption",
        "A buy-to-close order is unexpected without a short option position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use buy_to_open", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedSellOrder,
        "UnexpectedSellOrder",
        "A sell order is unexpected without a long position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use sell_short to open a short position", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedSellOrderOption,
        "UnexpectedSellOrderOption",
        "A sell order is unexpected without a long option position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use sell_to_open", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedSellShortOrder,
        "UnexpectedSellShortOrder",
        "A sell-short order is unexpected while holding a long position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Sell the long position first", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::UnexpectedSellShortOrderOption,
        "UnexpectedSellShortOrderOption",
        "A sell-short order is unexpected for the current option position",
        ErrorCategory::Position,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use sell_to_close", "Check current positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::WashTradeAttempt,
        "WashTradeAttempt",
        "The order would constitute a wash trade",
        ErrorCategory::Trading,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Cancel the opposing open order first"],
        "",
        false,
    ),
    // ----- Margin -----
    info(
        TradierErrorCode::InitialMargin,
        "InitialMargin",
        "You do not have enough buying power for this trade",
        ErrorCategory::Margin,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce order size", "Add funds to the account", "Close existing positions"],
        "",
        false,
    ),
    info(
        TradierErrorCode::MaintenanceMargin,
        "MaintenanceMargin",
        "The order would violate maintenance margin requirements",
        ErrorCategory::Margin,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce order size", "Add funds to the account"],
        "",
        false,
    ),
    info(
        TradierErrorCode::TotalInitialMargin,
        "TotalInitialMargin",
        "Total initial margin requirements are not met",
        ErrorCategory::Margin,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Reduce order size", "Add funds to the account"],
        "",
        false,
    ),
    // ----- Order type specific -----
    info(
        TradierErrorCode::MarketOrderIsGtc,
        "MarketOrderIsGtc",
        "Market orders cannot be good-till-cancel",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use `day` duration for market orders"],
        "",
        false,
    ),
    info(
        TradierErrorCode::ShortOrderIsGtc,
        "ShortOrderIsGtc",
        "Short orders cannot be good-till-cancel",
        ErrorCategory::Validation,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use `day` duration for short orders"],
        "",
        false,
    ),
    info(
        TradierErrorCode::SellShortOrderLastPriceBelow5,
        "SellShortOrderLastPriceBelow5",
        "Short sales are not accepted for securities trading below $5",
        ErrorCategory::Trading,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Choose a security trading above $5"],
        "",
        false,
    ),
    // ----- Options -----
    info(
        TradierErrorCode::ExpirationDateUndefined,
        "ExpirationDateUndefined",
        "The option expiration date is missing",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Provide an expiration date", "Verify the OCC symbol"],
        "",
        false,
    ),
    info(
        TradierErrorCode::InvalidOrderExpiration,
        "InvalidOrderExpiration",
        "The order expiration is invalid",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use a valid expiration for this contract"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OptionTypeUndefined,
        "OptionTypeUndefined",
        "The option type (call/put) is missing",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Verify the OCC symbol carries a C or P flag"],
        "",
        false,
    ),
    info(
        TradierErrorCode::StrikePriceUndefined,
        "StrikePriceUndefined",
        "The option strike price is missing",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Verify the OCC symbol carries a strike"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OptionLevelRestriction,
        "OptionLevelRestriction",
        "The account's option level does not permit this strategy",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Apply for a higher option level", "Use a permitted strategy"],
        SUPPORT_PHONE,
        false,
    ),
    info(
        TradierErrorCode::IndexOptionsOneExpiryDate,
        "IndexOptionsOneExpiryDate",
        "Index option spreads must share a single expiration date",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Align all legs on one expiration"],
        "",
        false,
    ),
    info(
        TradierErrorCode::TradeNonStandardOptions,
        "TradeNonStandardOptions",
        "Non-standard option contracts cannot be traded",
        ErrorCategory::Options,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Choose a standard contract"],
        "",
        false,
    ),
    // ----- Complex orders -----
    info(
        TradierErrorCode::ContingentOrderExecution,
        "ContingentOrderExecution",
        "The contingent order could not be executed",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Retry the order", "Check the state of the primary order"],
        "",
        true,
    ),
    info(
        TradierErrorCode::OrderContingentChangeNotAllowed,
        "OrderContingentChangeNotAllowed",
        "A contingent order cannot be modified in its current state",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Cancel and re-place the order group"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OcoExpirationTypeNotTheSame,
        "OcoExpirationTypeNotTheSame",
        "Both legs of an OCO order must share the same duration",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Set both legs to the same duration"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OcoOrderWithOppositeLegs,
        "OcoOrderWithOppositeLegs",
        "OCO legs must be on the same side of the market",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Give both legs the same side"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OcoPriceDifferenceIsLessThanDelta,
        "OcoPriceDifferenceIsLessThanDelta",
        "OCO leg prices are too close together",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Widen the distance between the leg prices"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OrderWithDifferentSide,
        "OrderWithDifferentSide",
        "Grouped orders must not mix sides",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Align the sides of the grouped orders"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OtoFirstLegIsMarketNotAllowed,
        "OtoFirstLesIsMarketNotAllowed",
        "The first leg of an OTO order cannot be a market order",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use a limit or stop order for the first leg"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OtoOcoMarketNotAllowed,
        "OtoOcoMarketNotAllowed",
        "Market orders are not allowed inside OTO/OCO groups",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use limit or stop orders inside the group"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OtoOcoTrailingNotAllowed,
        "OtoOcoTrailingNotAllowed",
        "Trailing stops are not allowed inside OTO/OCO groups",
        ErrorCategory::ComplexOrders,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Use plain stop orders inside the group"],
        "",
        false,
    ),
    // ----- System & service -----
    info(
        TradierErrorCode::OmsInternalError,
        "OmsInternalError",
        "Your order could not be processed",
        ErrorCategory::System,
        ErrorSeverity::Critical,
        RetryBehavior::RetryWithBackoff,
        5_000,
        &["Retry the order", "Contact support", "Check system status"],
        SUPPORT_PHONE,
        true,
    ),
    info(
        TradierErrorCode::OmsUnavailable,
        "OmsUnavailable",
        "The order management system is unavailable",
        ErrorCategory::System,
        ErrorSeverity::Critical,
        RetryBehavior::RetryWithBackoff,
        5_000,
        &["Retry with backoff", "Check system status"],
        SUPPORT_PHONE,
        true,
    ),
    info(
        TradierErrorCode::SecurityUndefined,
        "SecurityUndefined",
        "The security is not recognized",
        ErrorCategory::MarketData,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Verify the symbol", "Use the symbol lookup endpoint"],
        "",
        false,
    ),
    info(
        TradierErrorCode::OrderIsNotAllowedForAccount,
        "OrderIsNotAllowedForAccount",
        "This order is not allowed for the account",
        ErrorCategory::Account,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Check account permissions", "Contact support"],
        SUPPORT_PHONE,
        false,
    ),
    // ----- Market hours & session -----
    info(
        TradierErrorCode::PreMarketTradingUnavailable,
        "PreMarketTradingUnavailable",
        "Pre-market trading is unavailable for this security",
        ErrorCategory::Trading,
        ErrorSeverity::Warning,
        RetryBehavior::RetryAfterMarketOpen,
        0,
        &["Submit the order during regular hours", "Use `day` duration"],
        "",
        true,
    ),
    info(
        TradierErrorCode::OtcTradingRestricted,
        "OtcTradingRestricted",
        "OTC trading is restricted for this security",
        ErrorCategory::Trading,
        ErrorSeverity::Error,
        RetryBehavior::NoRetry,
        0,
        &["Choose a listed security"],
        "",
        false,
    ),
    info(
        TradierErrorCode::VolatilityLimitOrderRequired,
        "VolatilityLimitOrderRequired",
        "A limit order is required while volatility controls are active",
        ErrorCategory::Trading,
        ErrorSeverity::Warning,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Resubmit as a limit order"],
        "",
        true,
    ),
    info(
        TradierErrorCode::MarketHoursLimitOrderRequired,
        "MarketHoursLimitOrderRequired",
        "A limit order is required outside regular market hours",
        ErrorCategory::Trading,
        ErrorSeverity::Warning,
        RetryBehavior::RetryAfterMarketOpen,
        0,
        &["Resubmit as a limit order", "Or wait for market open"],
        "",
        true,
    ),
    info(
        TradierErrorCode::OrderFailedPriceRangeAggressive,
        "OrderFailedPriceRangeAggressive",
        "The order price is too aggressive relative to the current range",
        ErrorCategory::Trading,
        ErrorSeverity::Error,
        RetryBehavior::RetryWithDelay,
        1_000,
        &["Move the price closer to the market", "Check the current quote"],
        "",
        true,
    ),
    UNKNOWN_INFO,
];

/// A broker-reported error plus everything needed to present and act on
/// it: the taxonomy entry, the raw server message, and the ids involved.
#[derive(Clone, Debug)]
pub struct ApiErrorContext {
    pub code: TradierErrorCode,
    pub server_message: String,
    pub order_id: Option<String>,
    pub account_id: Option<String>,
}

impl ApiErrorContext {
    pub fn new(code: TradierErrorCode, server_message: impl Into<String>) -> Self {
        Self {
            code,
            server_message: server_message.into(),
            order_id: None,
            account_id: None,
        }
    }

    /// Build from the broker's reason string; unknown strings map to
    /// [`TradierErrorCode::Unknown`].
    pub fn from_string_code(code: &str, server_message: impl Into<String>) -> Self {
        Self::new(TradierErrorCode::from_str(code), server_message)
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Taxonomy entry for the underlying code.
    pub fn info(&self) -> &'static ErrorCodeInfo {
        self.code.info()
    }

    /// One-line user-facing message.
    pub fn short_message(&self) -> String {
        let info = self.info();
        if self.server_message.is_empty() {
            info.description.to_string()
        } else {
            format!("{}: {}", info.string_code, self.server_message)
        }
    }

    /// Multi-line report with server message, ids, category, severity.
    pub fn detailed_message(&self) -> String {
        let info = self.info();
        let mut msg = info.description.to_string();

        if !self.server_message.is_empty() {
            msg.push_str("\nServer Message: ");
            msg.push_str(&self.server_message);
        }
        if let Some(order_id) = &self.order_id {
            msg.push_str("\nOrder ID: ");
            msg.push_str(order_id);
        }
        if let Some(account_id) = &self.account_id {
            msg.push_str("\nAccount ID: ");
            msg.push_str(account_id);
        }
        msg.push_str("\nError Code: ");
        msg.push_str(info.string_code);
        msg.push_str("\nCategory: ");
        msg.push_str(info.category.as_str());
        msg.push_str("\nSeverity: ");
        msg.push_str(info.severity.as_str());

        msg
    }

    /// Enumerated recovery steps plus contact info when available.
    pub fn recovery_guidance(&self) -> String {
        let info = self.info();
        let mut guidance = String::from("Recovery Suggestions:\n");

        for (i, suggestion) in info.recovery_suggestions.iter().enumerate() {
            guidance.push_str(&format!("{}. {suggestion}\n", i + 1));
        }
        if !info.contact_info.is_empty() {
            guidance.push_str("\nFor additional assistance, contact: ");
            guidance.push_str(info.contact_info);
        }

        guidance
    }
}
