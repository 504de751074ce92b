//! Validation of values that get embedded into request paths, plus
//! sanitizers for free-text inputs.
//!
//! Every accepted value is embedded into the URL exactly as given; every
//! rejected value fails before any request is dispatched. The accepted
//! languages are fixed:
//!
//! - account id: `[A-Z0-9]{8,16}`
//! - order id: `[0-9]{8,20}`
//! - session id: `[A-Za-z0-9_-]{16,64}`
//! - symbol: `[A-Z0-9.^-]{1,10}`
//! - option symbol: OCC format `[A-Z]+[0-9]{6}[CP][0-9]{8}`

use crate::Error;

/// Validate a Tradier account id (8-16 uppercase alphanumerics).
pub fn validate_account_id(account_id: &str) -> Result<&str, Error> {
    let ok = (8..=16).contains(&account_id.len())
        && account_id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if ok {
        Ok(account_id)
    } else {
        Err(invalid("account id", account_id))
    }
}

/// Validate an order id (8-20 digits).
pub fn validate_order_id(order_id: &str) -> Result<&str, Error> {
    let ok = (8..=20).contains(&order_id.len()) && order_id.bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(order_id)
    } else {
        Err(invalid("order id", order_id))
    }
}

/// Validate a streaming session id (16-64 chars of `[A-Za-z0-9_-]`).
pub fn validate_session_id(session_id: &str) -> Result<&str, Error> {
    let ok = (16..=64).contains(&session_id.len())
        && session_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if ok {
        Ok(session_id)
    } else {
        Err(invalid("session id", session_id))
    }
}

/// Validate an equity/index symbol (1-10 chars of `[A-Z0-9.^-]`).
pub fn validate_symbol(symbol: &str) -> Result<&str, Error> {
    if is_valid_symbol(symbol) {
        Ok(symbol)
    } else {
        Err(invalid("symbol", symbol))
    }
}

/// Validate an OCC option symbol, e.g. `AAPL240315C00150000`.
pub fn validate_option_symbol(option_symbol: &str) -> Result<&str, Error> {
    if is_valid_option_symbol(option_symbol) {
        Ok(option_symbol)
    } else {
        Err(invalid("option symbol", option_symbol))
    }
}

pub(crate) fn is_valid_symbol(symbol: &str) -> bool {
    (1..=10).contains(&symbol.len())
        && symbol
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'.' || b == b'^' || b == b'-')
}

pub(crate) fn is_valid_option_symbol(option_symbol: &str) -> bool {
    // Root (1+ uppercase letters), YYMMDD, C/P, strike in thousandths.
    let bytes = option_symbol.as_bytes();
    if bytes.len() < 16 {
        return false;
    }
    let strike = &bytes[bytes.len() - 8..];
    if !strike.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let cp = bytes[bytes.len() - 9];
    if cp != b'C' && cp != b'P' {
        return false;
    }
    let date = &bytes[bytes.len() - 15..bytes.len() - 9];
    if !date.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let root = &bytes[..bytes.len() - 15];
    !root.is_empty() && root.iter().all(u8::is_ascii_uppercase)
}

fn invalid(kind: &'static str, value: &str) -> Error {
    Error::InvalidPathSegment {
        kind,
        value: value.to_string(),
    }
}

/// Sanitize a free-text search query: strip quote, backslash, semicolon,
/// pipe, and ampersand characters, collapse whitespace, cap at 64 chars.
pub fn sanitize_search_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '\\' | '|' | '&'))
        .collect();

    let mut collapsed = String::with_capacity(cleaned.len());
    let mut prev_space = false;
    for c in cleaned.chars() {
        if c.is_whitespace() {
            if !prev_space {
                collapsed.push(' ');
                prev_space = true;
            }
        } else {
            collapsed.push(c);
            prev_space = false;
        }
    }

    let trimmed = collapsed.trim();
    trimmed.chars().take(64).collect()
}

/// Keep only the characters legal in a comma-joined symbol list.
pub fn sanitize_symbol_list(symbols: &str) -> String {
    symbols
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ',' | '-' | '_' | '^'))
        .collect()
}

/// Keep only the characters legal in a numeric string.
pub fn sanitize_numeric(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect()
}
