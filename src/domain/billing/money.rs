//! Money value object.
//!
//! Amounts are held as integer minor units (paise, cents). Gateways take
//! minor units; people and invoices see major units with two decimals.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// An amount in a specific currency, stored in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor_units: i64,
    currency: String,
}

impl Money {
    /// Creates a positive amount from minor units.
    pub fn from_minor(minor_units: i64, currency: &str) -> Result<Self, ValidationError> {
        if minor_units <= 0 {
            return Err(ValidationError::out_of_range("amount", 1, i64::MAX, minor_units));
        }
        Ok(Self {
            minor_units,
            currency: normalize_currency(currency)?,
        })
    }

    /// Creates a positive amount from a major-unit decimal such as `999.5`.
    ///
    /// At most two decimal places are accepted.
    pub fn from_major(amount: f64, currency: &str) -> Result<Self, ValidationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::invalid_format(
                "amount",
                "must be a positive number",
            ));
        }
        let scaled = amount * 100.0;
        let minor = scaled.round();
        if (scaled - minor).abs() > 1e-6 || minor > i64::MAX as f64 {
            return Err(ValidationError::invalid_format(
                "amount",
                "must have at most two decimal places",
            ));
        }
        Self::from_minor(minor as i64, currency)
    }

    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Major units as a float, for JSON responses.
    pub fn as_major(&self) -> f64 {
        self.minor_units as f64 / 100.0
    }

    /// Major units with exactly two decimals, e.g. `999.00`.
    pub fn format_major(&self) -> String {
        format!("{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }

    /// Symbol-prefixed display form, e.g. `₹999.00`.
    pub fn display_with_symbol(&self) -> String {
        let symbol = currency_symbol(&self.currency);
        if symbol == self.currency {
            format!("{} {}", symbol, self.format_major())
        } else {
            format!("{}{}", symbol, self.format_major())
        }
    }
}

fn normalize_currency(code: &str) -> Result<String, ValidationError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format(
            "currency",
            "must be a three-letter ISO 4217 code",
        ));
    }
    Ok(code.to_ascii_uppercase())
}

/// Display symbol for an ISO 4217 code. Unknown codes display as themselves.
pub fn currency_symbol(code: &str) -> &str {
    match code {
        "INR" => "₹",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "AUD" => "A$",
        "CAD" => "CA$",
        "SGD" => "S$",
        "AED" => "AED",
        "CHF" => "CHF",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "ZAR" => "R",
        "BRL" => "R$",
        "KRW" => "₩",
        "RUB" => "₽",
        "LKR" => "Rs",
        "PKR" => "Rs",
        "BDT" => "৳",
        "NPR" => "Rs",
        other => other,
    }
}
