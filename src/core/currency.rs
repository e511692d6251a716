use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{AppError, Result};

/// Currencies accepted by the gateway, with their subunit precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee (100 paise)
    INR,
    /// US Dollar (100 cents)
    USD,
    /// Euro (100 cents)
    EUR,
    /// Pound Sterling (100 pence)
    GBP,
    /// Singapore Dollar (100 cents)
    SGD,
    /// Japanese Yen (no subunit)
    JPY,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl Currency {
    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Converts a major-unit amount into integer subunits (paise, cents).
    ///
    /// Rounds half to even. Zero, negative and out-of-range amounts are rejected.
    pub fn to_subunits(&self, amount: Decimal) -> Result<i64> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "{} amount must be greater than zero",
                self
            )));
        }

        let factor = Decimal::from(10_i64.pow(self.scale()));
        let subunits = amount
            .checked_mul(factor)
            .ok_or_else(|| AppError::validation("Amount is too large"))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);

        let subunits = subunits
            .to_i64()
            .ok_or_else(|| AppError::validation("Amount is too large"))?;

        if subunits == 0 {
            return Err(AppError::validation(format!(
                "{} amount rounds to zero",
                self
            )));
        }

        Ok(subunits)
    }

    /// Converts integer subunits back to a major-unit amount
    pub fn from_subunits(&self, subunits: i64) -> Decimal {
        Decimal::new(subunits, self.scale())
    }

    /// Display symbol used in operator notifications
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD | Currency::SGD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
        }
    }

    /// Formats an amount for display with the correct decimal places
    pub fn format_amount(&self, amount: Decimal) -> String {
        let scale = self.scale();
        let rounded = amount.round_dp(scale);
        if scale == 0 {
            format!("{}{}", self.symbol(), rounded)
        } else {
            format!("{}{:.width$}", self.symbol(), rounded, width = scale as usize)
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::SGD => "SGD",
            Currency::JPY => "JPY",
        };
        write!(f, "{}", code)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INR" => Ok(Currency::INR),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "SGD" => Ok(Currency::SGD),
            "JPY" => Ok(Currency::JPY),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
