//! Domain models shared across the `ViewPay` crates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Currency State
// ============================================================================

/// The active display currency and its exchange rate from USD.
///
/// This is the single piece of configuration every estimate computation
/// reads. It is replaced as a whole record, never field by field, so a
/// reader can never observe a code paired with another currency's rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyState {
    /// ISO 4217 currency code, uppercase (e.g. "USD", "EUR").
    pub code: String,

    /// Exchange rate from one USD into this currency. Always positive.
    pub exchange_rate_to_usd: Decimal,
}

impl CurrencyState {
    /// Creates a currency state, validating the rate invariant.
    ///
    /// The code is normalized to uppercase for display.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCurrencyState`] if the rate is not
    /// strictly positive.
    pub fn new(code: impl Into<String>, exchange_rate_to_usd: Decimal) -> Result<Self, CoreError> {
        if exchange_rate_to_usd <= Decimal::ZERO {
            return Err(CoreError::InvalidCurrencyState(format!(
                "exchange rate must be positive, got {exchange_rate_to_usd}"
            )));
        }
        Ok(Self {
            code: code.into().to_uppercase(),
            exchange_rate_to_usd,
        })
    }

    /// The USD identity state.
    pub fn usd() -> Self {
        Self {
            code: "USD".to_string(),
            exchange_rate_to_usd: Decimal::ONE,
        }
    }
}

impl Default for CurrencyState {
    fn default() -> Self {
        Self::usd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_usd_identity() {
        let state = CurrencyState::default();
        assert_eq!(state.code, "USD");
        assert_eq!(state.exchange_rate_to_usd, Decimal::ONE);
    }

    #[test]
    fn test_new_uppercases_code() {
        let state = CurrencyState::new("eur", dec!(0.92)).unwrap();
        assert_eq!(state.code, "EUR");
    }

    #[test]
    fn test_new_rejects_non_positive_rate() {
        assert!(CurrencyState::new("EUR", Decimal::ZERO).is_err());
        assert!(CurrencyState::new("EUR", dec!(-1)).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let state = CurrencyState::new("JPY", dec!(147.3)).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: CurrencyState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
