//! Money representation
//!
//! All monetary amounts are stored and computed as integer cents (`i64`).
//! `rust_decimal` is used at the boundary: parsing `"12.34"` wire strings
//! into cents and formatting cents back out. Floating point is never used
//! for money.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount has more than 2 decimal places: {0}")]
    TooPrecise(String),
}

/// Convert integer cents to a `Decimal` with 2 decimal places.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a `Decimal` amount to integer cents.
///
/// The amount must not carry more than 2 significant decimal places
/// (trailing zeros are fine).
pub fn decimal_to_cents(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.normalize().scale() > 2 {
        return Err(MoneyError::TooPrecise(amount.to_string()));
    }
    (amount * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| MoneyError::Invalid(amount.to_string()))
}

/// Parse a decimal string such as `"12.34"` into integer cents.
pub fn parse_cents(text: &str) -> Result<i64, MoneyError> {
    let amount = Decimal::from_str(text.trim())
        .map_err(|_| MoneyError::Invalid(text.to_string()))?;
    decimal_to_cents(amount)
}

/// Format integer cents as a decimal string with exactly 2 decimal places.
pub fn format_cents(cents: i64) -> String {
    cents_to_decimal(cents).to_string()
}

/// Serde adapter for `i64` cents fields, rendered as `"12.34"` strings on
/// the wire. Accepts strings or bare JSON numbers on input; numbers go
/// through `Decimal` parsing, never `f64` arithmetic.
pub mod serde_cents {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_cents(*cents))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum RawAmount {
        Number(serde_json::Number),
        Text(String),
    }

    impl RawAmount {
        pub(super) fn into_cents<E: de::Error>(self) -> Result<i64, E> {
            let text = match self {
                RawAmount::Number(n) => n.to_string(),
                RawAmount::Text(t) => t,
            };
            super::parse_cents(&text).map_err(de::Error::custom)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        RawAmount::deserialize(deserializer)?.into_cents()
    }
}

/// Serde adapter for optional cents fields (update payloads).
pub mod serde_cents_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        cents: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match cents {
            Some(c) => serializer.serialize_some(&super::format_cents(*c)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let raw: Option<super::serde_cents::RawAmount> = Option::deserialize(deserializer)?;
        raw.map(|r| r.into_cents()).transpose()
    }
}
