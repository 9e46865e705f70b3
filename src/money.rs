// src/money.rs
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type AmountValue = f64;

/// A bid amount. Always finite and never negative, which is what makes the
/// total ordering below sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    value: AmountValue,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyError {
    #[error("Amount must not be negative: {0}")]
    Negative(AmountValue),

    #[error("Amount must be a finite number")]
    NotFinite,

    #[error("Invalid amount value: {0}")]
    Unparsable(String),
}

impl Amount {
    pub fn new(value: AmountValue) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        if value < 0.0 {
            return Err(MoneyError::Negative(value));
        }
        // normalise -0.0 so equal amounts compare equal under total_cmp
        Ok(Amount { value: value + 0.0 })
    }

    pub fn zero() -> Self {
        Amount { value: 0.0 }
    }

    pub fn value(&self) -> AmountValue {
        self.value
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer {
        serializer.serialize_f64(self.value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = AmountValue::deserialize(deserializer)?;
        Amount::new(value)
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<AmountValue>()
            .map_err(|_| MoneyError::Unparsable(s.to_string()))?;
        Amount::new(value)
    }
}
