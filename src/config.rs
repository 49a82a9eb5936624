use serde::{Deserialize, Serialize};

use crate::bech32::{MAX_BECH32_LENGTH, MIN_BECH32_LENGTH};
use crate::errors::{ArgumentError, Error, Result};
use crate::segwit::SegwitAddress;

/// Length limits applied by the Bech32 codec.
///
/// A configured limit may tighten the hard bound but never loosen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Longest Bech32 string accepted by decode or produced by encode.
    pub max_bech32_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_bech32_length: MAX_BECH32_LENGTH,
        }
    }
}

impl Limits {
    /// Builds limits with the given maximum, rejecting values outside the hard bounds.
    pub fn new(max_bech32_length: usize) -> Result<Self> {
        let limits = Self { max_bech32_length };
        limits.validate()?;
        Ok(limits)
    }

    /// Limits used for segwit addresses.
    pub fn segwit() -> Self {
        Self {
            max_bech32_length: SegwitAddress::MAX_LENGTH,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if (MIN_BECH32_LENGTH..=MAX_BECH32_LENGTH).contains(&self.max_bech32_length) {
            Ok(())
        } else {
            Err(ArgumentError::LimitOutOfRange.into())
        }
    }

    /// Parses limits from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let limits: Limits =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        limits.validate()?;
        Ok(limits)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}
