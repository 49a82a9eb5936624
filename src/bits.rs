//! Regrouping of bit streams between 8-bit bytes and 5-bit quintets.

use crate::errors::{ArgumentError, DecodingError, Result};

/// Direction of a regrouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Bytes to quintets. A short final group is zero padded.
    EightToFive,
    /// Quintets to bytes. Leftover bits must be fewer than five and all zero.
    FiveToEight,
}

impl Conversion {
    pub const fn from_bits(self) -> u32 {
        match self {
            Conversion::EightToFive => 8,
            Conversion::FiveToEight => 5,
        }
    }

    pub const fn to_bits(self) -> u32 {
        match self {
            Conversion::EightToFive => 5,
            Conversion::FiveToEight => 8,
        }
    }

    /// Longest input accepted in this direction.
    pub const fn max_input_length(self) -> usize {
        match self {
            Conversion::EightToFive => 10240,
            Conversion::FiveToEight => 16384,
        }
    }

    const fn pad(self) -> bool {
        matches!(self, Conversion::EightToFive)
    }
}

/// Re-slices `data` into words of the target width, most significant bit first.
pub fn convert(data: &[u8], conversion: Conversion) -> Result<Vec<u8>> {
    if data.len() > conversion.max_input_length() {
        return Err(ArgumentError::InputTooLong.into());
    }
    let from_bits = conversion.from_bits();
    let to_bits = conversion.to_bits();
    if data.iter().any(|&value| u32::from(value) >> from_bits != 0) {
        return Err(ArgumentError::InputElementInvalid.into());
    }

    let max_value: u32 = (1 << to_bits) - 1;
    // holds at most from_bits + to_bits - 1 live bits
    let max_acc: u32 = (1 << (from_bits + to_bits - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut result = Vec::with_capacity((data.len() * from_bits as usize).div_ceil(to_bits as usize));

    for &value in data {
        acc = ((acc << from_bits) | u32::from(value)) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if conversion.pad() {
        if bits > 0 {
            result.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits {
        return Err(DecodingError::PaddingTooManyBits.into());
    } else if (acc << (to_bits - bits)) & max_value != 0 {
        return Err(DecodingError::PaddingNonZeroBits.into());
    }

    Ok(result)
}
