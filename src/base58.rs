//! Base58 and Base58Check.
//!
//! The converter treats its input as an unsigned big-endian integer and re-expresses it
//! in the other base with schoolbook long multiplication. Inputs are bounded so that the
//! output size estimate and the carry arithmetic can never overflow.

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::checksum::{base58_checksum, BASE58_CHECKSUM_LENGTH};
use crate::errors::{ArgumentError, DecodingError, Error, Result};

pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Longest input accepted by [`convert_base`].
pub const MAX_CONVERT_LENGTH: usize = 8192;

/// Longest payload accepted by [`check_encode`].
pub const MAX_PAYLOAD_LENGTH: usize = 4096;

/// Longest string accepted by [`check_decode`]; the encoding of a maximal payload
/// together with its checksum never exceeds it.
pub const MAX_CHECK_STRING_LENGTH: usize = 5600;

static ALPHABET_REVERSE: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, &symbol) in ALPHABET.iter().enumerate() {
        table[symbol as usize] = Some(value as u8);
    }
    table
});

/// Radix of the digits handed to [`convert_base`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// Plain bytes.
    Base256,
    /// Digit values 0..58, one per byte.
    Base58,
}

impl Base {
    fn radix(self) -> u32 {
        match self {
            Base::Base256 => 256,
            Base::Base58 => 58,
        }
    }

    fn other(self) -> Base {
        match self {
            Base::Base256 => Base::Base58,
            Base::Base58 => Base::Base256,
        }
    }

    /// Upper bound on the output digits for `significant` input digits, rounded up
    /// with one digit of slack. The ratios approximate log(256)/log(58) and its inverse.
    fn output_bound(self, significant: usize) -> usize {
        match self {
            Base::Base256 => significant * 1366 / 1000 + 1,
            Base::Base58 => significant * 733 / 1000 + 1,
        }
    }
}

/// Converts a big-endian number from base `from` to the other base.
///
/// Each leading zero digit of the input becomes exactly one leading zero digit of the
/// output.
pub fn convert_base(data: &[u8], from: Base) -> Result<Vec<u8>> {
    if data.len() > MAX_CONVERT_LENGTH {
        return Err(ArgumentError::InputTooLong.into());
    }
    let from_radix = from.radix();
    if data.iter().any(|&digit| u32::from(digit) >= from_radix) {
        return Err(ArgumentError::InputElementInvalid.into());
    }
    let to_radix = from.other().radix();

    let zeros = data.iter().take_while(|&&digit| digit == 0).count();
    let size = from.output_bound(data.len() - zeros);
    let mut buf = vec![0u8; size];
    // number of low-order digits of `buf` in use
    let mut length = 0usize;

    for &digit in &data[zeros..] {
        let mut carry = u32::from(digit);
        let mut used = 0usize;
        for slot in buf.iter_mut().rev() {
            if carry == 0 && used >= length {
                break;
            }
            carry += from_radix * u32::from(*slot);
            *slot = (carry % to_radix) as u8;
            carry /= to_radix;
            used += 1;
        }
        debug_assert_eq!(carry, 0, "output bound too small");
        length = used;
    }

    let mut result = Vec::with_capacity(zeros + length);
    result.resize(zeros, 0);
    result.extend_from_slice(&buf[size - length..]);
    Ok(result)
}

/// Encodes bytes as Base58 without a checksum.
pub fn encode(data: &[u8]) -> Result<String> {
    let digits = convert_base(data, Base::Base256)?;
    Ok(digits
        .into_iter()
        .map(|digit| ALPHABET[digit as usize] as char)
        .collect())
}

/// Decodes a Base58 string without checking for a checksum.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    if input.len() > MAX_CONVERT_LENGTH {
        debug!(length = input.len(), "base58 input too long");
        return Err(DecodingError::InputLengthInvalid.into());
    }
    let digits = to_digits(input)?;
    convert_base(&digits, Base::Base58)
}

fn to_digits(input: &str) -> Result<Vec<u8>> {
    input
        .bytes()
        .map(|symbol| {
            ALPHABET_REVERSE
                .get(symbol as usize)
                .copied()
                .flatten()
                .ok_or_else(|| {
                    debug!(symbol, "invalid base58 symbol");
                    Error::from(DecodingError::InvalidSymbol)
                })
        })
        .collect()
}

/// Encodes a payload as Base58Check: the payload followed by its four checksum bytes.
pub fn check_encode(payload: &[u8]) -> Result<String> {
    if payload.len() > MAX_PAYLOAD_LENGTH {
        return Err(ArgumentError::InputTooLong.into());
    }
    let mut data = Vec::with_capacity(payload.len() + BASE58_CHECKSUM_LENGTH);
    data.extend_from_slice(payload);
    data.extend_from_slice(&base58_checksum(payload));
    encode(&data)
}

/// Decodes a Base58Check string and returns the payload with the checksum removed.
pub fn check_decode(input: &str) -> Result<Vec<u8>> {
    if input.len() > MAX_CHECK_STRING_LENGTH {
        debug!(length = input.len(), "base58check input too long");
        return Err(DecodingError::InputLengthInvalid.into());
    }
    let mut data = decode(input)?;
    if data.len() < BASE58_CHECKSUM_LENGTH {
        debug!(length = data.len(), "base58check data too short for checksum");
        return Err(DecodingError::TooShortForChecksum.into());
    }
    let checksum = data.split_off(data.len() - BASE58_CHECKSUM_LENGTH);
    if checksum != base58_checksum(&data) {
        debug!("base58check checksum mismatch");
        return Err(DecodingError::ChecksumInvalid.into());
    }
    trace!(payload_length = data.len(), "decoded base58check");
    Ok(data)
}
