//! Bech32 (BIP-173) and Bech32m (BIP-350) strings.
//!
//! A string is a human-readable part, the separator `1`, and the data quintets followed
//! by six checksum quintets, each quintet written as one symbol of [`CHARSET`]. Decoding
//! accepts all lower-case or all upper-case input and always yields a lower-case hrp.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::checksum::{bech32_checksum, bech32_verify, Variant, BECH32_CHECKSUM_LENGTH};
use crate::config::Limits;
use crate::errors::{ArgumentError, DecodingError, Error, Result};

pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

pub const SEPARATOR: char = '1';
pub const CHECKSUM_LENGTH: usize = BECH32_CHECKSUM_LENGTH;
pub const MIN_HRP_LENGTH: usize = 1;
pub const MAX_HRP_LENGTH: usize = 83;
pub const MIN_BECH32_LENGTH: usize = MIN_HRP_LENGTH + 1 + CHECKSUM_LENGTH;
/// Longest hrp, the separator, 16384 data quintets and the checksum.
pub const MAX_BECH32_LENGTH: usize = MAX_HRP_LENGTH + 1 + 16384 + CHECKSUM_LENGTH;

/// Printable US-ASCII, the only code points allowed anywhere in a Bech32 string.
const MIN_ELEMENT: u8 = 33;
const MAX_ELEMENT: u8 = 126;

static CHARSET_REVERSE: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, &symbol) in CHARSET.iter().enumerate() {
        table[symbol as usize] = Some(value as u8);
        table[symbol.to_ascii_uppercase() as usize] = Some(value as u8);
    }
    table
});

fn quintet_of(symbol: u8) -> Option<u8> {
    CHARSET_REVERSE.get(symbol as usize).copied().flatten()
}

/// A decoded or validated Bech32 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bech32 {
    hrp: String,
    data: Vec<u8>,
    variant: Variant,
    // lower-case string form, built once
    encoded: String,
}

impl Bech32 {
    /// Validates the parts of a Bech32 string under the default limits.
    pub fn new(hrp: &str, data: Vec<u8>, variant: Variant) -> Result<Self> {
        check_encode_args(&Limits::default(), hrp, &data)?;
        let encoded = to_bech32_string(hrp, &data, variant);
        Ok(Self {
            hrp: hrp.to_string(),
            data,
            variant,
            encoded,
        })
    }

    /// Encodes `hrp` and the `data` quintets under the default limits.
    pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
        Self::encode_with(&Limits::default(), hrp, data, variant)
    }

    pub fn encode_with(limits: &Limits, hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
        limits.validate()?;
        check_encode_args(limits, hrp, data)?;
        Ok(to_bech32_string(hrp, data, variant))
    }

    /// Decodes a Bech32 or Bech32m string under the default limits.
    pub fn decode(input: &str) -> Result<Self> {
        Self::decode_with(&Limits::default(), input)
    }

    pub fn decode_with(limits: &Limits, input: &str) -> Result<Self> {
        limits.validate()?;
        decode_string(limits, input).map_err(|reason| {
            debug!(%reason, "rejected bech32 string");
            Error::Decoding(reason)
        })
    }

    /// Lower-case human-readable part.
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Data quintets, without the checksum.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The lower-case string form.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for Bech32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Bech32 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn check_encode_args(limits: &Limits, hrp: &str, data: &[u8]) -> Result<()> {
    if !(MIN_HRP_LENGTH..=MAX_HRP_LENGTH).contains(&hrp.len()) {
        return Err(ArgumentError::HrpLengthInvalid.into());
    }
    if hrp.len() + 1 + data.len() + CHECKSUM_LENGTH > limits.max_bech32_length {
        return Err(ArgumentError::DataLengthInvalid.into());
    }
    if hrp
        .bytes()
        .any(|b| !(MIN_ELEMENT..=MAX_ELEMENT).contains(&b) || b.is_ascii_uppercase())
    {
        return Err(ArgumentError::HrpElementInvalid.into());
    }
    if data.iter().any(|&quintet| quintet > 31) {
        return Err(ArgumentError::DataElementInvalid.into());
    }
    Ok(())
}

/// Assumes validated arguments.
fn to_bech32_string(hrp: &str, data: &[u8], variant: Variant) -> String {
    let checksum = bech32_checksum(hrp.as_bytes(), data, variant);
    let mut encoded = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LENGTH);
    encoded.push_str(hrp);
    encoded.push(SEPARATOR);
    encoded.extend(
        data.iter()
            .chain(checksum.iter())
            .map(|&quintet| CHARSET[quintet as usize] as char),
    );
    encoded
}

fn decode_string(limits: &Limits, input: &str) -> std::result::Result<Bech32, DecodingError> {
    let bytes = input.as_bytes();
    if !(MIN_BECH32_LENGTH..=limits.max_bech32_length).contains(&bytes.len()) {
        return Err(DecodingError::InputLengthInvalid);
    }

    let mut has_lower = false;
    let mut has_upper = false;
    let mut separator = None;
    for (i, &b) in bytes.iter().enumerate() {
        if !(MIN_ELEMENT..=MAX_ELEMENT).contains(&b) {
            return Err(DecodingError::InputElementInvalid);
        }
        has_lower |= b.is_ascii_lowercase();
        has_upper |= b.is_ascii_uppercase();
        if has_lower && has_upper {
            return Err(DecodingError::MixedCase);
        }
        if b == SEPARATOR as u8 {
            separator = Some(i);
        }
    }

    let separator = match separator {
        Some(i)
            if (MIN_HRP_LENGTH..=MAX_HRP_LENGTH).contains(&i)
                && i + 1 + CHECKSUM_LENGTH <= bytes.len() =>
        {
            i
        }
        _ => return Err(DecodingError::SeparatorLocationInvalid),
    };

    // All bytes are printable ASCII at this point.
    let hrp = input[..separator].to_ascii_lowercase();
    let checksum_start = bytes.len() - CHECKSUM_LENGTH;
    let data = bytes[separator + 1..checksum_start]
        .iter()
        .map(|&b| quintet_of(b).ok_or(DecodingError::DataNotInCharset))
        .collect::<std::result::Result<Vec<u8>, _>>()?;
    let checksum = bytes[checksum_start..]
        .iter()
        .map(|&b| quintet_of(b).ok_or(DecodingError::ChecksumNotInCharset))
        .collect::<std::result::Result<Vec<u8>, _>>()?;

    let variant =
        bech32_verify(hrp.as_bytes(), &data, &checksum).ok_or(DecodingError::ChecksumInvalid)?;

    trace!(hrp = %hrp, data_length = data.len(), ?variant, "decoded bech32 string");
    Ok(Bech32 {
        hrp,
        data,
        variant,
        encoded: input.to_ascii_lowercase(),
    })
}
