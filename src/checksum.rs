//! Checksum engines for the two string codecs.
//!
//! Base58Check uses the first four bytes of a double SHA-256. Bech32 and Bech32m use a
//! 30-bit BCH code over GF(32) (the "polymod"); the two schemes differ only in the
//! constant XORed into the final register value. Neither is a cryptographic commitment.

use sha2::{Digest, Sha256};

/// Number of checksum bytes appended by Base58Check.
pub const BASE58_CHECKSUM_LENGTH: usize = 4;

/// Number of checksum quintets appended by Bech32.
pub const BECH32_CHECKSUM_LENGTH: usize = 6;

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// Checksum scheme of a Bech32 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// BIP-173
    Bech32,
    /// BIP-350
    Bech32m,
}

impl Variant {
    /// Value XORed into the final polymod register.
    pub const fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc830a3,
        }
    }

    fn from_residue(residue: u32) -> Option<Self> {
        [Variant::Bech32, Variant::Bech32m]
            .into_iter()
            .find(|variant| variant.constant() == residue)
    }
}

/// SHA-256 applied twice.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Base58Check checksum: the leading four bytes of `sha256d(payload)`.
pub fn base58_checksum(payload: &[u8]) -> [u8; BASE58_CHECKSUM_LENGTH] {
    let hash = sha256d(payload);
    let mut checksum = [0u8; BASE58_CHECKSUM_LENGTH];
    checksum.copy_from_slice(&hash[..BASE58_CHECKSUM_LENGTH]);
    checksum
}

/// Runs the Bech32 polymod over the concatenation of `parts`.
///
/// Every element must be a quintet; callers validate their input before getting here.
fn polymod(parts: &[&[u8]]) -> u32 {
    let mut chk: u32 = 1;
    for part in parts {
        for &value in part.iter() {
            debug_assert!(value <= 31);
            let top = chk >> 25;
            chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
            for (i, generator) in GENERATOR.iter().enumerate() {
                if (top >> i) & 1 == 1 {
                    chk ^= generator;
                }
            }
        }
    }
    chk
}

/// Expands an ASCII hrp into quintets: high three bits of each byte, a zero, then the
/// low five bits of each byte.
fn expand_hrp(hrp: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(hrp.len() * 2 + 1);
    result.extend(hrp.iter().map(|b| b >> 5));
    result.push(0);
    result.extend(hrp.iter().map(|b| b & 0x1f));
    result
}

/// Computes the six checksum quintets for `hrp` (lower case) and `data`.
pub fn bech32_checksum(hrp: &[u8], data: &[u8], variant: Variant) -> [u8; BECH32_CHECKSUM_LENGTH] {
    let expanded = expand_hrp(hrp);
    let residue = polymod(&[&expanded[..], data, &[0u8; BECH32_CHECKSUM_LENGTH][..]]) ^ variant.constant();
    let mut checksum = [0u8; BECH32_CHECKSUM_LENGTH];
    for (i, quintet) in checksum.iter_mut().enumerate() {
        *quintet = ((residue >> (5 * (BECH32_CHECKSUM_LENGTH - 1 - i))) & 0x1f) as u8;
    }
    checksum
}

/// Verifies a trailing checksum and reports which variant it was computed for.
pub fn bech32_verify(hrp: &[u8], data: &[u8], checksum: &[u8]) -> Option<Variant> {
    let expanded = expand_hrp(hrp);
    Variant::from_residue(polymod(&[&expanded[..], data, checksum]))
}
