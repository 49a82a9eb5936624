//! Segregated witness addresses (BIP-173, BIP-350).
//!
//! The first data quintet is the witness version and the rest is the witness program
//! regrouped into quintets. Version 0 must use Bech32; every later version uses Bech32m.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::bech32::{Bech32, CHECKSUM_LENGTH, MAX_HRP_LENGTH, MIN_BECH32_LENGTH, MIN_HRP_LENGTH};
use crate::bits::{self, Conversion};
use crate::checksum::Variant;
use crate::config::Limits;
use crate::errors::{ArgumentError, DecodingError, Error, Result};

pub const MAX_VERSION: u8 = 16;
pub const MIN_PROGRAM_LENGTH: usize = 2;
pub const MAX_PROGRAM_LENGTH: usize = 40;

/// Version 0 programs are either a P2WPKH key hash or a P2WSH script hash.
const VERSION_0_PROGRAM_LENGTHS: [usize; 2] = [20, 32];

/// Version quintet plus the quintets of a 2 to 40 byte program.
const MIN_DATA_LENGTH: usize = 5;
const MAX_DATA_LENGTH: usize = 65;

const OP_0: u8 = 0x00;
/// OP_1 is 0x51, so version `v` in 1..=16 is pushed by `OP_1 - 1 + v`.
const OP_1_OFFSET: u8 = 0x50;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegwitAddress {
    bech32: Bech32,
    version: u8,
    program: Vec<u8>,
}

impl SegwitAddress {
    /// Longest segwit address string.
    pub const MAX_LENGTH: usize = 90;

    /// Encodes a witness version and program under `hrp`.
    pub fn new(hrp: &str, version: u8, program: &[u8]) -> Result<Self> {
        if !(MIN_HRP_LENGTH..=MAX_HRP_LENGTH).contains(&hrp.len()) {
            return Err(ArgumentError::HrpLengthInvalid.into());
        }
        if version > MAX_VERSION {
            return Err(ArgumentError::VersionInvalid.into());
        }
        if !(MIN_PROGRAM_LENGTH..=MAX_PROGRAM_LENGTH).contains(&program.len()) {
            return Err(ArgumentError::ProgramLengthInvalid.into());
        }
        if version == 0 && !VERSION_0_PROGRAM_LENGTHS.contains(&program.len()) {
            return Err(ArgumentError::ProgramLengthInvalidForVersion0.into());
        }
        let program_quintets = (program.len() * 8).div_ceil(5);
        if hrp.len() + 1 + 1 + program_quintets + CHECKSUM_LENGTH > Self::MAX_LENGTH {
            return Err(ArgumentError::HrpLengthInvalid.into());
        }

        let mut data = Vec::with_capacity(1 + program_quintets);
        data.push(version);
        data.extend(bits::convert(program, Conversion::EightToFive)?);

        let bech32 = Bech32::new(hrp, data, variant_for(version))?;
        trace!(address = %bech32, version, "encoded segwit address");
        Ok(Self {
            bech32,
            version,
            program: program.to_vec(),
        })
    }

    /// Decodes `address` and requires its lower-case hrp to equal `expected_hrp` exactly.
    pub fn decode(expected_hrp: &str, address: &str) -> Result<Self> {
        Self::decode_inner(Some(expected_hrp), address)
    }

    /// Decodes `address` under whatever hrp it carries.
    pub fn decode_any(address: &str) -> Result<Self> {
        Self::decode_inner(None, address)
    }

    fn decode_inner(expected_hrp: Option<&str>, address: &str) -> Result<Self> {
        if !(MIN_BECH32_LENGTH..=Self::MAX_LENGTH).contains(&address.len()) {
            debug!(length = address.len(), "segwit address length invalid");
            return Err(DecodingError::AddressLengthInvalid.into());
        }
        let bech32 = Bech32::decode_with(&Limits::segwit(), address)?;
        Self::from_bech32(expected_hrp, bech32).map_err(|err| {
            debug!(reason = %err, "rejected segwit address");
            err
        })
    }

    fn from_bech32(expected_hrp: Option<&str>, bech32: Bech32) -> Result<Self> {
        if let Some(expected) = expected_hrp {
            if bech32.hrp() != expected {
                return Err(DecodingError::HrpMismatch.into());
            }
        }
        let data = bech32.data();
        if !(MIN_DATA_LENGTH..=MAX_DATA_LENGTH).contains(&data.len()) {
            return Err(DecodingError::DataLengthInvalid.into());
        }
        let version = data[0];
        if version > MAX_VERSION {
            return Err(DecodingError::VersionInvalid.into());
        }
        if bech32.variant() != variant_for(version) {
            return Err(DecodingError::VariantInvalid.into());
        }
        let program = bits::convert(&data[1..], Conversion::FiveToEight)?;
        if version == 0 && !VERSION_0_PROGRAM_LENGTHS.contains(&program.len()) {
            return Err(DecodingError::ProgramLengthInvalidForVersion0.into());
        }
        trace!(hrp = bech32.hrp(), version, program_length = program.len(), "decoded segwit address");
        Ok(Self {
            bech32,
            version,
            program,
        })
    }

    pub fn hrp(&self) -> &str {
        self.bech32.hrp()
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn variant(&self) -> Variant {
        self.bech32.variant()
    }

    pub fn bech32(&self) -> &Bech32 {
        &self.bech32
    }

    /// Output script paying to this address: the version push opcode, then the program
    /// pushed with an explicit length byte.
    pub fn script_pubkey(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(2 + self.program.len());
        script.push(if self.version == 0 {
            OP_0
        } else {
            OP_1_OFFSET + self.version
        });
        script.push(self.program.len() as u8);
        script.extend_from_slice(&self.program);
        script
    }
}

fn variant_for(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

impl fmt::Display for SegwitAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bech32, f)
    }
}

impl FromStr for SegwitAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode_any(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoding_error(expected_hrp: &str, address: &str) -> DecodingError {
        match SegwitAddress::decode(expected_hrp, address) {
            Err(Error::Decoding(reason)) => reason,
            other => panic!("expected decoding error for {:?}, got {:?}", address, other),
        }
    }

    #[test]
    fn test_decode_valid() {
        let cases = [
            ("bc", "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4",
                "0014751e76e8199196d454941c45d1b3a323f1433bd6"),
            ("tb", "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
                "00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262"),
            ("bc", "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y",
                "5128751e76e8199196d454941c45d1b3a323f1433bd6751e76e8199196d454941c45d1b3a323f1433bd6"),
            ("bc", "BC1SW50QGDZ25J", "6002751e"),
            ("bc", "bc1zw508d6qejxtdg4y5r3zarvaryvaxxpcs", "5210751e76e8199196d454941c45d1b3a323"),
            ("tb", "tb1qqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesrxh6hy",
                "0020000000c4a5cad46221b2a187905e5266362b99d5e91c6ce24d165dab93e86433"),
            ("tb", "tb1pqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesf3hn0c",
                "5120000000c4a5cad46221b2a187905e5266362b99d5e91c6ce24d165dab93e86433"),
            ("bc", "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqzk5jj0",
                "512079be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        ];
        for (hrp, address, script) in cases {
            let decoded = SegwitAddress::decode(hrp, address).unwrap();
            assert_eq!(hex::encode(decoded.script_pubkey()), script, "{}", address);
            assert_eq!(decoded.hrp(), hrp);
            assert_eq!(decoded.to_string(), address.to_lowercase());

            let encoded = SegwitAddress::new(hrp, decoded.version(), decoded.program()).unwrap();
            assert_eq!(encoded, decoded);
        }
    }

    #[test]
    fn test_decode_p2wpkh() {
        let address: SegwitAddress = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4".parse().unwrap();
        assert_eq!(address.version(), 0);
        assert_eq!(address.variant(), Variant::Bech32);
        assert_eq!(hex::encode(address.program()), "751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(address.bech32().data()[0], 0);
    }

    #[test]
    fn test_decode_invalid() {
        let cases = [
            ("bc", "tc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vq5zuyut", DecodingError::HrpMismatch),
            ("tb", "tc1qw508d6qejxtdg4y5r3zarvary0c5xw7kg3g4ty", DecodingError::HrpMismatch),
            // decoded hrps are lower case; an upper-case expectation never matches
            ("A", "a12uel5l", DecodingError::HrpMismatch),
            ("BC", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", DecodingError::HrpMismatch),
            ("bc", "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqh2y7hd", DecodingError::VariantInvalid),
            ("tb", "tb1z0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqglt7rf", DecodingError::VariantInvalid),
            ("bc", "BC1S0XLXVLHEMJA6C4DQV22UAPCTQUPFHLXM9H8Z3K2E72Q4K9HCZ7VQ54WELL", DecodingError::VariantInvalid),
            ("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh", DecodingError::VariantInvalid),
            ("tb", "tb1q0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vq24jc47", DecodingError::VariantInvalid),
            ("bc", "bc1qqqqqye4593", DecodingError::VariantInvalid),
            ("bc", "bc1pqqqq4yr79j", DecodingError::VariantInvalid),
            ("bc", "bc1p38j9r5y49hruaue7wxjce0updqjuyyx0kh56v8s25huc6995vvpql3jow4", DecodingError::ChecksumNotInCharset),
            ("bc", "BC130XLXVLHEMJA6C4DQV22UAPCTQUPFHLXM9H8Z3K2E72Q4K9HCZ7VQ7ZWS8R", DecodingError::VersionInvalid),
            ("bc", "bc13qqqqjggfzq", DecodingError::VersionInvalid),
            ("bc", "bc1pw5dgrnzv", DecodingError::DataLengthInvalid),
            ("bc", "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7v8n0nx0muaewav253zgeav", DecodingError::DataLengthInvalid),
            ("bc", "bc1gmk9yu", DecodingError::DataLengthInvalid),
            ("bc", "BC1QR508D6QEJXTDG4Y5R3ZARVARYV98GJ9P", DecodingError::ProgramLengthInvalidForVersion0),
            ("bc", "bc1qqqqq399cqn", DecodingError::ProgramLengthInvalidForVersion0),
            ("tb", "tb1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vq47Zagq", DecodingError::MixedCase),
            ("bc", "bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7v07qwwzcrf", DecodingError::PaddingTooManyBits),
            ("bc", "bc1qw508d6qejxtdg4y5r3zarvaryvqkyqvzl", DecodingError::PaddingTooManyBits),
            ("bc", "bc1pqqqqqq90twsu", DecodingError::PaddingTooManyBits),
            ("tb", "tb1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vpggkg4j", DecodingError::PaddingNonZeroBits),
            ("bc", "bc1plllllq5980", DecodingError::PaddingNonZeroBits),
            ("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5", DecodingError::ChecksumInvalid),
            ("bc", "bc1qqqqq", DecodingError::SeparatorLocationInvalid),
        ];
        for (hrp, address, expected) in cases {
            assert_eq!(decoding_error(hrp, address), expected, "{}", address);
        }
    }

    #[test]
    fn test_decode_length_limits() {
        assert_eq!(decoding_error("bc", "bc1qqqq"), DecodingError::AddressLengthInvalid);
        let long_zero = format!("11{}c8247j", "q".repeat(82));
        assert_eq!(long_zero.len(), SegwitAddress::MAX_LENGTH);
        // a valid Bech32 string, but the data is not a segwit payload
        assert_eq!(decoding_error("1", &long_zero), DecodingError::DataLengthInvalid);
        assert_eq!(
            decoding_error("1", &format!("{}q", long_zero)),
            DecodingError::AddressLengthInvalid
        );
    }

    #[test]
    fn test_decode_any() {
        let address = SegwitAddress::decode_any(
            "tc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vq5zuyut",
        )
        .unwrap();
        assert_eq!(address.hrp(), "tc");
        assert_eq!(address.version(), 1);
        assert_eq!(address.variant(), Variant::Bech32m);
    }

    #[test]
    fn test_encode() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let address = SegwitAddress::new("bc", 0, &program).unwrap();
        assert_eq!(address.to_string(), "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        assert_eq!(address.variant(), Variant::Bech32);

        let address = SegwitAddress::new("bc", 1, &[0, 0]).unwrap();
        assert_eq!(address.to_string(), "bc1pqqqqqcnjqs");
        assert_eq!(hex::encode(address.script_pubkey()), "51020000");

        let address = SegwitAddress::new("bc", 16, &program[..2]).unwrap();
        assert_eq!(address.to_string(), "bc1sw50qgdz25j");

        let doubled = [program.as_slice(), program.as_slice()].concat();
        let address = SegwitAddress::new("bc", 1, &doubled).unwrap();
        assert_eq!(
            address.to_string(),
            "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y"
        );

        let output_key =
            hex::decode("a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c").unwrap();
        let address = SegwitAddress::new("bc", 1, &output_key).unwrap();
        assert_eq!(
            address.to_string(),
            "bc1p5cyxnuxmeuwuvkwfem96lqzszd02n6xdcjrs20cac6yqjjwudpxqkedrcr"
        );
        assert_eq!(address.variant(), Variant::Bech32m);
    }

    #[test]
    fn test_encode_preconditions() {
        let hash = [0u8; 20];
        let long_hrp = "a".repeat(84);
        let cases = [
            ("", 0, &hash[..], ArgumentError::HrpLengthInvalid),
            (long_hrp.as_str(), 0, &hash[..], ArgumentError::HrpLengthInvalid),
            ("bc", 17, &hash[..], ArgumentError::VersionInvalid),
            ("bc", 1, &hash[..1], ArgumentError::ProgramLengthInvalid),
            ("bc", 0, &hash[..16], ArgumentError::ProgramLengthInvalidForVersion0),
            ("BC", 0, &hash[..], ArgumentError::HrpElementInvalid),
        ];
        for (hrp, version, program, expected) in cases {
            assert_eq!(
                SegwitAddress::new(hrp, version, program),
                Err(Error::Argument(expected))
            );
        }
        assert_eq!(
            SegwitAddress::new("bc", 1, &[0u8; 41]),
            Err(Error::Argument(ArgumentError::ProgramLengthInvalid))
        );

        let program = [0u8; 40];
        let address = SegwitAddress::new(&"a".repeat(18), 1, &program).unwrap();
        assert_eq!(address.to_string().len(), SegwitAddress::MAX_LENGTH);
        assert_eq!(
            SegwitAddress::new(&"a".repeat(19), 1, &program),
            Err(Error::Argument(ArgumentError::HrpLengthInvalid))
        );
    }
}
