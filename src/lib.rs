//! Base58Check and Bech32/Bech32m codecs for cryptocurrency addresses and keys.

// Error handling module
pub mod errors;
// Codec length limits
pub mod config;

pub mod base58;
pub mod bech32;
pub mod bits;
pub mod checksum;
pub mod segwit;

// Re-export common types
pub use bech32::Bech32;
pub use bits::Conversion;
pub use checksum::Variant;
pub use config::Limits;
pub use errors::{ArgumentError, DecodingError, Error, Result};
pub use segwit::SegwitAddress;
