use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the failure was caused by untrusted input rather than by the caller.
    pub fn is_decoding(&self) -> bool {
        matches!(self, Error::Decoding(_))
    }
}

/// Precondition violations. These indicate a bug at the call site.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("input too long")]
    InputTooLong,

    #[error("input element value invalid")]
    InputElementInvalid,

    #[error("humanReadablePart length invalid")]
    HrpLengthInvalid,

    #[error("humanReadablePart element value invalid")]
    HrpElementInvalid,

    #[error("data5 length invalid")]
    DataLengthInvalid,

    #[error("data5 element value invalid")]
    DataElementInvalid,

    #[error("version invalid")]
    VersionInvalid,

    #[error("program length invalid")]
    ProgramLengthInvalid,

    #[error("program length invalid for version 0")]
    ProgramLengthInvalidForVersion0,

    #[error("limit out of range")]
    LimitOutOfRange,
}

/// Expected failures while decoding untrusted text or data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingError {
    #[error("input length invalid")]
    InputLengthInvalid,

    #[error("input element value invalid")]
    InputElementInvalid,

    #[error("input is mixed case")]
    MixedCase,

    #[error("separator location invalid")]
    SeparatorLocationInvalid,

    #[error("data element not in Bech32 character set")]
    DataNotInCharset,

    #[error("checksum element not in Bech32 character set")]
    ChecksumNotInCharset,

    #[error("checksum invalid")]
    ChecksumInvalid,

    #[error("invalid symbol found")]
    InvalidSymbol,

    #[error("input too short for checksum")]
    TooShortForChecksum,

    #[error("invalid padding too many bits")]
    PaddingTooManyBits,

    #[error("invalid padding non-zero bits")]
    PaddingNonZeroBits,

    #[error("address length invalid")]
    AddressLengthInvalid,

    #[error("expectedHumanReadablePart does not match decoded value")]
    HrpMismatch,

    #[error("decoded data length invalid")]
    DataLengthInvalid,

    #[error("decoded version invalid")]
    VersionInvalid,

    #[error("bech32 variant invalid")]
    VariantInvalid,

    #[error("decoded program length invalid for version 0")]
    ProgramLengthInvalidForVersion0,
}
