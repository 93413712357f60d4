use core::fmt;

/// A structured error code identifying the reason a CBOR item was rejected.
///
/// Decode-side codes are produced by [`crate::decode`]; `IntegerOutOfRange`, `WrongType` and
/// `WrongTag` are produced at the native-conversion boundary ([`crate::CborDecode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Input exhausted in the middle of an item.
    Underrun,
    /// Header low five bits hold a reserved or unsupported value (28..=31).
    ///
    /// The payload is the offending value; `31` marks an indefinite-length item.
    BadHeaderValue(u8),
    /// An integer, length or float was encoded in a wider form than necessary,
    /// or a NaN used a non-canonical bit pattern.
    NonCanonicalNumeric,
    /// A text string payload is not valid UTF-8.
    InvalidString,
    /// A map key does not sort after the previous key.
    MisorderedMapKey,
    /// A map key is byte-identical to the previous key.
    DuplicateMapKey,
    /// The top-level item was followed by this many unconsumed bytes.
    UnusedData(usize),
    /// A one-byte simple value other than `false`, `true` or `null`.
    InvalidSimple,
    /// An integer does not fit the requested native type.
    IntegerOutOfRange,
    /// The item variant does not match the requested native type.
    WrongType,
    /// The item carries a different tag than requested.
    WrongTag {
        /// Tag the caller asked for.
        expected: u64,
        /// Tag found on the item.
        encountered: u64,
    },
    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Input is larger than `DecodeLimits::max_input_bytes`.
    InputTooLarge,
    /// A declared length does not fit in `usize`.
    LengthOverflow,
    /// A serde data model value has no item representation, or an item does not match the
    /// requested serde type.
    Serde,
}

/// A CBOR error with a stable code and a byte offset.
///
/// Offsets are meaningful for decode errors. For conversion errors, `offset` is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct a new error.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    /// Construct a conversion error (offset `0`).
    #[inline]
    #[must_use]
    pub const fn conversion(code: ErrorCode) -> Self {
        Self { code, offset: 0 }
    }

    /// Shorthand for a `WrongType` conversion error.
    #[inline]
    #[must_use]
    pub const fn wrong_type() -> Self {
        Self::conversion(ErrorCode::WrongType)
    }

    /// Shorthand for an `IntegerOutOfRange` conversion error.
    #[inline]
    #[must_use]
    pub const fn out_of_range() -> Self {
        Self::conversion(ErrorCode::IntegerOutOfRange)
    }

    /// Returns true iff the error was raised by the native-conversion boundary.
    #[inline]
    #[must_use]
    pub const fn is_conversion(self) -> bool {
        matches!(
            self.code,
            ErrorCode::IntegerOutOfRange
                | ErrorCode::WrongType
                | ErrorCode::WrongTag { .. }
                | ErrorCode::Serde
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Underrun => f.write_str("early end of data"),
            Self::BadHeaderValue(31) => {
                f.write_str("unsupported header value 31 (indefinite length)")
            }
            Self::BadHeaderValue(v) => write!(f, "unsupported header value {v}"),
            Self::NonCanonicalNumeric => {
                f.write_str("non-canonical numeric value encoding")
            }
            Self::InvalidString => f.write_str("invalid UTF-8 in text string"),
            Self::MisorderedMapKey => f.write_str("map keys are not in canonical order"),
            Self::DuplicateMapKey => f.write_str("duplicate map key"),
            Self::UnusedData(n) => write!(f, "{n} unused bytes after top-level item"),
            Self::InvalidSimple => f.write_str("unsupported simple value"),
            Self::IntegerOutOfRange => f.write_str("integer out of range for target type"),
            Self::WrongType => f.write_str("wrong item type"),
            Self::WrongTag {
                expected,
                encountered,
            } => write!(f, "wrong tag: expected {expected}, encountered {encountered}"),
            Self::DepthLimitExceeded => f.write_str("nesting depth limit exceeded"),
            Self::InputTooLarge => f.write_str("input exceeds size limit"),
            Self::LengthOverflow => f.write_str("length overflow"),
            Self::Serde => f.write_str("serde conversion failed"),
        }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conversion() {
            write!(f, "cbor conversion error: {}", self.code)
        } else {
            write!(f, "cbor decode error at {}: {}", self.offset, self.code)
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}
