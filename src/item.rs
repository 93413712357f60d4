use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::float::{canonicalize, CanonicalF64, CanonicalFloat};
use crate::{CborError, ErrorCode, Map};

/// A symbolic CBOR data item.
///
/// Equality is structural; floats compare with native float equality, so an item holding NaN is
/// not equal to itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Unsigned integer (major type 0).
    Unsigned(u64),
    /// Negative integer (major type 1): `Negative(n)` is the value `-1 - n`.
    Negative(u64),
    /// Byte string (major type 2).
    ByteString(Vec<u8>),
    /// UTF-8 text string (major type 3).
    TextString(String),
    /// Array (major type 4).
    Array(Vec<Item>),
    /// Map with canonically ordered keys (major type 5).
    Map(Map),
    /// Tagged item (major type 6).
    Tagged(u64, Box<Item>),
    /// Simple value or float (major type 7).
    Simple(Simple),
}

/// Major type 7 values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Simple {
    /// `false`
    False,
    /// `true`
    True,
    /// `null`
    Null,
    /// A floating-point value with no exact integer form.
    Float(CanonicalF64),
}

impl Item {
    /// `false`
    pub const FALSE: Self = Self::Simple(Simple::False);
    /// `true`
    pub const TRUE: Self = Self::Simple(Simple::True);
    /// `null`
    pub const NULL: Self = Self::Simple(Simple::Null);

    /// Build an array from anything convertible to items.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Wrap `item` in `tag`.
    pub fn tagged(tag: u64, item: impl Into<Self>) -> Self {
        Self::Tagged(tag, Box::new(item.into()))
    }

    /// Build a byte string.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::ByteString(data.into())
    }

    /// Build a text string.
    pub fn text(s: impl Into<String>) -> Self {
        Self::TextString(s.into())
    }

    /// Build an integer item from any value in `[-2^64, 2^64 - 1]`.
    ///
    /// # Errors
    ///
    /// Returns `IntegerOutOfRange` outside that range.
    pub fn integer(v: i128) -> Result<Self, CborError> {
        if v >= 0 {
            u64::try_from(v)
                .map(Self::Unsigned)
                .map_err(|_| CborError::out_of_range())
        } else {
            u64::try_from(-1 - v)
                .map(Self::Negative)
                .map_err(|_| CborError::out_of_range())
        }
    }

    /// Build the canonical item for a float: integral values become integers.
    #[must_use]
    pub fn float(v: f64) -> Self {
        match canonicalize(v) {
            CanonicalFloat::Unsigned(u) => Self::Unsigned(u),
            CanonicalFloat::Negative(n) => Self::Negative(n),
            _ => Self::Simple(Simple::Float(CanonicalF64::from_non_integral(v))),
        }
    }

    /// The integer value of an `Unsigned` or `Negative` item.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::Unsigned(u) => Some(u as i128),
            Self::Negative(n) => Some(-1 - n as i128),
            _ => None,
        }
    }

    /// The value of an `Unsigned` item.
    #[must_use]
    pub const fn as_unsigned(&self) -> Option<u64> {
        match *self {
            Self::Unsigned(u) => Some(u),
            _ => None,
        }
    }

    /// The payload of a byte string.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// The payload of a text string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::TextString(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The map of a map item.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Tag and content of a tagged item.
    #[must_use]
    pub fn as_tagged(&self) -> Option<(u64, &Self)> {
        match self {
            Self::Tagged(tag, inner) => Some((*tag, inner)),
            _ => None,
        }
    }

    /// The value of `true` / `false`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Simple(Simple::True) => Some(true),
            Self::Simple(Simple::False) => Some(false),
            _ => None,
        }
    }

    /// Numeric value of a float or integer item.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Simple(Simple::Float(v)) => Some(v.get()),
            _ => self.as_integer().map(|i| i as f64),
        }
    }

    /// Returns true for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Simple(Simple::Null))
    }

    /// Content of a tagged item carrying `tag`.
    ///
    /// # Errors
    ///
    /// `WrongType` if the item is not tagged, `WrongTag` if it carries another tag.
    pub fn expect_tagged(&self, tag: u64) -> Result<&Self, CborError> {
        match self {
            Self::Tagged(t, inner) if *t == tag => Ok(inner),
            Self::Tagged(t, _) => Err(CborError::conversion(ErrorCode::WrongTag {
                expected: tag,
                encountered: *t,
            })),
            _ => Err(CborError::wrong_type()),
        }
    }
}

impl From<Simple> for Item {
    fn from(v: Simple) -> Self {
        Self::Simple(v)
    }
}

impl From<bool> for Item {
    fn from(v: bool) -> Self {
        if v {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Item {
            fn from(v: $t) -> Self {
                Self::Unsigned(u64::from(v))
            }
        }
    )*};
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Item {
            fn from(v: $t) -> Self {
                let v = i64::from(v);
                match u64::try_from(v) {
                    Ok(u) => Self::Unsigned(u),
                    // -1 - v is non-negative for every negative i64.
                    Err(_) => Self::Negative((-1 - v).unsigned_abs()),
                }
            }
        }
    )*};
}

from_unsigned!(u8, u16, u32, u64);
from_signed!(i8, i16, i32, i64);

impl From<usize> for Item {
    fn from(v: usize) -> Self {
        // usize is at most 64 bits on every supported target.
        Self::Unsigned(v as u64)
    }
}

impl From<isize> for Item {
    fn from(v: isize) -> Self {
        Self::from(v as i64)
    }
}

impl From<f64> for Item {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl From<f32> for Item {
    fn from(v: f32) -> Self {
        Self::float(f64::from(v))
    }
}

impl From<half::f16> for Item {
    fn from(v: half::f16) -> Self {
        Self::float(v.to_f64())
    }
}

impl From<&str> for Item {
    fn from(v: &str) -> Self {
        Self::TextString(v.into())
    }
}

impl From<String> for Item {
    fn from(v: String) -> Self {
        Self::TextString(v)
    }
}

impl From<&String> for Item {
    fn from(v: &String) -> Self {
        Self::TextString(v.clone())
    }
}

impl From<&[u8]> for Item {
    fn from(v: &[u8]) -> Self {
        Self::ByteString(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Item {
    fn from(v: &[u8; N]) -> Self {
        Self::ByteString(v.to_vec())
    }
}

impl From<Vec<u8>> for Item {
    fn from(v: Vec<u8>) -> Self {
        Self::ByteString(v)
    }
}

impl From<Vec<Self>> for Item {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Item {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl From<&Self> for Item {
    fn from(v: &Self) -> Self {
        v.clone()
    }
}

impl<T: Into<Self>> From<Option<T>> for Item {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::NULL, Into::into)
    }
}
