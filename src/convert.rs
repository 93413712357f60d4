use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use half::f16;

use crate::{decode, CborError, Item, Map, Simple};

/// Convert a native value into an [`Item`].
pub trait CborEncode {
    /// Build the item for `self`.
    fn to_item(&self) -> Item;

    /// Canonical encoding of `self`.
    fn to_cbor_data(&self) -> Vec<u8> {
        self.to_item().to_cbor_data()
    }
}

/// Convert an [`Item`] into a native value.
pub trait CborDecode: Sized {
    /// Convert `item`.
    ///
    /// # Errors
    ///
    /// `WrongType` when the variant does not match, `IntegerOutOfRange` when an integer does not
    /// fit `Self`.
    fn from_item(item: &Item) -> Result<Self, CborError>;

    /// Decode canonical bytes and convert the result.
    ///
    /// # Errors
    ///
    /// Any decode error, then any conversion error.
    fn from_cbor_data(data: &[u8]) -> Result<Self, CborError> {
        Self::from_item(&decode(data)?)
    }
}

/// Marker trait for values that can appear as CBOR array elements.
///
/// `u8` is deliberately absent: `Vec<u8>` encodes as a byte string.
pub trait CborArrayElem {}

/// A native type carried inside a fixed CBOR tag.
pub trait CborTagged: Sized {
    /// The tag wrapping the content.
    const TAG: u64;

    /// Item for the content, without the tag.
    fn to_untagged_item(&self) -> Item;

    /// Convert the content, without the tag.
    ///
    /// # Errors
    ///
    /// Any conversion error for the content.
    fn from_untagged_item(item: &Item) -> Result<Self, CborError>;

    /// Item for `self`, wrapped in [`Self::TAG`].
    fn to_tagged_item(&self) -> Item {
        Item::tagged(Self::TAG, self.to_untagged_item())
    }

    /// Check the tag of `item`, then convert its content.
    ///
    /// # Errors
    ///
    /// `WrongType` if `item` is not tagged, `WrongTag` if it carries another tag, then any
    /// content conversion error.
    fn from_tagged_item(item: &Item) -> Result<Self, CborError> {
        Self::from_untagged_item(item.expect_tagged(Self::TAG)?)
    }
}

/// Decode canonical bytes holding a value tagged with `T::TAG`.
///
/// # Errors
///
/// Any decode error, then the errors of [`CborTagged::from_tagged_item`].
pub fn decode_tagged<T: CborTagged>(data: &[u8]) -> Result<T, CborError> {
    T::from_tagged_item(&decode(data)?)
}

fn integer_from_item<T: TryFrom<i128>>(item: &Item) -> Result<T, CborError> {
    let v = item.as_integer().ok_or_else(CborError::wrong_type)?;
    T::try_from(v).map_err(|_| CborError::out_of_range())
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl CborEncode for $t {
            fn to_item(&self) -> Item {
                Item::from(*self)
            }
        }

        impl CborDecode for $t {
            fn from_item(item: &Item) -> Result<Self, CborError> {
                integer_from_item(item)
            }
        }
    )*};
}

impl_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

macro_rules! impl_decode_only_integer {
    ($($t:ty),*) => {$(
        impl CborDecode for $t {
            fn from_item(item: &Item) -> Result<Self, CborError> {
                integer_from_item(item)
            }
        }
    )*};
}

// Every item integer fits i128, but not every i128 fits an item.
impl_decode_only_integer!(u128, i128);

impl CborEncode for bool {
    fn to_item(&self) -> Item {
        Item::from(*self)
    }
}

impl CborDecode for bool {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_bool().ok_or_else(CborError::wrong_type)
    }
}

/// Numeric value of a float item or an integer item that converts to `f64` exactly.
fn float_from_item(item: &Item) -> Result<f64, CborError> {
    match item {
        Item::Simple(Simple::Float(v)) => Ok(v.get()),
        Item::Unsigned(_) | Item::Negative(_) => {
            let i = item.as_integer().ok_or_else(CborError::wrong_type)?;
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let (f, back) = {
                let f = i as f64;
                (f, f as i128)
            };
            if back == i {
                Ok(f)
            } else {
                Err(CborError::out_of_range())
            }
        }
        _ => Err(CborError::wrong_type()),
    }
}

impl CborEncode for f64 {
    fn to_item(&self) -> Item {
        Item::float(*self)
    }
}

impl CborDecode for f64 {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        float_from_item(item)
    }
}

impl CborEncode for f32 {
    fn to_item(&self) -> Item {
        Item::float(f64::from(*self))
    }
}

impl CborDecode for f32 {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        let v = float_from_item(item)?;
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = v as Self;
        if v.is_nan() || f64::from(narrowed) == v {
            Ok(narrowed)
        } else {
            Err(CborError::wrong_type())
        }
    }
}

impl CborEncode for f16 {
    fn to_item(&self) -> Item {
        Item::float(self.to_f64())
    }
}

impl CborDecode for f16 {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        let v = float_from_item(item)?;
        let narrowed = Self::from_f64(v);
        if v.is_nan() || narrowed.to_f64() == v {
            Ok(narrowed)
        } else {
            Err(CborError::wrong_type())
        }
    }
}

impl CborEncode for str {
    fn to_item(&self) -> Item {
        Item::from(self)
    }
}

impl CborEncode for String {
    fn to_item(&self) -> Item {
        Item::from(self.as_str())
    }
}

impl CborDecode for String {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_text()
            .map(Into::into)
            .ok_or_else(CborError::wrong_type)
    }
}

impl CborEncode for [u8] {
    fn to_item(&self) -> Item {
        Item::from(self)
    }
}

impl CborEncode for Vec<u8> {
    fn to_item(&self) -> Item {
        Item::from(self.as_slice())
    }
}

impl CborDecode for Vec<u8> {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(CborError::wrong_type)
    }
}

impl<T: CborEncode + CborArrayElem> CborEncode for Vec<T> {
    fn to_item(&self) -> Item {
        Item::Array(self.iter().map(CborEncode::to_item).collect())
    }
}

impl<T: CborDecode + CborArrayElem> CborDecode for Vec<T> {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_array()
            .ok_or_else(CborError::wrong_type)?
            .iter()
            .map(T::from_item)
            .collect()
    }
}

impl<T: CborEncode> CborEncode for Option<T> {
    fn to_item(&self) -> Item {
        self.as_ref().map_or(Item::NULL, CborEncode::to_item)
    }
}

impl<T: CborDecode> CborDecode for Option<T> {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        if item.is_null() {
            Ok(None)
        } else {
            T::from_item(item).map(Some)
        }
    }
}

impl<K: CborEncode, V: CborEncode> CborEncode for BTreeMap<K, V> {
    fn to_item(&self) -> Item {
        Item::Map(self.iter().map(|(k, v)| (k.to_item(), v.to_item())).collect())
    }
}

impl<K: CborDecode + Ord, V: CborDecode> CborDecode for BTreeMap<K, V> {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_map()
            .ok_or_else(CborError::wrong_type)?
            .iter()
            .map(|(k, v)| Ok((K::from_item(k)?, V::from_item(v)?)))
            .collect()
    }
}

impl CborEncode for Map {
    fn to_item(&self) -> Item {
        Item::Map(self.clone())
    }
}

impl CborDecode for Map {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        item.as_map().cloned().ok_or_else(CborError::wrong_type)
    }
}

impl CborEncode for Item {
    fn to_item(&self) -> Item {
        self.clone()
    }

    fn to_cbor_data(&self) -> Vec<u8> {
        Self::to_cbor_data(self)
    }
}

impl CborDecode for Item {
    fn from_item(item: &Item) -> Result<Self, CborError> {
        Ok(item.clone())
    }
}

impl<T: CborEncode + ?Sized> CborEncode for &T {
    fn to_item(&self) -> Item {
        (**self).to_item()
    }

    fn to_cbor_data(&self) -> Vec<u8> {
        (**self).to_cbor_data()
    }
}

impl CborArrayElem for bool {}
impl CborArrayElem for u16 {}
impl CborArrayElem for u32 {}
impl CborArrayElem for u64 {}
impl CborArrayElem for usize {}
impl CborArrayElem for i8 {}
impl CborArrayElem for i16 {}
impl CborArrayElem for i32 {}
impl CborArrayElem for i64 {}
impl CborArrayElem for isize {}
impl CborArrayElem for u128 {}
impl CborArrayElem for i128 {}
impl CborArrayElem for f64 {}
impl CborArrayElem for f32 {}
impl CborArrayElem for f16 {}
impl CborArrayElem for String {}
impl CborArrayElem for &str {}
impl CborArrayElem for Vec<u8> {}
impl CborArrayElem for &[u8] {}
impl CborArrayElem for Item {}
impl CborArrayElem for Map {}
impl<T: CborArrayElem> CborArrayElem for Vec<T> {}
impl<T> CborArrayElem for Option<T> {}
impl<K, V> CborArrayElem for BTreeMap<K, V> {}
