use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::de::value::{MapDeserializer, SeqDeserializer, StrDeserializer};
use serde::de::{DeserializeOwned, EnumAccess, IntoDeserializer, VariantAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{forward_to_deserialize_any, Deserialize, Serialize, Serializer};

use crate::{decode, CborError, ErrorCode, Item, Map, Simple};

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unsigned(u) => serializer.serialize_u64(*u),
            Self::Negative(n) => match i64::try_from(*n) {
                Ok(n) => serializer.serialize_i64(-1 - n),
                Err(_) => serializer.serialize_i128(-1 - i128::from(*n)),
            },
            Self::ByteString(b) => serializer.serialize_bytes(b),
            Self::TextString(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => map.serialize(serializer),
            // The serde data model has no tags; the content stands in for the tagged item.
            Self::Tagged(_, inner) => inner.serialize(serializer),
            Self::Simple(Simple::False) => serializer.serialize_bool(false),
            Self::Simple(Simple::True) => serializer.serialize_bool(true),
            Self::Simple(Simple::Null) => serializer.serialize_unit(),
            Self::Simple(Simple::Float(v)) => serializer.serialize_f64(v.get()),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            m.serialize_entry(k, v)?;
        }
        m.end()
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ItemVisitor)
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Item::deserialize(deserializer)? {
            Item::Map(map) => Ok(map),
            _ => Err(serde::de::Error::custom("expected a map")),
        }
    }
}

struct ItemVisitor;

impl<'de> Visitor<'de> for ItemVisitor {
    type Value = Item;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a deterministic CBOR value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Item::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Item::from(v))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Item::integer(v).map_err(|_| E::custom("integer out of range"))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Item::from(v))
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(v)
            .map(Item::Unsigned)
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Item::float(v))
    }

    fn visit_char<E>(self, v: char) -> Result<Self::Value, E> {
        Ok(Item::TextString(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Item::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Item::TextString(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(Item::from(v))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(Item::ByteString(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Item::NULL)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Item::NULL)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Item::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(v) = seq.next_element::<Item>()? {
            items.push(v);
        }
        Ok(Item::Array(items))
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: serde::de::MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some((k, v)) = access.next_entry::<Item, Item>()? {
            if map.insert(k, v).is_some() {
                return Err(serde::de::Error::custom("duplicate map key"));
            }
        }
        Ok(Item::Map(map))
    }
}

/// Error raised while converting between serde types and items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerdeError {
    code: ErrorCode,
    message: String,
}

impl SerdeError {
    /// The error code this failure maps to.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    fn with_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }

    fn custom(message: impl fmt::Display) -> Self {
        Self {
            code: ErrorCode::Serde,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "serde conversion error: {}", self.code)
        } else {
            write!(f, "serde conversion error: {}", self.message)
        }
    }
}

impl std::error::Error for SerdeError {}

impl serde::ser::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::custom(msg)
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::custom(msg)
    }
}

impl From<SerdeError> for CborError {
    fn from(err: SerdeError) -> Self {
        Self::conversion(err.code)
    }
}

/// Serialize a Rust value into canonical CBOR bytes.
///
/// # Errors
///
/// Returns an error if the value has no item representation (e.g. a 128-bit integer outside the
/// CBOR integer range).
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CborError> {
    Ok(to_item(value)?.to_cbor_data())
}

/// Deserialize a Rust value from canonical CBOR bytes.
///
/// # Errors
///
/// Returns a decode error if the bytes are not canonical, or `Serde` if the decoded item does not
/// match the target type.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CborError> {
    let item = decode(bytes)?;
    from_item(&item)
}

/// Convert a Rust value into an [`Item`].
///
/// # Errors
///
/// Returns an error if the value has no item representation.
pub fn to_item<T: Serialize + ?Sized>(value: &T) -> Result<Item, CborError> {
    value.serialize(ItemSerializer).map_err(CborError::from)
}

/// Deserialize a Rust value from an [`Item`].
///
/// # Errors
///
/// Returns `Serde` if the item does not match the target type.
pub fn from_item<'de, T: Deserialize<'de>>(item: &'de Item) -> Result<T, CborError> {
    T::deserialize(ItemDeserializer(item)).map_err(CborError::from)
}

/// Externally tagged enum representation: `{ "Variant": content }`.
fn enum_map(variant: &str, content: Item) -> Item {
    let mut map = Map::new();
    map.insert(variant, content);
    Item::Map(map)
}

struct ItemSerializer;

impl Serializer for ItemSerializer {
    type Ok = Item;
    type Error = SerdeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = SeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = MapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Item, SerdeError> {
        Item::integer(v).map_err(|err| SerdeError::with_code(err.code))
    }

    fn serialize_u8(self, v: u8) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Item, SerdeError> {
        u64::try_from(v)
            .map(Item::Unsigned)
            .map_err(|_| SerdeError::with_code(ErrorCode::IntegerOutOfRange))
    }

    fn serialize_f32(self, v: f32) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Item, SerdeError> {
        Ok(Item::float(v))
    }

    fn serialize_char(self, v: char) -> Result<Item, SerdeError> {
        Ok(Item::TextString(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Item, SerdeError> {
        Ok(Item::from(v))
    }

    fn serialize_none(self) -> Result<Item, SerdeError> {
        Ok(Item::NULL)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Item, SerdeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Item, SerdeError> {
        Ok(Item::NULL)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Item, SerdeError> {
        Ok(Item::NULL)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Item, SerdeError> {
        Ok(enum_map(variant, Item::NULL))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Item, SerdeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Item, SerdeError> {
        Ok(enum_map(variant, value.serialize(Self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, SerdeError> {
        Ok(SeqSerializer::new(None, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, SerdeError> {
        Ok(SeqSerializer::new(None, Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, SerdeError> {
        Ok(SeqSerializer::new(None, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, SerdeError> {
        Ok(SeqSerializer::new(Some(variant), Some(len)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer, SerdeError> {
        Ok(MapSerializer::new(None))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<MapSerializer, SerdeError> {
        Ok(MapSerializer::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapSerializer, SerdeError> {
        Ok(MapSerializer::new(Some(variant)))
    }
}

struct SeqSerializer {
    variant: Option<&'static str>,
    items: Vec<Item>,
}

impl SeqSerializer {
    fn new(variant: Option<&'static str>, len: Option<usize>) -> Self {
        let items = len.map_or_else(Vec::new, Vec::with_capacity);
        Self { variant, items }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.items.push(value.serialize(ItemSerializer)?);
        Ok(())
    }

    fn finish(self) -> Item {
        let array = Item::Array(self.items);
        match self.variant {
            Some(variant) => enum_map(variant, array),
            None => array,
        }
    }
}

impl SerializeSeq for SeqSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.push(value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.push(value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.push(value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

impl serde::ser::SerializeTupleVariant for SeqSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        self.push(value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

struct MapSerializer {
    variant: Option<&'static str>,
    map: Map,
    next_key: Option<Item>,
}

impl MapSerializer {
    const fn new(variant: Option<&'static str>) -> Self {
        Self {
            variant,
            map: Map::new(),
            next_key: None,
        }
    }

    fn entry(&mut self, key: Item, value: Item) -> Result<(), SerdeError> {
        if self.map.insert(key, value).is_some() {
            return Err(SerdeError::with_code(ErrorCode::DuplicateMapKey));
        }
        Ok(())
    }

    fn finish(self) -> Item {
        let map = Item::Map(self.map);
        match self.variant {
            Some(variant) => enum_map(variant, map),
            None => map,
        }
    }
}

impl SerializeMap for MapSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), SerdeError> {
        self.next_key = Some(key.serialize(ItemSerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), SerdeError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| SerdeError::custom("map value without key"))?;
        let value = value.serialize(ItemSerializer)?;
        self.entry(key, value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

impl serde::ser::SerializeStruct for MapSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerdeError> {
        let value = value.serialize(ItemSerializer)?;
        self.entry(Item::from(key), value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

impl serde::ser::SerializeStructVariant for MapSerializer {
    type Ok = Item;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerdeError> {
        let value = value.serialize(ItemSerializer)?;
        self.entry(Item::from(key), value)
    }

    fn end(self) -> Result<Item, SerdeError> {
        Ok(self.finish())
    }
}

/// A serde [`Deserializer`](serde::Deserializer) reading from a borrowed [`Item`].
#[derive(Debug, Clone, Copy)]
pub struct ItemDeserializer<'de>(&'de Item);

impl<'de> ItemDeserializer<'de> {
    /// Wrap `item` for deserialization.
    #[must_use]
    pub const fn new(item: &'de Item) -> Self {
        Self(item)
    }
}

impl<'de> IntoDeserializer<'de, SerdeError> for &'de Item {
    type Deserializer = ItemDeserializer<'de>;

    fn into_deserializer(self) -> Self::Deserializer {
        ItemDeserializer(self)
    }
}

impl<'de> serde::Deserializer<'de> for ItemDeserializer<'de> {
    type Error = SerdeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, SerdeError> {
        match self.0 {
            Item::Unsigned(u) => visitor.visit_u64(*u),
            Item::Negative(n) => match i64::try_from(*n) {
                Ok(n) => visitor.visit_i64(-1 - n),
                Err(_) => visitor.visit_i128(-1 - i128::from(*n)),
            },
            Item::ByteString(b) => visitor.visit_borrowed_bytes(b),
            Item::TextString(s) => visitor.visit_borrowed_str(s),
            Item::Array(items) => {
                let mut seq = SeqDeserializer::<_, SerdeError>::new(items.iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Item::Map(map) => {
                let mut access = MapDeserializer::<_, SerdeError>::new(map.iter());
                let value = visitor.visit_map(&mut access)?;
                access.end()?;
                Ok(value)
            }
            Item::Tagged(_, inner) => Self(inner).deserialize_any(visitor),
            Item::Simple(Simple::False) => visitor.visit_bool(false),
            Item::Simple(Simple::True) => visitor.visit_bool(true),
            Item::Simple(Simple::Null) => visitor.visit_unit(),
            Item::Simple(Simple::Float(v)) => visitor.visit_f64(v.get()),
        }
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, SerdeError> {
        match self.0.as_f64() {
            Some(v) => visitor.visit_f64(v),
            None => self.deserialize_any(visitor),
        }
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, SerdeError> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, SerdeError> {
        if self.0.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, SerdeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, SerdeError> {
        match self.0 {
            Item::TextString(variant) => visitor.visit_enum(VariantDeserializer {
                variant,
                content: None,
            }),
            Item::Map(map) if map.len() == 1 => {
                let (k, v) = map
                    .iter()
                    .next()
                    .ok_or_else(|| SerdeError::custom("empty enum map"))?;
                let variant = k
                    .as_text()
                    .ok_or_else(|| SerdeError::custom("enum variant must be text"))?;
                visitor.visit_enum(VariantDeserializer {
                    variant,
                    content: Some(v),
                })
            }
            _ => Err(SerdeError::with_code(ErrorCode::WrongType)),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct VariantDeserializer<'de> {
    variant: &'de str,
    content: Option<&'de Item>,
}

impl<'de> EnumAccess<'de> for VariantDeserializer<'de> {
    type Error = SerdeError;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self), SerdeError>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let name: StrDeserializer<'_, SerdeError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for VariantDeserializer<'de> {
    type Error = SerdeError;

    fn unit_variant(self) -> Result<(), SerdeError> {
        match self.content {
            None => Ok(()),
            Some(item) if item.is_null() => Ok(()),
            Some(_) => Err(SerdeError::with_code(ErrorCode::WrongType)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, SerdeError>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        let item = self
            .content
            .ok_or_else(|| SerdeError::with_code(ErrorCode::WrongType))?;
        seed.deserialize(ItemDeserializer(item))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, SerdeError> {
        let item = self
            .content
            .ok_or_else(|| SerdeError::with_code(ErrorCode::WrongType))?;
        serde::Deserializer::deserialize_seq(ItemDeserializer(item), visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, SerdeError> {
        let item = self
            .content
            .ok_or_else(|| SerdeError::with_code(ErrorCode::WrongType))?;
        serde::Deserializer::deserialize_map(ItemDeserializer(item), visitor)
    }
}
