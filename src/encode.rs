use alloc::vec::Vec;

use crate::float::{canonicalize, CanonicalFloat};
use crate::header::{encode_header, MajorType, AI_U16, AI_U32, AI_U64};
use crate::{Item, Map, Simple};

const SIMPLE_FALSE: u8 = 0xf4;
const SIMPLE_TRUE: u8 = 0xf5;
const SIMPLE_NULL: u8 = 0xf6;

/// Streaming canonical encoder.
///
/// Every write emits the shortest header form, so the output is canonical as long as the caller
/// announces correct container lengths and writes map keys in canonical order. [`Item`] encoding
/// goes through this type and always satisfies both.
#[derive(Debug, Default, Clone)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create an empty encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an encoder with reserved capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true iff nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the encoder and return its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Write an unsigned integer.
    pub fn unsigned(&mut self, v: u64) -> &mut Self {
        encode_header(&mut self.buf, MajorType::Unsigned, v);
        self
    }

    /// Write the negative integer `-1 - n`.
    pub fn negative(&mut self, n: u64) -> &mut Self {
        encode_header(&mut self.buf, MajorType::Negative, n);
        self
    }

    /// Write a byte string.
    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        encode_header(&mut self.buf, MajorType::ByteString, b.len() as u64);
        self.buf.extend_from_slice(b);
        self
    }

    /// Write a text string.
    pub fn text(&mut self, s: &str) -> &mut Self {
        let b = s.as_bytes();
        encode_header(&mut self.buf, MajorType::TextString, b.len() as u64);
        self.buf.extend_from_slice(b);
        self
    }

    /// Write an array header announcing `len` elements.
    pub fn array_header(&mut self, len: usize) -> &mut Self {
        encode_header(&mut self.buf, MajorType::Array, len as u64);
        self
    }

    /// Write a map header announcing `len` entries.
    pub fn map_header(&mut self, len: usize) -> &mut Self {
        encode_header(&mut self.buf, MajorType::Map, len as u64);
        self
    }

    /// Write a tag header. Exactly one item must follow.
    pub fn tag(&mut self, tag: u64) -> &mut Self {
        encode_header(&mut self.buf, MajorType::Tagged, tag);
        self
    }

    /// Write `true` or `false`.
    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.buf.push(if v { SIMPLE_TRUE } else { SIMPLE_FALSE });
        self
    }

    /// Write `null`.
    pub fn null(&mut self) -> &mut Self {
        self.buf.push(SIMPLE_NULL);
        self
    }

    /// Write a float in its canonical form (integers collapse, narrowest exact width).
    pub fn float(&mut self, v: f64) -> &mut Self {
        let m = MajorType::Simple.bits() << 5;
        match canonicalize(v) {
            CanonicalFloat::Unsigned(u) => return self.unsigned(u),
            CanonicalFloat::Negative(n) => return self.negative(n),
            CanonicalFloat::Half(bits) => {
                self.buf.push(m | AI_U16);
                self.buf.extend_from_slice(&bits.to_be_bytes());
            }
            CanonicalFloat::Single(bits) => {
                self.buf.push(m | AI_U32);
                self.buf.extend_from_slice(&bits.to_be_bytes());
            }
            CanonicalFloat::Double(bits) => {
                self.buf.push(m | AI_U64);
                self.buf.extend_from_slice(&bits.to_be_bytes());
            }
        }
        self
    }

    /// Append already-canonical encoded bytes verbatim.
    pub fn raw(&mut self, encoded: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(encoded);
        self
    }

    /// Write an item depth-first.
    pub fn item(&mut self, item: &Item) -> &mut Self {
        match item {
            Item::Unsigned(u) => self.unsigned(*u),
            Item::Negative(n) => self.negative(*n),
            Item::ByteString(b) => self.bytes(b),
            Item::TextString(s) => self.text(s),
            Item::Array(items) => {
                self.array_header(items.len());
                for child in items {
                    self.item(child);
                }
                self
            }
            Item::Map(map) => self.map(map),
            Item::Tagged(tag, inner) => self.tag(*tag).item(inner),
            Item::Simple(Simple::False) => self.bool(false),
            Item::Simple(Simple::True) => self.bool(true),
            Item::Simple(Simple::Null) => self.null(),
            Item::Simple(Simple::Float(v)) => self.float(v.get()),
        }
    }

    /// Write a map; entries are already held in canonical order.
    pub fn map(&mut self, map: &Map) -> &mut Self {
        self.map_header(map.len());
        for (key, _, value) in map.encoded_entries() {
            self.raw(key).item(value);
        }
        self
    }
}

/// Append the canonical encoding of `item` to `out`.
pub fn encode_into(item: &Item, out: &mut Vec<u8>) {
    let mut enc = Encoder {
        buf: core::mem::take(out),
    };
    enc.item(item);
    *out = enc.into_vec();
}

impl Item {
    /// The canonical encoding of this item.
    #[must_use]
    pub fn to_cbor_data(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.item(self);
        enc.into_vec()
    }
}
