use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::canonical::CborBytesRef;
use crate::float::{validate_double, validate_half, validate_single, CanonicalF64};
use crate::header::{Cursor, Header, MajorType, AI_U16, AI_U32, AI_U8};
use crate::{utf8, CborError, DecodeLimits, ErrorCode, Item, Map, Simple};

const SIMPLE_FALSE: u64 = 20;
const SIMPLE_TRUE: u64 = 21;
const SIMPLE_NULL: u64 = 22;

struct Parser<'a> {
    cursor: Cursor<'a>,
    limits: DecodeLimits,
}

impl<'a> Parser<'a> {
    const fn new(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            cursor: Cursor::new(data),
            limits,
        }
    }

    fn enter(&self, header: &Header, depth: usize) -> Result<usize, CborError> {
        let next = depth + 1;
        if next > self.limits.max_depth {
            return Err(CborError::new(
                ErrorCode::DepthLimitExceeded,
                header.offset,
            ));
        }
        Ok(next)
    }

    /// Preallocation hint: a declared count can never exceed the bytes left.
    fn capacity_hint(&self, len: usize) -> usize {
        len.min(self.cursor.remaining())
    }

    fn parse_item(&mut self, depth: usize) -> Result<Item, CborError> {
        let header = self.cursor.read_header()?;
        match header.major {
            MajorType::Unsigned => Ok(Item::Unsigned(header.arg)),
            MajorType::Negative => Ok(Item::Negative(header.arg)),
            MajorType::ByteString => {
                let len = self.cursor.len_arg(&header)?;
                Ok(Item::ByteString(self.cursor.read_exact(len)?.to_vec()))
            }
            MajorType::TextString => {
                let len = self.cursor.len_arg(&header)?;
                let start = self.cursor.position();
                let raw = self.cursor.read_exact(len)?;
                Ok(Item::TextString(utf8::text_payload(raw, start)?.to_string()))
            }
            MajorType::Array => {
                let depth = self.enter(&header, depth)?;
                let len = self.cursor.len_arg(&header)?;
                let mut items = Vec::with_capacity(self.capacity_hint(len));
                for _ in 0..len {
                    items.push(self.parse_item(depth)?);
                }
                Ok(Item::Array(items))
            }
            MajorType::Map => {
                let depth = self.enter(&header, depth)?;
                let len = self.cursor.len_arg(&header)?;
                let mut map = Map::new();
                for _ in 0..len {
                    let key_offset = self.cursor.position();
                    let key = self.parse_item(depth)?;
                    let value = self.parse_item(depth)?;
                    map.insert_next(key, value)
                        .map_err(|code| CborError::new(code, key_offset))?;
                }
                Ok(Item::Map(map))
            }
            MajorType::Tagged => {
                let depth = self.enter(&header, depth)?;
                let inner = self.parse_item(depth)?;
                Ok(Item::Tagged(header.arg, Box::new(inner)))
            }
            MajorType::Simple => parse_simple(&header),
        }
    }
}

fn parse_simple(header: &Header) -> Result<Item, CborError> {
    let at = |code| CborError::new(code, header.offset);
    // Float payloads are 2, 4 or 8 bytes and fit their width by construction.
    #[allow(clippy::cast_possible_truncation)]
    let value = match header.ai {
        AI_U16 => validate_half(header.arg as u16).map_err(at)?,
        AI_U32 => validate_single(header.arg as u32).map_err(at)?,
        AI_U8 => return Err(at(ErrorCode::InvalidSimple)),
        0..=23 => {
            return match header.arg {
                SIMPLE_FALSE => Ok(Item::FALSE),
                SIMPLE_TRUE => Ok(Item::TRUE),
                SIMPLE_NULL => Ok(Item::NULL),
                _ => Err(at(ErrorCode::InvalidSimple)),
            }
        }
        _ => validate_double(header.arg).map_err(at)?,
    };
    Ok(Item::Simple(Simple::Float(CanonicalF64::from_non_integral(value))))
}

#[cfg(feature = "tracing")]
fn log_rejection(err: &CborError) {
    tracing::debug!(
        target: "dcbor::decode",
        code = ?err.code,
        offset = err.offset,
        "rejected cbor input"
    );
}

#[cfg(not(feature = "tracing"))]
#[allow(clippy::missing_const_for_fn)]
fn log_rejection(_err: &CborError) {}

/// Decode one canonical CBOR item that spans the whole of `bytes`.
///
/// # Errors
///
/// Returns the first canonicality violation found; see [`ErrorCode`].
pub fn decode(bytes: &[u8]) -> Result<Item, CborError> {
    decode_with_limits(bytes, DecodeLimits::default())
}

/// Decode one canonical CBOR item under explicit resource limits.
///
/// # Errors
///
/// Returns `InputTooLarge` or `DepthLimitExceeded` when a limit is hit, and otherwise the first
/// canonicality violation found.
pub fn decode_with_limits(bytes: &[u8], limits: DecodeLimits) -> Result<Item, CborError> {
    decode_inner(bytes, limits).map_err(|err| {
        log_rejection(&err);
        err
    })
}

fn decode_inner(bytes: &[u8], limits: DecodeLimits) -> Result<Item, CborError> {
    if bytes.len() > limits.max_input_bytes {
        return Err(CborError::new(ErrorCode::InputTooLarge, 0));
    }
    let mut parser = Parser::new(bytes, limits);
    let item = parser.parse_item(0)?;
    let unused = parser.cursor.remaining();
    if unused != 0 {
        return Err(CborError::new(
            ErrorCode::UnusedData(unused),
            parser.cursor.position(),
        ));
    }
    Ok(item)
}

/// Check that `bytes` is exactly one canonical CBOR item and borrow it as such.
///
/// # Errors
///
/// Same as [`decode_with_limits`].
pub fn validate_canonical(bytes: &[u8], limits: DecodeLimits) -> Result<CborBytesRef<'_>, CborError> {
    decode_with_limits(bytes, limits)?;
    Ok(CborBytesRef::new(bytes))
}
