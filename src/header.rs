use alloc::vec::Vec;

use crate::{CborError, ErrorCode};

/// The 3-bit major type of a CBOR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MajorType {
    /// Major type 0.
    Unsigned,
    /// Major type 1.
    Negative,
    /// Major type 2.
    ByteString,
    /// Major type 3.
    TextString,
    /// Major type 4.
    Array,
    /// Major type 5.
    Map,
    /// Major type 6.
    Tagged,
    /// Major type 7: simple values and floats.
    Simple,
}

impl MajorType {
    /// The 3-bit value placed in the top of the header byte.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Unsigned => 0,
            Self::Negative => 1,
            Self::ByteString => 2,
            Self::TextString => 3,
            Self::Array => 4,
            Self::Map => 5,
            Self::Tagged => 6,
            Self::Simple => 7,
        }
    }

    /// Major type of a header byte.
    #[inline]
    #[must_use]
    pub const fn from_initial_byte(byte: u8) -> Self {
        match byte >> 5 {
            0 => Self::Unsigned,
            1 => Self::Negative,
            2 => Self::ByteString,
            3 => Self::TextString,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tagged,
            _ => Self::Simple,
        }
    }
}

/// Low five bits announcing a one-byte argument.
pub(crate) const AI_U8: u8 = 24;
/// Low five bits announcing a two-byte argument (or a half float).
pub(crate) const AI_U16: u8 = 25;
/// Low five bits announcing a four-byte argument (or a single float).
pub(crate) const AI_U32: u8 = 26;
/// Low five bits announcing an eight-byte argument (or a double float).
pub(crate) const AI_U64: u8 = 27;

/// Number of bytes the canonical header for `value` occupies.
#[inline]
#[must_use]
pub const fn header_len(value: u64) -> usize {
    if value < 24 {
        1
    } else if value <= 0xff {
        2
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Append the shortest header for `(major, value)` to `out`.
pub fn encode_header(out: &mut Vec<u8>, major: MajorType, value: u64) {
    let m = major.bits() << 5;
    if let Ok(v8) = u8::try_from(value) {
        if v8 < 24 {
            out.push(m | v8);
        } else {
            out.push(m | AI_U8);
            out.push(v8);
        }
    } else if let Ok(v16) = u16::try_from(value) {
        out.push(m | AI_U16);
        out.extend_from_slice(&v16.to_be_bytes());
    } else if let Ok(v32) = u32::try_from(value) {
        out.push(m | AI_U32);
        out.extend_from_slice(&v32.to_be_bytes());
    } else {
        out.push(m | AI_U64);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Encode a canonical header into a fresh buffer.
#[must_use]
pub fn header_bytes(major: MajorType, value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(header_len(value));
    encode_header(&mut out, major, value);
    out
}

/// A decoded header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub major: MajorType,
    /// Low five bits of the initial byte.
    pub ai: u8,
    /// Argument value, or raw float bits for major type 7 with `ai` 25..=27.
    pub arg: u64,
    /// Offset of the initial byte.
    pub offset: usize,
}

/// Byte cursor over a decode input.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, CborError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| CborError::new(ErrorCode::Underrun, self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CborError> {
        let off = self.pos;
        let end = off
            .checked_add(n)
            .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, off))?;
        if end > self.data.len() {
            return Err(CborError::new(ErrorCode::Underrun, off));
        }
        let s = &self.data[off..end];
        self.pos = end;
        Ok(s)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CborError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Read one header with the canonical-argument checks applied.
    ///
    /// Major type 7 with a 2, 4 or 8 byte payload is a float: the raw bits are returned
    /// unchecked and the float canonicalizer validates them.
    pub fn read_header(&mut self) -> Result<Header, CborError> {
        let offset = self.pos;
        let initial = self.read_u8()?;
        let major = MajorType::from_initial_byte(initial);
        let ai = initial & 0x1f;
        let is_float = major == MajorType::Simple && matches!(ai, AI_U16..=AI_U64);
        let arg = match ai {
            0..=23 => u64::from(ai),
            AI_U8 => {
                let v = self.read_u8()?;
                if v < 24 {
                    return Err(CborError::new(ErrorCode::NonCanonicalNumeric, offset));
                }
                u64::from(v)
            }
            AI_U16 => {
                let v = u16::from_be_bytes(self.read_array()?);
                if !is_float && u8::try_from(v).is_ok() {
                    return Err(CborError::new(ErrorCode::NonCanonicalNumeric, offset));
                }
                u64::from(v)
            }
            AI_U32 => {
                let v = u32::from_be_bytes(self.read_array()?);
                if !is_float && u16::try_from(v).is_ok() {
                    return Err(CborError::new(ErrorCode::NonCanonicalNumeric, offset));
                }
                u64::from(v)
            }
            AI_U64 => {
                let v = u64::from_be_bytes(self.read_array()?);
                if !is_float && u32::try_from(v).is_ok() {
                    return Err(CborError::new(ErrorCode::NonCanonicalNumeric, offset));
                }
                v
            }
            _ => return Err(CborError::new(ErrorCode::BadHeaderValue(ai), offset)),
        };
        Ok(Header {
            major,
            ai,
            arg,
            offset,
        })
    }

    /// Convert a header length argument to `usize`.
    pub fn len_arg(&self, header: &Header) -> Result<usize, CborError> {
        usize::try_from(header.arg)
            .map_err(|_| CborError::new(ErrorCode::LengthOverflow, header.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_forms_are_shortest() {
        assert_eq!(header_bytes(MajorType::Unsigned, 23), [0x17]);
        assert_eq!(header_bytes(MajorType::Unsigned, 24), [0x18, 0x18]);
        assert_eq!(header_bytes(MajorType::Negative, 255), [0x38, 0xff]);
        assert_eq!(header_bytes(MajorType::Array, 256), [0x99, 0x01, 0x00]);
        assert_eq!(
            header_bytes(MajorType::Map, 65_536),
            [0xba, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            header_bytes(MajorType::Tagged, 1 << 32),
            [0xdb, 0, 0, 0, 1, 0, 0, 0, 0]
        );
        for v in [0, 23, 24, 255, 256, 65_535, 65_536, u64::from(u32::MAX), u64::MAX] {
            assert_eq!(header_bytes(MajorType::Unsigned, v).len(), header_len(v));
        }
    }

    #[test]
    fn read_header_rejects_overlong_arguments() {
        for bytes in [
            &[0x18, 0x17][..],
            &[0x19, 0x00, 0xff],
            &[0x1a, 0x00, 0x00, 0xff, 0xff],
            &[0x1b, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff],
        ] {
            let err = Cursor::new(bytes).read_header().unwrap_err();
            assert_eq!(err.code, ErrorCode::NonCanonicalNumeric);
            assert_eq!(err.offset, 0);
        }
    }

    #[test]
    fn read_header_passes_float_bits_through() {
        let h = Cursor::new(&[0xf9, 0x00, 0x01]).read_header().unwrap();
        assert_eq!(h.major, MajorType::Simple);
        assert_eq!(h.ai, AI_U16);
        assert_eq!(h.arg, 1);
    }

    #[test]
    fn read_header_reports_underrun_first() {
        let err = Cursor::new(&[0x19, 0x01]).read_header().unwrap_err();
        assert_eq!(err.code, ErrorCode::Underrun);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn read_header_rejects_reserved_and_indefinite() {
        for ai in 28..=31u8 {
            let err = Cursor::new(&[0x40 | ai]).read_header().unwrap_err();
            assert_eq!(err.code, ErrorCode::BadHeaderValue(ai));
        }
    }
}
