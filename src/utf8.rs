use crate::{CborError, ErrorCode};

/// Validate a text-string payload found at `offset` in the input.
#[inline]
pub fn text_payload(bytes: &[u8], offset: usize) -> Result<&str, CborError> {
    #[cfg(feature = "simdutf8")]
    let checked = simdutf8::basic::from_utf8(bytes).ok();

    #[cfg(not(feature = "simdutf8"))]
    let checked = core::str::from_utf8(bytes).ok();

    checked.ok_or_else(|| CborError::new(ErrorCode::InvalidString, offset))
}
