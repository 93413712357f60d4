//! Canonical float width selection and decode-side validation.
//!
//! A float is written in the narrowest of half, single and double precision that reproduces it
//! exactly. Values that are mathematically integers are written as CBOR integers instead, and
//! every NaN collapses to the half-precision quiet NaN `0x7e00`.

use core::fmt;

use half::f16;

use crate::ErrorCode;

/// The canonical half-precision NaN bit pattern.
pub const CANONICAL_NAN_BITS: u16 = 0x7e00;

/// A float with no exact integer value: the payload of [`Simple::Float`](crate::Simple::Float).
///
/// Integral values (including `-0.0`) are items of major type 0 or 1, so they can never be
/// wrapped here. This keeps every float item distinct from every integer item.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct CanonicalF64(f64);

impl CanonicalF64 {
    /// Wrap `v`, or `None` when `v` is an exact integer.
    #[must_use]
    pub fn new(v: f64) -> Option<Self> {
        (!is_exact_integer(v)).then_some(Self(v))
    }

    /// The wrapped value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Wrap a value already known to be non-integral.
    pub(crate) const fn from_non_integral(v: f64) -> Self {
        Self(v)
    }
}

impl From<CanonicalF64> for f64 {
    fn from(v: CanonicalF64) -> Self {
        v.0
    }
}

impl fmt::Debug for CanonicalF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Canonical wire form of a floating-point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CanonicalFloat {
    /// Integral, non-negative: major type 0.
    Unsigned(u64),
    /// Integral, negative: major type 1 with magnitude `-1 - v`.
    Negative(u64),
    Half(u16),
    Single(u32),
    Double(u64),
}

/// `v` as an unsigned integer, when it is one exactly. `-0.0` maps to `0`.
#[must_use]
pub(crate) fn exact_u64(v: f64) -> Option<u64> {
    // 2^64 is the first value outside the u64 range.
    if !(0.0..18_446_744_073_709_551_616.0).contains(&v) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let u = v as u64;
    #[allow(clippy::cast_precision_loss)]
    let back = u as f64;
    (back == v).then_some(u)
}

/// `v` as a signed integer, when it is one exactly.
#[must_use]
pub(crate) fn exact_i64(v: f64) -> Option<i64> {
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&v) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let i = v as i64;
    #[allow(clippy::cast_precision_loss)]
    let back = i as f64;
    (back == v).then_some(i)
}

fn is_exact_integer(v: f64) -> bool {
    exact_u64(v).is_some() || exact_i64(v).is_some()
}

fn fits_half(v: f64) -> bool {
    f16::from_f64(v).to_f64() == v
}

fn fits_single(v: f64) -> bool {
    #[allow(clippy::cast_possible_truncation)]
    let narrowed = v as f32;
    f64::from(narrowed) == v
}

/// Select the canonical encoding for `v`.
#[must_use]
pub(crate) fn canonicalize(v: f64) -> CanonicalFloat {
    if v.is_nan() {
        return CanonicalFloat::Half(CANONICAL_NAN_BITS);
    }
    if let Some(u) = exact_u64(v) {
        return CanonicalFloat::Unsigned(u);
    }
    if v < 0.0 {
        if let Some(n) = exact_i64(v).and_then(|i| u64::try_from(-1 - i).ok()) {
            return CanonicalFloat::Negative(n);
        }
    }
    if fits_half(v) {
        CanonicalFloat::Half(f16::from_f64(v).to_bits())
    } else if fits_single(v) {
        #[allow(clippy::cast_possible_truncation)]
        let single = v as f32;
        CanonicalFloat::Single(single.to_bits())
    } else {
        CanonicalFloat::Double(v.to_bits())
    }
}

/// Validate a half-precision payload.
///
/// # Errors
///
/// `NonCanonicalNumeric` for a non-canonical NaN or an integral value.
pub(crate) fn validate_half(bits: u16) -> Result<f64, ErrorCode> {
    let h = f16::from_bits(bits);
    if h.is_nan() {
        return if bits == CANONICAL_NAN_BITS {
            Ok(f64::NAN)
        } else {
            Err(ErrorCode::NonCanonicalNumeric)
        };
    }
    let v = h.to_f64();
    if is_exact_integer(v) {
        return Err(ErrorCode::NonCanonicalNumeric);
    }
    Ok(v)
}

/// Validate a single-precision payload.
///
/// # Errors
///
/// `NonCanonicalNumeric` for any NaN, a value half precision would carry, or an integral value.
pub(crate) fn validate_single(bits: u32) -> Result<f64, ErrorCode> {
    let v = f64::from(f32::from_bits(bits));
    if v.is_nan() || fits_half(v) || is_exact_integer(v) {
        return Err(ErrorCode::NonCanonicalNumeric);
    }
    Ok(v)
}

/// Validate a double-precision payload.
///
/// # Errors
///
/// `NonCanonicalNumeric` for any NaN, a value single precision would carry, or an integral value.
pub(crate) fn validate_double(bits: u64) -> Result<f64, ErrorCode> {
    let v = f64::from_bits(bits);
    if v.is_nan() || fits_single(v) || is_exact_integer(v) {
        return Err(ErrorCode::NonCanonicalNumeric);
    }
    Ok(v)
}
