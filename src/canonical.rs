use alloc::vec::Vec;

use crate::{decode_with_limits, CborError, DecodeLimits, Item};

/// A validated canonical CBOR data item borrowed from an input buffer.
///
/// Produced by [`crate::validate_canonical`]. The bytes are guaranteed to be exactly one CBOR
/// data item in deterministic form, so byte equality is semantic equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CborBytesRef<'a> {
    bytes: &'a [u8],
}

impl<'a> CborBytesRef<'a> {
    #[inline]
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Return the canonical bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(self) -> &'a [u8] {
        self.bytes
    }

    /// Length in bytes of the canonical representation.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` iff the encoding is empty (this never happens for a valid item).
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode into an [`Item`].
    ///
    /// The bytes already passed validation under the caller's limits, so the depth bound here
    /// is the byte length: every nesting level takes at least one byte.
    ///
    /// # Errors
    ///
    /// Never fails for bytes produced by validation; the signature mirrors [`crate::decode`].
    pub fn to_item(self) -> Result<Item, CborError> {
        let limits = DecodeLimits::for_bytes(self.bytes.len()).with_max_depth(self.bytes.len());
        decode_with_limits(self.bytes, limits)
    }

    /// Compute the SHA-256 digest of the canonical bytes.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(self.bytes);
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        digest
    }

    /// Copy into an owned [`CborBytes`].
    #[must_use]
    pub fn to_owned(self) -> CborBytes {
        CborBytes {
            bytes: self.bytes.to_vec(),
        }
    }
}

impl AsRef<[u8]> for CborBytesRef<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

/// An owned canonical CBOR data item.
///
/// Useful for durable storage and hashing of canonical values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CborBytes {
    bytes: Vec<u8>,
}

impl CborBytes {
    /// Validate and copy `bytes` into an owned canonical representation.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` are not exactly one canonical CBOR data item.
    pub fn from_slice(bytes: &[u8], limits: DecodeLimits) -> Result<Self, CborError> {
        let canon = crate::validate_canonical(bytes, limits)?;
        Ok(canon.to_owned())
    }

    /// Borrow as a [`CborBytesRef`].
    #[inline]
    #[must_use]
    pub fn as_canonical_ref(&self) -> CborBytesRef<'_> {
        CborBytesRef::new(&self.bytes)
    }

    /// Borrow the canonical bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the canonical bytes.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Compute the SHA-256 digest of the canonical bytes.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        self.as_canonical_ref().sha256()
    }
}

impl AsRef<[u8]> for CborBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&Item> for CborBytes {
    fn from(item: &Item) -> Self {
        Self {
            bytes: item.to_cbor_data(),
        }
    }
}

impl Item {
    /// The canonical encoding of this item as owned canonical bytes.
    #[must_use]
    pub fn to_canonical(&self) -> CborBytes {
        CborBytes::from(self)
    }

    /// SHA-256 digest of the canonical encoding.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        self.to_canonical().sha256()
    }
}
