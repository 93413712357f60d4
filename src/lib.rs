//! # dcbor
//!
//! Deterministic CBOR: an in-memory item model, a canonical encoder, a strict decoder that rejects
//! every non-canonical encoding, and human-readable diagnostic and annotated hex output.
//!
//! ## Design principles
//!
//! - **One item, one encoding.**
//!   Every [`Item`] has exactly one byte representation, so semantic equality of two items reduces
//!   to equality of their encoded bytes.
//! - **The decoder is the gatekeeper.**
//!   [`decode`] accepts only byte strings that [`Item::to_cbor_data`] would have produced.
//! - **Order is structural.**
//!   [`Map`] keeps entries sorted by encoded key bytes at all times; there is no separate sort step.
//!
//! ## Deterministic encoding profile
//!
//! This crate implements the RFC 8949 §4.2.1 core deterministic encoding with the numeric
//! reductions commonly called dCBOR.
//!
//! **Allowed data model**
//!
//! - Single CBOR item only (no trailing bytes).
//! - Definite-length items only (no indefinite-length encodings).
//! - Map keys may be any item; keys must be unique.
//! - Any tag number on any content.
//! - Simple values `false`, `true`, `null`, and floats; no other simple values.
//!
//! **Canonical encoding constraints**
//!
//! - Minimal integer and length encoding (no overlong forms).
//! - Map keys strictly increasing by bytewise lexicographic order of their encodings.
//! - Floats with an exact integer value are encoded as that integer (including `-0.0` as `0`).
//! - Other floats use the shortest of half, single and double precision that preserves the value.
//! - Every NaN is encoded as the half-precision quiet NaN `f97e00`.
//!
//! ```
//! use dcbor::{cbor, decode, Item};
//!
//! let item = cbor!({ 1: 45.7, 2: "Hi there!" });
//! let bytes = item.to_cbor_data();
//! assert_eq!(hex::encode(&bytes), "a201fb4046d9999999999a0269486920746865726521");
//! assert_eq!(decode(&bytes)?, item);
//! # Ok::<(), dcbor::CborError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`].
//! - `sha2` *(default)*: enables SHA-256 hashing helpers for canonical bytes.
//! - `serde`: serde `Serialize`/`Deserialize` for [`Item`] plus `to_vec`/`from_slice`.
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//! - `tracing`: emits a `debug` event (target `dcbor::decode`) for every rejected input.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible and requires an allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod canonical;
mod convert;
mod decode;
mod diag;
mod dump;
mod encode;
mod error;
mod float;
mod header;
mod item;
mod limits;
mod macros;
mod map;
#[cfg(feature = "serde")]
mod serde_impl;
mod tags;
pub(crate) mod utf8;

pub use crate::canonical::{CborBytes, CborBytesRef};
pub use crate::convert::{decode_tagged, CborArrayElem, CborDecode, CborEncode, CborTagged};
pub use crate::decode::{decode, decode_with_limits, validate_canonical};
pub use crate::encode::{encode_into, Encoder};
pub use crate::error::{CborError, ErrorCode};
pub use crate::float::{CanonicalF64, CANONICAL_NAN_BITS};
pub use crate::header::{encode_header, header_bytes, header_len, MajorType};
pub use crate::item::{Item, Simple};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_DEPTH};
#[doc(hidden)]
pub use crate::macros::__cbor_macro;
pub use crate::map::{Iter as MapIter, Map};
pub use crate::tags::{TagResolver, TagsStore, TAG_DATE, TAG_ENCODED_CBOR};

#[cfg(feature = "serde")]
pub use crate::serde_impl::{from_item, from_slice, to_item, to_vec, ItemDeserializer, SerdeError};
