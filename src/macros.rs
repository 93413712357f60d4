//! CBOR construction macro.
//!
//! [`cbor!`] builds [`crate::Item`] trees with a JSON-like literal syntax. Maps are assembled
//! through [`crate::Map::insert`], so entries land in canonical key order and a repeated key keeps
//! its last value.
//!
//! Map key rules:
//! - `{ a: 1 }` uses the text key `"a"` (identifier stringized)
//! - `{ 1: "x", -1: "y", "k": 2, [1]: 3 }` use the literal item as the key
//! - `{ (k): 1 }` uses the expression `k` as the key
//!
//! ```
//! use dcbor::cbor;
//!
//! let label = "dynamic";
//! let v = cbor!({
//!     1: -2,
//!     a: [true, null, 1.5],
//!     (label): { "nested": b"raw" },
//! });
//! assert_eq!(v.to_string(), r#"{1: -2, "a": [true, null, 1.5], "dynamic": {"nested": h'726177'}}"#);
//! ```

/// Construct a [`crate::Item`] using a JSON-like literal syntax.
///
/// Supported forms:
/// - `cbor!(null)`, `cbor!(true)`, `cbor!(false)`
/// - `cbor!("text")`, `cbor!(b"bytes")`, `cbor!(42)`, `cbor!(-7)`, `cbor!(1.5)`
/// - `cbor!([ ... ])`
/// - `cbor!({ key: value, ... })`
/// - `cbor!(expr)` where `expr` converts with `Item::from`; multi-token expressions inside arrays
///   and maps need parentheses.
#[macro_export]
macro_rules! cbor {
    (null) => {
        $crate::Item::NULL
    };
    (true) => {
        $crate::Item::TRUE
    };
    (false) => {
        $crate::Item::FALSE
    };
    ([ $($elems:tt)* ]) => {{
        #[allow(unused_mut)]
        let mut items = $crate::__cbor_macro::Vec::<$crate::Item>::new();
        $crate::__cbor_array!(items; $($elems)*);
        $crate::Item::Array(items)
    }};
    ({ $($entries:tt)* }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::Map::new();
        $crate::__cbor_map!(map; $($entries)*);
        $crate::Item::Map(map)
    }};
    ($other:expr) => {
        $crate::Item::from($other)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cbor_array {
    ($items:ident;) => {};
    ($items:ident; - $lit:literal $(, $($rest:tt)*)?) => {
        $items.push($crate::cbor!(- $lit));
        $($crate::__cbor_array!($items; $($rest)*);)?
    };
    ($items:ident; $elem:tt $(, $($rest:tt)*)?) => {
        $items.push($crate::cbor!($elem));
        $($crate::__cbor_array!($items; $($rest)*);)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cbor_map {
    ($map:ident;) => {};
    ($map:ident; - $key:literal : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::cbor!(- $key)); $($rest)*);
    };
    ($map:ident; null : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::Item::NULL); $($rest)*);
    };
    ($map:ident; true : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::Item::TRUE); $($rest)*);
    };
    ($map:ident; false : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::Item::FALSE); $($rest)*);
    };
    ($map:ident; $key:ident : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::Item::text(::core::stringify!($key))); $($rest)*);
    };
    ($map:ident; $key:tt : $($rest:tt)*) => {
        $crate::__cbor_map_value!($map; ($crate::cbor!($key)); $($rest)*);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __cbor_map_value {
    ($map:ident; ($key:expr); - $value:literal $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::cbor!(- $value));
        $($crate::__cbor_map!($map; $($rest)*);)?
    };
    ($map:ident; ($key:expr); $value:tt $(, $($rest:tt)*)?) => {
        $map.insert($key, $crate::cbor!($value));
        $($crate::__cbor_map!($map; $($rest)*);)?
    };
}

/// Hidden support module used by `cbor!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __cbor_macro {
    pub use alloc::vec::Vec;
}
