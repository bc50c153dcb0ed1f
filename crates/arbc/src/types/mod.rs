//! Value types of the language
//!
//! The type set is closed and flat: no arrays-of, no function types. A
//! function symbol records its return and parameter types as plain
//! [`ValueType`]s.

mod value_type;

pub use value_type::ValueType;
