//! Convert flat, path-encoded key/value pairs (`profile[0].name`,
//! `user.address[0].street`) into nested object/array trees, and read or
//! mutate such trees through bracket/dot path strings.
//!
//! The two halves are independent: [`build`] normalizes a whole flat
//! collection at once and never fails, while the accessors
//! ([`get_value`], [`set_value`], [`has_value`], [`delete_value`])
//! operate on a single strictly-validated path against an existing tree.

pub mod access;
pub mod build;
pub mod error;
pub mod path;
pub mod value;

pub use crate::access::{delete_value, get_value, get_value_or, has_value, set_value};
pub use crate::build::{build, normalize};
pub use crate::error::Error;
pub use crate::path::{parse_path, split_key, Segment, Segments};
pub use crate::value::{FileRef, Map, RawValue, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience for call sites holding borrowed pairs: clones keys and
/// wraps string values before delegating to [`build`].
pub fn build_from_pairs<'a, I>(pairs: I) -> Map
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    build(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), RawValue::from(value))),
    )
}
