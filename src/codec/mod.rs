//! Compact wire encoding for identifier lists.
//!
//! Three layers, innermost first:
//! - [`varint`]: packs numeric ids into continuation-bit varints, with a
//!   marker for bright-line ids
//! - [`base85`]: turns the packed bytes into query-safe text
//! - [`compress`]: combines both with group tokens into one payload string,
//!   preserving the original token order

pub mod base85;
pub mod compress;
pub mod varint;

pub use base85::{from_base85, to_base85, Base85Error};
pub use compress::{compress, decompress, CompressError, DecompressError};
pub use varint::{decode_ids, encode_ids, VarIntError, MAX_ID};
