//! NDR (Network Data Representation) runtime library
//!
//! This crate provides the runtime support for DCE RPC and DCOM stubs,
//! implementing the NDR wire format as specified in DCE RPC and MS-RPCE.
//!
//! # NDR Wire Format
//!
//! NDR is the standard encoding for DCE RPC data. Key characteristics:
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes)
//! - Structures align to their largest member
//! - Conformant and varying arrays carry count headers before their elements
//! - Embedded pointers are written as referents; the pointed-to data is
//!   deferred to the end of the enclosing top-level value, in referent order
//! - Strings are conformant varying arrays with a NUL terminator
//!
//! # Encoding model
//!
//! [`NdrWriter`] and [`NdrReader`] own the stream and the deferred-pointer
//! queue for one call. Types implement [`NdrEncode`]/[`NdrDecode`] in two
//! phases (inline, deferred); [`NdrWriter::write_value`] and
//! [`NdrReader::read_value`] run both phases for a top-level value inside
//! its own deferred scope.

mod arrays;
mod context;
mod decode;
mod encode;
mod error;
mod macros;
mod pointers;
mod primitives;
mod reader;
mod strings;
mod unions;
mod writer;

pub use arrays::{ConformantArray, ConformantVaryingArray, FixedArray, VaryingArray};
pub use context::NdrContext;
pub use decode::NdrDecode;
pub use encode::NdrEncode;
pub use error::{NdrError, Result};
pub use pointers::{FullPtr, NdrPtr, RefPtr, UniquePtr};
pub use primitives::{NdrPrimitive, Uuid};
pub use reader::NdrReader;
pub use strings::{BString, FixedWString, NdrString, NdrWString};
pub use unions::{invalid_discriminant, NdrUnion, Union};
pub use writer::{NdrWriter, FIRST_REFERENT};

/// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Encode a top-level value into a fresh buffer
pub fn encode_to_bytes<T: NdrEncode + ?Sized>(value: &T, ctx: NdrContext) -> Result<Bytes> {
    let mut w = NdrWriter::new(ctx);
    w.write_value(value)?;
    Ok(w.into_bytes())
}

/// Decode a top-level value from a buffer
pub fn decode_from_bytes<T: NdrDecode>(buf: impl Into<Bytes>, ctx: NdrContext) -> Result<T> {
    NdrReader::new(buf, ctx).read_value()
}
