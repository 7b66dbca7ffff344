//! NDR decoding trait

use crate::{NdrReader, Result};

/// Trait for types that can be decoded from NDR format
///
/// Mirrors [`NdrEncode`](crate::NdrEncode): `decode_inline` builds the value
/// from its flat part, leaving embedded pointers pending, and
/// `decode_deferred` fills the pending pointees in referent order.
pub trait NdrDecode: Sized {
    /// Read the inline representation of a value.
    fn decode_inline(r: &mut NdrReader) -> Result<Self>;

    /// Read the payloads of pointers left pending by `decode_inline`.
    fn decode_deferred(&mut self, _r: &mut NdrReader) -> Result<()> {
        Ok(())
    }
}

impl<T: NdrDecode> NdrDecode for Box<T> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        T::decode_inline(r).map(Box::new)
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        (**self).decode_deferred(r)
    }
}
