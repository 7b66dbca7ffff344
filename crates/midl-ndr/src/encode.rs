//! NDR encoding trait

use crate::{NdrWriter, Result};

/// Trait for types that can be encoded to NDR format
///
/// Encoding happens in two phases. `encode_inline` writes the flat part of a
/// value: scalars, inline arrays and referents for embedded pointers.
/// `encode_deferred` then writes the pointees of those embedded pointers in
/// the order their referents were emitted. Aggregates forward both phases to
/// their fields in declaration order; leaf types without pointers keep the
/// default no-op deferred phase.
pub trait NdrEncode {
    /// Write the inline representation of this value.
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()>;

    /// Write the payloads of pointers emitted by `encode_inline`.
    fn encode_deferred(&self, _w: &mut NdrWriter) -> Result<()> {
        Ok(())
    }
}

impl<T: NdrEncode + ?Sized> NdrEncode for &T {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).encode_inline(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).encode_deferred(w)
    }
}

impl<T: NdrEncode + ?Sized> NdrEncode for Box<T> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).encode_inline(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        (**self).encode_deferred(w)
    }
}
