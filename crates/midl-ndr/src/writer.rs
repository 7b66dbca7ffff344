//! NDR stream writer
//!
//! [`NdrWriter`] owns the output buffer for one call together with the
//! deferred-pointer queue of the scope currently being written. A scope is
//! opened for every top-level parameter and for every pointee; all referents
//! emitted inside a scope must be matched by a deferred payload before the
//! scope closes.

use std::collections::VecDeque;

use bytes::{BufMut, Bytes, BytesMut};

use crate::primitives::NdrPrimitive;
use crate::{NdrContext, NdrEncode, NdrError, Result};

/// First referent handed out by a writer. Referents only signal "non-null";
/// the values carry no meaning beyond being distinct and non-zero.
pub const FIRST_REFERENT: u32 = 0x0002_0000;

const REFERENT_STEP: u32 = 4;

/// NDR output stream with an explicit deferred-pointer queue
#[derive(Debug)]
pub struct NdrWriter {
    buf: BytesMut,
    ctx: NdrContext,
    deferred: VecDeque<u64>,
    next_referent: u32,
}

impl NdrWriter {
    /// Create an empty writer
    pub fn new(ctx: NdrContext) -> Self {
        Self::with_capacity(ctx, 0)
    }

    /// Create an empty writer with preallocated capacity
    pub fn with_capacity(ctx: NdrContext, capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            ctx,
            deferred: VecDeque::new(),
            next_referent: FIRST_REFERENT,
        }
    }

    /// Data representation in use
    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    /// Bytes written so far; also the alignment base
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Referents emitted in the current scope and not yet matched by a payload
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Pad with zeros up to the given boundary
    pub fn write_align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.buf.len(), alignment);
        self.buf.put_bytes(0, padding);
        Ok(())
    }

    /// Write a scalar at its natural alignment
    pub fn write_data<T: NdrPrimitive>(&mut self, value: T) -> Result<()> {
        self.write_align(T::SIZE)?;
        value.put(&mut self.buf, self.ctx.little_endian);
        Ok(())
    }

    /// Write a raw byte run without alignment
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Write a conformance or variance count
    pub fn write_size(&mut self, count: u64) -> Result<()> {
        if self.ctx.ndr64 {
            self.write_data(count)
        } else {
            let count = u32::try_from(count).map_err(|_| NdrError::IntegerOverflow(count))?;
            self.write_data(count)
        }
    }

    /// Write a pointer referent.
    ///
    /// A null pointer is written as referent 0 and records nothing. A
    /// non-null pointer gets a fresh referent which is queued; its pointee
    /// must be written by [`write_pointee`](Self::write_pointee) during the
    /// deferred phase of the enclosing scope.
    pub fn write_pointer(&mut self, present: bool) -> Result<()> {
        let referent = if present {
            let referent = u64::from(self.next_referent);
            self.next_referent = self.next_referent.wrapping_add(REFERENT_STEP).max(FIRST_REFERENT);
            self.deferred.push_back(referent);
            referent
        } else {
            0
        };
        if self.ctx.ndr64 {
            self.write_data(referent)
        } else {
            // referents never leave the u32 range in NDR20
            self.write_data(referent as u32)
        }
    }

    /// Write the payload of the oldest queued referent.
    ///
    /// The pointee is written inline and its own embedded pointers are
    /// drained before returning, so nested pointees never interleave with
    /// the parent's remaining deferred payloads.
    pub fn write_pointee<T: NdrEncode + ?Sized>(&mut self, pointee: &T) -> Result<()> {
        if self.deferred.pop_front().is_none() {
            return Err(NdrError::DeferredMismatch { pending: 0 });
        }
        self.write_value(pointee)
    }

    /// Write the deferred phase of `value` and require the queue to be empty
    /// afterwards.
    pub fn write_deferred<T: NdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode_deferred(self)?;
        if self.deferred.is_empty() {
            Ok(())
        } else {
            Err(NdrError::DeferredMismatch {
                pending: self.deferred.len(),
            })
        }
    }

    /// Write a complete value in its own deferred scope: inline part first,
    /// then every pointee it references.
    pub fn write_value<T: NdrEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.scoped(|w| {
            value.encode_inline(w)?;
            w.write_deferred(value)
        })
    }

    /// Run `f` against a fresh deferred queue, restoring the caller's queue
    /// afterwards.
    pub fn scoped<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let outer = std::mem::take(&mut self.deferred);
        let result = f(self);
        let leftover = std::mem::replace(&mut self.deferred, outer).len();
        result?;
        if leftover != 0 {
            return Err(NdrError::DeferredMismatch { pending: leftover });
        }
        Ok(())
    }

    /// Borrow the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Finish writing
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for NdrWriter {
    fn default() -> Self {
        Self::new(NdrContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_data_aligns_naturally() {
        let mut w = NdrWriter::default();
        w.write_data(0x42u8).unwrap();
        w.write_data(0xDEADBEEFu32).unwrap();
        w.write_data(0x1234u16).unwrap();
        w.write_data(7u64).unwrap();

        assert_eq!(
            w.as_bytes(),
            &[
                0x42, 0, 0, 0, // u8 + pad
                0xEF, 0xBE, 0xAD, 0xDE, // u32
                0x34, 0x12, 0, 0, 0, 0, 0, 0, // u16 + pad to 16
                7, 0, 0, 0, 0, 0, 0, 0, // u64
            ]
        );
    }

    #[test]
    fn test_big_endian_scalar() {
        let mut w = NdrWriter::new(NdrContext::big_endian());
        w.write_data(0x12345678u32).unwrap();
        assert_eq!(w.as_bytes(), &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_pointer_referents() {
        let mut w = NdrWriter::default();
        w.write_pointer(false).unwrap();
        w.write_pointer(true).unwrap();
        w.write_pointer(true).unwrap();

        assert_eq!(w.pending(), 2);
        assert_eq!(&w.as_bytes()[0..4], &[0, 0, 0, 0]);
        assert_eq!(&w.as_bytes()[4..8], &FIRST_REFERENT.to_le_bytes());
        assert_eq!(&w.as_bytes()[8..12], &(FIRST_REFERENT + 4).to_le_bytes());
    }

    #[test]
    fn test_ndr64_widths() {
        let mut w = NdrWriter::new(NdrContext::ndr64());
        w.write_data(1u8).unwrap();
        w.write_size(3).unwrap();
        w.write_pointer(true).unwrap();
        assert_eq!(w.position(), 24);
        assert_eq!(&w.as_bytes()[8..16], &3u64.to_le_bytes());
    }

    #[test]
    fn test_ndr20_size_overflow() {
        let mut w = NdrWriter::default();
        let err = w.write_size(u64::from(u32::MAX) + 1).unwrap_err();
        assert!(matches!(err, NdrError::IntegerOverflow(_)));
    }

    #[test]
    fn test_scope_rejects_undrained_referents() {
        let mut w = NdrWriter::default();
        let err = w.scoped(|w| w.write_pointer(true)).unwrap_err();
        assert!(matches!(err, NdrError::DeferredMismatch { pending: 1 }));
        // the outer queue is restored untouched
        assert_eq!(w.pending(), 0);
    }

    #[test]
    fn test_pointee_without_referent() {
        let mut w = NdrWriter::default();
        let err = w.write_pointee(&5u32).unwrap_err();
        assert!(matches!(err, NdrError::DeferredMismatch { pending: 0 }));
    }
}
