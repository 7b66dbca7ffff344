//! NDR stream reader
//!
//! [`NdrReader`] is the decoding counterpart of [`NdrWriter`](crate::NdrWriter):
//! a cursor over one call's stub data plus the queue of referents read in
//! the current scope whose payloads have not been consumed yet.

use std::collections::VecDeque;

use bytes::Bytes;

use crate::primitives::NdrPrimitive;
use crate::{NdrContext, NdrDecode, NdrError, Result};

/// NDR input stream with an explicit deferred-pointer queue
#[derive(Debug)]
pub struct NdrReader {
    buf: Bytes,
    pos: usize,
    ctx: NdrContext,
    deferred: VecDeque<u64>,
}

impl NdrReader {
    /// Create a reader over `buf`
    pub fn new(buf: impl Into<Bytes>, ctx: NdrContext) -> Self {
        Self {
            buf: buf.into(),
            pos: 0,
            ctx,
            deferred: VecDeque::new(),
        }
    }

    /// Data representation in use
    pub fn context(&self) -> NdrContext {
        self.ctx
    }

    /// Bytes consumed so far; also the alignment base
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether the whole input has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Referents read in the current scope whose payloads are still pending
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let have = self.remaining();
        if have < needed {
            return Err(NdrError::ShortBuffer { needed, have });
        }
        Ok(())
    }

    /// Skip padding up to the given boundary
    pub fn read_align(&mut self, alignment: usize) -> Result<()> {
        let padding = NdrContext::align_padding(self.pos, alignment);
        self.ensure(padding)?;
        self.pos += padding;
        Ok(())
    }

    /// Read a scalar at its natural alignment
    pub fn read_data<T: NdrPrimitive>(&mut self) -> Result<T> {
        self.read_align(T::SIZE)?;
        self.ensure(T::SIZE)?;
        let value = T::get(&self.buf[self.pos..self.pos + T::SIZE], self.ctx.little_endian);
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Read a raw byte run without alignment
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        let bytes = self.buf.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(bytes)
    }

    /// Read a conformance or variance count
    pub fn read_size(&mut self) -> Result<u64> {
        if self.ctx.ndr64 {
            self.read_data::<u64>()
        } else {
            self.read_data::<u32>().map(u64::from)
        }
    }

    /// Check a declared element count against the remaining input before
    /// anything is allocated for it.
    pub fn check_count(&self, declared: u64) -> Result<usize> {
        let remaining = self.remaining();
        if declared > remaining as u64 {
            return Err(NdrError::BufferOverflow {
                declared,
                remaining,
            });
        }
        usize::try_from(declared).map_err(|_| NdrError::IntegerOverflow(declared))
    }

    /// Read a pointer referent; returns whether the pointer is non-null.
    ///
    /// Non-null referents are queued and must be consumed by
    /// [`read_pointee`](Self::read_pointee) in the deferred phase.
    pub fn read_pointer(&mut self) -> Result<bool> {
        let referent = if self.ctx.ndr64 {
            self.read_data::<u64>()?
        } else {
            u64::from(self.read_data::<u32>()?)
        };
        if referent == 0 {
            return Ok(false);
        }
        self.deferred.push_back(referent);
        Ok(true)
    }

    /// Read the payload of the oldest queued referent, including the payloads
    /// of its own embedded pointers.
    pub fn read_pointee<T: NdrDecode>(&mut self) -> Result<T> {
        if self.deferred.pop_front().is_none() {
            return Err(NdrError::DeferredMismatch { pending: 0 });
        }
        self.read_value()
    }

    /// Read the deferred phase of `value` and require the queue to be empty
    /// afterwards.
    pub fn read_deferred<T: NdrDecode>(&mut self, value: &mut T) -> Result<()> {
        value.decode_deferred(self)?;
        if self.deferred.is_empty() {
            Ok(())
        } else {
            Err(NdrError::DeferredMismatch {
                pending: self.deferred.len(),
            })
        }
    }

    /// Read a complete value in its own deferred scope
    pub fn read_value<T: NdrDecode>(&mut self) -> Result<T> {
        let outer = std::mem::take(&mut self.deferred);
        let result = T::decode_inline(self).and_then(|mut value| {
            self.read_deferred(&mut value)?;
            Ok(value)
        });
        self.deferred = outer;
        result
    }
}
