//! NDR discriminated unions
//!
//! A non-encapsulated union (`switch_is`) goes on the wire as its
//! discriminant followed by the selected arm. Rust enums implement
//! [`NdrUnion`] and are carried in structures through the [`Union`] wrapper,
//! which writes the tag and forwards both encoding phases to the arm.

use crate::primitives::NdrPrimitive;
use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

/// A Rust enum with an NDR union representation
pub trait NdrUnion: Sized {
    /// Discriminant type (`switch_type`)
    type Tag: NdrPrimitive + Into<i64>;

    /// Discriminant of the active arm
    fn tag(&self) -> Self::Tag;

    /// Write the inline part of the active arm
    fn encode_arm(&self, w: &mut NdrWriter) -> Result<()>;

    /// Write the deferred part of the active arm
    fn encode_arm_deferred(&self, _w: &mut NdrWriter) -> Result<()> {
        Ok(())
    }

    /// Read the arm selected by `tag`
    fn decode_arm(tag: Self::Tag, r: &mut NdrReader) -> Result<Self>;

    /// Read the deferred part of the active arm
    fn decode_arm_deferred(&mut self, _r: &mut NdrReader) -> Result<()> {
        Ok(())
    }
}

/// Build the error for a discriminant with no matching arm
pub fn invalid_discriminant<T: Into<i64>>(tag: T) -> NdrError {
    NdrError::InvalidDiscriminant(tag.into())
}

/// Union field: discriminant followed by the arm
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Union<U>(pub U);

impl<U> Union<U> {
    pub fn new(value: U) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> U {
        self.0
    }
}

impl<U> std::ops::Deref for Union<U> {
    type Target = U;

    fn deref(&self) -> &U {
        &self.0
    }
}

impl<U: NdrUnion> NdrEncode for Union<U> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_data(self.0.tag())?;
        self.0.encode_arm(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        self.0.encode_arm_deferred(w)
    }
}

impl<U: NdrUnion> NdrDecode for Union<U> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let tag = r.read_data::<U::Tag>()?;
        U::decode_arm(tag, r).map(Self)
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        self.0.decode_arm_deferred(r)
    }
}
