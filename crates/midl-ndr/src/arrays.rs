//! NDR array types
//!
//! NDR supports several array types:
//!
//! - Fixed arrays: size known at compile time, no header
//! - Conformant arrays (`size_is`): max count transmitted as prefix
//! - Varying arrays (`length_is`): offset and actual count as prefix
//! - Conformant varying arrays: max count, offset and actual count
//!
//! Elements are written inline one after another; pointers embedded in
//! elements are deferred until after the last element, in element order.
//! Slots between the data length and the transmitted count are filled with
//! `T::default()`, which is the zero value for every wire type here.

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

fn encode_padded<T>(elements: &[T], count: usize, w: &mut NdrWriter, deferred: bool) -> Result<()>
where
    T: NdrEncode + Default,
{
    let pad = T::default();
    for element in elements.iter().chain(std::iter::repeat(&pad)).take(count) {
        if deferred {
            element.encode_deferred(w)?;
        } else {
            element.encode_inline(w)?;
        }
    }
    Ok(())
}

fn decode_elements<T: NdrDecode>(r: &mut NdrReader, count: u64) -> Result<Vec<T>> {
    let count = r.check_count(count)?;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        elements.push(T::decode_inline(r)?);
    }
    Ok(elements)
}

fn decode_deferred_elements<T: NdrDecode>(elements: &mut [T], r: &mut NdrReader) -> Result<()> {
    for element in elements {
        element.decode_deferred(r)?;
    }
    Ok(())
}

fn to_count(len: usize) -> u64 {
    len as u64
}

fn to_len(count: u64) -> Result<usize> {
    usize::try_from(count).map_err(|_| NdrError::IntegerOverflow(count))
}

/// Fixed-size array
///
/// Wire format: exactly `N` elements, no size prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedArray<T, const N: usize> {
    pub elements: [T; N],
}

impl<T: Default, const N: usize> Default for FixedArray<T, N> {
    fn default() -> Self {
        Self {
            elements: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T, const N: usize> FixedArray<T, N> {
    pub fn new(elements: [T; N]) -> Self {
        Self { elements }
    }

    /// Copy `data` into the array, zero-filling the tail.
    pub fn from_slice(data: &[T]) -> Result<Self>
    where
        T: Clone + Default,
    {
        if data.len() > N {
            return Err(NdrError::ArraySizeMismatch {
                expected: N,
                got: data.len(),
            });
        }
        Ok(Self {
            elements: std::array::from_fn(|i| data.get(i).cloned().unwrap_or_default()),
        })
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<T: NdrEncode, const N: usize> NdrEncode for FixedArray<T, N> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        for element in &self.elements {
            element.encode_inline(w)?;
        }
        Ok(())
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        for element in &self.elements {
            element.encode_deferred(w)?;
        }
        Ok(())
    }
}

impl<T: NdrDecode, const N: usize> NdrDecode for FixedArray<T, N> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let elements: Vec<T> = decode_elements(r, to_count(N))?;
        let elements = elements.try_into().map_err(|v: Vec<T>| NdrError::ArraySizeMismatch {
            expected: N,
            got: v.len(),
        })?;
        Ok(Self { elements })
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        decode_deferred_elements(&mut self.elements, r)
    }
}

/// Conformant array (`size_is`)
///
/// Wire format: max_count, then `max(max_count, elements.len())` elements.
/// When `max_count` exceeds the data, the tail is zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformantArray<T> {
    /// Declared size (`size_is`)
    pub max_count: u64,
    pub elements: Vec<T>,
}

impl<T> Default for ConformantArray<T> {
    fn default() -> Self {
        Self {
            max_count: 0,
            elements: Vec::new(),
        }
    }
}

impl<T> ConformantArray<T> {
    /// Array whose declared size equals its length
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            max_count: to_count(elements.len()),
            elements,
        }
    }

    /// Array with an explicit declared size
    pub fn with_max(max_count: u64, elements: Vec<T>) -> Self {
        Self { max_count, elements }
    }

    /// Number of elements that go on the wire
    pub fn conformance(&self) -> u64 {
        self.max_count.max(to_count(self.elements.len()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T: NdrEncode + Default> ConformantArray<T> {
    /// Write the elements without the size prefix, for conformant structures
    /// that hoist the count to their start.
    pub fn encode_body(&self, w: &mut NdrWriter) -> Result<()> {
        encode_padded(&self.elements, to_len(self.conformance())?, w, false)
    }
}

impl<T: NdrDecode> ConformantArray<T> {
    /// Read `count` elements whose size prefix was already consumed.
    pub fn decode_body(r: &mut NdrReader, count: u64) -> Result<Self> {
        Ok(Self {
            max_count: count,
            elements: decode_elements(r, count)?,
        })
    }
}

impl<T> From<Vec<T>> for ConformantArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::new(elements)
    }
}

impl<'a, T> IntoIterator for &'a ConformantArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: NdrEncode + Default> NdrEncode for ConformantArray<T> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_size(self.conformance())?;
        self.encode_body(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        encode_padded(&self.elements, to_len(self.conformance())?, w, true)
    }
}

impl<T: NdrDecode> NdrDecode for ConformantArray<T> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let max_count = r.read_size()?;
        Self::decode_body(r, max_count)
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        decode_deferred_elements(&mut self.elements, r)
    }
}

/// Varying array (`length_is`) with a fixed bound
///
/// Wire format: offset, actual_count, then actual_count elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaryingArray<T, const N: usize> {
    /// Index of the first transmitted element
    pub offset: u64,
    /// Transmitted elements
    pub elements: Vec<T>,
}

impl<T, const N: usize> Default for VaryingArray<T, N> {
    fn default() -> Self {
        Self {
            offset: 0,
            elements: Vec::new(),
        }
    }
}

impl<T, const N: usize> VaryingArray<T, N> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { offset: 0, elements }
    }

    pub fn with_offset(offset: u64, elements: Vec<T>) -> Self {
        Self { offset, elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn check_bound(offset: u64, actual_count: u64) -> Result<()> {
        let end = offset.checked_add(actual_count).ok_or(NdrError::IntegerOverflow(offset))?;
        if end > to_count(N) {
            return Err(NdrError::ConformanceMismatch {
                max_count: to_count(N),
                actual_count: end,
            });
        }
        Ok(())
    }
}

impl<T: NdrEncode, const N: usize> NdrEncode for VaryingArray<T, N> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        let actual_count = to_count(self.elements.len());
        Self::check_bound(self.offset, actual_count)?;
        w.write_size(self.offset)?;
        w.write_size(actual_count)?;
        for element in &self.elements {
            element.encode_inline(w)?;
        }
        Ok(())
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        for element in &self.elements {
            element.encode_deferred(w)?;
        }
        Ok(())
    }
}

impl<T: NdrDecode, const N: usize> NdrDecode for VaryingArray<T, N> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let offset = r.read_size()?;
        let actual_count = r.read_size()?;
        Self::check_bound(offset, actual_count)?;
        Ok(Self {
            offset,
            elements: decode_elements(r, actual_count)?,
        })
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        decode_deferred_elements(&mut self.elements, r)
    }
}

/// Conformant varying array (`size_is` + `length_is`)
///
/// Wire format: max_count, offset, actual_count, then actual_count elements.
/// The transmitted count is `max(actual_count, elements.len())`; a data run
/// shorter than `actual_count` is zero-filled. Decoding yields exactly the
/// transmitted elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformantVaryingArray<T> {
    /// Declared size (`size_is`)
    pub max_count: u64,
    /// Index of the first transmitted element
    pub offset: u64,
    /// Declared length (`length_is`)
    pub actual_count: u64,
    pub elements: Vec<T>,
}

impl<T> Default for ConformantVaryingArray<T> {
    fn default() -> Self {
        Self {
            max_count: 0,
            offset: 0,
            actual_count: 0,
            elements: Vec::new(),
        }
    }
}

impl<T> ConformantVaryingArray<T> {
    /// Array whose declared size and length equal its data length
    pub fn new(elements: Vec<T>) -> Self {
        let count = to_count(elements.len());
        Self {
            max_count: count,
            offset: 0,
            actual_count: count,
            elements,
        }
    }

    /// Array with a declared size larger than its data
    pub fn with_max(max_count: u64, elements: Vec<T>) -> Self {
        Self {
            max_count,
            ..Self::new(elements)
        }
    }

    /// Array with explicit `size_is` and `length_is` values
    pub fn with_bounds(max_count: u64, actual_count: u64, elements: Vec<T>) -> Self {
        Self {
            max_count,
            offset: 0,
            actual_count,
            elements,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// (max_count, actual_count) as they go on the wire
    fn wire_counts(&self) -> Result<(u64, u64)> {
        let actual_count = self.actual_count.max(to_count(self.elements.len()));
        let end = self
            .offset
            .checked_add(actual_count)
            .ok_or(NdrError::IntegerOverflow(self.offset))?;
        Ok((self.max_count.max(end), actual_count))
    }
}

impl<T> From<Vec<T>> for ConformantVaryingArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::new(elements)
    }
}

impl<T: NdrEncode + Default> NdrEncode for ConformantVaryingArray<T> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        let (max_count, actual_count) = self.wire_counts()?;
        w.write_size(max_count)?;
        w.write_size(self.offset)?;
        w.write_size(actual_count)?;
        encode_padded(&self.elements, to_len(actual_count)?, w, false)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        let (_, actual_count) = self.wire_counts()?;
        encode_padded(&self.elements, to_len(actual_count)?, w, true)
    }
}

impl<T: NdrDecode> NdrDecode for ConformantVaryingArray<T> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let max_count = r.read_size()?;
        let offset = r.read_size()?;
        let actual_count = r.read_size()?;
        let end = offset.checked_add(actual_count).ok_or(NdrError::IntegerOverflow(offset))?;
        if end > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count,
                actual_count,
            });
        }
        Ok(Self {
            max_count,
            offset,
            actual_count,
            elements: decode_elements(r, actual_count)?,
        })
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        decode_deferred_elements(&mut self.elements, r)
    }
}
