//! NDR string types
//!
//! - [`NdrString`]: `[string] char*`, conformant varying array of bytes
//!   including the NUL terminator
//! - [`NdrWString`]: `[string] wchar_t*`, conformant varying array of UTF-16
//!   code units including the NUL terminator
//! - [`FixedWString`]: `wchar_t name[N]`, a fixed array of UTF-16 code units
//!   padded with NULs
//! - [`BString`]: the `FLAGGED_WORD_BLOB` behind an OLE `BSTR`; a nullable
//!   `BSTR` is `UniquePtr<BString>`
//!
//! Decoding strips everything from the first NUL on.

use std::fmt;

use crate::{NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter, Result};

fn utf16_units(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

fn utf16_string(units: &[u16]) -> Result<String> {
    let end = units.iter().position(|u| *u == 0).unwrap_or(units.len());
    Ok(char::decode_utf16(units[..end].iter().copied()).collect::<std::result::Result<String, _>>()?)
}

/// Read the variance header of a `[string]` array and return the count of
/// transmitted elements.
fn read_string_header(r: &mut NdrReader) -> Result<u64> {
    let max_count = r.read_size()?;
    let offset = r.read_size()?;
    let actual_count = r.read_size()?;
    if offset != 0 || actual_count > max_count {
        return Err(NdrError::ConformanceMismatch {
            max_count,
            actual_count,
        });
    }
    if actual_count == 0 {
        return Err(NdrError::InvalidString("missing NUL terminator".into()));
    }
    Ok(actual_count)
}

fn write_string_header(w: &mut NdrWriter, count: usize) -> Result<()> {
    let count = count as u64;
    w.write_size(count)?;
    w.write_size(0)?;
    w.write_size(count)
}

macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// NUL-terminated ANSI string
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct NdrString(pub String);

string_newtype!(NdrString);

impl NdrEncode for NdrString {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        write_string_header(w, self.0.len() + 1)?;
        w.write_bytes(self.0.as_bytes())?;
        w.write_data(0u8)
    }
}

impl NdrDecode for NdrString {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let count = read_string_header(r)?;
        let len = r.check_count(count)?;
        let bytes = r.read_bytes(len)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(Self(String::from_utf8(bytes[..end].to_vec())?))
    }
}

/// NUL-terminated UTF-16 string
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct NdrWString(pub String);

string_newtype!(NdrWString);

impl NdrEncode for NdrWString {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        let mut units = utf16_units(&self.0);
        units.push(0);
        write_string_header(w, units.len())?;
        for unit in units {
            w.write_data(unit)?;
        }
        Ok(())
    }
}

impl NdrDecode for NdrWString {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let count = read_string_header(r)?;
        let len = r.check_count(count)?;
        let mut units = Vec::with_capacity(len);
        for _ in 0..len {
            units.push(r.read_data::<u16>()?);
        }
        utf16_string(&units).map(Self)
    }
}

/// Fixed-size UTF-16 buffer (`wchar_t name[N]`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct FixedWString<const N: usize>(pub String);

impl<const N: usize> FixedWString<N> {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> From<&str> for FixedWString<N> {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl<const N: usize> NdrEncode for FixedWString<N> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        let units = utf16_units(&self.0);
        if units.len() > N {
            return Err(NdrError::ArraySizeMismatch {
                expected: N,
                got: units.len(),
            });
        }
        for unit in units.iter().copied().chain(std::iter::repeat(0)).take(N) {
            w.write_data(unit)?;
        }
        Ok(())
    }
}

impl<const N: usize> NdrDecode for FixedWString<N> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let mut units = Vec::with_capacity(N);
        for _ in 0..N {
            units.push(r.read_data::<u16>()?);
        }
        utf16_string(&units).map(Self)
    }
}

/// `FLAGGED_WORD_BLOB`, the wire body of an OLE `BSTR`
///
/// A conformant structure: the element count is hoisted in front of the
/// `cBytes`/`clSize` header. No terminator is transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct BString(pub String);

string_newtype!(BString);

impl NdrEncode for BString {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        let units = utf16_units(&self.0);
        let count = units.len() as u64;
        let byte_len = u32::try_from(units.len() * 2).map_err(|_| NdrError::IntegerOverflow(count))?;
        w.write_size(count)?;
        w.write_align(4)?;
        w.write_data(byte_len)?;
        w.write_data(byte_len / 2)?;
        for unit in units {
            w.write_data(unit)?;
        }
        Ok(())
    }
}

impl NdrDecode for BString {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let max_count = r.read_size()?;
        r.read_align(4)?;
        let _byte_len = r.read_data::<u32>()?;
        let unit_count = u64::from(r.read_data::<u32>()?);
        if unit_count > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count,
                actual_count: unit_count,
            });
        }
        let len = r.check_count(max_count)?;
        let mut units = Vec::with_capacity(len);
        for _ in 0..len {
            units.push(r.read_data::<u16>()?);
        }
        units.truncate(unit_count as usize);
        Ok(Self(char::decode_utf16(units).collect::<std::result::Result<String, _>>()?))
    }
}
