//! NDR primitive type implementations
//!
//! NDR primitive types and their encodings:
//!
//! | MIDL Type     | Rust Type | Size | Alignment |
//! |---------------|-----------|------|-----------|
//! | boolean       | bool      | 1    | 1         |
//! | byte/char     | u8        | 1    | 1         |
//! | small         | i8        | 1    | 1         |
//! | short         | i16       | 2    | 2         |
//! | long/int      | i32       | 4    | 4         |
//! | hyper         | i64       | 8    | 8         |
//! | unsigned short| u16       | 2    | 2         |
//! | unsigned long | u32       | 4    | 4         |
//! | unsigned hyper| u64       | 8    | 8         |
//! | float         | f32       | 4    | 4         |
//! | double        | f64       | 8    | 8         |
//! | wchar_t       | u16       | 2    | 2         |
//! | GUID          | Uuid      | 16   | 4         |

use bytes::{BufMut, BytesMut};

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// Fixed-width scalar with a byte-order aware wire form
pub trait NdrPrimitive: Copy + Default {
    /// Encoded size, equal to the natural alignment
    const SIZE: usize;

    /// Append the value in the requested byte order
    fn put(self, buf: &mut BytesMut, little_endian: bool);

    /// Build the value from exactly `SIZE` bytes
    fn get(bytes: &[u8], little_endian: bool) -> Self;
}

macro_rules! impl_ndr_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NdrPrimitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn put(self, buf: &mut BytesMut, little_endian: bool) {
                    if little_endian {
                        buf.put_slice(&self.to_le_bytes());
                    } else {
                        buf.put_slice(&self.to_be_bytes());
                    }
                }

                #[inline]
                fn get(bytes: &[u8], little_endian: bool) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    if little_endian {
                        <$ty>::from_le_bytes(raw)
                    } else {
                        <$ty>::from_be_bytes(raw)
                    }
                }
            }

            impl NdrEncode for $ty {
                fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
                    w.write_data(*self)
                }
            }

            impl NdrDecode for $ty {
                fn decode_inline(r: &mut NdrReader) -> Result<Self> {
                    r.read_data()
                }
            }
        )*
    };
}

impl_ndr_primitive!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl NdrEncode for bool {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_data(u8::from(*self))
    }
}

impl NdrDecode for bool {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        Ok(r.read_data::<u8>()? != 0)
    }
}

/// GUID / UUID in its NDR layout
///
/// The first three fields follow the stream byte order; `data4` is always
/// an opaque run of 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Uuid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Uuid {
    /// The nil UUID
    pub const NIL: Self = Self::new(0, 0, 0, [0; 8]);

    /// Build a UUID from its fields
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Whether this is the nil UUID
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Parse from string "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"; braces are
    /// accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('{').trim_end_matches('}');
        if s.len() != 36 {
            return None;
        }
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5 || parts[3].len() != 4 || parts[4].len() != 12 {
            return None;
        }

        let data1 = u32::from_str_radix(parts[0], 16).ok()?;
        let data2 = u16::from_str_radix(parts[1], 16).ok()?;
        let data3 = u16::from_str_radix(parts[2], 16).ok()?;
        let clock = u16::from_str_radix(parts[3], 16).ok()?;

        let mut data4 = [0u8; 8];
        data4[..2].copy_from_slice(&clock.to_be_bytes());
        for (i, byte) in data4[2..].iter_mut().enumerate() {
            *byte = u8::from_str_radix(parts[4].get(i * 2..i * 2 + 2)?, 16).ok()?;
        }

        Some(Self::new(data1, data2, data3, data4))
    }
}

impl std::fmt::Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-",
            self.data1, self.data2, self.data3, self.data4[0], self.data4[1],
        )?;
        for byte in &self.data4[2..] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Uuid {
    type Err = crate::NdrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| crate::NdrError::InvalidString(format!("malformed UUID: {s}")))
    }
}

impl NdrEncode for Uuid {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        w.write_data(self.data1)?;
        w.write_data(self.data2)?;
        w.write_data(self.data3)?;
        w.write_bytes(&self.data4)
    }
}

impl NdrDecode for Uuid {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        let data1 = r.read_data()?;
        let data2 = r.read_data()?;
        let data3 = r.read_data()?;
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&r.read_bytes(8)?);
        Ok(Self::new(data1, data2, data3, data4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NdrContext;

    #[test]
    fn test_u32_512_roundtrip() {
        let mut w = NdrWriter::default();
        w.write_value(&512u32).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.as_ref(), &[0x00, 0x02, 0x00, 0x00]);

        let mut r = NdrReader::new(bytes, NdrContext::new());
        assert_eq!(r.read_value::<u32>().unwrap(), 512);
        assert!(r.is_empty());
    }

    #[test]
    fn test_bool_encode_decode() {
        let mut w = NdrWriter::default();
        w.write_value(&true).unwrap();
        w.write_value(&false).unwrap();

        let mut r = NdrReader::new(w.into_bytes(), NdrContext::new());
        assert!(r.read_value::<bool>().unwrap());
        assert!(!r.read_value::<bool>().unwrap());
    }

    #[test]
    fn test_mixed_scalars_roundtrip() {
        let mut w = NdrWriter::default();
        w.write_value(&-42i32).unwrap();
        w.write_value(&0xDEADBEEF12345678u64).unwrap();
        w.write_value(&3.5f32).unwrap();
        w.write_value(&-2.25f64).unwrap();
        w.write_value(&-7i8).unwrap();
        w.write_value(&-300i16).unwrap();

        let mut r = NdrReader::new(w.into_bytes(), NdrContext::new());
        assert_eq!(r.read_value::<i32>().unwrap(), -42);
        assert_eq!(r.read_value::<u64>().unwrap(), 0xDEADBEEF12345678);
        assert_eq!(r.read_value::<f32>().unwrap(), 3.5);
        assert_eq!(r.read_value::<f64>().unwrap(), -2.25);
        assert_eq!(r.read_value::<i8>().unwrap(), -7);
        assert_eq!(r.read_value::<i16>().unwrap(), -300);
    }

    #[test]
    fn test_uuid_roundtrip() {
        let uuid = Uuid::parse("12345678-1234-5678-9ABC-DEF012345678").unwrap();

        let mut w = NdrWriter::default();
        w.write_value(&uuid).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..4], &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(&bytes[8..10], &[0x9A, 0xBC]);

        let mut r = NdrReader::new(bytes, NdrContext::new());
        assert_eq!(r.read_value::<Uuid>().unwrap(), uuid);
    }

    #[test]
    fn test_uuid_parse_display() {
        let uuid_str = "12345678-abcd-ef01-2345-6789abcdef01";
        let uuid = Uuid::parse(uuid_str).unwrap();
        assert_eq!(uuid.to_string(), uuid_str);
        assert_eq!(Uuid::parse("{12345678-abcd-ef01-2345-6789abcdef01}"), Some(uuid));
        assert!(Uuid::parse("not-a-uuid").is_none());
        assert!("12345678-abcd-ef01-2345-6789abcdef0g".parse::<Uuid>().is_err());
        assert!(Uuid::NIL.is_nil());
    }
}
