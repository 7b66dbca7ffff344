//! ORPC (Object RPC) header types (MS-DCOM 2.2.13, 2.2.14)
//!
//! `ORPCTHIS` leads every ORPC request and `ORPCTHAT` every response. Both
//! may carry an extent array of opaque, GUID-tagged extensions.

use dcerpc::Uuid;
use midl_ndr::{
    ndr_struct, ConformantArray, NdrDecode, NdrEncode, NdrPtr, NdrReader, NdrWriter, UniquePtr,
};

use super::identifiers::generate_uuid;

ndr_struct! {
    /// COM version structure (MS-DCOM 2.2.11)
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct ComVersion align(2) {
        pub major: u16,
        pub minor: u16,
    }
}

impl ComVersion {
    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.4 (Windows XP/2003)
    pub const DCOM_5_4: Self = Self { major: 5, minor: 4 };
    /// DCOM version 5.6 (Windows Vista)
    pub const DCOM_5_6: Self = Self { major: 5, minor: 6 };
    /// DCOM version 5.7 (Windows 7)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

/// ORPC extension array entry (`ORPC_EXTENT`)
///
/// A conformant structure: the padded data length is hoisted in front of
/// the fixed fields and the data is padded with zeros to a multiple of 8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrpcExtent {
    /// Extension identifier
    pub id: Uuid,
    /// Extension data, unpadded
    pub data: Vec<u8>,
}

impl OrpcExtent {
    pub fn new(id: Uuid, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    fn padded_len(&self) -> usize {
        (self.data.len() + 7) & !7
    }
}

impl NdrEncode for OrpcExtent {
    fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let size = u32::try_from(self.data.len())
            .map_err(|_| midl_ndr::NdrError::IntegerOverflow(self.data.len() as u64))?;
        let padded = self.padded_len();
        w.write_size(padded as u64)?;
        w.write_align(4)?;
        self.id.encode_inline(w)?;
        w.write_data(size)?;
        w.write_bytes(&self.data)?;
        w.write_bytes(&[0u8; 8][..padded - self.data.len()])
    }
}

impl NdrDecode for OrpcExtent {
    fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let count = r.read_size()?;
        r.read_align(4)?;
        let id = Uuid::decode_inline(r)?;
        let size = r.read_data::<u32>()? as usize;
        let len = r.check_count(count)?;
        let bytes = r.read_bytes(len)?;
        Ok(Self {
            id,
            data: bytes[..size.min(len)].to_vec(),
        })
    }
}

ndr_struct! {
    /// ORPC extent array (`ORPC_EXTENT_ARRAY`)
    ///
    /// `size` counts the extents; the array itself is rounded up to an even
    /// number of slots, unused slots are null.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct OrpcExtentArray align(4) {
        pub size: u32,
        pub reserved: u32,
        pub extent: UniquePtr<ConformantArray<UniquePtr<OrpcExtent>>>,
    }
}

impl OrpcExtentArray {
    pub fn new(extents: Vec<OrpcExtent>) -> Self {
        let size = extents.len() as u32;
        let slots = u64::from((size + 1) & !1);
        Self {
            size,
            reserved: 0,
            extent: UniquePtr::new(ConformantArray::with_max(
                slots,
                extents.into_iter().map(UniquePtr::new).collect(),
            )),
        }
    }

    /// Present extents, skipping null slots
    pub fn extents(&self) -> impl Iterator<Item = &OrpcExtent> {
        self.extent
            .get()
            .into_iter()
            .flat_map(|array| array.iter())
            .filter_map(|slot| slot.get())
    }
}

ndr_struct! {
    /// ORPCTHIS structure (MS-DCOM 2.2.13)
    ///
    /// Sent with every ORPC request from client to server.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct OrpcThis align(4) {
        pub version: ComVersion,
        /// Flags (must be 0)
        pub flags: u32,
        /// Reserved (must be 0)
        pub reserved1: u32,
        /// Causality ID (UUID identifying the call chain)
        pub cid: Uuid,
        pub extensions: UniquePtr<OrpcExtentArray>,
    }
}

impl OrpcThis {
    /// ORPCTHIS with a fresh causality ID
    pub fn new() -> Self {
        Self::with_causality(generate_uuid())
    }

    /// Create with a specific causality ID
    pub fn with_causality(cid: Uuid) -> Self {
        Self {
            version: ComVersion::DCOM_5_7,
            flags: 0,
            reserved1: 0,
            cid,
            extensions: UniquePtr::null(),
        }
    }

    pub fn with_extensions(mut self, extensions: OrpcExtentArray) -> Self {
        self.extensions = UniquePtr::new(extensions);
        self
    }
}

impl Default for OrpcThis {
    fn default() -> Self {
        Self::new()
    }
}

ndr_struct! {
    /// ORPCTHAT structure (MS-DCOM 2.2.14)
    ///
    /// Sent with every ORPC response from server to client.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct OrpcThat align(4) {
        /// Flags (must be 0)
        pub flags: u32,
        pub extensions: UniquePtr<OrpcExtentArray>,
    }
}

impl OrpcThat {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Well-known extension UUIDs
pub mod extent_ids {
    /// Error info extension
    pub const ERROR_INFO: &str = "0000031c-0000-0000-c000-000000000046";
}

#[cfg(test)]
mod tests {
    use super::*;
    use midl_ndr::NdrContext;

    fn roundtrip<T: NdrEncode + NdrDecode>(value: &T) -> (T, midl_ndr::Bytes) {
        let bytes = midl_ndr::encode_to_bytes(value, NdrContext::new()).unwrap();
        let decoded = midl_ndr::decode_from_bytes(bytes.clone(), NdrContext::new()).unwrap();
        (decoded, bytes)
    }

    #[test]
    fn test_orpc_this_new() {
        let orpc = OrpcThis::new();
        assert_eq!(orpc.version, ComVersion::DCOM_5_7);
        assert_eq!(orpc.flags, 0);
        assert!(!orpc.cid.is_nil());
        assert_ne!(OrpcThis::new().cid, orpc.cid);
    }

    #[test]
    fn test_orpc_this_without_extensions() {
        let orpc = OrpcThis::with_causality(Uuid::NIL);
        let (decoded, bytes) = roundtrip(&orpc);
        // version, flags, reserved, cid, null extensions
        assert_eq!(bytes.len(), 4 + 4 + 4 + 16 + 4);
        assert_eq!(&bytes[..4], &[5, 0, 7, 0]);
        assert_eq!(&bytes[28..], &[0, 0, 0, 0]);
        assert_eq!(decoded, orpc);
    }

    #[test]
    fn test_orpc_this_with_extensions() {
        let ext = OrpcExtentArray::new(vec![OrpcExtent::new(Uuid::NIL, vec![1, 2, 3])]);
        let orpc = OrpcThis::new().with_extensions(ext);
        let (decoded, bytes) = roundtrip(&orpc);
        assert_eq!(decoded.cid, orpc.cid);

        let extents: Vec<_> = decoded.extensions.get().unwrap().extents().collect();
        assert_eq!(extents.len(), 1);
        assert_eq!(extents[0].data, vec![1, 2, 3]);

        // one extent rounds up to two slots, the second null
        let array = decoded.extensions.get().unwrap().extent.get().unwrap();
        assert_eq!(array.len(), 2);
        assert!(array.elements[1].is_null());
        // extent data is padded to 8
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn test_extent_padding() {
        let extent = OrpcExtent::new(Uuid::NIL, vec![0xAA; 9]);
        let (decoded, bytes) = roundtrip(&extent);
        // hoisted count, id, size, 16 padded bytes
        assert_eq!(bytes.len(), 4 + 16 + 4 + 16);
        assert_eq!(&bytes[..4], &16u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &9u32.to_le_bytes());
        assert_eq!(decoded, extent);
    }

    #[test]
    fn test_orpc_that_roundtrip() {
        let (decoded, bytes) = roundtrip(&OrpcThat::new());
        assert_eq!(bytes.as_ref(), &[0; 8]);
        assert_eq!(decoded, OrpcThat::default());
    }
}
