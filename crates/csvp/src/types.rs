//! Shared MS-CSVP types

use dcerpc::Uuid;
use midl_ndr::{invalid_discriminant, NdrDecode, NdrEncode, NdrReader, NdrUnion, NdrWriter};

/// `CPREP_DISKID_ENUM` values
pub mod disk_id_type {
    pub const SIGNATURE: u16 = 0;
    pub const GUID: u16 = 1;
    pub const NUMBER: u16 = 4000;
    pub const UNKNOWN: u16 = 5000;
}

/// Disk identifier (`CPREP_DISKID`)
///
/// Wire form: the `DiskIdType` enum, then the union discriminant (the same
/// value again) and the selected arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiskId {
    /// MBR disk signature
    Signature(u32),
    /// GPT disk identifier
    Guid(Uuid),
    /// Operating system device number
    DeviceNumber(u32),
    /// Unknown identifier kind; the value is ignored by servers
    Junk(u32),
}

impl Default for DiskId {
    fn default() -> Self {
        DiskId::Signature(0)
    }
}

impl NdrUnion for DiskId {
    type Tag = u16;

    fn tag(&self) -> u16 {
        match self {
            DiskId::Signature(_) => disk_id_type::SIGNATURE,
            DiskId::Guid(_) => disk_id_type::GUID,
            DiskId::DeviceNumber(_) => disk_id_type::NUMBER,
            DiskId::Junk(_) => disk_id_type::UNKNOWN,
        }
    }

    fn encode_arm(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        match self {
            DiskId::Signature(v) | DiskId::DeviceNumber(v) | DiskId::Junk(v) => w.write_data(*v),
            DiskId::Guid(guid) => guid.encode_inline(w),
        }
    }

    fn decode_arm(tag: u16, r: &mut NdrReader) -> midl_ndr::Result<Self> {
        match tag {
            disk_id_type::SIGNATURE => Ok(DiskId::Signature(r.read_data()?)),
            disk_id_type::GUID => Ok(DiskId::Guid(Uuid::decode_inline(r)?)),
            disk_id_type::NUMBER => Ok(DiskId::DeviceNumber(r.read_data()?)),
            disk_id_type::UNKNOWN => Ok(DiskId::Junk(r.read_data()?)),
            other => Err(invalid_discriminant(other)),
        }
    }
}

impl NdrEncode for DiskId {
    fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_align(4)?;
        w.write_data(self.tag())?;
        w.write_data(self.tag())?;
        self.encode_arm(w)
    }
}

impl NdrDecode for DiskId {
    fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.read_align(4)?;
        let kind = r.read_data::<u16>()?;
        let tag = r.read_data::<u16>()?;
        if tag != kind {
            return Err(invalid_discriminant(tag));
        }
        Self::decode_arm(tag, r)
    }
}
