//! Marshaled interface pointers (MS-DCOM 2.2.14)
//!
//! `MInterfacePointer` carries an OBJREF as an opaque byte blob. The blob is
//! not interpreted here beyond its signature.

use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// OBJREF signature ("MEOW" in little-endian)
pub const OBJREF_SIGNATURE: u32 = 0x574F454D;

/// `MInterfacePointer`: conformant structure holding a marshaled OBJREF
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterfacePointer {
    pub data: Vec<u8>,
}

impl InterfacePointer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Whether the blob starts with the OBJREF signature
    pub fn is_objref(&self) -> bool {
        self.data.get(..4) == Some(&OBJREF_SIGNATURE.to_le_bytes()[..])
    }
}

impl NdrEncode for InterfacePointer {
    fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let len = u32::try_from(self.data.len())
            .map_err(|_| midl_ndr::NdrError::IntegerOverflow(self.data.len() as u64))?;
        w.write_size(u64::from(len))?;
        w.write_align(4)?;
        w.write_data(len)?;
        w.write_bytes(&self.data)
    }
}

impl NdrDecode for InterfacePointer {
    fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let count = r.read_size()?;
        r.read_align(4)?;
        let declared = u64::from(r.read_data::<u32>()?);
        if declared != count {
            return Err(midl_ndr::NdrError::ConformanceMismatch {
                max_count: count,
                actual_count: declared,
            });
        }
        let len = r.check_count(count)?;
        Ok(Self {
            data: r.read_bytes(len)?.to_vec(),
        })
    }
}
