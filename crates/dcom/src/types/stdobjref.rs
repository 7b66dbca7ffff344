//! STDOBJREF (MS-DCOM 2.2.18.2)
//!
//! What a marshaled interface pointer resolves to: the exporter, the object
//! and the interface on it, plus the public references handed over.

use midl_ndr::ndr_struct;

use super::identifiers::{Ipid, Oid, Oxid};

/// SORF_* flags
pub mod flags {
    pub const SORF_NULL: u32 = 0x00000000;
    /// Caller does not ping the object
    pub const SORF_NOPING: u32 = 0x00001000;
}

ndr_struct! {
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct StdObjRef align(8) {
        pub flags: u32,
        pub public_refs: u32,
        pub oxid: Oxid,
        pub oid: Oid,
        pub ipid: Ipid,
    }
}

impl StdObjRef {
    /// Encoded size
    pub const SIZE: usize = 40;

    pub fn new(oxid: Oxid, oid: Oid, ipid: Ipid, public_refs: u32) -> Self {
        Self {
            flags: flags::SORF_NULL,
            public_refs,
            oxid,
            oid,
            ipid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midl_ndr::NdrContext;

    #[test]
    fn test_layout() {
        let ipid = Ipid::generate();
        let objref = StdObjRef::new(Oxid::new(0x1234), Oid::new(0x5678), ipid, 5);
        let bytes = midl_ndr::encode_to_bytes(&objref, NdrContext::new()).unwrap();
        assert_eq!(bytes.len(), StdObjRef::SIZE);
        assert_eq!(&bytes[4..8], &5u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &0x1234u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &0x5678u64.to_le_bytes());

        let decoded: StdObjRef = midl_ndr::decode_from_bytes(bytes, NdrContext::new()).unwrap();
        assert_eq!(decoded.ipid, ipid);
        assert_eq!(decoded, objref);
    }
}
