//! DCOM identifier types (MS-DCOM 2.2.18)
//!
//! These are the core identifiers used throughout DCOM:
//! - OXID: Object Exporter Identifier
//! - OID: Object Identifier
//! - IPID: Interface Pointer Identifier

use std::fmt;

use dcerpc::Uuid;
use midl_ndr::{NdrDecode, NdrEncode, NdrReader, NdrWriter};

/// Generate a new random v4 UUID
pub fn generate_uuid() -> Uuid {
    let uuid = uuid::Uuid::new_v4();
    let (data1, data2, data3, data4) = uuid.as_fields();
    Uuid::new(data1, data2, data3, *data4)
}

macro_rules! u64_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Draw a random identifier
            pub fn generate() -> Self {
                let uuid = uuid::Uuid::new_v4();
                let (high, _) = uuid.as_u64_pair();
                Self(high)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({:016x})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016x}", self.0)
            }
        }

        impl NdrEncode for $name {
            fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
                w.write_data(self.0)
            }
        }

        impl NdrDecode for $name {
            fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
                r.read_data().map(Self)
            }
        }
    };
}

u64_identifier!(
    /// Object Exporter Identifier
    ///
    /// Identifies the object exporter (apartment) that hosts an object.
    Oxid,
    "OXID"
);

u64_identifier!(
    /// Object Identifier
    Oid,
    "OID"
);

/// Interface Pointer Identifier
///
/// Identifies one interface on one object. Calls on that interface carry
/// the IPID as their object UUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipid(pub Uuid);

impl Ipid {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random IPID
    pub fn generate() -> Self {
        Self(generate_uuid())
    }

    pub fn nil() -> Self {
        Self(Uuid::NIL)
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Ipid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Ipid> for Uuid {
    fn from(ipid: Ipid) -> Self {
        ipid.0
    }
}

impl fmt::Debug for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPID({})", self.0)
    }
}

impl fmt::Display for Ipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NdrEncode for Ipid {
    fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        self.0.encode_inline(w)
    }
}

impl NdrDecode for Ipid {
    fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        Uuid::decode_inline(r).map(Self)
    }
}
