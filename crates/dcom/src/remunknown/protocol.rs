//! IRemUnknown wire protocol

use dcerpc::{SyntaxId, Uuid};
use midl_ndr::{ndr_params, ndr_struct, ConformantArray, UniquePtr};

use crate::types::{Ipid, OrpcThat, OrpcThis, StdObjRef};

/// IRemUnknown interface UUID
pub const REMUNKNOWN_UUID: &str = "00000131-0000-0000-c000-000000000046";

/// IRemUnknown interface version
pub const REMUNKNOWN_VERSION: (u16, u16) = (0, 0);

/// IRemUnknown syntax
pub const REMUNKNOWN_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(0x00000131, 0x0000, 0x0000, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]),
    REMUNKNOWN_VERSION.0,
    REMUNKNOWN_VERSION.1,
);

/// Operation numbers for IRemUnknown
pub mod opnum {
    pub const REM_QUERY_INTERFACE: u16 = 3;
    pub const REM_ADD_REF: u16 = 4;
    pub const REM_RELEASE: u16 = 5;
}

ndr_struct! {
    /// REMQIRESULT structure (MS-DCOM 2.2.22)
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct RemQiResult align(8) {
        pub hresult: i32,
        /// Valid only when `hresult` is zero
        pub std: StdObjRef,
    }
}

impl RemQiResult {
    pub fn success(std: StdObjRef) -> Self {
        Self { hresult: 0, std }
    }

    pub fn failure(hresult: i32) -> Self {
        Self {
            hresult,
            std: StdObjRef::default(),
        }
    }
}

ndr_struct! {
    /// REMINTERFACEREF structure (MS-DCOM 2.2.23)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RemInterfaceRef align(4) {
        pub ipid: Ipid,
        pub public_refs: u32,
        pub private_refs: u32,
    }
}

impl RemInterfaceRef {
    pub fn new(ipid: Ipid, public_refs: u32, private_refs: u32) -> Self {
        Self {
            ipid,
            public_refs,
            private_refs,
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemQueryInterfaceRequest {
        pub this: OrpcThis,
        /// Interface already held on the object
        pub ipid: Ipid,
        /// Public references requested for each new interface
        pub refs: u32,
        pub iid_count: u16,
        pub iids: ConformantArray<Uuid>,
    }
}

impl RemQueryInterfaceRequest {
    pub fn new(ipid: Ipid, refs: u32, iids: Vec<Uuid>) -> Self {
        Self {
            this: OrpcThis::new(),
            ipid,
            refs,
            iid_count: iids.len() as u16,
            iids: iids.into(),
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemQueryInterfaceResponse {
        pub that: OrpcThat,
        /// One result per requested IID, in request order
        pub results: UniquePtr<ConformantArray<RemQiResult>>,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemAddRefRequest {
        pub this: OrpcThis,
        pub ref_count: u16,
        pub refs: ConformantArray<RemInterfaceRef>,
    }
}

impl RemAddRefRequest {
    pub fn new(refs: Vec<RemInterfaceRef>) -> Self {
        Self {
            this: OrpcThis::new(),
            ref_count: refs.len() as u16,
            refs: refs.into(),
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemAddRefResponse {
        pub that: OrpcThat,
        /// One HRESULT per interface reference
        pub results: ConformantArray<i32>,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemReleaseRequest {
        pub this: OrpcThis,
        pub ref_count: u16,
        pub refs: ConformantArray<RemInterfaceRef>,
    }
}

impl RemReleaseRequest {
    pub fn new(refs: Vec<RemInterfaceRef>) -> Self {
        Self {
            this: OrpcThis::new(),
            ref_count: refs.len() as u16,
            refs: refs.into(),
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RemReleaseResponse {
        pub that: OrpcThat,
        pub return_value: i32,
    }
}

crate::orpc_response!(RemQueryInterfaceResponse, RemAddRefResponse, RemReleaseResponse);
