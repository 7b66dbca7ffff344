//! IUnknown wire protocol

use dcerpc::{SyntaxId, Uuid};
use midl_ndr::{ndr_params, UniquePtr};

use crate::types::{InterfacePointer, OrpcThat, OrpcThis};

/// IUnknown interface UUID
pub const IUNKNOWN_UUID: &str = "00000000-0000-0000-c000-000000000046";

/// IUnknown interface version
pub const IUNKNOWN_VERSION: (u16, u16) = (0, 0);

/// IUnknown syntax
pub const IUNKNOWN_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(0x00000000, 0x0000, 0x0000, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]),
    IUNKNOWN_VERSION.0,
    IUNKNOWN_VERSION.1,
);

/// Operation numbers for IUnknown
pub mod opnum {
    pub const QUERY_INTERFACE: u16 = 0;
    pub const ADD_REF: u16 = 1;
    pub const RELEASE: u16 = 2;
}

/// First opnum of an interface derived from IUnknown
pub const IUNKNOWN_OPNUM_COUNT: u16 = 3;

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct QueryInterfaceRequest {
        pub this: OrpcThis,
        /// Requested interface
        pub iid: Uuid,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct QueryInterfaceResponse {
        pub that: OrpcThat,
        pub object: UniquePtr<InterfacePointer>,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct AddRefRequest {
        pub this: OrpcThis,
    }
}

ndr_params! {
    /// The return value is the new reference count, not an HRESULT
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct AddRefResponse {
        pub that: OrpcThat,
        pub return_value: u32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ReleaseRequest {
        pub this: OrpcThis,
    }
}

ndr_params! {
    /// The return value is the new reference count, not an HRESULT
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ReleaseResponse {
        pub that: OrpcThat,
        pub return_value: u32,
    }
}

crate::orpc_response!(QueryInterfaceResponse);
