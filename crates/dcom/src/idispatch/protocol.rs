//! IDispatch wire protocol

use dcerpc::{SyntaxId, Uuid};
use midl_ndr::{ndr_params, ConformantArray, NdrWString, UniquePtr};

use super::variant::{DispParams, ExcepInfo, Variant};
use crate::types::{InterfacePointer, OrpcThat, OrpcThis};

/// IDispatch interface UUID
pub const IDISPATCH_UUID: &str = "00020400-0000-0000-c000-000000000046";

/// IDispatch interface version
pub const IDISPATCH_VERSION: (u16, u16) = (0, 0);

/// IDispatch syntax
pub const IDISPATCH_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(0x00020400, 0x0000, 0x0000, [0xc0, 0, 0, 0, 0, 0, 0, 0x46]),
    IDISPATCH_VERSION.0,
    IDISPATCH_VERSION.1,
);

/// Operation numbers for IDispatch
pub mod opnum {
    pub const GET_TYPE_INFO_COUNT: u16 = 3;
    pub const GET_TYPE_INFO: u16 = 4;
    pub const GET_IDS_OF_NAMES: u16 = 5;
    pub const INVOKE: u16 = 6;
}

/// First opnum of an interface derived from IDispatch
pub const IDISPATCH_OPNUM_COUNT: u16 = 7;

/// `Invoke` flags
pub mod dispatch_flags {
    pub const METHOD: u32 = 0x1;
    pub const PROPERTYGET: u32 = 0x2;
    pub const PROPERTYPUT: u32 = 0x4;
    pub const PROPERTYPUTREF: u32 = 0x8;
    pub const ZERO_VAR_RESULT: u32 = 0x20000;
    pub const ZERO_EXCEP_INFO: u32 = 0x40000;
    pub const ZERO_ARG_ERR: u32 = 0x80000;
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetTypeInfoCountRequest {
        pub this: OrpcThis,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetTypeInfoCountResponse {
        pub that: OrpcThat,
        /// 1 if type information is available, else 0
        pub count: u32,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetTypeInfoRequest {
        pub this: OrpcThis,
        pub index: u32,
        pub locale_id: u32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetTypeInfoResponse {
        pub that: OrpcThat,
        pub type_info: UniquePtr<InterfacePointer>,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetIdsOfNamesRequest {
        pub this: OrpcThis,
        /// Must be IID_NULL
        pub iid: Uuid,
        pub names: ConformantArray<UniquePtr<NdrWString>>,
        pub name_count: u32,
        pub locale_id: u32,
    }
}

impl GetIdsOfNamesRequest {
    pub fn new(names: &[&str], locale_id: u32) -> Self {
        Self {
            this: OrpcThis::new(),
            iid: Uuid::NIL,
            names: names
                .iter()
                .map(|name| UniquePtr::new(NdrWString::new(*name)))
                .collect::<Vec<_>>()
                .into(),
            name_count: names.len() as u32,
            locale_id,
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct GetIdsOfNamesResponse {
        pub that: OrpcThat,
        pub disp_ids: ConformantArray<i32>,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct InvokeRequest {
        pub this: OrpcThis,
        pub disp_id: i32,
        /// Must be IID_NULL
        pub iid: Uuid,
        pub locale_id: u32,
        pub flags: u32,
        pub params: DispParams,
        pub var_ref_count: u32,
        /// Positions in `params.args` of the by-reference arguments
        pub var_ref_index: ConformantArray<u32>,
        pub var_ref: ConformantArray<UniquePtr<Variant>>,
    }
}

impl InvokeRequest {
    /// Call `disp_id` as a method with positional `args`
    pub fn method(disp_id: i32, args: Vec<Variant>) -> Self {
        Self {
            disp_id,
            flags: dispatch_flags::METHOD,
            params: DispParams::new(args),
            ..Self::default()
        }
    }

    /// Read the property `disp_id`
    pub fn property_get(disp_id: i32) -> Self {
        Self {
            disp_id,
            flags: dispatch_flags::PROPERTYGET,
            ..Self::default()
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct InvokeResponse {
        pub that: OrpcThat,
        pub result: UniquePtr<Variant>,
        pub excep_info: ExcepInfo,
        /// Index of the first argument in error
        pub arg_err: u32,
        pub var_ref: ConformantArray<UniquePtr<Variant>>,
        pub return_value: i32,
    }
}

impl InvokeResponse {
    /// Successful response carrying `result`
    pub fn with_result(result: Variant) -> Self {
        Self {
            result: UniquePtr::new(result),
            ..Self::default()
        }
    }
}

crate::orpc_response!(
    GetTypeInfoCountResponse,
    GetTypeInfoResponse,
    GetIdsOfNamesResponse,
    InvokeResponse,
);
