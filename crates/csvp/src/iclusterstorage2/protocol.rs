//! IClusterStorage2 wire protocol

use dcerpc::{SyntaxId, Uuid};
use midl_ndr::{ndr_params, ConformantArray, ConformantVaryingArray};

use crate::DiskId;
use dcom::{OrpcThat, OrpcThis};

/// IClusterStorage2 interface UUID
pub const CLUSTER_STORAGE2_UUID: &str = "12108a88-6858-4467-b92f-e6cf4568dfb6";

/// IClusterStorage2 interface version
pub const CLUSTER_STORAGE2_VERSION: (u16, u16) = (0, 0);

/// IClusterStorage2 syntax
pub const CLUSTER_STORAGE2_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(
        0x12108a88,
        0x6858,
        0x4467,
        [0xb9, 0x2f, 0xe6, 0xcf, 0x45, 0x68, 0xdf, 0xb6],
    ),
    CLUSTER_STORAGE2_VERSION.0,
    CLUSTER_STORAGE2_VERSION.1,
);

/// Operation numbers for IClusterStorage2
pub mod opnum {
    pub const RAW_READ: u16 = 3;
    pub const RAW_WRITE: u16 = 4;
    pub const PREPARE_NODE: u16 = 5;
    pub const PREPARE_NODE_PHASE2: u16 = 6;
}

/// Size of a disk sector moved by the raw operations
pub const SECTOR_SIZE: u32 = 512;

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RawReadRequest {
        pub this: OrpcThis,
        pub disk_id: DiskId,
        pub sector: u32,
        /// Bytes to read, at most one sector
        pub data_length: u32,
    }
}

impl RawReadRequest {
    pub fn new(disk_id: DiskId, sector: u32, data_length: u32) -> Self {
        Self {
            this: OrpcThis::new(),
            disk_id,
            sector,
            data_length,
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RawReadResponse {
        pub that: OrpcThat,
        /// `size_is(cbData)`, `length_is(pcbDataRead)`
        pub data: ConformantVaryingArray<u8>,
        pub data_read_length: u32,
        pub latency: u32,
        pub return_value: i32,
    }
}

impl RawReadResponse {
    /// Response for a `data_length` byte read that produced `data`
    pub fn new(data_length: u32, data: Vec<u8>) -> Self {
        let read = data.len() as u32;
        Self {
            that: OrpcThat::new(),
            data: ConformantVaryingArray::with_bounds(u64::from(data_length), u64::from(read), data),
            data_read_length: read,
            latency: 0,
            return_value: 0,
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RawWriteRequest {
        pub this: OrpcThis,
        pub disk_id: DiskId,
        pub sector: u32,
        pub data_length: u32,
        /// `size_is(cbData)`
        pub data: ConformantArray<u8>,
    }
}

impl RawWriteRequest {
    /// Write `data` padded with zeros to `data_length` bytes
    pub fn new(disk_id: DiskId, sector: u32, data_length: u32, data: Vec<u8>) -> Self {
        Self {
            this: OrpcThis::new(),
            disk_id,
            sector,
            data_length,
            data: ConformantArray::with_max(u64::from(data_length), data),
        }
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct RawWriteResponse {
        pub that: OrpcThat,
        pub data_written_length: u32,
        pub latency: u32,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct PrepareNodeRequest {
        pub this: OrpcThis,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct PrepareNodeResponse {
        pub that: OrpcThat,
        pub major_version: u32,
        pub minor_version: u32,
        pub cprep_version: u32,
        pub return_value: i32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct PrepareNodePhase2Request {
        pub this: OrpcThis,
        /// Must be zero
        pub flags: u32,
    }
}

ndr_params! {
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct PrepareNodePhase2Response {
        pub that: OrpcThat,
        pub num_disks: u32,
        pub return_value: i32,
    }
}

dcom::orpc_response!(
    RawReadResponse,
    RawWriteResponse,
    PrepareNodeResponse,
    PrepareNodePhase2Response,
);
