//! DCE RPC protocol identifiers
//!
//! Interface and transfer syntax identifiers plus the fault status codes a
//! server reports when a call cannot complete.

use std::fmt;

pub use midl_ndr::Uuid;

use crate::error::{Result, RpcError};

/// Syntax ID - interface UUID with version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyntaxId {
    pub uuid: Uuid,
    pub version: u32, // major in lower 16 bits, minor in upper 16 bits
}

impl SyntaxId {
    pub const fn new(uuid: Uuid, major: u16, minor: u16) -> Self {
        Self {
            uuid,
            version: (major as u32) | ((minor as u32) << 16),
        }
    }

    /// Build a syntax ID from a UUID string
    pub fn parse(uuid: &str, major: u16, minor: u16) -> Result<Self> {
        let uuid = Uuid::parse(uuid).ok_or_else(|| RpcError::InvalidUuid(uuid.to_string()))?;
        Ok(Self::new(uuid, major, minor))
    }

    pub fn major_version(&self) -> u16 {
        self.version as u16
    }

    pub fn minor_version(&self) -> u16 {
        (self.version >> 16) as u16
    }
}

impl fmt::Display for SyntaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{}.{}",
            self.uuid,
            self.major_version(),
            self.minor_version()
        )
    }
}

/// NDR Transfer Syntax UUID
pub const NDR_SYNTAX_UUID: &str = "8a885d04-1ceb-11c9-9fe8-08002b104860";
pub const NDR_SYNTAX_VERSION: u32 = 2;

/// NDR64 Transfer Syntax UUID
pub const NDR64_SYNTAX_UUID: &str = "71710533-beba-4937-8319-b5dbef9ccc36";
pub const NDR64_SYNTAX_VERSION: u32 = 1;

/// NDR20 transfer syntax
pub const NDR_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(
        0x8a885d04,
        0x1ceb,
        0x11c9,
        [0x9f, 0xe8, 0x08, 0x00, 0x2b, 0x10, 0x48, 0x60],
    ),
    2,
    0,
);

/// NDR64 transfer syntax
pub const NDR64_SYNTAX: SyntaxId = SyntaxId::new(
    Uuid::new(
        0x71710533,
        0xbeba,
        0x4937,
        [0x83, 0x19, 0xb5, 0xdb, 0xef, 0x9c, 0xcc, 0x36],
    ),
    1,
    0,
);

/// Fault status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FaultStatus {
    /// No error
    None = 0,
    /// Access denied
    AccessDenied = 0x00000005,
    /// Stub data could not be marshalled or unmarshalled
    FaultNdr = 0x000006f7,
    /// General RPC error
    RpcError = 0x1c000000,
    /// Protocol version not supported
    NdrVersion = 0x1c000008,
    /// Call cancelled
    Cancel = 0x1c00000d,
    /// Unspecified server failure
    Unspecified = 0x1c000012,
    /// Context mismatch
    ContextMismatch = 0x1c00001a,
    /// Operation not implemented
    OpRngError = 0x1c010002,
    /// Unknown interface
    UnkIf = 0x1c010003,
}

impl FaultStatus {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(FaultStatus::None),
            0x00000005 => Some(FaultStatus::AccessDenied),
            0x000006f7 => Some(FaultStatus::FaultNdr),
            0x1c000000 => Some(FaultStatus::RpcError),
            0x1c000008 => Some(FaultStatus::NdrVersion),
            0x1c00000d => Some(FaultStatus::Cancel),
            0x1c000012 => Some(FaultStatus::Unspecified),
            0x1c00001a => Some(FaultStatus::ContextMismatch),
            0x1c010002 => Some(FaultStatus::OpRngError),
            0x1c010003 => Some(FaultStatus::UnkIf),
            _ => None,
        }
    }

    /// Symbolic name as used in the DCE RPC documents
    pub fn name(self) -> &'static str {
        match self {
            FaultStatus::None => "success",
            FaultStatus::AccessDenied => "nca_s_access_denied",
            FaultStatus::FaultNdr => "nca_s_fault_ndr",
            FaultStatus::RpcError => "nca_s_rpc_error",
            FaultStatus::NdrVersion => "nca_s_unsupported_type",
            FaultStatus::Cancel => "nca_s_fault_cancel",
            FaultStatus::Unspecified => "nca_s_fault_unspec",
            FaultStatus::ContextMismatch => "nca_s_fault_context_mismatch",
            FaultStatus::OpRngError => "nca_s_op_rng_error",
            FaultStatus::UnkIf => "nca_s_unk_if",
        }
    }
}

impl fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
