//! Error types for DCE RPC

use thiserror::Error;

use crate::dcerpc::FaultStatus;

/// RPC error types
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("NDR error: {0}")]
    Ndr(#[from] midl_ndr::NdrError),

    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("operation unavailable: {0}")]
    OperationUnavailable(u16),

    #[error("{0}: not implemented")]
    NotImplemented(String),

    #[error("fault: {} (0x{0:08x})", fault_name(.0))]
    Fault(u32),

    /// Non-zero status returned by an operation
    #[error("{operation}: {message}")]
    Status {
        operation: String,
        status: i32,
        message: String,
    },

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("{0}: ipid is missing")]
    MissingObject(String),

    #[error("call cancelled")]
    Cancelled,

    #[error("request too large: {size} bytes exceeds maximum {max}")]
    RequestTooLarge { size: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,
}

impl RpcError {
    /// Status code carried by a [`RpcError::Status`] or [`RpcError::Fault`]
    pub fn status(&self) -> Option<i32> {
        match self {
            RpcError::Status { status, .. } => Some(*status),
            RpcError::Fault(code) => Some(*code as i32),
            _ => None,
        }
    }

    /// Fault status a server reports for this error
    pub fn fault_status(&self) -> u32 {
        match self {
            RpcError::Ndr(_) => FaultStatus::FaultNdr as u32,
            RpcError::InterfaceNotFound(_) => FaultStatus::UnkIf as u32,
            RpcError::OperationUnavailable(_) | RpcError::NotImplemented(_) => {
                FaultStatus::OpRngError as u32
            }
            RpcError::Fault(code) => *code,
            RpcError::Status { status, .. } => *status as u32,
            RpcError::Cancelled => FaultStatus::Cancel as u32,
            _ => FaultStatus::Unspecified as u32,
        }
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

fn fault_name(status: &u32) -> &'static str {
    FaultStatus::from_u32(*status).map_or("unknown", FaultStatus::name)
}
