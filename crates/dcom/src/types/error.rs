//! DCOM error types

use thiserror::Error;

use super::hresult::{codes, Hresult};
use super::identifiers::{Ipid, Oid};

/// Result type for DCOM operations
pub type Result<T> = std::result::Result<T, DcomError>;

/// DCOM-specific errors
#[derive(Error, Debug)]
pub enum DcomError {
    /// Underlying DCE RPC error
    #[error(transparent)]
    Rpc(#[from] dcerpc::RpcError),

    /// Interface not found
    #[error("interface not found: IPID {0}")]
    InterfaceNotFound(Ipid),

    /// Object not found
    #[error("object not found: OID {0}")]
    ObjectNotFound(Oid),

    /// Requested interface is not supported by the object
    #[error("no such interface: {0}")]
    NoInterface(dcerpc::Uuid),

    /// Reference counting error
    #[error("reference counting error: {0}")]
    RefCountError(String),

    /// Invalid data
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DcomError {
    /// HRESULT reported to a remote caller for this error
    pub fn hresult(&self) -> Hresult {
        match self {
            DcomError::Rpc(err) => Hresult(err.status().unwrap_or(codes::E_FAIL)),
            DcomError::InterfaceNotFound(_) | DcomError::ObjectNotFound(_) => {
                Hresult(codes::CO_E_OBJNOTCONNECTED)
            }
            DcomError::NoInterface(_) => Hresult(codes::E_NOINTERFACE),
            DcomError::RefCountError(_) | DcomError::InvalidData(_) => Hresult(codes::E_INVALIDARG),
        }
    }
}

impl From<midl_ndr::NdrError> for DcomError {
    fn from(err: midl_ndr::NdrError) -> Self {
        DcomError::Rpc(err.into())
    }
}

/// Handlers report DCOM failures to the caller as faults carrying the HRESULT
impl From<DcomError> for dcerpc::RpcError {
    fn from(err: DcomError) -> Self {
        match err {
            DcomError::Rpc(err) => err,
            other => dcerpc::RpcError::Fault(other.hresult().0 as u32),
        }
    }
}
