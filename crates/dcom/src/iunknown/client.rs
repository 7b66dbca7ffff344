//! IUnknown client

use std::sync::Arc;

use dcerpc::{Conn, Result};

use super::protocol::*;
use crate::client::{CallResult, ObjectBinding};
use crate::types::Ipid;

/// IUnknown client
///
/// Derived interface clients build one over their own binding, so the base
/// operations travel under the derived interface syntax.
#[derive(Clone, Debug)]
pub struct UnknownClient {
    binding: ObjectBinding,
}

impl UnknownClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self::from_binding(ObjectBinding::new(conn, IUNKNOWN_SYNTAX))
    }

    pub fn from_binding(binding: ObjectBinding) -> Self {
        Self { binding }
    }

    /// Client for the interface pointer `ipid`
    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::from_binding(self.binding.with_ipid(ipid))
    }

    pub fn binding(&self) -> &ObjectBinding {
        &self.binding
    }

    pub async fn query_interface(
        &self,
        request: &QueryInterfaceRequest,
    ) -> CallResult<QueryInterfaceResponse> {
        self.binding
            .call("IUnknown::QueryInterface", opnum::QUERY_INTERFACE, request)
            .await
    }

    /// Returns the reference count reported by the object
    pub async fn add_ref(&self, request: &AddRefRequest) -> Result<AddRefResponse> {
        self.binding
            .call_unchecked("IUnknown::AddRef", opnum::ADD_REF, request)
            .await
    }

    /// Returns the reference count reported by the object
    pub async fn release(&self, request: &ReleaseRequest) -> Result<ReleaseResponse> {
        self.binding
            .call_unchecked("IUnknown::Release", opnum::RELEASE, request)
            .await
    }
}
