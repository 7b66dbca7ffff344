//! IRemUnknown client

use std::sync::Arc;

use dcerpc::Conn;

use super::protocol::*;
use crate::client::{CallResult, ObjectBinding};
use crate::iunknown::UnknownClient;
use crate::types::Ipid;

/// IRemUnknown client
#[derive(Clone, Debug)]
pub struct RemUnknownClient {
    binding: ObjectBinding,
}

impl RemUnknownClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self::from_binding(ObjectBinding::new(conn, REMUNKNOWN_SYNTAX))
    }

    pub fn from_binding(binding: ObjectBinding) -> Self {
        Self { binding }
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self::from_binding(self.binding.with_ipid(ipid))
    }

    pub fn binding(&self) -> &ObjectBinding {
        &self.binding
    }

    pub fn unknown(&self) -> UnknownClient {
        UnknownClient::from_binding(self.binding.clone())
    }

    pub async fn rem_query_interface(
        &self,
        request: &RemQueryInterfaceRequest,
    ) -> CallResult<RemQueryInterfaceResponse> {
        self.binding
            .call("IRemUnknown::RemQueryInterface", opnum::REM_QUERY_INTERFACE, request)
            .await
    }

    pub async fn rem_add_ref(&self, request: &RemAddRefRequest) -> CallResult<RemAddRefResponse> {
        self.binding
            .call("IRemUnknown::RemAddRef", opnum::REM_ADD_REF, request)
            .await
    }

    pub async fn rem_release(&self, request: &RemReleaseRequest) -> CallResult<RemReleaseResponse> {
        self.binding
            .call("IRemUnknown::RemRelease", opnum::REM_RELEASE, request)
            .await
    }
}
