//! IDispatch client

use std::sync::Arc;

use dcerpc::Conn;

use super::protocol::*;
use crate::client::{CallResult, ObjectBinding};
use crate::iunknown::UnknownClient;
use crate::types::Ipid;

/// IDispatch client
#[derive(Clone, Debug)]
pub struct DispatchClient {
    binding: ObjectBinding,
}

impl DispatchClient {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self::from_binding(ObjectBinding::new(conn, IDISPATCH_SYNTAX))
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

    /// IUnknown operations on the same interface pointer
    pub fn unknown(&self) -> UnknownClient {
        UnknownClient::from_binding(self.binding.clone())
    }

    pub async fn get_type_info_count(
        &self,
        request: &GetTypeInfoCountRequest,
    ) -> CallResult<GetTypeInfoCountResponse> {
        self.binding
            .call("IDispatch::GetTypeInfoCount", opnum::GET_TYPE_INFO_COUNT, request)
            .await
    }

    pub async fn get_type_info(&self, request: &GetTypeInfoRequest) -> CallResult<GetTypeInfoResponse> {
        self.binding
            .call("IDispatch::GetTypeInfo", opnum::GET_TYPE_INFO, request)
            .await
    }

    pub async fn get_ids_of_names(
        &self,
        request: &GetIdsOfNamesRequest,
    ) -> CallResult<GetIdsOfNamesResponse> {
        self.binding
            .call("IDispatch::GetIDsOfNames", opnum::GET_IDS_OF_NAMES, request)
            .await
    }

    pub async fn invoke(&self, request: &InvokeRequest) -> CallResult<InvokeResponse> {
        self.binding.call("IDispatch::Invoke", opnum::INVOKE, request).await
    }
}
