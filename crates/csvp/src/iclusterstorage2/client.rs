//! IClusterStorage2 client

use std::sync::Arc;

use dcerpc::Conn;
use dcom::iunknown::UnknownClient;
use dcom::{CallResult, Ipid, ObjectBinding};

use super::protocol::*;

/// IClusterStorage2 client
///
/// Calls need the IPID of a marshaled `IClusterStorage2` pointer, set with
/// [`with_ipid`](Self::with_ipid).
#[derive(Clone, Debug)]
pub struct ClusterStorage2Client {
    binding: ObjectBinding,
}

impl ClusterStorage2Client {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self {
            binding: ObjectBinding::new(conn, CLUSTER_STORAGE2_SYNTAX),
        }
    }

    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            binding: self.binding.with_ipid(ipid),
        }
    }

    pub fn binding(&self) -> &ObjectBinding {
        &self.binding
    }

    /// IUnknown operations on the same interface pointer
    pub fn unknown(&self) -> UnknownClient {
        UnknownClient::from_binding(self.binding.clone())
    }

    pub async fn raw_read(&self, request: &RawReadRequest) -> CallResult<RawReadResponse> {
        self.binding
            .call("IClusterStorage2::CprepDiskRawRead", opnum::RAW_READ, request)
            .await
    }

    pub async fn raw_write(&self, request: &RawWriteRequest) -> CallResult<RawWriteResponse> {
        self.binding
            .call("IClusterStorage2::CprepDiskRawWrite", opnum::RAW_WRITE, request)
            .await
    }

    pub async fn prepare_node(&self, request: &PrepareNodeRequest) -> CallResult<PrepareNodeResponse> {
        self.binding
            .call("IClusterStorage2::CprepPrepareNode", opnum::PREPARE_NODE, request)
            .await
    }

    pub async fn prepare_node_phase2(
        &self,
        request: &PrepareNodePhase2Request,
    ) -> CallResult<PrepareNodePhase2Response> {
        self.binding
            .call(
                "IClusterStorage2::CprepPrepareNodePhase2",
                opnum::PREPARE_NODE_PHASE2,
                request,
            )
            .await
    }
}
