//! IClusterStorage2 server side

use std::sync::Arc;

use async_trait::async_trait;
use dcerpc::{
    invoke_operation, operation_unavailable, CallContext, Conn, DispatchFuture, DispatchTable,
    NdrReader, Result, RpcError,
};
use dcom::iunknown::{unknown_table, UnknownServer, IUNKNOWN_OPNUM_COUNT};

use super::protocol::*;

/// IClusterStorage2 server
#[async_trait]
pub trait ClusterStorage2Server: UnknownServer {
    /// Read at most one sector from a disk
    async fn raw_read(&self, _ctx: &CallContext, _request: RawReadRequest) -> Result<RawReadResponse> {
        Err(RpcError::NotImplemented("IClusterStorage2::CprepDiskRawRead".into()))
    }

    /// Write at most one sector to a disk
    async fn raw_write(&self, _ctx: &CallContext, _request: RawWriteRequest) -> Result<RawWriteResponse> {
        Err(RpcError::NotImplemented("IClusterStorage2::CprepDiskRawWrite".into()))
    }

    async fn prepare_node(
        &self,
        _ctx: &CallContext,
        _request: PrepareNodeRequest,
    ) -> Result<PrepareNodeResponse> {
        Err(RpcError::NotImplemented("IClusterStorage2::CprepPrepareNode".into()))
    }

    async fn prepare_node_phase2(
        &self,
        _ctx: &CallContext,
        _request: PrepareNodePhase2Request,
    ) -> Result<PrepareNodePhase2Response> {
        Err(RpcError::NotImplemented("IClusterStorage2::CprepPrepareNodePhase2".into()))
    }
}

/// IClusterStorage2 server that implements nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedClusterStorage2Server;

impl UnknownServer for UnimplementedClusterStorage2Server {}
impl ClusterStorage2Server for UnimplementedClusterStorage2Server {}

/// Dispatch the opnums IClusterStorage2 adds to IUnknown
pub fn cluster_storage2_server_handle<H>(
    handler: Arc<H>,
    ctx: CallContext,
    opnum: u16,
    reader: NdrReader,
) -> DispatchFuture
where
    H: ClusterStorage2Server + ?Sized + 'static,
{
    match opnum {
        opnum::RAW_READ => invoke_operation(handler, ctx, reader, |h, ctx, req: RawReadRequest| async move {
            h.raw_read(&ctx, req).await
        }),
        opnum::RAW_WRITE => invoke_operation(handler, ctx, reader, |h, ctx, req: RawWriteRequest| async move {
            h.raw_write(&ctx, req).await
        }),
        opnum::PREPARE_NODE => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: PrepareNodeRequest| async move { h.prepare_node(&ctx, req).await },
        ),
        opnum::PREPARE_NODE_PHASE2 => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: PrepareNodePhase2Request| async move { h.prepare_node_phase2(&ctx, req).await },
        ),
        _ => operation_unavailable(opnum),
    }
}

/// Dispatch table for IClusterStorage2 and its base
pub fn cluster_storage2_table<H>() -> DispatchTable<H>
where
    H: ClusterStorage2Server + ?Sized + 'static,
{
    unknown_table::<H>().extend(
        IUNKNOWN_OPNUM_COUNT,
        "IClusterStorage2",
        cluster_storage2_server_handle::<H>,
    )
}

/// Register an IClusterStorage2 server on a connection
pub fn register_cluster_storage2_server<H>(conn: &dyn Conn, server: Arc<H>) -> Result<()>
where
    H: ClusterStorage2Server + ?Sized + 'static,
{
    conn.register_server(
        CLUSTER_STORAGE2_SYNTAX,
        cluster_storage2_table::<H>().into_handle(server),
    )
}
