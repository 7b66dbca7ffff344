//! IRemUnknown server side

use std::sync::Arc;

use async_trait::async_trait;
use dcerpc::{
    invoke_operation, operation_unavailable, CallContext, Conn, DispatchFuture, DispatchTable,
    NdrReader, Result, RpcError,
};

use super::protocol::*;
use crate::iunknown::{unknown_table, UnknownServer, IUNKNOWN_OPNUM_COUNT};

/// IRemUnknown server
#[async_trait]
pub trait RemUnknownServer: UnknownServer {
    async fn rem_query_interface(
        &self,
        _ctx: &CallContext,
        _request: RemQueryInterfaceRequest,
    ) -> Result<RemQueryInterfaceResponse> {
        Err(RpcError::NotImplemented("IRemUnknown::RemQueryInterface".into()))
    }

    async fn rem_add_ref(
        &self,
        _ctx: &CallContext,
        _request: RemAddRefRequest,
    ) -> Result<RemAddRefResponse> {
        Err(RpcError::NotImplemented("IRemUnknown::RemAddRef".into()))
    }

    async fn rem_release(
        &self,
        _ctx: &CallContext,
        _request: RemReleaseRequest,
    ) -> Result<RemReleaseResponse> {
        Err(RpcError::NotImplemented("IRemUnknown::RemRelease".into()))
    }
}

/// IRemUnknown server that implements nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedRemUnknownServer;

impl UnknownServer for UnimplementedRemUnknownServer {}
impl RemUnknownServer for UnimplementedRemUnknownServer {}

/// Dispatch the opnums IRemUnknown adds to IUnknown
pub fn rem_unknown_server_handle<H>(
    handler: Arc<H>,
    ctx: CallContext,
    opnum: u16,
    reader: NdrReader,
) -> DispatchFuture
where
    H: RemUnknownServer + ?Sized + 'static,
{
    match opnum {
        opnum::REM_QUERY_INTERFACE => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: RemQueryInterfaceRequest| async move { h.rem_query_interface(&ctx, req).await },
        ),
        opnum::REM_ADD_REF => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: RemAddRefRequest| async move { h.rem_add_ref(&ctx, req).await },
        ),
        opnum::REM_RELEASE => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: RemReleaseRequest| async move { h.rem_release(&ctx, req).await },
        ),
        _ => operation_unavailable(opnum),
    }
}

/// Dispatch table for IRemUnknown and its base
pub fn rem_unknown_table<H>() -> DispatchTable<H>
where
    H: RemUnknownServer + ?Sized + 'static,
{
    unknown_table::<H>().extend(IUNKNOWN_OPNUM_COUNT, "IRemUnknown", rem_unknown_server_handle::<H>)
}

/// Register an IRemUnknown server on a connection
pub fn register_rem_unknown_server<H>(conn: &dyn Conn, server: Arc<H>) -> Result<()>
where
    H: RemUnknownServer + ?Sized + 'static,
{
    conn.register_server(REMUNKNOWN_SYNTAX, rem_unknown_table::<H>().into_handle(server))
}
