//! IUnknown server side

use std::sync::Arc;

use async_trait::async_trait;
use dcerpc::{
    invoke_operation, operation_unavailable, CallContext, Conn, DispatchFuture, DispatchTable,
    NdrReader, Result, RpcError,
};

use super::protocol::*;

/// IUnknown server
///
/// Every method defaults to [`RpcError::NotImplemented`]; implementors
/// override what they support.
#[async_trait]
pub trait UnknownServer: Send + Sync {
    async fn query_interface(
        &self,
        _ctx: &CallContext,
        _request: QueryInterfaceRequest,
    ) -> Result<QueryInterfaceResponse> {
        Err(RpcError::NotImplemented("IUnknown::QueryInterface".into()))
    }

    async fn add_ref(&self, _ctx: &CallContext, _request: AddRefRequest) -> Result<AddRefResponse> {
        Err(RpcError::NotImplemented("IUnknown::AddRef".into()))
    }

    async fn release(&self, _ctx: &CallContext, _request: ReleaseRequest) -> Result<ReleaseResponse> {
        Err(RpcError::NotImplemented("IUnknown::Release".into()))
    }
}

/// IUnknown server that implements nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedUnknownServer;

impl UnknownServer for UnimplementedUnknownServer {}

/// Dispatch IUnknown opnums
pub fn unknown_server_handle<H>(
    handler: Arc<H>,
    ctx: CallContext,
    opnum: u16,
    reader: NdrReader,
) -> DispatchFuture
where
    H: UnknownServer + ?Sized + 'static,
{
    match opnum {
        opnum::QUERY_INTERFACE => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: QueryInterfaceRequest| async move { h.query_interface(&ctx, req).await },
        ),
        opnum::ADD_REF => invoke_operation(handler, ctx, reader, |h, ctx, req: AddRefRequest| async move {
            h.add_ref(&ctx, req).await
        }),
        opnum::RELEASE => invoke_operation(handler, ctx, reader, |h, ctx, req: ReleaseRequest| async move {
            h.release(&ctx, req).await
        }),
        _ => operation_unavailable(opnum),
    }
}

/// Dispatch table rooted at IUnknown
pub fn unknown_table<H>() -> DispatchTable<H>
where
    H: UnknownServer + ?Sized + 'static,
{
    DispatchTable::new("IUnknown", unknown_server_handle::<H>)
}

/// Register an IUnknown server on a connection
pub fn register_unknown_server<H>(conn: &dyn Conn, server: Arc<H>) -> Result<()>
where
    H: UnknownServer + ?Sized + 'static,
{
    conn.register_server(IUNKNOWN_SYNTAX, unknown_table::<H>().into_handle(server))
}
