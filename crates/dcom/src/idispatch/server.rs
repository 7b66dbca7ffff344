//! IDispatch server side

use std::sync::Arc;

use async_trait::async_trait;
use dcerpc::{
    invoke_operation, operation_unavailable, CallContext, Conn, DispatchFuture, DispatchTable,
    NdrReader, Result, RpcError,
};

use super::protocol::*;
use crate::iunknown::{unknown_table, UnknownServer};

/// IDispatch server
#[async_trait]
pub trait DispatchServer: UnknownServer {
    async fn get_type_info_count(
        &self,
        _ctx: &CallContext,
        _request: GetTypeInfoCountRequest,
    ) -> Result<GetTypeInfoCountResponse> {
        Err(RpcError::NotImplemented("IDispatch::GetTypeInfoCount".into()))
    }

    async fn get_type_info(
        &self,
        _ctx: &CallContext,
        _request: GetTypeInfoRequest,
    ) -> Result<GetTypeInfoResponse> {
        Err(RpcError::NotImplemented("IDispatch::GetTypeInfo".into()))
    }

    async fn get_ids_of_names(
        &self,
        _ctx: &CallContext,
        _request: GetIdsOfNamesRequest,
    ) -> Result<GetIdsOfNamesResponse> {
        Err(RpcError::NotImplemented("IDispatch::GetIDsOfNames".into()))
    }

    async fn invoke(&self, _ctx: &CallContext, _request: InvokeRequest) -> Result<InvokeResponse> {
        Err(RpcError::NotImplemented("IDispatch::Invoke".into()))
    }
}

/// IDispatch server that implements nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedDispatchServer;

impl UnknownServer for UnimplementedDispatchServer {}
impl DispatchServer for UnimplementedDispatchServer {}

/// Dispatch the opnums IDispatch adds to IUnknown
pub fn dispatch_server_handle<H>(
    handler: Arc<H>,
    ctx: CallContext,
    opnum: u16,
    reader: NdrReader,
) -> DispatchFuture
where
    H: DispatchServer + ?Sized + 'static,
{
    match opnum {
        opnum::GET_TYPE_INFO_COUNT => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: GetTypeInfoCountRequest| async move { h.get_type_info_count(&ctx, req).await },
        ),
        opnum::GET_TYPE_INFO => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: GetTypeInfoRequest| async move { h.get_type_info(&ctx, req).await },
        ),
        opnum::GET_IDS_OF_NAMES => invoke_operation(
            handler,
            ctx,
            reader,
            |h, ctx, req: GetIdsOfNamesRequest| async move { h.get_ids_of_names(&ctx, req).await },
        ),
        opnum::INVOKE => invoke_operation(handler, ctx, reader, |h, ctx, req: InvokeRequest| async move {
            h.invoke(&ctx, req).await
        }),
        _ => operation_unavailable(opnum),
    }
}

/// Dispatch table for IDispatch and its base
pub fn dispatch_table<H>() -> DispatchTable<H>
where
    H: DispatchServer + ?Sized + 'static,
{
    unknown_table::<H>().extend(
        crate::iunknown::IUNKNOWN_OPNUM_COUNT,
        "IDispatch",
        dispatch_server_handle::<H>,
    )
}

/// Register an IDispatch server on a connection
pub fn register_dispatch_server<H>(conn: &dyn Conn, server: Arc<H>) -> Result<()>
where
    H: DispatchServer + ?Sized + 'static,
{
    conn.register_server(IDISPATCH_SYNTAX, dispatch_table::<H>().into_handle(server))
}
