//! DCE RPC call substrate
//!
//! This crate carries calls between generated clients and servers:
//!
//! - [`SyntaxId`] and [`Uuid`] identify interfaces
//! - [`Conn`] moves encoded stub data for one call; [`LoopbackConn`] is an
//!   in-process implementation
//! - [`DispatchTable`] routes an opnum to the interface in an inheritance
//!   chain that owns it, decodes the request, runs the handler and encodes
//!   the response
//! - [`RpcError`] and [`FaultStatus`] describe failures
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dcerpc::{
//!     call, invoke_operation, operation_unavailable, CallContext, CallOptions, Conn,
//!     DispatchFuture, DispatchTable, LoopbackConn, NdrReader, Result, SyntaxId,
//! };
//!
//! midl_ndr::ndr_params! {
//!     #[derive(Debug, Default)]
//!     struct Value { value: u32 }
//! }
//!
//! struct Doubler;
//!
//! fn dispatch(h: Arc<Doubler>, ctx: CallContext, opnum: u16, r: NdrReader) -> DispatchFuture {
//!     match opnum {
//!         0 => invoke_operation(h, ctx, r, |_h, _ctx, req: Value| async move {
//!             Ok(Value { value: req.value * 2 })
//!         }),
//!         _ => operation_unavailable(opnum),
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let syntax = SyntaxId::parse("12345678-1234-1234-1234-123456789012", 1, 0)?;
//! let conn = LoopbackConn::new();
//! conn.register_server(syntax, DispatchTable::new("Doubler", dispatch).into_handle(Arc::new(Doubler)))?;
//!
//! let out: Value = call(&conn, &syntax, 0, CallOptions::new(), &Value { value: 21 }).await?;
//! assert_eq!(out.value, 42);
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod conn;
pub mod dcerpc;
pub mod dispatch;
pub mod error;
pub mod loopback;

pub use cancel::CancelToken;
pub use conn::{call, CallContext, CallOptions, Conn, DispatchOutcome, ServerHandle};
pub use dcerpc::{
    FaultStatus, SyntaxId, Uuid, NDR64_SYNTAX, NDR64_SYNTAX_UUID, NDR64_SYNTAX_VERSION, NDR_SYNTAX,
    NDR_SYNTAX_UUID, NDR_SYNTAX_VERSION,
};
pub use dispatch::{
    invoke_operation, operation_unavailable, DispatchFn, DispatchFuture, DispatchTable,
    EncodeResponse, Invocation, OperationRange,
};
pub use error::{Result, RpcError};
pub use loopback::{ConnConfig, ConnStats, ConnStatsSnapshot, LoopbackConn, DEFAULT_MAX_REQUEST_SIZE};

/// Re-export the NDR runtime types stubs are written against
pub use midl_ndr::{NdrContext, NdrReader, NdrWriter};
