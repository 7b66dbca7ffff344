//! Connections: the seam between generated clients, servers and the wire
//!
//! A [`Conn`] carries encoded stub data for one call at a time. Clients
//! encode their request with the connection's [`NdrContext`] and hand the
//! bytes to [`Conn::invoke`]; servers register a [`ServerHandle`] per
//! interface syntax and receive the stub data together with a
//! [`CallContext`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use midl_ndr::{NdrContext, NdrDecode, NdrEncode};

use crate::cancel::CancelToken;
use crate::dcerpc::{SyntaxId, Uuid};
use crate::error::{Result, RpcError};

/// Per-call options set by the client
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Object UUID sent with the request; for DCOM this is the IPID
    pub object: Option<Uuid>,
    pub cancel: Option<CancelToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, object: Uuid) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// What a server sees about the call it is handling
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub syntax: SyntaxId,
    pub opnum: u16,
    pub object: Option<Uuid>,
    pub ndr: NdrContext,
    pub cancel: CancelToken,
}

/// Result of dispatching one call on the server
///
/// `stub` is always the encoded response. When the handler failed the
/// response is the default value of the response type and `error` carries
/// the failure; the connection decides how to surface it.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub stub: Bytes,
    pub error: Option<RpcError>,
}

/// Server entry point registered for one interface syntax
pub type ServerHandle =
    Arc<dyn Fn(CallContext, u16, Bytes) -> BoxFuture<'static, Result<DispatchOutcome>> + Send + Sync>;

#[async_trait]
pub trait Conn: Send + Sync {
    /// Data representation used for stub data on this connection
    fn ndr_context(&self) -> NdrContext;

    /// Send encoded request stub data and wait for the response stub data
    async fn invoke(
        &self,
        syntax: &SyntaxId,
        opnum: u16,
        options: CallOptions,
        stub: Bytes,
    ) -> Result<Bytes>;

    /// Register a server for an interface syntax
    fn register_server(&self, syntax: SyntaxId, handle: ServerHandle) -> Result<()>;
}

/// Encode `request`, invoke it, and decode the response
pub async fn call<Req, Resp>(
    conn: &dyn Conn,
    syntax: &SyntaxId,
    opnum: u16,
    options: CallOptions,
    request: &Req,
) -> Result<Resp>
where
    Req: NdrEncode + Sync + ?Sized,
    Resp: NdrDecode,
{
    let ndr = conn.ndr_context();
    let stub = midl_ndr::encode_to_bytes(request, ndr)?;
    let response = conn.invoke(syntax, opnum, options, stub).await?;
    Ok(midl_ndr::decode_from_bytes(response, ndr)?)
}
