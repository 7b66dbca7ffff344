//! Server-side opnum dispatch
//!
//! An interface that derives from another owns the opnums from its floor
//! upwards and forwards everything below to the base interface. The chain is
//! kept as an explicit, ordered list of `(floor, dispatch fn)` ranges: the
//! range with the largest floor not above the opnum handles the call.
//!
//! Each dispatch fn decodes the request for the opnum, calls the handler and
//! returns an [`Invocation`]. The response is always encoded, even when the
//! handler failed; in that case the default response value goes on the wire
//! and the error travels next to it in the [`DispatchOutcome`].

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::{self, BoxFuture};
use midl_ndr::{NdrContext, NdrDecode, NdrEncode, NdrReader, NdrWriter};
use tracing::debug;

use crate::conn::{CallContext, DispatchOutcome, ServerHandle};
use crate::error::{Result, RpcError};

/// Future produced by a dispatch fn
pub type DispatchFuture = BoxFuture<'static, Result<Invocation>>;

/// Dispatch fn for one range of opnums, generic over the handler type
pub type DispatchFn<H> = fn(Arc<H>, CallContext, u16, NdrReader) -> DispatchFuture;

/// Response value that can be written as stub data
pub trait EncodeResponse: Send {
    fn encode_response(&self, w: &mut NdrWriter) -> midl_ndr::Result<()>;
}

impl<T: NdrEncode + Send> EncodeResponse for T {
    fn encode_response(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_value(self)
    }
}

/// A completed handler call, before its response is encoded
pub struct Invocation {
    response: Box<dyn EncodeResponse>,
    error: Option<RpcError>,
}

impl Invocation {
    /// Wrap a handler result; on error the response is `R::default()`
    pub fn complete<R>(result: Result<R>) -> Self
    where
        R: NdrEncode + Default + Send + 'static,
    {
        match result {
            Ok(response) => Self {
                response: Box::new(response),
                error: None,
            },
            Err(err) => Self {
                response: Box::new(R::default()),
                error: Some(err),
            },
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }

    /// Encode the response
    pub fn encode(self, ndr: NdrContext) -> Result<DispatchOutcome> {
        let mut w = NdrWriter::new(ndr);
        self.response.encode_response(&mut w)?;
        Ok(DispatchOutcome {
            stub: w.into_bytes(),
            error: self.error,
        })
    }
}

/// Decode `Req` from the stub data and run `call` with it.
///
/// Decode failures abort the call before the handler runs.
pub fn invoke_operation<H, Req, Resp, F, Fut>(
    handler: Arc<H>,
    ctx: CallContext,
    mut reader: NdrReader,
    call: F,
) -> DispatchFuture
where
    H: ?Sized,
    Req: NdrDecode,
    Resp: NdrEncode + Default + Send + 'static,
    F: FnOnce(Arc<H>, CallContext, Req) -> Fut,
    Fut: Future<Output = Result<Resp>> + Send + 'static,
{
    let request = match reader.read_value::<Req>() {
        Ok(request) => request,
        Err(err) => return Box::pin(future::ready(Err(err.into()))),
    };
    let response = call(handler, ctx, request);
    Box::pin(async move { Ok(Invocation::complete(response.await)) })
}

/// Answer for an opnum no range knows
pub fn operation_unavailable(opnum: u16) -> DispatchFuture {
    Box::pin(future::ready(Err(RpcError::OperationUnavailable(opnum))))
}

/// One entry of a dispatch table
pub struct OperationRange<H: ?Sized> {
    /// Lowest opnum owned by this range
    pub floor: u16,
    pub interface: &'static str,
    pub dispatch: DispatchFn<H>,
}

impl<H: ?Sized> Clone for OperationRange<H> {
    fn clone(&self) -> Self {
        Self {
            floor: self.floor,
            interface: self.interface,
            dispatch: self.dispatch,
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for OperationRange<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRange")
            .field("floor", &self.floor)
            .field("interface", &self.interface)
            .finish()
    }
}

/// Ordered opnum ranges of an interface and its bases
pub struct DispatchTable<H: ?Sized> {
    ranges: Vec<OperationRange<H>>,
}

impl<H: ?Sized> Clone for DispatchTable<H> {
    fn clone(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for DispatchTable<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.ranges).finish()
    }
}

impl<H: ?Sized + Send + Sync + 'static> DispatchTable<H> {
    /// Table for a root interface, owning opnums from 0
    pub fn new(interface: &'static str, dispatch: DispatchFn<H>) -> Self {
        Self {
            ranges: vec![OperationRange {
                floor: 0,
                interface,
                dispatch,
            }],
        }
    }

    /// Add the range of a derived interface starting at `floor`
    ///
    /// A range with the same floor is replaced.
    pub fn extend(mut self, floor: u16, interface: &'static str, dispatch: DispatchFn<H>) -> Self {
        let range = OperationRange {
            floor,
            interface,
            dispatch,
        };
        match self.ranges.binary_search_by_key(&floor, |r| r.floor) {
            Ok(index) => self.ranges[index] = range,
            Err(index) => self.ranges.insert(index, range),
        }
        self
    }

    pub fn ranges(&self) -> &[OperationRange<H>] {
        &self.ranges
    }

    /// Range that owns `opnum`
    pub fn route(&self, opnum: u16) -> Option<&OperationRange<H>> {
        self.ranges.iter().rev().find(|range| range.floor <= opnum)
    }

    pub fn dispatch(
        &self,
        handler: Arc<H>,
        ctx: CallContext,
        opnum: u16,
        reader: NdrReader,
    ) -> DispatchFuture {
        match self.route(opnum) {
            Some(range) => {
                debug!(interface = range.interface, opnum, "dispatching call");
                (range.dispatch)(handler, ctx, opnum, reader)
            }
            None => operation_unavailable(opnum),
        }
    }

    /// Bind the table to a handler, producing the entry point a connection
    /// registers
    pub fn into_handle(self, handler: Arc<H>) -> ServerHandle {
        let table = Arc::new(self);
        Arc::new(
            move |ctx: CallContext, opnum: u16, stub: Bytes| -> BoxFuture<'static, Result<DispatchOutcome>> {
                let ndr = ctx.ndr;
                let call = table.dispatch(
                    Arc::clone(&handler),
                    ctx,
                    opnum,
                    NdrReader::new(stub, ndr),
                );
                Box::pin(async move { call.await?.encode(ndr) })
            },
        )
    }
}
