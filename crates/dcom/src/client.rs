//! Client plumbing shared by the typed interface clients
//!
//! An [`ObjectBinding`] ties a connection and an interface syntax to the
//! IPID of one remote interface pointer. Every ORPC call needs the IPID; a
//! binding without one refuses calls before touching the connection.
//!
//! Responses end with an HRESULT. A non-zero value becomes
//! [`RpcError::Status`] naming the operation, and the decoded response is
//! kept in the [`CallError`] next to it.

use std::fmt;
use std::sync::Arc;

use dcerpc::{CallOptions, CancelToken, Conn, RpcError, SyntaxId};
use midl_ndr::{NdrDecode, NdrEncode};
use tracing::debug;

use crate::types::{Hresult, Ipid};

/// Failed call, with the response when one was decoded
pub struct CallError<T> {
    pub error: RpcError,
    pub response: Option<T>,
}

impl<T> CallError<T> {
    pub fn new(error: RpcError) -> Self {
        Self {
            error,
            response: None,
        }
    }

    /// Status returned by the operation, if it got that far
    pub fn status(&self) -> Option<i32> {
        match &self.error {
            RpcError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&T> {
        self.response.as_ref()
    }

    pub fn into_response(self) -> Option<T> {
        self.response
    }
}

impl<T> From<RpcError> for CallError<T> {
    fn from(error: RpcError) -> Self {
        Self::new(error)
    }
}

impl<T> From<CallError<T>> for RpcError {
    fn from(err: CallError<T>) -> Self {
        err.error
    }
}

impl<T> fmt::Debug for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallError")
            .field("error", &self.error)
            .field("response", &self.response.is_some())
            .finish()
    }
}

impl<T> fmt::Display for CallError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T> std::error::Error for CallError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of a typed client call
pub type CallResult<T> = std::result::Result<T, CallError<T>>;

/// Response carrying a trailing HRESULT
pub trait OrpcResponse {
    fn return_value(&self) -> i32;
}

/// Implement [`OrpcResponse`] for response types with a `return_value` field
#[macro_export]
macro_rules! orpc_response {
    ($($name:ty),* $(,)?) => {
        $(
            impl $crate::OrpcResponse for $name {
                fn return_value(&self) -> i32 {
                    self.return_value
                }
            }
        )*
    };
}

/// Turn a non-zero HRESULT into an error that still carries the response
pub fn check_return<T: OrpcResponse>(operation: &str, response: T) -> CallResult<T> {
    let status = response.return_value();
    if status == 0 {
        return Ok(response);
    }
    Err(CallError {
        error: RpcError::Status {
            operation: operation.to_string(),
            status,
            message: Hresult(status).to_string(),
        },
        response: Some(response),
    })
}

/// Connection, interface and object a client talks to
#[derive(Clone)]
pub struct ObjectBinding {
    conn: Arc<dyn Conn>,
    syntax: SyntaxId,
    ipid: Option<Ipid>,
    cancel: Option<CancelToken>,
}

impl ObjectBinding {
    pub fn new(conn: Arc<dyn Conn>, syntax: SyntaxId) -> Self {
        Self {
            conn,
            syntax,
            ipid: None,
            cancel: None,
        }
    }

    /// Same binding aimed at another interface pointer
    pub fn with_ipid(&self, ipid: Ipid) -> Self {
        Self {
            ipid: Some(ipid),
            ..self.clone()
        }
    }

    /// Same binding whose calls observe `cancel`
    pub fn with_cancel(&self, cancel: CancelToken) -> Self {
        Self {
            cancel: Some(cancel),
            ..self.clone()
        }
    }

    pub fn ipid(&self) -> Option<Ipid> {
        self.ipid
    }

    pub fn syntax(&self) -> &SyntaxId {
        &self.syntax
    }

    pub fn conn(&self) -> &Arc<dyn Conn> {
        &self.conn
    }

    fn options(&self, operation: &str) -> Result<CallOptions, RpcError> {
        let ipid = self
            .ipid
            .ok_or_else(|| RpcError::MissingObject(operation.to_string()))?;
        let mut options = CallOptions::new().with_object(ipid.into());
        if let Some(cancel) = &self.cancel {
            options = options.with_cancel(cancel.clone());
        }
        Ok(options)
    }

    /// Invoke an operation whose response ends in an HRESULT
    pub async fn call<Req, Resp>(&self, operation: &str, opnum: u16, request: &Req) -> CallResult<Resp>
    where
        Req: NdrEncode + Sync,
        Resp: NdrDecode + OrpcResponse,
    {
        let response = self.call_unchecked(operation, opnum, request).await?;
        check_return(operation, response)
    }

    /// Invoke an operation without interpreting its return value
    pub async fn call_unchecked<Req, Resp>(
        &self,
        operation: &str,
        opnum: u16,
        request: &Req,
    ) -> Result<Resp, RpcError>
    where
        Req: NdrEncode + Sync,
        Resp: NdrDecode,
    {
        let options = self.options(operation)?;
        debug!("{} on {:?} via {}", operation, self.ipid, self.syntax);
        dcerpc::call(self.conn.as_ref(), &self.syntax, opnum, options, request).await
    }
}

impl fmt::Debug for ObjectBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBinding")
            .field("syntax", &self.syntax)
            .field("ipid", &self.ipid)
            .finish()
    }
}
