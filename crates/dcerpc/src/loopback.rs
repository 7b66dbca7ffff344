//! In-process connection
//!
//! [`LoopbackConn`] hands request stub data straight to the server
//! registered for the interface syntax, within the same process. It applies
//! the same rules a transport-backed server does: unknown interfaces and
//! opnums fault, codec failures fault, and handler errors fault when the
//! configuration asks for it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use midl_ndr::NdrContext;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::conn::{CallContext, CallOptions, Conn, DispatchOutcome, ServerHandle};
use crate::dcerpc::{FaultStatus, SyntaxId};
use crate::error::{Result, RpcError};

/// Default request size limit
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 16 * 1024 * 1024;

/// Loopback connection configuration
#[derive(Debug, Clone)]
pub struct ConnConfig {
    /// Data representation for stub data
    pub ndr: NdrContext,
    /// Report handler errors to the client as faults
    pub faults_on_handler_error: bool,
    pub max_request_size: usize,
}

impl Default for ConnConfig {
    fn default() -> Self {
        Self {
            ndr: NdrContext::default(),
            faults_on_handler_error: true,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
        }
    }
}

/// Call statistics
#[derive(Debug, Default)]
pub struct ConnStats {
    pub calls_received: AtomicU64,
    pub calls_completed: AtomicU64,
    pub calls_faulted: AtomicU64,
    pub calls_cancelled: AtomicU64,
    pub bytes_received: AtomicU64,
    pub bytes_sent: AtomicU64,
}

impl ConnStats {
    pub fn snapshot(&self) -> ConnStatsSnapshot {
        ConnStatsSnapshot {
            calls_received: self.calls_received.load(Ordering::Relaxed),
            calls_completed: self.calls_completed.load(Ordering::Relaxed),
            calls_faulted: self.calls_faulted.load(Ordering::Relaxed),
            calls_cancelled: self.calls_cancelled.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of call statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnStatsSnapshot {
    pub calls_received: u64,
    pub calls_completed: u64,
    pub calls_faulted: u64,
    pub calls_cancelled: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Connection that dispatches to servers in the same process
pub struct LoopbackConn {
    config: ConnConfig,
    servers: RwLock<HashMap<SyntaxId, ServerHandle>>,
    stats: ConnStats,
}

impl LoopbackConn {
    pub fn new() -> Self {
        Self::with_config(ConnConfig::default())
    }

    pub fn with_config(config: ConnConfig) -> Self {
        Self {
            config,
            servers: RwLock::new(HashMap::new()),
            stats: ConnStats::default(),
        }
    }

    pub fn config(&self) -> &ConnConfig {
        &self.config
    }

    pub fn stats(&self) -> &ConnStats {
        &self.stats
    }

    /// Syntaxes with a registered server
    pub fn registered(&self) -> Vec<SyntaxId> {
        self.servers.read().keys().copied().collect()
    }

    fn fault(&self, err: &RpcError) -> RpcError {
        self.stats.calls_faulted.fetch_add(1, Ordering::Relaxed);
        RpcError::Fault(err.fault_status())
    }

    async fn process_request(
        &self,
        handle: ServerHandle,
        ctx: CallContext,
        stub: Bytes,
    ) -> Result<Bytes> {
        let syntax = ctx.syntax;
        let opnum = ctx.opnum;
        let cancel = ctx.cancel.clone();
        let call = handle(ctx, opnum, stub);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("call {} opnum {} cancelled", syntax, opnum);
                self.stats.calls_cancelled.fetch_add(1, Ordering::Relaxed);
                return Err(RpcError::Cancelled);
            }
            outcome = call => outcome,
        };

        match outcome {
            Ok(DispatchOutcome { stub, error: None }) => Ok(stub),
            Ok(DispatchOutcome {
                stub,
                error: Some(err),
            }) => {
                if self.config.faults_on_handler_error {
                    warn!("opnum {} on {} failed: {}", opnum, syntax, err);
                    Err(self.fault(&err))
                } else {
                    warn!(
                        "opnum {} on {} failed, returning default response: {}",
                        opnum, syntax, err
                    );
                    Ok(stub)
                }
            }
            Err(err @ RpcError::Ndr(_)) => {
                error!("opnum {} on {}: {}", opnum, syntax, err);
                Err(self.fault(&err))
            }
            Err(err) => {
                warn!("opnum {} on {}: {}", opnum, syntax, err);
                Err(self.fault(&err))
            }
        }
    }
}

impl Default for LoopbackConn {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Conn for LoopbackConn {
    fn ndr_context(&self) -> NdrContext {
        self.config.ndr
    }

    async fn invoke(
        &self,
        syntax: &SyntaxId,
        opnum: u16,
        options: CallOptions,
        stub: Bytes,
    ) -> Result<Bytes> {
        self.stats.calls_received.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_received
            .fetch_add(stub.len() as u64, Ordering::Relaxed);

        if stub.len() > self.config.max_request_size {
            return Err(RpcError::RequestTooLarge {
                size: stub.len(),
                max: self.config.max_request_size,
            });
        }

        // Clone the handle and release the lock before running the call
        let handle = self.servers.read().get(syntax).cloned();
        let Some(handle) = handle else {
            warn!("no server registered for {}", syntax);
            self.stats.calls_faulted.fetch_add(1, Ordering::Relaxed);
            return Err(RpcError::Fault(FaultStatus::UnkIf as u32));
        };

        let ctx = CallContext {
            syntax: *syntax,
            opnum,
            object: options.object,
            ndr: self.config.ndr,
            cancel: options.cancel.unwrap_or_default(),
        };
        debug!("call {} opnum {} object {:?}", syntax, opnum, ctx.object);

        let response = self.process_request(handle, ctx, stub).await?;
        self.stats.calls_completed.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_sent
            .fetch_add(response.len() as u64, Ordering::Relaxed);
        Ok(response)
    }

    fn register_server(&self, syntax: SyntaxId, handle: ServerHandle) -> Result<()> {
        info!(
            "Registering interface: {} version {}.{}",
            syntax.uuid,
            syntax.major_version(),
            syntax.minor_version()
        );
        self.servers.write().insert(syntax, handle);
        Ok(())
    }
}
