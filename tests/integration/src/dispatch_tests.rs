//! Dispatch Tests - Opnum Routing and Call Outcomes
//!
//! These tests drive calls through a loopback connection:
//! - Opnums below a derived interface's floor reach the base handler
//! - Unknown opnums, interfaces and unimplemented operations fault
//! - Handler errors can be surfaced as faults or as default responses
//! - Cancellation and request size limits
//! - Many concurrent callers sharing one connection

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use common::*;
use dcerpc::{
    call, invoke_operation, operation_unavailable, CallContext, CallOptions, CancelToken,
    ConnConfig, Conn, DispatchFuture, DispatchTable, FaultStatus, LoopbackConn, NdrReader,
    RpcError, SyntaxId,
};

/// Interface for routing tests
pub const LAYERED_UUID: &str = "4f1c2a8e-3b6d-4c1e-9a2f-6b7d8e9f0a1b";

/// Opnums of the base interface occupy 0..3, the derived ones start at 3
pub mod layered_opnum {
    pub const BASE_ECHO: u16 = 0;
    pub const BASE_SLOW: u16 = 1;
    pub const BASE_FAIL: u16 = 2;
    pub const DERIVED_DOUBLE: u16 = 3;
    pub const DERIVED_COUNT: u16 = 4;
}

midl_ndr::ndr_params! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Value {
        value: u32,
    }
}

midl_ndr::ndr_params! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Tagged {
        interface: u32,
        value: u32,
    }
}

#[derive(Default)]
struct Layered {
    calls: parking_lot::Mutex<u32>,
}

fn base_dispatch(h: Arc<Layered>, ctx: CallContext, opnum: u16, r: NdrReader) -> DispatchFuture {
    match opnum {
        layered_opnum::BASE_ECHO => invoke_operation(h, ctx, r, |h, _ctx, req: Value| async move {
            *h.calls.lock() += 1;
            Ok(Tagged { interface: 0, value: req.value })
        }),
        layered_opnum::BASE_SLOW => invoke_operation(h, ctx, r, |_h, _ctx, req: Value| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(req)
        }),
        layered_opnum::BASE_FAIL => invoke_operation(h, ctx, r, |_h, _ctx, _req: Value| async move {
            Err::<Value, _>(RpcError::NotImplemented("ILayered::Fail".into()))
        }),
        _ => operation_unavailable(opnum),
    }
}

fn derived_dispatch(h: Arc<Layered>, ctx: CallContext, opnum: u16, r: NdrReader) -> DispatchFuture {
    match opnum {
        layered_opnum::DERIVED_DOUBLE => invoke_operation(h, ctx, r, |h, _ctx, req: Value| async move {
            *h.calls.lock() += 1;
            Ok(Tagged { interface: 1, value: req.value * 2 })
        }),
        layered_opnum::DERIVED_COUNT => invoke_operation(h, ctx, r, |h, _ctx, _req: Value| async move {
            Ok(Value { value: *h.calls.lock() })
        }),
        _ => operation_unavailable(opnum),
    }
}

fn layered_table() -> DispatchTable<Layered> {
    DispatchTable::new("IBase", base_dispatch).extend(3, "ILayered", derived_dispatch)
}

fn syntax() -> SyntaxId {
    SyntaxId::parse(LAYERED_UUID, 1, 0).unwrap()
}

fn serve(config: ConnConfig) -> Arc<LoopbackConn> {
    let conn = Arc::new(LoopbackConn::with_config(config));
    conn.register_server(syntax(), layered_table().into_handle(Arc::new(Layered::default())))
        .unwrap();
    conn
}

#[tokio::test]
async fn test_inheritance_boundary() {
    init_logging();

    let conn = serve(ConnConfig::default());
    let base: Tagged = call(
        conn.as_ref(),
        &syntax(),
        layered_opnum::BASE_ECHO,
        CallOptions::new(),
        &Value { value: 5 },
    )
    .await
    .unwrap();
    assert_eq!(base, Tagged { interface: 0, value: 5 });

    // last base opnum still reaches the base handler
    let err = call::<Value, Value>(
        conn.as_ref(),
        &syntax(),
        layered_opnum::BASE_FAIL,
        CallOptions::new(),
        &Value::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RpcError::Fault(0x1c010002)));

    let derived: Tagged = call(conn.as_ref(), &syntax(), layered_opnum::DERIVED_DOUBLE, CallOptions::new(), &Value { value: 5 })
        .await
        .unwrap();
    assert_eq!(derived, Tagged { interface: 1, value: 10 });

    let table = layered_table();
    assert_eq!(table.route(2).map(|r| r.interface), Some("IBase"));
    assert_eq!(table.route(3).map(|r| r.interface), Some("ILayered"));
}

#[tokio::test]
async fn test_handler_state_shared_across_ranges() {
    init_logging();

    let conn = serve(ConnConfig::default());
    for opnum in [layered_opnum::BASE_ECHO, layered_opnum::DERIVED_DOUBLE] {
        let _: Tagged = call(conn.as_ref(), &syntax(), opnum, CallOptions::new(), &Value { value: 1 })
            .await
            .unwrap();
    }
    let count: Value = call(
        conn.as_ref(),
        &syntax(),
        layered_opnum::DERIVED_COUNT,
        CallOptions::new(),
        &Value::default(),
    )
    .await
    .unwrap();
    assert_eq!(count.value, 2);
}

#[tokio::test]
async fn test_unknown_opnum_faults() {
    init_logging();

    let conn = serve(ConnConfig::default());
    let err = call::<Value, Value>(conn.as_ref(), &syntax(), 9, CallOptions::new(), &Value::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Fault(code) if code == FaultStatus::OpRngError as u32));
    assert_eq!(conn.stats().snapshot().calls_faulted, 1);
}

#[tokio::test]
async fn test_unregistered_interface_faults() {
    init_logging();

    let conn = loopback();
    let err = call::<Value, Value>(conn.as_ref(), &syntax(), 0, CallOptions::new(), &Value::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "fault: nca_s_unk_if (0x1c010003)");
}

#[tokio::test]
async fn test_not_implemented_handler() {
    init_logging();

    let faulting = serve(ConnConfig::default());
    let err = call::<Value, Value>(
        faulting.as_ref(),
        &syntax(),
        layered_opnum::BASE_FAIL,
        CallOptions::new(),
        &Value { value: 3 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RpcError::Fault(0x1c010002)));

    // with faults disabled the caller gets the default response
    let lenient = serve(ConnConfig {
        faults_on_handler_error: false,
        ..ConnConfig::default()
    });
    let response: Value = call(
        lenient.as_ref(),
        &syntax(),
        layered_opnum::BASE_FAIL,
        CallOptions::new(),
        &Value { value: 3 },
    )
    .await
    .unwrap();
    assert_eq!(response, Value::default());
}

#[tokio::test]
async fn test_cancelled_call() {
    init_logging();

    let conn = serve(ConnConfig::default());
    let cancel = CancelToken::new();
    let options = CallOptions::new().with_cancel(cancel.clone());

    let pending = {
        let conn = conn.clone();
        tokio::spawn(async move {
            call::<Value, Value>(conn.as_ref(), &syntax(), layered_opnum::BASE_SLOW, options, &Value::default())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let err = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .unwrap()
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, RpcError::Cancelled));
    assert_eq!(conn.stats().snapshot().calls_cancelled, 1);
}

#[tokio::test]
async fn test_request_size_limit() {
    init_logging();

    let conn = serve(ConnConfig {
        max_request_size: 2,
        ..ConnConfig::default()
    });
    let err = call::<Value, Tagged>(conn.as_ref(), &syntax(), 0, CallOptions::new(), &Value { value: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::RequestTooLarge { size: 4, max: 2 }));
}

#[tokio::test]
async fn test_truncated_request_is_ndr_fault() {
    init_logging();

    let conn = serve(ConnConfig::default());
    let err = conn
        .invoke(&syntax(), 0, CallOptions::new(), bytes::Bytes::from_static(&[1, 2]))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Fault(code) if code == FaultStatus::FaultNdr as u32));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers() {
    init_logging();

    const NUM_CALLERS: u32 = 32;
    const CALLS_PER_CALLER: u32 = 50;

    let conn = serve(ConnConfig::default());
    let stats = Arc::new(ConcurrentStats::new());

    let tasks = (0..NUM_CALLERS).map(|caller| {
        let conn = conn.clone();
        let stats = stats.clone();
        tokio::spawn(async move {
            for i in 0..CALLS_PER_CALLER {
                let value = caller * 1000 + i;
                let start = Instant::now();
                let result: dcerpc::Result<Tagged> = call(
                    conn.as_ref(),
                    &syntax(),
                    layered_opnum::DERIVED_DOUBLE,
                    CallOptions::new(),
                    &Value { value },
                )
                .await;
                match result {
                    Ok(tagged) if tagged.value == value * 2 => stats.record_success(start.elapsed()),
                    _ => stats.record_failure(),
                }
            }
        })
    });
    join_all(tasks).await;

    stats.print_summary("concurrent callers");
    assert_eq!(stats.failed(), 0);
    assert_eq!(stats.succeeded(), u64::from(NUM_CALLERS * CALLS_PER_CALLER));
    assert_eq!(conn.stats().snapshot().calls_completed, u64::from(NUM_CALLERS * CALLS_PER_CALLER));
}
