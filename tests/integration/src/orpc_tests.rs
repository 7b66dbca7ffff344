//! ORPC Tests - Object Calls Over One Connection
//!
//! These tests run a small object exporter next to an IDispatch object:
//! - Resolving an interface pointer with IRemUnknown and calling through it
//! - The IPID travelling as the call's object UUID
//! - Non-zero HRESULTs surfacing with the decoded response attached
//! - Reference counting releasing exported objects

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use common::*;
use dcerpc::{CallContext, Result, RpcError, Uuid};
use dcom::idispatch::{
    register_dispatch_server, DispatchClient, DispatchServer, ExcepInfo, GetIdsOfNamesRequest,
    GetIdsOfNamesResponse, InvokeRequest, InvokeResponse, UnimplementedDispatchServer, Variant,
    IDISPATCH_UUID,
};
use dcom::iunknown::{UnknownServer, IUNKNOWN_UUID};
use dcom::remunknown::{
    register_rem_unknown_server, ExportTable, RemInterfaceRef, RemQueryInterfaceRequest,
    RemReleaseRequest, RemUnknownClient,
};
use dcom::{codes, Ipid, Oxid};
use midl_ndr::NdrPtr;

/// Names a greeting and fails lookups of a missing file
#[derive(Default)]
struct Greeter {
    objects: Mutex<Vec<Option<Uuid>>>,
}

impl UnknownServer for Greeter {}

#[async_trait]
impl DispatchServer for Greeter {
    async fn get_ids_of_names(
        &self,
        _ctx: &CallContext,
        req: GetIdsOfNamesRequest,
    ) -> Result<GetIdsOfNamesResponse> {
        let ids = req
            .names
            .iter()
            .map(|name| match name.get().map(|n| n.as_str()) {
                Some("Greet") => 1,
                Some("Open") => 2,
                _ => -1,
            })
            .collect::<Vec<i32>>();
        Ok(GetIdsOfNamesResponse {
            disp_ids: ids.into(),
            ..Default::default()
        })
    }

    async fn invoke(&self, ctx: &CallContext, req: InvokeRequest) -> Result<InvokeResponse> {
        self.objects.lock().push(ctx.object);
        match req.disp_id {
            1 => {
                let args = req.params.arguments();
                let name = args.first().and_then(|v| v.as_str()).unwrap_or("nobody");
                Ok(InvokeResponse::with_result(Variant::bstr(format!("hello, {}", name))))
            }
            2 => Ok(InvokeResponse {
                excep_info: ExcepInfo::new("Greeter", "no such file", codes::ERROR_FILE_NOT_FOUND),
                return_value: codes::ERROR_FILE_NOT_FOUND,
                ..Default::default()
            }),
            _ => Ok(InvokeResponse {
                return_value: codes::DISP_E_MEMBERNOTFOUND,
                ..Default::default()
            }),
        }
    }
}

struct Server {
    exporter: Arc<ExportTable>,
    greeter: Arc<Greeter>,
    remote: RemUnknownClient,
    dispatch: DispatchClient,
    unknown_ipid: Ipid,
}

fn start() -> Server {
    let conn = loopback();
    let exporter = Arc::new(ExportTable::new(Oxid::generate()));
    let greeter = Arc::new(Greeter::default());
    register_rem_unknown_server(conn.as_ref(), exporter.clone()).unwrap();
    register_dispatch_server(conn.as_ref(), greeter.clone()).unwrap();

    let oid = exporter.export_object([Uuid::parse(IDISPATCH_UUID).unwrap()]);
    let unknown = exporter
        .marshal(oid, Uuid::parse(IUNKNOWN_UUID).unwrap(), 1)
        .unwrap();

    Server {
        exporter,
        greeter,
        remote: RemUnknownClient::new(conn.clone()).with_ipid(Ipid::generate()),
        dispatch: DispatchClient::new(conn),
        unknown_ipid: unknown.ipid,
    }
}

async fn resolve_dispatch(server: &Server) -> Ipid {
    let response = server
        .remote
        .rem_query_interface(&RemQueryInterfaceRequest::new(
            server.unknown_ipid,
            1,
            vec![Uuid::parse(IDISPATCH_UUID).unwrap()],
        ))
        .await
        .unwrap();
    let results = response.results.get().unwrap();
    assert_eq!(results.elements[0].hresult, codes::S_OK);
    results.elements[0].std.ipid
}

#[tokio::test]
async fn test_call_through_resolved_pointer() {
    init_logging();

    let server = start();
    let ipid = resolve_dispatch(&server).await;
    let client = server.dispatch.with_ipid(ipid);

    let ids = client
        .get_ids_of_names(&GetIdsOfNamesRequest::new(&["Greet"], 0))
        .await
        .unwrap();
    assert_eq!(ids.disp_ids.elements, vec![1]);

    let response = client
        .invoke(&InvokeRequest::method(1, vec![Variant::from("world")]))
        .await
        .unwrap();
    assert_eq!(
        response.result.get().and_then(|v| v.as_str()),
        Some("hello, world")
    );

    // the IPID is the call's object UUID
    assert_eq!(server.greeter.objects.lock().as_slice(), &[Some(Uuid::from(ipid))]);
}

#[tokio::test]
async fn test_failed_hresult_keeps_response() {
    init_logging();

    let server = start();
    let client = server.dispatch.with_ipid(resolve_dispatch(&server).await);

    let err = client
        .invoke(&InvokeRequest::method(2, Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(-2147024894));
    assert!(err.to_string().starts_with("IDispatch::Invoke: ERROR_FILE_NOT_FOUND"));

    let response = err.into_response().unwrap();
    let description = response.excep_info.description.get().map(|s| s.as_str());
    assert_eq!(description, Some("no such file"));
    assert_eq!(response.excep_info.scode, codes::ERROR_FILE_NOT_FOUND);
}

#[tokio::test]
async fn test_missing_ipid_rejected_locally() {
    init_logging();

    let server = start();
    let err = server
        .dispatch
        .invoke(&InvokeRequest::property_get(1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "IDispatch::Invoke: ipid is missing");
    assert!(server.greeter.objects.lock().is_empty());
}

#[tokio::test]
async fn test_unimplemented_server_faults() {
    init_logging();

    let conn = loopback();
    register_dispatch_server(conn.as_ref(), Arc::new(UnimplementedDispatchServer)).unwrap();
    let client = DispatchClient::new(conn).with_ipid(Ipid::generate());

    let err = client
        .invoke(&InvokeRequest::property_get(1))
        .await
        .unwrap_err();
    assert!(matches!(err.error, RpcError::Fault(0x1c010002)));
}

#[tokio::test]
async fn test_release_disconnects_object() {
    init_logging();

    let server = start();
    let ipid = resolve_dispatch(&server).await;
    assert_eq!(server.exporter.object_count(), 1);

    server
        .remote
        .rem_release(&RemReleaseRequest::new(vec![
            RemInterfaceRef::new(server.unknown_ipid, 1, 0),
            RemInterfaceRef::new(ipid, 1, 0),
        ]))
        .await
        .unwrap();
    assert_eq!(server.exporter.object_count(), 0);

    let err = server
        .remote
        .rem_query_interface(&RemQueryInterfaceRequest::new(
            ipid,
            1,
            vec![Uuid::parse(IDISPATCH_UUID).unwrap()],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(codes::CO_E_OBJNOTCONNECTED));
}
