//! CSVP Tests - Cluster Storage Validation Calls
//!
//! These tests run IClusterStorage2 against an in-memory disk:
//! - Sector writes padded to the declared length and read back
//! - Disk lookup by each DiskId kind
//! - HRESULT failures for missing disks and sectors
//! - Node preparation handshake

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use common::*;
use csvp::iclusterstorage2::*;
use csvp::DiskId;
use dcerpc::{CallContext, Result, RpcError, Uuid};
use dcom::iunknown::UnknownServer;
use dcom::{codes, Ipid};

const SECTORS: usize = 8;

/// Disks addressed by id, each a run of sectors
struct Disks {
    disks: Mutex<HashMap<DiskId, Vec<Vec<u8>>>>,
    prepared: Mutex<bool>,
}

impl Disks {
    fn new(ids: &[DiskId]) -> Self {
        let disks = ids
            .iter()
            .map(|id| (*id, vec![vec![0u8; SECTOR_SIZE as usize]; SECTORS]))
            .collect();
        Self {
            disks: Mutex::new(disks),
            prepared: Mutex::new(false),
        }
    }

    fn check(&self, disk_id: &DiskId, sector: u32, length: u32) -> std::result::Result<(), i32> {
        if length > SECTOR_SIZE {
            return Err(codes::E_INVALIDARG);
        }
        match self.disks.lock().get(disk_id) {
            None => Err(codes::ERROR_FILE_NOT_FOUND),
            Some(disk) if sector as usize >= disk.len() => Err(codes::ERROR_SECTOR_NOT_FOUND),
            Some(_) => Ok(()),
        }
    }
}

impl UnknownServer for Disks {}

#[async_trait]
impl ClusterStorage2Server for Disks {
    async fn raw_read(&self, _ctx: &CallContext, req: RawReadRequest) -> Result<RawReadResponse> {
        if let Err(status) = self.check(&req.disk_id, req.sector, req.data_length) {
            return Ok(RawReadResponse {
                return_value: status,
                ..Default::default()
            });
        }
        let data = self.disks.lock()[&req.disk_id][req.sector as usize][..req.data_length as usize].to_vec();
        Ok(RawReadResponse::new(req.data_length, data))
    }

    async fn raw_write(&self, _ctx: &CallContext, req: RawWriteRequest) -> Result<RawWriteResponse> {
        if let Err(status) = self.check(&req.disk_id, req.sector, req.data_length) {
            return Ok(RawWriteResponse {
                return_value: status,
                ..Default::default()
            });
        }
        let length = req.data_length as usize;
        if req.data.len() < length {
            return Err(RpcError::Fault(codes::E_INVALIDARG as u32));
        }
        let mut disks = self.disks.lock();
        if let Some(sector) = disks.get_mut(&req.disk_id).and_then(|d| d.get_mut(req.sector as usize)) {
            sector[..length].copy_from_slice(&req.data.elements[..length]);
        }
        Ok(RawWriteResponse {
            data_written_length: req.data_length,
            ..Default::default()
        })
    }

    async fn prepare_node(
        &self,
        _ctx: &CallContext,
        _req: PrepareNodeRequest,
    ) -> Result<PrepareNodeResponse> {
        Ok(PrepareNodeResponse {
            major_version: 6,
            minor_version: 3,
            cprep_version: 2,
            ..Default::default()
        })
    }

    async fn prepare_node_phase2(
        &self,
        _ctx: &CallContext,
        req: PrepareNodePhase2Request,
    ) -> Result<PrepareNodePhase2Response> {
        if req.flags != 0 {
            return Ok(PrepareNodePhase2Response {
                return_value: codes::E_INVALIDARG,
                ..Default::default()
            });
        }
        *self.prepared.lock() = true;
        Ok(PrepareNodePhase2Response {
            num_disks: self.disks.lock().len() as u32,
            ..Default::default()
        })
    }
}

fn guid_disk() -> DiskId {
    DiskId::Guid(Uuid::parse("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap())
}

fn start() -> (Arc<Disks>, ClusterStorage2Client) {
    let conn = loopback();
    let disks = Arc::new(Disks::new(&[DiskId::Signature(0x1234), guid_disk()]));
    register_cluster_storage2_server(conn.as_ref(), disks.clone()).unwrap();
    (disks, ClusterStorage2Client::new(conn).with_ipid(Ipid::generate()))
}

#[tokio::test]
async fn test_sector_write_then_read() {
    init_logging();

    let (disks, client) = start();
    let disk = DiskId::Signature(0x1234);

    let written = client
        .raw_write(&RawWriteRequest::new(disk, 2, SECTOR_SIZE, vec![0xde, 0xad, 0xbe, 0xef]))
        .await
        .unwrap();
    assert_eq!(written.data_written_length, SECTOR_SIZE);
    assert_eq!(&disks.disks.lock()[&disk][2][..4], &[0xde, 0xad, 0xbe, 0xef]);

    let read = client
        .raw_read(&RawReadRequest::new(disk, 2, SECTOR_SIZE))
        .await
        .unwrap();
    assert_eq!(read.data_read_length, SECTOR_SIZE);
    assert_eq!(read.data.len(), SECTOR_SIZE as usize);
    assert_eq!(&read.data.elements[..4], &[0xde, 0xad, 0xbe, 0xef]);
    assert!(read.data.elements[4..].iter().all(|b| *b == 0));
}

#[tokio::test]
async fn test_partial_read() {
    init_logging();

    let (_disks, client) = start();
    let read = client
        .raw_read(&RawReadRequest::new(guid_disk(), 0, 16))
        .await
        .unwrap();
    assert_eq!(read.data.max_count, 16);
    assert_eq!(read.data.elements, vec![0; 16]);
}

#[tokio::test]
async fn test_missing_disk() {
    init_logging();

    let (_disks, client) = start();
    let err = client
        .raw_read(&RawReadRequest::new(DiskId::DeviceNumber(7), 0, SECTOR_SIZE))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(-2147024894));
    assert!(err.to_string().contains("IClusterStorage2::CprepDiskRawRead"));
    assert!(err.to_string().contains("ERROR_FILE_NOT_FOUND"));
    assert_eq!(err.response().map(|r| r.data_read_length), Some(0));
}

#[tokio::test]
async fn test_sector_out_of_range() {
    init_logging();

    let (_disks, client) = start();
    let err = client
        .raw_write(&RawWriteRequest::new(
            DiskId::Signature(0x1234),
            SECTORS as u32,
            SECTOR_SIZE,
            vec![1],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(codes::ERROR_SECTOR_NOT_FOUND));
}

#[tokio::test]
async fn test_prepare_node_handshake() {
    init_logging();

    let (disks, client) = start();
    let versions = client.prepare_node(&PrepareNodeRequest::default()).await.unwrap();
    assert_eq!(
        (versions.major_version, versions.minor_version, versions.cprep_version),
        (6, 3, 2)
    );

    let phase2 = client
        .prepare_node_phase2(&PrepareNodePhase2Request::default())
        .await
        .unwrap();
    assert_eq!(phase2.num_disks, 2);
    assert!(*disks.prepared.lock());

    let err = client
        .prepare_node_phase2(&PrepareNodePhase2Request {
            flags: 1,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(codes::E_INVALIDARG));
}

#[tokio::test]
async fn test_base_operations_share_binding() {
    init_logging();

    let (_disks, client) = start();
    // the disk server leaves AddRef to the IUnknown default
    let err = client
        .unknown()
        .add_ref(&dcom::iunknown::AddRefRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Fault(0x1c010002)));
}
