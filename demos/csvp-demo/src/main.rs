//! IClusterStorage2 demo
//!
//! Starts an in-memory cluster node on a loopback connection, resolves its
//! IClusterStorage2 pointer through IRemUnknown and runs one operation.
//!
//! USAGE:
//!   csvp-demo [OPTIONS] <COMMAND>
//!
//! EXAMPLES:
//!   csvp-demo prepare                          # PrepareNode + PrepareNodePhase2
//!   csvp-demo write --sector 3 "hello disk"    # Write a sector, read it back
//!   csvp-demo read --disk 99                   # Missing disk, reports the HRESULT

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use csvp::iclusterstorage2::*;
use csvp::DiskId;
use dcerpc::{CallContext, LoopbackConn, Uuid};
use dcom::iunknown::{UnknownServer, IUNKNOWN_UUID};
use dcom::remunknown::{register_rem_unknown_server, ExportTable, RemQueryInterfaceRequest, RemUnknownClient};
use dcom::{codes, Ipid, Oxid};
use midl_ndr::NdrPtr;
use parking_lot::RwLock;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "csvp-demo")]
#[command(version)]
#[command(about = "Raw sector access over IClusterStorage2 against an in-memory node")]
struct Args {
    /// Disk signature to address
    #[arg(long, default_value_t = 0x1234, global = true)]
    disk: u32,

    /// Sectors on each in-memory disk
    #[arg(long, default_value_t = 16, global = true)]
    sectors: u32,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the node preparation handshake
    Prepare,
    /// Read one sector
    Read {
        #[arg(long, default_value_t = 0)]
        sector: u32,
    },
    /// Write text to a sector and read it back
    Write {
        #[arg(long, default_value_t = 0)]
        sector: u32,
        text: String,
    },
}

/// Cluster node with in-memory disks keyed by signature
struct MemoryNode {
    disks: RwLock<HashMap<DiskId, Vec<Vec<u8>>>>,
}

impl MemoryNode {
    fn new(signatures: &[u32], sectors: u32) -> Self {
        let disks = signatures
            .iter()
            .map(|sig| {
                let disk = vec![vec![0u8; SECTOR_SIZE as usize]; sectors as usize];
                (DiskId::Signature(*sig), disk)
            })
            .collect();
        Self {
            disks: RwLock::new(disks),
        }
    }

    fn locate(&self, disk_id: &DiskId, sector: u32, length: u32) -> i32 {
        if length > SECTOR_SIZE {
            return codes::E_INVALIDARG;
        }
        match self.disks.read().get(disk_id) {
            None => codes::ERROR_FILE_NOT_FOUND,
            Some(disk) if sector as usize >= disk.len() => codes::ERROR_SECTOR_NOT_FOUND,
            Some(_) => codes::S_OK,
        }
    }
}

impl UnknownServer for MemoryNode {}

#[async_trait]
impl ClusterStorage2Server for MemoryNode {
    async fn raw_read(&self, _ctx: &CallContext, req: RawReadRequest) -> dcerpc::Result<RawReadResponse> {
        let status = self.locate(&req.disk_id, req.sector, req.data_length);
        if status != codes::S_OK {
            warn!("read of {:?} sector {} failed: 0x{:08x}", req.disk_id, req.sector, status);
            return Ok(RawReadResponse {
                return_value: status,
                ..Default::default()
            });
        }
        let disks = self.disks.read();
        let data = disks
            .get(&req.disk_id)
            .and_then(|disk| disk.get(req.sector as usize))
            .map(|sector| sector[..req.data_length as usize].to_vec())
            .unwrap_or_default();
        Ok(RawReadResponse::new(req.data_length, data))
    }

    async fn raw_write(&self, _ctx: &CallContext, req: RawWriteRequest) -> dcerpc::Result<RawWriteResponse> {
        let status = self.locate(&req.disk_id, req.sector, req.data_length);
        if status != codes::S_OK {
            return Ok(RawWriteResponse {
                return_value: status,
                ..Default::default()
            });
        }
        let length = (req.data_length as usize).min(req.data.len());
        let mut disks = self.disks.write();
        if let Some(sector) = disks
            .get_mut(&req.disk_id)
            .and_then(|disk| disk.get_mut(req.sector as usize))
        {
            sector[..length].copy_from_slice(&req.data.elements[..length]);
        }
        info!("wrote {} bytes to {:?} sector {}", length, req.disk_id, req.sector);
        Ok(RawWriteResponse {
            data_written_length: length as u32,
            ..Default::default()
        })
    }

    async fn prepare_node(
        &self,
        _ctx: &CallContext,
        _req: PrepareNodeRequest,
    ) -> dcerpc::Result<PrepareNodeResponse> {
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
        _req: PrepareNodePhase2Request,
    ) -> dcerpc::Result<PrepareNodePhase2Response> {
        Ok(PrepareNodePhase2Response {
            num_disks: self.disks.read().len() as u32,
            ..Default::default()
        })
    }
}

/// Export the node and return a client bound to its IClusterStorage2 IPID
async fn connect(node: Arc<MemoryNode>) -> Result<ClusterStorage2Client, Box<dyn std::error::Error>> {
    let conn = Arc::new(LoopbackConn::new());
    let exporter = Arc::new(ExportTable::new(Oxid::generate()));
    register_rem_unknown_server(conn.as_ref(), exporter.clone())?;
    register_cluster_storage2_server(conn.as_ref(), node)?;

    let storage_iid = CLUSTER_STORAGE2_SYNTAX.uuid;
    let oid = exporter.export_object([storage_iid]);
    let iunknown = Uuid::parse(IUNKNOWN_UUID).ok_or("invalid IUnknown IID")?;
    let unknown = exporter.marshal(oid, iunknown, 1)?;

    let remote = RemUnknownClient::new(conn.clone()).with_ipid(Ipid::generate());
    let response = remote
        .rem_query_interface(&RemQueryInterfaceRequest::new(unknown.ipid, 1, vec![storage_iid]))
        .await?;
    let result = response
        .results
        .get()
        .and_then(|results| results.iter().next())
        .ok_or("empty QueryInterface result")?;
    info!("IClusterStorage2 marshaled as {}", result.std.ipid);

    Ok(ClusterStorage2Client::new(conn).with_ipid(result.std.ipid))
}

fn printable(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let node = Arc::new(MemoryNode::new(&[0x1234, 0x5678], args.sectors));
    let client = connect(node).await?;
    let disk = DiskId::Signature(args.disk);

    match args.command {
        Command::Prepare => {
            let versions = client.prepare_node(&PrepareNodeRequest::default()).await?;
            println!(
                "node version {}.{}, cprep version {}",
                versions.major_version, versions.minor_version, versions.cprep_version
            );
            let phase2 = client
                .prepare_node_phase2(&PrepareNodePhase2Request::default())
                .await?;
            println!("{} disk(s) attached", phase2.num_disks);
        }
        Command::Read { sector } => {
            match client.raw_read(&RawReadRequest::new(disk, sector, SECTOR_SIZE)).await {
                Ok(read) => println!("sector {}: {:?}", sector, printable(&read.data.elements)),
                Err(err) => println!("read failed: {}", err),
            }
        }
        Command::Write { sector, text } => {
            let written = client
                .raw_write(&RawWriteRequest::new(disk, sector, SECTOR_SIZE, text.into_bytes()))
                .await?;
            println!("wrote {} bytes", written.data_written_length);
            let read = client
                .raw_read(&RawReadRequest::new(disk, sector, SECTOR_SIZE))
                .await?;
            println!("sector {}: {:?}", sector, printable(&read.data.elements));
        }
    }

    Ok(())
}
