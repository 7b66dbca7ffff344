//! MS-CSVP: Failover Cluster Setup and Validation Protocol
//!
//! Binding for the disk preparation interface `IClusterStorage2`:
//! - [`DiskId`]: the `CPREP_DISKID` disk identifier
//! - [`iclusterstorage2`]: wire types, client and server for raw sector
//!   access and node preparation

pub mod iclusterstorage2;
mod types;

pub use types::{disk_id_type, DiskId};
