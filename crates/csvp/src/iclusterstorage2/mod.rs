//! IClusterStorage2 (MS-CSVP 3.12.4)
//!
//! Disk access for cluster validation, derived from IUnknown. The
//! operations bound here own opnums 3-6:
//! - CprepDiskRawRead - Read one sector
//! - CprepDiskRawWrite - Write one sector
//! - CprepPrepareNode - Prepare the node, report versions
//! - CprepPrepareNodePhase2 - Enumerate disks

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
