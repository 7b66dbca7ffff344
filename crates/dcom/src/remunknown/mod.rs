//! IRemUnknown (MS-DCOM 3.1.1.5.6)
//!
//! Remote IUnknown used by object exporters for distributed reference
//! counting. Owns opnums 3-5 on top of IUnknown:
//! - RemQueryInterface - Query additional interfaces on remote object
//! - RemAddRef - Increment remote reference counts
//! - RemRelease - Decrement remote reference counts

mod client;
mod exporter;
mod protocol;
mod server;

pub use client::*;
pub use exporter::*;
pub use protocol::*;
pub use server::*;
