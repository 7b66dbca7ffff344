//! Core DCOM types (MS-DCOM 2.2)
//!
//! This module contains the fundamental data structures used throughout DCOM:
//! - Identifiers: OXID, OID, IPID
//! - Object references: STDOBJREF and marshaled interface pointers
//! - ORPC headers: ORPCTHIS, ORPCTHAT
//! - HRESULT descriptions

mod error;
mod hresult;
mod identifiers;
mod objref;
mod orpc;
mod stdobjref;

pub use error::*;
pub use hresult::{codes, Hresult};
pub use identifiers::{generate_uuid, Ipid, Oid, Oxid};
pub use objref::*;
pub use orpc::*;
pub use stdobjref::*;

/// Well-known interface UUIDs
pub mod iid {
    /// IUnknown interface UUID
    pub const IUNKNOWN: &str = "00000000-0000-0000-c000-000000000046";
    /// IDispatch interface UUID
    pub const IDISPATCH: &str = "00020400-0000-0000-c000-000000000046";
    /// IRemUnknown interface UUID
    pub const IREMUNKNOWN: &str = "00000131-0000-0000-c000-000000000046";
}
