//! DCOM object RPC layer
//!
//! This crate builds ORPC interfaces on top of the `dcerpc` call substrate,
//! following MS-DCOM.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DCOM Layer (this crate)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ORPC envelope        │  Object clients   │  Export table   │
//! │  - ORPCTHIS/ORPCTHAT  │  - IPID binding   │  - OXID/OID/IPID│
//! │  - HRESULT status     │  - status checks  │  - Ref counting │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IUnknown (0-2)  │  IDispatch (3-6)  │  IRemUnknown (3-5)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  DCE RPC Layer (dcerpc crate)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **ORPCTHIS/ORPCTHAT**: the first parameter of every request and
//!   response
//! - **IPID**: Interface Pointer ID, sent as the object UUID of every call
//! - **Inheritance**: a derived interface owns opnums from its floor up and
//!   forwards lower opnums to its base
//!
//! # Modules
//!
//! - [`types`]: Core DCOM data types
//! - [`iunknown`]: IUnknown, the root interface
//! - [`idispatch`]: IDispatch and the automation value types
//! - [`remunknown`]: IRemUnknown and the export table behind it

pub mod idispatch;
pub mod iunknown;
pub mod remunknown;
pub mod types;

mod client;

pub use client::{check_return, CallError, CallResult, ObjectBinding, OrpcResponse};
pub use types::{
    codes, ComVersion, DcomError, Hresult, InterfacePointer, Ipid, Oid, OrpcExtent,
    OrpcExtentArray, OrpcThat, OrpcThis, Oxid, Result, StdObjRef,
};
