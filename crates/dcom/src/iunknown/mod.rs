//! IUnknown (MS-DCOM 3.1.1.5.8)
//!
//! The root of every DCOM interface. Its three operations own opnums 0-2;
//! every derived interface forwards those opnums here.
//! - QueryInterface - Ask the object for another interface
//! - AddRef - Increment the reference count
//! - Release - Decrement the reference count

mod client;
mod protocol;
mod server;

pub use client::*;
pub use protocol::*;
pub use server::*;
