//! IDispatch (MS-OAUT 3.1.4)
//!
//! Late-bound automation over IUnknown. Owns opnums 3-6; interfaces derived
//! from IDispatch start at opnum 7.

mod client;
mod protocol;
mod server;
mod variant;

pub use client::*;
pub use protocol::*;
pub use server::*;
pub use variant::*;
