//! Exported objects and their distributed reference counts
//!
//! An [`ExportTable`] records the objects an exporter hands out, the
//! interface pointers (IPIDs) marshaled for them and the public and private
//! references remote clients hold on each. It is also the IRemUnknown
//! server for those objects.

use std::collections::HashMap;

use async_trait::async_trait;
use dcerpc::{CallContext, Result as RpcResult, Uuid};
use midl_ndr::UniquePtr;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::protocol::*;
use super::server::RemUnknownServer;
use crate::iunknown::{UnknownServer, IUNKNOWN_SYNTAX};
use crate::types::{codes, DcomError, Ipid, Oid, Oxid, Result, StdObjRef};

/// Reference counts of one marshaled interface pointer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceEntry {
    pub ipid: Ipid,
    pub oid: Oid,
    pub iid: Uuid,
    pub public_refs: u32,
    pub private_refs: u32,
}

impl InterfaceEntry {
    pub fn total_refs(&self) -> u32 {
        self.public_refs.saturating_add(self.private_refs)
    }
}

#[derive(Debug, Default)]
struct ObjectEntry {
    iids: Vec<Uuid>,
    // marshaled interface per IID
    ipids: HashMap<Uuid, Ipid>,
}

#[derive(Debug, Default)]
struct Tables {
    objects: HashMap<Oid, ObjectEntry>,
    interfaces: HashMap<Ipid, InterfaceEntry>,
}

/// Objects exported by one OXID
#[derive(Debug)]
pub struct ExportTable {
    oxid: Oxid,
    tables: RwLock<Tables>,
}

impl ExportTable {
    pub fn new(oxid: Oxid) -> Self {
        Self {
            oxid,
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn oxid(&self) -> Oxid {
        self.oxid
    }

    /// Export an object implementing `iids`; IUnknown is always implied.
    pub fn export_object(&self, iids: impl IntoIterator<Item = Uuid>) -> Oid {
        let oid = Oid::generate();
        let mut object = ObjectEntry {
            iids: vec![IUNKNOWN_SYNTAX.uuid],
            ..Default::default()
        };
        for iid in iids {
            if !object.iids.contains(&iid) {
                object.iids.push(iid);
            }
        }
        info!("Exporting object {} with {} interfaces", oid, object.iids.len());
        self.tables.write().objects.insert(oid, object);
        oid
    }

    /// Marshal interface `iid` of object `oid`, granting `public_refs`
    pub fn marshal(&self, oid: Oid, iid: Uuid, public_refs: u32) -> Result<StdObjRef> {
        let mut tables = self.tables.write();
        let Tables {
            objects,
            interfaces,
        } = &mut *tables;
        let object = objects.get_mut(&oid).ok_or(DcomError::ObjectNotFound(oid))?;
        if !object.iids.contains(&iid) {
            return Err(DcomError::NoInterface(iid));
        }
        let ipid = *object.ipids.entry(iid).or_insert_with(Ipid::generate);
        let entry = interfaces.entry(ipid).or_insert_with(|| InterfaceEntry {
            ipid,
            oid,
            iid,
            public_refs: 0,
            private_refs: 0,
        });
        entry.public_refs = entry.public_refs.saturating_add(public_refs);
        debug!("Marshaled {} on {} as {}", iid, oid, ipid);
        Ok(StdObjRef::new(self.oxid, oid, ipid, public_refs))
    }

    /// Marshal another interface of the object `ipid` belongs to
    pub fn query_interface(&self, ipid: Ipid, iid: Uuid, public_refs: u32) -> Result<StdObjRef> {
        let oid = self
            .tables
            .read()
            .interfaces
            .get(&ipid)
            .map(|entry| entry.oid)
            .ok_or(DcomError::InterfaceNotFound(ipid))?;
        self.marshal(oid, iid, public_refs)
    }

    /// Add references; returns the new public count
    pub fn add_ref(&self, reference: &RemInterfaceRef) -> Result<u32> {
        let mut tables = self.tables.write();
        let entry = tables
            .interfaces
            .get_mut(&reference.ipid)
            .ok_or(DcomError::InterfaceNotFound(reference.ipid))?;
        entry.public_refs = entry.public_refs.saturating_add(reference.public_refs);
        entry.private_refs = entry.private_refs.saturating_add(reference.private_refs);
        Ok(entry.public_refs)
    }

    /// Drop references; returns the remaining total.
    ///
    /// An interface whose count reaches zero is unexported; an object with
    /// no interfaces left is dropped with it.
    pub fn release(&self, reference: &RemInterfaceRef) -> Result<u32> {
        let mut tables = self.tables.write();
        let entry = tables
            .interfaces
            .get_mut(&reference.ipid)
            .ok_or(DcomError::InterfaceNotFound(reference.ipid))?;
        if reference.public_refs > entry.public_refs || reference.private_refs > entry.private_refs {
            return Err(DcomError::RefCountError(format!(
                "releasing {}+{} references on {} which holds {}+{}",
                reference.public_refs,
                reference.private_refs,
                reference.ipid,
                entry.public_refs,
                entry.private_refs
            )));
        }
        entry.public_refs -= reference.public_refs;
        entry.private_refs -= reference.private_refs;
        let remaining = entry.total_refs();
        if remaining == 0 {
            let (oid, iid) = (entry.oid, entry.iid);
            tables.interfaces.remove(&reference.ipid);
            let drop_object = match tables.objects.get_mut(&oid) {
                Some(object) => {
                    object.ipids.remove(&iid);
                    object.ipids.is_empty()
                }
                None => false,
            };
            if drop_object {
                tables.objects.remove(&oid);
                info!("Object {} released", oid);
            }
        }
        Ok(remaining)
    }

    pub fn interface(&self, ipid: &Ipid) -> Option<InterfaceEntry> {
        self.tables.read().interfaces.get(ipid).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.tables.read().objects.len()
    }
}

impl UnknownServer for ExportTable {}

#[async_trait]
impl RemUnknownServer for ExportTable {
    async fn rem_query_interface(
        &self,
        _ctx: &CallContext,
        request: RemQueryInterfaceRequest,
    ) -> RpcResult<RemQueryInterfaceResponse> {
        if self.interface(&request.ipid).is_none() {
            let err = DcomError::InterfaceNotFound(request.ipid);
            return Ok(RemQueryInterfaceResponse {
                return_value: err.hresult().0,
                ..Default::default()
            });
        }
        let results: Vec<RemQiResult> = request
            .iids
            .iter()
            .take(usize::from(request.iid_count))
            .map(|iid| match self.query_interface(request.ipid, *iid, request.refs) {
                Ok(std) => RemQiResult::success(std),
                Err(err) => RemQiResult::failure(err.hresult().0),
            })
            .collect();
        let return_value = if results.iter().any(|r| r.hresult == 0) {
            codes::S_OK
        } else {
            codes::E_NOINTERFACE
        };
        Ok(RemQueryInterfaceResponse {
            results: UniquePtr::new(results.into()),
            return_value,
            ..Default::default()
        })
    }

    async fn rem_add_ref(
        &self,
        _ctx: &CallContext,
        request: RemAddRefRequest,
    ) -> RpcResult<RemAddRefResponse> {
        let results: Vec<i32> = request
            .refs
            .iter()
            .map(|reference| match self.add_ref(reference) {
                Ok(_) => codes::S_OK,
                Err(err) => err.hresult().0,
            })
            .collect();
        let return_value = first_failure(&results);
        Ok(RemAddRefResponse {
            results: results.into(),
            return_value,
            ..Default::default()
        })
    }

    async fn rem_release(
        &self,
        _ctx: &CallContext,
        request: RemReleaseRequest,
    ) -> RpcResult<RemReleaseResponse> {
        let results: Vec<i32> = request
            .refs
            .iter()
            .map(|reference| match self.release(reference) {
                Ok(_) => codes::S_OK,
                Err(err) => err.hresult().0,
            })
            .collect();
        Ok(RemReleaseResponse {
            return_value: first_failure(&results),
            ..Default::default()
        })
    }
}

fn first_failure(results: &[i32]) -> i32 {
    results.iter().copied().find(|hr| *hr < 0).unwrap_or(codes::S_OK)
}
