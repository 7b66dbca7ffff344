//! Automation data types (MS-OAUT 2.2)
//!
//! [`Variant`] covers the scalar, string and interface arms of the wire
//! `VARIANT`. Arrays, records and by-reference arms are rejected with an
//! invalid discriminant error.

use midl_ndr::{
    invalid_discriminant, ndr_struct, BString, ConformantArray, NdrDecode, NdrEncode, NdrPtr,
    NdrReader, NdrUnion, NdrWriter, UniquePtr,
};

use crate::types::InterfacePointer;

/// Variant type codes (`VARENUM`)
pub mod vt {
    pub const EMPTY: u16 = 0;
    pub const NULL: u16 = 1;
    pub const I2: u16 = 2;
    pub const I4: u16 = 3;
    pub const R4: u16 = 4;
    pub const R8: u16 = 5;
    pub const BSTR: u16 = 8;
    pub const DISPATCH: u16 = 9;
    pub const ERROR: u16 = 10;
    pub const BOOL: u16 = 11;
    pub const UNKNOWN: u16 = 13;
    pub const I1: u16 = 16;
    pub const UI1: u16 = 17;
    pub const UI2: u16 = 18;
    pub const UI4: u16 = 19;
    pub const I8: u16 = 20;
    pub const UI8: u16 = 21;
    pub const INT: u16 = 22;
    pub const UINT: u16 = 23;
}

/// `VARIANT_TRUE`
const VARIANT_TRUE: i16 = -1;

/// Fixed part of `wireVARIANTStr` up to the union arm
const HEADER_SIZE: usize = 24;

/// Automation value (`wireVARIANTStr`)
///
/// Wire form: `clSize`, `rpcReserved`, `vt`, three reserved words, then the
/// union discriminant (`vt` widened to 32 bits) and the arm aligned to 8.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Empty,
    Null,
    I1(i8),
    I2(i16),
    I4(i32),
    I8(i64),
    Ui1(u8),
    Ui2(u16),
    Ui4(u32),
    Ui8(u64),
    Int(i32),
    Uint(u32),
    R4(f32),
    R8(f64),
    Bool(bool),
    /// SCODE
    Error(i32),
    Bstr(UniquePtr<BString>),
    Unknown(UniquePtr<InterfacePointer>),
    Dispatch(UniquePtr<InterfacePointer>),
}

impl Variant {
    /// BSTR variant
    pub fn bstr(s: impl Into<String>) -> Self {
        Variant::Bstr(UniquePtr::new(BString(s.into())))
    }

    /// Variant type code
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => vt::EMPTY,
            Variant::Null => vt::NULL,
            Variant::I1(_) => vt::I1,
            Variant::I2(_) => vt::I2,
            Variant::I4(_) => vt::I4,
            Variant::I8(_) => vt::I8,
            Variant::Ui1(_) => vt::UI1,
            Variant::Ui2(_) => vt::UI2,
            Variant::Ui4(_) => vt::UI4,
            Variant::Ui8(_) => vt::UI8,
            Variant::Int(_) => vt::INT,
            Variant::Uint(_) => vt::UINT,
            Variant::R4(_) => vt::R4,
            Variant::R8(_) => vt::R8,
            Variant::Bool(_) => vt::BOOL,
            Variant::Error(_) => vt::ERROR,
            Variant::Bstr(_) => vt::BSTR,
            Variant::Unknown(_) => vt::UNKNOWN,
            Variant::Dispatch(_) => vt::DISPATCH,
        }
    }

    /// String payload of a BSTR variant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Bstr(s) => s.get().map(|s| s.as_str()),
            _ => None,
        }
    }

    /// Integer payload widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Variant::I1(v) => Some(v.into()),
            Variant::I2(v) => Some(v.into()),
            Variant::I4(v) | Variant::Int(v) => Some(v.into()),
            Variant::I8(v) => Some(v),
            Variant::Ui1(v) => Some(v.into()),
            Variant::Ui2(v) => Some(v.into()),
            Variant::Ui4(v) | Variant::Uint(v) => Some(v.into()),
            Variant::Ui8(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    fn arm_size(&self, ndr64: bool) -> usize {
        match self {
            Variant::Empty | Variant::Null => 0,
            Variant::I1(_) | Variant::Ui1(_) => 1,
            Variant::I2(_) | Variant::Ui2(_) | Variant::Bool(_) => 2,
            Variant::I8(_) | Variant::Ui8(_) | Variant::R8(_) => 8,
            Variant::Bstr(_) | Variant::Unknown(_) | Variant::Dispatch(_) if ndr64 => 8,
            _ => 4,
        }
    }

    /// `clSize`: inline size of the structure in 8-byte units
    fn cl_size(&self, ndr64: bool) -> u32 {
        ((HEADER_SIZE + self.arm_size(ndr64) + 7) / 8) as u32
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::I4(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::bstr(value)
    }
}

impl NdrUnion for Variant {
    type Tag = u32;

    fn tag(&self) -> u32 {
        u32::from(self.vt())
    }

    fn encode_arm(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        match self {
            Variant::Empty | Variant::Null => Ok(()),
            Variant::I1(v) => w.write_data(*v),
            Variant::I2(v) => w.write_data(*v),
            Variant::I4(v) | Variant::Int(v) | Variant::Error(v) => w.write_data(*v),
            Variant::I8(v) => w.write_data(*v),
            Variant::Ui1(v) => w.write_data(*v),
            Variant::Ui2(v) => w.write_data(*v),
            Variant::Ui4(v) | Variant::Uint(v) => w.write_data(*v),
            Variant::Ui8(v) => w.write_data(*v),
            Variant::R4(v) => w.write_data(*v),
            Variant::R8(v) => w.write_data(*v),
            Variant::Bool(v) => w.write_data(if *v { VARIANT_TRUE } else { 0 }),
            Variant::Bstr(p) => p.encode_inline(w),
            Variant::Unknown(p) | Variant::Dispatch(p) => p.encode_inline(w),
        }
    }

    fn encode_arm_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        match self {
            Variant::Bstr(p) => p.encode_deferred(w),
            Variant::Unknown(p) | Variant::Dispatch(p) => p.encode_deferred(w),
            _ => Ok(()),
        }
    }

    fn decode_arm(tag: u32, r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let vt = u16::try_from(tag).map_err(|_| invalid_discriminant(tag))?;
        Ok(match vt {
            vt::EMPTY => Variant::Empty,
            vt::NULL => Variant::Null,
            vt::I1 => Variant::I1(r.read_data()?),
            vt::I2 => Variant::I2(r.read_data()?),
            vt::I4 => Variant::I4(r.read_data()?),
            vt::I8 => Variant::I8(r.read_data()?),
            vt::UI1 => Variant::Ui1(r.read_data()?),
            vt::UI2 => Variant::Ui2(r.read_data()?),
            vt::UI4 => Variant::Ui4(r.read_data()?),
            vt::UI8 => Variant::Ui8(r.read_data()?),
            vt::INT => Variant::Int(r.read_data()?),
            vt::UINT => Variant::Uint(r.read_data()?),
            vt::R4 => Variant::R4(r.read_data()?),
            vt::R8 => Variant::R8(r.read_data()?),
            vt::BOOL => Variant::Bool(r.read_data::<i16>()? != 0),
            vt::ERROR => Variant::Error(r.read_data()?),
            vt::BSTR => Variant::Bstr(NdrDecode::decode_inline(r)?),
            vt::UNKNOWN => Variant::Unknown(NdrDecode::decode_inline(r)?),
            vt::DISPATCH => Variant::Dispatch(NdrDecode::decode_inline(r)?),
            other => return Err(invalid_discriminant(other)),
        })
    }

    fn decode_arm_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        match self {
            Variant::Bstr(p) => p.decode_deferred(r),
            Variant::Unknown(p) | Variant::Dispatch(p) => p.decode_deferred(r),
            _ => Ok(()),
        }
    }
}

impl NdrEncode for Variant {
    fn encode_inline(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_align(8)?;
        w.write_data(self.cl_size(w.context().ndr64))?;
        w.write_data(0u32)?;
        w.write_data(self.vt())?;
        for _ in 0..3 {
            w.write_data(0u16)?;
        }
        w.write_data(self.tag())?;
        w.write_align(8)?;
        self.encode_arm(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        self.encode_arm_deferred(w)
    }
}

impl NdrDecode for Variant {
    fn decode_inline(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        r.read_align(8)?;
        let _cl_size = r.read_data::<u32>()?;
        let _reserved = r.read_data::<u32>()?;
        let vt = r.read_data::<u16>()?;
        for _ in 0..3 {
            r.read_data::<u16>()?;
        }
        let tag = r.read_data::<u32>()?;
        if tag != u32::from(vt) {
            return Err(invalid_discriminant(tag));
        }
        r.read_align(8)?;
        Self::decode_arm(tag, r)
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        self.decode_arm_deferred(r)
    }
}

ndr_struct! {
    /// Arguments of an `Invoke` call (`DISPPARAMS`)
    ///
    /// Positional arguments are stored last-to-first.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct DispParams align(4) {
        pub args: UniquePtr<ConformantArray<UniquePtr<Variant>>>,
        pub named_args: UniquePtr<ConformantArray<i32>>,
        pub arg_count: u32,
        pub named_arg_count: u32,
    }
}

impl DispParams {
    /// Parameters for positional `args`, given first-to-last
    pub fn new(args: Vec<Variant>) -> Self {
        if args.is_empty() {
            return Self::default();
        }
        let arg_count = args.len() as u32;
        Self {
            args: UniquePtr::new(args.into_iter().rev().map(UniquePtr::new).collect::<Vec<_>>().into()),
            named_args: UniquePtr::null(),
            arg_count,
            named_arg_count: 0,
        }
    }

    /// Positional arguments in call order
    pub fn arguments(&self) -> Vec<&Variant> {
        let mut args: Vec<&Variant> = self
            .args
            .get()
            .into_iter()
            .flat_map(|array| array.iter())
            .filter_map(|slot| slot.get())
            .collect();
        args.reverse();
        args
    }
}

ndr_struct! {
    /// Exception details returned by `Invoke` (`EXCEPINFO`)
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct ExcepInfo align(4) {
        pub code: u16,
        pub reserved: u16,
        pub source: UniquePtr<BString>,
        pub description: UniquePtr<BString>,
        pub help_file: UniquePtr<BString>,
        pub help_context: u32,
        pub pv_reserved: u32,
        pub deferred_fill_in: u32,
        pub scode: i32,
    }
}

impl ExcepInfo {
    pub fn new(source: &str, description: &str, scode: i32) -> Self {
        Self {
            source: UniquePtr::new(BString::new(source)),
            description: UniquePtr::new(BString::new(description)),
            scode,
            ..Self::default()
        }
    }
}
