//! HRESULT values and their descriptions
//!
//! Operations report their status as a 32-bit HRESULT. [`Hresult`] renders
//! the well-known codes as `NAME: message` and anything else as hex.

use std::fmt;

/// HRESULT codes commonly used in DCOM
pub mod codes {
    pub const S_OK: i32 = 0x00000000;
    pub const S_FALSE: i32 = 0x00000001;
    pub const E_NOTIMPL: i32 = 0x80004001_u32 as i32;
    pub const E_NOINTERFACE: i32 = 0x80004002_u32 as i32;
    pub const E_POINTER: i32 = 0x80004003_u32 as i32;
    pub const E_ABORT: i32 = 0x80004004_u32 as i32;
    pub const E_FAIL: i32 = 0x80004005_u32 as i32;
    pub const E_UNEXPECTED: i32 = 0x8000FFFF_u32 as i32;
    pub const E_ACCESSDENIED: i32 = 0x80070005_u32 as i32;
    pub const E_HANDLE: i32 = 0x80070006_u32 as i32;
    pub const E_OUTOFMEMORY: i32 = 0x8007000E_u32 as i32;
    pub const E_INVALIDARG: i32 = 0x80070057_u32 as i32;
    pub const ERROR_FILE_NOT_FOUND: i32 = 0x80070002_u32 as i32;
    pub const ERROR_PATH_NOT_FOUND: i32 = 0x80070003_u32 as i32;
    pub const ERROR_NOT_READY: i32 = 0x80070015_u32 as i32;
    pub const ERROR_CRC: i32 = 0x80070017_u32 as i32;
    pub const ERROR_SECTOR_NOT_FOUND: i32 = 0x8007001B_u32 as i32;
    pub const ERROR_NOT_SUPPORTED: i32 = 0x80070032_u32 as i32;
    pub const ERROR_INSUFFICIENT_BUFFER: i32 = 0x8007007A_u32 as i32;
    pub const ERROR_INVALID_STATE: i32 = 0x8007139F_u32 as i32;
    pub const REGDB_E_CLASSNOTREG: i32 = 0x80040154_u32 as i32;
    pub const CO_E_OBJNOTCONNECTED: i32 = 0x800401FD_u32 as i32;
    pub const RPC_E_DISCONNECTED: i32 = 0x80010108_u32 as i32;
    pub const RPC_E_SERVER_DIED: i32 = 0x80010007_u32 as i32;
    pub const RPC_E_INVALID_HEADER: i32 = 0x80010111_u32 as i32;
    pub const RPC_E_TOO_LATE: i32 = 0x80010119_u32 as i32;
    pub const DISP_E_UNKNOWNINTERFACE: i32 = 0x80020001_u32 as i32;
    pub const DISP_E_MEMBERNOTFOUND: i32 = 0x80020003_u32 as i32;
    pub const DISP_E_PARAMNOTFOUND: i32 = 0x80020004_u32 as i32;
    pub const DISP_E_TYPEMISMATCH: i32 = 0x80020005_u32 as i32;
    pub const DISP_E_UNKNOWNNAME: i32 = 0x80020006_u32 as i32;
    pub const DISP_E_BADVARTYPE: i32 = 0x80020008_u32 as i32;
    pub const DISP_E_EXCEPTION: i32 = 0x80020009_u32 as i32;
    pub const DISP_E_BADINDEX: i32 = 0x8002000B_u32 as i32;
    pub const DISP_E_BADPARAMCOUNT: i32 = 0x8002000E_u32 as i32;
}

const DESCRIPTIONS: &[(i32, &str, &str)] = &[
    (codes::S_OK, "S_OK", "the operation completed successfully"),
    (codes::S_FALSE, "S_FALSE", "the operation completed with a false result"),
    (codes::E_NOTIMPL, "E_NOTIMPL", "not implemented"),
    (codes::E_NOINTERFACE, "E_NOINTERFACE", "no such interface supported"),
    (codes::E_POINTER, "E_POINTER", "invalid pointer"),
    (codes::E_ABORT, "E_ABORT", "operation aborted"),
    (codes::E_FAIL, "E_FAIL", "unspecified error"),
    (codes::E_UNEXPECTED, "E_UNEXPECTED", "catastrophic failure"),
    (codes::E_ACCESSDENIED, "E_ACCESSDENIED", "general access denied error"),
    (codes::E_HANDLE, "E_HANDLE", "invalid handle"),
    (codes::E_OUTOFMEMORY, "E_OUTOFMEMORY", "out of memory"),
    (codes::E_INVALIDARG, "E_INVALIDARG", "one or more arguments are invalid"),
    (
        codes::ERROR_FILE_NOT_FOUND,
        "ERROR_FILE_NOT_FOUND",
        "the system cannot find the file specified",
    ),
    (
        codes::ERROR_PATH_NOT_FOUND,
        "ERROR_PATH_NOT_FOUND",
        "the system cannot find the path specified",
    ),
    (codes::ERROR_NOT_READY, "ERROR_NOT_READY", "the device is not ready"),
    (codes::ERROR_CRC, "ERROR_CRC", "data error (cyclic redundancy check)"),
    (
        codes::ERROR_SECTOR_NOT_FOUND,
        "ERROR_SECTOR_NOT_FOUND",
        "the drive cannot find the sector requested",
    ),
    (codes::ERROR_NOT_SUPPORTED, "ERROR_NOT_SUPPORTED", "the request is not supported"),
    (
        codes::ERROR_INSUFFICIENT_BUFFER,
        "ERROR_INSUFFICIENT_BUFFER",
        "the data area passed to a system call is too small",
    ),
    (
        codes::ERROR_INVALID_STATE,
        "ERROR_INVALID_STATE",
        "the group or resource is not in the correct state",
    ),
    (codes::REGDB_E_CLASSNOTREG, "REGDB_E_CLASSNOTREG", "class not registered"),
    (
        codes::CO_E_OBJNOTCONNECTED,
        "CO_E_OBJNOTCONNECTED",
        "object is not connected to server",
    ),
    (
        codes::RPC_E_DISCONNECTED,
        "RPC_E_DISCONNECTED",
        "the object invoked has disconnected from its clients",
    ),
    (
        codes::RPC_E_SERVER_DIED,
        "RPC_E_SERVER_DIED",
        "the server has disconnected before the call completed",
    ),
    (
        codes::RPC_E_INVALID_HEADER,
        "RPC_E_INVALID_HEADER",
        "OLE received a packet with an invalid header",
    ),
    (codes::RPC_E_TOO_LATE, "RPC_E_TOO_LATE", "security must be initialized before"),
    (codes::DISP_E_UNKNOWNINTERFACE, "DISP_E_UNKNOWNINTERFACE", "unknown interface"),
    (codes::DISP_E_MEMBERNOTFOUND, "DISP_E_MEMBERNOTFOUND", "member not found"),
    (codes::DISP_E_PARAMNOTFOUND, "DISP_E_PARAMNOTFOUND", "parameter not found"),
    (codes::DISP_E_TYPEMISMATCH, "DISP_E_TYPEMISMATCH", "type mismatch"),
    (codes::DISP_E_UNKNOWNNAME, "DISP_E_UNKNOWNNAME", "unknown name"),
    (codes::DISP_E_BADVARTYPE, "DISP_E_BADVARTYPE", "bad variable type"),
    (codes::DISP_E_EXCEPTION, "DISP_E_EXCEPTION", "exception occurred"),
    (codes::DISP_E_BADINDEX, "DISP_E_BADINDEX", "invalid index"),
    (codes::DISP_E_BADPARAMCOUNT, "DISP_E_BADPARAMCOUNT", "invalid number of parameters"),
];

/// An HRESULT status code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Hresult(pub i32);

impl Hresult {
    pub const S_OK: Self = Self(codes::S_OK);
    pub const E_NOTIMPL: Self = Self(codes::E_NOTIMPL);
    pub const E_FAIL: Self = Self(codes::E_FAIL);

    /// Severity bit clear
    pub fn is_success(self) -> bool {
        self.0 >= 0
    }

    pub fn facility(self) -> u16 {
        ((self.0 as u32 >> 16) & 0x1FFF) as u16
    }

    pub fn code(self) -> u16 {
        self.0 as u16
    }

    /// Symbolic name, for known codes
    pub fn name(self) -> Option<&'static str> {
        lookup(self.0).map(|(name, _)| name)
    }

    /// Human-readable message, for known codes
    pub fn message(self) -> Option<&'static str> {
        lookup(self.0).map(|(_, message)| message)
    }
}

fn lookup(code: i32) -> Option<(&'static str, &'static str)> {
    DESCRIPTIONS
        .iter()
        .find(|(value, _, _)| *value == code)
        .map(|(_, name, message)| (*name, *message))
}

impl From<i32> for Hresult {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<u32> for Hresult {
    fn from(value: u32) -> Self {
        Self(value as i32)
    }
}

impl fmt::Display for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(self.0) {
            Some((name, message)) => write!(f, "{}: {} (0x{:08x})", name, message, self.0 as u32),
            None => write!(f, "0x{:08x}", self.0 as u32),
        }
    }
}
