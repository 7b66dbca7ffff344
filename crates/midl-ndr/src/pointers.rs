//! NDR pointer types
//!
//! NDR supports three pointer semantics:
//!
//! - Reference (`[ref]`): non-null; a top-level reference pointer has no
//!   wire representation and its pointee is written in place
//! - Unique (`[unique]`): nullable referent, pointee deferred, no aliasing
//! - Full (`[ptr]`): nullable referent, pointee deferred, aliasing allowed
//!
//! Embedded unique and full pointers write their referent during the inline
//! phase and their pointee during the deferred phase of the enclosing scope.
//! Aliasing is not resolved: two full pointers to equal data are encoded as
//! two referents with two payloads.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::{NdrDecode, NdrEncode, NdrReader, NdrWriter, Result};

/// Trait for NDR pointer types
pub trait NdrPtr {
    type Target;

    /// Check if the pointer is null
    fn is_null(&self) -> bool;

    /// Get the inner value, if any
    fn get(&self) -> Option<&Self::Target>;

    /// Get a mutable reference to the inner value, if any
    fn get_mut(&mut self) -> Option<&mut Self::Target>;
}

/// Reference pointer used as a top-level parameter
///
/// The `[ref]` attribute in MIDL. The pointer itself is not transmitted;
/// the pointee is encoded in place, including its deferred phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefPtr<T>(pub T);

impl<T> RefPtr<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for RefPtr<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for RefPtr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> NdrPtr for RefPtr<T> {
    type Target = T;

    fn is_null(&self) -> bool {
        false
    }

    fn get(&self) -> Option<&T> {
        Some(&self.0)
    }

    fn get_mut(&mut self) -> Option<&mut T> {
        Some(&mut self.0)
    }
}

impl<T: NdrEncode> NdrEncode for RefPtr<T> {
    fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
        self.0.encode_inline(w)
    }

    fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
        self.0.encode_deferred(w)
    }
}

impl<T: NdrDecode> NdrDecode for RefPtr<T> {
    fn decode_inline(r: &mut NdrReader) -> Result<Self> {
        T::decode_inline(r).map(Self)
    }

    fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
        self.0.decode_deferred(r)
    }
}

macro_rules! deferred_pointer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            value: Option<Box<T>>,
            // non-null referent read, payload not consumed yet
            pending: bool,
        }

        impl<T> $name<T> {
            /// Non-null pointer to `value`
            pub fn new(value: T) -> Self {
                Self {
                    value: Some(Box::new(value)),
                    pending: false,
                }
            }

            /// Null pointer
            pub const fn null() -> Self {
                Self {
                    value: None,
                    pending: false,
                }
            }

            /// Take the pointee, leaving a null pointer
            pub fn take(&mut self) -> Option<T> {
                self.value.take().map(|boxed| *boxed)
            }

            /// Consume the pointer
            pub fn into_inner(self) -> Option<T> {
                self.value.map(|boxed| *boxed)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::null()
            }
        }

        impl<T> From<Option<T>> for $name<T> {
            fn from(value: Option<T>) -> Self {
                match value {
                    Some(value) => Self::new(value),
                    None => Self::null(),
                }
            }
        }

        impl<T: Clone> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self {
                    value: self.value.clone(),
                    pending: self.pending,
                }
            }
        }

        impl<T: PartialEq> PartialEq for $name<T> {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }

        impl<T: Eq> Eq for $name<T> {}

        impl<T: fmt::Debug> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.value {
                    Some(value) => f.debug_tuple(stringify!($name)).field(value).finish(),
                    None => f.write_str(concat!(stringify!($name), "(null)")),
                }
            }
        }

        impl<T> NdrPtr for $name<T> {
            type Target = T;

            fn is_null(&self) -> bool {
                self.value.is_none()
            }

            fn get(&self) -> Option<&T> {
                self.value.as_deref()
            }

            fn get_mut(&mut self) -> Option<&mut T> {
                self.value.as_deref_mut()
            }
        }

        impl<T: NdrEncode> NdrEncode for $name<T> {
            fn encode_inline(&self, w: &mut NdrWriter) -> Result<()> {
                w.write_pointer(self.value.is_some())
            }

            fn encode_deferred(&self, w: &mut NdrWriter) -> Result<()> {
                match &self.value {
                    Some(value) => w.write_pointee(&**value),
                    None => Ok(()),
                }
            }
        }

        impl<T: NdrDecode> NdrDecode for $name<T> {
            fn decode_inline(r: &mut NdrReader) -> Result<Self> {
                let pending = r.read_pointer()?;
                Ok(Self {
                    value: None,
                    pending,
                })
            }

            fn decode_deferred(&mut self, r: &mut NdrReader) -> Result<()> {
                if self.pending {
                    self.value = Some(Box::new(r.read_pointee()?));
                    self.pending = false;
                }
                Ok(())
            }
        }
    };
}

deferred_pointer! {
    /// Unique pointer - nullable, no aliasing
    ///
    /// The `[unique]` attribute in MIDL. Encoded as a referent (0 = null)
    /// with the pointee in the deferred section of the enclosing scope.
    UniquePtr
}

deferred_pointer! {
    /// Full pointer - nullable, may alias
    ///
    /// The `[ptr]` attribute in MIDL. Same wire form as [`UniquePtr`];
    /// aliased referents are not collapsed.
    FullPtr
}
