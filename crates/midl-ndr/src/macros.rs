//! Declarative helpers for the shapes stubs are made of
//!
//! [`ndr_struct!`](crate::ndr_struct) declares an NDR structure: the
//! structure aligns to the given boundary, fields are written inline in
//! declaration order and their deferred phases follow in the same order.
//!
//! [`ndr_params!`](crate::ndr_params) declares a request or response
//! parameter list: every field is a top-level parameter and therefore forms
//! its own deferred scope, drained before the next parameter starts.

/// Declare a structure with NDR encoding in field order.
///
/// ```
/// midl_ndr::ndr_struct! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Extent align(4) {
///         pub id: midl_ndr::Uuid,
///         pub size: u32,
///         pub next: midl_ndr::UniquePtr<u32>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! ndr_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident align($align:expr) {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $crate::NdrEncode for $name {
            fn encode_inline(&self, w: &mut $crate::NdrWriter) -> $crate::Result<()> {
                w.write_align($align)?;
                $( $crate::NdrEncode::encode_inline(&self.$field, w)?; )*
                Ok(())
            }

            #[allow(unused_variables)]
            fn encode_deferred(&self, w: &mut $crate::NdrWriter) -> $crate::Result<()> {
                $( $crate::NdrEncode::encode_deferred(&self.$field, w)?; )*
                Ok(())
            }
        }

        impl $crate::NdrDecode for $name {
            fn decode_inline(r: &mut $crate::NdrReader) -> $crate::Result<Self> {
                r.read_align($align)?;
                Ok(Self {
                    $( $field: $crate::NdrDecode::decode_inline(r)?, )*
                })
            }

            #[allow(unused_variables)]
            fn decode_deferred(&mut self, r: &mut $crate::NdrReader) -> $crate::Result<()> {
                $( $crate::NdrDecode::decode_deferred(&mut self.$field, r)?; )*
                Ok(())
            }
        }
    };
}

/// Declare a parameter list where each field is a top-level parameter.
#[macro_export]
macro_rules! ndr_params {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $crate::NdrEncode for $name {
            #[allow(unused_variables)]
            fn encode_inline(&self, w: &mut $crate::NdrWriter) -> $crate::Result<()> {
                $( w.write_value(&self.$field)?; )*
                Ok(())
            }
        }

        impl $crate::NdrDecode for $name {
            #[allow(unused_variables)]
            fn decode_inline(r: &mut $crate::NdrReader) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: r.read_value()?, )*
                })
            }
        }
    };
}
