//! NDR encoding/decoding context
//!
//! The context carries the negotiated data representation: byte order and
//! whether counts and referents use the NDR20 (32-bit) or NDR64 (64-bit)
//! width. Every writer and reader owns one.

/// NDR data representation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrContext {
    /// Whether to use little-endian byte order
    pub little_endian: bool,
    /// Whether conformance counts and referents are 64-bit
    pub ndr64: bool,
}

impl NdrContext {
    /// NDR20, little-endian (the DCOM default)
    pub const fn new() -> Self {
        Self {
            little_endian: true,
            ndr64: false,
        }
    }

    /// NDR20 with big-endian byte order
    pub const fn big_endian() -> Self {
        Self {
            little_endian: false,
            ndr64: false,
        }
    }

    /// NDR64, little-endian
    pub const fn ndr64() -> Self {
        Self {
            little_endian: true,
            ndr64: true,
        }
    }

    /// Width (and alignment) of conformance counts, variance headers and
    /// pointer referents.
    #[inline]
    pub const fn size_width(&self) -> usize {
        if self.ndr64 {
            8
        } else {
            4
        }
    }

    /// Calculate padding needed to align to the given boundary
    #[inline]
    pub fn align_padding(position: usize, alignment: usize) -> usize {
        if alignment <= 1 {
            return 0;
        }
        let remainder = position % alignment;
        if remainder == 0 {
            0
        } else {
            alignment - remainder
        }
    }
}

impl Default for NdrContext {
    fn default() -> Self {
        Self::new()
    }
}
