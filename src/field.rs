//! Named bit ranges inside a register
//!
//! A [`Field`] is a register plus a mask. The logical value of the field is the masked bits
//! shifted down by the position of the lowest set bit of the mask.
//!
//! # Example
//! ```rust
//! use bd65b60_fan5404x::fan5404x::CTRL0_STAT;
//!
//! assert_eq!(CTRL0_STAT.encode(0b10), 0b0010_0000);
//! assert_eq!(CTRL0_STAT.decode(0b1110_0101), 0b10);
//! ```

/// A sub-range of a register selected by a mask
///
/// The mask is usually a contiguous run of bits. Non-contiguous masks (such as the LED select
/// field of the BD65B60) still work but keep their gaps after shifting.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Field<R> {
    register: R,
    mask: u8,
}

impl<R: Copy> Field<R> {
    /// Create a field from a register and a non-zero mask
    #[must_use]
    pub const fn new(register: R, mask: u8) -> Self {
        assert!(mask != 0, "A field needs at least one bit");
        Self { register, mask }
    }

    /// The register containing this field
    #[must_use]
    pub const fn register(&self) -> R {
        self.register
    }

    /// Mask selecting the bits of this field in the register
    #[must_use]
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Position of the lowest bit of the field
    #[must_use]
    pub const fn shift(&self) -> u32 {
        self.mask.trailing_zeros()
    }

    /// Move `value` into the position of the field
    ///
    /// Bits of `value` that do not fit into the field are silently dropped.
    #[must_use]
    pub const fn encode(&self, value: u8) -> u8 {
        (value << self.shift()) & self.mask
    }

    /// Extract the value of the field from the raw register content
    #[must_use]
    pub const fn decode(&self, raw: u8) -> u8 {
        (raw & self.mask) >> self.shift()
    }

    /// Replace the field in `raw` with `value`, keeping all other bits
    #[must_use]
    pub const fn apply(&self, raw: u8, value: u8) -> u8 {
        (raw & !self.mask) | self.encode(value)
    }

    /// Check that a pre-positioned register value only uses bits of this field
    #[must_use]
    pub const fn fits(&self, raw: u32) -> bool {
        raw & !(self.mask as u32) == 0
    }
}
