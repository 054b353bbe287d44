//! Backing store for the on-chip peripheral registers
//!
//! The MC68VZ328 maps its whole peripheral block into a 4KB window at
//! 0xFFFFF000 (or 0xFFFFFF00-relative when the register window is relocated).
//! Every register the peripherals own lives in this byte array; the
//! peripherals keep only the derived state that can't be recovered from it.
//!
//! Values are big-endian, matching the 68000 bus. Each byte index is masked to
//! 12 bits so multi-byte spans near the top of the window wrap to offset 0.

/// Register window geometry
pub mod window {
    /// Size of the register window in bytes
    pub const SIZE: usize = 0x1000;
    /// Mask applied to every byte index
    pub const OFFSET_MASK: u32 = 0xFFF;
    /// Base address of the register window on the CPU bus
    pub const BASE: u32 = 0xFFFF_F000;
}

/// 4KB peripheral register store
#[derive(Clone)]
pub struct RegisterFile {
    bytes: Box<[u8; window::SIZE]>,
}

impl RegisterFile {
    /// Create a zeroed register file
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; window::SIZE]),
        }
    }

    /// Zero every register
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    #[inline]
    fn index(offset: u32) -> usize {
        (offset & window::OFFSET_MASK) as usize
    }

    /// Read one byte
    #[inline]
    pub fn read8(&self, offset: u32) -> u8 {
        self.bytes[Self::index(offset)]
    }

    /// Read a big-endian halfword
    pub fn read16(&self, offset: u32) -> u16 {
        u16::from_be_bytes([self.read8(offset), self.read8(offset.wrapping_add(1))])
    }

    /// Read a big-endian word
    pub fn read32(&self, offset: u32) -> u32 {
        u32::from_be_bytes([
            self.read8(offset),
            self.read8(offset.wrapping_add(1)),
            self.read8(offset.wrapping_add(2)),
            self.read8(offset.wrapping_add(3)),
        ])
    }

    /// Write one byte
    #[inline]
    pub fn write8(&mut self, offset: u32, value: u8) {
        self.bytes[Self::index(offset)] = value;
    }

    /// Write a big-endian halfword
    pub fn write16(&mut self, offset: u32, value: u16) {
        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            self.write8(offset.wrapping_add(i as u32), byte);
        }
    }

    /// Write a big-endian word
    pub fn write32(&mut self, offset: u32, value: u32) {
        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            self.write8(offset.wrapping_add(i as u32), byte);
        }
    }

    /// Set bits in a halfword register
    pub fn set16(&mut self, offset: u32, bits: u16) {
        let value = self.read16(offset) | bits;
        self.write16(offset, value);
    }

    /// Clear bits in a halfword register
    pub fn clear16(&mut self, offset: u32, bits: u16) {
        let value = self.read16(offset) & !bits;
        self.write16(offset, value);
    }

    /// Raw view of the whole window, for debuggers and state dumps
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("RegisterFile")
            .field("size", &window::SIZE)
            .field("nonzero_bytes", &used)
            .finish()
    }
}
