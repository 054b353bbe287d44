//! System Control Register
//!
//! SCR (0x000, 8-bit):
//!   bit 7: BETO  - bus error timeout occurred (sticky, write 1 to clear)
//!   bit 6: WPV   - write protect violation (sticky, write 1 to clear)
//!   bit 5: PRV   - privilege violation (sticky, write 1 to clear)
//!   bit 4: BETEN - bus error timeout enable
//!   bit 3: SO    - register window is supervisor-only
//!   bit 2: DMAP  - register window relocated to 0xFFFFFF00-relative mapping
//!   bit 0: WDTH8 - 8-bit bus width for the double map

use super::regs;
use crate::register_file::RegisterFile;

mod bits {
    pub const BUS_ERROR_TIMEOUT: u8 = 0x80;
    pub const WRITE_PROTECT: u8 = 0x40;
    pub const PRIVILEGE: u8 = 0x20;
    pub const BUS_ERROR_ENABLE: u8 = 0x10;
    pub const SUPERVISOR_ONLY: u8 = 0x08;
    pub const DOUBLE_MAP: u8 = 0x04;
}

/// Sticky fault flags
const FAULT_BITS: u8 = bits::BUS_ERROR_TIMEOUT | bits::WRITE_PROTECT | bits::PRIVILEGE;

/// Bus faults reported by the memory mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    BusErrorTimeout,
    WriteProtect,
    Privilege,
}

impl Fault {
    fn bit(self) -> u8 {
        match self {
            Fault::BusErrorTimeout => bits::BUS_ERROR_TIMEOUT,
            Fault::WriteProtect => bits::WRITE_PROTECT,
            Fault::Privilege => bits::PRIVILEGE,
        }
    }
}

/// Side effects of an SCR write the caller must act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrUpdate {
    pub supervisor_only: bool,
    /// New DMAP state, if it changed
    pub relocation_changed: Option<bool>,
}

/// Handle a write to SCR
pub fn write_scr(regs: &mut RegisterFile, value: u8) -> ScrUpdate {
    let old = regs.read8(regs::SCR);
    let new = (value | (old & FAULT_BITS)) & !(old & value & FAULT_BITS);
    regs.write8(regs::SCR, new);

    let relocated = new & bits::DOUBLE_MAP != 0;
    ScrUpdate {
        supervisor_only: new & bits::SUPERVISOR_ONLY != 0,
        relocation_changed: ((old ^ new) & bits::DOUBLE_MAP != 0).then_some(relocated),
    }
}

/// Latch a fault. Returns true if bus errors are enabled and the CPU must
/// take one.
pub fn record_fault(regs: &mut RegisterFile, fault: Fault) -> bool {
    let scr = regs.read8(regs::SCR) | fault.bit();
    regs.write8(regs::SCR, scr);
    scr & bits::BUS_ERROR_ENABLE != 0
}

/// DMAP set
pub fn is_relocated(regs: &RegisterFile) -> bool {
    regs.read8(regs::SCR) & bits::DOUBLE_MAP != 0
}
