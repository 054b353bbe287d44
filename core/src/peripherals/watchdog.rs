//! Watchdog timer
//!
//! WATCHDOG (0xB0A):
//!   bit 0:    EN - count once per second
//!   bit 1:    ISEL - raise an interrupt instead of resetting the system
//!   bit 7:    INTF - interrupt flag, write 1 to clear
//!   bits 9-8: CNTR - seconds counted since the last write
//!
//! The counter expires when it reaches 2. Any write restarts it.

use super::regs;
use crate::register_file::RegisterFile;

mod bits {
    pub const ENABLE: u16 = 0x0001;
    pub const INTERRUPT_SELECT: u16 = 0x0002;
    pub const INTERRUPT_FLAG: u16 = 0x0080;
    pub const EXPIRED: u16 = 0x0200;
    pub const COUNT_STEP: u16 = 0x0100;
    pub const STATE_MASK: u16 = 0x0383;
    pub const CONFIG_MASK: u16 = 0x0003;
}

/// What the watchdog did on a second boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogEvent {
    Idle,
    /// Expired with ISEL set; raise the WDT source
    Interrupt,
    /// Expired with ISEL clear; the whole system must reset
    Reset,
}

/// Count one second
pub fn tick_second(regs: &mut RegisterFile) -> WatchdogEvent {
    let mut state = regs.read16(regs::WATCHDOG);
    if state & bits::ENABLE == 0 {
        return WatchdogEvent::Idle;
    }

    state = state.wrapping_add(bits::COUNT_STEP) & bits::STATE_MASK;
    let mut event = WatchdogEvent::Idle;
    if state & bits::EXPIRED != 0 {
        if state & bits::INTERRUPT_SELECT == 0 {
            // Registers are about to be reset anyway
            return WatchdogEvent::Reset;
        }
        state |= bits::INTERRUPT_FLAG;
        event = WatchdogEvent::Interrupt;
    }
    regs.write16(regs::WATCHDOG, state);
    event
}

/// WATCHDOG write: restart the count, update EN/ISEL and clear INTF if
/// written as 1. Returns true when INTF was cleared.
pub fn write(regs: &mut RegisterFile, value: u16) -> bool {
    let old = regs.read16(regs::WATCHDOG);
    let cleared = old & bits::INTERRUPT_FLAG != 0 && value & bits::INTERRUPT_FLAG != 0;
    let flag = if cleared { 0 } else { old & bits::INTERRUPT_FLAG };
    regs.write16(regs::WATCHDOG, (value & bits::CONFIG_MASK) | flag);
    cleared
}
