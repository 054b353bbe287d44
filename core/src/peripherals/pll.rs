//! PLL and clock generation
//!
//! PLLCR (0x200):
//!   bits 9-8:  SYSCLKSEL - system clock divider (/2, /4, /8, /16)
//!   bit 7:     PRESC1 - halve the PLL output
//!   bit 5:     PRESC2 - halve it again for DMA clocks
//!   bit 3:     DISPLL - PLL shut down
//!   bits 1-0:  WKSEL - wake-up delay selection
//!
//! PLLFSR (0x202):
//!   bit 15:    CLK32 - mirrors the 32kHz crystal, toggles every tick
//!   bit 14:    PROT - locks PLLFSR until reset
//!   bits 11-8: QCNT
//!   bits 7-0:  PCNT
//!
//! The PLL multiplies the 32.768kHz crystal by `2 * (14 * (P + 1) + Q + 1)`.
//! Everything here is expressed per CLK32 period so the timers can advance by
//! a fractional count on every tick.

use super::regs;
use crate::register_file::RegisterFile;

mod bits {
    pub const DISPLL: u16 = 0x0008;
    pub const PRESC1: u16 = 0x0080;
    pub const PRESC2: u16 = 0x0020;
    pub const WKSEL: u16 = 0x0003;
    pub const CLK32: u16 = 0x8000;
    pub const PROT: u16 = 0x4000;
}

const PLLCR_MASK: u16 = 0x3FBB;
const PLLFSR_MASK: u16 = 0x4FFF;

/// CLK32 periods between a wake-up request and the PLL running again
const WAKE_DELAYS: [u32; 4] = [32, 48, 64, 96];

/// CPU cycles allowed after DISPLL is written before the core stops
pub const SHUTDOWN_GRACE_CYCLES: u32 = 30;

/// PLL state not recoverable from PLLCR/PLLFSR
#[derive(Debug, Clone)]
pub struct Pll {
    /// System clocks per CLK32 period before the post-dividers
    crystal_cycles: f64,
    /// Ticks left until a pending wake-up clears DISPLL
    wake_countdown: Option<u32>,
}

impl Pll {
    pub fn new() -> Self {
        Self {
            crystal_cycles: 0.0,
            wake_countdown: None,
        }
    }

    /// Drop any pending wake-up and re-derive from the registers
    pub fn reset(&mut self, regs: &RegisterFile) {
        self.wake_countdown = None;
        self.recompute(regs);
    }

    /// PLL output cycles per CLK32 period
    pub fn crystal_cycles(&self) -> f64 {
        self.crystal_cycles
    }

    pub fn wake_countdown(&self) -> Option<u32> {
        self.wake_countdown
    }

    /// Clock is running (DISPLL clear)
    pub fn is_on(regs: &RegisterFile) -> bool {
        regs.read16(regs::PLLCR) & bits::DISPLL == 0
    }

    fn recompute(&mut self, regs: &RegisterFile) {
        let pllfsr = regs.read16(regs::PLLFSR);
        let pllcr = regs.read16(regs::PLLCR);
        let p = f64::from(pllfsr & 0x00FF);
        let q = f64::from((pllfsr >> 8) & 0x000F);
        let prescaler1 = if pllcr & bits::PRESC1 != 0 { 2.0 } else { 1.0 };
        let cycles = 2.0 * (14.0 * (p + 1.0) + q + 1.0) / prescaler1;
        if cycles != self.crystal_cycles {
            log::debug!("PLL: {:.1} cycles per CLK32 period", cycles);
        }
        self.crystal_cycles = cycles;
    }

    /// Handle a write to PLLFSR; ignored once PROT is set
    pub fn write_pllfsr(&mut self, regs: &mut RegisterFile, value: u16) {
        let old = regs.read16(regs::PLLFSR);
        if old & bits::PROT != 0 {
            return;
        }
        regs.write16(regs::PLLFSR, (value & PLLFSR_MASK) | (old & bits::CLK32));
        self.recompute(regs);
    }

    /// Handle a write to PLLCR. Returns true when the write shuts the PLL
    /// down and the CPU must stop shortly.
    pub fn write_pllcr(&mut self, regs: &mut RegisterFile, value: u16) -> bool {
        regs.write16(regs::PLLCR, value & PLLCR_MASK);
        self.recompute(regs);
        let shutdown = value & bits::DISPLL != 0;
        if shutdown {
            log::debug!("PLL: disabled");
        }
        shutdown
    }

    /// Flip the CLK32 mirror bit
    pub fn toggle_clk32(regs: &mut RegisterFile) {
        let value = regs.read16(regs::PLLFSR) ^ bits::CLK32;
        regs.write16(regs::PLLFSR, value);
    }

    /// Start the wake-up delay if the PLL is off and no wake-up is pending
    pub fn request_wake(&mut self, regs: &RegisterFile) {
        let pllcr = regs.read16(regs::PLLCR);
        if pllcr & bits::DISPLL != 0 && self.wake_countdown.is_none() {
            self.wake_countdown = Some(WAKE_DELAYS[usize::from(pllcr & bits::WKSEL)]);
        }
    }

    /// Advance a pending wake-up by one CLK32 period
    pub fn tick_wake(&mut self, regs: &mut RegisterFile) {
        match self.wake_countdown {
            Some(0) => {
                regs.clear16(regs::PLLCR, bits::DISPLL);
                self.wake_countdown = None;
                log::debug!("PLL: woke up");
            }
            Some(remaining) => self.wake_countdown = Some(remaining - 1),
            None => {}
        }
    }

    /// DMA clocks per CLK32 period
    pub fn dmaclks_per_clk32(&self, regs: &RegisterFile) -> f64 {
        let pllcr = regs.read16(regs::PLLCR);
        let mut clocks = self.crystal_cycles;
        if pllcr & bits::PRESC1 != 0 {
            clocks /= 2.0;
        }
        if pllcr & bits::PRESC2 != 0 {
            clocks /= 2.0;
        }
        clocks
    }

    /// System clocks per CLK32 period, the rate timer source 1 counts at
    pub fn sysclks_per_clk32(&self, regs: &RegisterFile) -> f64 {
        let divider = match (regs.read16(regs::PLLCR) >> 8) & 0x3 {
            0 => 2.0,
            1 => 4.0,
            2 => 8.0,
            _ => 16.0,
        };
        self.dmaclks_per_clk32(regs) / divider
    }
}

impl Default for Pll {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_on() -> (Pll, RegisterFile) {
        let mut regs = RegisterFile::new();
        regs.write16(regs::PLLCR, 0x24B3);
        regs.write16(regs::PLLFSR, 0x0347);
        let mut pll = Pll::new();
        pll.reset(&regs);
        (pll, regs)
    }

    #[test]
    fn test_power_on_frequency() {
        let (pll, regs) = power_on();
        // P = 0x47, Q = 3, PRESC1 set: 2 * (14 * 72 + 4) / 2
        assert_eq!(pll.crystal_cycles(), 1012.0);
        // PRESC1 and PRESC2 both set
        assert_eq!(pll.dmaclks_per_clk32(&regs), 253.0);
        // SYSCLKSEL = 0, divide by 2
        assert_eq!(pll.sysclks_per_clk32(&regs), 126.5);
        assert!(Pll::is_on(&regs));
    }

    #[test]
    fn test_sysclk_dividers() {
        let (mut pll, mut regs) = power_on();
        // Clear both prescalers, SYSCLKSEL = 0
        pll.write_pllcr(&mut regs, 0x0000);
        assert_eq!(pll.crystal_cycles(), 2024.0);
        assert_eq!(pll.sysclks_per_clk32(&regs), 1012.0);
        pll.write_pllcr(&mut regs, 0x0300);
        assert_eq!(pll.sysclks_per_clk32(&regs), 2024.0 / 16.0);
        // Only two select bits are decoded
        pll.write_pllcr(&mut regs, 0x0700);
        assert_eq!(pll.sysclks_per_clk32(&regs), 2024.0 / 16.0);
        pll.write_pllcr(&mut regs, 0x0400);
        assert_eq!(pll.sysclks_per_clk32(&regs), 1012.0);
    }

    #[test]
    fn test_pllfsr_write_keeps_clk32() {
        let (mut pll, mut regs) = power_on();
        Pll::toggle_clk32(&mut regs);
        assert_eq!(regs.read16(regs::PLLFSR), 0x8347);
        pll.write_pllfsr(&mut regs, 0x3FFF);
        assert_eq!(regs.read16(regs::PLLFSR), 0x8FFF);
        // 2 * (14 * 256 + 16) / 2
        assert_eq!(pll.crystal_cycles(), 3600.0);
    }

    #[test]
    fn test_pllfsr_protect() {
        let (mut pll, mut regs) = power_on();
        pll.write_pllfsr(&mut regs, 0x4347);
        assert_eq!(regs.read16(regs::PLLFSR), 0x4347);
        pll.write_pllfsr(&mut regs, 0x0100);
        assert_eq!(regs.read16(regs::PLLFSR), 0x4347);
        assert_eq!(pll.crystal_cycles(), 1012.0);
    }

    #[test]
    fn test_pllcr_mask_and_shutdown() {
        let (mut pll, mut regs) = power_on();
        assert!(!pll.write_pllcr(&mut regs, 0xFFF7));
        assert_eq!(regs.read16(regs::PLLCR), 0x3FB3);
        assert!(pll.write_pllcr(&mut regs, 0x24BB));
        assert!(!Pll::is_on(&regs));
    }

    #[test]
    fn test_wake_countdown() {
        let (mut pll, mut regs) = power_on();
        // PLL running: nothing to wake
        pll.request_wake(&regs);
        assert_eq!(pll.wake_countdown(), None);

        // WKSEL = 1 -> 48 ticks
        pll.write_pllcr(&mut regs, 0x24B9);
        pll.request_wake(&regs);
        assert_eq!(pll.wake_countdown(), Some(48));

        // Re-arming while pending is a no-op
        pll.tick_wake(&mut regs);
        pll.request_wake(&regs);
        assert_eq!(pll.wake_countdown(), Some(47));

        for _ in 0..47 {
            pll.tick_wake(&mut regs);
        }
        assert!(!Pll::is_on(&regs));
        pll.tick_wake(&mut regs);
        assert!(Pll::is_on(&regs));
        assert_eq!(pll.wake_countdown(), None);
    }
}
