//! General purpose timers
//!
//! Two identical 16-bit timers, timer 2 at +0x10:
//!   0x600: TCTL   - control
//!   0x602: TPRER  - prescaler (divide by value + 1)
//!   0x604: TCMP   - compare value
//!   0x606: TCR    - capture (not emulated)
//!   0x608: TCN    - counter, read-only
//!   0x60A: TSTAT  - status, bit 0 = compare event
//!
//! TCTL bits:
//!   bit 0:    TEN - enable
//!   bits 3-1: CLKSOURCE - 0 stop, 1 SYSCLK, 2 SYSCLK/16, 3 TIN, 4-7 CLK32
//!   bit 4:    IRQEN - interrupt on compare
//!   bit 8:    FRR - free-running (don't restart on compare)
//!
//! Counts arrive fractionally once per CLK32 period. The fractional part is
//! carried between ticks so slow sources still count at the correct rate.

use super::interrupt::sources;
use super::regs;
use crate::register_file::RegisterFile;

mod ctl {
    pub const ENABLE: u16 = 0x0001;
    pub const IRQ_ENABLE: u16 = 0x0010;
    pub const FREE_RUNNING: u16 = 0x0100;
}

/// TCTL writable bits
pub const TCTL_MASK: u16 = 0x01FF;
/// TSTAT compare event flag
pub const TSTAT_COMPARE: u16 = 0x0001;
/// TSTAT capture event flag
pub const TSTAT_CAPTURE: u16 = 0x0002;

/// Register block and interrupt source of one timer
#[derive(Debug)]
pub struct TimerBlock {
    pub control: u32,
    pub prescaler: u32,
    pub compare: u32,
    pub counter: u32,
    pub status: u32,
    pub source: u32,
}

pub const TIMER1: TimerBlock = TimerBlock {
    control: regs::TCTL1,
    prescaler: regs::TPRER1,
    compare: regs::TCMP1,
    counter: regs::TCN1,
    status: regs::TSTAT1,
    source: sources::TMR1,
};

pub const TIMER2: TimerBlock = TimerBlock {
    control: regs::TCTL2,
    prescaler: regs::TPRER2,
    compare: regs::TCMP2,
    counter: regs::TCN2,
    status: regs::TSTAT2,
    source: sources::TMR2,
};

/// What a clock source feeds the counter with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockSource {
    Stopped,
    SystemClock,
    SystemClockDiv16,
    /// TIN pin, not wired on this board
    ExternalPin,
    Clk32,
}

impl ClockSource {
    pub fn from_control(control: u16) -> Self {
        match (control >> 1) & 0x7 {
            0 => ClockSource::Stopped,
            1 => ClockSource::SystemClock,
            2 => ClockSource::SystemClockDiv16,
            3 => ClockSource::ExternalPin,
            _ => ClockSource::Clk32,
        }
    }
}

/// Clock inputs shared by both timers for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickClocks {
    pub sysclks_per_clk32: f64,
    pub pll_on: bool,
}

/// One general purpose timer
#[derive(Debug, Clone)]
pub struct Timer {
    block: &'static TimerBlock,
    /// Fractional counts not yet applied to TCN
    carry: f64,
}

impl Timer {
    pub fn new(block: &'static TimerBlock) -> Self {
        Self { block, carry: 0.0 }
    }

    pub fn reset(&mut self) {
        self.carry = 0.0;
    }

    pub fn block(&self) -> &'static TimerBlock {
        self.block
    }

    /// Counts added per CLK32 period for the current configuration
    fn increment(&self, regs: &RegisterFile, clocks: TickClocks) -> f64 {
        let control = regs.read16(self.block.control);
        let prescaler = f64::from((regs.read16(self.block.prescaler) & 0x00FF) + 1);
        match ClockSource::from_control(control) {
            ClockSource::Stopped | ClockSource::ExternalPin => 0.0,
            ClockSource::SystemClock if clocks.pll_on => clocks.sysclks_per_clk32 / prescaler,
            ClockSource::SystemClockDiv16 if clocks.pll_on => {
                clocks.sysclks_per_clk32 / 16.0 / prescaler
            }
            ClockSource::SystemClock | ClockSource::SystemClockDiv16 => 0.0,
            ClockSource::Clk32 => 1.0 / prescaler,
        }
    }

    /// Advance by one CLK32 period. Returns true if the timer's interrupt
    /// source should be raised.
    pub fn tick(&mut self, regs: &mut RegisterFile, clocks: TickClocks) -> bool {
        let control = regs.read16(self.block.control);
        if control & ctl::ENABLE == 0 {
            return false;
        }

        self.carry += self.increment(regs, clocks);
        if self.carry < 1.0 {
            return false;
        }

        let whole = self.carry.trunc();
        self.carry -= whole;

        let compare = regs.read16(self.block.compare);
        let old = regs.read16(self.block.counter);
        let mut count = old.wrapping_add(whole as u16);
        let mut raise = false;

        if old < compare && count >= compare {
            regs.set16(self.block.status, TSTAT_COMPARE);
            raise = control & ctl::IRQ_ENABLE != 0;
            if control & ctl::FREE_RUNNING == 0 {
                count -= compare;
            }
        }

        regs.write16(self.block.counter, count);
        raise
    }

    /// TSTAT write: flags are cleared by writing 0 over them. Returns true when
    /// the compare flag was cleared.
    pub fn write_status(&self, regs: &mut RegisterFile, value: u16) -> bool {
        let old = regs.read16(self.block.status);
        let new = old & value & (TSTAT_COMPARE | TSTAT_CAPTURE);
        regs.write16(self.block.status, new);
        old & TSTAT_COMPARE != 0 && new & TSTAT_COMPARE == 0
    }
}
