//! Real-time clock
//!
//! Registers:
//!   0xB00: RTCTIME  - hours << 24 | minutes << 16 | seconds (32-bit)
//!   0xB04: RTCALRM  - alarm time, same layout
//!   0xB0C: RTCCTL   - bit 7 enables the clock
//!   0xB0E: RTCISR   - event status, write-one-to-clear
//!   0xB10: RTCIENR  - event enables, same layout as RTCISR
//!   0xB1A: DAYR     - day counter (9 bits)
//!   0xB1C: DAYALRM  - alarm day
//!
//! RTCISR events:
//!   bit 0: stopwatch   bit 1: minute   bit 2: alarm
//!   bit 3: day         bit 4: second   bit 5: hour
//!   bits 8-15: periodic interrupts at 4, 8, 16, 32, 64, 128, 256, 512 Hz
//!
//! The low six bits feed the RTC interrupt source; the periodic ladder feeds
//! RTI. Both derive from the CLK32 tick counter kept here.

use super::regs;
use crate::register_file::RegisterFile;

/// RTCISR / RTCIENR event bits
pub mod events {
    pub const MINUTE: u16 = 0x0002;
    pub const ALARM: u16 = 0x0004;
    pub const DAY: u16 = 0x0008;
    pub const SECOND: u16 = 0x0010;
    pub const HOUR: u16 = 0x0020;

    /// Events routed to the RTC interrupt source
    pub const RTC_MASK: u16 = 0x003F;
    /// Periodic events routed to the RTI interrupt source
    pub const RTI_MASK: u16 = 0xFF00;
}

/// RTCCTL enable bit
const RTCCTL_ENABLE: u16 = 0x0080;
/// Writable RTCCTL bits
pub const RTCCTL_MASK: u16 = 0x00A0;
/// Writable RTCIENR bits
pub const RTCIENR_MASK: u16 = 0xFF3F;
/// Valid RTCTIME / RTCALRM bits
pub const TIME_MASK: u32 = 0x1F3F_003F;
/// Valid DAYR / DAYALRM bits
pub const DAY_MASK: u16 = 0x01FF;

/// Periodic interrupt ladder, fastest first
const PERIODIC: [(u16, u32); 8] = [
    (0x8000, 512),
    (0x4000, 256),
    (0x2000, 128),
    (0x1000, 64),
    (0x0800, 32),
    (0x0400, 16),
    (0x0200, 8),
    (0x0100, 4),
];

/// Packed time of day as stored in RTCTIME
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeOfDay {
    pub fn unpack(value: u32) -> Self {
        Self {
            hours: (value >> 24) & 0x1F,
            minutes: (value >> 16) & 0x3F,
            seconds: value & 0x3F,
        }
    }

    pub fn pack(&self) -> u32 {
        (self.seconds & 0x3F) | ((self.minutes << 16) & 0x3F_0000) | ((self.hours << 24) & 0x1F00_0000)
    }
}

/// CLK32 tick counter driving the once-per-second and periodic events
#[derive(Debug, Clone, Default)]
pub struct RealTimeClock {
    clk32_counter: u32,
}

impl RealTimeClock {
    pub fn new() -> Self {
        Self { clk32_counter: 0 }
    }

    pub fn reset(&mut self) {
        self.clk32_counter = 0;
    }

    /// Ticks since the last second boundary
    pub fn clk32_counter(&self) -> u32 {
        self.clk32_counter
    }

    /// Count one CLK32 tick. Returns true on the tick a second completes.
    pub fn advance(&mut self, ticks_per_second: u32) -> bool {
        if self.clk32_counter >= ticks_per_second - 1 {
            self.clk32_counter = 0;
            true
        } else {
            self.clk32_counter += 1;
            false
        }
    }

    /// Latch the periodic events due on this tick. Returns true if any
    /// enabled event fired and RTI must be raised.
    pub fn latch_periodic(&self, regs: &mut RegisterFile, ticks_per_second: u32) -> bool {
        let due = PERIODIC
            .iter()
            .filter(|&&(_, hz)| self.clk32_counter % (ticks_per_second / hz) == 0)
            .fold(0u16, |acc, &(bit, _)| acc | bit);
        latch(regs, due)
    }
}

/// Advance the time of day by one second. Returns true if any enabled event
/// fired and the RTC source must be raised.
pub fn add_second(regs: &mut RegisterFile) -> bool {
    if regs.read16(regs::RTCCTL) & RTCCTL_ENABLE == 0 {
        return false;
    }

    let mut time = TimeOfDay::unpack(regs.read32(regs::RTCTIME));
    let mut day = regs.read16(regs::DAYR);
    let mut fired = events::SECOND;

    time.seconds += 1;
    if time.seconds >= 60 {
        time.seconds = 0;
        time.minutes += 1;
        fired |= events::MINUTE;
        if time.minutes >= 60 {
            time.minutes = 0;
            time.hours += 1;
            fired |= events::HOUR;
            if time.hours >= 24 {
                time.hours = 0;
                day = (day + 1) & DAY_MASK;
                fired |= events::DAY;
                regs.write16(regs::DAYR, day);
            }
        }
    }

    let packed = time.pack();
    regs.write32(regs::RTCTIME, packed);

    if packed == regs.read32(regs::RTCALRM) && day == regs.read16(regs::DAYALRM) {
        fired |= events::ALARM;
    }

    latch(regs, fired)
}

/// Merge enabled events into RTCISR
fn latch(regs: &mut RegisterFile, fired: u16) -> bool {
    let enabled = fired & regs.read16(regs::RTCIENR);
    if enabled == 0 {
        return false;
    }
    regs.set16(regs::RTCISR, enabled);
    true
}

/// Which interrupt sources lost their last pending event after an RTCISR clear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    pub rtc: bool,
    pub rti: bool,
}

/// RTCISR write-one-to-clear
pub fn write_status(regs: &mut RegisterFile, value: u16) -> Drained {
    regs.clear16(regs::RTCISR, value);
    let remaining = regs.read16(regs::RTCISR);
    Drained {
        rtc: remaining & events::RTC_MASK == 0,
        rti: remaining & events::RTI_MASK == 0,
    }
}

/// Load the clock from host time
pub fn set_time(regs: &mut RegisterFile, days: u16, hours: u8, minutes: u8, seconds: u8) {
    let time = TimeOfDay {
        hours: u32::from(hours),
        minutes: u32::from(minutes),
        seconds: u32::from(seconds),
    };
    regs.write32(regs::RTCTIME, time.pack());
    regs.write16(regs::DAYR, days & DAY_MASK);
}
