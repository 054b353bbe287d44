//! MC68VZ328 Interrupt Controller
//!
//! Registers (offsets in the register window):
//!   0x300: IVR  - vector base (upper 5 bits)
//!   0x302: ICR  - IRQ1/2/3/6 polarity and edge select
//!   0x304: IMR  - 32-bit mask, 1 = masked
//!   0x30C: ISR  - 32-bit active status (IPR & !IMR)
//!   0x310: IPR  - 32-bit raw pending
//!   0x314: ILCR - programmable levels for SPI1, UART2, PWM2 and TMR2
//!
//! The CPU sees a single priority level: the highest level among the active
//! sources. Levels are hardwired except for the four sources routed through
//! ILCR.

use super::regs;
use crate::register_file::RegisterFile;

/// Interrupt source bit masks (shared by IPR, ISR and IMR)
pub mod sources {
    pub const SPI2: u32 = 1 << 0;
    pub const TMR1: u32 = 1 << 1;
    pub const UART1: u32 = 1 << 2;
    pub const WDT: u32 = 1 << 3;
    pub const RTC: u32 = 1 << 4;
    pub const TMR2: u32 = 1 << 5;
    pub const KB: u32 = 1 << 6;
    pub const PWM1: u32 = 1 << 7;
    pub const INT0: u32 = 1 << 8;
    pub const INT1: u32 = 1 << 9;
    pub const INT2: u32 = 1 << 10;
    pub const INT3: u32 = 1 << 11;
    pub const UART2: u32 = 1 << 12;
    pub const PWM2: u32 = 1 << 13;
    pub const IRQ1: u32 = 1 << 16;
    pub const IRQ2: u32 = 1 << 17;
    pub const IRQ3: u32 = 1 << 18;
    pub const IRQ6: u32 = 1 << 19;
    pub const IRQ5: u32 = 1 << 20;
    pub const SPI1: u32 = 1 << 21;
    pub const RTI: u32 = 1 << 22;
    pub const EMIQ: u32 = 1 << 23;

    /// Sources driven by pins; the only ones software can clear through ISR
    pub const EXTERNAL: u32 = INT0 | INT1 | INT2 | INT3 | IRQ1 | IRQ2 | IRQ3 | IRQ6;
}

/// Bits of IMR that exist in hardware
pub const IMR_MASK: u32 = 0x00FF_3FFF;

/// Vector returned when IVR was never programmed
pub const UNINITIALIZED_VECTOR: u8 = 15;

#[derive(Debug, Clone, Copy)]
enum Level {
    Fixed(u8),
    /// 3-bit field in ILCR at this shift
    Programmable(u32),
}

#[derive(Debug, Clone, Copy)]
enum Wake {
    Always,
    /// Port D INTx pins only wake the PLL while level-sensitive
    UnlessEdge(u8),
}

const PRIORITIES: [(u32, Level, Wake); 22] = [
    (sources::EMIQ, Level::Fixed(7), Wake::Always),
    (sources::SPI1, Level::Programmable(12), Wake::Always),
    (sources::IRQ5, Level::Fixed(5), Wake::Always),
    (sources::IRQ3, Level::Fixed(3), Wake::Always),
    (sources::IRQ2, Level::Fixed(2), Wake::Always),
    (sources::IRQ1, Level::Fixed(1), Wake::Always),
    (sources::PWM2, Level::Programmable(4), Wake::Always),
    (sources::UART2, Level::Programmable(8), Wake::Always),
    (sources::INT3, Level::Fixed(4), Wake::UnlessEdge(0x08)),
    (sources::INT2, Level::Fixed(4), Wake::UnlessEdge(0x04)),
    (sources::INT1, Level::Fixed(4), Wake::UnlessEdge(0x02)),
    (sources::INT0, Level::Fixed(4), Wake::UnlessEdge(0x01)),
    (sources::PWM1, Level::Fixed(6), Wake::Always),
    (sources::KB, Level::Fixed(4), Wake::Always),
    (sources::TMR2, Level::Programmable(0), Wake::Always),
    (sources::RTC, Level::Fixed(4), Wake::Always),
    (sources::WDT, Level::Fixed(4), Wake::Always),
    (sources::UART1, Level::Fixed(4), Wake::Always),
    (sources::TMR1, Level::Fixed(6), Wake::Always),
    (sources::SPI2, Level::Fixed(4), Wake::Always),
    (sources::RTI, Level::Fixed(4), Wake::Always),
    (sources::IRQ6, Level::Fixed(6), Wake::Always),
];

/// Result of scanning the active sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// CPU interrupt priority level, 0-7
    pub level: u8,
    /// At least one active source is allowed to restart a stopped PLL
    pub wakes_pll: bool,
}

/// Mark sources pending and, where unmasked, active
pub fn raise(regs: &mut RegisterFile, source: u32) {
    let ipr = regs.read32(regs::IPR) | source;
    regs.write32(regs::IPR, ipr);
    refresh_active(regs);
}

/// Drop sources from both pending and active
pub fn clear(regs: &mut RegisterFile, source: u32) {
    let ipr = regs.read32(regs::IPR) & !source;
    let isr = regs.read32(regs::ISR) & !source;
    regs.write32(regs::IPR, ipr);
    regs.write32(regs::ISR, isr);
}

/// Software acknowledge through ISR; only pin-driven sources are clearable
pub fn clear_external(regs: &mut RegisterFile, bits: u32) {
    clear(regs, bits & sources::EXTERNAL);
}

/// Rebuild ISR from IPR and IMR
pub fn refresh_active(regs: &mut RegisterFile) {
    let active = regs.read32(regs::IPR) & !regs.read32(regs::IMR);
    regs.write32(regs::ISR, active);
}

/// Priority-encode the active sources
pub fn evaluate(regs: &RegisterFile) -> Evaluation {
    let active = regs.read32(regs::ISR);
    let ilcr = regs.read16(regs::ILCR);
    let edge_select = regs.read8(regs::PDIRQEG);

    let mut result = Evaluation::default();
    for &(source, level, wake) in PRIORITIES.iter() {
        if active & source == 0 {
            continue;
        }
        let level = match level {
            Level::Fixed(level) => level,
            Level::Programmable(shift) => ((ilcr >> shift) & 0x7) as u8,
        };
        result.level = result.level.max(level);
        result.wakes_pll |= match wake {
            Wake::Always => true,
            Wake::UnlessEdge(pin) => edge_select & pin == 0,
        };
    }
    result
}

/// Vector number supplied during the CPU interrupt-acknowledge cycle
pub fn vector(regs: &RegisterFile, level: u8) -> u8 {
    match regs.read8(regs::IVR) {
        0 => UNINITIALIZED_VECTOR,
        base => base | (level & 0x07),
    }
}
