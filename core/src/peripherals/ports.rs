//! GPIO ports
//!
//! Most ports are plain storage. The ones wired to something on the board:
//!
//! | Port | Pins | Function                                              |
//! |------|------|-------------------------------------------------------|
//! | B    | 6    | Alarm LED                                             |
//! | D    | 0-3  | Button matrix columns, INT0-INT3                      |
//! | D    | 4-7  | IRQ1/IRQ2/IRQ3/IRQ6 when not selected as GPIO         |
//! | D    | 5    | SD card detect (high = no card)                       |
//! | D    | 7    | Battery OK                                            |
//! | G    | 1    | Backlight                                             |
//! | K    | 1    | LCD power                                             |
//! | K    | 2    | Dock sense (low = docked)                             |
//! | K    | 4    | Vibrator                                              |
//! | K    | 5-7  | Button matrix row drive (active low)                  |
//!
//! Reads of PDDATA and PKDATA are synthesized from the host's input state.

use super::interrupt::sources;
use super::regs;
use crate::host::InputState;
use crate::register_file::RegisterFile;

/// Port D pin functions
mod port_d {
    pub const SD_CARD_ABSENT: u8 = 0x20;
    pub const BATTERY_OK: u8 = 0x80;
    /// INT0-INT3 share the low nibble
    pub const INT_PINS: u8 = 0x0F;
}

/// IRQ pins on port D: pin, ICR polarity bit, ICR edge bit, interrupt source
const IRQ_PINS: [(u8, u16, u16, u32); 4] = [
    (0x10, 0x8000, 0x0800, sources::IRQ1),
    (0x20, 0x4000, 0x0400, sources::IRQ2),
    (0x40, 0x2000, 0x0200, sources::IRQ3),
    (0x80, 0x1000, 0x0100, sources::IRQ6),
];

/// Board outputs derived from port pins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiscStatus {
    pub alarm_led: bool,
    pub lcd_on: bool,
    pub backlight_on: bool,
    pub vibrator_on: bool,
}

impl MiscStatus {
    /// Re-derive every flag from the port registers
    pub fn derive(regs: &RegisterFile) -> Self {
        let port_b = driven_outputs(regs, regs::PBDIR, regs::PBDATA, regs::PBSEL);
        let port_g = driven_outputs(regs, regs::PGDIR, regs::PGDATA, regs::PGSEL);
        let port_k = driven_outputs(regs, regs::PKDIR, regs::PKDATA, regs::PKSEL);
        Self {
            alarm_led: port_b & 0x40 != 0,
            lcd_on: port_k & 0x02 != 0,
            backlight_on: port_g & 0x02 != 0,
            vibrator_on: port_k & 0x10 != 0,
        }
    }
}

/// Pins that are GPIO, configured as outputs and driven high
fn driven_outputs(regs: &RegisterFile, dir: u32, data: u32, sel: u32) -> u8 {
    regs.read8(data) & regs.read8(sel) & regs.read8(dir)
}

/// Active-low column bits for one button-matrix row
fn row_columns(buttons: [bool; 4]) -> u8 {
    buttons
        .iter()
        .enumerate()
        .filter(|&(_, &pressed)| !pressed)
        .fold(0, |acc, (bit, _)| acc | (1 << bit))
}

/// PDDATA as the CPU sees it
pub fn port_d_value(regs: &RegisterFile, inputs: &InputState) -> u8 {
    let rows = regs.read8(regs::PKDIR) & regs.read8(regs::PKDATA);
    let mut value = port_d::BATTERY_OK;
    if !inputs.sd_card_inserted {
        value |= port_d::SD_CARD_ABSENT;
    }

    // A row is scanned while its port K pin is driven low; unpressed
    // buttons read back high
    if rows & 0x20 == 0 {
        value |= row_columns([
            inputs.button_calendar,
            inputs.button_address,
            inputs.button_todo,
            inputs.button_notes,
        ]);
    }
    if rows & 0x40 == 0 {
        value |= row_columns([inputs.button_up, inputs.button_down, true, true]);
    }
    if rows & 0x80 == 0 {
        // Column 3 of this row is wired to the address button as well
        value |= row_columns([
            inputs.button_power,
            inputs.button_contrast,
            true,
            inputs.button_address,
        ]);
    }

    let dir = regs.read8(regs::PDDIR);
    value ^= regs.read8(regs::PDPOL);
    value &= !dir;
    value | (regs.read8(regs::PDDATA) & dir)
}

/// PKDATA as the CPU sees it
pub fn port_k_value(regs: &RegisterFile, inputs: &InputState) -> u8 {
    let dir = regs.read8(regs::PKDIR);
    let sel = regs.read8(regs::PKSEL);
    let dock_sense = if inputs.in_dock { 0x00 } else { 0x04 };
    (dock_sense & !dir & sel) | (regs.read8(regs::PKDATA) & dir & sel)
}

/// Interrupt source changes requested by a port D scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinInterrupts {
    pub raise: u32,
    pub clear: u32,
}

/// Edge detector for the port D interrupt pins
#[derive(Debug, Clone, Default)]
pub struct PortDInterrupts {
    /// Pins asserted at the previous scan, in port D bit positions
    asserted: u8,
}

impl PortDInterrupts {
    pub fn new() -> Self {
        Self { asserted: 0 }
    }

    pub fn reset(&mut self) {
        self.asserted = 0;
    }

    /// Compare pin state against the interrupt configuration.
    ///
    /// Level-sensitive pins follow the pin; edge-sensitive pins raise once
    /// per assertion and stay pending until software clears them through ISR.
    /// The keyboard interrupt is always level-sensitive and active low.
    pub fn scan(&mut self, regs: &RegisterFile, inputs: &InputState) -> PinInterrupts {
        let value = port_d_value(regs, inputs);
        let inputs_only = !regs.read8(regs::PDDIR);
        let irq_pins = !regs.read8(regs::PDSEL);
        let icr = regs.read16(regs::ICR);
        let int_edge = regs.read8(regs::PDIRQEG);

        let mut asserted = regs.read8(regs::PDIRQEN) & value & inputs_only & port_d::INT_PINS;
        let mut edge = int_edge & port_d::INT_PINS;
        for &(pin, polarity, edge_bit, _) in IRQ_PINS.iter() {
            let level = value & pin != 0;
            if irq_pins & inputs_only & pin != 0 && level == (icr & polarity != 0) {
                asserted |= pin;
            }
            if icr & edge_bit != 0 {
                edge |= pin;
            }
        }

        let rising = asserted & !self.asserted;
        self.asserted = asserted;

        let mut result = PinInterrupts::default();
        for bit in 0..8 {
            let pin = 1u8 << bit;
            let source = pin_source(pin);
            if edge & pin != 0 {
                if rising & pin != 0 {
                    result.raise |= source;
                }
            } else if asserted & pin != 0 {
                result.raise |= source;
            } else {
                result.clear |= source;
            }
        }

        if regs.read8(regs::PDKBEN) & !value & inputs_only != 0 {
            result.raise |= sources::KB;
        } else {
            result.clear |= sources::KB;
        }
        result
    }
}

/// Interrupt source wired to a port D pin
fn pin_source(pin: u8) -> u32 {
    match pin {
        0x01 => sources::INT0,
        0x02 => sources::INT1,
        0x04 => sources::INT2,
        0x08 => sources::INT3,
        _ => IRQ_PINS
            .iter()
            .find(|&&(irq_pin, ..)| irq_pin == pin)
            .map_or(0, |&(.., source)| source),
    }
}
