//! Interface to the rest of the emulator
//!
//! The peripheral core never owns the CPU, the address-space mapper or the
//! input devices. Everything it needs from them, and every notification it
//! sends them, goes through [`Host`].

use crate::peripherals::chip_select::ChipSelects;

/// Button, card and cradle state sampled by the GPIO ports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub button_calendar: bool,
    pub button_address: bool,
    pub button_todo: bool,
    pub button_notes: bool,
    pub button_up: bool,
    pub button_down: bool,
    pub button_power: bool,
    pub button_contrast: bool,
    /// An SD card is present in the slot
    pub sd_card_inserted: bool,
    /// Device is seated in its cradle
    pub in_dock: bool,
}

/// Collaborators the peripheral core calls out to
pub trait Host {
    /// Current CPU program counter, used only in log messages
    fn pc(&self) -> u32;

    /// Drive the CPU interrupt priority input (0 = no interrupt)
    fn set_irq_level(&mut self, level: u8);

    /// Let the CPU run at most `cycles` more cycles in its current timeslice
    fn limit_remaining_cycles(&mut self, cycles: u32);

    /// Current button/card/dock state
    fn inputs(&self) -> InputState;

    /// Chip-select geometry changed; the address decoder must be rebuilt
    fn chip_selects_changed(&mut self, chips: &ChipSelects);

    /// SCR DMAP toggled between the 0xFFFFF000 and 0xFFFFFF00 register windows
    fn register_window_changed(&mut self, relocated: bool);

    /// Watchdog expired in reset mode; everything outside the peripherals
    /// must go back to power-on state
    fn system_reset(&mut self);

    /// PFSEL bit 2 connected or disconnected the display controller clock
    fn display_clock_changed(&mut self, _connected: bool) {}

    /// A bus fault occurred with SCR BETEN set
    fn bus_error(&mut self) {}
}
