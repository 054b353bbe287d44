//! MC68VZ328 (DragonBall VZ) Peripheral Core
//!
//! Emulates the on-chip peripheral block of the Motorola DragonBall VZ as
//! wired in a Palm handheld. The CPU core, the memory mapper and the input
//! devices live outside this crate and are reached through [`Host`].
//!
//! # Architecture
//!
//! - `register_file`: 4KB big-endian backing store for the register window
//! - `peripherals`: register dispatch plus the clocked controllers
//!   (interrupts, PLL, timers, RTC, watchdog, GPIO, chip selects)
//! - `host`: the interface to the CPU and board
//! - `config`: crystal frequency and RAM size
//!
//! # Register window (32-bit address space)
//!
//! | Address Range           | Region                      |
//! |-------------------------|-----------------------------|
//! | 0xXXXXE000 - 0xXXXXEFFF | Emulator pseudo-registers   |
//! | 0xXXXXF000 - 0xXXXXFFFF | Hardware registers          |
//!
//! Only address bits 15-12 select the block; the mapper decides which
//! addresses reach the peripherals at all.
//!
//! # Timing
//!
//! [`Peripherals::tick`] is called once per CLK32 period (32.768kHz). Timers
//! convert that into system clocks using the current PLL configuration.

pub mod config;
pub mod host;
pub mod peripherals;
pub mod register_file;


pub use config::Config;
pub use host::{Host, InputState};
pub use peripherals::{Chip, ChipId, ChipSelects, Fault, MiscStatus, Peripherals};
pub use register_file::RegisterFile;
