//! Board configuration
//!
//! These values are fixed for the lifetime of a [`Peripherals`](crate::Peripherals)
//! instance and only influence power-on state and clock derivation.

/// Frequency of the 32.768kHz watch crystal driving CLK32
pub const DEFAULT_CRYSTAL_FREQUENCY: u32 = 32768;

/// Board-level configuration for the peripheral core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// CLK32 ticks per emulated second. Also the rate `tick()` is expected at.
    pub crystal_frequency: u32,
    /// Board has 128MB of RAM behind CSD instead of the stock 16MB
    pub ram_huge: bool,
}

impl Config {
    /// Stock Palm m515 configuration
    pub fn new() -> Self {
        Self {
            crystal_frequency: DEFAULT_CRYSTAL_FREQUENCY,
            ram_huge: cfg!(feature = "ram_huge"),
        }
    }

    /// Builder-style override for the RAM size
    pub fn with_ram_huge(mut self, ram_huge: bool) -> Self {
        self.ram_huge = ram_huge;
        self
    }

    /// Crystal frequency, never below the slowest periodic interrupt rate
    pub(crate) fn ticks_per_second(&self) -> u32 {
        self.crystal_frequency.max(512)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
