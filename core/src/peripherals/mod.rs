//! MC68VZ328 Peripheral Emulation
//!
//! The register window at 0xFFFFF000 holds every on-chip peripheral:
//! - System control and chip ID (0x000)
//! - Chip selects (0x100)
//! - PLL (0x200)
//! - Interrupt controller (0x300)
//! - GPIO ports (0x400)
//! - Timers (0x600)
//! - RTC and watchdog (0xB00)
//!
//! Registers without behavior (UART, LCD controller, DRAM controller setup)
//! are plain storage so the OS can read back what it configured.
//!
//! Accesses whose address bits 15-12 are 0xE target the emulator's own
//! pseudo-register block and are accepted silently.

pub mod chip_select;
pub mod control;
pub mod interrupt;
pub mod pll;
pub mod ports;
pub mod regs;
pub mod rtc;
pub mod timer;
pub mod watchdog;

pub use chip_select::{Chip, ChipId, ChipSelects};
pub use control::Fault;
pub use ports::MiscStatus;

use crate::config::Config;
use crate::host::Host;
use crate::register_file::RegisterFile;
use interrupt::sources;
use pll::Pll;
use ports::PortDInterrupts;
use rtc::RealTimeClock;
use timer::{TickClocks, Timer, TIMER1, TIMER2};
use watchdog::WatchdogEvent;

/// Address bits selecting the register window
const BLOCK_SELECT: u32 = 0xF000;
/// Hardware register block
const HARDWARE_BLOCK: u32 = 0xF000;
/// Emulator pseudo-register block
const EMULATOR_BLOCK: u32 = 0xE000;

/// Power-on values, applied over a zeroed register file
const POWER_ON_8: [(u32, u8); 35] = [
    (regs::SCR, 0x1C),
    (regs::PCTLR, 0x1F),
    (regs::PADATA, 0xFF),
    (regs::PAPUEN, 0xFF),
    (regs::PBDATA, 0xFF),
    (regs::PBPUEN, 0xFF),
    (regs::PBSEL, 0xFF),
    (regs::PCPDEN, 0xFF),
    (regs::PCSEL, 0xFF),
    (regs::PDDATA, 0xFF),
    (regs::PDPUEN, 0xFF),
    (regs::PDSEL, 0xF0),
    (regs::PEDATA, 0xFF),
    (regs::PEPUEN, 0xFF),
    (regs::PESEL, 0xFF),
    (regs::PFDATA, 0xFF),
    (regs::PFPUEN, 0xFF),
    (regs::PFSEL, 0x87),
    (regs::PGDATA, 0x3F),
    (regs::PGPUEN, 0x3D),
    (regs::PGSEL, 0x08),
    (regs::PJDATA, 0xFF),
    (regs::PJPUEN, 0xFF),
    (regs::PJSEL, 0xEF),
    (regs::PKDATA, 0x0F),
    (regs::PKPUEN, 0xFF),
    (regs::PKSEL, 0xFF),
    (regs::PMDATA, 0x20),
    (regs::PMPUEN, 0x3F),
    (regs::PMSEL, 0x3F),
    (regs::PWMP1, 0xFE),
    (regs::LVPW, 0xFF),
    (regs::LBLKC, 0x7F),
    (regs::LGPMR, 0x84),
    (regs::DMACR, 0x62),
];

const POWER_ON_16: [(u32, u16); 23] = [
    (regs::IODCR, 0x1FFF),
    (regs::CSA, 0x00B0),
    (regs::CSD, 0x0200),
    (regs::EMUCS, 0x0060),
    (regs::CSCTRL2, 0x1000),
    (regs::CSCTRL3, 0x9C00),
    (regs::PLLCR, 0x24B3),
    (regs::PLLFSR, 0x0347),
    (regs::ILCR, 0x6533),
    (regs::PWMC1, 0x0020),
    (regs::TCMP1, 0xFFFF),
    (regs::TCMP2, 0xFFFF),
    (regs::UBAUD1, 0x0002),
    (regs::UBAUD2, 0x0002),
    (regs::HMARK, 0x0102),
    (regs::LXMAX, 0x03F0),
    (regs::LYMAX, 0x01FF),
    (regs::LCWCH, 0x0101),
    (regs::LRRA, 0x00FF),
    (regs::WATCHDOG, 0x0001),
    (regs::RTCCTL, 0x0080),
    (regs::STPWCH, 0x003F),
    (regs::SDCTRL, 0x003C),
];

const POWER_ON_32: [(u32, u32); 2] = [(regs::IDR, 0x5600_0000), (regs::IMR, 0x00FF_FFFF)];

/// Where an incoming address lands
enum Target {
    Register(u32),
    Emulator,
    Invalid,
}

fn target(address: u32) -> Target {
    match address & BLOCK_SELECT {
        HARDWARE_BLOCK => Target::Register(address & 0xFFF),
        EMULATOR_BLOCK => Target::Emulator,
        _ => Target::Invalid,
    }
}

/// Peripheral subsystem containing all on-chip controllers
#[derive(Debug, Clone)]
pub struct Peripherals {
    config: Config,
    /// Backing store for every register in the window
    regs: RegisterFile,
    /// Chip-select geometry derived from CSx/CSGBx/CSUGBA/CSCTRL1
    chips: ChipSelects,
    pll: Pll,
    timers: [Timer; 2],
    /// CLK32 counter for the RTC second and periodic interrupts
    rtc: RealTimeClock,
    /// Previous port D pin state for edge-triggered interrupts
    port_d_irq: PortDInterrupts,
    /// Board outputs driven from port pins
    misc: MiscStatus,
    /// CPU executed STOP and is waiting for an interrupt
    low_power_stop: bool,
}

impl Peripherals {
    /// Create the peripherals in power-on state
    pub fn new(config: Config) -> Self {
        let mut peripherals = Self {
            config,
            regs: RegisterFile::new(),
            chips: ChipSelects::new(),
            pll: Pll::new(),
            timers: [Timer::new(&TIMER1), Timer::new(&TIMER2)],
            rtc: RealTimeClock::new(),
            port_d_irq: PortDInterrupts::new(),
            misc: MiscStatus::default(),
            low_power_stop: false,
        };
        peripherals.load_power_on_state();
        peripherals
    }

    fn load_power_on_state(&mut self) {
        self.regs.clear();
        for &(offset, value) in POWER_ON_8.iter() {
            self.regs.write8(offset, value);
        }
        for &(offset, value) in POWER_ON_16.iter() {
            self.regs.write16(offset, value);
        }
        for &(offset, value) in POWER_ON_32.iter() {
            self.regs.write32(offset, value);
        }

        self.rtc.reset();
        self.pll.reset(&self.regs);
        for timer in self.timers.iter_mut() {
            timer.reset();
        }
        self.port_d_irq.reset();
        self.low_power_stop = false;

        // Bank attributes only follow chip-select writes, not the power-on values
        self.chips.reset(self.config.ram_huge);
        self.misc = MiscStatus::derive(&self.regs);
    }

    /// Reset all peripherals to power-on state
    pub fn reset<H: Host>(&mut self, host: &mut H) {
        self.load_power_on_state();
        host.chip_selects_changed(&self.chips);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw register window, for debuggers
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    pub fn chip_selects(&self) -> &ChipSelects {
        &self.chips
    }

    pub fn misc_status(&self) -> MiscStatus {
        self.misc
    }

    /// CPU clock is running: PLL enabled and no STOP in progress
    pub fn is_system_clock_running(&self) -> bool {
        Pll::is_on(&self.regs) && !self.low_power_stop
    }

    /// SCR DMAP is set
    pub fn is_register_window_relocated(&self) -> bool {
        control::is_relocated(&self.regs)
    }

    /// PFSEL bit 2 clear: the display controller receives its clock
    pub fn display_clock_connected(&self) -> bool {
        self.regs.read8(regs::PFSEL) & 0x04 == 0
    }

    /// Current PLL output frequency in Hz
    pub fn system_clock_hz(&self) -> f64 {
        self.pll.crystal_cycles() * f64::from(self.config.crystal_frequency)
    }

    /// CPU executed STOP
    pub fn enter_low_power_stop(&mut self) {
        self.low_power_stop = true;
    }

    /// Load the RTC from host time
    pub fn set_real_time_clock(&mut self, days: u16, hours: u8, minutes: u8, seconds: u8) {
        rtc::set_time(&mut self.regs, days, hours, minutes, seconds);
    }

    /// Re-sample buttons, SD card and dock after the host changed them
    pub fn refresh_inputs<H: Host>(&mut self, host: &mut H) {
        self.scan_port_d(host);
    }

    /// CPU interrupt-acknowledge cycle; returns the vector number
    pub fn acknowledge_interrupt(&mut self, level: u8) -> u8 {
        self.low_power_stop = false;
        interrupt::vector(&self.regs, level)
    }

    pub fn set_bus_error_timeout<H: Host>(&mut self, host: &mut H) {
        self.record_fault(host, Fault::BusErrorTimeout);
    }

    pub fn set_write_protect_violation<H: Host>(&mut self, host: &mut H) {
        self.record_fault(host, Fault::WriteProtect);
    }

    pub fn set_privilege_violation<H: Host>(&mut self, host: &mut H) {
        self.record_fault(host, Fault::Privilege);
    }

    fn record_fault<H: Host>(&mut self, host: &mut H, fault: Fault) {
        log::warn!("{:?} fault, PC 0x{:08X}", fault, host.pc());
        if control::record_fault(&mut self.regs, fault) {
            host.bus_error();
        }
    }

    /// Advance every clocked peripheral by one CLK32 period
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        Pll::toggle_clk32(&mut self.regs);

        let ticks_per_second = self.config.ticks_per_second();
        if self.rtc.advance(ticks_per_second) {
            if rtc::add_second(&mut self.regs) {
                interrupt::raise(&mut self.regs, sources::RTC);
            }
            match watchdog::tick_second(&mut self.regs) {
                WatchdogEvent::Idle => {}
                WatchdogEvent::Interrupt => interrupt::raise(&mut self.regs, sources::WDT),
                WatchdogEvent::Reset => {
                    log::info!("Watchdog expired, resetting system (PC 0x{:08X})", host.pc());
                    self.reset(host);
                    host.system_reset();
                    return;
                }
            }
        }

        self.pll.tick_wake(&mut self.regs);

        if self.rtc.latch_periodic(&mut self.regs, ticks_per_second) {
            interrupt::raise(&mut self.regs, sources::RTI);
        }

        let clocks = TickClocks {
            sysclks_per_clk32: self.pll.sysclks_per_clk32(&self.regs),
            pll_on: Pll::is_on(&self.regs),
        };
        for timer in self.timers.iter_mut() {
            if timer.tick(&mut self.regs, clocks) {
                interrupt::raise(&mut self.regs, timer.block().source);
            }
        }

        self.check_interrupts(host);
    }

    /// Priority-encode the active sources and drive the CPU IPL
    fn check_interrupts<H: Host>(&mut self, host: &mut H) {
        let eval = interrupt::evaluate(&self.regs);
        if eval.wakes_pll {
            self.pll.request_wake(&self.regs);
        }
        host.set_irq_level(eval.level);
    }

    fn scan_port_d<H: Host>(&mut self, host: &mut H) {
        let inputs = host.inputs();
        let changes = self.port_d_irq.scan(&self.regs, &inputs);
        interrupt::clear(&mut self.regs, changes.clear);
        interrupt::raise(&mut self.regs, changes.raise);
        self.check_interrupts(host);
    }

    fn log_unknown<H: Host>(host: &H, width: u32, offset: u32, value: Option<u32>) {
        match value {
            Some(value) => log::debug!(
                "Unknown {}-bit register write 0x{:03X} = 0x{:X}, PC 0x{:08X}",
                width,
                offset,
                value,
                host.pc()
            ),
            None => log::debug!(
                "Unknown {}-bit register read 0x{:03X}, PC 0x{:08X}",
                width,
                offset,
                host.pc()
            ),
        }
    }

    /// Read a byte from the register window
    pub fn read8<H: Host>(&self, host: &H, address: u32) -> u8 {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return 0,
        };
        log::trace!("read8 0x{:03X}", offset);

        match offset {
            regs::PDDATA => ports::port_d_value(&self.regs, &host.inputs()),
            regs::PKDATA => ports::port_k_value(&self.regs, &host.inputs()),

            regs::SCR | regs::IVR | regs::PCTLR | regs::LCKCON => self.regs.read8(offset),

            // Direction
            regs::PADIR | regs::PBDIR | regs::PCDIR | regs::PDDIR | regs::PEDIR | regs::PFDIR
            | regs::PGDIR | regs::PJDIR | regs::PKDIR | regs::PMDIR => self.regs.read8(offset),

            // Output latches of ports without synthesized inputs
            regs::PADATA | regs::PBDATA | regs::PCDATA | regs::PEDATA | regs::PFDATA
            | regs::PGDATA | regs::PJDATA | regs::PMDATA => self.regs.read8(offset),

            // GPIO / special function select
            regs::PBSEL | regs::PCSEL | regs::PDSEL | regs::PESEL | regs::PFSEL | regs::PGSEL
            | regs::PJSEL | regs::PKSEL | regs::PMSEL => self.regs.read8(offset),

            // Pull-up / pull-down enables
            regs::PAPUEN | regs::PBPUEN | regs::PCPDEN | regs::PDPUEN | regs::PEPUEN
            | regs::PFPUEN | regs::PGPUEN | regs::PJPUEN | regs::PKPUEN | regs::PMPUEN => {
                self.regs.read8(offset)
            }

            // Port D interrupt configuration
            regs::PDPOL | regs::PDIRQEN | regs::PDKBEN | regs::PDIRQEG => self.regs.read8(offset),

            _ => {
                Self::log_unknown(host, 8, offset, None);
                0
            }
        }
    }

    /// Read a halfword from the register window
    pub fn read16<H: Host>(&self, host: &H, address: u32) -> u16 {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return 0,
        };
        log::trace!("read16 0x{:03X}", offset);

        match offset {
            // 32-bit interrupt registers accessed by halves
            regs::IMR | regs::IMR_LOW | regs::ISR | regs::ISR_LOW | regs::IPR | regs::IPR_LOW => {
                self.regs.read16(offset)
            }

            regs::ICR | regs::ILCR => self.regs.read16(offset),

            regs::CSA | regs::CSB | regs::CSC | regs::CSD | regs::CSGBA | regs::CSGBB
            | regs::CSGBC | regs::CSGBD | regs::CSUGBA | regs::CSCTRL1 => self.regs.read16(offset),

            regs::PLLCR | regs::PLLFSR => self.regs.read16(offset),

            regs::TCTL1 | regs::TPRER1 | regs::TCMP1 | regs::TCN1 | regs::TSTAT1 | regs::TCTL2
            | regs::TPRER2 | regs::TCMP2 | regs::TCN2 | regs::TSTAT2 => self.regs.read16(offset),

            regs::RTCISR | regs::RTCCTL | regs::RTCIENR | regs::WATCHDOG | regs::DAYR
            | regs::DAYALRM => self.regs.read16(offset),

            regs::DRAMC | regs::SDCTRL => self.regs.read16(offset),

            _ => {
                Self::log_unknown(host, 16, offset, None);
                0
            }
        }
    }

    /// Read a word from the register window
    pub fn read32<H: Host>(&self, host: &H, address: u32) -> u32 {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return 0,
        };
        log::trace!("read32 0x{:03X}", offset);

        match offset {
            regs::PLLFSR | regs::ISR | regs::IPR | regs::IMR | regs::RTCTIME | regs::RTCALRM
            | regs::IDR | regs::LSSA => self.regs.read32(offset),
            _ => {
                Self::log_unknown(host, 32, offset, None);
                0
            }
        }
    }

    /// Write a byte to the register window
    pub fn write8<H: Host>(&mut self, host: &mut H, address: u32, value: u8) {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return,
        };
        log::trace!("write8 0x{:03X} = 0x{:02X}", offset, value);

        match offset {
            regs::SCR => {
                let update = control::write_scr(&mut self.regs, value);
                self.chips.registers_supervisor_only = update.supervisor_only;
                if let Some(relocated) = update.relocation_changed {
                    host.register_window_changed(relocated);
                }
            }
            regs::IVR => self.regs.write8(offset, value & 0xF8),

            regs::PBSEL | regs::PBDIR | regs::PBDATA => {
                self.regs.write8(offset, value);
                self.misc = MiscStatus::derive(&self.regs);
            }

            regs::PDSEL => {
                self.regs.write8(offset, value & 0xF0);
                self.scan_port_d(host);
            }
            regs::PDPOL | regs::PDIRQEN | regs::PDIRQEG => {
                self.regs.write8(offset, value & 0x0F);
                self.scan_port_d(host);
            }
            regs::PDKBEN | regs::PDDIR | regs::PDDATA => {
                self.regs.write8(offset, value);
                self.scan_port_d(host);
            }

            regs::PFSEL => {
                self.regs.write8(offset, value);
                host.display_clock_changed(value & 0x04 == 0);
            }

            regs::PGSEL | regs::PGDIR | regs::PGDATA => {
                self.regs.write8(offset, value & 0x3F);
                self.misc = MiscStatus::derive(&self.regs);
            }

            regs::PKSEL | regs::PKDIR | regs::PKDATA => {
                self.regs.write8(offset, value);
                self.scan_port_d(host);
                self.misc = MiscStatus::derive(&self.regs);
            }

            regs::PMSEL | regs::PMDIR | regs::PMDATA | regs::PMPUEN | regs::PGPUEN => {
                self.regs.write8(offset, value & 0x3F);
            }

            regs::PCSEL | regs::PESEL | regs::PJSEL => self.regs.write8(offset, value),
            regs::PADIR | regs::PCDIR | regs::PEDIR | regs::PFDIR | regs::PJDIR => {
                self.regs.write8(offset, value)
            }
            regs::PAPUEN | regs::PBPUEN | regs::PCPDEN | regs::PDPUEN | regs::PEPUEN
            | regs::PFPUEN | regs::PJPUEN | regs::PKPUEN => self.regs.write8(offset, value),
            regs::PADATA | regs::PCDATA | regs::PEDATA | regs::PFDATA | regs::PJDATA => {
                self.regs.write8(offset, value)
            }
            regs::LCKCON => self.regs.write8(offset, value),

            _ => Self::log_unknown(&*host, 8, offset, Some(u32::from(value))),
        }
    }

    /// Write a halfword to the register window
    pub fn write16<H: Host>(&mut self, host: &mut H, address: u32, value: u16) {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return,
        };
        log::trace!("write16 0x{:03X} = 0x{:04X}", offset, value);

        match offset {
            regs::IMR => self.write_imr_half(host, offset, value & 0x00FF),
            regs::IMR_LOW => self.write_imr_half(host, offset, value & 0x03FF),
            regs::ISR => {
                interrupt::clear_external(&mut self.regs, u32::from(value & 0x000F) << 16);
                self.check_interrupts(host);
            }
            regs::ISR_LOW => {
                interrupt::clear_external(&mut self.regs, u32::from(value & 0x0F00));
                self.check_interrupts(host);
            }
            regs::ICR => {
                self.regs.write16(offset, value & 0xFF80);
                self.scan_port_d(host);
            }
            regs::ILCR => {
                self.regs.write16(offset, value & 0x7777);
                self.check_interrupts(host);
            }

            regs::TCTL1 | regs::TCTL2 => self.regs.write16(offset, value & timer::TCTL_MASK),
            regs::TPRER1 | regs::TPRER2 => self.regs.write16(offset, value & 0x00FF),
            regs::TCMP1 | regs::TCMP2 => self.regs.write16(offset, value),
            regs::TSTAT1 => self.write_timer_status(host, 0, value),
            regs::TSTAT2 => self.write_timer_status(host, 1, value),

            regs::WATCHDOG => {
                if watchdog::write(&mut self.regs, value) {
                    interrupt::clear(&mut self.regs, sources::WDT);
                    self.check_interrupts(host);
                }
            }
            regs::RTCISR => {
                let drained = rtc::write_status(&mut self.regs, value);
                if drained.rti {
                    interrupt::clear(&mut self.regs, sources::RTI);
                }
                if drained.rtc {
                    interrupt::clear(&mut self.regs, sources::RTC);
                }
                self.check_interrupts(host);
            }
            regs::RTCIENR => self.regs.write16(offset, value & rtc::RTCIENR_MASK),
            regs::RTCCTL => self.regs.write16(offset, value & rtc::RTCCTL_MASK),
            regs::DAYR | regs::DAYALRM => self.regs.write16(offset, value & rtc::DAY_MASK),

            regs::PLLFSR => self.pll.write_pllfsr(&mut self.regs, value),
            regs::PLLCR => {
                if self.pll.write_pllcr(&mut self.regs, value) {
                    host.limit_remaining_cycles(pll::SHUTDOWN_GRACE_CYCLES);
                }
            }

            regs::DRAMMC => self.regs.write16(offset, value),
            regs::DRAMC => self.regs.write16(offset, value & 0xFF3F),
            regs::SDCTRL => self.regs.write16(offset, value & 0xDC7F),

            regs::CSA => self.write_chip_select(host, |chips, regs| {
                chips.write_control(regs, ChipId::Rom, value)
            }),
            regs::CSB => self.write_chip_select(host, |chips, regs| {
                chips.write_control(regs, ChipId::Sed, value)
            }),
            regs::CSC => self.write_chip_select(host, |chips, regs| {
                chips.write_control(regs, ChipId::Usb, value)
            }),
            regs::CSD => self.write_chip_select(host, |chips, regs| {
                chips.write_control(regs, ChipId::Ram, value)
            }),
            regs::CSGBA => self.write_chip_select(host, |chips, regs| {
                chips.write_base(regs, ChipId::Rom, value)
            }),
            regs::CSGBB => self.write_chip_select(host, |chips, regs| {
                chips.write_base(regs, ChipId::Sed, value)
            }),
            regs::CSGBC => self.write_chip_select(host, |chips, regs| {
                chips.write_base(regs, ChipId::Usb, value)
            }),
            regs::CSGBD => self.write_chip_select(host, |chips, regs| {
                chips.write_base(regs, ChipId::Ram, value)
            }),
            regs::CSUGBA => {
                self.write_chip_select(host, |chips, regs| chips.write_upper_base(regs, value))
            }
            regs::CSCTRL1 => {
                self.write_chip_select(host, |chips, regs| chips.write_control1(regs, value))
            }

            _ => Self::log_unknown(&*host, 16, offset, Some(u32::from(value))),
        }
    }

    /// Write a word to the register window
    pub fn write32<H: Host>(&mut self, host: &mut H, address: u32, value: u32) {
        let offset = match target(address) {
            Target::Register(offset) => offset,
            Target::Emulator | Target::Invalid => return,
        };
        log::trace!("write32 0x{:03X} = 0x{:08X}", offset, value);

        match offset {
            regs::RTCTIME | regs::RTCALRM => self.regs.write32(offset, value & rtc::TIME_MASK),
            // Read-only
            regs::IDR | regs::IPR => {}
            regs::ISR => {
                interrupt::clear_external(&mut self.regs, value);
                self.check_interrupts(host);
            }
            regs::IMR => {
                self.regs.write32(offset, value & interrupt::IMR_MASK);
                interrupt::refresh_active(&mut self.regs);
                self.check_interrupts(host);
            }
            regs::LSSA => self.regs.write32(offset, value),
            _ => Self::log_unknown(&*host, 32, offset, Some(value)),
        }
    }

    fn write_imr_half<H: Host>(&mut self, host: &mut H, offset: u32, value: u16) {
        self.regs.write16(offset, value);
        interrupt::refresh_active(&mut self.regs);
        self.check_interrupts(host);
    }

    fn write_timer_status<H: Host>(&mut self, host: &mut H, index: usize, value: u16) {
        let timer = &self.timers[index];
        if timer.write_status(&mut self.regs, value) {
            interrupt::clear(&mut self.regs, timer.block().source);
            self.check_interrupts(host);
        }
    }

    fn write_chip_select<H, F>(&mut self, host: &mut H, apply: F)
    where
        H: Host,
        F: FnOnce(&mut ChipSelects, &mut RegisterFile),
    {
        apply(&mut self.chips, &mut self.regs);
        host.chip_selects_changed(&self.chips);
    }
}

impl Default for Peripherals {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use crate::host::InputState;
    use crate::register_file::window::BASE;

    fn setup() -> (Peripherals, RecordingHost) {
        let mut host = RecordingHost::new();
        let mut p = Peripherals::default();
        p.reset(&mut host);
        (p, host)
    }

    #[test]
    fn test_power_on_defaults() {
        let (p, host) = setup();
        assert_eq!(p.read32(&host, BASE + regs::IDR), 0x5600_0000);
        assert_eq!(p.read32(&host, BASE + regs::IMR), 0x00FF_FFFF);
        assert_eq!(p.read16(&host, BASE + regs::PLLCR), 0x24B3);
        assert_eq!(p.read16(&host, BASE + regs::PLLFSR), 0x0347);
        assert_eq!(p.read16(&host, BASE + regs::CSA), 0x00B0);
        assert_eq!(p.read16(&host, BASE + regs::CSD), 0x0200);
        assert_eq!(p.read16(&host, BASE + regs::WATCHDOG), 0x0001);
        assert_eq!(p.read16(&host, BASE + regs::RTCCTL), 0x0080);
        assert_eq!(p.read16(&host, BASE + regs::SDCTRL), 0x003C);
        assert_eq!(p.read16(&host, BASE + regs::TCMP1), 0xFFFF);
        assert_eq!(p.read8(&host, BASE + regs::SCR), 0x1C);
        assert_eq!(p.read8(&host, BASE + regs::PFSEL), 0x87);
        assert_eq!(p.read8(&host, BASE + regs::PJSEL), 0xEF);
        assert_eq!(p.registers().read8(regs::DMACR), 0x62);
        assert_eq!(p.registers().read16(regs::HMARK), 0x0102);
        // LRRA is stored as a halfword starting at its byte offset
        assert_eq!(p.registers().read8(regs::LRRA), 0x00);
        assert_eq!(p.registers().read16(regs::LRRA), 0x00FF);
    }

    #[test]
    fn test_power_on_derived_state() {
        let (p, host) = setup();
        assert!(p.chip_selects().chip(ChipId::Rom).in_boot_mode);
        assert!(p.is_register_window_relocated());
        assert!(p.is_system_clock_running());
        assert!(!p.display_clock_connected());
        assert_eq!(p.system_clock_hz(), 1012.0 * 32768.0);
        assert_eq!(host.chip_select_updates, 1);
        // Port K LCD pin is not an output at power-on
        assert_eq!(p.misc_status(), MiscStatus::default());
    }

    #[test]
    fn test_reset_leaves_bank_attributes_zeroed() {
        let (mut p, mut host) = setup();
        p.write16(&mut host, BASE + regs::CSD, 0x0203);
        p.write8(&mut host, BASE + regs::SCR, 0x1C);
        assert!(p.chip_selects().chip(ChipId::Ram).enabled);
        assert!(p.chip_selects().registers_supervisor_only);

        p.reset(&mut host);
        let chips = p.chip_selects();
        // CSA/CSD hold their power-on values, but the banks stay undecoded
        assert_eq!(p.read16(&host, BASE + regs::CSD), 0x0200);
        let ram = chips.chip(ChipId::Ram);
        assert!(!ram.enabled);
        assert_eq!((ram.start, ram.size), (0, 0));
        assert_eq!(chips.chip(ChipId::Rom).size, 0);
        assert!(chips.chip(ChipId::Rom).in_boot_mode);
        assert!(!chips.registers_supervisor_only);
        assert_eq!(host.last_ram_window, Some((0, 0)));
    }

    #[test]
    fn test_invalid_addresses() {
        let (mut p, mut host) = setup();
        assert_eq!(p.read8(&host, 0xFFFF_0000 + regs::SCR), 0);
        assert_eq!(p.read16(&host, 0x0000_0200), 0);
        p.write16(&mut host, 0xFFFF_0200, 0x0000);
        assert_eq!(p.read16(&host, BASE + regs::PLLCR), 0x24B3);
    }

    #[test]
    fn test_emulator_block_is_silent() {
        let (mut p, mut host) = setup();
        assert_eq!(p.read32(&host, 0xFFFF_E000), 0);
        assert_eq!(p.read16(&host, 0xFFFF_E004), 0);
        p.write32(&mut host, 0xFFFF_E000, 0xDEAD_BEEF);
        p.write8(&mut host, 0xFFFF_E200, 0xFF);
        // Same low bits as PLLCR, but not touched
        assert_eq!(p.registers().read16(regs::PLLCR), 0x24B3);
    }

    #[test]
    fn test_unknown_register_reads_zero() {
        let (mut p, mut host) = setup();
        p.write16(&mut host, BASE + 0x800, 0x1234);
        assert_eq!(p.read16(&host, BASE + 0x800), 0);
        // Stored but not readable through the 8-bit path
        assert_eq!(p.read8(&host, BASE + regs::LVPW), 0);
    }

    #[test]
    fn test_register_window_mirrors_upper_bits() {
        let (p, host) = setup();
        // Only bits 15-12 select the block
        assert_eq!(p.read16(&host, 0x1234_F000 + regs::PLLCR), 0x24B3);
    }

    #[test]
    fn test_write_masks() {
        let (mut p, mut host) = setup();
        p.write8(&mut host, BASE + regs::IVR, 0xFF);
        assert_eq!(p.read8(&host, BASE + regs::IVR), 0xF8);
        p.write16(&mut host, BASE + regs::TCTL1, 0xFFFF);
        assert_eq!(p.read16(&host, BASE + regs::TCTL1), 0x01FF);
        p.write16(&mut host, BASE + regs::TCTL1, 0);
        p.write16(&mut host, BASE + regs::ICR, 0xFFFF);
        assert_eq!(p.read16(&host, BASE + regs::ICR), 0xFF80);
        p.write16(&mut host, BASE + regs::DRAMC, 0xFFFF);
        assert_eq!(p.read16(&host, BASE + regs::DRAMC), 0xFF3F);
        p.write16(&mut host, BASE + regs::SDCTRL, 0xFFFF);
        assert_eq!(p.read16(&host, BASE + regs::SDCTRL), 0xDC7F);
        p.write16(&mut host, BASE + regs::RTCIENR, 0xFFFF);
        assert_eq!(p.read16(&host, BASE + regs::RTCIENR), 0xFF3F);
        p.write8(&mut host, BASE + regs::PMDATA, 0xFF);
        assert_eq!(p.read8(&host, BASE + regs::PMDATA), 0x3F);
        p.write8(&mut host, BASE + regs::PDSEL, 0xFF);
        assert_eq!(p.read8(&host, BASE + regs::PDSEL), 0xF0);
        p.write8(&mut host, BASE + regs::PDIRQEG, 0xFF);
        assert_eq!(p.read8(&host, BASE + regs::PDIRQEG), 0x0F);
        p.write32(&mut host, BASE + regs::RTCTIME, 0xFFFF_FFFF);
        assert_eq!(p.read32(&host, BASE + regs::RTCTIME), 0x1F3F_003F);
    }

    #[test]
    fn test_imr_halves() {
        let (mut p, mut host) = setup();
        p.write16(&mut host, BASE + regs::IMR, 0xFFFF);
        p.write16(&mut host, BASE + regs::IMR_LOW, 0xFFFF);
        assert_eq!(p.read32(&host, BASE + regs::IMR), 0x00FF_03FF);
        p.write32(&mut host, BASE + regs::IMR, 0xFFFF_FFFF);
        assert_eq!(p.read32(&host, BASE + regs::IMR), 0x00FF_3FFF);
    }

    #[test]
    fn test_read_only_registers() {
        let (mut p, mut host) = setup();
        p.write32(&mut host, BASE + regs::IDR, 0);
        p.write32(&mut host, BASE + regs::IPR, 0xFFFF_FFFF);
        assert_eq!(p.read32(&host, BASE + regs::IDR), 0x5600_0000);
        assert_eq!(p.read32(&host, BASE + regs::IPR), 0);
    }

    #[test]
    fn test_masking_lowers_level() {
        let (mut p, mut host) = setup();
        p.write32(&mut host, BASE + regs::IMR, 0);
        interrupt::raise(&mut p.regs, sources::IRQ5);
        p.check_interrupts(&mut host);
        assert_eq!(host.irq_level(), Some(5));

        p.write32(&mut host, BASE + regs::IMR, sources::IRQ5);
        assert_eq!(host.irq_level(), Some(0));
        // Still pending underneath the mask
        assert_eq!(p.read32(&host, BASE + regs::IPR), sources::IRQ5);
        assert_eq!(p.read32(&host, BASE + regs::ISR), 0);
    }

    #[test]
    fn test_isr_write_clears_external_only() {
        let (mut p, mut host) = setup();
        p.write32(&mut host, BASE + regs::IMR, 0);
        interrupt::raise(&mut p.regs, sources::IRQ1 | sources::INT0 | sources::TMR1);

        p.write32(&mut host, BASE + regs::ISR, 0xFFFF_FFFF);
        assert_eq!(p.read32(&host, BASE + regs::IPR), sources::TMR1);
        assert_eq!(host.irq_level(), Some(6));
    }

    #[test]
    fn test_isr_halfword_clears() {
        let (mut p, mut host) = setup();
        p.write32(&mut host, BASE + regs::IMR, 0);
        interrupt::raise(&mut p.regs, sources::IRQ2 | sources::INT3);

        p.write16(&mut host, BASE + regs::ISR, 0x0002);
        assert_eq!(p.read32(&host, BASE + regs::IPR), sources::INT3);
        p.write16(&mut host, BASE + regs::ISR_LOW, 0x0800);
        assert_eq!(p.read32(&host, BASE + regs::IPR), 0);
        assert_eq!(host.irq_level(), Some(0));
    }

    #[test]
    fn test_level_reported_even_when_zero() {
        let (mut p, mut host) = setup();
        p.tick(&mut host);
        assert_eq!(host.irq_levels, vec![0]);
    }

    #[test]
    fn test_acknowledge_interrupt() {
        let (mut p, mut host) = setup();
        assert_eq!(p.acknowledge_interrupt(4), 15);
        p.write8(&mut host, BASE + regs::IVR, 0x40);
        p.enter_low_power_stop();
        assert!(!p.is_system_clock_running());
        assert_eq!(p.acknowledge_interrupt(4), 0x44);
        assert!(p.is_system_clock_running());
    }

    #[test]
    fn test_pll_shutdown_limits_timeslice() {
        let (mut p, mut host) = setup();
        p.write16(&mut host, BASE + regs::PLLCR, 0x24B3);
        assert!(host.cycle_limits.is_empty());
        p.write16(&mut host, BASE + regs::PLLCR, 0x24BB);
        assert_eq!(host.cycle_limits, vec![30]);
        assert!(!p.is_system_clock_running());
    }

    #[test]
    fn test_chip_select_writes_notify_host() {
        let (mut p, mut host) = setup();
        let before = host.chip_select_updates;
        p.write16(&mut host, BASE + regs::CSGBD, 0x0000);
        p.write16(&mut host, BASE + regs::CSD, 0x0203);
        p.write16(&mut host, BASE + regs::CSCTRL1, 0x0040);
        assert_eq!(host.chip_select_updates, before + 3);
        assert_eq!(host.last_ram_window, Some((0, 0x100_0000)));

        p.write16(&mut host, BASE + regs::CSA, 0x000B);
        assert!(!p.chip_selects().chip(ChipId::Rom).in_boot_mode);
    }

    #[test]
    fn test_scr_write() {
        let (mut p, mut host) = setup();
        p.write8(&mut host, BASE + regs::SCR, 0x10);
        assert_eq!(host.window_changes, vec![false]);
        assert!(!p.is_register_window_relocated());
        assert!(!p.chip_selects().registers_supervisor_only);

        p.write8(&mut host, BASE + regs::SCR, 0x14);
        assert_eq!(host.window_changes, vec![false, true]);
    }

    #[test]
    fn test_faults() {
        let (mut p, mut host) = setup();
        p.write8(&mut host, BASE + regs::SCR, 0x0C);
        p.set_write_protect_violation(&mut host);
        assert_eq!(p.read8(&host, BASE + regs::SCR), 0x4C);
        assert_eq!(host.bus_errors, 0);

        p.write8(&mut host, BASE + regs::SCR, 0x1C);
        p.set_bus_error_timeout(&mut host);
        p.set_privilege_violation(&mut host);
        assert_eq!(p.read8(&host, BASE + regs::SCR), 0xFC);
        assert_eq!(host.bus_errors, 2);

        // Write one to clear
        p.write8(&mut host, BASE + regs::SCR, 0xFC);
        assert_eq!(p.read8(&host, BASE + regs::SCR), 0x1C);
    }

    #[test]
    fn test_pfsel_display_clock() {
        let (mut p, mut host) = setup();
        p.write8(&mut host, BASE + regs::PFSEL, 0x83);
        assert_eq!(host.display_clock, vec![true]);
        assert!(p.display_clock_connected());
    }

    #[test]
    fn test_misc_status_tracks_ports() {
        let (mut p, mut host) = setup();
        p.write8(&mut host, BASE + regs::PKDIR, 0x12);
        p.write8(&mut host, BASE + regs::PKDATA, 0x02);
        let status = p.misc_status();
        assert!(status.lcd_on);
        assert!(!status.vibrator_on);

        p.write8(&mut host, BASE + regs::PGSEL, 0x02);
        p.write8(&mut host, BASE + regs::PGDIR, 0x02);
        assert!(p.misc_status().backlight_on);

        p.write8(&mut host, BASE + regs::PBDIR, 0x40);
        assert!(p.misc_status().alarm_led);
    }

    #[test]
    fn test_port_reads_use_host_inputs() {
        let (mut p, mut host) = setup();
        host.inputs = InputState {
            in_dock: true,
            sd_card_inserted: true,
            ..InputState::default()
        };
        p.write8(&mut host, BASE + regs::PKDIR, 0x00);
        assert_eq!(p.read8(&host, BASE + regs::PKDATA) & 0x04, 0);
        assert_eq!(p.read8(&host, BASE + regs::PDDATA) & 0x20, 0);

        host.inputs = InputState::default();
        assert_eq!(p.read8(&host, BASE + regs::PKDATA) & 0x04, 0x04);
        assert_eq!(p.read8(&host, BASE + regs::PDDATA) & 0x20, 0x20);
    }

    #[test]
    fn test_timer_status_clear_drops_interrupt() {
        let (mut p, mut host) = setup();
        p.write32(&mut host, BASE + regs::IMR, 0);
        p.regs.write16(regs::TSTAT2, timer::TSTAT_COMPARE);
        interrupt::raise(&mut p.regs, sources::TMR2);

        p.write16(&mut host, BASE + regs::TSTAT2, 0);
        assert_eq!(p.read32(&host, BASE + regs::IPR), 0);
        assert_eq!(host.irq_level(), Some(0));
    }

    #[test]
    fn test_rtcisr_clear_drops_sources() {
        let (mut p, mut host) = setup();
        p.regs.write16(regs::RTCISR, 0x8010);
        interrupt::raise(&mut p.regs, sources::RTC | sources::RTI);

        p.write16(&mut host, BASE + regs::RTCISR, 0x0010);
        let ipr = p.read32(&host, BASE + regs::IPR);
        assert_eq!(ipr, sources::RTI);

        p.write16(&mut host, BASE + regs::RTCISR, 0x8000);
        assert_eq!(p.read32(&host, BASE + regs::IPR), 0);
    }

    #[test]
    fn test_set_real_time_clock() {
        let (mut p, host) = setup();
        p.set_real_time_clock(300, 13, 45, 30);
        assert_eq!(p.read32(&host, BASE + regs::RTCTIME), 0x0D2D_001E);
        assert_eq!(p.read16(&host, BASE + regs::DAYR), 300);
    }
}
