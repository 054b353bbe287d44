//! MC68VZ328 register offsets within the 4KB register window
//!
//! | Offset        | Block                         |
//! |---------------|-------------------------------|
//! | 0x000 - 0x0FF | System control, chip ID, IO drive |
//! | 0x100 - 0x1FF | Chip selects                  |
//! | 0x200 - 0x2FF | PLL and power control         |
//! | 0x300 - 0x3FF | Interrupt controller          |
//! | 0x400 - 0x4FF | GPIO ports A-M                |
//! | 0x500 - 0x5FF | PWM                           |
//! | 0x600 - 0x6FF | General purpose timers        |
//! | 0x900 - 0x9FF | UARTs                         |
//! | 0xA00 - 0xAFF | LCD controller                |
//! | 0xB00 - 0xBFF | RTC and watchdog              |
//! | 0xC00 - 0xCFF | DRAM controller               |

// System control
pub const SCR: u32 = 0x000;
pub const IDR: u32 = 0x004;
pub const IODCR: u32 = 0x008;

// Chip selects
pub const CSGBA: u32 = 0x100;
pub const CSGBB: u32 = 0x102;
pub const CSGBC: u32 = 0x104;
pub const CSGBD: u32 = 0x106;
pub const CSUGBA: u32 = 0x108;
pub const CSCTRL1: u32 = 0x10A;
pub const CSCTRL2: u32 = 0x10C;
pub const CSA: u32 = 0x110;
pub const CSB: u32 = 0x112;
pub const CSC: u32 = 0x114;
pub const CSD: u32 = 0x116;
pub const EMUCS: u32 = 0x118;
pub const CSCTRL3: u32 = 0x150;

// PLL
pub const PLLCR: u32 = 0x200;
pub const PLLFSR: u32 = 0x202;
pub const PCTLR: u32 = 0x207;

// Interrupt controller
pub const IVR: u32 = 0x300;
pub const ICR: u32 = 0x302;
pub const IMR: u32 = 0x304;
/// Low halves of the 32-bit interrupt registers
pub const IMR_LOW: u32 = 0x306;
pub const ISR: u32 = 0x30C;
pub const ISR_LOW: u32 = 0x30E;
pub const IPR: u32 = 0x310;
pub const IPR_LOW: u32 = 0x312;
pub const ILCR: u32 = 0x314;

// Port A
pub const PADIR: u32 = 0x400;
pub const PADATA: u32 = 0x401;
pub const PAPUEN: u32 = 0x402;

// Port B
pub const PBDIR: u32 = 0x408;
pub const PBDATA: u32 = 0x409;
pub const PBPUEN: u32 = 0x40A;
pub const PBSEL: u32 = 0x40B;

// Port C (pull-downs instead of pull-ups)
pub const PCDIR: u32 = 0x410;
pub const PCDATA: u32 = 0x411;
pub const PCPDEN: u32 = 0x412;
pub const PCSEL: u32 = 0x413;

// Port D, buttons and external interrupt pins
pub const PDDIR: u32 = 0x418;
pub const PDDATA: u32 = 0x419;
pub const PDPUEN: u32 = 0x41A;
pub const PDSEL: u32 = 0x41B;
pub const PDPOL: u32 = 0x41C;
pub const PDIRQEN: u32 = 0x41D;
pub const PDKBEN: u32 = 0x41E;
pub const PDIRQEG: u32 = 0x41F;

// Port E
pub const PEDIR: u32 = 0x420;
pub const PEDATA: u32 = 0x421;
pub const PEPUEN: u32 = 0x422;
pub const PESEL: u32 = 0x423;

// Port F
pub const PFDIR: u32 = 0x428;
pub const PFDATA: u32 = 0x429;
pub const PFPUEN: u32 = 0x42A;
pub const PFSEL: u32 = 0x42B;

// Port G
pub const PGDIR: u32 = 0x430;
pub const PGDATA: u32 = 0x431;
pub const PGPUEN: u32 = 0x432;
pub const PGSEL: u32 = 0x433;

// Port J
pub const PJDIR: u32 = 0x438;
pub const PJDATA: u32 = 0x439;
pub const PJPUEN: u32 = 0x43A;
pub const PJSEL: u32 = 0x43B;

// Port K, keyboard row drive and dock sense
pub const PKDIR: u32 = 0x440;
pub const PKDATA: u32 = 0x441;
pub const PKPUEN: u32 = 0x442;
pub const PKSEL: u32 = 0x443;

// Port M
pub const PMDIR: u32 = 0x448;
pub const PMDATA: u32 = 0x449;
pub const PMPUEN: u32 = 0x44A;
pub const PMSEL: u32 = 0x44B;

// PWM
pub const PWMC1: u32 = 0x500;
pub const PWMP1: u32 = 0x504;

// Timers (timer 2 mirrors timer 1 at +0x10)
pub const TCTL1: u32 = 0x600;
pub const TPRER1: u32 = 0x602;
pub const TCMP1: u32 = 0x604;
pub const TCR1: u32 = 0x606;
pub const TCN1: u32 = 0x608;
pub const TSTAT1: u32 = 0x60A;
pub const TCTL2: u32 = 0x610;
pub const TPRER2: u32 = 0x612;
pub const TCMP2: u32 = 0x614;
pub const TCR2: u32 = 0x616;
pub const TCN2: u32 = 0x618;
pub const TSTAT2: u32 = 0x61A;

// UART
pub const UBAUD1: u32 = 0x902;
pub const UBAUD2: u32 = 0x912;
pub const HMARK: u32 = 0x930;

// LCD controller
pub const LSSA: u32 = 0xA00;
pub const LVPW: u32 = 0xA05;
pub const LXMAX: u32 = 0xA08;
pub const LYMAX: u32 = 0xA0A;
pub const LCWCH: u32 = 0xA1C;
pub const LBLKC: u32 = 0xA1F;
pub const LCKCON: u32 = 0xA27;
pub const LRRA: u32 = 0xA29;
pub const LGPMR: u32 = 0xA33;
pub const DMACR: u32 = 0xA39;

// RTC and watchdog
pub const RTCTIME: u32 = 0xB00;
pub const RTCALRM: u32 = 0xB04;
pub const WATCHDOG: u32 = 0xB0A;
pub const RTCCTL: u32 = 0xB0C;
pub const RTCISR: u32 = 0xB0E;
pub const RTCIENR: u32 = 0xB10;
pub const STPWCH: u32 = 0xB12;
pub const DAYR: u32 = 0xB1A;
pub const DAYALRM: u32 = 0xB1C;

// DRAM controller
pub const DRAMMC: u32 = 0xC00;
pub const DRAMC: u32 = 0xC02;
pub const SDCTRL: u32 = 0xC04;
