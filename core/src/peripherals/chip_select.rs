//! Chip-select bank decoder
//!
//! Four chip selects carve the 32-bit bus into the regions the Palm board
//! wires up:
//!
//! | Bank | Control | Base  | Device                     |
//! |------|---------|-------|----------------------------|
//! | ROM  | CSA     | CSGBA | Flash ROM                  |
//! | SED  | CSB     | CSGBB | SED1376 display controller |
//! | USB  | CSC     | CSGBC | USB controller (absent)    |
//! | RAM  | CSD     | CSGBD | SDRAM                      |
//!
//! After reset the ROM bank is in boot mode and answers for every address
//! until software enables CSA. Overlaps between banks are legal; decode
//! priority is ROM, SED, USB, RAM.

use super::regs;
use crate::register_file::RegisterFile;

/// CSUGBA bit enabling the upper base address bits
const CSUGBA_ENABLE: u16 = 0x8000;
/// CSCTRL1 bit that doubles the protected-size encoding range
const CSCTRL1_PROTECT_RANGE: u16 = 0x4000;
/// CSCTRL1 bit enabling the large-SDRAM size encoding for CSD
const CSCTRL1_DRAM_LARGE: u16 = 0x0040;
/// CSD bit selecting SDRAM in the large size encoding
const CSD_SDRAM: u16 = 0x0200;
/// CSCTRL1 bits feeding CSB/CSC/CSD size derivation
const CSCTRL1_GEOMETRY_BITS: u16 = 0x4055;
/// Writable CSCTRL1 bits
const CSCTRL1_MASK: u16 = 0x7F55;
/// Writable CSGBx bits
const BASE_MASK: u16 = 0xFFFE;

/// Chip-select banks in decode priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipId {
    Rom = 0,
    Sed = 1,
    Usb = 2,
    Ram = 3,
}

impl ChipId {
    pub const ALL: [ChipId; 4] = [ChipId::Rom, ChipId::Sed, ChipId::Usb, ChipId::Ram];

    fn layout(self) -> &'static BankLayout {
        &BANKS[self as usize]
    }
}

/// Per-bank register locations and field encodings
struct BankLayout {
    control: u32,
    base: u32,
    /// Smallest size the 3-bit size field can encode
    size_unit: u32,
    /// Shift of this bank's 3-bit field in CSUGBA
    upper_base_shift: u32,
    control_mask: u16,
    /// CSCTRL1 bit extending the unprotected-size field, if the bank has one
    protect_range_bit: Option<u16>,
}

const BANKS: [BankLayout; 4] = [
    BankLayout {
        control: regs::CSA,
        base: regs::CSGBA,
        size_unit: 0x2_0000,
        upper_base_shift: 12,
        control_mask: 0x81FF,
        protect_range_bit: None,
    },
    BankLayout {
        control: regs::CSB,
        base: regs::CSGBB,
        size_unit: 0x2_0000,
        upper_base_shift: 8,
        control_mask: 0xF9FF,
        protect_range_bit: Some(0x0001),
    },
    BankLayout {
        control: regs::CSC,
        base: regs::CSGBC,
        size_unit: 0x8000,
        upper_base_shift: 4,
        control_mask: 0xF9FF,
        protect_range_bit: Some(0x0004),
    },
    BankLayout {
        control: regs::CSD,
        base: regs::CSGBD,
        size_unit: 0x8000,
        upper_base_shift: 0,
        control_mask: 0xFFFF,
        protect_range_bit: Some(0x0010),
    },
];

/// Derived attributes of one chip-select bank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chip {
    pub enabled: bool,
    pub read_only: bool,
    pub start: u32,
    pub size: u32,
    /// Address bits the device actually decodes
    pub mask: u32,
    /// ROM only: mirrored over the whole bus until CSA is enabled
    pub in_boot_mode: bool,
    /// Bytes from `start` not covered by the protection attributes below
    pub unprotected_size: u32,
    pub supervisor_only_protected: bool,
    pub read_only_for_protected: bool,
}

impl Chip {
    /// Whether `address` falls inside this bank's window
    pub fn contains(&self, address: u32) -> bool {
        let address = u64::from(address);
        let start = u64::from(self.start);
        address >= start && address < start + u64::from(self.size)
    }
}

/// All four chip-select banks plus register-window protection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipSelects {
    chips: [Chip; 4],
    /// SCR bit 3: peripheral registers only accessible in supervisor mode
    pub registers_supervisor_only: bool,
}

impl ChipSelects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on state: everything disabled, ROM in boot mode
    pub fn reset(&mut self, ram_huge: bool) {
        *self = Self::default();
        self.chips[ChipId::Rom as usize].in_boot_mode = true;
        self.chips[ChipId::Rom as usize].mask = 0x003F_FFFF;
        self.chips[ChipId::Sed as usize].mask = 0x0003_FFFF;
        self.chips[ChipId::Usb as usize].mask = 0x0000_0000;
        self.chips[ChipId::Ram as usize].mask = if ram_huge { 0x07FF_FFFF } else { 0x00FF_FFFF };
    }

    pub fn chip(&self, id: ChipId) -> &Chip {
        &self.chips[id as usize]
    }

    /// Bank answering for `address`, honoring boot mode and decode priority
    pub fn decode(&self, address: u32) -> Option<ChipId> {
        ChipId::ALL.into_iter().find(|&id| {
            let chip = self.chip(id);
            chip.in_boot_mode || (chip.enabled && chip.contains(address))
        })
    }

    /// Handle a write to one of CSA..CSD
    pub fn write_control(&mut self, regs: &mut RegisterFile, id: ChipId, value: u16) {
        let layout = id.layout();
        if id == ChipId::Rom && value & 0x0001 != 0 {
            self.chips[ChipId::Rom as usize].in_boot_mode = false;
        }
        regs.write16(layout.control, value & layout.control_mask);
        self.derive_geometry(regs, id);
        self.recompute_bases(regs);
    }

    /// Handle a write to one of CSGBA..CSGBD
    pub fn write_base(&mut self, regs: &mut RegisterFile, id: ChipId, value: u16) {
        regs.write16(id.layout().base, value & BASE_MASK);
        self.recompute_bases(regs);
    }

    /// Handle a write to CSUGBA
    pub fn write_upper_base(&mut self, regs: &mut RegisterFile, value: u16) {
        regs.write16(regs::CSUGBA, value);
        self.recompute_bases(regs);
    }

    /// Handle a write to CSCTRL1
    pub fn write_control1(&mut self, regs: &mut RegisterFile, value: u16) {
        let old = regs.read16(regs::CSCTRL1);
        let value = value & CSCTRL1_MASK;
        regs.write16(regs::CSCTRL1, value);
        if (old ^ value) & CSCTRL1_GEOMETRY_BITS != 0 {
            for id in [ChipId::Sed, ChipId::Usb, ChipId::Ram] {
                self.derive_geometry(regs, id);
            }
        }
        self.recompute_bases(regs);
    }

    fn derive_geometry(&mut self, regs: &RegisterFile, id: ChipId) {
        let layout = id.layout();
        let value = regs.read16(layout.control);
        let csctrl1 = regs.read16(regs::CSCTRL1);
        let chip = &mut self.chips[id as usize];

        chip.enabled = value & 0x0001 != 0;
        chip.read_only = value & 0x8000 != 0;

        let size_code = u32::from((value >> 1) & 0x7);
        chip.size = if id == ChipId::Ram
            && csctrl1 & CSCTRL1_DRAM_LARGE != 0
            && value & CSD_SDRAM != 0
        {
            0x80_0000 << (size_code & 0x1)
        } else {
            layout.size_unit << size_code
        };

        if let Some(range_bit) = layout.protect_range_bit {
            chip.supervisor_only_protected = value & 0x4000 != 0;
            chip.read_only_for_protected = value & 0x2000 != 0;
            let mut code = u32::from((value >> 11) & 0x3);
            if csctrl1 & CSCTRL1_PROTECT_RANGE != 0 && csctrl1 & range_bit != 0 {
                code |= 0x4;
            }
            chip.unprotected_size = 0x8000 << code;
        }
    }

    fn recompute_bases(&mut self, regs: &RegisterFile) {
        let upper = regs.read16(regs::CSUGBA);
        for id in ChipId::ALL {
            let layout = id.layout();
            let base = u32::from(regs.read16(layout.base));
            let mut start = (base >> 1) << 14;
            if upper & CSUGBA_ENABLE != 0 {
                start |= ((u32::from(upper) >> layout.upper_base_shift) & 0x7) << 29;
            }
            self.chips[id as usize].start = start;
        }
    }
}
