//! ILI9486 register map, orientation table and gamma calibration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native panel size in portrait scan order
pub const TFT_WIDTH: u16 = 320;
pub const TFT_HEIGHT: u16 = 480;

/// ILI9486 command opcodes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Nop = 0x00,
    SoftwareReset = 0x01,
    ReadDisplayId = 0x04,
    ReadDisplayStatus = 0x09,
    ReadPowerMode = 0x0A,
    ReadMadctl = 0x0B,
    ReadPixelFormat = 0x0C,
    ReadSelfDiagnostic = 0x0F,
    SleepIn = 0x10,
    SleepOut = 0x11,
    PartialModeOn = 0x12,
    NormalModeOn = 0x13,
    InversionOff = 0x20,
    InversionOn = 0x21,
    GammaSet = 0x26,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    ColumnAddressSet = 0x2A,
    PageAddressSet = 0x2B,
    MemoryWrite = 0x2C,
    MemoryRead = 0x2E,
    PartialArea = 0x30,
    MemoryAccessControl = 0x36,
    PixelFormat = 0x3A,
    InterfaceMode = 0xB0,
    FrameRateControl1 = 0xB1,
    FrameRateControl2 = 0xB2,
    FrameRateControl3 = 0xB3,
    InversionControl = 0xB4,
    DisplayFunctionControl = 0xB6,
    PowerControl1 = 0xC0,
    PowerControl2 = 0xC1,
    PowerControl3 = 0xC2,
    PowerControl4 = 0xC3,
    PowerControl5 = 0xC4,
    VcomControl1 = 0xC5,
    VcomControl2 = 0xC7,
    ReadId1 = 0xDA,
    ReadId2 = 0xDB,
    ReadId3 = 0xDC,
    ReadId4 = 0xDD,
    PositiveGamma = 0xE0,
    NegativeGamma = 0xE1,
    DigitalGamma = 0xE2,
    PowerControl6 = 0xFC,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        reg as u8
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:02X})", self, *self as u8)
    }
}

/// 18 bits per pixel (6-6-6) for both RGB and MCU interfaces
pub const PIXEL_FORMAT_18BPP: u8 = 0x66;

/// Positive gamma calibration for this panel
pub const POSITIVE_GAMMA: [u8; 15] = [
    0x1F, 0x25, 0x22, 0x0B, 0x06, 0x0A, 0x4E, 0xC6, 0x39, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Negative gamma calibration for this panel
pub const NEGATIVE_GAMMA: [u8; 15] = [
    0x1F, 0x3F, 0x3F, 0x0F, 0x1F, 0x0F, 0x46, 0x49, 0x31, 0x05, 0x09, 0x03, 0x1C, 0x1A, 0x00,
];

/// Entries in the positive and negative gamma tables
pub const GAMMA_LEN: usize = 15;
/// Entries in the digital gamma table
pub const DIGITAL_GAMMA_LEN: usize = 16;

/// Corner of the panel that holds pixel (0, 0)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

/// MADCTL setting for one orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAccess {
    pub madctl: u8,
    /// Row/column exchange: the panel is driven in landscape
    pub swap_dimensions: bool,
}

/// Indexed by `Orientation as usize`
const MEMORY_ACCESS: [MemoryAccess; 4] = [
    MemoryAccess {
        madctl: 0b0010_1000,
        swap_dimensions: true,
    },
    MemoryAccess {
        madctl: 0x88,
        swap_dimensions: false,
    },
    MemoryAccess {
        madctl: 0x48,
        swap_dimensions: false,
    },
    MemoryAccess {
        madctl: 0xE8,
        swap_dimensions: true,
    },
];

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::UpperLeft,
        Orientation::UpperRight,
        Orientation::LowerLeft,
        Orientation::LowerRight,
    ];

    /// MADCTL byte and axis swap for this orientation
    pub const fn memory_access(self) -> MemoryAccess {
        MEMORY_ACCESS[self as usize]
    }

    /// Apply the axis swap to a nominal `(width, height)`
    pub const fn device_size(self, width: u16, height: u16) -> (u16, u16) {
        if self.memory_access().swap_dimensions {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Orientation::ALL
            .get(value as usize)
            .copied()
            .ok_or(value)
    }
}
