//! The command set for the ST7789.
//!
//! Note 1: The ST7789 frame memory is 240 columns by 320 rows. The 1.9" glass this driver targets
//! shows only 170 of those columns, starting at column 35 in portrait scanning, which is why the
//! native panel dimensions below are 170x320 and the orientation profiles carry a gap offset.
//!
//! Note 2: Every command is a single opcode byte followed by zero or more 8-bit parameters on the
//! data phase of the bus.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Constants describing the panel's native addressing.

    /// Visible columns in native (unrotated) addressing.
    pub const NATIVE_WIDTH: u16 = 170;
    /// Visible rows in native (unrotated) addressing.
    pub const NATIVE_HEIGHT: u16 = 320;
    pub const PIXEL_COL_MAX: u16 = NATIVE_WIDTH - 1;
    pub const PIXEL_ROW_MAX: u16 = NATIVE_HEIGHT - 1;
    /// Bytes in one full frame of RGB565 pixels.
    pub const FRAME_BYTES: usize = NATIVE_WIDTH as usize * NATIVE_HEIGHT as usize * 2;
}

pub mod opcode {
    //! Raw opcodes, for matching against what was sent on the bus.

    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const TEOFF: u8 = 0x34;
    pub const TEON: u8 = 0x35;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const PORCTRL: u8 = 0xB2;
    pub const GCTRL: u8 = 0xB7;
    pub const VCOMS: u8 = 0xBB;
    pub const LCMCTRL: u8 = 0xC0;
    pub const VDVVRHEN: u8 = 0xC2;
    pub const VRHS: u8 = 0xC3;
    pub const VDVS: u8 = 0xC4;
    pub const FRCTRL2: u8 = 0xC6;
    pub const PWCTRL1: u8 = 0xD0;
    pub const PVGAMCTRL: u8 = 0xE0;
    pub const NVGAMCTRL: u8 = 0xE1;
}

use self::opcode::*;

/// Interface pixel format selected with `COLMOD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16 bits per pixel, 5-6-5 packed. The only format the rest of the driver streams.
    Rgb565,
    /// 18 bits per pixel, 6-6-6 in three bytes.
    Rgb666,
}

/// Mode of the tearing effect output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TearingEffect {
    /// Pulse on vertical blanking only.
    VBlank,
    /// Pulse on both vertical and horizontal blanking.
    VHBlank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Control sleep mode. Leaving sleep requires 120 ms before the next sleep command and 5 ms
    /// before any other command.
    SetSleepMode(bool),
    /// Enable or disable display color inversion. This 1.9" module needs inversion enabled to
    /// show correct colors.
    SetInversion(bool),
    /// Switch the display output on or off. Frame memory is kept either way.
    SetDisplayOn(bool),
    /// Set the column start and end address range for frame memory writes. The column pointer is
    /// reset to the start column so that `BufCommand::WriteMemory` begins writing there. Start
    /// must not exceed end. Which memory axis a "column" is depends on the row/column exchange
    /// bit of `SetMemoryAccessControl`, so the upper bound is left to the controller. (Note 1)
    SetColumnAddress(u16, u16),
    /// Set the row start and end address range for frame memory writes. Same constraints as
    /// `SetColumnAddress`.
    SetRowAddress(u16, u16),
    /// Enable the tearing effect output line, or disable it with `None`.
    SetTearingEffect(Option<TearingEffect>),
    /// Write the memory data access control register: row/column mirroring, row/column exchange
    /// and RGB/BGR order. See `OrientationProfile::madctl`.
    SetMemoryAccessControl(u8),
    /// Select the interface pixel format.
    SetPixelFormat(PixelFormat),
    /// Set back porch and front porch in normal mode. Range 1-127 lines each. Idle and partial
    /// mode porches stay at the power-on value.
    SetPorchControl(u8, u8),
    /// Set VGH (high nibble, 0-7) and VGL (low nibble, 0-7) gate voltage selections.
    SetGateControl(u8),
    /// Set the VCOM voltage. Range 0-63.
    SetVcom(u8),
    /// Set the LCM control byte (XMY, XBGR, XINV, XMX, XMH, XMV, XGS bits).
    SetLcmControl(u8),
    /// Choose whether VDV and VRH come from the command values (`true`) or from NVM.
    SetVdvVrhEnable(bool),
    /// Set the VRH voltage. Range 0-39.
    SetVrh(u8),
    /// Set the VDV voltage. Range 0-63.
    SetVdv(u8),
    /// Set the normal mode frame rate selection. Range 0-31, where 15 is 60 Hz.
    SetFrameRate(u8),
    /// Set AVDD/AVCL/VDS power control. The first parameter byte is fixed to 0xA4.
    SetPowerControl(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufCommand<'buf> {
    /// Set the positive voltage gamma table. Must be exactly 14 bytes.
    SetPositiveGamma(&'buf [u8]),
    /// Set the negative voltage gamma table. Must be exactly 14 bytes.
    SetNegativeGamma(&'buf [u8]),
    /// Start a frame memory write at the current column/row pointers, optionally carrying the
    /// first bytes of pixel data. Further data phases continue the same write.
    WriteMemory(&'buf [u8]),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        Ok(($cmd, &$buf[..4]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr, $arg4:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        $buf[4] = $arg4;
        Ok(($cmd, &$buf[..5]))
    }};
}

/// Split a 16-bit address into high and low parameter bytes.
fn split(addr: u16) -> (u8, u8) {
    ((addr >> 8) as u8, (addr & 0xFF) as u8)
}

impl Command {
    /// Datasheet mnemonic of the command, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetSleepMode(true) => "SLPIN",
            Command::SetSleepMode(false) => "SLPOUT",
            Command::SetInversion(true) => "INVON",
            Command::SetInversion(false) => "INVOFF",
            Command::SetDisplayOn(true) => "DISPON",
            Command::SetDisplayOn(false) => "DISPOFF",
            Command::SetColumnAddress(..) => "CASET",
            Command::SetRowAddress(..) => "RASET",
            Command::SetTearingEffect(None) => "TEOFF",
            Command::SetTearingEffect(Some(_)) => "TEON",
            Command::SetMemoryAccessControl(_) => "MADCTL",
            Command::SetPixelFormat(_) => "COLMOD",
            Command::SetPorchControl(..) => "PORCTRL",
            Command::SetGateControl(_) => "GCTRL",
            Command::SetVcom(_) => "VCOMS",
            Command::SetLcmControl(_) => "LCMCTRL",
            Command::SetVdvVrhEnable(_) => "VDVVRHEN",
            Command::SetVrh(_) => "VRHS",
            Command::SetVdv(_) => "VDVS",
            Command::SetFrameRate(_) => "FRCTRL2",
            Command::SetPowerControl(_) => "PWCTRL1",
        }
    }

    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 5];
        let (cmd, data) = match self {
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => SLPIN,
                    false => SLPOUT,
                },
                []
            ),
            Command::SetInversion(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => INVON,
                    false => INVOFF,
                },
                []
            ),
            Command::SetDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => DISPON,
                    false => DISPOFF,
                },
                []
            ),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (s, e) if s <= e => {
                    let (sh, sl) = split(s);
                    let (eh, el) = split(e);
                    ok_command!(arg_buf, CASET, [sh, sl, eh, el])
                }
                _ => Err(Error::InvalidParameter),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (s, e) if s <= e => {
                    let (sh, sl) = split(s);
                    let (eh, el) = split(e);
                    ok_command!(arg_buf, RASET, [sh, sl, eh, el])
                }
                _ => Err(Error::InvalidParameter),
            },
            Command::SetTearingEffect(mode) => match mode {
                None => ok_command!(arg_buf, TEOFF, []),
                Some(TearingEffect::VBlank) => ok_command!(arg_buf, TEON, [0x00]),
                Some(TearingEffect::VHBlank) => ok_command!(arg_buf, TEON, [0x01]),
            },
            Command::SetMemoryAccessControl(madctl) => {
                // Bits 1:0 are reserved and must be written as zero.
                match madctl & 0x03 {
                    0 => ok_command!(arg_buf, MADCTL, [madctl]),
                    _ => Err(Error::InvalidParameter),
                }
            }
            Command::SetPixelFormat(format) => ok_command!(
                arg_buf,
                COLMOD,
                [match format {
                    PixelFormat::Rgb565 => 0x55,
                    PixelFormat::Rgb666 => 0x66,
                }]
            ),
            Command::SetPorchControl(back, front) => match (back, front) {
                (1..=0x7F, 1..=0x7F) => ok_command!(arg_buf, PORCTRL, [back, front, 0x00, 0x33, 0x33]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetGateControl(gate) => match (gate >> 4, gate & 0x0F) {
                (0..=7, 0..=7) => ok_command!(arg_buf, GCTRL, [gate]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetVcom(vcom) => match vcom {
                0..=0x3F => ok_command!(arg_buf, VCOMS, [vcom]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetLcmControl(lcm) => match lcm & 0x80 {
                0 => ok_command!(arg_buf, LCMCTRL, [lcm]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetVdvVrhEnable(from_command) => ok_command!(
                arg_buf,
                VDVVRHEN,
                [match from_command {
                    true => 0x01,
                    false => 0x00,
                }]
            ),
            Command::SetVrh(vrh) => match vrh {
                0..=0x27 => ok_command!(arg_buf, VRHS, [vrh]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetVdv(vdv) => match vdv {
                0..=0x3F => ok_command!(arg_buf, VDVS, [vdv]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetFrameRate(rate) => match rate {
                0..=0x1F => ok_command!(arg_buf, FRCTRL2, [rate]),
                _ => Err(Error::InvalidParameter),
            },
            Command::SetPowerControl(power) => ok_command!(arg_buf, PWCTRL1, [0xA4, power]),
        }?;
        iface.send_command(cmd).map_err(Error::Transport)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data).map_err(Error::Transport)
        }
    }
}

impl<'a> BufCommand<'a> {
    /// Datasheet mnemonic of the command, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            BufCommand::SetPositiveGamma(_) => "PVGAMCTRL",
            BufCommand::SetNegativeGamma(_) => "NVGAMCTRL",
            BufCommand::WriteMemory(_) => "RAMWR",
        }
    }

    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::SetPositiveGamma(table) | BufCommand::SetNegativeGamma(table)
                if table.len() != 14 =>
            {
                Err(Error::InvalidParameter)
            }
            BufCommand::SetPositiveGamma(table) => Ok((PVGAMCTRL, table)),
            BufCommand::SetNegativeGamma(table) => Ok((NVGAMCTRL, table)),
            BufCommand::WriteMemory(buf) => Ok((RAMWR, buf)),
        }?;
        iface.send_command(cmd).map_err(Error::Transport)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data).map_err(Error::Transport)
        }
    }
}
