//! Defines the configuration the display is brought up with: the panel tuning commands sent once
//! at init time, and the settings that govern addressing, transfers and error recovery for the
//! lifetime of the `Display`.

use crate::command::consts::*;
use crate::command::*;
use crate::error::Error;
use crate::interface;
use crate::orientation::Orientation;
use crate::transform::ClampPolicy;

/// The portion of the configuration that stays inside the `Display` after `Display::init`,
/// because it is consulted on every draw, fill or orientation change.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PersistentConfig {
    pub(crate) orientation: Orientation,
    pub(crate) clamp_policy: ClampPolicy,
    pub(crate) logical_offset: (i32, i32),
    pub(crate) transport_retries: u8,
    pub(crate) transfer_poll_limit: u32,
    pub(crate) neutral_color: u16,
    pub(crate) fill_band_rows: u16,
    pub(crate) max_transfer_bytes: usize,
}

/// A configuration for the display. Builder methods offer a declarative way to either send a
/// tuning command at init time or to leave the register at the chip's power-on default, and to
/// adjust how the driver addresses the panel.
pub struct Config {
    pub(crate) persistent_config: PersistentConfig,
    inversion: bool,
    tearing_effect_cmd: Option<Command>,
    porch_control_cmd: Option<Command>,
    gate_control_cmd: Option<Command>,
    vcom_cmd: Option<Command>,
    lcm_control_cmd: Option<Command>,
    vdv_vrh_enable_cmd: Option<Command>,
    vrh_cmd: Option<Command>,
    vdv_cmd: Option<Command>,
    frame_rate_cmd: Option<Command>,
    power_control_cmd: Option<Command>,
    positive_gamma: Option<[u8; 14]>,
    negative_gamma: Option<[u8; 14]>,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a new configuration with the reference behavior: landscape (R90) orientation,
    /// permissive clamping, no logical offset, no transport retries, color inversion enabled, and
    /// every tuning register left at its power-on value.
    pub fn new() -> Self {
        Config {
            persistent_config: PersistentConfig {
                orientation: Orientation::R90,
                clamp_policy: ClampPolicy::Permissive,
                logical_offset: (0, 0),
                transport_retries: 0,
                transfer_poll_limit: 10_000,
                neutral_color: 0x0000,
                fill_band_rows: 40,
                max_transfer_bytes: FRAME_BYTES,
            },
            inversion: true,
            tearing_effect_cmd: None,
            porch_control_cmd: None,
            gate_control_cmd: None,
            vcom_cmd: None,
            lcm_control_cmd: None,
            vdv_vrh_enable_cmd: None,
            vrh_cmd: None,
            vdv_cmd: None,
            frame_rate_cmd: None,
            power_control_cmd: None,
            positive_gamma: None,
            negative_gamma: None,
        }
    }

    /// Tuning values for the LilyGO T-Display-S3 1.9" module.
    pub fn t_display_s3() -> Self {
        let gamma = [
            0xD0, 0x08, 0x11, 0x08, 0x09, 0x15, 0x31, 0x33, 0x48, 0x17, 0x14, 0x15, 0x31, 0x34,
        ];
        Config::new()
            .tearing_effect(Some(TearingEffect::VBlank))
            .porch_control(0x0C, 0x0C)
            .gate_control(0x35)
            .vcom(0x19)
            .lcm_control(0x2C)
            .vdv_vrh_enable(true)
            .vrh(0x12)
            .vdv(0x20)
            .frame_rate(0x0F)
            .power_control(0xA1)
            .gamma(gamma, gamma)
    }

    /// Orientation applied at the end of `Display::init`.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.persistent_config.orientation = orientation;
        self
    }

    /// How rectangles reaching outside the logical extent are treated. See `ClampPolicy`.
    pub fn clamp_policy(mut self, policy: ClampPolicy) -> Self {
        self.persistent_config.clamp_policy = policy;
        self
    }

    /// A fixed offset added to every logical rectangle before it is transformed, for modules
    /// whose glass is shifted against the logical origin.
    pub fn logical_offset(mut self, dx: i32, dy: i32) -> Self {
        self.persistent_config.logical_offset = (dx, dy);
        self
    }

    /// Number of times a command is re-sent after a transport error before the error is
    /// surfaced. Zero keeps the fail-fast behavior.
    pub fn transport_retries(mut self, retries: u8) -> Self {
        self.persistent_config.transport_retries = retries;
        self
    }

    /// How many times the end of a pixel transfer is polled before giving up with
    /// `Error::Timeout`. Must be at least 1.
    pub fn transfer_poll_limit(mut self, polls: u32) -> Self {
        self.persistent_config.transfer_poll_limit = polls.max(1);
        self
    }

    /// RGB565 color used to wipe the panel after an orientation change.
    pub fn neutral_color(mut self, color: u16) -> Self {
        self.persistent_config.neutral_color = color;
        self
    }

    /// Height in rows of the scratch band a full-screen fill streams from.
    pub fn fill_band_rows(mut self, rows: u16) -> Self {
        self.persistent_config.fill_band_rows = rows.max(1);
        self
    }

    /// Largest single pixel transfer the bus accepts, in bytes. Longer pixel streams are split.
    pub fn max_transfer_bytes(mut self, bytes: usize) -> Self {
        self.persistent_config.max_transfer_bytes = bytes;
        self
    }

    /// Whether to enable color inversion at init. This module needs it on (the default).
    pub fn inversion(self, inversion: bool) -> Self {
        Self { inversion, ..self }
    }

    /// Extend this `Config` to configure the tearing effect line. See
    /// `Command::SetTearingEffect`.
    pub fn tearing_effect(self, mode: Option<TearingEffect>) -> Self {
        Self {
            tearing_effect_cmd: Some(Command::SetTearingEffect(mode)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure porches. See `Command::SetPorchControl`.
    pub fn porch_control(self, back: u8, front: u8) -> Self {
        Self {
            porch_control_cmd: Some(Command::SetPorchControl(back, front)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure gate voltages. See
    /// `Command::SetGateControl`.
    pub fn gate_control(self, gate: u8) -> Self {
        Self {
            gate_control_cmd: Some(Command::SetGateControl(gate)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure VCOM. See `Command::SetVcom`.
    pub fn vcom(self, vcom: u8) -> Self {
        Self {
            vcom_cmd: Some(Command::SetVcom(vcom)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure LCM control. See `Command::SetLcmControl`.
    pub fn lcm_control(self, lcm: u8) -> Self {
        Self {
            lcm_control_cmd: Some(Command::SetLcmControl(lcm)),
            ..self
        }
    }

    /// Extend this `Config` to select where VDV and VRH come from. See
    /// `Command::SetVdvVrhEnable`.
    pub fn vdv_vrh_enable(self, from_command: bool) -> Self {
        Self {
            vdv_vrh_enable_cmd: Some(Command::SetVdvVrhEnable(from_command)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure VRH. See `Command::SetVrh`.
    pub fn vrh(self, vrh: u8) -> Self {
        Self {
            vrh_cmd: Some(Command::SetVrh(vrh)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure VDV. See `Command::SetVdv`.
    pub fn vdv(self, vdv: u8) -> Self {
        Self {
            vdv_cmd: Some(Command::SetVdv(vdv)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure the frame rate. See
    /// `Command::SetFrameRate`.
    pub fn frame_rate(self, rate: u8) -> Self {
        Self {
            frame_rate_cmd: Some(Command::SetFrameRate(rate)),
            ..self
        }
    }

    /// Extend this `Config` to explicitly configure power control. See
    /// `Command::SetPowerControl`.
    pub fn power_control(self, power: u8) -> Self {
        Self {
            power_control_cmd: Some(Command::SetPowerControl(power)),
            ..self
        }
    }

    /// Extend this `Config` to load positive and negative gamma tables. See
    /// `BufCommand::SetPositiveGamma`.
    pub fn gamma(self, positive: [u8; 14], negative: [u8; 14]) -> Self {
        Self {
            positive_gamma: Some(positive),
            negative_gamma: Some(negative),
            ..self
        }
    }

    /// Hand the inversion, tearing effect, pixel format and tuning commands encoded in `self` to
    /// `f` one at a time, in the order the controller's power-on sequence expects them. Stops at
    /// the first error.
    pub(crate) fn for_each_command<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(InitCommand) -> Result<(), E>,
    {
        f(InitCommand::Plain(Command::SetInversion(self.inversion)))?;
        let tuning = [
            self.tearing_effect_cmd,
            Some(Command::SetPixelFormat(PixelFormat::Rgb565)),
            self.porch_control_cmd,
            self.gate_control_cmd,
            self.vcom_cmd,
            self.lcm_control_cmd,
            self.vdv_vrh_enable_cmd,
            self.vrh_cmd,
            self.vdv_cmd,
            self.frame_rate_cmd,
            self.power_control_cmd,
        ];
        for cmd in tuning.iter().filter_map(|c| *c) {
            f(InitCommand::Plain(cmd))?;
        }
        self.positive_gamma
            .as_ref()
            .map_or(Ok(()), |t| f(InitCommand::Table(BufCommand::SetPositiveGamma(t))))?;
        self.negative_gamma
            .as_ref()
            .map_or(Ok(()), |t| f(InitCommand::Table(BufCommand::SetNegativeGamma(t))))
    }
}

/// One command of the init-time configuration.
#[derive(Clone, Copy, Debug)]
pub(crate) enum InitCommand<'a> {
    Plain(Command),
    Table(BufCommand<'a>),
}

impl<'a> InitCommand<'a> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            InitCommand::Plain(cmd) => cmd.name(),
            InitCommand::Table(cmd) => cmd.name(),
        }
    }

    pub(crate) fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        match self {
            InitCommand::Plain(cmd) => cmd.send(iface),
            InitCommand::Table(cmd) => cmd.send(iface),
        }
    }
}
