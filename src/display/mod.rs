//! The main API to the display driver. `Display` owns the interface and the rendering library's
//! driver binding, tracks the active orientation and its gap, and is the only place that programs
//! the controller's address window.


pub(crate) mod cropped;
pub mod window;

use alloc::vec::Vec;
use core::convert::TryFrom;

use hal::blocking::delay::DelayMs;
use itertools::repeat_n;

use crate::command::*;
use crate::config::{Config, PersistentConfig};
use crate::display::window::AddressWindow;
use crate::driver::RenderDriver;
use crate::error::Error;
use crate::interface;
use crate::orientation::Orientation;
use crate::transform::{to_physical_checked, ClampPolicy, LogicalRect};

/// Time the controller needs after leaving sleep or switching the display on.
const POWER_SETTLE_MS: u8 = 120;

/// A driver for an ST7789 panel.
pub struct Display<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    iface: DI,
    driver: RD,
    persistent_config: PersistentConfig,
    orientation: Orientation,
    gap: (u16, u16),
    /// Set when the controller's addressing state can no longer be trusted, so that the memory
    /// access mode is rewritten before the next address window.
    resync: bool,
}

impl<DI, RD> Display<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    /// Construct a new display driver on interface `iface`, reporting resolution, rotation and
    /// flush completion to `driver`. Nothing is sent until `init`.
    pub fn new(iface: DI, driver: RD) -> Self {
        let persistent_config = Config::new().persistent_config;
        let orientation = persistent_config.orientation;
        let profile = orientation.profile();
        Display {
            iface,
            driver,
            persistent_config,
            orientation,
            gap: (profile.gap_x, profile.gap_y),
            // The memory access mode has never been written.
            resync: true,
        }
    }

    /// Bring the panel out of sleep, send the configuration, switch the display on, and apply the
    /// configured orientation (which also clears the screen to the neutral color).
    pub fn init<D>(&mut self, config: Config, delay: &mut D) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u8>,
    {
        info!("initializing ST7789 panel");
        self.persistent_config = config.persistent_config;
        self.sleep(false)?;
        delay.delay_ms(POWER_SETTLE_MS);
        config.for_each_command(|cmd| self.retry(cmd.name(), |iface| cmd.send(iface)))?;
        self.display_on(true)?;
        delay.delay_ms(POWER_SETTLE_MS);
        self.set_orientation(self.persistent_config.orientation)?;
        info!("ST7789 panel initialized");
        Ok(())
    }

    /// Release the interface and driver binding.
    pub fn release(self) -> (DI, RD) {
        (self.iface, self.driver)
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        self.send(Command::SetSleepMode(enabled))
    }

    /// Control whether the panel shows frame memory or is blanked.
    pub fn display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        self.send(Command::SetDisplayOn(on))
    }

    /// Control color inversion.
    pub fn set_inversion(&mut self, inverted: bool) -> Result<(), Error<DI::Error>> {
        self.send(Command::SetInversion(inverted))
    }

    /// The orientation last written to the controller.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The active gap, as (column, row) addressing offsets.
    pub fn gap(&self) -> (u16, u16) {
        self.gap
    }

    /// The logical resolution of the active orientation, as (horizontal, vertical).
    pub fn resolution(&self) -> (u16, u16) {
        let p = self.orientation.profile();
        (p.hor_res, p.ver_res)
    }

    /// Whether the next address window will be preceded by a rewrite of the memory access mode.
    pub fn needs_resync(&self) -> bool {
        self.resync
    }

    pub fn driver(&self) -> &RD {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut RD {
        &mut self.driver
    }

    /// Switch the panel to `orientation`.
    ///
    /// The memory access mode is written first; if that fails nothing else changes. Then the gap
    /// and orientation are updated, the driver binding is told the new resolution and rotation,
    /// and the whole screen is filled with the neutral color to hide content drawn for the old
    /// orientation.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Error<DI::Error>> {
        info!("setting display orientation to {:?}", orientation);
        let profile = *orientation.profile();
        self.send(Command::SetMemoryAccessControl(profile.madctl))?;
        self.resync = false;

        self.gap = (profile.gap_x, profile.gap_y);
        info!("display gap: x_gap={}, y_gap={}", self.gap.0, self.gap.1);
        self.orientation = orientation;

        self.driver.set_resolution(profile.hor_res, profile.ver_res);
        self.driver.set_rotation(orientation.degrees());
        info!(
            "display resolution: {}x{}, rotation {}",
            profile.hor_res,
            profile.ver_res,
            orientation.degrees()
        );

        self.fill(self.persistent_config.neutral_color)
    }

    /// Switch orientation by raw index (0 to 3). Any other value is rejected without touching the
    /// panel.
    pub fn set_orientation_index(&mut self, index: u8) -> Result<(), Error<DI::Error>> {
        let orientation = Orientation::try_from(index).map_err(|e| {
            error!("invalid orientation index {}", e.0);
            Error::from(e)
        })?;
        self.set_orientation(orientation)
    }

    /// Program the address window for the logical rectangle `logical` under the active
    /// orientation, and open a frame memory write. The configured logical offset is added first.
    /// The caller must stream exactly as many pixels as the clamped rectangle holds and then end
    /// the transfer.
    ///
    /// Commands go out in the order column address, row address, memory write. If any of them
    /// fails the rest are not sent, and the memory access mode is rewritten before the next
    /// window.
    pub fn program_draw_area(&mut self, logical: LogicalRect) -> Result<(), Error<DI::Error>> {
        let logical = self.shifted(logical);
        self.program_window(logical)
    }

    /// `logical` moved by the configured logical offset.
    pub(crate) fn shifted(&self, logical: LogicalRect) -> LogicalRect {
        let (dx, dy) = self.persistent_config.logical_offset;
        logical.offset(dx, dy)
    }

    /// Shift `area` by the logical offset and work out which part of it reaches the panel. Returns
    /// the shifted area along with the part to address: the visible part under `policy`
    /// permissive (`None` when nothing is visible), or the whole shifted area under strict, which
    /// `program_window` then refuses if it reaches outside the extent.
    ///
    /// Pixel data laid out for `area` must be cropped from the shifted area down to the returned
    /// part, so the stream always matches the window.
    pub(crate) fn target_area(
        &self,
        area: LogicalRect,
        policy: ClampPolicy,
    ) -> (LogicalRect, Option<LogicalRect>) {
        let shifted = self.shifted(area);
        match policy {
            ClampPolicy::Permissive => (shifted, shifted.intersect(self.orientation)),
            ClampPolicy::Strict => (shifted, Some(shifted)),
        }
    }

    /// Like `program_draw_area`, for a rectangle the logical offset has already been applied to.
    pub(crate) fn program_window(&mut self, logical: LogicalRect) -> Result<(), Error<DI::Error>> {
        debug!(
            "draw area: x={}..{}, y={}..{} ({:?})",
            logical.x_start, logical.x_end, logical.y_start, logical.y_end, self.orientation
        );

        let physical = to_physical_checked(
            logical,
            self.orientation,
            self.persistent_config.clamp_policy,
        )
        .map_err(|_| {
            error!(
                "draw area x={}..{}, y={}..{} outside {:?} extent",
                logical.x_start, logical.x_end, logical.y_start, logical.y_end, self.orientation
            );
            Error::OutOfBounds
        })?;

        if self.resync {
            warn!("re-synchronizing memory access mode before addressing");
            let madctl = self.orientation.profile().madctl;
            self.send(Command::SetMemoryAccessControl(madctl))?;
            self.resync = false;
        }

        let window = AddressWindow::new(physical, self.gap);
        debug!(
            "address window: cols={}..{}, rows={}..{}",
            window.cols.0, window.cols.1, window.rows.0, window.rows.1
        );
        for cmd in window.commands().iter() {
            self.send(*cmd)?;
        }
        let open = BufCommand::WriteMemory(&[]);
        self.retry(open.name(), |iface| open.send(iface))
    }

    /// Fill the whole screen with `color`. The logical offset does not apply; the window always
    /// covers the full extent of the active orientation.
    ///
    /// A band of rows is built once and streamed repeatedly into a single full-screen window. The
    /// band is bounded by the configured band height and by the transfer size limit; if no row
    /// fits, or the band cannot be allocated, nothing is sent.
    pub fn fill(&mut self, color: u16) -> Result<(), Error<DI::Error>> {
        let (hor_res, ver_res) = self.resolution();
        let row_len = hor_res as usize;
        let band_rows = (self.persistent_config.fill_band_rows as usize)
            .min(self.persistent_config.max_transfer_bytes / (row_len * 2))
            .min(ver_res as usize);
        if band_rows == 0 {
            error!(
                "fill band does not fit a {} byte transfer",
                self.persistent_config.max_transfer_bytes
            );
            return Err(Error::Allocation);
        }

        let band_len = band_rows * row_len;
        let mut band = Vec::new();
        if band.try_reserve_exact(band_len).is_err() {
            error!("failed to allocate fill band of {} pixels", band_len);
            return Err(Error::Allocation);
        }
        band.extend(repeat_n(color, band_len));

        info!(
            "filling {}x{} screen with 0x{:04X} in bands of {} rows",
            hor_res, ver_res, color, band_rows
        );
        self.program_window(LogicalRect::full(self.orientation))?;

        let mut rows_left = ver_res as usize;
        while rows_left > 0 {
            let rows = rows_left.min(band_rows);
            self.write_pixels(&band[..rows * row_len])?;
            rows_left -= rows;
        }
        self.finish_transfer()
    }

    pub(crate) fn clamp_policy(&self) -> ClampPolicy {
        self.persistent_config.clamp_policy
    }

    /// Stream pixels into the open frame memory write, in pieces no larger than the transfer
    /// size limit.
    pub(crate) fn write_pixels(&mut self, pixels: &[u16]) -> Result<(), Error<DI::Error>> {
        let chunk_len = (self.persistent_config.max_transfer_bytes / 2).max(1);
        for chunk in pixels.chunks(chunk_len) {
            self.iface
                .send_pixels(chunk)
                .map_err(|e| self.transport_failed("pixel write", e))?;
        }
        Ok(())
    }

    /// Stream pixels from an iterator into the open frame memory write.
    pub(crate) fn write_pixel_iter<I>(&mut self, pixels: I) -> Result<(), Error<DI::Error>>
    where
        I: Iterator<Item = u16>,
    {
        window::stream_pixels(&mut self.iface, pixels)
            .map_err(|e| self.transport_failed("pixel write", e))
    }

    /// Wait for the interface to finish the current frame memory write, giving up after the
    /// configured number of polls.
    pub(crate) fn finish_transfer(&mut self) -> Result<(), Error<DI::Error>> {
        for _ in 0..self.persistent_config.transfer_poll_limit {
            match self.iface.end_transfer() {
                Ok(()) => return Ok(()),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(self.transport_failed("end of transfer", e)),
            }
        }
        error!(
            "transfer not complete after {} polls",
            self.persistent_config.transfer_poll_limit
        );
        self.resync = true;
        Err(Error::Timeout)
    }

    pub(crate) fn notify_flush_ready(&mut self) {
        self.driver.flush_ready();
    }

    fn send(&mut self, cmd: Command) -> Result<(), Error<DI::Error>> {
        self.retry(cmd.name(), |iface| cmd.send(iface))
    }

    /// Run `op`, repeating it up to the configured number of times while it fails on the
    /// transport. A final transport failure marks the addressing state for re-synchronization.
    fn retry<F>(&mut self, what: &'static str, mut op: F) -> Result<(), Error<DI::Error>>
    where
        F: FnMut(&mut DI) -> Result<(), Error<DI::Error>>,
    {
        let retries = self.persistent_config.transport_retries;
        let mut attempt = 0;
        loop {
            match op(&mut self.iface) {
                Ok(()) => return Ok(()),
                Err(Error::Transport(_)) if attempt < retries => {
                    attempt += 1;
                    warn!("{} failed, retrying ({}/{})", what, attempt, retries);
                }
                Err(Error::Transport(e)) => return Err(self.transport_failed(what, e)),
                Err(e) => {
                    error!("{} rejected by the driver", what);
                    return Err(e);
                }
            }
        }
    }

    fn transport_failed(&mut self, what: &str, e: DI::Error) -> Error<DI::Error> {
        error!("{} failed on the interface", what);
        self.resync = true;
        Error::Transport(e)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::driver::test_driver::{Call, RecordingDriver};
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use std::vec::Vec;

    /// Records the total requested delay.
    #[derive(Default)]
    pub(crate) struct FakeDelay(pub u32);

    impl DelayMs<u8> for FakeDelay {
        fn delay_ms(&mut self, ms: u8) {
            self.0 += ms as u32;
        }
    }

    pub(crate) fn init_display(
        config: Config,
    ) -> (
        TestSpyInterface,
        RecordingDriver,
        Display<TestSpyInterface, RecordingDriver>,
    ) {
        let mut di = TestSpyInterface::new();
        let rd = RecordingDriver::new();
        let mut disp = Display::new(di.split(), rd.split());
        disp.init(config, &mut FakeDelay::default()).unwrap();
        di.clear();
        rd.clear();
        (di, rd, disp)
    }

    fn solid(color: u16, pixels: usize) -> Vec<u8> {
        repeat_n(color.to_be_bytes().to_vec(), pixels)
            .flatten()
            .collect()
    }

    #[test]
    fn init_defaults() {
        let di = TestSpyInterface::new();
        let rd = RecordingDriver::new();
        let mut disp = Display::new(di.split(), rd.split());
        let mut delay = FakeDelay::default();
        disp.init(Config::new(), &mut delay).unwrap();

        let mut expect: Vec<Sent> = sends!(
            0x11, // sleep out
            0x21, // inversion on
            0x3A, [0x55], // 16 bit color
            0x29, // display on
            0x36, [0x68], // landscape memory access mode
            0x2A, [0x00, 0x00, 0x00, 0xA9], // columns 0..169
            0x2B, [0x00, 0x23, 0x01, 0x62], // rows 35..354
            0x2C
        )
        .to_vec();
        expect.push(Sent::Data(solid(0x0000, 320 * 170)));
        expect.push(Sent::EndTransfer);
        di.check_multi(&expect);

        assert_eq!(delay.0, 240);
        assert_eq!(
            rd.calls(),
            vec![Call::Resolution(320, 170), Call::Rotation(90)]
        );
        assert_eq!(disp.orientation(), Orientation::R90);
        assert_eq!(disp.gap(), (0, 35));
        assert_eq!(disp.resolution(), (320, 170));
        assert!(!disp.needs_resync());
    }

    #[test]
    fn init_with_orientation_and_tuning() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), RecordingDriver::new());
        let cfg = Config::new()
            .orientation(Orientation::R0)
            .neutral_color(0xFFFF)
            .vcom(0x19);
        disp.init(cfg, &mut FakeDelay::default()).unwrap();
        assert_eq!(
            di.commands(),
            vec![0x11, 0x21, 0x3A, 0xBB, 0x29, 0x36, 0x2A, 0x2B, 0x2C]
        );
        assert_eq!(disp.orientation(), Orientation::R0);
        assert_eq!(disp.gap(), (35, 0));
        match di.sent().iter().rev().nth(1) {
            Some(Sent::Data(d)) => assert_eq!(d, &solid(0xFFFF, 170 * 320)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn init_stops_at_first_failure() {
        let mut di = TestSpyInterface::new();
        di.fail_command(0x3A, 1);
        let mut disp = Display::new(di.split(), RecordingDriver::new());
        let res = disp.init(Config::new(), &mut FakeDelay::default());
        assert_eq!(res, Err(Error::Transport(crate::interface::test_spy::SpyError)));
        assert_eq!(di.commands(), vec![0x11, 0x21]);
        assert!(disp.needs_resync());
    }

    #[test]
    fn init_retries_single_command() {
        let mut di = TestSpyInterface::new();
        di.fail_command(0x3A, 1);
        let mut disp = Display::new(di.split(), RecordingDriver::new());
        let cfg = Config::new().transport_retries(1);
        disp.init(cfg, &mut FakeDelay::default()).unwrap();
        // Only the pixel format command is repeated, not the commands before it.
        assert_eq!(
            di.commands(),
            vec![0x11, 0x21, 0x3A, 0x29, 0x36, 0x2A, 0x2B, 0x2C]
        );
        assert!(!disp.needs_resync());
    }

    #[test]
    fn orientation_switch_steps() {
        let (di, rd, mut disp) = init_display(Config::new());
        disp.set_orientation(Orientation::R180).unwrap();

        let mut expect: Vec<Sent> = sends!(
            0x36, [0xC8],
            0x2A, [0x00, 0x23, 0x00, 0xCC], // columns 35..204
            0x2B, [0x00, 0x00, 0x01, 0x3F], // rows 0..319
            0x2C
        )
        .to_vec();
        expect.push(Sent::Data(solid(0x0000, 170 * 320)));
        expect.push(Sent::EndTransfer);
        di.check_multi(&expect);
        assert_eq!(
            rd.calls(),
            vec![Call::Resolution(170, 320), Call::Rotation(180)]
        );
        assert_eq!(disp.gap(), (35, 0));
        assert_eq!(disp.resolution(), (170, 320));
    }

    #[test]
    fn orientation_round_trip() {
        let (di, _rd, mut disp) = init_display(Config::new());
        #[cfg_attr(rustfmt, rustfmt_skip)]
        let steps = [
            (Orientation::R0, 0x08, (35, 0)),
            (Orientation::R90, 0x68, (0, 35)),
            (Orientation::R180, 0xC8, (35, 0)),
            (Orientation::R270, 0xA8, (0, 35)),
            (Orientation::R0, 0x08, (35, 0)),
        ];
        for &(o, madctl, gap) in steps.iter() {
            let mut di = di.split();
            di.clear();
            disp.set_orientation(o).unwrap();
            assert_eq!(di.sent()[..2], sends!(0x36, [madctl])[..]);
            assert_eq!(disp.gap(), gap);
            assert_eq!(disp.orientation(), o);
        }
    }

    #[test]
    fn same_orientation_is_idempotent() {
        let (mut di, rd, mut disp) = init_display(Config::new());
        let rect = LogicalRect::new(10, 50, 20, 60);

        disp.set_orientation(Orientation::R90).unwrap();
        let first_switch = di.sent();
        di.clear();
        disp.program_draw_area(rect).unwrap();
        let first_window = di.sent();

        di.clear();
        disp.set_orientation(Orientation::R90).unwrap();
        assert_eq!(di.sent(), first_switch);
        di.clear();
        disp.program_draw_area(rect).unwrap();
        assert_eq!(di.sent(), first_window);

        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2A, [0x00, 20, 0x00, 60],
            0x2B, [0x00, 45, 0x00, 85],
            0x2C
        ));
        assert_eq!(disp.gap(), (0, 35));
        assert_eq!(
            rd.calls(),
            vec![
                Call::Resolution(320, 170),
                Call::Rotation(90),
                Call::Resolution(320, 170),
                Call::Rotation(90),
            ]
        );
    }

    #[test]
    fn invalid_orientation_index() {
        let (di, rd, mut disp) = init_display(Config::new());
        assert_eq!(
            disp.set_orientation_index(4),
            Err(Error::InvalidOrientation(4))
        );
        assert!(di.sent().is_empty());
        assert!(rd.calls().is_empty());
        assert_eq!(disp.orientation(), Orientation::R90);

        disp.set_orientation_index(3).unwrap();
        assert_eq!(disp.orientation(), Orientation::R270);
    }

    #[test]
    fn failed_madctl_leaves_state() {
        let (mut di, rd, mut disp) = init_display(Config::new());
        di.fail_command(0x36, 1);
        assert!(disp.set_orientation(Orientation::R0).is_err());
        assert!(di.sent().is_empty());
        assert!(rd.calls().is_empty());
        assert_eq!(disp.orientation(), Orientation::R90);
        assert_eq!(disp.gap(), (0, 35));
        assert!(disp.needs_resync());
    }

    #[test]
    fn draw_area_r90() {
        let (di, _rd, mut disp) = init_display(Config::new());
        disp.program_draw_area(LogicalRect::new(10, 50, 20, 60))
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2A, [0x00, 20, 0x00, 60],
            0x2B, [0x00, 45, 0x00, 85],
            0x2C
        ));
    }

    #[test]
    fn draw_area_r180() {
        let (di, _rd, mut disp) = init_display(Config::new().orientation(Orientation::R180));
        disp.program_draw_area(LogicalRect::new(10, 50, 20, 60))
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2A, [0x00, 154, 0x00, 194], // 119..159 plus gap
            0x2B, [0x01, 0x03, 0x01, 0x2B], // 259..299
            0x2C
        ));
    }

    #[test]
    fn draw_area_offset() {
        let (di, _rd, mut disp) = init_display(
            Config::new()
                .orientation(Orientation::R0)
                .logical_offset(2, 3),
        );
        disp.program_draw_area(LogicalRect::new(0, 9, 0, 9)).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2A, [0x00, 37, 0x00, 46],
            0x2B, [0x00, 3, 0x00, 12],
            0x2C
        ));
    }

    #[test]
    fn draw_area_permissive_clamps() {
        let (di, _rd, mut disp) = init_display(Config::new().orientation(Orientation::R0));
        disp.program_draw_area(LogicalRect::new(-5, 200, 300, 400))
            .unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x2A, [0x00, 35, 0x00, 204],
            0x2B, [0x01, 0x2C, 0x01, 0x3F],
            0x2C
        ));
    }

    #[test]
    fn draw_area_strict_rejects() {
        let (di, _rd, mut disp) = init_display(Config::new().clamp_policy(ClampPolicy::Strict));
        assert_eq!(
            disp.program_draw_area(LogicalRect::new(0, 320, 0, 10)),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            disp.program_draw_area(LogicalRect::new(-1, 10, 0, 10)),
            Err(Error::OutOfBounds)
        );
        assert!(di.sent().is_empty());
        assert!(!disp.needs_resync());
        disp.program_draw_area(LogicalRect::new(0, 319, 0, 169))
            .unwrap();
        assert_eq!(di.commands(), vec![0x2A, 0x2B, 0x2C]);
    }

    #[test]
    fn failed_row_address_skips_memory_write() {
        let (mut di, _rd, mut disp) = init_display(Config::new());
        di.fail_command(0x2B, 1);
        assert!(disp
            .program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .is_err());
        assert_eq!(di.commands(), vec![0x2A]);
        assert!(disp.needs_resync());
    }

    #[test]
    fn resync_after_failure() {
        let (mut di, _rd, mut disp) = init_display(Config::new());
        di.fail_command(0x2A, 1);
        assert!(disp
            .program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .is_err());
        di.clear();

        disp.program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .unwrap();
        assert_eq!(di.commands(), vec![0x36, 0x2A, 0x2B, 0x2C]);
        di.check(0x2C, &[]);
        assert!(!disp.needs_resync());

        di.clear();
        disp.program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .unwrap();
        assert_eq!(di.commands(), vec![0x2A, 0x2B, 0x2C]);
    }

    #[test]
    fn transport_retries() {
        let (mut di, _rd, mut disp) = init_display(Config::new().transport_retries(2));
        di.fail_command(0x2A, 2);
        disp.program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .unwrap();
        assert_eq!(di.commands(), vec![0x2A, 0x2B, 0x2C]);
        assert!(!disp.needs_resync());

        di.clear();
        di.fail_command(0x2B, 3);
        assert!(disp
            .program_draw_area(LogicalRect::new(0, 10, 0, 10))
            .is_err());
        assert_eq!(di.commands(), vec![0x2A]);
        assert!(disp.needs_resync());
    }

    #[test]
    fn fill_in_bands() {
        let (di, _rd, mut disp) = init_display(Config::new().fill_band_rows(7));
        disp.fill(0x07E0).unwrap();
        let mut expect: Vec<Sent> = sends!(
            0x2A, [0x00, 0x00, 0x00, 0xA9],
            0x2B, [0x00, 0x23, 0x01, 0x62],
            0x2C
        )
        .to_vec();
        expect.push(Sent::Data(solid(0x07E0, 320 * 170)));
        expect.push(Sent::EndTransfer);
        di.check_multi(&expect);
    }

    #[test]
    fn fill_ignores_logical_offset() {
        let (di, _rd, mut disp) = init_display(
            Config::new()
                .orientation(Orientation::R0)
                .logical_offset(5, 5),
        );
        disp.fill(0x0000).unwrap();
        match &di.sent()[..] {
            [Sent::Cmd(0x2A), Sent::Data(cols), Sent::Cmd(0x2B), Sent::Data(rows), Sent::Cmd(0x2C), Sent::Data(d), Sent::EndTransfer] =>
            {
                assert_eq!(cols, &vec![0x00, 35, 0x00, 204]);
                assert_eq!(rows, &vec![0x00, 0x00, 0x01, 0x3F]);
                assert_eq!(d.len(), 170 * 320 * 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fill_band_limited_by_transfer_size() {
        // One row is 640 bytes in landscape, so a 1000 byte limit allows single-row bands.
        let (di, _rd, mut disp) = init_display(Config::new().max_transfer_bytes(1000));
        disp.fill(0xFFFF).unwrap();
        match &di.sent()[..] {
            [.., Sent::Data(d), Sent::EndTransfer] => assert_eq!(d, &solid(0xFFFF, 320 * 170)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fill_without_room_for_a_row() {
        let (di, _rd, mut disp) = init_display(Config::new());
        // Below one landscape row.
        disp.persistent_config.max_transfer_bytes = 600;
        assert_eq!(disp.fill(0), Err(Error::Allocation));
        assert!(di.sent().is_empty());
    }

    #[test]
    fn fill_transport_failure() {
        let (mut di, _rd, mut disp) = init_display(Config::new());
        // Let the two address parameter phases through.
        di.fail_data_after(2, 1);
        assert!(disp.fill(0).is_err());
        assert_eq!(di.commands(), vec![0x2A, 0x2B, 0x2C]);
        assert!(!di.sent().contains(&Sent::EndTransfer));
        assert!(disp.needs_resync());
    }

    #[test]
    fn transfer_timeout() {
        let (mut di, _rd, mut disp) = init_display(Config::new().transfer_poll_limit(5));
        di.busy_polls(5);
        assert_eq!(disp.fill(0), Err(Error::Timeout));
        assert!(disp.needs_resync());

        di.clear();
        di.busy_polls(4);
        disp.fill(0).unwrap();
        assert_eq!(di.commands(), vec![0x36, 0x2A, 0x2B, 0x2C]);
        assert_eq!(di.sent().last(), Some(&Sent::EndTransfer));
    }

    #[test]
    fn power_and_inversion() {
        let (di, _rd, mut disp) = init_display(Config::new());
        disp.sleep(true).unwrap();
        disp.display_on(false).unwrap();
        disp.set_inversion(false).unwrap();
        disp.display_on(true).unwrap();
        disp.sleep(false).unwrap();
        assert_eq!(di.commands(), vec![0x10, 0x28, 0x20, 0x29, 0x11]);
    }

    #[test]
    fn draw_before_init_writes_memory_access_mode() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), RecordingDriver::new());
        assert!(disp.needs_resync());
        disp.program_draw_area(LogicalRect::new(0, 0, 0, 0)).unwrap();
        assert_eq!(di.commands(), vec![0x36, 0x2A, 0x2B, 0x2C]);
    }
}
