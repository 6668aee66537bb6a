//! A display shared between the rendering context and other tasks, such as a button handler that
//! switches orientation. Access goes through an async mutex, so an orientation switch can never
//! interleave with a flush and a flush always sees one consistent orientation and gap. Interrupts
//! stay enabled while the display is held; only the lock state itself is guarded by a short
//! critical section.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};

use crate::display::Display;
use crate::driver::RenderDriver;
use crate::error::Error;
use crate::flush::FlushTarget;
use crate::interface;
use crate::orientation::Orientation;
use crate::transform::LogicalRect;

pub type SharedGuard<'a, DI, RD> = MutexGuard<'a, CriticalSectionRawMutex, Display<DI, RD>>;

pub struct SharedDisplay<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    inner: Mutex<CriticalSectionRawMutex, Display<DI, RD>>,
}

impl<DI, RD> SharedDisplay<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    pub fn new(display: Display<DI, RD>) -> Self {
        SharedDisplay {
            inner: Mutex::new(display),
        }
    }

    pub fn into_inner(self) -> Display<DI, RD> {
        self.inner.into_inner()
    }

    /// Wait for exclusive access to the display.
    pub async fn lock(&self) -> SharedGuard<'_, DI, RD> {
        self.inner.lock().await
    }

    /// Take exclusive access to the display if no other task holds it.
    pub fn try_lock(&self) -> Result<SharedGuard<'_, DI, RD>, Error<DI::Error>> {
        self.inner.try_lock().map_err(|_| Error::Busy)
    }

    pub async fn set_orientation(&self, orientation: Orientation) -> Result<(), Error<DI::Error>> {
        self.lock().await.set_orientation(orientation)
    }

    pub async fn orientation(&self) -> Orientation {
        self.lock().await.orientation()
    }

    pub async fn flush(&self, area: LogicalRect, pixels: &[u16]) -> Result<(), Error<DI::Error>> {
        let mut display = self.lock().await;
        FlushTarget::flush(&mut *display, area, pixels)
    }
}

/// For rendering libraries that flush from a synchronous callback. A flush arriving while another
/// task holds the display fails with `Error::Busy` and is not acknowledged.
impl<'a, DI, RD> FlushTarget for &'a SharedDisplay<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    type Error = Error<DI::Error>;

    fn flush(&mut self, area: LogicalRect, pixels: &[u16]) -> Result<(), Self::Error> {
        let mut display = self.try_lock().map_err(|e| {
            warn!("flush while the display is held elsewhere");
            e
        })?;
        FlushTarget::flush(&mut *display, area, pixels)
    }
}
