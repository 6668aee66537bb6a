//! The flush adapter: hands a rendering library's dirty rectangle and its pixels to the panel, and
//! tells the library when the buffer may be reused.

use crate::display::{cropped, Display};
use crate::driver::RenderDriver;
use crate::error::Error;
use crate::interface;
use crate::transform::LogicalRect;

/// Something a rendering library can flush rendered areas to.
pub trait FlushTarget {
    type Error;

    /// Write `pixels`, row-major RGB565 values covering `area` in logical coordinates, to the
    /// panel. On success the driver binding has been notified that the flush is complete.
    fn flush(&mut self, area: LogicalRect, pixels: &[u16]) -> Result<(), Self::Error>;
}

impl<DI, RD> FlushTarget for Display<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    type Error = Error<DI::Error>;

    /// The logical offset is applied to `area` before anything else. With the permissive clamp
    /// policy, parts of the shifted area outside the logical extent are cropped
    /// from the pixel data, and an area entirely off-screen is acknowledged without touching the
    /// panel. With the strict policy such areas are rejected.
    ///
    /// The completion notification is only given after the whole transfer has ended. A failure
    /// leaves the flush unacknowledged.
    fn flush(&mut self, area: LogicalRect, pixels: &[u16]) -> Result<(), Self::Error> {
        debug!(
            "flush: x={}..{}, y={}..{}",
            area.x_start, area.x_end, area.y_start, area.y_end
        );
        let expected = area.area();
        if pixels.len() != expected {
            error!(
                "flush buffer holds {} pixels, area needs {}",
                pixels.len(),
                expected
            );
            return Err(Error::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        let (shifted, visible) = self.target_area(area, self.clamp_policy());
        let visible = match visible {
            Some(visible) => visible,
            None => {
                debug!("flush area entirely off-screen");
                self.notify_flush_ready();
                return Ok(());
            }
        };

        self.program_window(visible)?;
        if visible == shifted && shifted.area() == pixels.len() {
            self.write_pixels(pixels)?;
        } else {
            self.write_pixel_iter(cropped::crop(shifted, visible, pixels.iter().cloned()))?;
        }
        self.finish_transfer()?;
        self.notify_flush_ready();
        Ok(())
    }
}
