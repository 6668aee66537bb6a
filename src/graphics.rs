//! Drawing onto the display with `embedded-graphics`. Areas and pixels are in logical coordinates
//! of the active orientation, shifted by the logical offset; anything outside the logical extent
//! is silently cropped, whatever the clamp policy.

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics_core::primitives::Rectangle;
use embedded_graphics_core::Pixel;

use crate::display::{cropped, Display};
use crate::driver::RenderDriver;
use crate::error::Error;
use crate::interface;
use crate::transform::{ClampPolicy, LogicalRect};

impl<DI, RD> OriginDimensions for Display<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    fn size(&self) -> Size {
        let (hor_res, ver_res) = self.resolution();
        Size::new(hor_res as u32, ver_res as u32)
    }
}

impl<DI, RD> DrawTarget for Display<DI, RD>
where
    DI: interface::DisplayInterface,
    RD: RenderDriver,
{
    type Color = Rgb565;
    type Error = Error<DI::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let rect = LogicalRect::new(point.x, point.x, point.y, point.y);
            let visible = match self.target_area(rect, ClampPolicy::Permissive).1 {
                Some(visible) => visible,
                None => continue,
            };
            self.program_window(visible)?;
            self.write_pixels(&[color.into_storage()])?;
            self.finish_transfer()?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let bottom_right = match area.bottom_right() {
            Some(point) => point,
            None => return Ok(()),
        };
        let rect = LogicalRect::new(
            area.top_left.x,
            bottom_right.x,
            area.top_left.y,
            bottom_right.y,
        );
        let (shifted, visible) = self.target_area(rect, ClampPolicy::Permissive);
        let visible = match visible {
            Some(visible) => visible,
            None => return Ok(()),
        };

        self.program_window(visible)?;
        let colors = colors.into_iter().map(|c| c.into_storage());
        if visible == shifted {
            self.write_pixel_iter(colors.take(visible.area()))?;
        } else {
            self.write_pixel_iter(cropped::crop(shifted, visible, colors))?;
        }
        self.finish_transfer()
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.into_storage())
    }
}
