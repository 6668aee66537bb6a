//! The rendering library's side of the display: the driver record it keeps for the panel, which the
//! display must keep in step with the active orientation and must notify when a flush has been
//! fully handed to the panel.

/// A rendering library's display-driver binding.
pub trait RenderDriver {
    /// Logical resolution the library renders at.
    fn set_resolution(&mut self, hor_res: u16, ver_res: u16);

    /// Rotation of the logical space relative to the panel, in degrees.
    fn set_rotation(&mut self, degrees: u16);

    /// The last flushed area has been transferred and its buffer may be reused.
    fn flush_ready(&mut self);
}

/// A driver binding for displays used without a rendering library.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRenderer;

impl RenderDriver for NoRenderer {
    fn set_resolution(&mut self, _hor_res: u16, _ver_res: u16) {}
    fn set_rotation(&mut self, _degrees: u16) {}
    fn flush_ready(&mut self) {}
}

impl<'a, T> RenderDriver for &'a mut T
where
    T: RenderDriver + ?Sized,
{
    fn set_resolution(&mut self, hor_res: u16, ver_res: u16) {
        (**self).set_resolution(hor_res, ver_res)
    }
    fn set_rotation(&mut self, degrees: u16) {
        (**self).set_rotation(degrees)
    }
    fn flush_ready(&mut self) {
        (**self).flush_ready()
    }
}
