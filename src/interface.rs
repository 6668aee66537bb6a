/// A bus the ST7789 can be driven over. Commands go out with D/C low, parameters and pixel data
/// with D/C high.
pub trait DisplayInterface {
    type Error;

    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Stream RGB565 pixels as part of a frame memory write. The controller expects each 16-bit
    /// word high byte first.
    fn send_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
        let mut buf = [0u8; 64];
        for chunk in pixels.chunks(buf.len() / 2) {
            for (px, out) in chunk.iter().zip(buf.chunks_mut(2)) {
                out.copy_from_slice(&px.to_be_bytes());
            }
            self.send_data(&buf[..chunk.len() * 2])?;
        }
        Ok(())
    }

    /// Finish the pixel transfer started by the last frame memory write. Interfaces which queue
    /// data (DMA, transaction queues) report `WouldBlock` until the bus has drained.
    fn end_transfer(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

pub mod i80 {
    //! The i80 ("8080") interface drives the controller over an 8-bit parallel bus: eight data
    //! lines, a write strobe latched on its rising edge, D/C and an active-low chip select. This
    //! implementation bit-bangs the bus through `embedded_hal` output pins, which is slow but
    //! works with any HAL. The read strobe is not used and should be tied or driven high by the
    //! board setup code.

    use crate::hal::digital::v2::OutputPin;

    use super::DisplayInterface;

    pub struct I80Interface<D, WR, DC, CS> {
        /// Data lines D0 through D7, least significant bit first.
        data: [D; 8],
        /// Write strobe.
        wr: WR,
        /// Data/command select.
        dc: DC,
        /// Active-low chip select, held low for the duration of a command or pixel transfer.
        cs: CS,
        /// Send each RGB565 word high byte first. The controller needs this; turn it off only if
        /// the pixel source already stores big-endian words.
        swap_color_bytes: bool,
        selected: bool,
    }

    impl<D, WR, DC, CS> I80Interface<D, WR, DC, CS>
    where
        D: OutputPin,
        WR: OutputPin<Error = D::Error>,
        DC: OutputPin<Error = D::Error>,
        CS: OutputPin<Error = D::Error>,
    {
        /// Create a new parallel interface. `data` holds the D0-D7 output pins in bit order.
        pub fn new(data: [D; 8], wr: WR, dc: DC, cs: CS) -> Self {
            Self {
                data,
                wr,
                dc,
                cs,
                swap_color_bytes: true,
                selected: false,
            }
        }

        /// Choose whether RGB565 words are sent high byte first (the default).
        pub fn swap_color_bytes(self, swap: bool) -> Self {
            Self {
                swap_color_bytes: swap,
                ..self
            }
        }

        /// Give back the pins.
        pub fn release(self) -> ([D; 8], WR, DC, CS) {
            (self.data, self.wr, self.dc, self.cs)
        }

        fn select(&mut self) -> Result<(), D::Error> {
            if !self.selected {
                self.cs.set_low()?;
                self.selected = true;
            }
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), D::Error> {
            for (bit, pin) in self.data.iter_mut().enumerate() {
                if byte >> bit & 1 == 1 {
                    pin.set_high()?;
                } else {
                    pin.set_low()?;
                }
            }
            self.wr.set_low()?;
            self.wr.set_high()
        }
    }

    impl<D, WR, DC, CS> DisplayInterface for I80Interface<D, WR, DC, CS>
    where
        D: OutputPin,
        WR: OutputPin<Error = D::Error>,
        DC: OutputPin<Error = D::Error>,
        CS: OutputPin<Error = D::Error>,
    {
        type Error = D::Error;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.select()?;
            self.dc.set_low()?;
            self.write_byte(cmd)?;
            self.dc.set_high()
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.select()?;
            self.dc.set_high()?;
            for byte in buf {
                self.write_byte(*byte)?;
            }
            Ok(())
        }

        fn send_pixels(&mut self, pixels: &[u16]) -> Result<(), Self::Error> {
            self.select()?;
            self.dc.set_high()?;
            for px in pixels {
                let bytes = match self.swap_color_bytes {
                    true => px.to_be_bytes(),
                    false => px.to_le_bytes(),
                };
                self.write_byte(bytes[0])?;
                self.write_byte(bytes[1])?;
            }
            Ok(())
        }

        fn end_transfer(&mut self) -> nb::Result<(), Self::Error> {
            self.cs.set_high().map_err(nb::Error::Other)?;
            self.selected = false;
            Ok(())
        }
    }

}
