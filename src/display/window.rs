//! Address window abstraction: the column/row ranges written to the controller before a frame
//! memory write, and the streaming of pixel data into that window.

use crate::command::Command;
use crate::interface;
use crate::transform::PhysicalRect;

/// The column and row address ranges for one frame memory write. The orientation's gap offsets
/// are already applied, so these are the values that go on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressWindow {
    pub cols: (u16, u16),
    pub rows: (u16, u16),
}

impl AddressWindow {
    /// Place a physical rectangle at the addressing base given by `gap` (column, row).
    pub fn new(physical: PhysicalRect, gap: (u16, u16)) -> Self {
        AddressWindow {
            cols: (physical.col_start() + gap.0, physical.col_end() + gap.0),
            rows: (physical.row_start() + gap.1, physical.row_end() + gap.1),
        }
    }

    /// The column-address-set and row-address-set commands, in the order they must be sent.
    pub fn commands(&self) -> [Command; 2] {
        [
            Command::SetColumnAddress(self.cols.0, self.cols.1),
            Command::SetRowAddress(self.rows.0, self.rows.1),
        ]
    }
}

/// Send RGB565 pixels from `iter` into an open frame memory write, using constant memory by
/// alternately filling a small chunk buffer from the iterator and writing it to the interface.
pub(crate) fn stream_pixels<DI, I>(iface: &mut DI, mut iter: I) -> Result<(), DI::Error>
where
    DI: interface::DisplayInterface,
    I: Iterator<Item = u16>,
{
    let mut buf = [0u16; 32];
    loop {
        let mut chunk_len = 0;
        for slot in buf.iter_mut() {
            match iter.next() {
                Some(px) => {
                    *slot = px;
                    chunk_len += 1;
                }
                None => break,
            }
        }

        if chunk_len > 0 {
            iface.send_pixels(&buf[..chunk_len])?;
        }

        // A short chunk means the iterator ran dry.
        if chunk_len != buf.len() {
            return Ok(());
        }
    }
}
