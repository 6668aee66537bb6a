//! Mapping of orientation-relative (logical) rectangles onto the panel's native column/row
//! addressing.
//!
//! The panel's native axes never change: `NATIVE_WIDTH` columns by `NATIVE_HEIGHT` rows. For each
//! orientation the logical extent is `hor_res` by `ver_res` from the orientation's profile, and a
//! logical rectangle maps as follows, where W and H are the native dimensions:
//!
//! | Orientation | Columns                         | Rows                            |
//! |-------------|---------------------------------|---------------------------------|
//! | R0          | `x_start..=x_end`               | `y_start..=y_end`               |
//! | R90         | `y_start..=y_end`               | `x_start..=x_end`               |
//! | R180        | `W-1-x_end..=W-1-x_start`       | `H-1-y_end..=H-1-y_start`       |
//! | R270        | `W-1-y_end..=W-1-y_start`       | `H-1-x_end..=H-1-x_start`       |
//!
//! Inverted axes swap which logical endpoint lands on which physical endpoint, so the physical
//! start never exceeds the physical end.

use core::convert::TryFrom;

use crate::command::consts::*;
use crate::orientation::Orientation;

/// A rectangle in the logical coordinate space of some orientation. Bounds are inclusive and
/// 0-based. Coordinates are signed so that callers may describe rectangles hanging off any edge;
/// those are clamped (or rejected, see `ClampPolicy`) before they reach the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogicalRect {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

impl LogicalRect {
    pub fn new(x_start: i32, x_end: i32, y_start: i32, y_end: i32) -> Self {
        LogicalRect {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// The whole logical extent of `orientation`.
    pub fn full(orientation: Orientation) -> Self {
        let p = orientation.profile();
        LogicalRect::new(0, p.hor_res as i32 - 1, 0, p.ver_res as i32 - 1)
    }

    /// Number of columns, or 0 if the rectangle is inverted.
    pub fn width(&self) -> usize {
        saturate(span(self.x_start, self.x_end))
    }

    /// Number of rows, or 0 if the rectangle is inverted.
    pub fn height(&self) -> usize {
        saturate(span(self.y_start, self.y_end))
    }

    /// Number of pixels covered. Saturates at `usize::MAX` for rectangles larger than any buffer.
    pub fn area(&self) -> usize {
        saturate(
            span(self.x_start, self.x_end).saturating_mul(span(self.y_start, self.y_end)),
        )
    }

    /// Shift by a fixed offset. Coordinates saturate at the `i32` range.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        LogicalRect::new(
            self.x_start.saturating_add(dx),
            self.x_end.saturating_add(dx),
            self.y_start.saturating_add(dy),
            self.y_end.saturating_add(dy),
        )
    }

    /// Whether the rectangle is well-formed and lies completely inside the logical extent of
    /// `orientation`.
    pub fn is_within(&self, orientation: Orientation) -> bool {
        let p = orientation.profile();
        self.x_start >= 0
            && self.y_start >= 0
            && self.x_start <= self.x_end
            && self.y_start <= self.y_end
            && self.x_end < p.hor_res as i32
            && self.y_end < p.ver_res as i32
    }

    /// The part of this rectangle that lies inside the logical extent of `orientation`, or `None`
    /// if they do not overlap (or the rectangle is inverted).
    pub fn intersect(&self, orientation: Orientation) -> Option<Self> {
        let p = orientation.profile();
        let clipped = LogicalRect::new(
            self.x_start.max(0),
            self.x_end.min(p.hor_res as i32 - 1),
            self.y_start.max(0),
            self.y_end.min(p.ver_res as i32 - 1),
        );
        if clipped.x_start > clipped.x_end || clipped.y_start > clipped.y_end {
            None
        } else {
            Some(clipped)
        }
    }
}

/// A rectangle in native panel addressing. Only produced by the transform, so the fields are
/// guaranteed to satisfy `col_start <= col_end < NATIVE_WIDTH` and
/// `row_start <= row_end < NATIVE_HEIGHT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalRect {
    col_start: u16,
    col_end: u16,
    row_start: u16,
    row_end: u16,
}

impl PhysicalRect {
    pub fn col_start(&self) -> u16 {
        self.col_start
    }
    pub fn col_end(&self) -> u16 {
        self.col_end
    }
    pub fn row_start(&self) -> u16 {
        self.row_start
    }
    pub fn row_end(&self) -> u16 {
        self.row_end
    }
    pub fn cols(&self) -> (u16, u16) {
        (self.col_start, self.col_end)
    }
    pub fn rows(&self) -> (u16, u16) {
        (self.row_start, self.row_end)
    }
}

/// What to do with a logical rectangle that reaches outside the logical extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClampPolicy {
    /// Silently clip coordinates into range and draw what remains.
    Permissive,
    /// Refuse the rectangle with `Error::OutOfBounds`.
    Strict,
}

impl Default for ClampPolicy {
    fn default() -> Self {
        ClampPolicy::Permissive
    }
}

/// The rectangle was refused by `ClampPolicy::Strict`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfBounds;

/// Inclusive length of `start..=end`, or 0 if inverted.
fn span(start: i32, end: i32) -> u64 {
    if end < start {
        0
    } else {
        (i64::from(end) - i64::from(start)) as u64 + 1
    }
}

fn saturate(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Clip a value between some low and high limit.
fn clip(lo: i32, x: i32, hi: i32) -> i32 {
    match () {
        _ if x > hi => hi,
        _ if x < lo => lo,
        _ => x,
    }
}

/// Map a logical rectangle onto native panel columns and rows for `orientation`.
///
/// Never fails: each coordinate is clipped into the logical extent first, and inverted input
/// ranges are put back in order, so the result always addresses at least one pixel inside the
/// panel.
pub fn to_physical(logical: LogicalRect, orientation: Orientation) -> PhysicalRect {
    let p = orientation.profile();
    let max_x = p.hor_res as i32 - 1;
    let max_y = p.ver_res as i32 - 1;

    let (x0, x1) = (
        logical.x_start.min(logical.x_end),
        logical.x_start.max(logical.x_end),
    );
    let (y0, y1) = (
        logical.y_start.min(logical.y_end),
        logical.y_start.max(logical.y_end),
    );
    let x_start = clip(0, x0, max_x) as u16;
    let x_end = clip(0, x1, max_x) as u16;
    let y_start = clip(0, y0, max_y) as u16;
    let y_end = clip(0, y1, max_y) as u16;

    let (cols, rows) = match orientation {
        Orientation::R0 => ((x_start, x_end), (y_start, y_end)),
        Orientation::R90 => ((y_start, y_end), (x_start, x_end)),
        Orientation::R180 => (
            (PIXEL_COL_MAX - x_end, PIXEL_COL_MAX - x_start),
            (PIXEL_ROW_MAX - y_end, PIXEL_ROW_MAX - y_start),
        ),
        Orientation::R270 => (
            (PIXEL_COL_MAX - y_end, PIXEL_COL_MAX - y_start),
            (PIXEL_ROW_MAX - x_end, PIXEL_ROW_MAX - x_start),
        ),
    };

    PhysicalRect {
        col_start: cols.0,
        col_end: cols.1,
        row_start: rows.0,
        row_end: rows.1,
    }
}

/// Like `to_physical`, but applies `policy` to rectangles that are not entirely inside the logical
/// extent.
pub fn to_physical_checked(
    logical: LogicalRect,
    orientation: Orientation,
    policy: ClampPolicy,
) -> Result<PhysicalRect, OutOfBounds> {
    match policy {
        ClampPolicy::Strict if !logical.is_within(orientation) => Err(OutOfBounds),
        _ => Ok(to_physical(logical, orientation)),
    }
}
