//! Cropping of pixel data whose area extends past the visible panel, so that only the pixels
//! inside the visible part are streamed into the (smaller) address window.

use crate::transform::LogicalRect;

/// Filter the row-major `pixels` of `area` down to the ones inside `visible`, preserving order.
/// `visible` must be contained in `area`.
pub(crate) fn crop<I>(
    area: LogicalRect,
    visible: LogicalRect,
    pixels: I,
) -> impl Iterator<Item = u16>
where
    I: Iterator<Item = u16>,
{
    iproduct!(area.y_start..=area.y_end, area.x_start..=area.x_end)
        .zip(pixels)
        .filter(move |&((y, x), _)| {
            x >= visible.x_start
                && x <= visible.x_end
                && y >= visible.y_start
                && y <= visible.y_end
        })
        .map(|(_, px)| px)
}
