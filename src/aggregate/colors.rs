// Dominant color selection.

use crate::models::Color;

/// The color with the largest pixel fraction.
///
/// A later color only wins when its fraction is strictly greater, so the
/// first of several equal candidates is kept. Returns `None` for an empty slice.
pub fn most_dominant(colors: &[Color]) -> Option<&Color> {
    let mut iter = colors.iter();
    let mut best = iter.next()?;
    for color in iter {
        if color.pixel_fraction > best.pixel_fraction {
            best = color;
        }
    }
    Some(best)
}
