//! The four fixed display orientations and the static register/resolution/gap profile each one
//! puts the panel into.

use core::convert::TryFrom;

use crate::command::consts::*;

/// Logical rotation of the image relative to the panel's native (portrait) addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Native portrait, 170 wide by 320 high.
    R0,
    /// Landscape, 320 wide by 170 high.
    R90,
    /// Portrait, upside down.
    R180,
    /// Landscape, upside down.
    R270,
}

/// Everything that changes on the panel and in the rendering library when the orientation does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientationProfile {
    /// Value for the memory data access control register (0x36). Bit 7 mirrors rows, bit 6
    /// mirrors columns, bit 5 swaps rows and columns, bit 3 selects BGR channel order.
    pub madctl: u8,
    /// Logical width reported to the rendering library.
    pub hor_res: u16,
    /// Logical height reported to the rendering library.
    pub ver_res: u16,
    /// Column offset of the visible glass inside controller RAM.
    pub gap_x: u16,
    /// Row offset of the visible glass inside controller RAM.
    pub gap_y: u16,
}

const PORTRAIT_GAP: (u16, u16) = (35, 0);
const LANDSCAPE_GAP: (u16, u16) = (0, 35);

static PROFILES: [OrientationProfile; 4] = [
    OrientationProfile {
        madctl: 0x08,
        hor_res: NATIVE_WIDTH,
        ver_res: NATIVE_HEIGHT,
        gap_x: PORTRAIT_GAP.0,
        gap_y: PORTRAIT_GAP.1,
    },
    OrientationProfile {
        madctl: 0x68,
        hor_res: NATIVE_HEIGHT,
        ver_res: NATIVE_WIDTH,
        gap_x: LANDSCAPE_GAP.0,
        gap_y: LANDSCAPE_GAP.1,
    },
    OrientationProfile {
        madctl: 0xC8,
        hor_res: NATIVE_WIDTH,
        ver_res: NATIVE_HEIGHT,
        gap_x: PORTRAIT_GAP.0,
        gap_y: PORTRAIT_GAP.1,
    },
    OrientationProfile {
        madctl: 0xA8,
        hor_res: NATIVE_HEIGHT,
        ver_res: NATIVE_WIDTH,
        gap_x: LANDSCAPE_GAP.0,
        gap_y: LANDSCAPE_GAP.1,
    },
];

impl Orientation {
    /// All orientations in rotation order.
    pub const ALL: [Orientation; 4] = [
        Orientation::R0,
        Orientation::R90,
        Orientation::R180,
        Orientation::R270,
    ];

    /// Position in rotation order, 0 through 3.
    pub fn index(self) -> u8 {
        match self {
            Orientation::R0 => 0,
            Orientation::R90 => 1,
            Orientation::R180 => 2,
            Orientation::R270 => 3,
        }
    }

    /// Clockwise rotation in degrees.
    pub fn degrees(self) -> u16 {
        self.index() as u16 * 90
    }

    /// The static profile for this orientation.
    pub fn profile(self) -> &'static OrientationProfile {
        &PROFILES[self.index() as usize]
    }

    /// Whether the logical axes are swapped relative to the native ones.
    pub fn is_landscape(self) -> bool {
        match self {
            Orientation::R90 | Orientation::R270 => true,
            Orientation::R0 | Orientation::R180 => false,
        }
    }

    /// Parse a rotation given in degrees. Only exact multiples of 90 below 360 are accepted.
    pub fn from_degrees(degrees: u16) -> Result<Self, InvalidOrientation> {
        match degrees {
            0 => Ok(Orientation::R0),
            90 => Ok(Orientation::R90),
            180 => Ok(Orientation::R180),
            270 => Ok(Orientation::R270),
            _ => Err(InvalidOrientation(degrees)),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::R90
    }
}

/// A raw orientation value outside the four defined rotations. Carries the value as given: an
/// index for `TryFrom<u8>`, degrees for `from_degrees`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidOrientation(pub u16);

impl TryFrom<u8> for Orientation {
    type Error = InvalidOrientation;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Orientation::R0),
            1 => Ok(Orientation::R90),
            2 => Ok(Orientation::R180),
            3 => Ok(Orientation::R270),
            _ => Err(InvalidOrientation(u16::from(index))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_table() {
        let r0 = Orientation::R0.profile();
        assert_eq!((r0.madctl, r0.hor_res, r0.ver_res), (0x08, 170, 320));
        assert_eq!((r0.gap_x, r0.gap_y), (35, 0));

        let r90 = Orientation::R90.profile();
        assert_eq!((r90.madctl, r90.hor_res, r90.ver_res), (0x68, 320, 170));
        assert_eq!((r90.gap_x, r90.gap_y), (0, 35));

        let r180 = Orientation::R180.profile();
        assert_eq!((r180.madctl, r180.hor_res, r180.ver_res), (0xC8, 170, 320));
        assert_eq!((r180.gap_x, r180.gap_y), (35, 0));

        let r270 = Orientation::R270.profile();
        assert_eq!((r270.madctl, r270.hor_res, r270.ver_res), (0xA8, 320, 170));
        assert_eq!((r270.gap_x, r270.gap_y), (0, 35));
    }

    #[test]
    fn landscape_profiles_swap_resolution() {
        for o in Orientation::ALL.iter() {
            let p = o.profile();
            if o.is_landscape() {
                assert_eq!((p.hor_res, p.ver_res), (NATIVE_HEIGHT, NATIVE_WIDTH));
                // Row/column exchange bit.
                assert_eq!(p.madctl & 0x20, 0x20);
            } else {
                assert_eq!((p.hor_res, p.ver_res), (NATIVE_WIDTH, NATIVE_HEIGHT));
                assert_eq!(p.madctl & 0x20, 0);
            }
            // BGR order on every orientation.
            assert_eq!(p.madctl & 0x08, 0x08);
        }
    }

    #[test]
    fn index_and_degrees() {
        assert_eq!(Orientation::R0.degrees(), 0);
        assert_eq!(Orientation::R90.degrees(), 90);
        assert_eq!(Orientation::R180.degrees(), 180);
        assert_eq!(Orientation::R270.degrees(), 270);
        for o in Orientation::ALL.iter() {
            assert_eq!(Orientation::try_from(o.index()), Ok(*o));
            assert_eq!(Orientation::from_degrees(o.degrees()), Ok(*o));
        }
    }

    #[test]
    fn invalid_values_rejected() {
        assert_eq!(Orientation::try_from(4), Err(InvalidOrientation(4)));
        assert_eq!(Orientation::try_from(255), Err(InvalidOrientation(255)));
        assert_eq!(Orientation::from_degrees(45), Err(InvalidOrientation(45)));
        assert_eq!(Orientation::from_degrees(360), Err(InvalidOrientation(360)));
        assert_eq!(
            Orientation::from_degrees(u16::MAX),
            Err(InvalidOrientation(u16::MAX))
        );
    }

    #[test]
    fn default_is_landscape() {
        assert_eq!(Orientation::default(), Orientation::R90);
    }
}
