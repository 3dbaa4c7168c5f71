//! Sensor space to display space.
//!
//! The panel reports points and swipe directions in its own orientation. When
//! the display is mounted rotated, both have to be remapped by the same number
//! of quarter turns.

use super::Gesture;

/// Display orientation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}

impl From<u8> for Rotation {
    /// Wraps around, so 5 quarter turns is the same as 1.
    fn from(quarter_turns: u8) -> Self {
        match quarter_turns % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }
}

/// Display size in pixels, as seen with rotation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplaySize {
    pub width: u16,
    pub height: u16,
}

impl DisplaySize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Rotation {
    pub fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// Rotation that undoes this one.
    pub fn inverse(self) -> Self {
        Rotation::from(4 - self.quarter_turns())
    }

    /// Only the four swipes are directional, every other gesture is returned as is.
    pub fn rotate_gesture(self, gesture: Gesture) -> Gesture {
        use Gesture::*;

        match (self, gesture) {
            (Rotation::Deg90, SwipeUp) => SwipeLeft,
            (Rotation::Deg90, SwipeDown) => SwipeRight,
            (Rotation::Deg90, SwipeLeft) => SwipeDown,
            (Rotation::Deg90, SwipeRight) => SwipeUp,

            (Rotation::Deg180, SwipeUp) => SwipeDown,
            (Rotation::Deg180, SwipeDown) => SwipeUp,
            (Rotation::Deg180, SwipeLeft) => SwipeRight,
            (Rotation::Deg180, SwipeRight) => SwipeLeft,

            (Rotation::Deg270, SwipeUp) => SwipeRight,
            (Rotation::Deg270, SwipeDown) => SwipeLeft,
            (Rotation::Deg270, SwipeLeft) => SwipeUp,
            (Rotation::Deg270, SwipeRight) => SwipeDown,

            (_, other) => other,
        }
    }

    /// Remaps a raw point. Coordinates outside `size` are clamped at 0 instead of wrapping.
    pub fn rotate_point(self, x: u16, y: u16, size: DisplaySize) -> (u16, u16) {
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);

        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, max_x.saturating_sub(x)),
            Rotation::Deg180 => (max_x.saturating_sub(x), max_y.saturating_sub(y)),
            Rotation::Deg270 => (max_y.saturating_sub(y), x),
        }
    }
}
