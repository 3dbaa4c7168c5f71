use core::fmt::{Display, Formatter};

// https://github.com/fbiego/CST816S
use bitflags::bitflags;
use embedded_hal::i2c::{Error, ErrorKind};
use num_enum::{FromPrimitive, TryFromPrimitive};

mod interrupt;
mod rotation;
mod state;

#[cfg(feature = "async")]
pub mod asynch;
pub mod blocking;

#[cfg(test)]
pub(crate) mod test_support;

pub use interrupt::{InterruptLine, TouchInterrupt, Trigger};
pub use rotation::{DisplaySize, Rotation};

pub(crate) const CST816S_ADDRESS: u8 = 0x15;

/// Bus speed the controller is specified for.
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Number of bytes for a single touch event
pub const RAW_TOUCH_EVENT_LEN: usize = 6;

pub(crate) const REG_TOUCH_DATA: u8 = 0x01;
pub(crate) const REG_VERSION: u8 = 0x15;
pub(crate) const REG_VERSION_INFO: u8 = 0xA7;
pub(crate) const REG_SLEEP: u8 = 0xA5;
pub(crate) const REG_MOTION_MASK: u8 = 0xEC;
pub(crate) const REG_IRQ_PULSE_WIDTH: u8 = 0xED;
pub(crate) const REG_NOR_SCAN_PERIOD: u8 = 0xEE;
pub(crate) const REG_AUTO_SLEEP_TIME: u8 = 0xF9;
pub(crate) const REG_IRQ_CONTROL: u8 = 0xFA;
pub(crate) const REG_AUTO_RESET: u8 = 0xFB;
pub(crate) const REG_LONG_PRESS_TIME: u8 = 0xFC;
pub(crate) const REG_DIS_AUTO_SLEEP: u8 = 0xFE;

pub(crate) const CMD_STANDBY: u8 = 0x03;
/// Any non-zero value disables auto sleep.
pub(crate) const CMD_AUTO_SLEEP_OFF: u8 = 0xFE;
pub(crate) const CMD_AUTO_SLEEP_ON: u8 = 0x00;

pub(crate) const LONG_PRESS_TIME_MAX: u8 = 10;

// Reset timing, minimum values
pub(crate) const RESET_SETTLE_MS: u32 = 50;
pub(crate) const RESET_PULSE_MS: u32 = 5;
pub(crate) const REGISTER_GAP_MS: u32 = 5;

/// Gesture reported by the controller firmware.
///
/// Codes the driver does not know are kept in [`Gesture::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    None = 0x00,
    SwipeUp = 0x01,
    SwipeDown = 0x02,
    SwipeLeft = 0x03,
    SwipeRight = 0x04,
    SingleClick = 0x05,
    DoubleClick = 0x0B,
    LongPress = 0x0C,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl Gesture {
    /// Raw gesture code as found in the touch block.
    pub fn code(self) -> u8 {
        match self {
            Gesture::None => 0x00,
            Gesture::SwipeUp => 0x01,
            Gesture::SwipeDown => 0x02,
            Gesture::SwipeLeft => 0x03,
            Gesture::SwipeRight => 0x04,
            Gesture::SingleClick => 0x05,
            Gesture::DoubleClick => 0x0B,
            Gesture::LongPress => 0x0C,
            Gesture::Unknown(code) => code,
        }
    }

    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            Gesture::SwipeUp | Gesture::SwipeDown | Gesture::SwipeLeft | Gesture::SwipeRight
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::None => "NONE",
            Gesture::SwipeDown => "SWIPE DOWN",
            Gesture::SwipeUp => "SWIPE UP",
            Gesture::SwipeLeft => "SWIPE LEFT",
            Gesture::SwipeRight => "SWIPE RIGHT",
            Gesture::SingleClick => "SINGLE CLICK",
            Gesture::DoubleClick => "DOUBLE CLICK",
            Gesture::LongPress => "LONG PRESS",
            Gesture::Unknown(_) => "UNKNOWN",
        }
    }
}

impl Display for Gesture {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Touch state from the top two bits of the X high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Down = 0,
    Up = 1,
    Contact = 2,
    #[num_enum(default)]
    Reserved = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipID {
    CST816S = 0xB4,
    CST816T = 0xB5,
}

impl Display for ChipID {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ChipID::CST816S => write!(f, "CST816S"),
            ChipID::CST816T => write!(f, "CST816T"),
        }
    }
}

/// Version registers read during `begin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
    /// Register 0x15
    pub version: u8,
    /// Registers 0xA7..=0xA9
    pub info: [u8; 3],
}

impl DeviceInfo {
    pub fn chip_id(&self) -> Option<ChipID> {
        ChipID::try_from(self.info[0]).ok()
    }
}

/// One decoded touch block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    pub gesture: Gesture,
    pub points: u8,
    pub event: Event,
    pub x: u16,
    pub y: u16,
}

impl Default for TouchEvent {
    fn default() -> Self {
        Self::from_raw(&[0u8; RAW_TOUCH_EVENT_LEN])
    }
}

impl TouchEvent {
    /// Decodes the six bytes starting at register 0x01, without rotation.
    pub fn from_raw(raw: &[u8; RAW_TOUCH_EVENT_LEN]) -> Self {
        let x_high = raw[2] & 0x0f;
        let x_low = raw[3];
        let x: u16 = (u16::from(x_high) << 8) | u16::from(x_low);

        let y_high = raw[4] & 0x0f;
        let y_low = raw[5];
        let y: u16 = (u16::from(y_high) << 8) | u16::from(y_low);

        Self {
            gesture: Gesture::from(raw[0]),
            points: raw[1],
            event: Event::from(raw[2] >> 6),
            x,
            y,
        }
    }

    /// Maps gesture and point into display space. Both use the same rotation.
    pub fn rotated(self, rotation: Rotation, size: DisplaySize) -> Self {
        let (x, y) = rotation.rotate_point(self.x, self.y, size);
        Self {
            gesture: rotation.rotate_gesture(self.gesture),
            x,
            y,
            ..self
        }
    }

    pub fn gesture_name(&self) -> &'static str {
        self.gesture.name()
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqControl: u8 {
        /// Bit 7: EnTest (Enable test, periodically sends low pulses)
        const EN_TEST   = 1 << 7;
        /// Bit 6: EnTouch (Sends low pulse on touch detection)
        const EN_TOUCH  = 1 << 6;
        /// Bit 5: EnChange (Sends low pulse on touch state change)
        const EN_CHANGE = 1 << 5;
        /// Bit 4: EnMotion (Sends low pulse on gesture detection)
        const EN_MOTION = 1 << 4;
        /// Bit 0: OnceWLP (Sends one low pulse on long press)
        const ONCE_WLP  = 1 << 0;
    }
}

impl Default for IrqControl {
    fn default() -> Self {
        IrqControl::EN_TOUCH | IrqControl::EN_CHANGE | IrqControl::EN_MOTION
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MotionMask: u8 {
        /// Enable double-click detection
        const DOUBLE_CLICK = 1 << 0;
        /// Enable continuous up/down swipe
        const CONTINUOUS_UPDOWN = 1 << 1;
        /// Enable continuous left/right swipe
        const CONTINUOUS_LEFTRIGHT = 1 << 2;
    }
}

impl Default for MotionMask {
    fn default() -> Self {
        MotionMask::DOUBLE_CLICK
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqControl {
    fn format(&self, f: defmt::Formatter) {
        self.iter_names().for_each(|(name, _)| {
            defmt::write!(f, "{} ", name);
        });
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotionMask {
    fn format(&self, f: defmt::Formatter) {
        self.iter_names().for_each(|(name, _)| {
            defmt::write!(f, "{} ", name);
        });
    }
}

/// Errors that can occur when interacting with the CST816S
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchSensorError {
    /// Bus transaction failed, e.g. the chip did not acknowledge.
    I2CError(ErrorKind),
    /// Reset pin or interrupt line reported an error.
    PinError,
    /// `poll` or `read_touch` called before `begin`.
    NotInitialized,
    /// A rotated read needs the display size.
    DisplaySizeUnset,
    InvalidLongPressTime,
}

impl<E> From<E> for TouchSensorError
where
    E: Error,
{
    fn from(e: E) -> Self {
        TouchSensorError::I2CError(e.kind())
    }
}
