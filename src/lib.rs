#![no_std]
//! CST816S Capacitive Touch Controller Driver
//!
//! Interrupt driven driver for the Hynitron CST816S found on many small round
//! and square watch displays. The INT handler only marks a [`TouchInterrupt`]
//! as pending, the application loop calls `poll` to fetch and decode the
//! touch block, remapped to the display rotation.
//!
//! Blocking and async (`async` feature) variants share the same types.

/// CST816S capacitive touch sensor driver.
pub mod cst816s;

mod register_device;

#[cfg(feature = "async")]
pub(crate) use register_device::AsyncRegisterDevice;
pub(crate) use register_device::BlockingRegisterDevice;

#[cfg(feature = "async")]
pub use cst816s::asynch::CST816SAsync;
pub use cst816s::blocking::CST816S;
pub use cst816s::{
    ChipID, DeviceInfo, DisplaySize, Event, Gesture, InterruptLine, IrqControl, MotionMask,
    Rotation, TouchEvent, TouchInterrupt, TouchSensorError, Trigger,
};

#[cfg(test)]
extern crate alloc;
