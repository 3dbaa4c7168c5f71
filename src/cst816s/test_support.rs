//! Recording stand-ins for the bus, reset pin, INT line and delay.

extern crate std;

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, ErrorKind, I2c, NoAcknowledgeSource, Operation};

use super::{InterruptLine, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    High,
    Low,
    DelayMs(u32),
    Read(u8, usize),
    Write(u8, u8),
    Listen(Trigger),
}

/// Ordered record of everything the driver did to its peripherals.
#[derive(Debug, Clone, Default)]
pub(crate) struct Timeline(Rc<RefCell<Vec<Step>>>);

impl Timeline {
    pub(crate) fn push(&self, step: Step) {
        self.0.borrow_mut().push(step);
    }

    pub(crate) fn steps(&self) -> Vec<Step> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Register file behind a 7-bit address.
pub(crate) struct FakeBus {
    pub(crate) registers: [u8; 256],
    /// (address, register, length)
    pub(crate) reads: Vec<(u8, u8, usize)>,
    /// (address, register, value)
    pub(crate) writes: Vec<(u8, u8, u8)>,
    pub(crate) nack: bool,
    timeline: Timeline,
    selected: u8,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        Self::with_timeline(Timeline::default())
    }

    pub(crate) fn with_timeline(timeline: Timeline) -> Self {
        Self {
            registers: [0u8; 256],
            reads: Vec::new(),
            writes: Vec::new(),
            nack: false,
            timeline,
            selected: 0,
        }
    }

    pub(crate) fn set_registers(&mut self, start: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            self.registers[usize::from(start) + offset] = *value;
        }
    }

    fn apply(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if self.nack {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((register, payload)) = bytes.split_first() else {
                        continue;
                    };
                    self.selected = *register;
                    for (offset, value) in payload.iter().enumerate() {
                        let target = register.wrapping_add(offset as u8);
                        self.registers[usize::from(target)] = *value;
                        self.writes.push((address, target, *value));
                        self.timeline.push(Step::Write(target, *value));
                    }
                }
                Operation::Read(buffer) => {
                    for (offset, slot) in buffer.iter_mut().enumerate() {
                        *slot = self.registers[usize::from(self.selected.wrapping_add(offset as u8))];
                    }
                    self.reads.push((address, self.selected, buffer.len()));
                    self.timeline.push(Step::Read(self.selected, buffer.len()));
                }
            }
        }
        Ok(())
    }
}

impl i2c::ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.apply(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for FakeBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.apply(address, operations)
    }
}

/// Error type for pins that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub(crate) struct FakeResetPin {
    timeline: Timeline,
    pub(crate) fail: bool,
}

impl FakeResetPin {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            fail: false,
        }
    }
}

impl digital::ErrorType for FakeResetPin {
    type Error = PinFault;
}

impl OutputPin for FakeResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.timeline.push(Step::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.timeline.push(Step::High);
        Ok(())
    }
}

pub(crate) struct FakeLine {
    timeline: Timeline,
}

impl FakeLine {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

impl InterruptLine for FakeLine {
    type Error = Infallible;

    fn listen(&mut self, trigger: Trigger) -> Result<(), Self::Error> {
        self.timeline.push(Step::Listen(trigger));
        Ok(())
    }
}

pub(crate) struct FakeDelay {
    timeline: Timeline,
}

impl FakeDelay {
    pub(crate) fn new(timeline: Timeline) -> Self {
        Self { timeline }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.push(Step::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timeline.push(Step::DelayMs(ms));
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.timeline.push(Step::DelayMs(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.timeline.push(Step::DelayMs(ms));
    }
}
