//! Addressed register access over I2C.
//!
//! Reads are a register-select write followed by a repeated-start read.
//! Writes send the register address and payload in one transaction.

use embedded_hal::i2c::I2c;

#[derive(Debug)]
pub(crate) struct BlockingRegisterDevice<I2C> {
    i2c: I2C,
    pub(crate) adr: u8,
}

impl<I2C> BlockingRegisterDevice<I2C>
where
    I2C: I2c,
{
    pub(crate) fn new(i2c: I2C, adr: u8) -> Self {
        Self { i2c, adr }
    }

    /// `buffer[0]` is the register address, the rest is the payload.
    pub(crate) fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.adr, buffer)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.read_register_buffer(register, &mut buffer)?;
        Ok(buffer[0])
    }

    pub(crate) fn read_register_buffer(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.adr, &[register], buffer)
    }

    pub(crate) fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(feature = "async")]
#[derive(Debug)]
pub(crate) struct AsyncRegisterDevice<I2C> {
    i2c: I2C,
    pub(crate) adr: u8,
}

#[cfg(feature = "async")]
impl<I2C> AsyncRegisterDevice<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: I2C, adr: u8) -> Self {
        Self { i2c, adr }
    }

    pub(crate) async fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.adr, buffer).await
    }

    pub(crate) async fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.read_register_buffer(register, &mut buffer).await?;
        Ok(buffer[0])
    }

    pub(crate) async fn read_register_buffer(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.adr, &[register], buffer).await
    }

    pub(crate) fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::BlockingRegisterDevice;
    use crate::cst816s::test_support::FakeBus;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    #[test]
    fn read_selects_register_then_reads() {
        let mut bus = FakeBus::new();
        bus.set_registers(0xA7, &[0xB4, 0x01, 0x02]);
        let mut dev = BlockingRegisterDevice::new(bus, 0x15);

        let mut buffer = [0u8; 3];
        dev.read_register_buffer(0xA7, &mut buffer).unwrap();
        assert_eq!(buffer, [0xB4, 0x01, 0x02]);
        assert_eq!(dev.read_register(0xA8).unwrap(), 0x01);

        let bus = dev.release();
        assert_eq!(bus.reads, [(0x15, 0xA7, 3), (0x15, 0xA8, 1)]);
        assert!(bus.writes.is_empty());
    }

    #[test]
    fn write_sends_register_and_payload() {
        let mut dev = BlockingRegisterDevice::new(FakeBus::new(), 0x15);
        dev.write_register(&[0xF9, 0x0A]).unwrap();

        let bus = dev.release();
        assert_eq!(bus.writes, [(0x15, 0xF9, 0x0A)]);
        assert_eq!(bus.registers[0xF9], 0x0A);
    }

    #[test]
    fn nack_is_reported_not_panicked() {
        let mut bus = FakeBus::new();
        bus.nack = true;
        let mut dev = BlockingRegisterDevice::new(bus, 0x15);

        let err = dev.read_register(0x15).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
        assert!(dev.write_register(&[0xA5, 0x03]).is_err());
    }
}
