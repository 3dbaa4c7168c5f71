use super::{
    DeviceInfo, DisplaySize, Gesture, InterruptLine, IrqControl, MotionMask, Rotation,
    TouchEvent, TouchInterrupt, TouchSensorError, Trigger, CMD_AUTO_SLEEP_OFF, CMD_AUTO_SLEEP_ON,
    CMD_STANDBY, CST816S_ADDRESS, LONG_PRESS_TIME_MAX, RAW_TOUCH_EVENT_LEN, REGISTER_GAP_MS,
    REG_AUTO_RESET, REG_AUTO_SLEEP_TIME, REG_DIS_AUTO_SLEEP, REG_IRQ_CONTROL,
    REG_IRQ_PULSE_WIDTH, REG_LONG_PRESS_TIME, REG_MOTION_MASK, REG_NOR_SCAN_PERIOD, REG_SLEEP,
    REG_TOUCH_DATA, REG_VERSION, REG_VERSION_INFO, RESET_PULSE_MS, RESET_SETTLE_MS,
};
use super::state::PollState;
use crate::BlockingRegisterDevice;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use log::info;

/// Interrupt driven CST816S driver.
///
/// The application's INT handler calls [`TouchInterrupt::notify`], the main
/// loop calls [`CST816S::poll`]. All bus traffic happens in `poll`.
#[derive(Debug)]
pub struct CST816S<'a, I2C, INT, RST, DELAY> {
    dev: BlockingRegisterDevice<I2C>,
    touch_int: INT,
    rst_pin: RST,
    delay: DELAY,
    state: PollState<'a>,
}

impl<'a, I2C, INT, RST, DELAY> CST816S<'a, I2C, INT, RST, DELAY>
where
    I2C: I2c,
    INT: InterruptLine,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new CST816S instance
    ///
    /// The bus should run at [`I2C_FREQUENCY_HZ`](super::I2C_FREQUENCY_HZ).
    pub fn new(
        i2c: I2C,
        touch_int: INT,
        rst_pin: RST,
        delay: DELAY,
        irq: &'a TouchInterrupt,
    ) -> Self {
        Self {
            dev: BlockingRegisterDevice::new(i2c, CST816S_ADDRESS),
            touch_int,
            rst_pin,
            delay,
            state: PollState::new(irq),
        }
    }

    pub fn with_rotation(mut self, quarter_turns: u8) -> Self {
        self.set_rotation(quarter_turns);
        self
    }

    /// Required before the first poll with a rotation other than 0.
    pub fn set_display_size(&mut self, width: u16, height: u16) {
        self.state.display = Some(DisplaySize::new(width, height));
    }

    pub fn display_size(&self) -> Option<DisplaySize> {
        self.state.display
    }

    /// Takes effect from the next read on.
    pub fn set_rotation(&mut self, quarter_turns: u8) {
        self.state.rotation = Rotation::from(quarter_turns);
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    /// Resets the chip, reads its version registers and arms the INT line.
    pub fn begin(&mut self, trigger: Trigger) -> Result<DeviceInfo, TouchSensorError> {
        self.reset()?;

        let version = self.dev.read_register(REG_VERSION)?;
        self.delay.delay_ms(REGISTER_GAP_MS);
        let mut info = [0u8; 3];
        self.dev.read_register_buffer(REG_VERSION_INFO, &mut info)?;

        self.touch_int
            .listen(trigger)
            .map_err(|_| TouchSensorError::PinError)?;

        let device = DeviceInfo { version, info };
        self.state.info = device;
        self.state.initialized = true;
        info!(
            "CST816S version 0x{:02X}, info {:02X?}",
            device.version, device.info
        );
        Ok(device)
    }

    /// Full hardware reset: high, low, high.
    pub fn reset(&mut self) -> Result<(), TouchSensorError> {
        self.rst_pin
            .set_high()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.reset_pulse()
    }

    fn reset_pulse(&mut self) -> Result<(), TouchSensorError> {
        self.rst_pin
            .set_low()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst_pin
            .set_high()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Registers a function that runs from [`CST816S::poll`] after every new reading.
    pub fn attach_user_interrupt(&mut self, callback: fn(&TouchEvent)) {
        self.state.observer = Some(callback);
    }

    /// Reads the touch block if an interrupt arrived since the last poll.
    ///
    /// On a bus error the interrupt stays pending, so the next poll retries.
    pub fn poll(&mut self) -> Result<Option<TouchEvent>, TouchSensorError> {
        let Some(orientation) = self.state.claim()? else {
            return Ok(None);
        };

        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        if let Err(err) = self.dev.read_register_buffer(REG_TOUCH_DATA, &mut buffer) {
            return Err(self.state.abort(err.into()));
        }

        let event = self.state.complete(&buffer, orientation);
        self.state.dispatch(&event);
        Ok(Some(event))
    }

    /// Reads the touch block now, ignoring the interrupt flag.
    pub fn read_touch(&mut self) -> Result<TouchEvent, TouchSensorError> {
        let orientation = self.state.orientation()?;
        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        self.dev.read_register_buffer(REG_TOUCH_DATA, &mut buffer)?;
        Ok(self.state.complete(&buffer, orientation))
    }

    /// Most recent successful reading.
    pub fn last_event(&self) -> TouchEvent {
        self.state.last
    }

    pub fn gesture(&self) -> Gesture {
        self.state.last.gesture
    }

    pub fn gesture_name(&self) -> &'static str {
        self.state.last.gesture_name()
    }

    /// Version registers as read by [`CST816S::begin`].
    pub fn device_info(&self) -> DeviceInfo {
        self.state.info
    }

    /// Put the chip into standby. It only accepts the command right after a reset.
    pub fn sleep(&mut self) -> Result<(), TouchSensorError> {
        self.reset_pulse()?;
        self.dev.write_register(&[REG_SLEEP, CMD_STANDBY])?;
        Ok(())
    }

    pub fn enable_double_click(&mut self) -> Result<(), TouchSensorError> {
        self.set_motion_mask(&MotionMask::DOUBLE_CLICK)
    }

    /// Disable auto sleep mode
    pub fn disable_auto_sleep(&mut self) -> Result<(), TouchSensorError> {
        self.dev
            .write_register(&[REG_DIS_AUTO_SLEEP, CMD_AUTO_SLEEP_OFF])?;
        Ok(())
    }

    /// Enable auto sleep mode
    pub fn enable_auto_sleep(&mut self) -> Result<(), TouchSensorError> {
        self.dev
            .write_register(&[REG_DIS_AUTO_SLEEP, CMD_AUTO_SLEEP_ON])?;
        Ok(())
    }

    /// Idle time before standby, clamped to 1..=255 seconds.
    pub fn set_auto_sleep_time(&mut self, mut seconds: i32) -> Result<(), TouchSensorError> {
        seconds = seconds.clamp(1, 255);
        let buffer = [REG_AUTO_SLEEP_TIME, seconds as u8];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    /// Sets the auto-reset time after detecting a touch with no valid gesture.
    pub fn enable_auto_reset(&mut self, seconds: u8) -> Result<(), TouchSensorError> {
        let buffer = [REG_AUTO_RESET, seconds];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    /// Pulse width in 0.1 ms units, clamped to 1..=200.
    pub fn set_irq_pulse_width(&mut self, mut width: u8) -> Result<(), TouchSensorError> {
        width = width.clamp(1, 200);
        let buffer = [REG_IRQ_PULSE_WIDTH, width];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    pub fn get_irq_pulse_width(&mut self) -> Result<u8, TouchSensorError> {
        let value = self.dev.read_register(REG_IRQ_PULSE_WIDTH)?;
        Ok(value)
    }

    /// Scan period in 10 ms units, clamped to 1..=30.
    pub fn set_nor_scan_period(&mut self, mut period: u8) -> Result<(), TouchSensorError> {
        period = period.clamp(1, 30);
        let buffer = [REG_NOR_SCAN_PERIOD, period];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    pub fn get_nor_scan_period(&mut self) -> Result<u8, TouchSensorError> {
        let value = self.dev.read_register(REG_NOR_SCAN_PERIOD)?;
        Ok(value)
    }

    pub fn get_long_press_time(&mut self) -> Result<u8, TouchSensorError> {
        let result = self.dev.read_register(REG_LONG_PRESS_TIME)?;
        Ok(result)
    }

    /// Long press duration in seconds, 0 disables.
    pub fn set_long_press_time(&mut self, time: u8) -> Result<(), TouchSensorError> {
        if time > LONG_PRESS_TIME_MAX {
            return Err(TouchSensorError::InvalidLongPressTime);
        }

        let buffer = [REG_LONG_PRESS_TIME, time];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    pub fn get_irq_control(&mut self) -> Result<IrqControl, TouchSensorError> {
        let result = self.dev.read_register(REG_IRQ_CONTROL)?;
        Ok(IrqControl::from_bits_truncate(result))
    }

    pub fn set_irq_control(&mut self, control: &IrqControl) -> Result<(), TouchSensorError> {
        let buffer = [REG_IRQ_CONTROL, control.bits()];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    pub fn get_motion_mask(&mut self) -> Result<MotionMask, TouchSensorError> {
        let result = self.dev.read_register(REG_MOTION_MASK)?;
        Ok(MotionMask::from_bits_truncate(result))
    }

    pub fn set_motion_mask(&mut self, mask: &MotionMask) -> Result<(), TouchSensorError> {
        let buffer = [REG_MOTION_MASK, mask.bits()];
        self.dev.write_register(&buffer)?;
        Ok(())
    }

    /// Give back the bus, INT line, reset pin and delay.
    pub fn release(self) -> (I2C, INT, RST, DELAY) {
        (self.dev.release(), self.touch_int, self.rst_pin, self.delay)
    }
}
