use super::state::PollState;
use super::{
    DeviceInfo, DisplaySize, Gesture, InterruptLine, IrqControl, MotionMask, Rotation,
    TouchEvent, TouchInterrupt, TouchSensorError, Trigger, CMD_AUTO_SLEEP_OFF, CMD_AUTO_SLEEP_ON,
    CMD_STANDBY, CST816S_ADDRESS, LONG_PRESS_TIME_MAX, RAW_TOUCH_EVENT_LEN, REGISTER_GAP_MS,
    REG_AUTO_RESET, REG_AUTO_SLEEP_TIME, REG_DIS_AUTO_SLEEP, REG_IRQ_CONTROL,
    REG_IRQ_PULSE_WIDTH, REG_LONG_PRESS_TIME, REG_MOTION_MASK, REG_NOR_SCAN_PERIOD, REG_SLEEP,
    REG_TOUCH_DATA, REG_VERSION, REG_VERSION_INFO, RESET_PULSE_MS, RESET_SETTLE_MS,
};
use crate::AsyncRegisterDevice;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use log::info;

/// Async variant of [`CST816S`](super::blocking::CST816S), same poll model.
#[derive(Debug)]
pub struct CST816SAsync<'a, I2C, INT, RST, DELAY> {
    dev: AsyncRegisterDevice<I2C>,
    touch_int: INT,
    rst_pin: RST,
    delay: DELAY,
    state: PollState<'a>,
}

impl<'a, I2C, INT, RST, DELAY> CST816SAsync<'a, I2C, INT, RST, DELAY>
where
    I2C: embedded_hal_async::i2c::I2c,
    INT: InterruptLine,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new CST816S instance
    pub fn new(
        i2c: I2C,
        touch_int: INT,
        rst_pin: RST,
        delay: DELAY,
        irq: &'a TouchInterrupt,
    ) -> Self {
        Self {
            dev: AsyncRegisterDevice::new(i2c, CST816S_ADDRESS),
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

    pub fn set_display_size(&mut self, width: u16, height: u16) {
        self.state.display = Some(DisplaySize::new(width, height));
    }

    pub fn display_size(&self) -> Option<DisplaySize> {
        self.state.display
    }

    pub fn set_rotation(&mut self, quarter_turns: u8) {
        self.state.rotation = Rotation::from(quarter_turns);
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    pub async fn begin(&mut self, trigger: Trigger) -> Result<DeviceInfo, TouchSensorError> {
        self.reset().await?;

        let version = self.dev.read_register(REG_VERSION).await?;
        self.delay.delay_ms(REGISTER_GAP_MS).await;
        let mut info = [0u8; 3];
        self.dev
            .read_register_buffer(REG_VERSION_INFO, &mut info)
            .await?;

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

    pub async fn reset(&mut self) -> Result<(), TouchSensorError> {
        self.rst_pin
            .set_high()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        self.reset_pulse().await
    }

    async fn reset_pulse(&mut self) -> Result<(), TouchSensorError> {
        self.rst_pin
            .set_low()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_PULSE_MS).await;
        self.rst_pin
            .set_high()
            .map_err(|_| TouchSensorError::PinError)?;
        self.delay.delay_ms(RESET_SETTLE_MS).await;
        Ok(())
    }

    pub fn attach_user_interrupt(&mut self, callback: fn(&TouchEvent)) {
        self.state.observer = Some(callback);
    }

    pub async fn poll(&mut self) -> Result<Option<TouchEvent>, TouchSensorError> {
        let Some(orientation) = self.state.claim()? else {
            return Ok(None);
        };

        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        if let Err(err) = self
            .dev
            .read_register_buffer(REG_TOUCH_DATA, &mut buffer)
            .await
        {
            return Err(self.state.abort(err.into()));
        }

        let event = self.state.complete(&buffer, orientation);
        self.state.dispatch(&event);
        Ok(Some(event))
    }

    pub async fn read_touch(&mut self) -> Result<TouchEvent, TouchSensorError> {
        let orientation = self.state.orientation()?;
        let mut buffer = [0u8; RAW_TOUCH_EVENT_LEN];
        self.dev
            .read_register_buffer(REG_TOUCH_DATA, &mut buffer)
            .await?;
        Ok(self.state.complete(&buffer, orientation))
    }

    pub fn last_event(&self) -> TouchEvent {
        self.state.last
    }

    pub fn gesture(&self) -> Gesture {
        self.state.last.gesture
    }

    pub fn gesture_name(&self) -> &'static str {
        self.state.last.gesture_name()
    }

    pub fn device_info(&self) -> DeviceInfo {
        self.state.info
    }

    pub async fn sleep(&mut self) -> Result<(), TouchSensorError> {
        self.reset_pulse().await?;
        self.dev.write_register(&[REG_SLEEP, CMD_STANDBY]).await?;
        Ok(())
    }

    pub async fn enable_double_click(&mut self) -> Result<(), TouchSensorError> {
        self.set_motion_mask(&MotionMask::DOUBLE_CLICK).await
    }

    pub async fn disable_auto_sleep(&mut self) -> Result<(), TouchSensorError> {
        let buffer = [REG_DIS_AUTO_SLEEP, CMD_AUTO_SLEEP_OFF];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn enable_auto_sleep(&mut self) -> Result<(), TouchSensorError> {
        let buffer = [REG_DIS_AUTO_SLEEP, CMD_AUTO_SLEEP_ON];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn set_auto_sleep_time(&mut self, mut seconds: i32) -> Result<(), TouchSensorError> {
        seconds = seconds.clamp(1, 255);
        let buffer = [REG_AUTO_SLEEP_TIME, seconds as u8];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn enable_auto_reset(&mut self, seconds: u8) -> Result<(), TouchSensorError> {
        let buffer = [REG_AUTO_RESET, seconds];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn set_irq_pulse_width(&mut self, mut width: u8) -> Result<(), TouchSensorError> {
        width = width.clamp(1, 200);
        let buffer = [REG_IRQ_PULSE_WIDTH, width];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn get_irq_pulse_width(&mut self) -> Result<u8, TouchSensorError> {
        let value = self.dev.read_register(REG_IRQ_PULSE_WIDTH).await?;
        Ok(value)
    }

    pub async fn set_nor_scan_period(&mut self, mut period: u8) -> Result<(), TouchSensorError> {
        period = period.clamp(1, 30);
        let buffer = [REG_NOR_SCAN_PERIOD, period];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn get_nor_scan_period(&mut self) -> Result<u8, TouchSensorError> {
        let value = self.dev.read_register(REG_NOR_SCAN_PERIOD).await?;
        Ok(value)
    }

    pub async fn get_long_press_time(&mut self) -> Result<u8, TouchSensorError> {
        let result = self.dev.read_register(REG_LONG_PRESS_TIME).await?;
        Ok(result)
    }

    pub async fn set_long_press_time(&mut self, time: u8) -> Result<(), TouchSensorError> {
        if time > LONG_PRESS_TIME_MAX {
            return Err(TouchSensorError::InvalidLongPressTime);
        }

        let buffer = [REG_LONG_PRESS_TIME, time];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn get_irq_control(&mut self) -> Result<IrqControl, TouchSensorError> {
        let result = self.dev.read_register(REG_IRQ_CONTROL).await?;
        Ok(IrqControl::from_bits_truncate(result))
    }

    pub async fn set_irq_control(&mut self, control: &IrqControl) -> Result<(), TouchSensorError> {
        let buffer = [REG_IRQ_CONTROL, control.bits()];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub async fn get_motion_mask(&mut self) -> Result<MotionMask, TouchSensorError> {
        let result = self.dev.read_register(REG_MOTION_MASK).await?;
        Ok(MotionMask::from_bits_truncate(result))
    }

    pub async fn set_motion_mask(&mut self, mask: &MotionMask) -> Result<(), TouchSensorError> {
        let buffer = [REG_MOTION_MASK, mask.bits()];
        self.dev.write_register(&buffer).await?;
        Ok(())
    }

    pub fn release(self) -> (I2C, INT, RST, DELAY) {
        (self.dev.release(), self.touch_int, self.rst_pin, self.delay)
    }
}
