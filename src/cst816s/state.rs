//! Poll bookkeeping shared by the blocking and async drivers.

use log::{debug, warn};

use super::{
    DeviceInfo, DisplaySize, Rotation, TouchEvent, TouchInterrupt, TouchSensorError,
    RAW_TOUCH_EVENT_LEN,
};

/// Rotation and size captured when a read starts.
pub(crate) type Orientation = (Rotation, DisplaySize);

#[derive(Debug)]
pub(crate) struct PollState<'a> {
    irq: &'a TouchInterrupt,
    pub(crate) rotation: Rotation,
    pub(crate) display: Option<DisplaySize>,
    pub(crate) initialized: bool,
    pub(crate) info: DeviceInfo,
    pub(crate) last: TouchEvent,
    pub(crate) observer: Option<fn(&TouchEvent)>,
}

impl<'a> PollState<'a> {
    pub(crate) fn new(irq: &'a TouchInterrupt) -> Self {
        Self {
            irq,
            rotation: Rotation::Deg0,
            display: None,
            initialized: false,
            info: DeviceInfo::default(),
            last: TouchEvent::default(),
            observer: None,
        }
    }

    /// Preconditions for any touch read.
    pub(crate) fn orientation(&self) -> Result<Orientation, TouchSensorError> {
        if !self.initialized {
            return Err(TouchSensorError::NotInitialized);
        }
        match (self.rotation, self.display) {
            (rotation, Some(size)) => Ok((rotation, size)),
            // Identity, the size is never looked at.
            (Rotation::Deg0, None) => Ok((Rotation::Deg0, DisplaySize::new(0, 0))),
            (_, None) => Err(TouchSensorError::DisplaySizeUnset),
        }
    }

    /// Consumes the pending interrupt. `Ok(None)` if there is nothing to read.
    ///
    /// Preconditions are checked first so a misconfigured driver does not eat
    /// the notification.
    pub(crate) fn claim(&self) -> Result<Option<Orientation>, TouchSensorError> {
        let orientation = self.orientation()?;
        if !self.irq.take() {
            return Ok(None);
        }
        Ok(Some(orientation))
    }

    /// The read for a claimed interrupt failed. Re-arms the flag so the next
    /// poll retries.
    pub(crate) fn abort(&self, err: TouchSensorError) -> TouchSensorError {
        warn!("CST816S touch read failed: {:?}", err);
        self.irq.notify();
        err
    }

    pub(crate) fn complete(
        &mut self,
        raw: &[u8; RAW_TOUCH_EVENT_LEN],
        (rotation, size): Orientation,
    ) -> TouchEvent {
        let event = TouchEvent::from_raw(raw).rotated(rotation, size);
        debug!(
            "CST816S {} points={} event={:?} x={} y={}",
            event.gesture, event.points, event.event, event.x, event.y
        );
        self.last = event;
        event
    }

    /// Runs the observer from the polling context.
    pub(crate) fn dispatch(&self, event: &TouchEvent) {
        if let Some(observer) = self.observer {
            observer(event);
        }
    }
}
