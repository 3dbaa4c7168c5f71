use core::sync::atomic::{AtomicBool, Ordering};

/// Edge or level the touch interrupt should fire on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    RisingEdge,
    /// The controller pulls INT low on new data, this is the usual choice.
    FallingEdge,
    AnyEdge,
    LowLevel,
    HighLevel,
}

/// Interrupt configuration of the INT pin, implemented for the HAL's input pin.
///
/// The handler itself belongs to the application. All it has to do is call
/// [`TouchInterrupt::notify`].
pub trait InterruptLine {
    type Error;

    fn listen(&mut self, trigger: Trigger) -> Result<(), Self::Error>;
}

/// Pending-data flag shared between the INT handler and the polling loop.
///
/// Holds at most one pending notification. Interrupts that arrive before the
/// next poll collapse into it.
///
/// ```ignore
/// static TOUCH_IRQ: TouchInterrupt = TouchInterrupt::new();
///
/// #[handler]
/// fn on_touch() {
///     TOUCH_IRQ.notify();
/// }
/// ```
#[derive(Debug)]
pub struct TouchInterrupt {
    pending: AtomicBool,
}

impl TouchInterrupt {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Marks new touch data as available. Safe to call from interrupt context.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Clears the flag, returning whether it was set.
    pub(crate) fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for TouchInterrupt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let irq = TouchInterrupt::new();
        assert!(!irq.is_pending());
        assert!(!irq.take());
    }

    #[test]
    fn repeated_notifications_collapse() {
        let irq = TouchInterrupt::new();
        irq.notify();
        irq.notify();
        irq.notify();
        assert!(irq.is_pending());
        assert!(irq.take());
        assert!(!irq.take());
        assert!(!irq.is_pending());
    }

    #[test]
    fn usable_from_a_static() {
        static IRQ: TouchInterrupt = TouchInterrupt::new();
        IRQ.notify();
        assert!(IRQ.take());
    }
}
