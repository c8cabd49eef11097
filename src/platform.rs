//! Time and preemption seams provided by the host platform.

/// Monotonic millisecond counter.
///
/// The counter is allowed to wrap; the driver only ever compares timestamps
/// with wrapping subtraction.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point, usually boot.
    fn millis(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}

/// Interrupt masking around the timing-critical bit capture.
pub trait Preemption {
    /// Stop anything that could interrupt the current thread of execution.
    fn disable(&mut self);

    /// Undo the matching [`Preemption::disable`].
    fn enable(&mut self);
}

impl<P: Preemption + ?Sized> Preemption for &mut P {
    fn disable(&mut self) {
        (**self).disable();
    }

    fn enable(&mut self) {
        (**self).enable();
    }
}

/// For targets where nothing can preempt the driver, or where the caller
/// already masks interrupts around the read.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPreemption;

impl Preemption for NoPreemption {
    fn disable(&mut self) {}

    fn enable(&mut self) {}
}

/// Masks interrupts through the `critical-section` crate.
///
/// The final binary must link a `critical-section` implementation, usually
/// provided by the HAL or by `cortex-m`/`riscv` with their
/// `critical-section-single-core` feature.
#[derive(Default)]
pub struct CriticalSection {
    restore: Option<critical_section::RestoreState>,
}

impl CriticalSection {
    /// Creates a handle that holds no critical section yet.
    pub fn new() -> Self {
        CriticalSection { restore: None }
    }

    #[cfg(test)]
    pub(crate) fn is_held(&self) -> bool {
        self.restore.is_some()
    }
}

impl Preemption for CriticalSection {
    fn disable(&mut self) {
        if self.restore.is_none() {
            // SAFETY: released by `enable`, which `PreemptionGuard` always calls.
            self.restore = Some(unsafe { critical_section::acquire() });
        }
    }

    fn enable(&mut self) {
        if let Some(state) = self.restore.take() {
            // SAFETY: `state` came from the matching `acquire` in `disable`.
            unsafe { critical_section::release(state) };
        }
    }
}

/// Keeps preemption disabled for as long as it is alive.
pub(crate) struct PreemptionGuard<'a, P: Preemption> {
    preemption: &'a mut P,
}

impl<'a, P: Preemption> PreemptionGuard<'a, P> {
    pub(crate) fn new(preemption: &'a mut P) -> Self {
        preemption.disable();
        PreemptionGuard { preemption }
    }
}

impl<P: Preemption> Drop for PreemptionGuard<'_, P> {
    fn drop(&mut self) {
        self.preemption.enable();
    }
}
