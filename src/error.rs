/// Possible errors from the DHT22 driver.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor did not acknowledge the start sequence.
    NoResponse,
    /// Timed out waiting for a pin state change while capturing data bits.
    Timeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// The minimum read interval has not elapsed and the previous read failed.
    LastReadFailed,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}
