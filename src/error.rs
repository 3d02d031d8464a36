/// Possible errors from the SHT1x driver.
#[derive(Debug, PartialEq, Eq)]
pub enum ShtError<E> {
    /// The device did not pull DATA low to acknowledge a written byte.
    ///
    /// Never fatal: the bus transaction still ran to completion, and the
    /// driver does not retry. Retrying, if wanted, belongs to the caller.
    NoAck,
    /// Error from one of the GPIO pins (clock/data).
    Pin(E),
}

impl<E> From<E> for ShtError<E> {
    fn from(value: E) -> Self {
        Self::Pin(value)
    }
}
