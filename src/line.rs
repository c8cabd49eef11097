//! Access to the single data line shared by the MCU and the sensor.
//!
//! The protocol engine only talks to a [`DataLine`]. [`OpenDrainLine`] is the
//! portable implementation on top of `embedded-hal`; boards that need faster
//! pin access can implement [`DataLine`] directly on their port registers.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Direction and bias of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Input with the internal pull-up enabled, where the hardware has one.
    InputPullUp,
    /// Push-pull or open-drain output driven by the MCU.
    Output,
}

/// The set of pin operations the driver needs.
pub trait DataLine {
    /// Error returned by the underlying pin.
    type Error;

    /// Switches the line direction.
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Drives the line to `level`.
    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Samples the line.
    ///
    /// Called in a tight polling loop, so implementations should do nothing
    /// else.
    fn level(&mut self) -> Result<PinState, Self::Error>;
}

/// [`DataLine`] over an open-drain `embedded-hal` pin.
///
/// An open-drain pin is always both an input and an output. Switching to an
/// input mode releases the line, which the pull-up then holds high; output
/// mode needs no action.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P, E> OpenDrainLine<P>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
{
    /// Wraps an open-drain pin.
    pub fn new(pin: P) -> Self {
        OpenDrainLine { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P, E> DataLine for OpenDrainLine<P>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
{
    type Error = E;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), E> {
        match mode {
            PinMode::Input | PinMode::InputPullUp => self.pin.set_high(),
            PinMode::Output => Ok(()),
        }
    }

    fn set_level(&mut self, level: PinState) -> Result<(), E> {
        self.pin.set_state(level)
    }

    #[inline]
    fn level(&mut self) -> Result<PinState, E> {
        Ok(PinState::from(self.pin.is_high()?))
    }
}
