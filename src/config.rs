/// Pulse measurement timeout, in microseconds.
const TIMEOUT_US: u32 = 1000;

/// Platform timing configuration.
///
/// The driver measures pulses by counting polling iterations, so it needs to
/// know how many iterations fit in the timeout window. The value is taken from
/// the core clock rate instead of being read from global state.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Core clock cycles per microsecond (16 for a 16 MHz AVR, 125 for an RP2040).
    pub cycles_per_us: u32,
}

impl Config {
    /// Creates a configuration for a core running at `cycles_per_us` MHz.
    pub const fn new(cycles_per_us: u32) -> Self {
        Config { cycles_per_us }
    }

    /// Number of polling iterations after which a pulse measurement gives up.
    pub const fn max_cycles(&self) -> u32 {
        self.cycles_per_us.saturating_mul(TIMEOUT_US)
    }
}
