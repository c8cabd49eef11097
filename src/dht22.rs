use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};

use crate::config::Config;
use crate::error::DhtError;
use crate::line::{DataLine, OpenDrainLine, PinMode};
use crate::payload::{PULSE_COUNT, Payload, Reading, TIMEOUT};
use crate::platform::{Clock, CriticalSection, Preemption, PreemptionGuard};

/// Minimum time between two measurements, in milliseconds.
///
/// The sensor needs this long to sample again; reading faster returns stale
/// or garbage data.
pub const MIN_READ_INTERVAL_MS: u32 = 2000;

/// Returned by [`Dht22::read_temperature`] when no valid reading is available.
pub const TEMPERATURE_ERROR: i16 = !0;

/// Returned by [`Dht22::read_humidity`] when no valid reading is available.
pub const HUMIDITY_ERROR: u16 = !0;

/// Driver for the DHT22 temperature and humidity sensor.
pub struct Dht22<L, D, C, P> {
    line: L,
    delay: D,
    clock: C,
    preemption: P,
    max_cycles: u32,
    last_measurement: u32,
    last_valid: bool,
    payload: Payload,
    pulse_widths: [u32; PULSE_COUNT],
}

impl<PIN, D, C, E> Dht22<OpenDrainLine<PIN>, D, C, CriticalSection>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayNs,
    C: Clock,
{
    /// Creates a new instance of the DHT22 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The open-drain GPIO pin connected to the DHT22 data line.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - Monotonic millisecond clock used to space out reads.
    /// * `config` - Core clock rate, used to size the pulse timeout.
    ///
    /// Interrupts are masked with [`CriticalSection`] during the bit capture.
    /// Use [`Dht22::with_line`] to pick another strategy, such as
    /// [`NoPreemption`](crate::NoPreemption).
    pub fn new(pin: PIN, delay: D, clock: C, config: Config) -> Self {
        Self::with_line(
            OpenDrainLine::new(pin),
            delay,
            clock,
            CriticalSection::new(),
            config,
        )
    }
}

impl<L, D, C, P> Dht22<L, D, C, P>
where
    L: DataLine,
    D: DelayNs,
    C: Clock,
    P: Preemption,
{
    /// Creates a driver from any [`DataLine`] and [`Preemption`] strategy.
    pub fn with_line(line: L, delay: D, clock: C, preemption: P, config: Config) -> Self {
        let last_measurement = clock.millis().wrapping_sub(MIN_READ_INTERVAL_MS);
        Dht22 {
            line,
            delay,
            clock,
            preemption,
            max_cycles: config.max_cycles(),
            last_measurement,
            last_valid: false,
            payload: Payload::default(),
            pulse_widths: [0; PULSE_COUNT],
        }
    }

    /// Prepares the data line and allows an immediate first read.
    ///
    /// The line is set to input with pull-up. Boards without an internal
    /// pull-up need an external 3k3 to 10k resistor between DAT and VCC.
    pub fn init(&mut self) {
        if self.line.set_mode(PinMode::InputPullUp).is_err() {
            dht_debug!("DHT22: pull-up not available");
        }
        self.last_measurement = self.clock.millis().wrapping_sub(MIN_READ_INTERVAL_MS);
    }

    /// Returns `true` when [`MIN_READ_INTERVAL_MS`] has passed since the last
    /// measurement, so the next read will talk to the sensor.
    pub fn available(&self) -> bool {
        self.clock.millis().wrapping_sub(self.last_measurement) >= MIN_READ_INTERVAL_MS
    }

    /// Temperature in tenths of a degree Celsius, or [`TEMPERATURE_ERROR`].
    ///
    /// Measures if the sensor is [available](Self::available), otherwise
    /// reuses the last measurement.
    pub fn read_temperature(&mut self) -> i16 {
        self.read()
            .map(|reading| reading.temperature)
            .unwrap_or(TEMPERATURE_ERROR)
    }

    /// Relative humidity in tenths of a percent, or [`HUMIDITY_ERROR`].
    ///
    /// Measures if the sensor is [available](Self::available), otherwise
    /// reuses the last measurement.
    pub fn read_humidity(&mut self) -> u16 {
        self.read()
            .map(|reading| reading.humidity)
            .unwrap_or(HUMIDITY_ERROR)
    }

    /// Reads a temperature and humidity measurement from the DHT22 sensor.
    ///
    /// Within [`MIN_READ_INTERVAL_MS`] of the previous attempt the sensor is
    /// not touched: the previous reading is returned again, or
    /// `DhtError::LastReadFailed` if that attempt failed. Otherwise the full
    /// sequence runs: start signal, 40 data bits, checksum.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<L::Error>> {
        if !self.available() {
            return if self.last_valid {
                Ok(self.payload.reading())
            } else {
                Err(DhtError::LastReadFailed)
            };
        }

        // Stamp before talking to the sensor so failures are rate limited too
        self.last_measurement = self.clock.millis();
        self.last_valid = false;

        if let Err(err) = self.start() {
            dht_debug!("DHT22: start error");
            return Err(err);
        }

        if let Err(err) = self.read_bytes() {
            dht_debug!("DHT22: read error");
            return Err(err);
        }

        if !self.payload.is_valid() {
            dht_debug!("DHT22: parity error");
            return Err(DhtError::ChecksumMismatch);
        }

        self.last_valid = true;
        Ok(self.payload.reading())
    }

    /// Raw frame of the last measurement, if it was valid.
    pub fn last_payload(&self) -> Option<Payload> {
        self.last_valid.then_some(self.payload)
    }

    /// Destroys the driver and returns its line, delay, clock and preemption
    /// control.
    pub fn release(self) -> (L, D, C, P) {
        (self.line, self.delay, self.clock, self.preemption)
    }

    /// Sends the start signal to the DHT22 and waits for its response.
    ///
    /// The line idles high for 10 ms, is pulled low for 20 ms to wake the
    /// sensor, then high for 40 us before being released. The sensor answers
    /// with an ~80 us low and ~80 us high pulse.
    fn start(&mut self) -> Result<(), DhtError<L::Error>> {
        self.line.set_level(PinState::High)?;
        self.delay.delay_ms(10);

        // MCU sends start request
        self.line.set_mode(PinMode::Output)?;
        self.line.set_level(PinState::Low)?;
        self.delay.delay_ms(20);
        self.line.set_level(PinState::High)?;
        self.delay.delay_us(40);

        self.line.set_mode(PinMode::InputPullUp)?;
        self.delay.delay_us(10);

        // Waiting for DHT22 response
        for level in [PinState::Low, PinState::High] {
            if Self::measure_pulse_width(&mut self.line, level, self.max_cycles)? == TIMEOUT {
                return Err(DhtError::NoResponse);
            }
        }

        Ok(())
    }

    /// Captures the 40 data bits and decodes them into the payload.
    ///
    /// Each bit is a ~50 us low pulse followed by a high pulse that is
    /// shorter than the low one for a 0 and longer for a 1. Preemption is
    /// disabled only while the pulses are measured.
    fn read_bytes(&mut self) -> Result<(), DhtError<L::Error>> {
        {
            let _guard = PreemptionGuard::new(&mut self.preemption);

            let line = &mut self.line;
            let max_cycles = self.max_cycles;
            for pair in self.pulse_widths.chunks_exact_mut(2) {
                pair[0] = Self::measure_pulse_width(line, PinState::Low, max_cycles)?;
                pair[1] = Self::measure_pulse_width(line, PinState::High, max_cycles)?;
            }
        }

        match Payload::from_pulse_widths(&self.pulse_widths) {
            Some(payload) => {
                self.payload = payload;
                Ok(())
            }
            None => Err(DhtError::Timeout),
        }
    }

    /// Counts polling iterations while the line stays at `level`.
    ///
    /// Returns the count once the level changes, or `TIMEOUT` after
    /// `max_cycles + 1` polls. The count is only meaningful relative to
    /// another count taken by this same loop.
    #[inline(always)]
    fn measure_pulse_width(
        line: &mut L,
        level: PinState,
        max_cycles: u32,
    ) -> Result<u32, L::Error> {
        let mut count: u32 = 0;

        // `level()` takes `&mut` and goes through the pin driver, so the
        // compiler has to keep every poll.
        while line.level()? == level {
            if count >= max_cycles {
                return Ok(TIMEOUT);
            }
            count += 1;
        }

        Ok(count)
    }
}
