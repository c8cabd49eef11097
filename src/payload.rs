//! The 5-byte DHT22 data frame.

/// Number of data bits sent by the sensor after the start handshake.
pub const DATA_BITS: usize = 5 * 8;

/// Number of measured pulses: a low and a high phase per data bit.
pub const PULSE_COUNT: usize = DATA_BITS * 2;

/// Width returned by a pulse measurement that timed out.
pub(crate) const TIMEOUT: u32 = 0;

/// Raw sensor frame: humidity high, humidity low, temperature high,
/// temperature low, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payload(pub [u8; 5]);

/// Reading returned by the DHT22 sensor, in tenths of a unit.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Relative humidity in tenths of a percent (`653` is 65.3 %).
    pub humidity: u16,
    /// Temperature in tenths of a degree Celsius (`-45` is -4.5 °C).
    pub temperature: i16,
}

impl Reading {
    /// Relative humidity in percent.
    pub fn humidity_percent(&self) -> f32 {
        self.humidity as f32 / 10.0
    }

    /// Temperature in degrees Celsius.
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 10.0
    }
}

impl Payload {
    /// Builds a frame from 40 measured `(low, high)` pulse pairs.
    ///
    /// A bit is 1 when its high phase outlasted its low phase. Only the
    /// relative length matters, so the loop overhead of the measurement
    /// cancels out. Returns `None` if any pulse timed out.
    pub fn from_pulse_widths(widths: &[u32; PULSE_COUNT]) -> Option<Self> {
        let mut data = [0u8; 5];

        for (bit, pair) in widths.chunks_exact(2).enumerate() {
            let (low, high) = (pair[0], pair[1]);
            if low == TIMEOUT || high == TIMEOUT {
                return None;
            }

            let byte = &mut data[bit / 8];
            *byte <<= 1;
            if high > low {
                *byte |= 1;
            }
        }

        Some(Payload(data))
    }

    /// Checks that the last byte is the truncated sum of the first four.
    pub fn is_valid(&self) -> bool {
        let [hum_hi, hum_lo, temp_hi, temp_lo, checksum] = self.0;
        [hum_hi, hum_lo, temp_hi, temp_lo]
            .iter()
            .fold(0u8, |sum, v| sum.wrapping_add(*v))
            == checksum
    }

    /// Relative humidity in tenths of a percent.
    pub fn humidity(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    /// Temperature in tenths of a degree Celsius.
    ///
    /// The sensor sends sign and magnitude: bit 7 of the high byte is the
    /// sign, the remaining 15 bits are the magnitude.
    pub fn temperature(&self) -> i16 {
        let is_negative = (self.0[2] >> 7) != 0;
        let magnitude = u16::from_be_bytes([self.0[2] & 0b0111_1111, self.0[3]]) as i16;
        if is_negative { -magnitude } else { magnitude }
    }

    /// Decodes humidity and temperature together.
    pub fn reading(&self) -> Reading {
        Reading {
            humidity: self.humidity(),
            temperature: self.temperature(),
        }
    }
}
