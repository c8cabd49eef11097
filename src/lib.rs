//! Bit-banged DHT22 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT22 (AM2302) temperature
//! and humidity sensor, talking to it over a single data line.
//!
//! Bits are decoded by comparing the length of the low and high phase of each
//! pulse pair, counted in polling iterations, so no microsecond timer is needed
//! while the sensor transmits. Reads are limited to one every 2 seconds; faster
//! calls return the previous result.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Pluggable pin access through [`DataLine`], with [`OpenDrainLine`] as the
//!   portable default
//! - Interrupt masking during bit capture through [`Preemption`]; [`Dht22::new`]
//!   uses [`CriticalSection`], so the final binary needs a `critical-section`
//!   implementation
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access
//! - [`DelayNs`] for the start signal timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support and emits debug
//!   messages when a read fails
//!
//! # Example
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
//! use dht22_bitbang::{Clock, Config, Dht22, TEMPERATURE_ERROR};
//!
//! struct Millis;
//!
//! impl Clock for Millis {
//!     fn millis(&self) -> u32 {
//!         0
//!     }
//! }
//!
//! # let mut pin = PinMock::new(&[
//! #     Transaction::set(State::High),
//! #     Transaction::set(State::High),
//! #     Transaction::set(State::Low),
//! #     Transaction::set(State::High),
//! #     Transaction::set(State::High),
//! #     Transaction::get(State::High),
//! # ]);
//! # let delay = NoopDelay::new();
//! let mut dht = Dht22::new(pin.clone(), delay, Millis, Config::new(16));
//! dht.init();
//!
//! if dht.available() {
//!     let temperature = dht.read_temperature();
//!     if temperature == TEMPERATURE_ERROR {
//!         // sensor unavailable or miswired
//!     }
//! }
//! # pin.done();
//! ```
//!
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`CriticalSection`]: platform::CriticalSection

#![cfg_attr(not(test), no_std)]

/// Debug output, compiled out unless the `defmt` feature is enabled.
macro_rules! dht_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

pub mod config;
pub mod dht22;
pub mod error;
pub mod line;
pub mod payload;
pub mod platform;

pub use config::Config;
pub use dht22::{Dht22, HUMIDITY_ERROR, MIN_READ_INTERVAL_MS, TEMPERATURE_ERROR};
pub use error::DhtError;
pub use line::{DataLine, OpenDrainLine, PinMode};
pub use payload::{Payload, Reading};
pub use platform::{Clock, CriticalSection, NoPreemption, Preemption};
