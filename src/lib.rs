//! SHT1x Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Sensirion SHT1x
//! (SHT10/11/15) temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits. The SHT1x speaks a proprietary two-wire protocol
//! ("Sensibus"): a master-driven clock line and a bidirectional open-drain
//! data line, bit-banged in software.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Integer-only calibration with two implied decimal digits
//! - Fixed 10-byte report frame encoding for a serial uplink
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`OutputPin`] for the clock line
//! - [`InputPin`] and [`OutputPin`] for the open-drain data line
//! - [`DelayNs`] for accurate timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//!
//! # Known limitations
//! - The CRC byte the sensor appends to each measurement is not read back
//!   or verified.
//! - Only the default 14-bit temperature / 12-bit humidity resolution is
//!   supported by the calibration coefficients.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

pub mod calibrate;
pub mod error;
pub mod frame;
pub mod sht1x;

pub use calibrate::{RawReading, Reading, calibrate};
pub use error::ShtError;
pub use frame::{FRAME_LEN, encode_report};
pub use sht1x::{Measurement, RAW_MEASUREMENT_FAILED, Sht1x};
