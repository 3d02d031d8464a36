use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::calibrate::{RawReading, Reading, calibrate};
use crate::error::ShtError;

/// Raw value returned by [`Sht1x::measure`] when the sensor never signalled
/// data-ready within the poll window.
pub const RAW_MEASUREMENT_FAILED: u16 = 0xFFFF;

/// Power-up settle time in milliseconds before the sensor accepts commands.
const STARTUP_DELAY_MS: u32 = 50;

/// Dwell (in microseconds) between bus edges, above the sensor's minimum
/// setup/hold times.
const EDGE_DWELL_US: u32 = 5;

/// Clock-high time (in microseconds) while a data bit is on the line.
const BIT_DWELL_US: u32 = 10;

/// Number of clock pulses in the communication reset waveform. The protocol
/// requires at least 9.
const RESET_PULSES: u8 = 10;

/// Number of data-ready polls in [`Sht1x::measure`] before giving up.
///
/// Together with [`MEASUREMENT_POLL_STEP_MS`] this bounds the wait at
/// 20 x 15 ms = 300 ms, which covers the sensor's worst-case 14-bit
/// conversion time (210 ms) with margin.
const MEASUREMENT_POLL_TRIES: u8 = 20;

/// Delay in milliseconds between data-ready polls.
const MEASUREMENT_POLL_STEP_MS: u32 = 15;

/// Command byte writing the status register.
const STATUS_REG_WRITE: u8 = 0x06;

/// Command byte reading the status register.
const STATUS_REG_READ: u8 = 0x07;

/// Command byte for a soft reset of the sensor.
const SOFT_RESET: u8 = 0x1E;

/// Default status register value: 14-bit temperature, 12-bit humidity,
/// heater off.
const STATUS_DEFAULT: u8 = 0x00;

/// Measurement command selecting which channel the sensor converts.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measurement {
    /// 14-bit temperature conversion.
    Temperature = 0x03,
    /// 12-bit humidity conversion.
    Humidity = 0x05,
}

/// Driver for the SHT1x temperature and humidity sensor.
///
/// The sensor speaks a proprietary two-wire protocol: a master-driven CLOCK
/// line and a bidirectional open-drain DATA line. The driver bit-bangs both
/// lines through `embedded-hal` pins; `DATA` must be configured as an
/// open-drain output with a pull-up, so that `set_high` releases the line
/// and lets the device drive it (acknowledge bits, data-ready signalling).
pub struct Sht1x<SCK, DATA, D> {
    sck: SCK,
    data: DATA,
    delay: D,
}

impl<SCK, DATA, DELAY, E> Sht1x<SCK, DATA, DELAY>
where
    SCK: OutputPin<Error = E>,
    DATA: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the SHT1x driver.
    ///
    /// # Arguments
    ///
    /// * `sck` - The GPIO pin connected to the sensor clock line (push-pull output).
    /// * `data` - The GPIO pin connected to the sensor data line. Must be an
    ///   open-drain output with pull-up that also supports input sampling.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(sck: SCK, data: DATA, delay: DELAY) -> Self {
        Sht1x { sck, data, delay }
    }

    /// Brings the bus and the sensor into a known state after power-up.
    ///
    /// Drives CLOCK low, releases DATA, waits out the sensor's power-up
    /// settle time and writes the status register to its default. The
    /// status write is best-effort: a missing acknowledge is ignored here,
    /// only pin errors are reported.
    pub fn init(&mut self) -> Result<(), ShtError<E>> {
        self.sck.set_low()?;
        self.data.set_high()?;
        self.delay.delay_ms(STARTUP_DELAY_MS);

        match self.write_status(STATUS_DEFAULT) {
            Ok(()) | Err(ShtError::NoAck) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Performs a communication reset.
    ///
    /// Holds DATA high while pulsing CLOCK [`RESET_PULSES`] times, then
    /// issues a transmission start. This forces the sensor interface back
    /// into a command-ready state after a bus desynchronization; the
    /// sensor does not acknowledge it, so the only failures are pin errors.
    pub fn reset(&mut self) -> Result<(), ShtError<E>> {
        self.data.set_high()?;
        self.sck.set_low()?;
        for _ in 0..RESET_PULSES {
            self.delay.delay_us(EDGE_DWELL_US);
            self.sck.set_high()?;
            self.delay.delay_us(EDGE_DWELL_US);
            self.sck.set_low()?;
        }
        self.transmission_start()?;
        Ok(())
    }

    /// Runs one measurement transaction and returns the raw tick value.
    ///
    /// Issues a transmission start and the measurement command, then polls
    /// for the sensor pulling DATA low to signal conversion complete. On
    /// data-ready the 16-bit result is read MSB first. If the sensor does
    /// not become ready within [`MEASUREMENT_POLL_TRIES`] polls, the
    /// sentinel [`RAW_MEASUREMENT_FAILED`] is returned.
    pub fn measure(&mut self, mode: Measurement) -> Result<u16, ShtError<E>> {
        self.transmission_start()?;
        // An unacknowledged command is not escalated: the sensor then never
        // asserts data-ready and the poll below runs out.
        self.write_byte(mode as u8)?;

        for _ in 0..MEASUREMENT_POLL_TRIES {
            if self.data.is_low()? {
                let msb = self.read_byte()?;
                let lsb = self.read_byte()?;
                return Ok(u16::from_be_bytes([msb, lsb]));
            }
            self.delay.delay_ms(MEASUREMENT_POLL_STEP_MS);
        }

        Ok(RAW_MEASUREMENT_FAILED)
    }

    /// Measures both channels and converts them to physical units.
    ///
    /// Temperature is measured first so the humidity linearization can be
    /// temperature-compensated. A failed measurement flows through the
    /// conversion as the [`RAW_MEASUREMENT_FAILED`] sentinel and surfaces
    /// as an out-of-range reading, not as an error.
    pub fn read_measurement(&mut self) -> Result<Reading, ShtError<E>> {
        let temperature_ticks = self.measure(Measurement::Temperature)?;
        let humidity_ticks = self.measure(Measurement::Humidity)?;
        Ok(calibrate(RawReading {
            temperature_ticks,
            humidity_ticks,
        }))
    }

    /// Reads the status register.
    ///
    /// The register byte is shifted out even when the command was not
    /// acknowledged (an absent device reads as 0xFF); the missing
    /// acknowledge is then reported as [`ShtError::NoAck`].
    pub fn read_status(&mut self) -> Result<u8, ShtError<E>> {
        self.transmission_start()?;
        let acked = self.write_byte(STATUS_REG_READ)?;
        let value = self.read_byte()?;
        if acked { Ok(value) } else { Err(ShtError::NoAck) }
    }

    /// Writes the status register.
    ///
    /// A missing acknowledge on either the command or the value byte is
    /// reported as a single [`ShtError::NoAck`]; the transaction still runs
    /// to completion. The driver assumes the default 14-bit temperature /
    /// 12-bit humidity resolution, so lowering the resolution bits will
    /// make [`calibrate`] apply the wrong coefficients.
    pub fn write_status(&mut self, value: u8) -> Result<(), ShtError<E>> {
        self.transmission_start()?;
        let command_acked = self.write_byte(STATUS_REG_WRITE)?;
        let value_acked = self.write_byte(value)?;
        if command_acked && value_acked {
            Ok(())
        } else {
            Err(ShtError::NoAck)
        }
    }

    /// Resets the sensor interface, status register and internal state via
    /// the soft-reset command. The sensor needs ~11 ms before it accepts
    /// the next command.
    pub fn soft_reset(&mut self) -> Result<(), ShtError<E>> {
        self.transmission_start()?;
        if self.write_byte(SOFT_RESET)? {
            Ok(())
        } else {
            Err(ShtError::NoAck)
        }
    }

    /// Generates the transmission start ("attention") waveform that
    /// precedes every command:
    ///
    /// ```text
    ///       _____         ________
    /// DATA:      |_______|
    ///           ___     ___
    /// SCK : ___|   |___|   |______
    /// ```
    fn transmission_start(&mut self) -> Result<(), E> {
        self.data.set_high()?;
        self.sck.set_low()?;
        self.delay.delay_us(BIT_DWELL_US);
        self.sck.set_high()?;
        self.delay.delay_us(EDGE_DWELL_US);
        self.data.set_low()?;
        self.delay.delay_us(EDGE_DWELL_US);
        self.sck.set_low()?;
        self.delay.delay_us(BIT_DWELL_US);
        self.sck.set_high()?;
        self.delay.delay_us(EDGE_DWELL_US);
        self.data.set_high()?;
        self.delay.delay_us(EDGE_DWELL_US);
        self.sck.set_low()?;
        Ok(())
    }

    /// Shifts one byte out on the bus, MSB first, and samples the
    /// acknowledge bit.
    ///
    /// Returns `true` if the device pulled DATA low during the ninth clock
    /// pulse (acknowledge), `false` if the line stayed high.
    fn write_byte(&mut self, value: u8) -> Result<bool, E> {
        for i in 0..8 {
            if value & (0x80 >> i) != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.sck.set_high()?;
            self.delay.delay_us(BIT_DWELL_US);
            self.sck.set_low()?;
        }

        // Ninth clock: release DATA so the device can drive the acknowledge.
        self.data.set_high()?;
        self.sck.set_high()?;
        self.delay.delay_us(EDGE_DWELL_US);
        let acked = self.data.is_low()?;
        self.sck.set_low()?;

        Ok(acked)
    }

    /// Shifts one byte in from the bus, MSB first, and acknowledges it.
    ///
    /// DATA is released before the first sample and after the acknowledge
    /// pulse, so the line is only ever sampled while device-driven.
    fn read_byte(&mut self) -> Result<u8, E> {
        let mut value: u8 = 0;

        self.data.set_high()?;
        for i in 0..8 {
            self.sck.set_high()?;
            self.delay.delay_us(EDGE_DWELL_US);
            if self.data.is_high()? {
                value |= 0x80 >> i;
            }
            self.sck.set_low()?;
        }

        // Master acknowledge: pull DATA low for one clock pulse so the
        // device keeps transmitting, then release the line again.
        self.data.set_low()?;
        self.sck.set_high()?;
        self.delay.delay_us(EDGE_DWELL_US);
        self.sck.set_low()?;
        self.data.set_high()?;

        Ok(value)
    }
}
