//! Conversion of raw SHT1x ticks into calibrated physical units.
//!
//! The coefficients are the Sensirion datasheet values for a 5 V supply at
//! the default 14-bit temperature / 12-bit humidity resolution, pre-scaled
//! so the whole conversion runs in integer arithmetic with two implied
//! decimal digits. A value of 2550 means 25.50.

/// Temperature offset, in 1/100 degC (-40.00 degC at 5 V supply).
const D1_X100: i64 = -4000;
/// Temperature slope, in 1/100 degC per tick (0.01 degC, 14-bit).
const D2_X100: i64 = 1;
/// Humidity polynomial constant term, scaled x100 (-4).
const C1_X100: i64 = -400;
/// Humidity linear coefficient, scaled x10_000 (0.0405).
const C2_X10K: i64 = 405;
/// Humidity quadratic coefficient, scaled x10_000_000 (-0.0000028).
const C3_X10M: i64 = -28;
/// Compensation constant term, scaled x100_000 (0.01).
const T1_X100K: i64 = 1000;
/// Compensation tick coefficient, scaled x100_000 (0.00008).
const T2_X100K: i64 = 8;

/// Lower humidity bound, 0.10 %RH in hundredths.
const HUMIDITY_MIN: i64 = 10;
/// Upper humidity bound, 100.00 %RH in hundredths.
const HUMIDITY_MAX: i64 = 10_000;

/// Raw tick pair produced by a pair of measurement transactions.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawReading {
    /// Raw 14-bit temperature conversion result.
    pub temperature_ticks: u16,
    /// Raw 12-bit humidity conversion result.
    pub humidity_ticks: u16,
}

/// Calibrated reading with two implied decimal digits per field.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Temperature in 1/100 degC (2550 means 25.50 degC).
    pub temperature: i32,
    /// Relative humidity in 1/100 %RH, clamped to [10, 10000].
    pub humidity: i32,
}

impl Reading {
    /// Temperature in degrees Celsius as an IEEE-754 single.
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    /// Relative humidity truncated to whole percent.
    pub fn humidity_percent(&self) -> i32 {
        self.humidity / 100
    }
}

/// Converts a raw tick pair into temperature and temperature-compensated
/// relative humidity.
///
/// Pure and deterministic. The humidity linearization is a second-order
/// polynomial in the humidity ticks, corrected by a term linear in the
/// deviation from 25 degC, and finally clamped to the physically possible
/// range of 0.10-100.00 %RH. The clamp is a range guard, not an error
/// condition: a failed measurement (ticks of 0xFFFF) flows through here
/// and comes out pinned to a bound rather than crashing.
pub fn calibrate(raw: RawReading) -> Reading {
    let t = i64::from(raw.temperature_ticks);
    let rh = i64::from(raw.humidity_ticks);

    let t_c = D1_X100 + D2_X100 * t;

    let rh_lin = (C3_X10M * rh * rh) / 100_000 + (C2_X10K * rh) / 100 + C1_X100;
    let rh_true = ((t_c - 2500) * (T1_X100K + T2_X100K * rh)) / 100_000 + rh_lin;
    let rh_true = rh_true.clamp(HUMIDITY_MIN, HUMIDITY_MAX);

    Reading {
        temperature: t_c as i32,
        humidity: rh_true as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sht1x::RAW_MEASUREMENT_FAILED;

    #[test]
    fn test_temperature_scale_anchors() {
        // 0 ticks sits at the scale origin, 4000 ticks at 0.00 degC.
        let freezing = calibrate(RawReading {
            temperature_ticks: 4000,
            humidity_ticks: 1486,
        });
        assert_eq!(freezing.temperature, 0);

        let origin = calibrate(RawReading {
            temperature_ticks: 0,
            humidity_ticks: 1486,
        });
        assert_eq!(origin.temperature, -4000);
    }

    #[test]
    fn test_midrange_reading() {
        // At 25.00 degC the compensation term vanishes and 1486 humidity
        // ticks linearize to exactly 50.00 %RH.
        let reading = calibrate(RawReading {
            temperature_ticks: 6500,
            humidity_ticks: 1486,
        });
        assert_eq!(
            reading,
            Reading {
                temperature: 2500,
                humidity: 5000,
            }
        );
        assert_eq!(reading.temperature_celsius(), 25.0);
        assert_eq!(reading.humidity_percent(), 50);
    }

    #[test]
    fn test_deterministic() {
        let raw = RawReading {
            temperature_ticks: 5123,
            humidity_ticks: 2047,
        };
        assert_eq!(calibrate(raw), calibrate(raw));
    }

    #[test]
    fn test_humidity_clamped_low() {
        // Zero humidity ticks linearize to -4.00 %RH, pinned to the floor.
        let reading = calibrate(RawReading {
            temperature_ticks: 6500,
            humidity_ticks: 0,
        });
        assert_eq!(reading.humidity, 10);
        assert_eq!(reading.humidity_percent(), 0);
    }

    #[test]
    fn test_humidity_clamped_high() {
        // Saturated 12-bit humidity ticks exceed 100 %RH before the clamp.
        let reading = calibrate(RawReading {
            temperature_ticks: 6500,
            humidity_ticks: 4095,
        });
        assert_eq!(reading.humidity, 10_000);
        assert_eq!(reading.humidity_percent(), 100);
    }

    #[test]
    fn test_failed_measurement_sentinel_stays_in_range() {
        // The 0xFFFF sentinel produces a nonsensical but clamped reading
        // instead of overflowing.
        let reading = calibrate(RawReading {
            temperature_ticks: RAW_MEASUREMENT_FAILED,
            humidity_ticks: RAW_MEASUREMENT_FAILED,
        });
        assert_eq!(reading.temperature, 61_535);
        assert_eq!(reading.humidity, 10);
    }

    #[test]
    fn test_humidity_always_within_bounds() {
        for humidity_ticks in (0..=u16::MAX).step_by(97) {
            let reading = calibrate(RawReading {
                temperature_ticks: 6500,
                humidity_ticks,
            });
            assert!((10..=10_000).contains(&reading.humidity));
        }
    }
}
