//! Fixed-layout report frame for the outbound serial link.

use crate::calibrate::Reading;

/// Length of the report frame in bytes.
pub const FRAME_LEN: usize = 10;

/// Frame header identifying a station report.
const HEADER: [u8; 3] = *b"STA";

/// Payload sentinel emitted in place of measurement data when the reading
/// is recognisably a sensor failure.
const SENSOR_ERROR: [u8; 5] = *b"SHTER";

const END_CR: u8 = 13;
const END_LF: u8 = 10;

/// Encodes a calibrated reading into the 10-byte report frame.
///
/// Layout: `['S','T','A', b3..b8, CR, LF]`. The five payload bytes carry
/// either the ASCII sentinel `SHTER` or the truncated integer humidity
/// followed by the four little-endian bytes of the temperature as an
/// IEEE-754 single. The sentinel is chosen when the humidity truncates to
/// 0 % or the temperature sits exactly on the -40.00 degC scale origin,
/// which is where a failed or disconnected sensor lands after calibration.
pub fn encode_report(reading: &Reading) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[..3].copy_from_slice(&HEADER);

    // -40.00 degC in hundredths; only zero ticks produce it.
    if reading.humidity_percent() == 0 || reading.temperature == -4000 {
        frame[3..8].copy_from_slice(&SENSOR_ERROR);
    } else {
        frame[3] = reading.humidity_percent() as u8;
        frame[4..8].copy_from_slice(&reading.temperature_celsius().to_le_bytes());
    }

    frame[8] = END_CR;
    frame[9] = END_LF;
    frame
}
