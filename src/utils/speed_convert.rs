use crate::types::speed_limit::SpeedUnit;

const KM_PER_MILE: f64 = 1.609344;

/// Convert a speed between units for display.
///
/// Values expressed in mph are floored to the nearest multiple of 5 to match
/// posted US/UK limits, including when the value was already in mph.
pub fn convert_speed(speed: Option<u32>, from: SpeedUnit, to: SpeedUnit) -> Option<u32> {
    let speed = speed?;

    let converted = match (from, to) {
        (SpeedUnit::Kmh, SpeedUnit::Mph) => floor_to_five(speed as f64 / KM_PER_MILE),
        (SpeedUnit::Mph, SpeedUnit::Kmh) => (speed as f64 * KM_PER_MILE).round() as u32,
        (SpeedUnit::Mph, SpeedUnit::Mph) => floor_to_five(speed as f64),
        (SpeedUnit::Kmh, SpeedUnit::Kmh) => speed,
    };

    Some(converted)
}

fn floor_to_five(value: f64) -> u32 {
    ((value / 5.0).floor() * 5.0) as u32
}
