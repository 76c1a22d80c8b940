pub const TEMPERATURE_MIN_CELSIUS: f64 = -127.99;
pub const TEMPERATURE_MAX_CELSIUS: f64 = 127.99;
pub const HUMIDITY_MIN_PERCENT: f64 = 0.0;
pub const HUMIDITY_MAX_PERCENT: f64 = 100.0;
pub const BATTERY_MIN_PERCENT: u8 = 0;
pub const BATTERY_MAX_PERCENT: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temperature_celsius: f64,

    pub humidity_percent: f64,

    pub battery_percent: u8,
}

impl SensorReading {
    /// Names of the fields whose value lies outside the range the gateway
    /// properties declare. Decoding never clamps, so a garbled frame can
    /// land here.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();

        if !(TEMPERATURE_MIN_CELSIUS..=TEMPERATURE_MAX_CELSIUS).contains(&self.temperature_celsius)
        {
            fields.push("temperature");
        }
        if !(HUMIDITY_MIN_PERCENT..=HUMIDITY_MAX_PERCENT).contains(&self.humidity_percent) {
            fields.push("humidity");
        }
        if !(BATTERY_MIN_PERCENT..=BATTERY_MAX_PERCENT).contains(&self.battery_percent) {
            fields.push("battery");
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_reading_reports_nothing() {
        let reading = SensorReading {
            temperature_celsius: 25.24,
            humidity_percent: 51.64,
            battery_percent: 60,
        };
        assert!(reading.out_of_range_fields().is_empty());
    }

    #[test]
    fn reports_every_field_outside_declared_bounds() {
        let reading = SensorReading {
            temperature_celsius: 655.35,
            humidity_percent: 100.01,
            battery_percent: 255,
        };
        assert_eq!(
            reading.out_of_range_fields(),
            vec!["temperature", "humidity", "battery"]
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let reading = SensorReading {
            temperature_celsius: TEMPERATURE_MAX_CELSIUS,
            humidity_percent: HUMIDITY_MAX_PERCENT,
            battery_percent: BATTERY_MAX_PERCENT,
        };
        assert!(reading.out_of_range_fields().is_empty());
    }
}
