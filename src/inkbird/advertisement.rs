use std::collections::HashMap;

use crate::inkbird::SensorReading;

/// Local name the IBS-TH1 Mini puts in its advertisements.
pub const INKBIRD_LOCAL_NAME: &str = "sps";

pub const INKBIRD_MANUFACTURER_DATA_LEN: usize = 9;

const TEMPERATURE_OFFSET: usize = 0;
const HUMIDITY_OFFSET: usize = 2;
const BATTERY_OFFSET: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advertisement {
    pub local_name: Option<String>,

    /// Raw manufacturer-specific data, company id bytes included.
    pub manufacturer_data: Vec<u8>,
}

/// Returns the manufacturer data when the advertisement comes from an
/// IBS-TH1 Mini, `None` otherwise.
pub fn match_advertisement(
    advertisement: &Advertisement,
) -> Option<[u8; INKBIRD_MANUFACTURER_DATA_LEN]> {
    if advertisement.local_name.as_deref() != Some(INKBIRD_LOCAL_NAME) {
        return None;
    }

    advertisement.manufacturer_data.as_slice().try_into().ok()
}

pub fn decode_manufacturer_data(
    manufacturer_data: &[u8; INKBIRD_MANUFACTURER_DATA_LEN],
) -> SensorReading {
    let temperature_raw = u16::from_le_bytes([
        manufacturer_data[TEMPERATURE_OFFSET],
        manufacturer_data[TEMPERATURE_OFFSET + 1],
    ]);
    let humidity_raw = u16::from_le_bytes([
        manufacturer_data[HUMIDITY_OFFSET],
        manufacturer_data[HUMIDITY_OFFSET + 1],
    ]);

    SensorReading {
        temperature_celsius: f64::from(temperature_raw) / 100f64,
        humidity_percent: f64::from(humidity_raw) / 100f64,
        battery_percent: manufacturer_data[BATTERY_OFFSET],
    }
}

/// Rebuilds the raw manufacturer-data blob from a `company id -> bytes` map.
///
/// The IBS-TH1 Mini stores its temperature where the company id normally
/// goes, so the id has to be put back in front of the payload before
/// decoding. With several entries, the first one (by company id)
/// reassembling to the expected length wins.
///
/// Company id order says nothing about freshness: if a stack ever reports
/// two 9-byte entries, the one with the lower leading bytes (the lower
/// temperature, for this sensor) is picked regardless of which arrived
/// last. Feed it the map from a single advertisement event, not the
/// peripheral's accumulated properties.
pub fn reassemble_manufacturer_data(manufacturer_data: &HashMap<u16, Vec<u8>>) -> Vec<u8> {
    let mut entries: Vec<(&u16, &Vec<u8>)> = manufacturer_data.iter().collect();
    entries.sort_by_key(|(company_id, _)| **company_id);

    let entry = entries
        .iter()
        .find(|(_, data)| data.len() + 2 == INKBIRD_MANUFACTURER_DATA_LEN)
        .or_else(|| entries.first());

    let Some((company_id, data)) = entry else {
        return Vec::new();
    };

    let mut raw = Vec::with_capacity(data.len() + 2);
    raw.extend_from_slice(&company_id.to_le_bytes());
    raw.extend_from_slice(data);
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 9] = [0xdc, 0x09, 0x2c, 0x14, 0x00, 0x00, 0x00, 0x3c, 0x00];

    fn advertisement(local_name: Option<&str>, manufacturer_data: &[u8]) -> Advertisement {
        Advertisement {
            local_name: local_name.map(str::to_owned),
            manufacturer_data: manufacturer_data.to_vec(),
        }
    }

    #[test]
    fn decodes_sample_frame() {
        let reading = decode_manufacturer_data(&SAMPLE);
        assert_eq!(reading.temperature_celsius, 25.24);
        assert_eq!(reading.humidity_percent, 51.64);
        assert_eq!(reading.battery_percent, 60);
    }

    #[test]
    fn decodes_fields_at_fixed_offsets() {
        let cases = [
            (0x00, 0x00, 0),
            (0xff, 0x00, 1),
            (0x34, 0x12, 99),
            (0xff, 0xff, 255),
        ];

        for (lo, hi, battery) in cases {
            let frame = [lo, hi, hi, lo, 0xaa, 0xbb, 0xcc, battery, 0xdd];
            let reading = decode_manufacturer_data(&frame);

            let expected_temperature = (f64::from(lo) + 256f64 * f64::from(hi)) / 100f64;
            let expected_humidity = (f64::from(hi) + 256f64 * f64::from(lo)) / 100f64;
            assert_eq!(reading.temperature_celsius, expected_temperature);
            assert_eq!(reading.humidity_percent, expected_humidity);
            assert_eq!(reading.battery_percent, battery);
        }
    }

    #[test]
    fn passes_out_of_range_values_through() {
        let frame = [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0xff, 0];
        let reading = decode_manufacturer_data(&frame);
        assert_eq!(reading.temperature_celsius, 655.35);
        assert_eq!(reading.humidity_percent, 655.35);
        assert_eq!(reading.battery_percent, 255);
    }

    #[test]
    fn accepts_matching_advertisement() {
        let adv = advertisement(Some("sps"), &SAMPLE);
        assert_eq!(match_advertisement(&adv), Some(SAMPLE));
    }

    #[test]
    fn rejects_other_local_names() {
        assert_eq!(match_advertisement(&advertisement(None, &SAMPLE)), None);
        assert_eq!(match_advertisement(&advertisement(Some(""), &SAMPLE)), None);
        assert_eq!(match_advertisement(&advertisement(Some("SPS"), &SAMPLE)), None);
        assert_eq!(match_advertisement(&advertisement(Some("tps"), &SAMPLE)), None);
    }

    #[test]
    fn rejects_wrong_payload_length() {
        assert_eq!(match_advertisement(&advertisement(Some("sps"), &[])), None);
        assert_eq!(match_advertisement(&advertisement(Some("sps"), &SAMPLE[..8])), None);

        let mut long = SAMPLE.to_vec();
        long.push(0);
        assert_eq!(match_advertisement(&advertisement(Some("sps"), &long)), None);
    }

    #[test]
    fn reassembly_puts_company_id_in_front() {
        let manufacturer_data = HashMap::from([(0x09dc, vec![0x2c, 0x14, 0, 0, 0, 0x3c, 0])]);
        assert_eq!(reassemble_manufacturer_data(&manufacturer_data), SAMPLE.to_vec());
    }

    #[test]
    fn reassembly_prefers_entry_of_expected_length() {
        let manufacturer_data = HashMap::from([
            (0x0001, vec![0x01]),
            (0x09dc, vec![0x2c, 0x14, 0, 0, 0, 0x3c, 0]),
        ]);
        assert_eq!(reassemble_manufacturer_data(&manufacturer_data), SAMPLE.to_vec());
    }

    #[test]
    fn reassembly_picks_lowest_company_id_among_full_entries() {
        let manufacturer_data = HashMap::from([
            (0x0a10, vec![0x88, 0x13, 0, 0, 0, 0x3b, 0]),
            (0x09dc, vec![0x2c, 0x14, 0, 0, 0, 0x3c, 0]),
        ]);
        assert_eq!(reassemble_manufacturer_data(&manufacturer_data), SAMPLE.to_vec());
    }

    #[test]
    fn reassembly_falls_back_to_lowest_company_id() {
        let manufacturer_data = HashMap::from([(0x0969, vec![0x01, 0x02]), (0x0004, vec![0x03])]);
        assert_eq!(
            reassemble_manufacturer_data(&manufacturer_data),
            vec![0x04, 0x00, 0x03]
        );
    }

    #[test]
    fn reassembly_of_empty_map_is_empty() {
        assert!(reassemble_manufacturer_data(&HashMap::new()).is_empty());
    }
}
