use crate::feed::coerce;
use crate::geo::LatLon;
use crate::prelude::{ReduceError, ReduceResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_FIX_LABEL: &str = "N/A";
pub const DEFAULT_REAL_FIX_FLAG: &str = "false";
pub const REAL_FIX_FLAG: &str = "true";

/// One normalized GPS reading, rebuilt from every inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub latitude: f64,
    pub longitude: f64,
    pub heading: f64,
    pub speed_mph: f64,
    pub horizontal_dilution: f64,
    pub vertical_dilution: f64,
    pub altitude_ft: f64,
    pub satellite_count: u32,
    pub fix_quality: String,
    pub is_real_fix: String,
}

impl TelemetrySample {
    pub fn from_payload(payload: &[u8]) -> ReduceResult<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        let fields = value.as_object().ok_or(ReduceError::NotAnObject)?;
        Self::from_fields(fields)
    }

    /// Only `lat` and `lon` can reject a message; every other field defaults.
    pub fn from_fields(fields: &Map<String, Value>) -> ReduceResult<Self> {
        let lat = fields.get("lat");
        let lon = fields.get("lon");
        let (latitude, longitude) = match (coerce::number(lat), coerce::number(lon)) {
            (Some(latitude), Some(longitude)) => (latitude, longitude),
            _ => {
                return Err(ReduceError::MissingCoordinates {
                    lat: lat.map(Value::to_string),
                    lon: lon.map(Value::to_string),
                })
            }
        };

        Ok(Self {
            latitude,
            longitude,
            heading: coerce::float_or_default(fields.get("heading"), 0.0),
            speed_mph: coerce::float_or_default(fields.get("speed"), 0.0),
            horizontal_dilution: coerce::float_or_default(fields.get("hdop"), 0.0),
            vertical_dilution: coerce::float_or_default(fields.get("vdop"), 0.0),
            altitude_ft: coerce::float_or_default(fields.get("altitude"), 0.0),
            satellite_count: coerce::count_or_default(fields.get("sats"), 0),
            fix_quality: coerce::label_or_default(fields.get("fix"), DEFAULT_FIX_LABEL),
            is_real_fix: coerce::flag_or_default(fields.get("actual"), DEFAULT_REAL_FIX_FLAG),
        })
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    pub fn has_real_fix(&self) -> bool {
        self.is_real_fix == REAL_FIX_FLAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_message_is_normalized() {
        let sample = TelemetrySample::from_payload(
            br#"{"lat":"51.5007","lon":-0.1246,"heading":"270","speed":31.26,
                "hdop":"0.9","vdop":1.7,"altitude":"112.4","sats":"9","fix":"3D","actual":"true"}"#,
        )
        .unwrap();

        assert_eq!(sample.position(), LatLon::new(51.5007, -0.1246));
        assert_eq!(sample.heading, 270.0);
        assert_eq!(sample.speed_mph, 31.26);
        assert_eq!(sample.horizontal_dilution, 0.9);
        assert_eq!(sample.vertical_dilution, 1.7);
        assert_eq!(sample.altitude_ft, 112.4);
        assert_eq!(sample.satellite_count, 9);
        assert_eq!(sample.fix_quality, "3D");
        assert!(sample.has_real_fix());
    }

    #[test]
    fn optional_fields_take_defaults() {
        let sample = TelemetrySample::from_payload(br#"{"lat":10.0,"lon":20.0,"speed":"n/a"}"#)
            .unwrap();
        assert_eq!(sample.heading, 0.0);
        assert_eq!(sample.speed_mph, 0.0);
        assert_eq!(sample.satellite_count, 0);
        assert_eq!(sample.fix_quality, DEFAULT_FIX_LABEL);
        assert_eq!(sample.is_real_fix, DEFAULT_REAL_FIX_FLAG);
        assert!(!sample.has_real_fix());
    }

    #[test]
    fn missing_or_unparseable_coordinates_are_rejected() {
        for payload in [
            r#"{"lon":20.0}"#,
            r#"{"lat":10.0}"#,
            r#"{"lat":null,"lon":20.0}"#,
            r#"{"lat":"","lon":20.0}"#,
            r#"{"lat":"north","lon":20.0}"#,
            r#"{"lat":false,"lon":20.0}"#,
        ] {
            let err = TelemetrySample::from_payload(payload.as_bytes()).unwrap_err();
            assert!(
                matches!(err, ReduceError::MissingCoordinates { .. }),
                "{payload} -> {err}"
            );
        }
    }

    #[test]
    fn zero_coordinates_are_a_real_position() {
        let sample = TelemetrySample::from_payload(br#"{"lat":0,"lon":0}"#).unwrap();
        assert_eq!(sample.position(), LatLon::new(0.0, 0.0));
    }

    #[test]
    fn non_objects_and_garbage_are_rejected() {
        assert!(matches!(
            TelemetrySample::from_payload(b"[1,2]"),
            Err(ReduceError::NotAnObject)
        ));
        assert!(matches!(
            TelemetrySample::from_payload(b"null"),
            Err(ReduceError::NotAnObject)
        ));
        assert!(matches!(
            TelemetrySample::from_payload(b"{lat:"),
            Err(ReduceError::Malformed(_))
        ));
        assert!(matches!(
            TelemetrySample::from_payload(&[0xff, 0xfe]),
            Err(ReduceError::Malformed(_))
        ));
    }

    #[test]
    fn wire_payload_parses_back() {
        let payload = crate::feed::GpsPayload {
            lat: 47.6,
            lon: -122.3,
            heading: 45.0,
            speed: 12.0,
            hdop: 1.1,
            vdop: 2.2,
            altitude: 150.0,
            sats: 7,
            fix: "3D".into(),
            actual: "false".into(),
        };
        let sample = TelemetrySample::from_payload(&payload.to_bytes().unwrap()).unwrap();
        assert_eq!(sample.satellite_count, 7);
        assert!(!sample.has_real_fix());
    }
}
