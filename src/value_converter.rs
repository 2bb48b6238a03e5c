//! Bidirectional conversion between scalar Rust types and the `ByteString`
//! values stored in a `HeaderMap`.

use std::convert::TryFrom;

use chrono::{DateTime, TimeZone, Utc};

use crate::byte_string::ByteString;
use crate::date;
use crate::error::{HttpWireError, Result};

pub trait ValueConverter<V> {
    fn convert_bool(&self, value: bool) -> V;
    fn convert_to_bool(&self, value: &V) -> Result<bool>;

    fn convert_byte(&self, value: u8) -> V;
    fn convert_to_byte(&self, value: &V) -> Result<u8>;

    fn convert_char(&self, value: u16) -> V;
    fn convert_to_char(&self, value: &V) -> Result<u16>;

    fn convert_short(&self, value: i16) -> V;
    fn convert_to_short(&self, value: &V) -> Result<i16>;

    fn convert_int(&self, value: i32) -> V;
    fn convert_to_int(&self, value: &V) -> Result<i32>;

    fn convert_long(&self, value: i64) -> V;
    fn convert_to_long(&self, value: &V) -> Result<i64>;

    fn convert_float(&self, value: f32) -> V;
    fn convert_to_float(&self, value: &V) -> Result<f32>;

    fn convert_double(&self, value: f64) -> V;
    fn convert_to_double(&self, value: &V) -> Result<f64>;

    fn convert_time_millis(&self, value: i64) -> V;
    fn convert_to_time_millis(&self, value: &V) -> Result<i64>;
}

/// The converter used by the hot header map: `V = ByteString`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteStringValueConverter;

impl ValueConverter<ByteString> for ByteStringValueConverter {
    fn convert_bool(&self, value: bool) -> ByteString {
        ByteString::from_static(if value { "1" } else { "0" })
    }

    fn convert_to_bool(&self, value: &ByteString) -> Result<bool> {
        value.parse_boolean()
    }

    fn convert_byte(&self, value: u8) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_byte(&self, value: &ByteString) -> Result<u8> {
        let v = value.parse_long(0, value.len(), 10)?;
        u8::try_from(v).map_err(|_| HttpWireError::parse_error("byte out of range"))
    }

    fn convert_char(&self, value: u16) -> ByteString {
        ByteString::from_code_units(&[value])
    }

    fn convert_to_char(&self, value: &ByteString) -> Result<u16> {
        value.char_at(0)
    }

    fn convert_short(&self, value: i16) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_short(&self, value: &ByteString) -> Result<i16> {
        value.parse_short(0, value.len(), 10)
    }

    fn convert_int(&self, value: i32) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_int(&self, value: &ByteString) -> Result<i32> {
        value.parse_int(0, value.len(), 10)
    }

    fn convert_long(&self, value: i64) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_long(&self, value: &ByteString) -> Result<i64> {
        value.parse_long(0, value.len(), 10)
    }

    fn convert_float(&self, value: f32) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_float(&self, value: &ByteString) -> Result<f32> {
        value.parse_float()
    }

    fn convert_double(&self, value: f64) -> ByteString {
        ByteString::from(value.to_string())
    }

    fn convert_to_double(&self, value: &ByteString) -> Result<f64> {
        value.parse_double()
    }

    fn convert_time_millis(&self, value: i64) -> ByteString {
        let dt = millis_to_datetime(value);
        ByteString::from(date::format_http_date(&dt))
    }

    fn convert_to_time_millis(&self, value: &ByteString) -> Result<i64> {
        let s = value
            .as_str()
            .map_err(|_| HttpWireError::malformed_date("header date is not valid ASCII"))?;
        let dt = date::parse_http_date(s)?;
        Ok(dt.timestamp_millis())
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_each_scalar() {
        let c = ByteStringValueConverter;
        assert!(c.convert_to_bool(&c.convert_bool(true)).unwrap());
        assert_eq!(c.convert_to_int(&c.convert_int(-42)).unwrap(), -42);
        assert_eq!(c.convert_to_long(&c.convert_long(i64::MIN + 1)).unwrap(), i64::MIN + 1);
        assert_eq!(c.convert_to_short(&c.convert_short(-7)).unwrap(), -7);
        assert_eq!(c.convert_to_char(&c.convert_char(b'Q' as u16)).unwrap(), b'Q' as u16);
        assert_eq!(c.convert_to_byte(&c.convert_byte(200)).unwrap(), 200);
    }

    #[test]
    fn time_millis_round_trips_to_second_precision() {
        let c = ByteStringValueConverter;
        let now_ms = 1_700_000_000_000i64;
        let encoded = c.convert_time_millis(now_ms);
        let decoded = c.convert_to_time_millis(&encoded).unwrap();
        assert_eq!(decoded, (now_ms / 1000) * 1000);
    }

    #[test]
    fn malformed_date_fails_reverse_conversion() {
        let c = ByteStringValueConverter;
        let garbage = ByteString::from("not a date");
        assert!(c.convert_to_time_millis(&garbage).is_err());
    }
}
