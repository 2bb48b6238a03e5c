//! Cookie octet validation and the RFC 6265 Set-Cookie / Cookie codecs


use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::byte_string::ByteString;
use crate::date;
use crate::error::{HttpWireError, Result};

/// `max_age` sentinel meaning "unset": a raw `i64` compared against
/// `i64::MIN`, not an `Option<i64>` — the `>= 0` comparison that gates
/// `Max-Age`/`Expires` emission is itself the contract.
pub const MAX_AGE_UNSET: i64 = i64::MIN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub wrap: bool,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            wrap: false,
            domain: None,
            path: None,
            max_age: MAX_AGE_UNSET,
            secure: false,
            http_only: false,
        }
    }
}

// --- Octet-class tables --------------------------------------------------

struct OctetClass([u64; 2]);

impl OctetClass {
    const fn empty() -> Self {
        OctetClass([0, 0])
    }

    const fn with(mut self, byte: u8) -> Self {
        let idx = (byte / 64) as usize;
        let bit = (byte % 64) as u64;
        self.0[idx] |= 1 << bit;
        self
    }

    const fn with_range(mut self, start: u8, end: u8) -> Self {
        let mut b = start;
        while b <= end {
            self = self.with(b);
            if b == u8::MAX {
                break;
            }
            b += 1;
        }
        self
    }

    fn allows(&self, byte: u8) -> bool {
        if byte >= 128 {
            return false;
        }
        let idx = (byte / 64) as usize;
        let bit = (byte % 64) as u64;
        (self.0[idx] >> bit) & 1 == 1
    }
}

impl OctetClass {
    const fn flip(mut self, byte: u8) -> Self {
        let idx = (byte / 64) as usize;
        let bit = (byte % 64) as u64;
        self.0[idx] &= !(1 << bit);
        self
    }
}

fn name_class() -> &'static OctetClass {
    static CLASS: std::sync::OnceLock<OctetClass> = std::sync::OnceLock::new();
    CLASS.get_or_init(|| {
        let mut c = OctetClass::empty().with_range(0x21, 0x7E);
        for &b in b"\"(),/:;<=>?@[\\]{}" {
            c = c.flip(b);
        }
        c
    })
}

fn value_class() -> &'static OctetClass {
    static CLASS: std::sync::OnceLock<OctetClass> = std::sync::OnceLock::new();
    CLASS.get_or_init(|| {
        OctetClass::empty()
            .with(0x21)
            .with_range(0x23, 0x2B)
            .with_range(0x2D, 0x3A)
            .with_range(0x3C, 0x5B)
            .with_range(0x5D, 0x7E)
    })
}

fn attribute_value_class() -> &'static OctetClass {
    static CLASS: std::sync::OnceLock<OctetClass> = std::sync::OnceLock::new();
    CLASS.get_or_init(|| OctetClass::empty().with_range(0x20, 0x7E).flip(b';'))
}

fn validate_bytes(s: &str, class: &OctetClass, what: &str) -> Result<()> {
    for b in s.bytes() {
        if !class.allows(b) {
            return Err(HttpWireError::invalid_argument(format!(
                "{} contains disallowed byte {:#04x}",
                what, b
            )));
        }
    }
    Ok(())
}

pub fn validate_cookie_name(name: &str) -> Result<()> {
    validate_bytes(name, name_class(), "cookie name")
}

pub fn validate_cookie_value(value: &str) -> Result<()> {
    validate_bytes(value, value_class(), "cookie value")
}

pub fn validate_attribute_value(value: &str) -> Result<()> {
    validate_bytes(value, attribute_value_class(), "cookie attribute value")
}

/// If the value is double-quote wrapped, strips matching quotes; errors
/// on an unbalanced leading/trailing quote.
pub fn unwrap_value(value: &str) -> Result<&str> {
    let bytes = value.as_bytes();
    if bytes.first() != Some(&b'"') {
        return Ok(value);
    }
    if bytes.len() < 2 || *bytes.last().unwrap() != b'"' {
        return Err(HttpWireError::invalid_argument("unbalanced cookie value quoting"));
    }
    Ok(&value[1..value.len() - 1])
}

// --- Encoding -------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieEncoderMode {
    Strict,
    Lax,
}

pub struct ServerCookieEncoder {
    mode: CookieEncoderMode,
    clock: fn() -> DateTime<Utc>,
}

impl ServerCookieEncoder {
    pub fn strict() -> Self {
        ServerCookieEncoder {
            mode: CookieEncoderMode::Strict,
            clock: Utc::now,
        }
    }

    pub fn lax() -> Self {
        ServerCookieEncoder {
            mode: CookieEncoderMode::Lax,
            clock: Utc::now,
        }
    }

    /// Overrides the clock used for `Max-Age`/`Expires`; lets tests pin
    /// "now" in tests.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn validate(&self, cookie: &Cookie) -> Result<()> {
        if self.mode == CookieEncoderMode::Lax {
            return Ok(());
        }
        validate_cookie_name(&cookie.name)?;
        validate_cookie_value(&cookie.value)?;
        if let Some(domain) = &cookie.domain {
            validate_attribute_value(domain)?;
        }
        if let Some(path) = &cookie.path {
            validate_attribute_value(path)?;
        }
        Ok(())
    }

    pub fn encode(&self, cookie: &Cookie) -> Result<ByteString> {
        self.validate(cookie)?;
        Ok(ByteString::from(self.encode_one(cookie)))
    }

    /// Encodes a batch. In strict mode, only the last occurrence of each
    /// cookie name survives; lax mode emits
    /// every cookie, duplicates included.
    pub fn encode_all(&self, cookies: &[Cookie]) -> Result<Vec<ByteString>> {
        for c in cookies {
            self.validate(c)?;
        }

        let survivors: Vec<usize> = match self.mode {
            CookieEncoderMode::Lax => (0..cookies.len()).collect(),
            CookieEncoderMode::Strict => {
                let mut last_index_for: HashMap<&str, usize> = HashMap::new();
                for (i, c) in cookies.iter().enumerate() {
                    last_index_for.insert(&c.name, i);
                }
                (0..cookies.len())
                    .filter(|i| last_index_for.get(cookies[*i].name.as_str()) == Some(i))
                    .collect()
            }
        };

        Ok(survivors
            .into_iter()
            .map(|i| ByteString::from(self.encode_one(&cookies[i])))
            .collect())
    }

    fn encode_one(&self, cookie: &Cookie) -> String {
        let mut out = String::new();
        out.push_str(&cookie.name);
        out.push('=');
        if cookie.wrap {
            push_quoted_value(&mut out, &cookie.value);
        } else {
            out.push_str(&cookie.value);
        }
        out.push_str("; ");

        if cookie.max_age != MAX_AGE_UNSET {
            out.push_str(&format!("Max-Age={}; ", cookie.max_age));
            let expires = (self.clock)() + chrono::Duration::seconds(cookie.max_age);
            out.push_str(&format!("Expires={}; ", date::format_http_date(&expires)));
        }
        if let Some(path) = &cookie.path {
            out.push_str(&format!("Path={}; ", path));
        }
        if let Some(domain) = &cookie.domain {
            out.push_str(&format!("Domain={}; ", domain));
        }
        if cookie.secure {
            out.push_str("Secure; ");
        }
        if cookie.http_only {
            out.push_str("HTTPOnly; ");
        }

        if out.ends_with("; ") {
            out.truncate(out.len() - 2);
        }
        out
    }
}

/// Appends a double-quote-wrapped value, writing the closing quote
/// twice. Preserved verbatim rather than silently "fixed".
fn push_quoted_value(out: &mut String, value: &str) {
    out.push('"');
    out.push_str(value);
    out.push('"');
    out.push('"');
}

pub struct ClientCookieEncoder {
    mode: CookieEncoderMode,
}

impl ClientCookieEncoder {
    pub fn strict() -> Self {
        ClientCookieEncoder {
            mode: CookieEncoderMode::Strict,
        }
    }

    pub fn lax() -> Self {
        ClientCookieEncoder {
            mode: CookieEncoderMode::Lax,
        }
    }

    pub fn encode(&self, cookies: &[Cookie]) -> Result<ByteString> {
        let mut parts = Vec::with_capacity(cookies.len());
        for cookie in cookies {
            if self.mode == CookieEncoderMode::Strict {
                validate_cookie_name(&cookie.name)?;
                validate_cookie_value(&cookie.value)?;
            }
            let mut part = String::new();
            part.push_str(&cookie.name);
            part.push('=');
            if cookie.wrap {
                push_quoted_value(&mut part, &cookie.value);
            } else {
                part.push_str(&cookie.value);
            }
            parts.push(part);
        }
        Ok(ByteString::from(parts.join("; ")))
    }
}

pub struct CookieDecoder {
    mode: CookieEncoderMode,
}

impl CookieDecoder {
    pub fn strict() -> Self {
        CookieDecoder {
            mode: CookieEncoderMode::Strict,
        }
    }

    pub fn lax() -> Self {
        CookieDecoder {
            mode: CookieEncoderMode::Lax,
        }
    }

    pub fn decode(&self, header_value: &str) -> Result<Vec<Cookie>> {
        let mut cookies = Vec::new();
        for segment in header_value.split(';') {
            let segment = segment.trim_matches(|c: char| c == ' ' || c == '\t');
            if segment.is_empty() {
                continue;
            }
            let eq = match segment.find('=') {
                Some(i) => i,
                None => {
                    if self.mode == CookieEncoderMode::Strict {
                        return Err(HttpWireError::invalid_argument(format!(
                            "cookie segment missing '=': {:?}",
                            segment
                        )));
                    }
                    continue;
                }
            };
            let name = &segment[..eq];
            let raw_value = &segment[eq + 1..];
            let value = match unwrap_value(raw_value) {
                Ok(v) => v,
                Err(e) => {
                    if self.mode == CookieEncoderMode::Strict {
                        return Err(e);
                    }
                    continue;
                }
            };

            if self.mode == CookieEncoderMode::Strict {
                validate_cookie_name(name)?;
                validate_cookie_value(value)?;
            }
            cookies.push(Cookie::new(name, value));
        }
        Ok(cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pinned_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()
    }

    #[test]
    fn strict_encoding_matches_scenario_a() {
        let mut cookie = Cookie::new("myCookie", "myValue");
        cookie.domain = Some(".adomainsomewhere".to_string());
        cookie.path = Some("/apathsomewhere".to_string());
        cookie.secure = true;
        cookie.max_age = 50;

        let encoder = ServerCookieEncoder::strict().with_clock(pinned_clock);
        let encoded = encoder.encode(&cookie).unwrap();
        assert_eq!(
            encoded.as_str().unwrap(),
            "myCookie=myValue; Max-Age=50; Expires=Sat, 01 Jan 2000 00:00:49 GMT; Path=/apathsomewhere; Domain=.adomainsomewhere; Secure"
        );
    }

    #[test]
    fn strict_dedup_keeps_last_occurrence() {
        let cookies = vec![
            Cookie::new("cookie1", "value1"),
            Cookie::new("cookie2", "value2"),
            Cookie::new("cookie1", "value3"),
        ];
        let encoded = ServerCookieEncoder::strict().encode_all(&cookies).unwrap();
        let strs: Vec<&str> = encoded.iter().map(|b| b.as_str().unwrap()).collect();
        assert_eq!(strs, vec!["cookie2=value2", "cookie1=value3"]);
    }

    #[test]
    fn lax_dedup_absent() {
        let cookies = vec![
            Cookie::new("cookie1", "value1"),
            Cookie::new("cookie2", "value2"),
            Cookie::new("cookie1", "value3"),
        ];
        let encoded = ServerCookieEncoder::lax().encode_all(&cookies).unwrap();
        let strs: Vec<&str> = encoded.iter().map(|b| b.as_str().unwrap()).collect();
        assert_eq!(strs, vec!["cookie1=value1", "cookie2=value2", "cookie1=value3"]);
    }

    #[test]
    fn illegal_cookie_name_chars_rejected() {
        for ctl in (0x00u8..=0x1F).chain(std::iter::once(0x7F)) {
            let name = format!("a{}b", ctl as char);
            assert!(validate_cookie_name(&name).is_err(), "ctl byte {:#04x} should be rejected", ctl);
        }
        for sep in b"\"(),/:;<=>?@[\\]{}" {
            let name = format!("a{}b", *sep as char);
            assert!(validate_cookie_name(&name).is_err(), "separator {:?} should be rejected", *sep as char);
        }
    }

    #[test]
    fn lax_mode_skips_validation() {
        let mut cookie = Cookie::new("bad name", "bad;value");
        cookie.max_age = MAX_AGE_UNSET;
        assert!(ServerCookieEncoder::lax().encode(&cookie).is_ok());
        assert!(ServerCookieEncoder::strict().encode(&cookie).is_err());
    }

    #[test]
    fn encode_idempotent_for_lax() {
        let cookie = Cookie::new("a", "b");
        let encoder = ServerCookieEncoder::lax();
        assert_eq!(encoder.encode(&cookie).unwrap(), encoder.encode(&cookie).unwrap());
    }

    #[test]
    fn quoted_value_duplicates_closing_quote() {
        let mut cookie = Cookie::new("a", "b");
        cookie.wrap = true;
        let encoded = ServerCookieEncoder::lax().encode(&cookie).unwrap();
        assert_eq!(encoded.as_str().unwrap(), "a=\"b\"\"");
    }

    #[test]
    fn unwrap_value_requires_balanced_quotes() {
        assert_eq!(unwrap_value("\"abc\"").unwrap(), "abc");
        assert_eq!(unwrap_value("abc").unwrap(), "abc");
        assert!(unwrap_value("\"abc").is_err());
    }

    #[test]
    fn client_encoder_joins_with_semicolon_space() {
        let cookies = vec![Cookie::new("a", "1"), Cookie::new("b", "2")];
        let encoded = ClientCookieEncoder::strict().encode(&cookies).unwrap();
        assert_eq!(encoded.as_str().unwrap(), "a=1; b=2");
    }

    #[test]
    fn client_encoder_wrap_matches_server_quoting_anomaly() {
        let mut cookie = Cookie::new("a", "b");
        cookie.wrap = true;
        let server = ServerCookieEncoder::lax().encode(&cookie).unwrap();
        let client = ClientCookieEncoder::lax().encode(&[cookie]).unwrap();
        assert_eq!(client.as_str().unwrap(), "a=\"b\"\"");
        assert_eq!(server.as_str().unwrap(), client.as_str().unwrap());
    }

    #[test]
    fn decoder_round_trips_client_encoding() {
        let cookies = vec![Cookie::new("a", "1"), Cookie::new("b", "2")];
        let encoded = ClientCookieEncoder::strict().encode(&cookies).unwrap();
        let decoded = CookieDecoder::strict().decode(encoded.as_str().unwrap()).unwrap();
        assert_eq!(decoded[0].name, "a");
        assert_eq!(decoded[0].value, "1");
        assert_eq!(decoded[1].name, "b");
        assert_eq!(decoded[1].value, "2");
    }

    #[test]
    fn decoder_lax_skips_malformed_segments() {
        let decoded = CookieDecoder::lax().decode("a=1; garbage; b=2").unwrap();
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn decoder_strict_rejects_malformed_segments() {
        assert!(CookieDecoder::strict().decode("a=1; garbage; b=2").is_err());
    }
}
