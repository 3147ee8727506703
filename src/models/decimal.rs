//! Fixed-precision decimal helpers.
//!
//! Costs travel over the wire as strings with a fixed number of fraction
//! digits (`"0.001050"`, `"2871.60"`). History files written by older
//! deployments may hold plain numbers instead, so reads accept both.

use serde::{de, Deserialize, Deserializer, Serializer};

/// Renders `value` with `places` fraction digits, rounding the exact binary
/// value half away from zero. `0.5 * 21000 / 1e9` is stored just below
/// `0.0000105`, so it renders as `0.000010`.
pub fn to_fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // wide enough to hold every digit of any finite f64
    let exact = format!("{:.1100}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(places))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - places;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();

    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 && digits.iter().any(|d| *d != 0) {
        out.push('-');
    }
    out.push_str(&render(&digits[..split]));
    if places > 0 {
        out.push('.');
        out.push_str(&render(&digits[split..]));
    }
    out
}

pub fn round_to(value: f64, places: u32) -> f64 {
    to_fixed(value, places as usize).parse().unwrap_or(value)
}

pub fn six_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_fixed(*value, 6))
}

pub fn two_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_fixed(*value, 2))
}

pub fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid decimal: {}", s))),
    }
}
