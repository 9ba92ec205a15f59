//! Share-link encoding: the flat `a`/`s`/`d`/`c`/`c2` query string.
//!
//! Encoding is canonical (fixed key order and precision) so links shared
//! from any build decode to the same tree. Decoding is per field and never
//! fails as a whole; see [`crate::ParameterStore::load_from_query`].

use std::collections::BTreeMap;
use std::fmt;

use crate::color::Rgb;
use crate::constants;
use crate::params::FractalParameters;

pub const KEY_ANGLE: &str = "a";
pub const KEY_SCALE: &str = "s";
pub const KEY_DEPTH: &str = "d";
pub const KEY_COLOR_START: &str = "c";
pub const KEY_COLOR_END: &str = "c2";

/// Decoded query parameters. The first occurrence of a repeated key wins.
pub type QueryMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// The canonical share encoding of one parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareQuery {
    pairs: Vec<(&'static str, String)>,
}

impl ShareQuery {
    pub fn from_params(params: &FractalParameters) -> Self {
        Self {
            pairs: vec![
                (KEY_ANGLE, format!("{:.1}", params.branch_angle_degrees)),
                (KEY_SCALE, format!("{:.2}", params.scale_factor)),
                (KEY_DEPTH, params.depth.to_string()),
                (KEY_COLOR_START, params.color_start.to_bare_hex()),
                (KEY_COLOR_END, params.color_end.to_bare_hex()),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `base` with any existing query or fragment replaced by this query.
    pub fn to_url(&self, base: &str) -> String {
        let end = base.find(['?', '#']).unwrap_or(base.len());
        format!("{}?{}", &base[..end], self)
    }
}

impl fmt::Display for ShareQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ShareQuery {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Split a URL, `?query`, or bare `k=v&k=v` string into a [`QueryMap`].
///
/// Percent escapes and `+` are decoded. A URL with no `?` yields an empty map.
/// When a key repeats, only its first value is kept.
pub fn parse_query(input: &str) -> QueryMap {
    let input = input.trim();
    let query = match input.split_once('?') {
        Some((_, q)) => q,
        None if input.contains("://") => "",
        None => input,
    };
    let query = query.split('#').next().unwrap_or("");

    let mut map = QueryMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        map.entry(percent_decode(k))
            .or_insert_with(|| percent_decode(v));
    }
    map
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Branch angle from `a`, if it parses and lies within range.
pub fn decode_angle(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| constants::ANGLE.contains(*v))
}

/// Scale factor from `s`, if it parses and lies within range.
pub fn decode_scale(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| constants::SCALE.contains(*v))
}

/// Depth from `d`, if it parses as an integer and lies within range.
///
/// Fractional input such as `7.5` is rejected rather than truncated.
pub fn decode_depth(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| constants::DEPTH.contains(*v))
}

/// Color from `c` / `c2`: exactly six hex digits, no `#`.
pub fn decode_color(raw: &str) -> Option<Rgb> {
    Rgb::from_bare_hex(raw).ok()
}
