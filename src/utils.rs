use crate::error::{Error, Result};

use nom::{bytes::complete::take, IResult};
use std::fmt::Write;

pub struct Utils;

impl Utils {
    /// Lowercase hex dump, as used for frame logging and fixture files.
    pub fn hex(bytes: &[u8]) -> String {
        let mut s = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            // writing to a String cannot fail
            let _ = write!(s, "{:02x}", b);
        }
        s
    }

    /// Parse a hex string, ignoring whitespace (fixture files end in a newline).
    pub fn from_hex(input: &str) -> Result<Vec<u8>> {
        let digits: Vec<u8> = input
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        if digits.len() % 2 != 0 {
            return Err(Error::FrameInvalid(format!(
                "odd number of hex digits ({})",
                digits.len()
            )));
        }

        digits
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
                    .ok_or_else(|| Error::FrameInvalid(format!("bad hex digits {:?}", pair)))
            })
            .collect()
    }

    /// Round to the nearest integer, ties to even. Inverter-side totals are
    /// computed this way, so 240.5 W must read as 240.
    pub fn round_even(value: f64) -> f64 {
        value.round_ties_even()
    }

    /// Fixed-width ASCII field, trailing NULs and spaces dropped.
    pub fn ascii(input: &[u8], len: usize) -> IResult<&[u8], String> {
        let (input, bytes) = take::<_, _, nom::error::Error<&[u8]>>(len)(input)?;
        let s = String::from_utf8_lossy(bytes);
        Ok((input, s.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()).to_string()))
    }

    pub fn ascii10(input: &[u8]) -> IResult<&[u8], String> {
        Self::ascii(input, 10)
    }

    pub fn ascii16(input: &[u8]) -> IResult<&[u8], String> {
        Self::ascii(input, 16)
    }
}
