use crate::prelude::*;

use crate::goodwe::sensor::{Phases, Schema, Sensor, SensorKind, Width};
use crate::goodwe::tables::UNKNOWN_LABEL;
use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    bytes::complete::take,
    number::complete::{be_i16, be_i32, be_u16, be_u32, be_u8},
    sequence::tuple,
    IResult,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

// Value {{{
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    /// `None` when the inverter sent an impossible date (month 0 and such).
    Timestamp(Option<NaiveDateTime>),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(t) => *t,
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Timestamp(Some(t)) => write!(f, "{}", t),
            Value::Timestamp(None) => write!(f, "invalid"),
        }
    }
}
// }}}

// ReadingSet {{{
/// Decoded readings keyed by sensor id, kept in schema order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadingSet {
    readings: Vec<(&'static str, Value)>,
}

impl ReadingSet {
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.readings
            .iter()
            .find(|(k, _)| *k == id)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.readings.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.readings.iter().map(|(k, v)| (*k, v))
    }

    fn push(&mut self, id: &'static str, value: Value) {
        self.readings.push((id, value));
    }
}

impl Serialize for ReadingSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.readings.len()))?;
        for (k, v) in &self.readings {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
// }}}

/// Which sensors of a schema to emit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Filter {
    pub phases: Phases,
    pub include_unknown: bool,
}

impl Filter {
    pub const ALL: Filter = Filter {
        phases: Phases::Three,
        include_unknown: true,
    };
}

/// Applies `schema` to a runtime-data payload.
///
/// The payload must cover every sensor the schema declares, whatever the
/// filter drops; a short payload means the wrong schema for this device.
pub fn decode(schema: &Schema, payload: &[u8], filter: Filter) -> Result<ReadingSet> {
    let required = schema.required_len();
    if payload.len() < required {
        return Err(Error::DecodeOutOfRange {
            schema: schema.name,
            required,
            actual: payload.len(),
        });
    }

    let mut readings = ReadingSet::default();

    for sensor in schema.sensors_for(filter.phases, filter.include_unknown) {
        let value = read(sensor, payload).ok_or(Error::DecodeOutOfRange {
            schema: schema.name,
            required: sensor.end(),
            actual: payload.len(),
        })?;

        match sensor.kind {
            SensorKind::Enumeration { table, label } => {
                let text = value
                    .as_i64()
                    .and_then(|code| u16::try_from(code).ok())
                    .map_or(UNKNOWN_LABEL, |code| table.label(code));
                readings.push(sensor.id, value);
                readings.push(label, Value::Text(text.to_string()));
            }
            _ => readings.push(sensor.id, value),
        }
    }

    Ok(readings)
}

fn field<'a, O>(
    payload: &'a [u8],
    offset: usize,
    mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
) -> Option<O> {
    let input = payload.get(offset..)?;
    parser(input).ok().map(|(_, o)| o)
}

fn read(sensor: &Sensor, payload: &[u8]) -> Option<Value> {
    let offset = sensor.offset;

    let value = match sensor.kind {
        SensorKind::Integer(Width::W16) => Value::Integer(field(payload, offset, be_i16)?.into()),
        SensorKind::Integer(Width::W32) => Value::Integer(field(payload, offset, be_i32)?.into()),
        SensorKind::Unsigned(Width::W16) => Value::Integer(field(payload, offset, be_u16)?.into()),
        SensorKind::Unsigned(Width::W32) => Value::Integer(field(payload, offset, be_u32)?.into()),
        SensorKind::FixedPoint {
            width,
            divisor,
            unreported,
        } => {
            let (raw, all_ones) = match width {
                Width::W16 => {
                    let raw = field(payload, offset, be_i16)?;
                    (i64::from(raw), raw == -1)
                }
                Width::W32 => {
                    let raw = field(payload, offset, be_i32)?;
                    (i64::from(raw), raw == -1)
                }
            };
            match unreported {
                Some(sentinel) if all_ones => Value::Float(sentinel),
                _ => Value::Float(raw as f64 / f64::from(divisor)),
            }
        }
        SensorKind::Enumeration { .. } => Value::Integer(field(payload, offset, be_u16)?.into()),
        SensorKind::Timestamp => {
            let parts = field(payload, offset, tuple((be_u8, be_u8, be_u8, be_u8, be_u8, be_u8)))?;
            Value::Timestamp(timestamp(parts))
        }
        SensorKind::Raw(n) => Value::Text(Utils::hex(field(payload, offset, take(n))?)),
        SensorKind::Power { voltage, current } => {
            let v = f64::from(field(payload, voltage, be_i16)?) / 10.0;
            let i = f64::from(field(payload, current, be_i16)?) / 10.0;
            Value::Integer(Utils::round_even(v * i) as i64)
        }
    };

    Some(value)
}

/// Calendar timestamp from (year since 2000, month, day, hour, minute, second).
pub fn timestamp((year, month, day, hour, minute, second): (u8, u8, u8, u8, u8, u8)) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2000 + i32::from(year), month.into(), day.into())?.and_hms_opt(
        hour.into(),
        minute.into(),
        second.into(),
    )
}

/// Inverse of [`timestamp`].
#[cfg(test)]
fn timestamp_bytes(t: &NaiveDateTime) -> Option<[u8; crate::goodwe::sensor::TIMESTAMP_LEN]> {
    use chrono::{Datelike, Timelike};

    let year = u8::try_from(t.year().checked_sub(2000)?).ok()?;
    Some([
        year,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    ])
}
